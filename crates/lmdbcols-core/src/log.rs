//! Injectable diagnostic logging
//!
//! Diagnostic and test code takes a `&dyn LogSink` instead of writing to a
//! global logger, so callers choose where events go. [`emit!`](crate::emit)
//! records the call site.

use parking_lot::Mutex;

/// A single diagnostic event.
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    pub file: &'static str,
    pub line: u32,
    pub message: &'a str,
}

impl std::fmt::Display for LogEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}  --  {}", self.file, self.line, self.message)
    }
}

pub trait LogSink: Send + Sync {
    fn emit(&self, event: &LogEvent<'_>);
}

/// Forwards events to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, event: &LogEvent<'_>) {
        tracing::info!(file = event.file, line = event.line, "{}", event.message);
    }
}

/// Keeps every event in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events.lock().iter().any(|m| m.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn emit(&self, event: &LogEvent<'_>) {
        self.events.lock().push(event.message.to_string());
    }
}

/// Emit a formatted message to a [`LogSink`], tagged with file and line.
#[macro_export]
macro_rules! emit {
    ($sink:expr) => {
        $crate::emit!($sink, "")
    };
    ($sink:expr, $($arg:tt)+) => {{
        let message = format!($($arg)+);
        $crate::log::LogSink::emit(
            $sink,
            &$crate::log::LogEvent {
                file: file!(),
                line: line!(),
                message: &message,
            },
        );
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        crate::emit!(&sink, "first {}", 1);
        crate::emit!(&sink);
        crate::emit!(&sink, "third");
        assert_eq!(sink.messages(), vec!["first 1", "", "third"]);
        assert!(sink.contains("thi"));
        assert!(!sink.contains("fourth"));
    }

    #[test]
    fn test_dyn_sink() {
        let sink = MemorySink::new();
        let dyn_sink: &dyn LogSink = &sink;
        crate::emit!(dyn_sink, "via {}", "dyn");
        assert!(sink.contains("via dyn"));
    }

    #[test]
    fn test_event_display() {
        let event = LogEvent {
            file: "a.rs",
            line: 7,
            message: "hi",
        };
        assert_eq!(event.to_string(), "a.rs:7  --  hi");
    }
}
