//! Optional metrics instrumentation.
//!
//! When the `observe` feature is enabled, collection and transaction
//! operations emit counters and histograms via the [`metrics`] crate. A
//! downstream application installs the recorder.
//!
//! Without the feature every function in this module is a no-op.

/// Record a put (counter + bytes written).
///
/// - `lmdbcols.put.total` – counter
/// - `lmdbcols.put.bytes_total` – counter of key + value bytes
#[inline]
pub fn record_put(bytes: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("lmdbcols.put.total").increment(1);
        metrics::counter!("lmdbcols.put.bytes_total").increment(bytes as u64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = bytes;
    }
}

/// Record a lookup and whether the key was present.
///
/// - `lmdbcols.get.total` – counter with `result` label (`hit` / `miss`)
#[inline]
pub fn record_get(hit: bool) {
    #[cfg(feature = "observe")]
    {
        let result = if hit { "hit" } else { "miss" };
        metrics::counter!("lmdbcols.get.total", "result" => result).increment(1);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = hit;
    }
}

/// Record a write transaction commit (counter + latency histogram).
///
/// - `lmdbcols.txn.commits_total`
/// - `lmdbcols.txn.commit_duration_seconds`
#[inline]
pub fn record_commit(duration: std::time::Duration) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("lmdbcols.txn.commits_total").increment(1);
        metrics::histogram!("lmdbcols.txn.commit_duration_seconds")
            .record(duration.as_secs_f64());
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = duration;
    }
}

/// Record a write transaction that ended without a commit.
///
/// - `lmdbcols.txn.aborts_total`
#[inline]
pub fn record_abort() {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("lmdbcols.txn.aborts_total").increment(1);
    }
}
