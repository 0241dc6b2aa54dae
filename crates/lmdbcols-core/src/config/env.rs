use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ColsError, Result};

/// LMDB wants the map size as a multiple of the OS page size.
pub const PAGE_GRANULARITY: usize = 4096;

/// Round `size` up to the next multiple of [`PAGE_GRANULARITY`].
pub fn round_up_to_page(size: usize) -> usize {
    match size % PAGE_GRANULARITY {
        0 => size,
        rem => size + (PAGE_GRANULARITY - rem),
    }
}

/// Configuration for an environment (one LMDB store file)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvConfig {
    /// Path to the store file (a bare file, not a directory)
    pub path: PathBuf,

    /// Maximum map size in bytes, rounded up to 4096 when applied
    /// Default: 1GB
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Maximum number of named collections in the file
    /// Default: 10
    #[serde(default = "default_max_collections")]
    pub max_collections: u32,

    /// Maximum number of concurrent readers
    /// Default: 126
    #[serde(default = "default_max_readers")]
    pub max_readers: u32,

    /// Sync mode for durability
    #[serde(default)]
    pub sync_mode: SyncMode,

    /// Permission bits used when the file is created
    /// Default: 0o664
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// `fsync()` on every commit (default).
    ///
    /// Committed data survives power loss and OS crashes.
    #[default]
    Full,

    /// Skip syncing the meta page on commit.
    ///
    /// The last transaction may be lost after an OS crash, but the file
    /// stays consistent.
    NoMetaSync,

    /// No `fsync()` at all; the page cache decides when to flush.
    ///
    /// **WARNING**: a power failure can lose recent transactions or corrupt
    /// the file. Only for scratch and test stores.
    NoSync,
}

fn default_map_size() -> usize {
    1024 * 1024 * 1024 // 1GB
}

fn default_max_collections() -> u32 {
    10
}

fn default_max_readers() -> u32 {
    126
}

fn default_file_mode() -> u32 {
    0o664
}

impl EnvConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            map_size: default_map_size(),
            max_collections: default_max_collections(),
            max_readers: default_max_readers(),
            sync_mode: SyncMode::default(),
            file_mode: default_file_mode(),
        }
    }

    /// Parse a config from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ColsError::Config(e.to_string()))
    }

    /// The map size that is actually handed to LMDB.
    pub fn rounded_map_size(&self) -> usize {
        round_up_to_page(self.map_size)
    }

    pub fn with_map_size(mut self, map_size: usize) -> Self {
        self.map_size = map_size;
        self
    }

    pub fn with_max_collections(mut self, max_collections: u32) -> Self {
        self.max_collections = max_collections;
        self
    }

    pub fn with_max_readers(mut self, max_readers: u32) -> Self {
        self.max_readers = max_readers;
        self
    }

    pub fn with_sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }

    pub fn with_file_mode(mut self, file_mode: u32) -> Self {
        self.file_mode = file_mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up_to_page() {
        assert_eq!(round_up_to_page(0), 0);
        assert_eq!(round_up_to_page(1), 4096);
        assert_eq!(round_up_to_page(4096), 4096);
        assert_eq!(round_up_to_page(4097), 8192);
        assert_eq!(round_up_to_page(1 << 30), 1 << 30);
    }

    #[test]
    fn test_defaults() {
        let cfg = EnvConfig::new("/tmp/store.mdb");
        assert_eq!(cfg.map_size, 1 << 30);
        assert_eq!(cfg.max_collections, 10);
        assert_eq!(cfg.sync_mode, SyncMode::Full);
        assert_eq!(cfg.file_mode, 0o664);
    }

    #[test]
    fn test_builder_rounds_map_size() {
        let cfg = EnvConfig::new("/tmp/store.mdb")
            .with_map_size(10_000)
            .with_max_collections(3);
        assert_eq!(cfg.map_size, 10_000);
        assert_eq!(cfg.rounded_map_size(), 12_288);
        assert_eq!(cfg.max_collections, 3);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let cfg = EnvConfig::from_json_str(r#"{"path": "/tmp/x.mdb", "map_size": 5000}"#).unwrap();
        assert_eq!(cfg.path, PathBuf::from("/tmp/x.mdb"));
        assert_eq!(cfg.rounded_map_size(), 8192);
        assert_eq!(cfg.max_collections, 10);
        assert_eq!(cfg.max_readers, 126);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = EnvConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ColsError::Config(_)));
    }
}
