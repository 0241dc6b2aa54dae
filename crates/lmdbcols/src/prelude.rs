//! lmdbcols Prelude
//!
//! ```
//! use lmdbcols::prelude::*;
//! ```

// Core types
pub use crate::{AlignedView, ColsError, EightPadded, Result, ViewError};

// Configs
pub use crate::{EnvConfig, SyncMode};

// Environment and transactions
pub use crate::{Environment, ReadTxn, Txn, WriteTxn};

// Collections
pub use crate::{PaddedPodArrayMap, PaddedPodMap, PodArrayMap, PodMap, RawCollection};

// Layout
pub use crate::{Pod, Record, Zeroable};

// Logging
pub use crate::{LogSink, MemorySink, TracingSink};
