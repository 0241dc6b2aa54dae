//! lmdbcols: typed, zero-copy collections of POD records in LMDB
//!
//! Keys and values are fixed-layout structs or arrays. Writes copy their
//! bytes into the store; reads hand back references into LMDB's memory map
//! without copying.
//!
//! # Quick Start
//!
//! ```no_run
//! use lmdbcols::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let env = Environment::open("./ticks.mdb")?;
//! let prices = PaddedPodMap::<u32, f32>::new("prices");
//!
//! let mut txn = env.write_txn()?;
//! prices.put(&mut txn, &7, &101.25)?;
//! txn.commit()?;
//!
//! let txn = env.read_txn()?;
//! assert_eq!(*prices.get(&txn, &7)?, 101.25);
//! # Ok(())
//! # }
//! ```

pub mod prelude;
pub mod selftest;

pub use lmdbcols_core::{
    config::{round_up_to_page, EnvConfig, SyncMode, PAGE_GRANULARITY},
    emit,
    error::{ColsError, Result, ViewError},
    is_paddable, is_valid_record, is_valid_record_layout,
    log::{LogEvent, LogSink, MemorySink, TracingSink},
    AlignedView, EightPadded, PaddedBuf, Record, RECORD_ALIGNMENT,
};

pub use lmdbcols_lmdb::{
    DatabaseFlags, EnvStat, Environment, PaddedPodArrayMap, PaddedPodMap, PodArrayMap, PodMap,
    RawCollection, ReadTxn, Txn, WriteTxn,
};

/// Derive support for record types.
pub use bytemuck::{self, Pod, Zeroable};
