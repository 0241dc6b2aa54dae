//! LMDB-backed typed collections
//!
//! Provides an [`Environment`] over a single LMDB file, scoped read and write
//! transactions, and collections that store POD keys and values and read
//! them back in place, without copying.
//!
//! Key features:
//! - Map size rounded up to 4096 bytes, flat-file layout
//! - Write transactions abort unless committed
//! - Four collection shapes: scalar or array values, with manual or
//!   automatic eight-byte padding
//! - Views and references borrow the transaction, so they cannot outlive it

pub mod collections;
pub mod env;
pub mod raw;
pub mod txn;

pub use collections::{PaddedPodArrayMap, PaddedPodMap, PodArrayMap, PodMap};
pub use env::{EnvStat, Environment};
pub use lmdb::DatabaseFlags;
pub use raw::RawCollection;
pub use txn::{ReadTxn, Txn, WriteTxn};
