//! Untyped access to one named collection
//!
//! Handles groups of bytes only; sizes and alignment are the typed
//! collections' concern. The collection is resolved by name inside every
//! call, against the transaction's own snapshot.

use bytemuck::NoUninit;
use lmdb::{Database, DatabaseFlags, Transaction, WriteFlags};
use lmdbcols_core::{
    error::{ColsError, Result},
    observe, AlignedView,
};

use crate::txn::{Txn, WriteTxn};

#[derive(Debug, Clone)]
pub struct RawCollection {
    name: String,
    flags: DatabaseFlags,
}

impl RawCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_flags(name, DatabaseFlags::empty())
    }

    /// Use `flags` when the collection is created.
    pub fn with_flags(name: impl Into<String>, flags: DatabaseFlags) -> Self {
        Self {
            name: name.into(),
            flags,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn resolve<T: Txn>(&self, txn: &T) -> Result<Option<Database>> {
        txn.open_collection(&self.name, self.flags)
    }

    fn not_found(&self) -> ColsError {
        ColsError::NotFound(format!("key in collection {}", self.name))
    }

    /// Create or overwrite `key`, creating the collection on first use.
    pub fn put(&self, txn: &mut WriteTxn<'_>, key: &[u8], value: &[u8]) -> Result<()> {
        let db = self.resolve(txn)?.ok_or_else(|| {
            ColsError::InvalidState(format!("collection {} could not be created", self.name))
        })?;

        txn.inner_mut()?
            .put(db, &key, &value, WriteFlags::empty())
            .map_err(|e| ColsError::Store(format!("put into {}: {}", self.name, e)))?;

        observe::record_put(key.len() + value.len());
        Ok(())
    }

    /// Store `elems` back to back as a single value.
    pub fn put_array<E: NoUninit>(
        &self,
        txn: &mut WriteTxn<'_>,
        key: &[u8],
        elems: &[E],
    ) -> Result<()> {
        self.put(txn, key, bytemuck::cast_slice(elems))
    }

    /// The stored bytes for `key`, or `None` if the key (or the whole
    /// collection) is absent.
    pub fn try_get<'t, T: Txn>(
        &self,
        txn: &'t T,
        key: &[u8],
    ) -> Result<Option<AlignedView<'t, u8>>> {
        let Some(db) = self.resolve(txn)? else {
            observe::record_get(false);
            return Ok(None);
        };

        match txn.inner()?.get(db, &key) {
            Ok(bytes) => {
                observe::record_get(true);
                Ok(Some(AlignedView::from_bytes(bytes)?))
            }
            Err(lmdb::Error::NotFound) => {
                observe::record_get(false);
                Ok(None)
            }
            Err(e) => Err(ColsError::Store(format!("get from {}: {}", self.name, e))),
        }
    }

    /// The stored bytes for `key`; an absent key is [`ColsError::NotFound`].
    pub fn get<'t, T: Txn>(&self, txn: &'t T, key: &[u8]) -> Result<AlignedView<'t, u8>> {
        self.try_get(txn, key)?.ok_or_else(|| self.not_found())
    }

    pub fn exists<T: Txn>(&self, txn: &T, key: &[u8]) -> Result<bool> {
        Ok(self.try_get(txn, key)?.is_some())
    }
}
