use lmdbcols_core::{
    error::{ColsError, Result},
    observe,
};
use lmdb::{Database, DatabaseFlags, RoTransaction, RwTransaction, Transaction};
use std::cell::RefCell;
use std::time::Instant;

use crate::env::Environment;

/// A transaction collections can read through.
///
/// Implemented by both [`ReadTxn`] and [`WriteTxn`], so reads inside a write
/// transaction see its own uncommitted puts.
pub trait Txn {
    type Inner: Transaction;

    fn inner(&self) -> Result<&Self::Inner>;

    /// Resolve a named collection inside this transaction.
    ///
    /// Returns `None` when the collection does not exist and this
    /// transaction cannot create it.
    fn open_collection(&self, name: &str, flags: DatabaseFlags) -> Result<Option<Database>>;
}

/// Read-only transaction over one consistent snapshot
///
/// Never blocks writers or other readers. Dropping it ends the transaction;
/// every view and reference obtained through it borrows it.
pub struct ReadTxn<'env> {
    txn: RoTransaction<'env>,
    env: &'env Environment,
}

impl<'env> ReadTxn<'env> {
    pub(crate) fn new(txn: RoTransaction<'env>, env: &'env Environment) -> Self {
        Self { txn, env }
    }
}

impl<'env> Txn for ReadTxn<'env> {
    type Inner = RoTransaction<'env>;

    fn inner(&self) -> Result<&Self::Inner> {
        Ok(&self.txn)
    }

    fn open_collection(&self, name: &str, _flags: DatabaseFlags) -> Result<Option<Database>> {
        // The snapshot decides whether the collection exists; a handle
        // registered after this transaction began is not usable in it.
        match self.txn.get(self.env.main_db(), &name) {
            Ok(_) => {}
            Err(lmdb::Error::NotFound) => return Ok(None),
            Err(e) => return Err(ColsError::Store(format!("look up collection {}: {}", name, e))),
        }

        self.env.registered(name).map(Some).ok_or_else(|| {
            ColsError::InvalidState(format!(
                "collection {} was created outside this environment; reopen the store",
                name
            ))
        })
    }
}

/// Read-write transaction
///
/// Changes become visible to other transactions only on [`WriteTxn::commit`].
/// A transaction dropped without a commit (early return, `?`, panic) is
/// aborted.
pub struct WriteTxn<'env> {
    txn: Option<RwTransaction<'env>>,
    env: &'env Environment,
    /// Collections first opened by this transaction, registered on commit.
    created: RefCell<Vec<(String, Database)>>,
    started: Instant,
}

impl<'env> WriteTxn<'env> {
    pub(crate) fn new(txn: RwTransaction<'env>, env: &'env Environment) -> Self {
        Self {
            txn: Some(txn),
            env,
            created: RefCell::new(Vec::new()),
            started: Instant::now(),
        }
    }

    pub(crate) fn inner_mut(&mut self) -> Result<&mut RwTransaction<'env>> {
        self.txn
            .as_mut()
            .ok_or_else(|| ColsError::InvalidState("Transaction already finished".into()))
    }

    /// Apply every write of this transaction atomically.
    pub fn commit(mut self) -> Result<()> {
        let txn = self
            .txn
            .take()
            .ok_or_else(|| ColsError::InvalidState("Transaction already finished".into()))?;
        let created = std::mem::take(self.created.get_mut());

        if created.is_empty() {
            txn.commit().map_err(|e| ColsError::Store(e.to_string()))?;
        } else {
            // Held across the commit so no lookup sees the new snapshot
            // without its handles.
            let mut registry = self.env.registry().write();
            txn.commit().map_err(|e| ColsError::Store(e.to_string()))?;
            registry.extend(created.iter().cloned());
        }

        observe::record_commit(self.started.elapsed());
        tracing::debug!(
            elapsed = ?self.started.elapsed(),
            new_collections = created.len(),
            "Committed write transaction"
        );
        Ok(())
    }

    /// Discard every write of this transaction.
    pub fn abort(mut self) {
        self.finish_aborted();
    }

    fn finish_aborted(&mut self) {
        if let Some(txn) = self.txn.take() {
            txn.abort();
            observe::record_abort();
            tracing::debug!("Aborted write transaction");
        }
    }
}

impl<'env> Txn for WriteTxn<'env> {
    type Inner = RwTransaction<'env>;

    fn inner(&self) -> Result<&Self::Inner> {
        self.txn
            .as_ref()
            .ok_or_else(|| ColsError::InvalidState("Transaction already finished".into()))
    }

    fn open_collection(&self, name: &str, flags: DatabaseFlags) -> Result<Option<Database>> {
        let txn = self.inner()?;
        if let Some(db) = self.env.registered(name) {
            return Ok(Some(db));
        }
        if let Some((_, db)) = self.created.borrow().iter().find(|(n, _)| n == name) {
            return Ok(Some(*db));
        }

        // SAFETY: only write transactions open handles, and LMDB admits one
        // at a time. The handle stays private to this transaction until
        // commit publishes it, and LMDB releases it on abort.
        let db = unsafe { txn.create_db(Some(name), flags) }
            .map_err(|e| ColsError::Store(format!("create collection {}: {}", name, e)))?;
        self.created.borrow_mut().push((name.to_owned(), db));
        Ok(Some(db))
    }
}

impl<'env> Drop for WriteTxn<'env> {
    fn drop(&mut self) {
        self.finish_aborted();
    }
}
