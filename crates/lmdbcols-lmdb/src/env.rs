use lmdbcols_core::{
    config::{EnvConfig, SyncMode},
    error::{ColsError, Result},
};
use lmdb::{Cursor, Database, EnvironmentFlags, Transaction};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::txn::{ReadTxn, WriteTxn};

/// An open LMDB store file.
///
/// The file is opened as a bare file (`NO_SUB_DIR`), not a directory.
/// Dropping the environment closes the store. Read transactions may be open
/// concurrently (one per thread); LMDB allows a single write transaction.
///
/// Collection handles are registered once per environment: collections
/// already in the file when it is opened, and new ones once the write
/// transaction that created them commits. Read transactions never open
/// handles themselves.
pub struct Environment {
    env: lmdb::Environment,
    config: EnvConfig,
    main: Database,
    collections: RwLock<HashMap<String, Database>>,
}

/// Page statistics for the main database of an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnvStat {
    pub page_size: u32,
    pub depth: u32,
    pub branch_pages: usize,
    pub leaf_pages: usize,
    pub overflow_pages: usize,
    /// Entries in the main database; one per named collection.
    pub entries: usize,
}

impl Environment {
    /// Open (or create) a store file with default settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(EnvConfig::new(path.as_ref()))
    }

    /// Open (or create) a store file with an explicit map size and
    /// collection limit.
    pub fn new(path: impl AsRef<Path>, map_size: usize, max_collections: u32) -> Result<Self> {
        Self::open_with_config(
            EnvConfig::new(path.as_ref())
                .with_map_size(map_size)
                .with_max_collections(max_collections),
        )
    }

    pub fn open_with_config(config: EnvConfig) -> Result<Self> {
        let mut flags = EnvironmentFlags::NO_SUB_DIR;
        match config.sync_mode {
            SyncMode::Full => {}
            SyncMode::NoMetaSync => flags.insert(EnvironmentFlags::NO_META_SYNC),
            SyncMode::NoSync => flags.insert(EnvironmentFlags::NO_SYNC),
        }

        let mut builder = lmdb::Environment::new();
        builder.set_flags(flags);
        builder.set_map_size(config.rounded_map_size());
        builder.set_max_dbs(config.max_collections);
        builder.set_max_readers(config.max_readers);

        let env = builder
            .open_with_permissions(&config.path, config.file_mode as _)
            .map_err(|e| {
                ColsError::Config(format!("failed to open {}: {}", config.path.display(), e))
            })?;

        let config_err =
            |e: lmdb::Error| ColsError::Config(format!("{}: {}", config.path.display(), e));

        let main = env.open_db(None).map_err(config_err)?;
        let mut collections = HashMap::new();
        for name in collection_names(&env, main).map_err(config_err)? {
            match env.open_db(Some(&name)) {
                Ok(db) => {
                    collections.insert(name, db);
                }
                // a plain key in the main database, not a collection
                Err(lmdb::Error::Incompatible) => {}
                Err(e) => return Err(config_err(e)),
            }
        }

        tracing::debug!(
            path = %config.path.display(),
            map_size = config.rounded_map_size(),
            max_collections = config.max_collections,
            collections = collections.len(),
            "Opened LMDB environment"
        );

        Ok(Self {
            env,
            config,
            main,
            collections: RwLock::new(collections),
        })
    }

    /// Begin a read-write transaction.
    ///
    /// Blocks while another write transaction is open.
    pub fn write_txn(&self) -> Result<WriteTxn<'_>> {
        let txn = self
            .env
            .begin_rw_txn()
            .map_err(|e| ColsError::Store(e.to_string()))?;
        Ok(WriteTxn::new(txn, self))
    }

    /// Begin a read-only transaction over a consistent snapshot.
    pub fn read_txn(&self) -> Result<ReadTxn<'_>> {
        let txn = self
            .env
            .begin_ro_txn()
            .map_err(|e| ColsError::Store(e.to_string()))?;
        Ok(ReadTxn::new(txn, self))
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn stat(&self) -> Result<EnvStat> {
        let stat = self
            .env
            .stat()
            .map_err(|e| ColsError::Store(e.to_string()))?;
        Ok(EnvStat {
            page_size: stat.page_size(),
            depth: stat.depth(),
            branch_pages: stat.branch_pages(),
            leaf_pages: stat.leaf_pages(),
            overflow_pages: stat.overflow_pages(),
            entries: stat.entries(),
        })
    }

    /// Names of the collections registered in this environment, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// The unnamed database, whose keys are the collection names.
    pub(crate) fn main_db(&self) -> Database {
        self.main
    }

    pub(crate) fn registered(&self, name: &str) -> Option<Database> {
        self.collections.read().get(name).copied()
    }

    pub(crate) fn registry(&self) -> &RwLock<HashMap<String, Database>> {
        &self.collections
    }
}

fn collection_names(env: &lmdb::Environment, main: Database) -> lmdb::Result<Vec<String>> {
    let txn = env.begin_ro_txn()?;
    let mut names = Vec::new();
    {
        let mut cursor = txn.open_ro_cursor(main)?;
        for (key, _) in cursor.iter_start() {
            if let Ok(name) = std::str::from_utf8(key) {
                names.push(name.to_owned());
            }
        }
    }
    txn.commit()?;
    Ok(names)
}
