//! A string key/value database over a content-addressed store.
//!
//! The whole database is one immutable [`Map`](crate::collection::Map)
//! stored in a [`PhysicalStorage`]; the [`DB`] only remembers the
//! identifier of the current root. Writers work on private snapshots and
//! publish with an optimistic compare-and-swap of that identifier.
//!
//! ```
//! use std::sync::Arc;
//! use arbordb::kvdb::DB;
//! use arbordb::storage::InMemory;
//!
//! let db = DB::new(Arc::new(InMemory::new()));
//! let txn = db.begin()?;
//! txn.put("greeting", "hello")?;
//! let root = txn.commit()?;
//! assert_eq!(db.root_id(), root);
//!
//! let txn = db.begin()?;
//! assert_eq!(txn.get("greeting")?, "hello");
//! # Ok::<(), arbordb::Error>(())
//! ```

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::Result;
use crate::collection::{self, Dict, Map};
use crate::core::{Context, Identifier};
use crate::scalar::Str;
use crate::storage::PhysicalStorage;

mod config;
pub mod errors;
mod transaction;

pub use config::DbConfig;
pub use errors::TransactionError;
pub use transaction::{Transaction, TransactionStatus};

/// Shared handle to a database. Cloning is cheap and every clone sees the
/// same root.
#[derive(Clone)]
pub struct DB {
    inner: Arc<DbInner>,
}

struct DbInner {
    storage: Arc<dyn PhysicalStorage>,
    root: RwLock<Identifier>,
    config: DbConfig,
}

impl DB {
    /// Creates an empty database over `storage` with the default configuration.
    pub fn new(storage: Arc<dyn PhysicalStorage>) -> Self {
        Self::with_config(storage, DbConfig::default())
    }

    pub fn with_config(storage: Arc<dyn PhysicalStorage>, config: DbConfig) -> Self {
        Self::with_root(storage, Identifier::default(), config)
    }

    /// Opens a database whose current root is `root`, typically one
    /// committed earlier into the same (durable) storage.
    ///
    /// The root is not loaded until a transaction begins.
    pub fn with_root(
        storage: Arc<dyn PhysicalStorage>,
        root: Identifier,
        config: DbConfig,
    ) -> Self {
        Self {
            inner: Arc::new(DbInner {
                storage,
                root: RwLock::new(root),
                config,
            }),
        }
    }

    /// Identifier of the last committed root. Empty until the first commit.
    pub fn root_id(&self) -> Identifier {
        self.inner.root.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn storage(&self) -> &Arc<dyn PhysicalStorage> {
        &self.inner.storage
    }

    pub fn config(&self) -> &DbConfig {
        &self.inner.config
    }

    /// Opens a transaction against the current root.
    ///
    /// The transaction's context carries this database's storage and yield
    /// policy, with no cancellation predicate.
    pub fn begin(&self) -> Result<Transaction> {
        let ctx = Context::with_storage(Arc::clone(&self.inner.storage))
            .with_policy(self.inner.config.yield_policy);
        self.begin_with(ctx)
    }

    /// Opens a transaction that runs every operation under `ctx`.
    ///
    /// Use this to attach a cancellation predicate to a transaction.
    pub fn begin_with(&self, mut ctx: Context) -> Result<Transaction> {
        let base_root = self.root_id();
        let working: Arc<dyn Dict<Str, Str>> = if base_root.is_empty() {
            Arc::new(Map::new())
        } else {
            let value = self.inner.storage.get(&mut ctx, &base_root)?;
            let found = value.as_ref().type_name();
            collection::as_dict::<Str, Str>(value).ok_or_else(|| TransactionError::RootNotDict {
                root: base_root.clone(),
                found,
            })?
        };
        debug!(root = %base_root, "Began transaction");
        Ok(Transaction::new(self.clone(), base_root, working, ctx))
    }

    /// Publishes `new_root` if the current root is still `expected`.
    pub(crate) fn compare_and_swap(
        &self,
        expected: &Identifier,
        new_root: Identifier,
    ) -> Result<()> {
        let mut root = self.inner.root.write().unwrap_or_else(PoisonError::into_inner);
        if *root != *expected {
            return Err(TransactionError::Conflict {
                expected: expected.clone(),
                found: root.clone(),
            }
            .into());
        }
        *root = new_root;
        Ok(())
    }
}

impl fmt::Debug for DB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DB")
            .field("root", &self.root_id())
            .field("storage", &self.inner.storage)
            .field("config", &self.inner.config)
            .finish()
    }
}
