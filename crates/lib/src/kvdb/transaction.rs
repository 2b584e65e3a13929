//! Optimistic transactions.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::{DB, TransactionError};
use crate::Result;
use crate::collection::{self, Dict, Map};
use crate::core::{Context, Identifier};
use crate::scalar::Str;

/// Lifecycle of a [`Transaction`]. `Committed` and `Abandoned` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Open,
    Committed,
    Abandoned,
}

impl TransactionStatus {
    fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Open => "open",
            TransactionStatus::Committed => "committed",
            TransactionStatus::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct TxState {
    status: TransactionStatus,
    /// Snapshot root plus every edit so far, as a delta chain.
    working: Arc<dyn Dict<Str, Str>>,
    /// Edits stacked on the last flat map.
    depth: usize,
    ctx: Context,
}

impl TxState {
    fn ensure_open(&self) -> Result<()> {
        match self.status {
            TransactionStatus::Open => Ok(()),
            state => Err(TransactionError::Finished { state: state.as_str() }.into()),
        }
    }
}

/// A unit of work against a snapshot of a [`DB`].
///
/// Reads see the snapshot taken at [`DB::begin`] plus this transaction's own
/// writes. Writes are invisible to everyone else until [`commit`] succeeds.
/// Commit fails with [`TransactionError::Conflict`] if any other transaction
/// committed in the meantime; there is no automatic retry.
///
/// Every method locks the transaction, so a handle may be shared between
/// threads, but calls on it are serialized.
///
/// [`commit`]: Transaction::commit
pub struct Transaction {
    db: DB,
    base_root: Identifier,
    state: Mutex<TxState>,
}

impl Transaction {
    pub(super) fn new(
        db: DB,
        base_root: Identifier,
        working: Arc<dyn Dict<Str, Str>>,
        ctx: Context,
    ) -> Self {
        Self {
            db,
            base_root,
            state: Mutex::new(TxState {
                status: TransactionStatus::Open,
                working,
                depth: 0,
                ctx,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TxState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Root identifier captured when the transaction began.
    pub fn base_root(&self) -> &Identifier {
        &self.base_root
    }

    pub fn status(&self) -> TransactionStatus {
        self.lock().status
    }

    /// Value bound to `key`; fails with a not-found error when unbound.
    pub fn get(&self, key: &str) -> Result<String> {
        let mut state = self.lock();
        state.ensure_open()?;
        let TxState { working, ctx, .. } = &mut *state;
        Ok(working.get(ctx, &Str::from(key))?.0)
    }

    pub fn exists(&self, key: &str) -> Result<bool> {
        let mut state = self.lock();
        state.ensure_open()?;
        let TxState { working, ctx, .. } = &mut *state;
        working.exists(ctx, &Str::from(key))
    }

    /// Binds `key` to `value`, replacing any previous binding.
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.lock();
        state.ensure_open()?;
        state.working =
            collection::set(Arc::clone(&state.working), Str::from(key), Str::from(value));
        self.push_edit(&mut state)
    }

    /// Unbinds `key`. Deleting an unbound key is not an error.
    pub fn delete(&self, key: &str) -> Result<()> {
        let mut state = self.lock();
        state.ensure_open()?;
        state.working = collection::remove(Arc::clone(&state.working), Str::from(key));
        self.push_edit(&mut state)
    }

    fn push_edit(&self, state: &mut TxState) -> Result<()> {
        state.depth += 1;
        let Some(threshold) = self.db.config().compact_threshold else {
            return Ok(());
        };
        if state.depth < threshold.max(1) {
            return Ok(());
        }
        let flat = collection::to_map(&mut state.ctx, state.working.as_ref())?;
        state.working = Arc::new(flat);
        state.depth = 0;
        Ok(())
    }

    /// Materializes the working value, stores it, and publishes it as the
    /// new root if nobody else committed since [`DB::begin`].
    ///
    /// On conflict nothing is published and the transaction is abandoned.
    /// A canceled commit leaves the transaction open.
    pub fn commit(&self) -> Result<Identifier> {
        let mut state = self.lock();
        state.ensure_open()?;
        let TxState { working, ctx, .. } = &mut *state;
        let flat: Map<Str, Str> = collection::to_map(ctx, working.as_ref())?;
        let size = flat.len();
        let new_root = self.db.storage().set(ctx, Arc::new(flat))?;

        if let Err(err) = self.db.compare_and_swap(&self.base_root, new_root.clone()) {
            state.status = TransactionStatus::Abandoned;
            debug!(base = %self.base_root, error = %err, "Commit conflict");
            return Err(err);
        }
        state.status = TransactionStatus::Committed;
        debug!(base = %self.base_root, root = %new_root, size, "Committed transaction");
        Ok(new_root)
    }

    /// Discards every edit. The store is not touched.
    pub fn abandon(&self) -> Result<()> {
        let mut state = self.lock();
        state.ensure_open()?;
        state.status = TransactionStatus::Abandoned;
        debug!(base = %self.base_root, "Abandoned transaction");
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if state.status == TransactionStatus::Open {
            state.status = TransactionStatus::Abandoned;
            debug!(base = %self.base_root, depth = state.depth, "Dropped open transaction");
        }
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Transaction")
            .field("base_root", &self.base_root)
            .field("status", &state.status)
            .field("depth", &state.depth)
            .finish()
    }
}
