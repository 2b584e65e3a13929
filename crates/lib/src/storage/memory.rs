//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use super::{PhysicalStorage, StorageError};
use crate::Result;
use crate::core::{Context, Expression, Identifier};
use crate::dshash;

/// A simple in-memory backend using a `HashMap` guarded by a read/write lock.
///
/// Suitable for tests, tooling and embedding where durability is handled
/// elsewhere. Values are keyed by their `dshash-sha256` identifier.
#[derive(Debug, Default)]
pub struct InMemory {
    items: RwLock<HashMap<Identifier, Arc<dyn Expression>>>,
}

impl InMemory {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Returns the identifiers of every stored value, in no particular order.
    pub fn all_ids(&self) -> Vec<Identifier> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl PhysicalStorage for InMemory {
    fn set(&self, _ctx: &mut Context, value: Arc<dyn Expression>) -> Result<Identifier> {
        // Hash before taking the lock; large values take a while.
        let id = dshash::identifier(value.as_ref())?;
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.entry(id.clone()).or_insert(value);
        trace!(id = %id, items = items.len(), "Stored value");
        Ok(id)
    }

    fn get(&self, _ctx: &mut Context, id: &Identifier) -> Result<Arc<dyn Expression>> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        trace!(id = %id, "Loading value");
        items
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound { id: id.clone() }.into())
    }
}
