//! Content-addressed physical storage.
//!
//! A [`PhysicalStorage`] maps identifiers to immutable expressions. The only
//! implementation shipped here is [`InMemory`]; durable backends implement
//! the same trait and can be swapped in without touching the collections or
//! the transaction engine.

use std::any::type_name;
use std::fmt::Debug;
use std::sync::Arc;

use crate::Result;
use crate::core::{Context, Expression, Identifier};

pub mod errors;
mod memory;

pub use errors::StorageError;
pub use memory::InMemory;

/// Interface every storage backend implements.
///
/// Stored values are never mutated. `set` only ever adds entries, so
/// concurrent readers always observe complete values.
pub trait PhysicalStorage: Send + Sync + Debug {
    /// Stores `value` under its structural identifier and returns it.
    ///
    /// Storing a value whose identifier is already present is a no-op.
    fn set(&self, ctx: &mut Context, value: Arc<dyn Expression>) -> Result<Identifier>;

    /// Retrieves the value stored under `id`.
    ///
    /// Fails with [`StorageError::NotFound`] when nothing is stored there.
    fn get(&self, ctx: &mut Context, id: &Identifier) -> Result<Arc<dyn Expression>>;
}

/// Retrieves the value stored under `id` as a concrete type.
///
/// Fails with [`StorageError::TypeMismatch`] when the stored value has a
/// different runtime type.
pub fn get_as<T: Expression>(
    storage: &dyn PhysicalStorage,
    ctx: &mut Context,
    id: &Identifier,
) -> Result<Arc<T>> {
    let value = storage.get(ctx, id)?;
    let found = value.as_ref().type_name();
    value.into_any_arc().downcast::<T>().map_err(|_| {
        StorageError::TypeMismatch {
            id: id.clone(),
            expected: type_name::<T>(),
            found,
        }
        .into()
    })
}
