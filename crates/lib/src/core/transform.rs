//! Transforms: operations that turn one expression into another.

use crate::Result;
use crate::core::{Context, Cost};

/// Progress report from a running transform, merged into the context's
/// running cost via [`Context::record`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStep {
    /// Resource cost of the last step.
    pub cost: Cost,
}

/// A conversion from `From` into an existing `To` slot.
///
/// Implementations must leave `to` untouched on error only where stated;
/// callers discard partial output after a failure or cancellation.
pub trait Transform<From: ?Sized, To> {
    /// Estimated cost of applying the transform to `from`.
    fn estimate_cost(&self, ctx: &Context, from: &From) -> Result<Cost>;

    /// Applies the transform, writing the result into `to`.
    fn apply(&self, ctx: &mut Context, from: &From, to: &mut To) -> Result<()>;
}
