//! Identity transforms.
//!
//! Each resolver asks the value for the matching identity first and falls
//! back to hashing the whole value.

use crate::Result;
use crate::core::{Context, Cost, Expression, Identifier, Transform, TransformStep, canonical};
use crate::dshash;

/// Resolves the logical identity of an expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToLogicalId;

/// Resolves the physical identity of an expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToPhysicalId;

/// Resolves the canonical identity of an expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToCanonicalId;

impl Transform<dyn Expression, Identifier> for ToLogicalId {
    fn estimate_cost(&self, _ctx: &Context, _from: &dyn Expression) -> Result<Cost> {
        Ok(Cost::default())
    }

    fn apply(&self, _ctx: &mut Context, from: &dyn Expression, to: &mut Identifier) -> Result<()> {
        *to = match from.logical_id() {
            Some(id) => id,
            None => dshash::identifier(from)?,
        };
        Ok(())
    }
}

impl Transform<dyn Expression, Identifier> for ToPhysicalId {
    fn estimate_cost(&self, _ctx: &Context, _from: &dyn Expression) -> Result<Cost> {
        Ok(Cost::default())
    }

    fn apply(&self, _ctx: &mut Context, from: &dyn Expression, to: &mut Identifier) -> Result<()> {
        *to = match from.physical_id() {
            Some(id) => id,
            None => dshash::identifier(from)?,
        };
        Ok(())
    }
}

impl Transform<dyn Expression, Identifier> for ToCanonicalId {
    fn estimate_cost(&self, _ctx: &Context, _from: &dyn Expression) -> Result<Cost> {
        Ok(Cost::default())
    }

    fn apply(&self, ctx: &mut Context, from: &dyn Expression, to: &mut Identifier) -> Result<()> {
        *to = canonical::resolve(ctx, from)?;
        Ok(())
    }
}

/// Runs `transform` to completion and folds its estimated cost into `ctx`.
pub fn run<T>(ctx: &mut Context, transform: &T, from: &dyn Expression) -> Result<Identifier>
where
    T: Transform<dyn Expression, Identifier>,
{
    let cost = transform.estimate_cost(ctx, from)?;
    let mut id = Identifier::default();
    transform.apply(ctx, from, &mut id)?;
    ctx.record(TransformStep { cost });
    Ok(id)
}

/// Logical identifier of `expr`.
pub fn logical_id(ctx: &mut Context, expr: &dyn Expression) -> Result<Identifier> {
    run(ctx, &ToLogicalId, expr)
}

/// Physical identifier of `expr`.
pub fn physical_id(ctx: &mut Context, expr: &dyn Expression) -> Result<Identifier> {
    run(ctx, &ToPhysicalId, expr)
}

/// Canonical identifier of `expr`.
pub fn canonical_id(ctx: &mut Context, expr: &dyn Expression) -> Result<Identifier> {
    run(ctx, &ToCanonicalId, expr)
}
