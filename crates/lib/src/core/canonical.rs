//! Canonical identity: identity derived from logical shape.
//!
//! A value with a list-like canonical form is hashed by resolving each
//! child's canonical identity and folding the child identifiers into the
//! parent's stream. Reference identities are tracked along the current path
//! only, so a shared child resolves exactly like two equal children while a
//! back-edge folds in a cycle tag.

use std::collections::HashSet;

use sha2::{Digest as _, Sha256};

use crate::Result;
use crate::constants::CANONICAL_KIND;
use crate::core::{Context, CoreError, Expression, Identifier, RefKey};
use crate::dshash;

/// Tags of the canonical byte stream.
pub mod tag {
    pub const NIL: u8 = 10;
    pub const STRING: u8 = 20;
    pub const LIST: u8 = 30;
    pub const LIST_END: u8 = 40;
    pub const CYCLE: u8 = 50;
}

/// Visitor over canonical children; receives the context back so children
/// can be resolved recursively.
pub type CanonicalVisit<'v> = dyn FnMut(&mut Context, &dyn Expression) -> Result<()> + 'v;

/// An expression with a list-like canonical form.
pub trait CanonicalList {
    /// Visits the logical elements in a deterministic order.
    fn iter_canonical(&self, ctx: &mut Context, visit: &mut CanonicalVisit<'_>) -> Result<()>;
}

/// Resolves the canonical identifier of `expr`.
///
/// Order: the value's own `canonical_id`, then its canonical form, then the
/// structural hash. A value that is opaque to structural hashing and answers
/// neither of the first two fails with [`CoreError::UnsupportedType`].
pub fn resolve(ctx: &mut Context, expr: &dyn Expression) -> Result<Identifier> {
    let mut on_path = HashSet::new();
    resolve_on_path(ctx, expr, &mut on_path)
}

fn resolve_on_path(
    ctx: &mut Context,
    expr: &dyn Expression,
    on_path: &mut HashSet<RefKey>,
) -> Result<Identifier> {
    if let Some(id) = expr.canonical_id(ctx)? {
        return Ok(id);
    }

    if let Some(list) = expr.canonical_form() {
        let own_key = expr.ref_key();
        if let Some(key) = own_key {
            on_path.insert(key);
        }

        let mut state = Sha256::new();
        state.update([tag::LIST]);
        list.iter_canonical(ctx, &mut |ctx, child| {
            ctx.yield_point()?;
            if let Some(key) = child.ref_key() {
                if on_path.contains(&key) {
                    state.update([tag::CYCLE]);
                    return Ok(());
                }
            }
            let child_id = resolve_on_path(ctx, child, on_path)?;
            write_string(&mut state, &child_id.to_string());
            Ok(())
        })?;
        state.update([tag::LIST_END]);

        if let Some(key) = own_key {
            on_path.remove(&key);
        }
        return Ok(Identifier::new(CANONICAL_KIND, hex::encode(state.finalize())));
    }

    if expr.is_opaque() {
        return Err(CoreError::UnsupportedType {
            type_name: expr.type_name(),
        }
        .into());
    }
    dshash::identifier(expr)
}

fn write_string(state: &mut Sha256, value: &str) {
    state.update([tag::STRING]);
    state.update((value.len() as i64).to_le_bytes());
    state.update(value.as_bytes());
}
