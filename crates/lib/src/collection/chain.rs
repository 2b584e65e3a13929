//! Iterative walks over dict delta chains.
//!
//! A chain is unwound top-down into a work list of edits ending at the first
//! non-delta dict (the base). Queries then resolve against the list instead
//! of recursing through each decorator.

use std::collections::HashMap;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use super::{Dict, DictEdit, DictKey, DictVisit, Element, Map};
use crate::Result;
use crate::core::Context;

/// Edits from top to bottom, and the base they apply to.
pub(super) struct Unwound<'a, K: DictKey, V: Element> {
    pub edits: Vec<DictEdit<'a, K, V>>,
    pub base: &'a dyn Dict<K, V>,
}

pub(super) fn unwind<'a, K: DictKey, V: Element>(
    ctx: &mut Context,
    top: &'a dyn Dict<K, V>,
) -> Result<Unwound<'a, K, V>> {
    let mut edits = Vec::new();
    let mut current = top;
    while let Some(edit) = current.edit() {
        ctx.yield_point()?;
        current = edit.base().as_ref();
        edits.push(edit);
    }
    Ok(Unwound {
        edits,
        base: current,
    })
}

/// Outcome of resolving one key against a chain.
pub(super) enum Lookup<'a, K: DictKey, V: Element> {
    /// Bound by an edit.
    Bound(&'a V),
    /// Unbound by an edit.
    Removed,
    /// No edit touches the key; ask the base.
    Base(&'a dyn Dict<K, V>),
}

pub(super) fn lookup<'a, K: DictKey, V: Element>(
    ctx: &mut Context,
    top: &'a dyn Dict<K, V>,
    key: &K,
) -> Result<Lookup<'a, K, V>> {
    let mut current = top;
    while let Some(edit) = current.edit() {
        ctx.yield_point()?;
        match edit {
            DictEdit::Set {
                key: k, value, ..
            } if k == key => return Ok(Lookup::Bound(value)),
            DictEdit::Remove { key: k, .. } if k == key => return Ok(Lookup::Removed),
            _ => current = edit.base().as_ref(),
        }
    }
    Ok(Lookup::Base(current))
}

/// Size of the chain: base size adjusted by replaying presence changes
/// bottom-up.
pub(super) fn size<K: DictKey, V: Element>(
    ctx: &mut Context,
    top: &dyn Dict<K, V>,
) -> Result<usize> {
    let Unwound { edits, base } = unwind(ctx, top)?;
    let mut size = base.size(ctx)?;
    let mut present: HashMap<&K, bool> = HashMap::new();
    for edit in edits.iter().rev() {
        ctx.yield_point()?;
        let (key, after) = match edit {
            DictEdit::Set { key, .. } => (*key, true),
            DictEdit::Remove { key, .. } => (*key, false),
        };
        let before = match present.get(key) {
            Some(before) => *before,
            None => base.exists(ctx, key)?,
        };
        if before != after {
            if after {
                size += 1;
            } else {
                size -= 1;
            }
        }
        present.insert(key, after);
    }
    Ok(size)
}

/// Where a touched key ends up after all edits.
enum Slot<'a, V> {
    /// Still at its base position, with a new value.
    InPlace(&'a V),
    /// Moved after the base entries, at `order[index]`.
    Appended(&'a V, usize),
    Absent,
}

/// Iterates the chain in the order nested decorators would produce: base
/// order with values replaced in place, then keys that were absent when set,
/// in the order they were set. A key removed and set again moves to the end.
pub(super) fn iter<K: DictKey, V: Element>(
    ctx: &mut Context,
    top: &dyn Dict<K, V>,
    visit: &mut DictVisit<'_, K, V>,
) -> Result<()> {
    let Unwound { edits, base } = unwind(ctx, top)?;

    let mut slots: HashMap<&K, Slot<'_, V>> = HashMap::new();
    let mut order: Vec<&K> = Vec::new();
    for edit in edits.iter().rev() {
        ctx.yield_point()?;
        match edit {
            DictEdit::Set { key, value, .. } => {
                let slot = match slots.get(*key) {
                    Some(Slot::InPlace(_)) => Slot::InPlace(*value),
                    Some(Slot::Appended(_, index)) => Slot::Appended(*value, *index),
                    Some(Slot::Absent) => {
                        order.push(*key);
                        Slot::Appended(*value, order.len() - 1)
                    }
                    None => {
                        if base.exists(ctx, key)? {
                            Slot::InPlace(*value)
                        } else {
                            order.push(*key);
                            Slot::Appended(*value, order.len() - 1)
                        }
                    }
                };
                slots.insert(*key, slot);
            }
            DictEdit::Remove { key, .. } => {
                slots.insert(*key, Slot::Absent);
            }
        }
    }

    let mut stopped = false;
    base.iter_dict(ctx, &mut |ctx, key, value| {
        let flow = match slots.get(key) {
            None => visit(ctx, key, value)?,
            Some(Slot::InPlace(value)) => visit(ctx, key, *value)?,
            Some(_) => ControlFlow::Continue(()),
        };
        stopped = flow.is_break();
        Ok(flow)
    })?;
    if stopped {
        return Ok(());
    }

    for (index, key) in order.iter().enumerate() {
        if let Some(Slot::Appended(value, at)) = slots.get(*key) {
            if *at == index && visit(ctx, *key, *value)?.is_break() {
                break;
            }
        }
    }
    Ok(())
}

/// Copies the chain into a flat map: the base once, then every edit
/// bottom-up.
pub(super) fn materialize<K: DictKey, V: Element>(
    ctx: &mut Context,
    top: &dyn Dict<K, V>,
    into: &mut Map<K, V>,
) -> Result<()> {
    let Unwound { edits, base } = unwind(ctx, top)?;

    into.0.clear();
    match base.as_any().downcast_ref::<Map<K, V>>() {
        Some(flat) => into.0.clone_from(&flat.0),
        None => {
            into.0.reserve(base.size(ctx)?);
            base.iter_dict(ctx, &mut |ctx, key, value| {
                ctx.yield_point()?;
                into.0.insert(key.clone(), value.clone());
                Ok(ControlFlow::Continue(()))
            })?;
        }
    }

    for edit in edits.iter().rev() {
        ctx.yield_point()?;
        match edit {
            DictEdit::Set { key, value, .. } => {
                into.0.insert((*key).clone(), (*value).clone());
            }
            DictEdit::Remove { key, .. } => {
                into.0.remove(*key);
            }
        }
    }
    tracing::trace!(size = into.0.len(), depth = edits.len(), "Materialized dict chain");
    Ok(())
}

/// Drops a chain link by link. Each uniquely owned delta hands over its
/// base before it is released, so no drop recurses more than one level.
pub(super) fn dismantle<K: DictKey, V: Element>(first: Arc<dyn Dict<K, V>>) {
    let mut next = Some(first);
    while let Some(mut link) = next.take() {
        next = Arc::get_mut(&mut link).and_then(|inner| inner.detach_base());
    }
}

/// Writes the chain as nested constructor calls without recursing.
pub(super) fn display<K: DictKey, V: Element>(
    top: &dyn Dict<K, V>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let mut edits = Vec::new();
    let mut current = top;
    while let Some(edit) = current.edit() {
        f.write_str(match edit {
            DictEdit::Set { .. } => "DictSet(",
            DictEdit::Remove { .. } => "DictRemove(",
        })?;
        current = edit.base().as_ref();
        edits.push(edit);
    }
    write!(f, "{current}")?;
    for edit in edits.iter().rev() {
        match edit {
            DictEdit::Set { key, value, .. } => write!(f, ", {key}, {value})")?,
            DictEdit::Remove { key, .. } => write!(f, ", {key})")?,
        }
    }
    Ok(())
}

/// Number of delta links above the base.
pub(super) fn depth<K: DictKey, V: Element>(top: &dyn Dict<K, V>) -> usize {
    let mut depth = 0;
    let mut current = top;
    while let Some(edit) = current.edit() {
        depth += 1;
        current = edit.base().as_ref();
    }
    depth
}
