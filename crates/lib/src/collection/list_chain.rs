//! Iterative walks over list decorator chains.
//!
//! The list counterpart of the dict chain walks: a chain is unwound top-down
//! into its edits and the first non-decorator list, then resolved or replayed
//! against that base without recursing through each decorator.

use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ops::ControlFlow;
use std::sync::Arc;

use super::{
    Array, CollectionError, Element, List, ListEdit, ListVisit, Position, RandomAccessList,
};
use crate::Result;
use crate::core::Context;

/// An owned link of a list chain, released one level at a time.
#[doc(hidden)]
pub trait ListLink<T> {
    /// Takes the next link out of this one if this is the last owner, then
    /// releases this one.
    fn unlink(self: Box<Self>) -> Option<Box<dyn ListLink<T>>>;
}

impl<T: Element, L: List<T> + ?Sized> ListLink<T> for Arc<L> {
    fn unlink(mut self: Box<Self>) -> Option<Box<dyn ListLink<T>>> {
        Arc::get_mut(&mut self).and_then(|list| list.detach_base())
    }
}

/// Edits from top to bottom, and the base they apply to.
struct Unwound<'a, T: Element> {
    edits: Vec<ListEdit<'a, T>>,
    base: &'a dyn List<T>,
}

fn unwind<'a, T: Element>(ctx: &mut Context, top: &'a dyn List<T>) -> Result<Unwound<'a, T>> {
    let mut edits = Vec::new();
    let mut current = top;
    while let Some(edit) = current.list_edit() {
        ctx.yield_point()?;
        current = edit.base();
        edits.push(edit);
    }
    Ok(Unwound {
        edits,
        base: current,
    })
}

/// Element at `index`, translating the index through each edit on the way
/// down to the base.
pub(super) fn at<T: Element>(ctx: &mut Context, top: &dyn List<T>, index: usize) -> Result<T> {
    let len = top.length(ctx)?;
    if index >= len {
        return Err(CollectionError::IndexOutOfBounds { index, len }.into());
    }

    let mut index = index;
    let mut current = top;
    while let Some(edit) = current.list_edit() {
        ctx.yield_point()?;
        let base = edit.base();
        match edit {
            ListEdit::Append { element, .. } => {
                if index == base.length(ctx)? {
                    return Ok(element.clone());
                }
            }
            ListEdit::Insert {
                position, element, ..
            } => {
                if index == position {
                    return Ok(element.clone());
                }
                if index > position {
                    index -= 1;
                }
            }
            ListEdit::RemoveAt { position, .. }
            | ListEdit::RemoveElement {
                removed: Some(position),
                ..
            } => {
                if index >= position {
                    index += 1;
                }
            }
            ListEdit::RemoveElement { removed: None, .. } => {}
        }
        current = base;
    }

    if let Some(list) = current.as_random_access() {
        return list.at(ctx, index);
    }
    let mut seen = 0;
    let mut found = None;
    current.iter_list(ctx, &mut |_, item| {
        if seen == index {
            found = Some(item.clone());
            return Ok(ControlFlow::Break(()));
        }
        seen += 1;
        Ok(ControlFlow::Continue(()))
    })?;
    found.ok_or_else(|| CollectionError::IndexOutOfBounds { index, len: seen }.into())
}

/// Binary search over indexed access.
pub(super) fn binary_search<T: Element + Ord>(
    ctx: &mut Context,
    list: &dyn RandomAccessList<T>,
    target: &T,
) -> Result<Position> {
    let mut low = 0;
    let mut high = list.length(ctx)?;
    while low < high {
        ctx.yield_point()?;
        let mid = low + (high - low) / 2;
        match list.at(ctx, mid)?.cmp(target) {
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
            Ordering::Equal => return Ok(Position::Found(mid)),
        }
    }
    Ok(Position::NotFound(low))
}

/// Copies the chain into `into`: the base once, then every edit bottom-up.
/// `into` is cleared first and keeps its capacity.
pub(super) fn materialize<T: Element>(
    ctx: &mut Context,
    top: &dyn List<T>,
    into: &mut Vec<T>,
) -> Result<()> {
    let Unwound { edits, base } = unwind(ctx, top)?;

    into.clear();
    match base.as_any().downcast_ref::<Array<T>>() {
        Some(flat) => into.extend_from_slice(&flat.0),
        None => {
            into.reserve(base.length(ctx)?);
            base.iter_list(ctx, &mut |ctx, item| {
                ctx.yield_point()?;
                into.push(item.clone());
                Ok(ControlFlow::Continue(()))
            })?;
        }
    }

    for edit in edits.iter().rev() {
        ctx.yield_point()?;
        match *edit {
            ListEdit::Append { element, .. } => into.push(element.clone()),
            ListEdit::Insert {
                position, element, ..
            } => {
                if position > into.len() {
                    return Err(CollectionError::IndexOutOfBounds {
                        index: position,
                        len: into.len(),
                    }
                    .into());
                }
                into.insert(position, element.clone());
            }
            ListEdit::RemoveAt { position, .. }
            | ListEdit::RemoveElement {
                removed: Some(position),
                ..
            } => {
                if position >= into.len() {
                    return Err(CollectionError::IndexOutOfBounds {
                        index: position,
                        len: into.len(),
                    }
                    .into());
                }
                into.remove(position);
            }
            ListEdit::RemoveElement { removed: None, .. } => {}
        }
    }
    tracing::trace!(size = into.len(), depth = edits.len(), "Materialized list chain");
    Ok(())
}

/// Visits the chain's elements in order.
pub(super) fn iter<T: Element>(
    ctx: &mut Context,
    top: &dyn List<T>,
    visit: &mut ListVisit<'_, T>,
) -> Result<()> {
    let mut flat = Vec::new();
    materialize(ctx, top, &mut flat)?;
    for item in &flat {
        if visit(ctx, item)?.is_break() {
            break;
        }
    }
    Ok(())
}

/// Swaps a decorator's base for an empty one when the base is itself a
/// decorator, so the caller can release the rest of the chain iteratively.
pub(super) fn take_base<T, B>(
    base: &mut Arc<B>,
    empty: impl FnOnce() -> Arc<B>,
) -> Option<Box<dyn ListLink<T>>>
where
    T: Element,
    B: List<T> + ?Sized + 'static,
{
    base.list_edit()?;
    Some(Box::new(mem::replace(base, empty())))
}

/// Drops a detached chain link by link.
pub(super) fn dismantle<T>(first: Box<dyn ListLink<T>>) {
    let mut next = Some(first);
    while let Some(link) = next.take() {
        next = link.unlink();
    }
}

/// Writes the chain as nested constructor calls without recursing.
pub(super) fn display<T: Element>(top: &dyn List<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut edits = Vec::new();
    let mut current = top;
    while let Some(edit) = current.list_edit() {
        f.write_str(match edit {
            ListEdit::Append { .. } => "ListAppend(",
            ListEdit::Insert { .. } => "ListInsert(",
            ListEdit::RemoveAt { .. } => "ListRemoveAt(",
            ListEdit::RemoveElement { .. } => "ListRemoveElement(",
        })?;
        current = edit.base();
        edits.push(edit);
    }
    write!(f, "{current}")?;
    for edit in edits.iter().rev() {
        match edit {
            ListEdit::Append { element, .. } => write!(f, ", {element})")?,
            ListEdit::Insert {
                position, element, ..
            } => write!(f, ", {position}, {element})")?,
            ListEdit::RemoveAt { position, .. } => write!(f, ", {position})")?,
            ListEdit::RemoveElement { element, .. } => write!(f, ", {element})")?,
        }
    }
    Ok(())
}

/// Number of decorators above the base.
pub(super) fn depth<T: Element>(top: &dyn List<T>) -> usize {
    let mut depth = 0;
    let mut current = top;
    while let Some(edit) = current.list_edit() {
        depth += 1;
        current = edit.base();
    }
    depth
}
