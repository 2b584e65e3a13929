//! Persistent collections.
//!
//! Two capability families: associative [`Dict`]s and sequential [`List`]s.
//! Each family has one flat representation ([`Map`], [`Array`]) and a set
//! of one-edit decorators that answer queries against their own edit first
//! and delegate everything else to the wrapped base. Edits are O(1); queries
//! cost O(chain depth), so callers that need many reads should materialize
//! first with [`DictToMap`] or [`ListToArray`].
//!
//! Chains may be tens of thousands of edits deep. Queries, materialization
//! and drops walk them with an explicit work list instead of recursing.

use std::hash::Hash;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::Result;
use crate::core::{Context, Expression};

mod array;
mod chain;
mod dict_delta;
pub mod errors;
mod kv;
mod list_chain;
mod list_delta;
mod map;
mod materialize;

pub use array::Array;
pub use dict_delta::{DictEdit, DictRemove, DictSet};
pub use errors::CollectionError;
pub use kv::KV;
pub use list_chain::ListLink;
pub use list_delta::{ListAppend, ListEdit, ListInsert, ListRemoveAt, ListRemoveElement};
pub use map::Map;
pub use materialize::{DictToMap, ListToArray, to_array, to_map};

/// Key type usable in a [`Dict`].
pub trait DictKey: Expression + Eq + Hash + Clone {}

impl<T: Expression + Eq + Hash + Clone> DictKey for T {}

/// Value or element type usable in a collection.
pub trait Element: Expression + Clone {}

impl<T: Expression + Clone> Element for T {}

/// Visitor over dict entries. Return `ControlFlow::Break(())` to stop early;
/// an error aborts the walk.
pub type DictVisit<'v, K, V> = dyn FnMut(&mut Context, &K, &V) -> Result<ControlFlow<()>> + 'v;

/// Visitor over list elements, with the same contract as [`DictVisit`].
pub type ListVisit<'v, T> = dyn FnMut(&mut Context, &T) -> Result<ControlFlow<()>> + 'v;

/// Associative capability set.
pub trait Dict<K: DictKey, V: Element>: Expression {
    /// Value bound to `key`; fails with [`CollectionError::KeyNotFound`].
    fn get(&self, ctx: &mut Context, key: &K) -> Result<V>;

    fn exists(&self, ctx: &mut Context, key: &K) -> Result<bool>;

    /// Number of bound keys.
    fn size(&self, ctx: &mut Context) -> Result<usize>;

    /// Visits every `(key, value)` pair once.
    fn iter_dict(&self, ctx: &mut Context, visit: &mut DictVisit<'_, K, V>) -> Result<()>;

    /// The single edit this value applies to its base, for delta decorators.
    fn edit(&self) -> Option<DictEdit<'_, K, V>> {
        None
    }

    /// Takes ownership of the base so chains can be dropped iteratively.
    #[doc(hidden)]
    fn detach_base(&mut self) -> Option<Arc<dyn Dict<K, V>>> {
        None
    }
}

/// Sequential capability set.
pub trait List<T: Element>: Expression {
    fn length(&self, ctx: &mut Context) -> Result<usize>;

    fn is_empty(&self, ctx: &mut Context) -> Result<bool> {
        Ok(self.length(ctx)? == 0)
    }

    /// Visits every element in order.
    fn iter_list(&self, ctx: &mut Context, visit: &mut ListVisit<'_, T>) -> Result<()>;

    /// This value as a plain list. Implementations return `self`; decorators
    /// over richer list traits use it to hand out their base.
    fn as_dyn_list(&self) -> &dyn List<T>;

    /// Indexed access, for lists that support it.
    fn as_random_access(&self) -> Option<&dyn RandomAccessList<T>> {
        None
    }

    /// The single edit this value applies to its base, for list decorators.
    fn list_edit(&self) -> Option<ListEdit<'_, T>> {
        None
    }

    /// Takes ownership of the base so chains can be dropped iteratively.
    #[doc(hidden)]
    fn detach_base(&mut self) -> Option<Box<dyn ListLink<T>>> {
        None
    }
}

/// Indexed access.
pub trait RandomAccessList<T: Element>: List<T> {
    /// Element at `index`; fails with [`CollectionError::IndexOutOfBounds`].
    fn at(&self, ctx: &mut Context, index: usize) -> Result<T>;
}

/// Sorted lists support binary search.
pub trait SortedList<T: Element + Ord>: RandomAccessList<T> {
    fn binary_search(&self, ctx: &mut Context, target: &T) -> Result<Position>;
}

/// Result of a binary search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The target sits at this index.
    Found(usize),
    /// The target is absent and would be inserted at this index.
    NotFound(usize),
}

impl Position {
    /// Signed encoding: the index when found, `-(insertion) - 1` otherwise.
    pub fn to_signed(self) -> i64 {
        match self {
            Position::Found(index) => index as i64,
            Position::NotFound(insertion) => -(insertion as i64) - 1,
        }
    }

    pub fn found(self) -> Option<usize> {
        match self {
            Position::Found(index) => Some(index),
            Position::NotFound(_) => None,
        }
    }
}

/// `base` with `key` bound to `value`.
pub fn set<K: DictKey, V: Element>(
    base: Arc<dyn Dict<K, V>>,
    key: K,
    value: V,
) -> Arc<dyn Dict<K, V>> {
    Arc::new(DictSet::new(base, key, value))
}

/// `base` with `key` unbound.
pub fn remove<K: DictKey, V: Element>(base: Arc<dyn Dict<K, V>>, key: K) -> Arc<dyn Dict<K, V>> {
    Arc::new(DictRemove::new(base, key))
}

/// Type-safe try-cast into the associative capability set.
pub fn as_dict<K: DictKey, V: Element>(expr: Arc<dyn Expression>) -> Option<Arc<dyn Dict<K, V>>> {
    let any = expr.into_any_arc();
    let any = match any.downcast::<Map<K, V>>() {
        Ok(map) => return Some(map as Arc<dyn Dict<K, V>>),
        Err(any) => any,
    };
    let any = match any.downcast::<DictSet<K, V>>() {
        Ok(delta) => return Some(delta as Arc<dyn Dict<K, V>>),
        Err(any) => any,
    };
    any.downcast::<DictRemove<K, V>>()
        .ok()
        .map(|delta| delta as Arc<dyn Dict<K, V>>)
}

/// Type-safe try-cast into the sequential capability set.
///
/// Covers [`Array`], [`ListAppend`], [`ListInsert`] and [`ListRemoveAt`].
/// A [`ListRemoveElement`] needs `T: Ord`; recover it with [`as_sorted_list`].
pub fn as_list<T: Element>(expr: Arc<dyn Expression>) -> Option<Arc<dyn List<T>>> {
    let any = expr.into_any_arc();
    let any = match any.downcast::<Array<T>>() {
        Ok(array) => return Some(array as Arc<dyn List<T>>),
        Err(any) => any,
    };
    let any = match any.downcast::<ListAppend<T>>() {
        Ok(delta) => return Some(delta as Arc<dyn List<T>>),
        Err(any) => any,
    };
    let any = match any.downcast::<ListInsert<T>>() {
        Ok(delta) => return Some(delta as Arc<dyn List<T>>),
        Err(any) => any,
    };
    any.downcast::<ListRemoveAt<T>>()
        .ok()
        .map(|delta| delta as Arc<dyn List<T>>)
}

/// Type-safe try-cast into the sorted capability set, over [`Array`] and
/// [`ListRemoveElement`].
pub fn as_sorted_list<T: Element + Ord>(
    expr: Arc<dyn Expression>,
) -> Option<Arc<dyn SortedList<T>>> {
    let any = expr.into_any_arc();
    let any = match any.downcast::<Array<T>>() {
        Ok(array) => return Some(array as Arc<dyn SortedList<T>>),
        Err(any) => any,
    };
    any.downcast::<ListRemoveElement<T>>()
        .ok()
        .map(|delta| delta as Arc<dyn SortedList<T>>)
}
