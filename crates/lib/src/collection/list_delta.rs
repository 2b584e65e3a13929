//! One-edit list decorators.
//!
//! Each decorator records its length when it is built, so length queries
//! never walk the chain. Indexed access, iteration, materialization and drops
//! unwind the chain through [`List::list_edit`].

use std::fmt;
use std::sync::Arc;

use super::{
    Array, CollectionError, Element, List, ListLink, ListVisit, Position, RandomAccessList,
    SortedList, list_chain, materialize,
};
use crate::Result;
use crate::core::{CanonicalList, CanonicalVisit, Context, Expression, TransformKind};
use crate::dshash::{Encoder, StructuralHash};

/// The one edit a list decorator applies to its base.
pub enum ListEdit<'a, T: Element> {
    Append {
        base: &'a dyn List<T>,
        element: &'a T,
    },
    Insert {
        base: &'a dyn List<T>,
        position: usize,
        element: &'a T,
    },
    RemoveAt {
        base: &'a dyn List<T>,
        position: usize,
    },
    /// `removed` is where the element sat in the base, if it was present.
    RemoveElement {
        base: &'a dyn List<T>,
        element: &'a T,
        removed: Option<usize>,
    },
}

impl<'a, T: Element> ListEdit<'a, T> {
    pub fn base(&self) -> &'a dyn List<T> {
        match self {
            ListEdit::Append { base, .. }
            | ListEdit::Insert { base, .. }
            | ListEdit::RemoveAt { base, .. }
            | ListEdit::RemoveElement { base, .. } => *base,
        }
    }
}

/// `base` with `element` added at the end.
pub struct ListAppend<T: Element> {
    base: Arc<dyn List<T>>,
    element: T,
    len: usize,
}

/// `base` with `element` inserted before index `position`.
pub struct ListInsert<T: Element> {
    base: Arc<dyn RandomAccessList<T>>,
    position: usize,
    element: T,
    len: usize,
}

/// `base` without the element at `position`.
pub struct ListRemoveAt<T: Element> {
    base: Arc<dyn RandomAccessList<T>>,
    position: usize,
    len: usize,
}

/// Sorted `base` without `element`, located by binary search when the
/// decorator is built. When the element is absent the decorator is the
/// identity.
pub struct ListRemoveElement<T: Element + Ord> {
    base: Arc<dyn SortedList<T>>,
    element: T,
    removed: Option<usize>,
    len: usize,
}

impl<T: Element> ListAppend<T> {
    pub fn new(ctx: &mut Context, base: Arc<dyn List<T>>, element: T) -> Result<Self> {
        let len = base.length(ctx)? + 1;
        Ok(Self { base, element, len })
    }
}

impl<T: Element> ListInsert<T> {
    /// Fails with [`CollectionError::IndexOutOfBounds`] unless
    /// `position <= base.length()`.
    pub fn new(
        ctx: &mut Context,
        base: Arc<dyn RandomAccessList<T>>,
        position: usize,
        element: T,
    ) -> Result<Self> {
        let len = base.length(ctx)?;
        if position > len {
            return Err(CollectionError::IndexOutOfBounds { index: position, len }.into());
        }
        Ok(Self {
            base,
            position,
            element,
            len: len + 1,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl<T: Element> ListRemoveAt<T> {
    /// Fails with [`CollectionError::IndexOutOfBounds`] unless
    /// `position < base.length()`.
    pub fn new(
        ctx: &mut Context,
        base: Arc<dyn RandomAccessList<T>>,
        position: usize,
    ) -> Result<Self> {
        let len = base.length(ctx)?;
        if position >= len {
            return Err(CollectionError::IndexOutOfBounds { index: position, len }.into());
        }
        Ok(Self {
            base,
            position,
            len: len - 1,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl<T: Element + Ord> ListRemoveElement<T> {
    pub fn new(ctx: &mut Context, base: Arc<dyn SortedList<T>>, element: T) -> Result<Self> {
        let removed = base.binary_search(ctx, &element)?.found();
        let len = base.length(ctx)? - usize::from(removed.is_some());
        Ok(Self {
            base,
            element,
            removed,
            len,
        })
    }

    /// Former index of the removed element, if the base held it.
    pub fn removed(&self) -> Option<usize> {
        self.removed
    }
}

impl<T: Element> List<T> for ListAppend<T> {
    fn length(&self, _ctx: &mut Context) -> Result<usize> {
        Ok(self.len)
    }

    fn iter_list(&self, ctx: &mut Context, visit: &mut ListVisit<'_, T>) -> Result<()> {
        list_chain::iter(ctx, self, visit)
    }

    fn as_dyn_list(&self) -> &dyn List<T> {
        self
    }

    fn list_edit(&self) -> Option<ListEdit<'_, T>> {
        Some(ListEdit::Append {
            base: self.base.as_dyn_list(),
            element: &self.element,
        })
    }

    fn detach_base(&mut self) -> Option<Box<dyn ListLink<T>>> {
        list_chain::take_base(&mut self.base, || -> Arc<dyn List<T>> {
            Arc::new(Array::<T>::new())
        })
    }
}

impl<T: Element> List<T> for ListInsert<T> {
    fn length(&self, _ctx: &mut Context) -> Result<usize> {
        Ok(self.len)
    }

    fn iter_list(&self, ctx: &mut Context, visit: &mut ListVisit<'_, T>) -> Result<()> {
        list_chain::iter(ctx, self, visit)
    }

    fn as_dyn_list(&self) -> &dyn List<T> {
        self
    }

    fn as_random_access(&self) -> Option<&dyn RandomAccessList<T>> {
        Some(self)
    }

    fn list_edit(&self) -> Option<ListEdit<'_, T>> {
        Some(ListEdit::Insert {
            base: self.base.as_dyn_list(),
            position: self.position,
            element: &self.element,
        })
    }

    fn detach_base(&mut self) -> Option<Box<dyn ListLink<T>>> {
        list_chain::take_base(&mut self.base, || -> Arc<dyn RandomAccessList<T>> {
            Arc::new(Array::<T>::new())
        })
    }
}

impl<T: Element> List<T> for ListRemoveAt<T> {
    fn length(&self, _ctx: &mut Context) -> Result<usize> {
        Ok(self.len)
    }

    fn iter_list(&self, ctx: &mut Context, visit: &mut ListVisit<'_, T>) -> Result<()> {
        list_chain::iter(ctx, self, visit)
    }

    fn as_dyn_list(&self) -> &dyn List<T> {
        self
    }

    fn as_random_access(&self) -> Option<&dyn RandomAccessList<T>> {
        Some(self)
    }

    fn list_edit(&self) -> Option<ListEdit<'_, T>> {
        Some(ListEdit::RemoveAt {
            base: self.base.as_dyn_list(),
            position: self.position,
        })
    }

    fn detach_base(&mut self) -> Option<Box<dyn ListLink<T>>> {
        list_chain::take_base(&mut self.base, || -> Arc<dyn RandomAccessList<T>> {
            Arc::new(Array::<T>::new())
        })
    }
}

impl<T: Element + Ord> List<T> for ListRemoveElement<T> {
    fn length(&self, _ctx: &mut Context) -> Result<usize> {
        Ok(self.len)
    }

    fn iter_list(&self, ctx: &mut Context, visit: &mut ListVisit<'_, T>) -> Result<()> {
        list_chain::iter(ctx, self, visit)
    }

    fn as_dyn_list(&self) -> &dyn List<T> {
        self
    }

    fn as_random_access(&self) -> Option<&dyn RandomAccessList<T>> {
        Some(self)
    }

    fn list_edit(&self) -> Option<ListEdit<'_, T>> {
        Some(ListEdit::RemoveElement {
            base: self.base.as_dyn_list(),
            element: &self.element,
            removed: self.removed,
        })
    }

    fn detach_base(&mut self) -> Option<Box<dyn ListLink<T>>> {
        list_chain::take_base(&mut self.base, || -> Arc<dyn SortedList<T>> {
            Arc::new(Array::<T>::new())
        })
    }
}

impl<T: Element> RandomAccessList<T> for ListInsert<T> {
    fn at(&self, ctx: &mut Context, index: usize) -> Result<T> {
        list_chain::at(ctx, self, index)
    }
}

impl<T: Element> RandomAccessList<T> for ListRemoveAt<T> {
    fn at(&self, ctx: &mut Context, index: usize) -> Result<T> {
        list_chain::at(ctx, self, index)
    }
}

impl<T: Element + Ord> RandomAccessList<T> for ListRemoveElement<T> {
    fn at(&self, ctx: &mut Context, index: usize) -> Result<T> {
        list_chain::at(ctx, self, index)
    }
}

impl<T: Element + Ord> SortedList<T> for ListRemoveElement<T> {
    /// Searches the remaining elements, so the removed element itself is
    /// reported as absent at its former position.
    fn binary_search(&self, ctx: &mut Context, target: &T) -> Result<Position> {
        list_chain::binary_search(ctx, self, target)
    }
}

/// Hashing, canonical form, formatting and dropping shared by every
/// decorator: they all stand for the flat array they materialize to.
macro_rules! impl_list_expression {
    ($ty:ident, [$($bound:tt)+]) => {
        impl<T: $($bound)+> StructuralHash for $ty<T> {
            fn encode(&self, enc: &mut Encoder) -> Result<()> {
                materialize::to_array(&mut Context::background(), self)?.encode(enc)
            }
        }

        impl<T: $($bound)+> Expression for $ty<T> {
            fn can_apply(&self, transform: TransformKind) -> bool {
                matches!(transform, TransformKind::ListToArray | TransformKind::CanonicalId)
            }

            fn canonical_form(&self) -> Option<&dyn CanonicalList> {
                Some(self)
            }
        }

        impl<T: $($bound)+> CanonicalList for $ty<T> {
            fn iter_canonical(
                &self,
                ctx: &mut Context,
                visit: &mut CanonicalVisit<'_>,
            ) -> Result<()> {
                let flat: Array<T> = materialize::to_array(ctx, self)?;
                flat.iter_canonical(ctx, visit)
            }
        }

        impl<T: $($bound)+> fmt::Display for $ty<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                list_chain::display(self, f)
            }
        }

        impl<T: $($bound)+> fmt::Debug for $ty<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("len", &self.len)
                    .field("depth", &list_chain::depth(self))
                    .finish_non_exhaustive()
            }
        }

        impl<T: $($bound)+> Drop for $ty<T> {
            fn drop(&mut self) {
                if let Some(base) = self.detach_base() {
                    list_chain::dismantle(base);
                }
            }
        }
    };
}

impl_list_expression!(ListAppend, [Element]);
impl_list_expression!(ListInsert, [Element]);
impl_list_expression!(ListRemoveAt, [Element]);
impl_list_expression!(ListRemoveElement, [Element + Ord]);
