use std::fmt;

use super::{CollectionError, Element, List, ListVisit, Position, RandomAccessList, SortedList};
use crate::Result;
use crate::core::{CanonicalList, CanonicalVisit, Context, Expression, TransformKind};
use crate::dshash::{Encoder, StructuralHash};

/// Flat, indexable list.
///
/// As a [`SortedList`] it assumes its elements are already in ascending
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Array<T>(pub Vec<T>);

impl<T> Array<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: fmt::Display> fmt::Display for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Array[")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

impl<T: StructuralHash> StructuralHash for Array<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        self.0.encode(enc)
    }

    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Element> Expression for Array<T> {
    fn can_apply(&self, transform: TransformKind) -> bool {
        matches!(transform, TransformKind::ListToArray | TransformKind::CanonicalId)
    }

    fn canonical_form(&self) -> Option<&dyn CanonicalList> {
        Some(self)
    }
}

impl<T: Element> CanonicalList for Array<T> {
    fn iter_canonical(&self, ctx: &mut Context, visit: &mut CanonicalVisit<'_>) -> Result<()> {
        for item in &self.0 {
            visit(ctx, item)?;
        }
        Ok(())
    }
}

impl<T: Element> List<T> for Array<T> {
    fn length(&self, _ctx: &mut Context) -> Result<usize> {
        Ok(self.0.len())
    }

    fn iter_list(&self, ctx: &mut Context, visit: &mut ListVisit<'_, T>) -> Result<()> {
        for item in &self.0 {
            if visit(ctx, item)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    fn as_dyn_list(&self) -> &dyn List<T> {
        self
    }

    fn as_random_access(&self) -> Option<&dyn RandomAccessList<T>> {
        Some(self)
    }
}

impl<T: Element> RandomAccessList<T> for Array<T> {
    fn at(&self, _ctx: &mut Context, index: usize) -> Result<T> {
        self.0.get(index).cloned().ok_or_else(|| {
            CollectionError::IndexOutOfBounds {
                index,
                len: self.0.len(),
            }
            .into()
        })
    }
}

impl<T: Element + Ord> SortedList<T> for Array<T> {
    fn binary_search(&self, _ctx: &mut Context, target: &T) -> Result<Position> {
        Ok(match self.0.binary_search(target) {
            Ok(index) => Position::Found(index),
            Err(insertion) => Position::NotFound(insertion),
        })
    }
}
