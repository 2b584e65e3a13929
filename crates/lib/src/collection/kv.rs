use std::fmt;

use crate::Result;
use crate::core::{CanonicalList, CanonicalVisit, Context, Expression};
use crate::dshash::{Encoder, StructuralHash};

/// A key-value pair, the canonical element of a dict.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KV<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> KV<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for KV<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}: {})", self.key, self.value)
    }
}

impl<K, V> StructuralHash for KV<K, V>
where
    K: StructuralHash + 'static,
    V: StructuralHash + 'static,
{
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.record::<Self>(&[
            ("Key", &self.key as &dyn StructuralHash),
            ("Value", &self.value as &dyn StructuralHash),
        ])
    }

    fn is_zero(&self) -> bool {
        self.key.is_zero() && self.value.is_zero()
    }
}

impl<K: Expression, V: Expression> Expression for KV<K, V> {
    fn canonical_form(&self) -> Option<&dyn CanonicalList> {
        Some(self)
    }
}

impl<K: Expression, V: Expression> CanonicalList for KV<K, V> {
    fn iter_canonical(&self, ctx: &mut Context, visit: &mut CanonicalVisit<'_>) -> Result<()> {
        visit(ctx, &self.key)?;
        visit(ctx, &self.value)
    }
}
