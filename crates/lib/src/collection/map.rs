use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::{CollectionError, Dict, DictKey, DictVisit, Element, KV};
use crate::Result;
use crate::core::{CanonicalList, CanonicalVisit, Context, Expression, TransformKind};
use crate::dshash::{self, Encoder, StructuralHash};

/// Flat associative collection.
///
/// In-memory order is unspecified; hashing, formatting and canonical
/// iteration order entries by the structural hash of their key.
#[derive(Debug, Clone)]
pub struct Map<K, V>(pub HashMap<K, V>);

impl<K: Eq + Hash, V: PartialEq> PartialEq for Map<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K: Eq + Hash, V: Eq> Eq for Map<K, V> {}

impl<K, V> Default for Map<K, V> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<K: DictKey, V: Element> Map<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries ordered by key digest, ties in iteration order.
    fn sorted_entries(&self) -> Result<Vec<(&K, &V)>> {
        let mut keyed = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            keyed.push((dshash::hash(key)?, key, value));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(keyed.into_iter().map(|(_, k, v)| (k, v)).collect())
    }
}

impl<K: DictKey, V: Element> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K: DictKey, V: Element> fmt::Display for Map<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.sorted_entries().map_err(|_| fmt::Error)?;
        f.write_str("Map{")?;
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

impl<K: DictKey, V: Element> StructuralHash for Map<K, V> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.map(
            self.0
                .iter()
                .map(|(k, v)| (k as &dyn StructuralHash, v as &dyn StructuralHash)),
        )
    }

    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: DictKey, V: Element> Expression for Map<K, V> {
    fn can_apply(&self, transform: TransformKind) -> bool {
        matches!(transform, TransformKind::DictToMap | TransformKind::CanonicalId)
    }

    fn canonical_form(&self) -> Option<&dyn CanonicalList> {
        Some(self)
    }
}

impl<K: DictKey, V: Element> CanonicalList for Map<K, V> {
    fn iter_canonical(&self, ctx: &mut Context, visit: &mut CanonicalVisit<'_>) -> Result<()> {
        for (key, value) in self.sorted_entries()? {
            visit(ctx, &KV::new(key.clone(), value.clone()))?;
        }
        Ok(())
    }
}

impl<K: DictKey, V: Element> Dict<K, V> for Map<K, V> {
    fn get(&self, _ctx: &mut Context, key: &K) -> Result<V> {
        self.0.get(key).cloned().ok_or_else(|| {
            CollectionError::KeyNotFound {
                key: key.to_string(),
            }
            .into()
        })
    }

    fn exists(&self, _ctx: &mut Context, key: &K) -> Result<bool> {
        Ok(self.0.contains_key(key))
    }

    fn size(&self, _ctx: &mut Context) -> Result<usize> {
        Ok(self.0.len())
    }

    fn iter_dict(&self, ctx: &mut Context, visit: &mut DictVisit<'_, K, V>) -> Result<()> {
        for (key, value) in &self.0 {
            if visit(ctx, key, value)?.is_break() {
                break;
            }
        }
        Ok(())
    }
}
