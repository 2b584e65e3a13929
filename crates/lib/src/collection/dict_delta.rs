use std::fmt;
use std::mem;
use std::sync::Arc;

use super::{CollectionError, Dict, DictKey, DictVisit, Element, Map, chain};
use crate::Result;
use crate::core::{CanonicalList, CanonicalVisit, Context, Expression, TransformKind};
use crate::dshash::{Encoder, StructuralHash};

/// The one edit a delta decorator applies to its base.
pub enum DictEdit<'a, K: DictKey, V: Element> {
    Set {
        base: &'a Arc<dyn Dict<K, V>>,
        key: &'a K,
        value: &'a V,
    },
    Remove {
        base: &'a Arc<dyn Dict<K, V>>,
        key: &'a K,
    },
}

impl<'a, K: DictKey, V: Element> DictEdit<'a, K, V> {
    pub fn base(&self) -> &'a Arc<dyn Dict<K, V>> {
        match self {
            DictEdit::Set { base, .. } | DictEdit::Remove { base, .. } => *base,
        }
    }

    pub fn key(&self) -> &'a K {
        match self {
            DictEdit::Set { key, .. } | DictEdit::Remove { key, .. } => *key,
        }
    }
}

/// `base` with `key` bound to `value`, overwriting any prior binding.
pub struct DictSet<K: DictKey, V: Element> {
    base: Arc<dyn Dict<K, V>>,
    key: K,
    value: V,
}

/// `base` with `key` unbound.
pub struct DictRemove<K: DictKey, V: Element> {
    base: Arc<dyn Dict<K, V>>,
    key: K,
}

impl<K: DictKey, V: Element> DictSet<K, V> {
    pub fn new(base: Arc<dyn Dict<K, V>>, key: K, value: V) -> Self {
        Self { base, key, value }
    }

    pub fn base(&self) -> &Arc<dyn Dict<K, V>> {
        &self.base
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<K: DictKey, V: Element> DictRemove<K, V> {
    pub fn new(base: Arc<dyn Dict<K, V>>, key: K) -> Self {
        Self { base, key }
    }

    pub fn base(&self) -> &Arc<dyn Dict<K, V>> {
        &self.base
    }

    pub fn key(&self) -> &K {
        &self.key
    }
}

// Swaps a delta base out for an empty map so the caller can release the
// rest of the chain iteratively.
fn take_delta_base<K: DictKey, V: Element>(
    base: &mut Arc<dyn Dict<K, V>>,
) -> Option<Arc<dyn Dict<K, V>>> {
    if base.edit().is_none() {
        return None;
    }
    Some(mem::replace(base, Arc::new(Map::<K, V>::new())))
}

/// Identical behaviour for both decorators; they differ only in `edit()`.
macro_rules! impl_dict_delta {
    ($ty:ident) => {
        impl<K: DictKey, V: Element> Dict<K, V> for $ty<K, V> {
            fn get(&self, ctx: &mut Context, key: &K) -> Result<V> {
                match chain::lookup(ctx, self, key)? {
                    chain::Lookup::Bound(value) => Ok(value.clone()),
                    chain::Lookup::Removed => Err(CollectionError::KeyNotFound {
                        key: key.to_string(),
                    }
                    .into()),
                    chain::Lookup::Base(base) => base.get(ctx, key),
                }
            }

            fn exists(&self, ctx: &mut Context, key: &K) -> Result<bool> {
                match chain::lookup(ctx, self, key)? {
                    chain::Lookup::Bound(_) => Ok(true),
                    chain::Lookup::Removed => Ok(false),
                    chain::Lookup::Base(base) => base.exists(ctx, key),
                }
            }

            fn size(&self, ctx: &mut Context) -> Result<usize> {
                chain::size(ctx, self)
            }

            fn iter_dict(&self, ctx: &mut Context, visit: &mut DictVisit<'_, K, V>) -> Result<()> {
                chain::iter(ctx, self, visit)
            }

            fn edit(&self) -> Option<DictEdit<'_, K, V>> {
                Some(self.as_edit())
            }

            fn detach_base(&mut self) -> Option<Arc<dyn Dict<K, V>>> {
                take_delta_base(&mut self.base)
            }
        }

        impl<K: DictKey, V: Element> Drop for $ty<K, V> {
            fn drop(&mut self) {
                if let Some(base) = take_delta_base(&mut self.base) {
                    chain::dismantle(base);
                }
            }
        }

        // Deltas hash as the flat map they stand for.
        impl<K: DictKey, V: Element> StructuralHash for $ty<K, V> {
            fn encode(&self, enc: &mut Encoder) -> Result<()> {
                let mut flat = Map::new();
                chain::materialize(&mut Context::background(), self, &mut flat)?;
                flat.encode(enc)
            }
        }

        impl<K: DictKey, V: Element> Expression for $ty<K, V> {
            fn can_apply(&self, transform: TransformKind) -> bool {
                matches!(transform, TransformKind::DictToMap | TransformKind::CanonicalId)
            }

            fn canonical_form(&self) -> Option<&dyn CanonicalList> {
                Some(self)
            }
        }

        impl<K: DictKey, V: Element> CanonicalList for $ty<K, V> {
            fn iter_canonical(
                &self,
                ctx: &mut Context,
                visit: &mut CanonicalVisit<'_>,
            ) -> Result<()> {
                let mut flat = Map::new();
                chain::materialize(ctx, self, &mut flat)?;
                flat.iter_canonical(ctx, visit)
            }
        }

        impl<K: DictKey, V: Element> fmt::Display for $ty<K, V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                chain::display(self, f)
            }
        }

        impl<K: DictKey, V: Element> fmt::Debug for $ty<K, V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("key", &self.key)
                    .field("depth", &chain::depth(self))
                    .finish_non_exhaustive()
            }
        }
    };
}

impl<K: DictKey, V: Element> DictSet<K, V> {
    fn as_edit(&self) -> DictEdit<'_, K, V> {
        DictEdit::Set {
            base: &self.base,
            key: &self.key,
            value: &self.value,
        }
    }
}

impl<K: DictKey, V: Element> DictRemove<K, V> {
    fn as_edit(&self) -> DictEdit<'_, K, V> {
        DictEdit::Remove {
            base: &self.base,
            key: &self.key,
        }
    }
}

impl_dict_delta!(DictSet);
impl_dict_delta!(DictRemove);
