//! JSON documents as expressions.
//!
//! Arrays and objects resolve canonical identity recursively, objects as
//! `KV` entries in the same key order a [`Map`](crate::collection::Map)
//! uses. Every other JSON value falls back to its structural hash.

use serde_json::Value;

use super::Str;
use crate::Result;
use crate::collection::KV;
use crate::core::{CanonicalList, CanonicalVisit, Context, Expression};
use crate::dshash;

impl Expression for Value {
    fn canonical_form(&self) -> Option<&dyn CanonicalList> {
        match self {
            Value::Array(_) | Value::Object(_) => Some(self),
            _ => None,
        }
    }
}

impl CanonicalList for Value {
    fn iter_canonical(&self, ctx: &mut Context, visit: &mut CanonicalVisit<'_>) -> Result<()> {
        match self {
            Value::Array(items) => {
                for item in items {
                    visit(ctx, item)?;
                }
            }
            Value::Object(map) => {
                let mut entries = map
                    .iter()
                    .map(|(key, value)| Ok((dshash::hash(key.as_str())?, key, value)))
                    .collect::<Result<Vec<_>>>()?;
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                for (_, key, value) in entries {
                    visit(ctx, &KV::new(Str::from(key.as_str()), value.clone()))?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
