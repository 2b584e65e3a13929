//! Leaf scalar expressions.
//!
//! Scalars are their own identity: the logical, physical and canonical
//! identifiers are all `<kind>:<value>`.

use std::fmt;

use crate::Result;
use crate::constants::{INT_KIND, STRING_KIND};
use crate::core::{Context, Expression, Identifier};
use crate::dshash::{Encoder, StructuralHash};

mod json;

/// A signed integer expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Int(pub i64);

impl From<i64> for Int {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StructuralHash for Int {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.int(self.0);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Expression for Int {
    fn logical_id(&self) -> Option<Identifier> {
        Some(Identifier::new(INT_KIND, self.0.to_string()))
    }

    fn physical_id(&self) -> Option<Identifier> {
        self.logical_id()
    }

    fn canonical_id(&self, _ctx: &mut Context) -> Result<Option<Identifier>> {
        Ok(self.logical_id())
    }
}

/// A string expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Str(pub String);

impl Str {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Str {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Str {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StructuralHash for Str {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.str(&self.0);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl Expression for Str {
    fn logical_id(&self) -> Option<Identifier> {
        Some(Identifier::new(STRING_KIND, self.0.clone()))
    }

    fn physical_id(&self) -> Option<Identifier> {
        self.logical_id()
    }

    fn canonical_id(&self, _ctx: &mut Context) -> Result<Option<Identifier>> {
        Ok(self.logical_id())
    }
}
