//! Identifiers: the `(kind, key)` tokens used as content addresses and as
//! optimistic-concurrency version witnesses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Context, CoreError, Expression};
use crate::{Result, structural_record};

/// An identity token for an expression.
///
/// `kind` names the identity scheme (`"int"`, `"string"`, `"dshash-sha256"`,
/// `"canonical-sha256"`, ...) and `key` is the scheme-specific payload. Two
/// identifiers are equal iff both fields match.
///
/// The textual form is `"<kind>:<key>"`. The default (empty) identifier is
/// the "nothing stored yet" sentinel used for a fresh database root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Identifier {
    kind: String,
    key: String,
}

structural_record!(Identifier { kind => "Kind", key => "Key" });

impl Identifier {
    /// Creates an identifier from its two parts.
    pub fn new(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// The identity scheme.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The scheme-specific payload.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns true for the empty sentinel identifier.
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty() && self.key.is_empty()
    }

    /// Parses the textual `"<kind>:<key>"` form.
    ///
    /// The split happens at the first `:`, so keys may themselves contain colons.
    pub fn parse(input: &str) -> Result<Self> {
        let Some((kind, key)) = input.split_once(':') else {
            return Err(CoreError::InvalidIdentifier {
                input: input.to_string(),
                reason: "missing ':' separator",
            }
            .into());
        };
        if kind.is_empty() {
            return Err(CoreError::InvalidIdentifier {
                input: input.to_string(),
                reason: "empty kind",
            }
            .into());
        }
        Ok(Self::new(kind, key))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.key)
    }
}

impl FromStr for Identifier {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Expression for Identifier {
    fn logical_id(&self) -> Option<Identifier> {
        Some(self.clone())
    }

    fn physical_id(&self) -> Option<Identifier> {
        Some(self.clone())
    }

    fn canonical_id(&self, _ctx: &mut Context) -> Result<Option<Identifier>> {
        Ok(Some(self.clone()))
    }
}

// Serialized as the textual form so identifiers read naturally in JSON.
impl Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(Identifier::default());
        }
        Identifier::parse(&s).map_err(serde::de::Error::custom)
    }
}
