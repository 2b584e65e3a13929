//! Constants used throughout the ArborDB library.
//!
//! Central definitions for identifier kinds and tuning values.

/// Identifier kind for raw structural hashes.
pub const DSHASH_KIND: &str = "dshash-sha256";

/// Identifier kind for recursive canonical-list hashes.
pub const CANONICAL_KIND: &str = "canonical-sha256";

/// Identifier kind of [`Int`](crate::scalar::Int) scalars.
pub const INT_KIND: &str = "int";

/// Identifier kind of [`Str`](crate::scalar::Str) scalars.
pub const STRING_KIND: &str = "string";
