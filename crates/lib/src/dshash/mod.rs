//! Deterministic structural hashing.
//!
//! Values are encoded into a tagged byte stream fed to SHA-256 so that
//! logically equal values hash equally regardless of how they are laid out
//! in memory: map entries are ordered by the digest of their key, record
//! fields by name with zero-valued fields omitted, and reference cycles are
//! encoded as an explicit marker.
//!
//! Types opt in by implementing [`StructuralHash`]; plain records usually do
//! so through [`structural_record!`](crate::structural_record).

use std::fmt;

use crate::Result;
use crate::constants::DSHASH_KIND;
use crate::core::Identifier;

mod encode;
mod impls;
mod record;

pub use encode::{Encoder, tag};
pub use impls::Opaque;

/// A value with a deterministic structural encoding.
pub trait StructuralHash {
    /// Writes the value's encoding into `enc`.
    fn encode(&self, enc: &mut Encoder) -> Result<()>;

    /// Whether this is the zero value of its type. Zero fields are left out
    /// of record encodings, so adding a defaulted field keeps old digests.
    fn is_zero(&self) -> bool {
        false
    }

    /// Whether the value has no defined encoding. Opaque values encode as
    /// nil and are skipped entirely inside records.
    fn is_opaque(&self) -> bool {
        false
    }
}

/// A SHA-256 structural digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lower-case hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Structural digest of `value`.
pub fn hash<T: StructuralHash + ?Sized>(value: &T) -> Result<Digest> {
    let mut enc = Encoder::new();
    value.encode(&mut enc)?;
    Ok(enc.finish())
}

/// Structural identifier of `value`: kind `dshash-sha256`, hex digest key.
pub fn identifier<T: StructuralHash + ?Sized>(value: &T) -> Result<Identifier> {
    Ok(Identifier::new(DSHASH_KIND, hash(value)?.to_hex()))
}
