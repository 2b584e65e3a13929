//! Error types for collection queries.

use thiserror::Error;

/// Errors raised by dict and list operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Lookup of a key that is not bound.
    #[error("Key not found: {key}")]
    KeyNotFound {
        /// Textual form of the missing key
        key: String,
    },

    /// Index or insertion position outside the list.
    #[error("Index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds {
        /// The offending index
        index: usize,
        /// Length of the list at the time of the call
        len: usize,
    },
}

impl CollectionError {
    /// Check if this error indicates a missing key or index.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CollectionError::KeyNotFound { .. } | CollectionError::IndexOutOfBounds { .. }
        )
    }

    /// Check if this error is an out-of-range index.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, CollectionError::IndexOutOfBounds { .. })
    }
}

impl From<CollectionError> for crate::Error {
    fn from(err: CollectionError) -> Self {
        crate::Error::Collection(err)
    }
}
