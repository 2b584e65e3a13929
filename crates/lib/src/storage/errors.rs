//! Error types for physical storage backends.
//!
//! These errors cover lookups of content-addressed values and typed
//! retrieval of stored values.

use thiserror::Error;

use crate::core::Identifier;

/// Errors raised by a [`PhysicalStorage`](super::PhysicalStorage) backend.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StorageError {
    /// No value is stored under the identifier.
    #[error("Value not found: {id}")]
    NotFound {
        /// The identifier that was looked up
        id: Identifier,
    },

    /// The stored value is not of the type the caller asked for.
    #[error("Type mismatch for {id}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The identifier that was looked up
        id: Identifier,
        /// Type the caller expected
        expected: &'static str,
        /// Type actually stored
        found: &'static str,
    },
}

impl StorageError {
    /// Check if this error indicates a missing value.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }

    /// Check if this error indicates a stored value of the wrong type.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, StorageError::TypeMismatch { .. })
    }
}

impl From<StorageError> for crate::Error {
    fn from(err: StorageError) -> Self {
        crate::Error::Storage(err)
    }
}
