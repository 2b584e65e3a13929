//! Error types for the core expression model.
//!
//! Covers cooperative cancellation, identity resolution failures and
//! malformed identifiers.

use thiserror::Error;

/// Errors raised by the expression core.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CoreError {
    /// A yield point observed a stop signal from the context's yield predicate.
    #[error("Operation canceled")]
    Canceled,

    /// A value offered no identity, no canonical form and no structural encoding.
    #[error("Unsupported type for canonical identity: {type_name}")]
    UnsupportedType {
        /// Rust type name of the offending value
        type_name: &'static str,
    },

    /// Textual identifier did not have the `<kind>:<key>` shape.
    #[error("Invalid identifier '{input}': {reason}")]
    InvalidIdentifier {
        /// The rejected input
        input: String,
        /// What was wrong with it
        reason: &'static str,
    },
}

impl CoreError {
    /// Check if this error is a cooperative cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, CoreError::Canceled)
    }

    /// Check if this error reports a value with no defined encoding.
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, CoreError::UnsupportedType { .. })
    }

    /// Check if this error came from identifier parsing.
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, CoreError::InvalidIdentifier { .. })
    }
}

impl From<CoreError> for crate::Error {
    fn from(err: CoreError) -> Self {
        crate::Error::Core(err)
    }
}
