//! Transaction engine errors.

use thiserror::Error;

use crate::core::Identifier;

/// Errors raised by [`DB`](super::DB) and [`Transaction`](super::Transaction).
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Another transaction advanced the root since this one began.
    ///
    /// Nothing was published. Begin a fresh transaction and re-apply the
    /// edits to retry.
    #[error("Commit conflict: expected root '{expected}', found '{found}'")]
    Conflict {
        /// Root captured when the transaction began
        expected: Identifier,
        /// Root observed at commit time
        found: Identifier,
    },

    /// The transaction was already committed or abandoned.
    #[error("Transaction is already {state}")]
    Finished {
        /// Terminal state the transaction is in
        state: &'static str,
    },

    /// The stored root value is not an associative collection.
    #[error("Root {root} is not a dict (found {found})")]
    RootNotDict {
        /// Root identifier that was loaded
        root: Identifier,
        /// Type actually stored there
        found: &'static str,
    },
}

impl TransactionError {
    /// Check if this error is an optimistic concurrency conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, TransactionError::Conflict { .. })
    }

    /// Check if this error came from reusing a finished transaction.
    pub fn is_finished(&self) -> bool {
        matches!(self, TransactionError::Finished { .. })
    }

    /// Check if this error reports a root of the wrong type.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, TransactionError::RootNotDict { .. })
    }
}

impl From<TransactionError> for crate::Error {
    fn from(err: TransactionError) -> Self {
        crate::Error::Transaction(err)
    }
}
