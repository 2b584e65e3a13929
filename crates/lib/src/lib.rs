//!
//! ArborDB: a content-addressed store for immutable values.
//!
//! Every value admitted to the store is an [`Expression`](core::Expression):
//! something with a deterministic structural encoding and, optionally,
//! richer identity and collection capabilities.
//!
//! ## Core Concepts
//!
//! * **Structural hashing (`dshash`)**: a deterministic SHA-256 digest of a
//!   value's shape. Field order, map insertion order and zero-valued fields
//!   do not affect it; self-references are encoded as cycle markers.
//! * **Identity (`core::Identifier`)**: `(kind, key)` tokens rendered as
//!   `"<kind>:<key>"`. Values may expose logical, physical and canonical
//!   identities; the resolvers in `core` fall back to structural hashing.
//! * **Collections (`collection`)**: associative `Dict`s and sequential
//!   `List`s with O(1) persistent edits expressed as delta decorators over
//!   an unchanged base, and transforms that materialize them into flat
//!   `Map`s and `Array`s.
//! * **Storage (`storage`)**: the `PhysicalStorage` interface that maps
//!   identifiers to stored values, with an in-memory implementation.
//! * **Transactions (`kvdb`)**: a string key/value database whose root is a
//!   single stored map, updated through optimistic compare-and-swap commits.
//! * **Context (`core::Context`)**: ambient state threaded through every
//!   operation: the storage handle, accumulated cost and cooperative
//!   cancellation.

pub mod collection;
pub mod constants;
pub mod core;
pub mod dshash;
pub mod kvdb;
pub mod scalar;
pub mod storage;

/// Result type used throughout the ArborDB library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the ArborDB library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured errors from the expression core
    #[error(transparent)]
    Core(core::CoreError),

    /// Structured errors from the collection module
    #[error(transparent)]
    Collection(collection::CollectionError),

    /// Structured errors from storage backends
    #[error(transparent)]
    Storage(storage::StorageError),

    /// Structured errors from the transaction engine
    #[error(transparent)]
    Transaction(kvdb::TransactionError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Core(_) => "core",
            Error::Collection(_) => "collection",
            Error::Storage(_) => "storage",
            Error::Transaction(_) => "kvdb",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a key, index or stored value was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Collection(collection_err) => collection_err.is_not_found(),
            Error::Storage(storage_err) => storage_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a value of the wrong type.
    pub fn is_type_mismatch(&self) -> bool {
        match self {
            Error::Storage(storage_err) => storage_err.is_type_mismatch(),
            Error::Transaction(txn_err) => txn_err.is_type_mismatch(),
            _ => false,
        }
    }

    /// Check if this error is an optimistic concurrency conflict.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Transaction(txn_err) => txn_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error is a cooperative cancellation.
    pub fn is_canceled(&self) -> bool {
        match self {
            Error::Core(core_err) => core_err.is_canceled(),
            _ => false,
        }
    }

    /// Check if this error reports a value with no defined encoding.
    pub fn is_unsupported_type(&self) -> bool {
        match self {
            Error::Core(core_err) => core_err.is_unsupported_type(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
