//! Backing store error definitions

use std::error::Error;
use std::fmt;

/// Backing store error types
///
/// Represents all possible errors surfaced by the storage backends during
/// opens, array reads/writes, transactions, and connection teardown.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error from the underlying filesystem
    IoError(std::io::Error),
    /// Operation on a closed connection
    Closed,
    /// Write or transaction on a read-only store
    ReadOnly,
    /// Named array not present in the group
    ArrayNotFound(String),
    /// Bad magic or checksum mismatch in a persisted record
    Corrupt(String),
    /// Error encoding an array for persistence
    EncodeError(serde_json::Error),
    /// Error decoding a persisted array
    DecodeError(serde_json::Error),
    /// Commit or rollback without an open transaction
    NoTransaction,
    /// Begin while a transaction is already open
    TransactionActive,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError(err) => write!(f, "I/O error: {}", err),
            StoreError::Closed => write!(f, "Store connection is closed"),
            StoreError::ReadOnly => write!(f, "Store is read-only"),
            StoreError::ArrayNotFound(name) => write!(f, "Array not found: {}", name),
            StoreError::Corrupt(msg) => write!(f, "Corrupt store data: {}", msg),
            StoreError::EncodeError(err) => write!(f, "Encode error: {}", err),
            StoreError::DecodeError(err) => write!(f, "Decode error: {}", err),
            StoreError::NoTransaction => write!(f, "No open transaction"),
            StoreError::TransactionActive => write!(f, "Transaction already open"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::IoError(err) => Some(err),
            StoreError::EncodeError(err) | StoreError::DecodeError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError(err)
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
