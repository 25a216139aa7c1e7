//! Table error definitions

use crate::array::ArrayError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Table error types
///
/// Represents all possible errors surfaced by table construction, schema
/// queries, selection, and column assignment.
#[derive(Debug)]
pub enum TableError {
    /// Parent directory of the storage location is not readable
    Access(PathBuf),
    /// Shape requested on a table with zero columns
    EmptyTable,
    /// Selection key array has an unsupported element type or shape
    InvalidKey(String),
    /// Column assignment under a name that is not a plain identifier
    UnsupportedKey(String),
    /// Boolean mask length does not match the table row count
    ShapeMismatch {
        /// Table row count
        expected: usize,
        /// Key length actually given
        actual: usize,
    },
    /// Integer selection index outside the table row range
    RowIndexOutOfBounds {
        /// Offending index exactly as given, wide enough for any
        /// supported index dtype
        index: i128,
        /// Table row count
        rows: usize,
    },
    /// Named column not present in the group
    ColumnNotFound(String),
    /// Bulk ingest failed; the transaction was rolled back
    Ingest(String),
    /// Operation on a closed table
    Closed,
    /// Backing store failure
    Store(StoreError),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Access(path) => {
                write!(f, "Parent of {:?} is not readable", path)
            }
            TableError::EmptyTable => write!(f, "Table has no columns"),
            TableError::InvalidKey(msg) => write!(f, "Invalid selection key: {}", msg),
            TableError::UnsupportedKey(name) => {
                write!(f, "Unsupported column key: {}", name)
            }
            TableError::ShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "Mask length {} does not match row count {}",
                    actual, expected
                )
            }
            TableError::RowIndexOutOfBounds { index, rows } => {
                write!(f, "Row index {} out of bounds for {} rows", index, rows)
            }
            TableError::ColumnNotFound(name) => write!(f, "Column not found: {}", name),
            TableError::Ingest(msg) => write!(f, "Bulk ingest failed: {}", msg),
            TableError::Closed => write!(f, "Table is closed"),
            TableError::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TableError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for TableError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ArrayNotFound(name) => TableError::ColumnNotFound(name),
            StoreError::Closed => TableError::Closed,
            other => TableError::Store(other),
        }
    }
}

impl From<ArrayError> for TableError {
    fn from(err: ArrayError) -> Self {
        match err {
            ArrayError::RowOutOfBounds { index, rows } => TableError::RowIndexOutOfBounds {
                index: index as i128,
                rows,
            },
            ArrayError::ShapeDataMismatch { expected, actual } => {
                TableError::ShapeMismatch { expected, actual }
            }
            ArrayError::EmptyShape => TableError::InvalidKey("empty array shape".to_string()),
        }
    }
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
