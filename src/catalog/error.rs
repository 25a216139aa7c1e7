//! Catalog error definitions

use crate::table::TableError;
use std::error::Error;
use std::fmt;

/// Catalog error types
///
/// Represents all possible errors that can occur during catalog operations
/// such as table lookup, creation, deletion, and the close-all sweep.
#[derive(Debug)]
pub enum CatalogError {
    /// No readable storage unit at the resolved path
    TableNotFound(String),
    /// Create without replace on an existing storage unit
    TableAlreadyExists(String),
    /// Explicitly disallowed mutation path
    Unsupported(String),
    /// I/O error during catalog operation
    IoError(std::io::Error),
    /// Failure propagated from a table the catalog opened
    Table(TableError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::TableNotFound(name) => write!(f, "Table not found: {}", name),
            CatalogError::TableAlreadyExists(name) => {
                write!(f, "Table already exists: {}", name)
            }
            CatalogError::Unsupported(msg) => write!(f, "Unsupported operation: {}", msg),
            CatalogError::IoError(err) => write!(f, "I/O error: {}", err),
            CatalogError::Table(err) => write!(f, "Table error: {}", err),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CatalogError::IoError(err) => Some(err),
            CatalogError::Table(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::IoError(err)
    }
}

impl From<TableError> for CatalogError {
    fn from(err: TableError) -> Self {
        CatalogError::Table(err)
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
