//! Column-group table module
//!
//! A [`Table`] wraps one opened group in the backing store and exposes
//! schema derivation, row-count reconciliation, byte accounting, and
//! row/column selection. Bulk ingest of a [`RecordArray`] runs inside a
//! single store transaction.

// Re-export error types and result type
pub mod error;
pub use error::{TableError, TableResult};

pub mod record;
pub use record::RecordArray;

pub mod select;
pub use select::{IndexArray, SelectKey, Selection};

mod table;
pub use table::Table;

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
