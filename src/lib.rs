//! Tabstore columnar table store library
//!
//! A logical table is a named group of independently stored column arrays
//! sharing a conceptual row index, persisted through a pluggable backing
//! store. The catalog maps hierarchical table names to physical storage
//! units and manages table lifecycle.

// Global type definitions
pub mod types;

// Import various modules
pub mod access;
pub mod array;
pub mod catalog;
pub mod store;
pub mod table;

// Re-export the main entry points for easier access
pub use array::{ColumnValues, TypedArray};
pub use catalog::{Catalog, NameMode};
pub use store::{OpenOptions, StoreType};
pub use table::{RecordArray, SelectKey, Selection, Table};
pub use types::{Field, ScalarType};
