//! Structured record arrays
//!
//! A [`RecordArray`] is the composite of several named columns sharing a
//! row index: the bulk-ingest input shape and the output of multi-column
//! and indexed selection.

use crate::array::TypedArray;
use crate::types::Field;

/// Ordered composite of named column arrays
#[derive(Debug, Clone, PartialEq)]
pub struct RecordArray {
    fields: Vec<Field>,
    columns: Vec<TypedArray>,
}

impl RecordArray {
    /// Build a record array from named columns, deriving one field
    /// descriptor per column in the order given.
    pub fn new(columns: Vec<(String, TypedArray)>) -> Self {
        let mut fields = Vec::with_capacity(columns.len());
        let mut arrays = Vec::with_capacity(columns.len());
        for (name, array) in columns {
            fields.push(Field::new(name, array.dtype(), array.inner_shape().to_vec()));
            arrays.push(array);
        }
        Self {
            fields,
            columns: arrays,
        }
    }

    /// Ordered field descriptors, one per column
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Column arrays in field order
    pub fn columns(&self) -> &[TypedArray] {
        &self.columns
    }

    /// Field names in order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Look up one column by name
    pub fn column(&self, name: &str) -> Option<&TypedArray> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .map(|i| &self.columns[i])
    }

    /// Number of fields
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record array has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Usable row count: the minimum row count across columns, zero when
    /// there are no columns.
    pub fn row_count(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.row_count())
            .min()
            .unwrap_or(0)
    }
}
