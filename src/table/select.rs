//! Selection keys and results
//!
//! Selection is an explicit tagged variant: by single column name, by
//! ordered column list, by boolean mask, or by integer row index array.
//! An arbitrary array key is classified by element type through
//! [`SelectKey::from_array`]; anything outside the supported set fails
//! with [`TableError::InvalidKey`].

use crate::array::{ColumnValues, TypedArray};
use crate::table::error::{TableError, TableResult};
use crate::table::record::RecordArray;

/// Integer row-index array, one variant per supported width
#[derive(Debug, Clone, PartialEq)]
pub enum IndexArray {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
}

impl IndexArray {
    /// Number of indices
    pub fn len(&self) -> usize {
        match self {
            IndexArray::Int8(v) => v.len(),
            IndexArray::Int16(v) => v.len(),
            IndexArray::Int32(v) => v.len(),
            IndexArray::Int64(v) => v.len(),
            IndexArray::UInt32(v) => v.len(),
            IndexArray::UInt64(v) => v.len(),
        }
    }

    /// Returns true if there are no indices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve to concrete row offsets against a table of `rows` rows.
    ///
    /// Negative signed indices wrap from the end. Anything that lands
    /// outside `0..rows` fails with `RowIndexOutOfBounds`.
    pub(crate) fn resolve(&self, rows: usize) -> TableResult<Vec<usize>> {
        let raw: Vec<i128> = match self {
            IndexArray::Int8(v) => v.iter().map(|&x| x as i128).collect(),
            IndexArray::Int16(v) => v.iter().map(|&x| x as i128).collect(),
            IndexArray::Int32(v) => v.iter().map(|&x| x as i128).collect(),
            IndexArray::Int64(v) => v.iter().map(|&x| x as i128).collect(),
            IndexArray::UInt32(v) => v.iter().map(|&x| x as i128).collect(),
            IndexArray::UInt64(v) => v.iter().map(|&x| x as i128).collect(),
        };
        raw.into_iter()
            .map(|value| {
                let adjusted = if value < 0 {
                    value + rows as i128
                } else {
                    value
                };
                if adjusted < 0 || adjusted >= rows as i128 {
                    Err(TableError::RowIndexOutOfBounds { index: value, rows })
                } else {
                    Ok(adjusted as usize)
                }
            })
            .collect()
    }
}

/// Tagged selection key
#[derive(Debug, Clone, PartialEq)]
pub enum SelectKey {
    /// One column by name; yields the raw column array
    ByName(String),
    /// Ordered list of columns; yields a record array in the order given
    ByNames(Vec<String>),
    /// Boolean mask over all rows; yields matching rows of every column
    ByMask(Vec<bool>),
    /// Integer row indices; yields gathered rows of every column
    ByIndex(IndexArray),
}

impl SelectKey {
    /// Classify an arbitrary array key by element type.
    ///
    /// One-dimensional boolean arrays become masks; one-dimensional
    /// signed 8/16/32/64-bit and unsigned 32/64-bit integer arrays become
    /// index selections. Any other dtype or a multi-dimensional key is an
    /// invalid key.
    pub fn from_array(array: &TypedArray) -> TableResult<SelectKey> {
        if array.shape().len() != 1 {
            return Err(TableError::InvalidKey(format!(
                "key array must be one-dimensional, got shape {:?}",
                array.shape()
            )));
        }
        match array.values() {
            ColumnValues::Bool(v) => Ok(SelectKey::ByMask(v.clone())),
            ColumnValues::Int8(v) => Ok(SelectKey::ByIndex(IndexArray::Int8(v.clone()))),
            ColumnValues::Int16(v) => Ok(SelectKey::ByIndex(IndexArray::Int16(v.clone()))),
            ColumnValues::Int32(v) => Ok(SelectKey::ByIndex(IndexArray::Int32(v.clone()))),
            ColumnValues::Int64(v) => Ok(SelectKey::ByIndex(IndexArray::Int64(v.clone()))),
            ColumnValues::UInt32(v) => Ok(SelectKey::ByIndex(IndexArray::UInt32(v.clone()))),
            ColumnValues::UInt64(v) => Ok(SelectKey::ByIndex(IndexArray::UInt64(v.clone()))),
            other => Err(TableError::InvalidKey(format!(
                "unsupported key dtype {}",
                other.dtype()
            ))),
        }
    }
}

/// Result of a selection
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Raw column array from a by-name selection
    Column(TypedArray),
    /// Record array from a list, mask, or index selection
    Records(RecordArray),
}

impl Selection {
    /// The column array, if this is a by-name selection result
    pub fn as_column(&self) -> Option<&TypedArray> {
        match self {
            Selection::Column(array) => Some(array),
            Selection::Records(_) => None,
        }
    }

    /// The record array, if this is a composite selection result
    pub fn as_records(&self) -> Option<&RecordArray> {
        match self {
            Selection::Records(records) => Some(records),
            Selection::Column(_) => None,
        }
    }

    /// Consume into the column array
    pub fn into_column(self) -> Option<TypedArray> {
        match self {
            Selection::Column(array) => Some(array),
            Selection::Records(_) => None,
        }
    }

    /// Consume into the record array
    pub fn into_records(self) -> Option<RecordArray> {
        match self {
            Selection::Records(records) => Some(records),
            Selection::Column(_) => None,
        }
    }
}
