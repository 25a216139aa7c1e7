use serde::{Deserialize, Serialize};
use std::fmt;

/// Global type definitions
///
/// Stores the scalar element types and composite field descriptors shared
/// by the array, store, table, and catalog modules.
///
/// Scalar element type of a column array
///
/// Every column array is homogeneous: all of its elements share one of
/// these types. Variable-length types are not supported; a column's shape
/// together with its scalar type fully determines its logical byte size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit unsigned integer
    UInt64,
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point
    Float64,
    /// Boolean
    Bool,
}

impl ScalarType {
    /// Returns the storage size in bytes of one element of this type.
    pub fn size(&self) -> usize {
        match self {
            ScalarType::Int8 | ScalarType::UInt8 | ScalarType::Bool => 1,
            ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => 4,
            ScalarType::Int64 | ScalarType::UInt64 | ScalarType::Float64 => 8,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Int8 => write!(f, "INT8"),
            ScalarType::Int16 => write!(f, "INT16"),
            ScalarType::Int32 => write!(f, "INT32"),
            ScalarType::Int64 => write!(f, "INT64"),
            ScalarType::UInt8 => write!(f, "UINT8"),
            ScalarType::UInt16 => write!(f, "UINT16"),
            ScalarType::UInt32 => write!(f, "UINT32"),
            ScalarType::UInt64 => write!(f, "UINT64"),
            ScalarType::Float32 => write!(f, "FLOAT32"),
            ScalarType::Float64 => write!(f, "FLOAT64"),
            ScalarType::Bool => write!(f, "BOOL"),
        }
    }
}

/// One entry of a composite dtype descriptor
///
/// A table's dtype is the ordered list of fields derived from its columns:
/// the column name, the scalar element type, and the per-row inner shape
/// (empty for flat one-dimensional columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name
    pub name: String,
    /// Element type
    pub dtype: ScalarType,
    /// Shape of one row, excluding the row dimension itself
    pub inner_shape: Vec<usize>,
}

impl Field {
    /// Create a new field descriptor
    pub fn new(name: impl Into<String>, dtype: ScalarType, inner_shape: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            dtype,
            inner_shape,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner_shape.is_empty() {
            write!(f, "{}: {}", self.name, self.dtype)
        } else {
            write!(f, "{}: {} {:?}", self.name, self.dtype, self.inner_shape)
        }
    }
}
