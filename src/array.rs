//! Typed column arrays
//!
//! A [`TypedArray`] is one fully materialized column: a shape whose first
//! dimension is the row count, and a flat row-major value buffer carried in
//! a [`ColumnValues`] variant per scalar type. Row gathers for selection
//! operate on these in-memory buffers; nothing here touches storage.

use crate::types::ScalarType;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Array error types
#[derive(Debug)]
pub enum ArrayError {
    /// Shape has no dimensions
    EmptyShape,
    /// Shape does not match the number of elements in the value buffer
    ShapeDataMismatch {
        /// Element count implied by the shape
        expected: usize,
        /// Element count actually present
        actual: usize,
    },
    /// Row index out of bounds for a gather
    RowOutOfBounds {
        /// Offending row index
        index: usize,
        /// Number of rows in the array
        rows: usize,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayError::EmptyShape => write!(f, "Array shape must have at least one dimension"),
            ArrayError::ShapeDataMismatch { expected, actual } => {
                write!(
                    f,
                    "Shape implies {} elements but buffer holds {}",
                    expected, actual
                )
            }
            ArrayError::RowOutOfBounds { index, rows } => {
                write!(f, "Row index {} out of bounds for {} rows", index, rows)
            }
        }
    }
}

impl Error for ArrayError {}

/// Flat row-major value buffer, one variant per scalar type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValues {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
}

/// Match over every variant, binding the inner vector
macro_rules! with_values {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            ColumnValues::Int8($v) => $body,
            ColumnValues::Int16($v) => $body,
            ColumnValues::Int32($v) => $body,
            ColumnValues::Int64($v) => $body,
            ColumnValues::UInt8($v) => $body,
            ColumnValues::UInt16($v) => $body,
            ColumnValues::UInt32($v) => $body,
            ColumnValues::UInt64($v) => $body,
            ColumnValues::Float32($v) => $body,
            ColumnValues::Float64($v) => $body,
            ColumnValues::Bool($v) => $body,
        }
    };
}

/// Match over every variant and rewrap the result in the same variant
macro_rules! map_values {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            ColumnValues::Int8($v) => ColumnValues::Int8($body),
            ColumnValues::Int16($v) => ColumnValues::Int16($body),
            ColumnValues::Int32($v) => ColumnValues::Int32($body),
            ColumnValues::Int64($v) => ColumnValues::Int64($body),
            ColumnValues::UInt8($v) => ColumnValues::UInt8($body),
            ColumnValues::UInt16($v) => ColumnValues::UInt16($body),
            ColumnValues::UInt32($v) => ColumnValues::UInt32($body),
            ColumnValues::UInt64($v) => ColumnValues::UInt64($body),
            ColumnValues::Float32($v) => ColumnValues::Float32($body),
            ColumnValues::Float64($v) => ColumnValues::Float64($body),
            ColumnValues::Bool($v) => ColumnValues::Bool($body),
        }
    };
}

impl ColumnValues {
    /// Scalar type of the elements
    pub fn dtype(&self) -> ScalarType {
        match self {
            ColumnValues::Int8(_) => ScalarType::Int8,
            ColumnValues::Int16(_) => ScalarType::Int16,
            ColumnValues::Int32(_) => ScalarType::Int32,
            ColumnValues::Int64(_) => ScalarType::Int64,
            ColumnValues::UInt8(_) => ScalarType::UInt8,
            ColumnValues::UInt16(_) => ScalarType::UInt16,
            ColumnValues::UInt32(_) => ScalarType::UInt32,
            ColumnValues::UInt64(_) => ScalarType::UInt64,
            ColumnValues::Float32(_) => ScalarType::Float32,
            ColumnValues::Float64(_) => ScalarType::Float64,
            ColumnValues::Bool(_) => ScalarType::Bool,
        }
    }

    /// Number of elements in the flat buffer
    pub fn len(&self) -> usize {
        with_values!(self, v => v.len())
    }

    /// Returns true if the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gather whole rows of `inner` elements each at the given row offsets.
    ///
    /// Bounds are the caller's responsibility; every `row * inner` range
    /// must lie inside the buffer.
    fn gather_rows(&self, rows: &[usize], inner: usize) -> ColumnValues {
        map_values!(self, v => gather_slice(v, rows, inner))
    }
}

fn gather_slice<T: Clone>(data: &[T], rows: &[usize], inner: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(rows.len() * inner);
    for &row in rows {
        out.extend_from_slice(&data[row * inner..(row + 1) * inner]);
    }
    out
}

/// One materialized column array
///
/// `shape[0]` is the row count; any further dimensions describe the shape
/// of a single row. The value buffer is flat and row-major, so a row spans
/// `inner_size()` consecutive elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedArray {
    shape: Vec<usize>,
    values: ColumnValues,
}

/// One-dimensional constructor per scalar type
macro_rules! from_vec_ctor {
    ($fn_name:ident, $ty:ty, $variant:ident) => {
        /// Build a flat one-dimensional array from a vector
        pub fn $fn_name(values: Vec<$ty>) -> Self {
            Self {
                shape: vec![values.len()],
                values: ColumnValues::$variant(values),
            }
        }
    };
}

impl TypedArray {
    from_vec_ctor!(from_i8, i8, Int8);
    from_vec_ctor!(from_i16, i16, Int16);
    from_vec_ctor!(from_i32, i32, Int32);
    from_vec_ctor!(from_i64, i64, Int64);
    from_vec_ctor!(from_u8, u8, UInt8);
    from_vec_ctor!(from_u16, u16, UInt16);
    from_vec_ctor!(from_u32, u32, UInt32);
    from_vec_ctor!(from_u64, u64, UInt64);
    from_vec_ctor!(from_f32, f32, Float32);
    from_vec_ctor!(from_f64, f64, Float64);
    from_vec_ctor!(from_bool, bool, Bool);

    /// Build an array with an explicit multi-dimensional shape.
    ///
    /// The product of the shape must equal the element count of the buffer.
    pub fn with_shape(shape: Vec<usize>, values: ColumnValues) -> Result<Self, ArrayError> {
        if shape.is_empty() {
            return Err(ArrayError::EmptyShape);
        }
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(ArrayError::ShapeDataMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    /// Scalar element type
    pub fn dtype(&self) -> ScalarType {
        self.values.dtype()
    }

    /// Full shape, row dimension first
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of rows (the first dimension)
    pub fn row_count(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// Shape of a single row (everything after the row dimension)
    pub fn inner_shape(&self) -> &[usize] {
        self.shape.get(1..).unwrap_or(&[])
    }

    /// Elements per row
    pub fn inner_size(&self) -> usize {
        self.inner_shape().iter().product()
    }

    /// Logical byte size: element count times element size
    pub fn nbytes(&self) -> usize {
        self.values.len() * self.dtype().size()
    }

    /// Raw value buffer
    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    /// Gather the given rows into a new array, preserving inner dimensions.
    pub fn take_rows(&self, rows: &[usize]) -> Result<TypedArray, ArrayError> {
        let row_count = self.row_count();
        for &row in rows {
            if row >= row_count {
                return Err(ArrayError::RowOutOfBounds {
                    index: row,
                    rows: row_count,
                });
            }
        }
        let mut shape = vec![rows.len()];
        shape.extend_from_slice(self.inner_shape());
        Ok(TypedArray {
            shape,
            values: self.values.gather_rows(rows, self.inner_size()),
        })
    }
}
