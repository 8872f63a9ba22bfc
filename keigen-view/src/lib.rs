//! Strided 2-D matrix views and the owned/borrowed matrix record.
//!
//! # Core Types
//!
//! - [`MatrixView`] / [`MatrixViewMut`]: strided windows over existing data
//! - [`Matrix`]: matrix record whose storage is [`Ownership::Owned`] or
//!   [`Ownership::Borrowed`]
//!
//! # Addressing
//!
//! Element `(row, col)` sits at `row * outer + col * inner` (see [`offset`]).
//! Shapes and strides are checked once, on construction, by
//! [`validate_bounds`]; afterwards the unchecked accessors are sound for every
//! in-range index.

pub mod layout;
mod matrix;
pub mod view;

pub use keigen_traits::Scalar;
pub use layout::{
    col_major_strides, element_count, offset, required_len, row_major_strides, strides_alias,
    validate_bounds, validate_dims, validate_distinct, Layout,
};
pub use matrix::{Matrix, Ownership};
pub use view::{MatrixView, MatrixViewMut};

/// Largest accepted row or column count (signed 32-bit index range).
pub const MAX_DIM: usize = i32::MAX as usize;

// ============================================================================
// Error types
// ============================================================================

/// Errors raised by view construction and matrix kernels.
#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    /// Row or column count is zero or exceeds [`MAX_DIM`].
    #[error("invalid dimensions: rows={rows}, cols={cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Operand shapes are incompatible for the operation.
    #[error("dimension mismatch in {op}: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// Matrix is not square when a square matrix was required.
    #[error("non-square matrix: rows={rows}, cols={cols}")]
    NonSquare { rows: usize, cols: usize },

    /// Element index outside the matrix shape.
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Flat buffer shorter than `rows * cols`.
    #[error("buffer too small: need {required} elements, got {len}")]
    BufferTooSmall { required: usize, len: usize },

    /// Strides address past the end of the buffer.
    #[error("strides need {required} elements but buffer holds {len}")]
    StrideOutOfBounds { required: usize, len: usize },

    /// Integer overflow or negative result while computing an offset.
    #[error("offset overflow while computing element address")]
    OffsetOverflow,

    /// Two in-range elements map to the same offset, so writes through one
    /// would change the other.
    #[error("strides ({outer}, {inner}) map distinct elements to the same offset")]
    AliasedStrides { outer: isize, inner: isize },

    /// Null pointer passed where caller memory was expected.
    #[error("null data pointer")]
    NullPointer,
}

/// Result type for view and kernel operations.
pub type Result<T> = std::result::Result<T, MatrixError>;
