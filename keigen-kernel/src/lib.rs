//! Stateless kernels over strided matrix views.
//!
//! Every function takes its operands as [`MatrixView`]s and writes into a
//! [`MatrixViewMut`]. Output and inputs are distinct borrows, so kernels
//! never read memory they are writing; callers that need in-place semantics
//! over an operand (`a += b` with `a` possibly equal to `b`) evaluate into a
//! scratch matrix first.
//!
//! # Map Operations
//!
//! - [`map_into`], [`zip_map2_into`], [`map_inplace`]
//!
//! # Arithmetic
//!
//! - [`add_into`], [`sub_into`]: elementwise sum and difference
//! - [`scale_into`], [`div_into`], [`scale_inplace`], [`div_inplace`]: scalar scaling
//! - [`matmul_into`]: dense product
//! - [`transpose_into`]: materialised transpose
//!
//! # Bulk Copy
//!
//! - [`copy_into`]: view to view
//! - [`copy_to_slice`], [`copy_from_slice`]: view to/from a flat row-major slice

mod gemm;
mod kernel;
mod map;
mod ops;
mod order;

pub use keigen_view::{
    Layout, Matrix, MatrixError, MatrixView, MatrixViewMut, Ownership, Result, Scalar,
};

pub use gemm::{matmul_into, product_shape};
pub use map::{map_inplace, map_into, zip_map2_into};
pub use ops::{
    add_into, copy_from_slice, copy_into, copy_to_slice, div_inplace, div_into, scale_inplace,
    scale_into, sub_into, transpose_into,
};
