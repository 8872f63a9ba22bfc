//! The handle-addressed matrix engine.
//!
//! Every public method names its operands by [`MatrixHandle`]. Allocating
//! operations return a fresh handle; assigning operations (`*_assign*`,
//! `set`, `set_array`) mutate the record behind an existing one. All checks
//! (handle liveness, shapes, buffer lengths) happen before anything is
//! written, so a failed call leaves every matrix as it was and allocates no
//! handle.

use keigen_kernel::{
    add_into, copy_from_slice, copy_into, copy_to_slice, div_inplace, div_into, matmul_into,
    product_shape, scale_inplace, scale_into, sub_into, transpose_into, Matrix, MatrixError,
    MatrixView, MatrixViewMut, Ownership, Scalar,
};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::handle::MatrixHandle;
use crate::registry::Registry;
use crate::{EngineError, Result};

/// Engine over `f32` elements.
pub type FloatEngine = MatrixEngine<f32>;

/// Engine over `f64` elements.
pub type DoubleEngine = MatrixEngine<f64>;

/// Owns every matrix it has handed out a handle for.
///
/// Methods that mutate take `&mut self`; sharing one engine between threads
/// requires an external lock. Dropping the engine frees every owned buffer
/// that is still live.
pub struct MatrixEngine<T> {
    registry: Registry<Matrix<T>>,
    config: EngineConfig,
}

impl<T: Scalar> Default for MatrixEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for MatrixEngine<T> {
    fn drop(&mut self) {
        if self.registry.len() > 0 {
            debug!(live = self.registry.len(), "dropping engine with live matrices");
        }
    }
}

impl<T: Scalar> MatrixEngine<T> {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            registry: Registry::default(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of handles that have been issued and not yet disposed.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.registry.len()
    }

    #[inline]
    fn trace_op(&self, op: &'static str, operands: &[MatrixHandle]) {
        if self.config.trace {
            trace!(op = op, operands = ?operands, "matrix op");
        }
    }

    fn register(&mut self, matrix: Matrix<T>) -> Result<MatrixHandle> {
        let (rows, cols) = matrix.shape();
        let ownership = matrix.ownership();
        let handle = self.registry.insert(matrix)?;
        debug!(%handle, rows, cols, ?ownership, "allocated matrix");
        Ok(handle)
    }

    #[inline]
    fn matrix(&self, handle: MatrixHandle) -> Result<&Matrix<T>> {
        self.registry.get(handle)
    }

    #[inline]
    fn matrix_mut(&mut self, handle: MatrixHandle) -> Result<&mut Matrix<T>> {
        self.registry.get_mut(handle)
    }

    // ========================================================================
    // Construction and disposal
    // ========================================================================

    /// New row-major `rows x cols` matrix with every element set to `fill`.
    pub fn initialize_fill(&mut self, rows: usize, cols: usize, fill: T) -> Result<MatrixHandle> {
        self.trace_op("initialize_fill", &[]);
        let matrix = Matrix::filled(rows, cols, fill)?;
        self.register(matrix)
    }

    /// New matrix holding a copy of the elements of `data` addressed with
    /// `(outer, inner)`.
    ///
    /// The copy is dense and every element is independent, even when the
    /// input strides repeat elements. It is column-major when the input's row
    /// stride is the smaller one, row-major otherwise. `data` is not
    /// referenced after the call returns.
    pub fn initialize_with_data(
        &mut self,
        rows: usize,
        cols: usize,
        data: &[T],
        outer: isize,
        inner: isize,
    ) -> Result<MatrixHandle> {
        self.trace_op("initialize_with_data", &[]);
        let matrix = Matrix::from_strided(rows, cols, data, outer, inner)?;
        self.register(matrix)
    }

    /// New `n x n` identity matrix.
    pub fn identity(&mut self, n: usize) -> Result<MatrixHandle> {
        self.trace_op("identity", &[]);
        let matrix = Matrix::identity(n)?;
        self.register(matrix)
    }

    /// Register caller memory as a matrix without copying it.
    ///
    /// The record is [`Ownership::Borrowed`]: [`dispose`](Self::dispose) and
    /// dropping the engine release the handle but never free `ptr`. Strides
    /// that map two elements to one offset are rejected with
    /// [`MatrixError::AliasedStrides`].
    ///
    /// # Safety
    /// `ptr` must point to `len` initialised elements that stay valid until
    /// the handle is disposed or the engine is dropped. Nothing outside the
    /// engine may access them in that time. Several handles may wrap
    /// overlapping ranges as long as none of them is written while another is
    /// live; [`times_into`](Self::times_into) detects such overlap itself when
    /// [`EngineConfig::check_aliasing`] is set.
    pub unsafe fn wrap_raw(
        &mut self,
        rows: usize,
        cols: usize,
        ptr: *mut T,
        len: usize,
        outer: isize,
        inner: isize,
    ) -> Result<MatrixHandle> {
        self.trace_op("wrap_raw", &[]);
        let matrix = Matrix::from_raw_parts(ptr, len, rows, cols, outer, inner)?;
        self.register(matrix)
    }

    /// Release the matrix behind `handle`. Owned storage is freed; borrowed
    /// storage is left to its owner. Any later use of `handle`, including a
    /// second dispose, fails with [`EngineError::AlreadyDisposed`].
    pub fn dispose(&mut self, handle: MatrixHandle) -> Result<()> {
        self.trace_op("dispose", &[handle]);
        let matrix = self.registry.remove(handle)?;
        debug!(%handle, ownership = ?matrix.ownership(), "disposed matrix");
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn shape(&self, handle: MatrixHandle) -> Result<(usize, usize)> {
        self.trace_op("shape", &[handle]);
        Ok(self.matrix(handle)?.shape())
    }

    /// `(outer, inner)` stride pair.
    pub fn strides(&self, handle: MatrixHandle) -> Result<(isize, isize)> {
        self.trace_op("strides", &[handle]);
        Ok(self.matrix(handle)?.strides())
    }

    pub fn ownership(&self, handle: MatrixHandle) -> Result<Ownership> {
        self.trace_op("ownership", &[handle]);
        Ok(self.matrix(handle)?.ownership())
    }

    // ========================================================================
    // Elementwise arithmetic
    // ========================================================================

    /// Evaluate `kernel(a, b)` into a fresh row-major matrix shaped like `a`.
    fn evaluate_binary<F>(&self, a: MatrixHandle, b: MatrixHandle, kernel: F) -> Result<Matrix<T>>
    where
        F: Fn(&mut MatrixViewMut<'_, T>, &MatrixView<'_, T>, &MatrixView<'_, T>) -> std::result::Result<(), MatrixError>,
    {
        let ma = self.matrix(a)?;
        let mb = self.matrix(b)?;
        let mut out = Matrix::zeros(ma.rows(), ma.cols())?;
        kernel(&mut out.view_mut(), &ma.view(), &mb.view())?;
        Ok(out)
    }

    /// Copy a fully evaluated result into the storage behind `dest`, keeping
    /// `dest`'s layout.
    fn commit(&mut self, dest: MatrixHandle, result: &Matrix<T>) -> Result<()> {
        let target = self.matrix_mut(dest)?;
        copy_into(&mut target.view_mut(), &result.view())?;
        Ok(())
    }

    /// New matrix `a + b`.
    pub fn plus(&mut self, a: MatrixHandle, b: MatrixHandle) -> Result<MatrixHandle> {
        self.trace_op("plus", &[a, b]);
        let out = self.evaluate_binary(a, b, add_into)?;
        self.register(out)
    }

    /// New matrix `a - b`.
    pub fn minus(&mut self, a: MatrixHandle, b: MatrixHandle) -> Result<MatrixHandle> {
        self.trace_op("minus", &[a, b]);
        let out = self.evaluate_binary(a, b, sub_into)?;
        self.register(out)
    }

    /// `a += b`. The sum is evaluated into scratch before `a` is written, so
    /// `b` may be `a` itself or wrap the same memory.
    pub fn plus_assign(&mut self, a: MatrixHandle, b: MatrixHandle) -> Result<()> {
        self.trace_op("plus_assign", &[a, b]);
        let scratch = self.evaluate_binary(a, b, add_into)?;
        self.commit(a, &scratch)
    }

    /// `a -= b`, evaluated like [`plus_assign`](Self::plus_assign).
    pub fn minus_assign(&mut self, a: MatrixHandle, b: MatrixHandle) -> Result<()> {
        self.trace_op("minus_assign", &[a, b]);
        let scratch = self.evaluate_binary(a, b, sub_into)?;
        self.commit(a, &scratch)
    }

    // ========================================================================
    // Products
    // ========================================================================

    fn evaluate_product(&self, a: MatrixHandle, b: MatrixHandle) -> Result<Matrix<T>> {
        let ma = self.matrix(a)?;
        let mb = self.matrix(b)?;
        let (m, _, n) = product_shape(ma.shape(), mb.shape())?;
        let mut out = Matrix::zeros(m, n)?;
        matmul_into(&mut out.view_mut(), &ma.view(), &mb.view())?;
        Ok(out)
    }

    /// New matrix `a * b` for `a: (m, k)`, `b: (k, n)`.
    pub fn times(&mut self, a: MatrixHandle, b: MatrixHandle) -> Result<MatrixHandle> {
        self.trace_op("times", &[a, b]);
        let out = self.evaluate_product(a, b)?;
        self.register(out)
    }

    /// `a = a * b` for square `a` and `b` of equal size.
    pub fn times_assign_square(&mut self, a: MatrixHandle, b: MatrixHandle) -> Result<()> {
        self.trace_op("times_assign_square", &[a, b]);
        let (sa, sb) = (self.matrix(a)?.shape(), self.matrix(b)?.shape());
        for (rows, cols) in [sa, sb] {
            if rows != cols {
                return Err(MatrixError::NonSquare { rows, cols }.into());
            }
        }
        if sa != sb {
            return Err(MatrixError::DimensionMismatch {
                op: "times_assign_square",
                lhs: sa,
                rhs: sb,
            }
            .into());
        }
        let scratch = self.evaluate_product(a, b)?;
        self.commit(a, &scratch)
    }

    /// `a = a * b` for any compatible shapes.
    ///
    /// When `b` is square the product has `a`'s shape and is written back
    /// into `a`'s storage. Otherwise the record behind `a` is replaced by the
    /// `(m, n)` product; the handle stays valid and the old storage is
    /// released (freed if owned).
    pub fn times_assign(&mut self, a: MatrixHandle, b: MatrixHandle) -> Result<()> {
        self.trace_op("times_assign", &[a, b]);
        let scratch = self.evaluate_product(a, b)?;
        if scratch.shape() == self.matrix(a)?.shape() {
            return self.commit(a, &scratch);
        }
        let shape = scratch.shape();
        let old = self.registry.replace(a, scratch)?;
        debug!(handle = %a, from = ?old.shape(), to = ?shape, "reallocated matrix for product");
        Ok(())
    }

    /// `dst = a * b` without allocating.
    ///
    /// `dst` must be a different handle from both operands and, when
    /// [`EngineConfig::check_aliasing`] is set, its storage must not overlap
    /// theirs; otherwise [`EngineError::Aliased`] is returned.
    pub fn times_into(&mut self, a: MatrixHandle, b: MatrixHandle, dst: MatrixHandle) -> Result<()> {
        self.trace_op("times_into", &[a, b, dst]);
        let (ma, mb, md) = (self.matrix(a)?, self.matrix(b)?, self.matrix(dst)?);
        for (operand, m) in [(a, ma), (b, mb)] {
            if operand == dst || (self.config.check_aliasing && md.overlaps(m)) {
                return Err(EngineError::Aliased { dst, operand });
            }
        }
        let (m, _, n) = product_shape(ma.shape(), mb.shape())?;
        if md.shape() != (m, n) {
            return Err(MatrixError::DimensionMismatch {
                op: "times_into",
                lhs: md.shape(),
                rhs: (m, n),
            }
            .into());
        }

        self.registry.with_taken(dst, |out, registry| -> Result<()> {
            let ma = registry.get(a)?;
            let mb = registry.get(b)?;
            matmul_into(&mut out.view_mut(), &ma.view(), &mb.view())?;
            Ok(())
        })?
    }

    // ========================================================================
    // Scalar arithmetic
    // ========================================================================

    /// New matrix `a * s`.
    pub fn times_scalar(&mut self, a: MatrixHandle, s: T) -> Result<MatrixHandle> {
        self.trace_op("times_scalar", &[a]);
        let ma = self.matrix(a)?;
        let mut out = Matrix::zeros(ma.rows(), ma.cols())?;
        scale_into(&mut out.view_mut(), &ma.view(), s)?;
        self.register(out)
    }

    /// New matrix `a / s`. Division by zero follows `T`'s arithmetic.
    pub fn div_scalar(&mut self, a: MatrixHandle, s: T) -> Result<MatrixHandle> {
        self.trace_op("div_scalar", &[a]);
        let ma = self.matrix(a)?;
        let mut out = Matrix::zeros(ma.rows(), ma.cols())?;
        div_into(&mut out.view_mut(), &ma.view(), s)?;
        self.register(out)
    }

    /// `a *= s` in place.
    pub fn times_assign_scalar(&mut self, a: MatrixHandle, s: T) -> Result<()> {
        self.trace_op("times_assign_scalar", &[a]);
        scale_inplace(&mut self.matrix_mut(a)?.view_mut(), s)?;
        Ok(())
    }

    /// `a /= s` in place.
    pub fn div_assign_scalar(&mut self, a: MatrixHandle, s: T) -> Result<()> {
        self.trace_op("div_assign_scalar", &[a]);
        div_inplace(&mut self.matrix_mut(a)?.view_mut(), s)?;
        Ok(())
    }

    // ========================================================================
    // Transpose
    // ========================================================================

    fn evaluate_transpose(&self, a: MatrixHandle) -> Result<Matrix<T>> {
        let ma = self.matrix(a)?;
        let mut out = Matrix::zeros(ma.cols(), ma.rows())?;
        transpose_into(&mut out.view_mut(), &ma.view())?;
        Ok(out)
    }

    /// New `(cols, rows)` matrix holding `a`'s transpose.
    pub fn transpose(&mut self, a: MatrixHandle) -> Result<MatrixHandle> {
        self.trace_op("transpose", &[a]);
        let out = self.evaluate_transpose(a)?;
        self.register(out)
    }

    /// Replace the record behind `a` with its transpose; the handle stays
    /// valid and now names a `(cols, rows)` matrix.
    pub fn transpose_in_place(&mut self, a: MatrixHandle) -> Result<()> {
        self.trace_op("transpose_in_place", &[a]);
        let out = self.evaluate_transpose(a)?;
        self.registry.replace(a, out)?;
        Ok(())
    }

    // ========================================================================
    // Element access
    // ========================================================================

    pub fn get(&self, a: MatrixHandle, row: usize, col: usize) -> Result<T> {
        self.trace_op("get", &[a]);
        Ok(self.matrix(a)?.get(row, col)?)
    }

    pub fn set(&mut self, a: MatrixHandle, row: usize, col: usize, value: T) -> Result<()> {
        self.trace_op("set", &[a]);
        self.matrix_mut(a)?.set(row, col, value)?;
        Ok(())
    }

    /// Copy the matrix into `dst` in row-major order. `dst` needs at least
    /// `rows * cols` elements; any extra ones are left untouched.
    pub fn get_array(&self, a: MatrixHandle, dst: &mut [T]) -> Result<()> {
        self.trace_op("get_array", &[a]);
        copy_to_slice(&self.matrix(a)?.view(), dst)?;
        Ok(())
    }

    /// Overwrite the matrix from the first `rows * cols` elements of `src`,
    /// read in row-major order.
    pub fn set_array(&mut self, a: MatrixHandle, src: &[T]) -> Result<()> {
        self.trace_op("set_array", &[a]);
        copy_from_slice(&mut self.matrix_mut(a)?.view_mut(), src)?;
        Ok(())
    }

    /// The matrix's elements in row-major order.
    pub fn to_vec(&self, a: MatrixHandle) -> Result<Vec<T>> {
        self.trace_op("to_vec", &[a]);
        Ok(self.matrix(a)?.to_row_major_vec())
    }
}
