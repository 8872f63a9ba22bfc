//! Borrowed 2-D strided views.
//!
//! - [`MatrixView`]: immutable window over a scalar slice
//! - [`MatrixViewMut`]: mutable window over a scalar slice
//!
//! Both carry `(rows, cols)` and an `(outer, inner)` stride pair. Bounds are
//! validated once at construction, after which the unchecked accessors are
//! sound for every in-range `(row, col)`.

use crate::layout::{offset, validate_bounds, validate_distinct, Layout};
use crate::{MatrixError, Result};

#[inline]
fn check_index(row: usize, col: usize, rows: usize, cols: usize) -> Result<()> {
    if row >= rows || col >= cols {
        return Err(MatrixError::IndexOutOfBounds {
            row,
            col,
            rows,
            cols,
        });
    }
    Ok(())
}

// ============================================================================
// MatrixView
// ============================================================================

/// Immutable strided matrix view.
pub struct MatrixView<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    outer: isize,
    inner: isize,
}

impl<T> Clone for MatrixView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MatrixView<'_, T> {}

impl<T> std::fmt::Debug for MatrixView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixView")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .finish()
    }
}

impl<'a, T> MatrixView<'a, T> {
    /// Create a view over `data`, checking that every element is addressable.
    pub fn new(data: &'a [T], rows: usize, cols: usize, outer: isize, inner: isize) -> Result<Self> {
        validate_bounds(data.len(), rows, cols, outer, inner)?;
        Ok(Self {
            data,
            rows,
            cols,
            outer,
            inner,
        })
    }

    /// Create a view without bounds checking.
    ///
    /// # Safety
    /// `validate_bounds(data.len(), rows, cols, outer, inner)` must hold.
    pub unsafe fn new_unchecked(
        data: &'a [T],
        rows: usize,
        cols: usize,
        outer: isize,
        inner: isize,
    ) -> Self {
        Self {
            data,
            rows,
            cols,
            outer,
            inner,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// `(outer, inner)` stride pair.
    #[inline]
    pub fn strides(&self) -> (isize, isize) {
        (self.outer, self.inner)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        Layout::of(self.rows, self.cols, self.outer, self.inner)
    }

    /// Elements in row-major order as one slice, if the view is stored that way.
    pub fn as_row_major_slice(&self) -> Option<&'a [T]> {
        match self.layout() {
            Layout::RowMajor => Some(&self.data[..self.len()]),
            _ => None,
        }
    }

    /// Zero-copy transpose: swaps the shape and the stride pair.
    pub fn t(&self) -> MatrixView<'a, T> {
        MatrixView {
            data: self.data,
            rows: self.cols,
            cols: self.rows,
            outer: self.inner,
            inner: self.outer,
        }
    }

    #[inline(always)]
    fn flat(&self, row: usize, col: usize) -> usize {
        offset(row, col, self.outer, self.inner) as usize
    }
}

impl<T: Copy> MatrixView<'_, T> {
    /// Read element `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        check_index(row, col, self.rows, self.cols)?;
        Ok(self.data[self.flat(row, col)])
    }

    /// Read an element without bounds checking.
    ///
    /// # Safety
    /// `row < rows` and `col < cols`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        *self.data.get_unchecked(self.flat(row, col))
    }
}

// ============================================================================
// MatrixViewMut
// ============================================================================

/// Mutable strided matrix view.
pub struct MatrixViewMut<'a, T> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
    outer: isize,
    inner: isize,
}

impl<T> std::fmt::Debug for MatrixViewMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixViewMut")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .finish()
    }
}

impl<'a, T> MatrixViewMut<'a, T> {
    /// Create a mutable view over `data`, checking that every element is
    /// addressable and that no two elements share an offset.
    pub fn new(
        data: &'a mut [T],
        rows: usize,
        cols: usize,
        outer: isize,
        inner: isize,
    ) -> Result<Self> {
        validate_bounds(data.len(), rows, cols, outer, inner)?;
        validate_distinct(rows, cols, outer, inner)?;
        Ok(Self {
            data,
            rows,
            cols,
            outer,
            inner,
        })
    }

    /// Create without bounds checking.
    ///
    /// # Safety
    /// `validate_bounds(data.len(), rows, cols, outer, inner)` must hold, and
    /// the strides must not alias two elements (see [`validate_distinct`]).
    pub unsafe fn new_unchecked(
        data: &'a mut [T],
        rows: usize,
        cols: usize,
        outer: isize,
        inner: isize,
    ) -> Self {
        Self {
            data,
            rows,
            cols,
            outer,
            inner,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn strides(&self) -> (isize, isize) {
        (self.outer, self.inner)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        Layout::of(self.rows, self.cols, self.outer, self.inner)
    }

    /// Reborrow as an immutable view.
    pub fn as_view(&self) -> MatrixView<'_, T> {
        MatrixView {
            data: &*self.data,
            rows: self.rows,
            cols: self.cols,
            outer: self.outer,
            inner: self.inner,
        }
    }

    /// Elements in row-major order as one mutable slice, if stored that way.
    pub fn as_row_major_slice_mut(&mut self) -> Option<&mut [T]> {
        match self.layout() {
            Layout::RowMajor => {
                let len = self.len();
                Some(&mut self.data[..len])
            }
            _ => None,
        }
    }

    #[inline(always)]
    fn flat(&self, row: usize, col: usize) -> usize {
        offset(row, col, self.outer, self.inner) as usize
    }
}

impl<T: Copy> MatrixViewMut<'_, T> {
    /// Read element `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        check_index(row, col, self.rows, self.cols)?;
        Ok(self.data[self.flat(row, col)])
    }

    /// Write element `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_index(row, col, self.rows, self.cols)?;
        let idx = self.flat(row, col);
        self.data[idx] = value;
        Ok(())
    }

    /// # Safety
    /// `row < rows` and `col < cols`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        *self.data.get_unchecked(self.flat(row, col))
    }

    /// # Safety
    /// `row < rows` and `col < cols`.
    #[inline(always)]
    pub unsafe fn set_unchecked(&mut self, row: usize, col: usize, value: T) {
        let idx = self.flat(row, col);
        *self.data.get_unchecked_mut(idx) = value;
    }
}
