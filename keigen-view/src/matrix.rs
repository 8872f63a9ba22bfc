//! The matrix record: shape, stride pair and a storage that is either owned
//! by the record or borrowed from the caller.

use std::ptr::NonNull;

use keigen_traits::Scalar;

use crate::layout::{
    col_major_strides, element_count, row_major_strides, validate_bounds, validate_distinct, Layout,
};
use crate::view::{MatrixView, MatrixViewMut};
use crate::{MatrixError, Result};

/// Whether dropping a [`Matrix`] frees its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Allocated by the engine, freed when the matrix is dropped.
    Owned,
    /// Supplied by the caller, never freed here.
    Borrowed,
}

enum Storage<T> {
    Owned(Vec<T>),
    Borrowed { ptr: NonNull<T>, len: usize },
}

impl<T> Storage<T> {
    #[inline]
    fn as_slice(&self) -> &[T] {
        match self {
            Storage::Owned(data) => data,
            // SAFETY: `Matrix::from_raw_parts` requires ptr/len to describe a
            // live allocation for the lifetime of the matrix.
            Storage::Borrowed { ptr, len } => unsafe {
                std::slice::from_raw_parts(ptr.as_ptr(), *len)
            },
        }
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Storage::Owned(data) => data,
            // SAFETY: see `as_slice`; the caller also guarantees exclusivity.
            Storage::Borrowed { ptr, len } => unsafe {
                std::slice::from_raw_parts_mut(ptr.as_ptr(), *len)
            },
        }
    }

    fn ownership(&self) -> Ownership {
        match self {
            Storage::Owned(_) => Ownership::Owned,
            Storage::Borrowed { .. } => Ownership::Borrowed,
        }
    }
}

/// Dense strided matrix with owned or borrowed storage.
pub struct Matrix<T> {
    storage: Storage<T>,
    rows: usize,
    cols: usize,
    outer: isize,
    inner: isize,
}

// SAFETY: owned storage is a `Vec<T>`. Borrowed storage is only created through
// `from_raw_parts`, whose contract makes the caller responsible for the pointee
// being usable from whichever thread holds the matrix.
unsafe impl<T: Send> Send for Matrix<T> {}
unsafe impl<T: Sync> Sync for Matrix<T> {}

impl<T> std::fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .field("ownership", &self.storage.ownership())
            .finish()
    }
}

impl<T: Scalar> Matrix<T> {
    /// Row-major matrix with every element set to `fill`.
    pub fn filled(rows: usize, cols: usize, fill: T) -> Result<Self> {
        let len = element_count(rows, cols)?;
        let (outer, inner) = row_major_strides(rows, cols);
        Ok(Self {
            storage: Storage::Owned(vec![fill; len]),
            rows,
            cols,
            outer,
            inner,
        })
    }

    /// Row-major zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, T::zero())
    }

    /// `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeros(n, n)?;
        let data = m.storage.as_mut_slice();
        for i in 0..n {
            data[i * n + i] = T::one();
        }
        Ok(m)
    }

    /// Row-major matrix with values produced by `f(row, col)`, called in
    /// row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Result<Self> {
        let mut data = Vec::with_capacity(element_count(rows, cols)?);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self::from_row_major(rows, cols, data)
    }

    /// Take ownership of a row-major buffer of exactly `rows * cols` elements.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let required = element_count(rows, cols)?;
        if data.len() != required {
            return Err(MatrixError::BufferTooSmall {
                required,
                len: data.len(),
            });
        }
        let (outer, inner) = row_major_strides(rows, cols);
        Ok(Self {
            storage: Storage::Owned(data),
            rows,
            cols,
            outer,
            inner,
        })
    }

    /// Copy the elements of `data` addressed by `(outer, inner)` into a new
    /// dense owned buffer. `data` may be dropped or reused afterwards.
    ///
    /// The copy is column-major when the source's row stride is the smaller
    /// one and row-major otherwise, so the caller's memory order survives.
    /// Padding is dropped and elements the source strides alias (a zero
    /// stride, say) become independent.
    pub fn from_strided(
        rows: usize,
        cols: usize,
        data: &[T],
        outer: isize,
        inner: isize,
    ) -> Result<Self> {
        let src = MatrixView::new(data, rows, cols, outer, inner)?;
        let mut buf = Vec::with_capacity(element_count(rows, cols)?);
        let col_major = rows > 1 && cols > 1 && outer.unsigned_abs() < inner.unsigned_abs();
        let (outer, inner) = if col_major {
            for col in 0..cols {
                for row in 0..rows {
                    // SAFETY: in range of the validated view.
                    buf.push(unsafe { src.get_unchecked(row, col) });
                }
            }
            col_major_strides(rows, cols)
        } else {
            for row in 0..rows {
                for col in 0..cols {
                    // SAFETY: in range of the validated view.
                    buf.push(unsafe { src.get_unchecked(row, col) });
                }
            }
            row_major_strides(rows, cols)
        };
        Ok(Self {
            storage: Storage::Owned(buf),
            rows,
            cols,
            outer,
            inner,
        })
    }
}

impl<T> Matrix<T> {
    /// Wrap caller memory without copying. The result is [`Ownership::Borrowed`]
    /// and never frees `ptr`. Strides that alias two elements are rejected
    /// with [`MatrixError::AliasedStrides`], since the matrix is writable.
    ///
    /// # Safety
    /// `ptr` must point to `len` initialised elements that stay valid, and are
    /// not accessed through any other path while the matrix is alive.
    pub unsafe fn from_raw_parts(
        ptr: *mut T,
        len: usize,
        rows: usize,
        cols: usize,
        outer: isize,
        inner: isize,
    ) -> Result<Self> {
        let ptr = NonNull::new(ptr).ok_or(MatrixError::NullPointer)?;
        validate_bounds(len, rows, cols, outer, inner)?;
        validate_distinct(rows, cols, outer, inner)?;
        Ok(Self {
            storage: Storage::Borrowed { ptr, len },
            rows,
            cols,
            outer,
            inner,
        })
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
    pub fn ownership(&self) -> Ownership {
        self.storage.ownership()
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        Layout::of(self.rows, self.cols, self.outer, self.inner)
    }

    /// The whole backing buffer, including elements the strides skip.
    #[inline]
    pub fn data(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Whether the backing buffers of `self` and `other` share any byte.
    pub fn overlaps(&self, other: &Matrix<T>) -> bool {
        let a = self.storage.as_slice().as_ptr_range();
        let b = other.storage.as_slice().as_ptr_range();
        a.start < b.end && b.start < a.end
    }

    pub fn view(&self) -> MatrixView<'_, T> {
        // SAFETY: bounds were validated when the matrix was built and the
        // shape/strides are never changed independently of the storage.
        unsafe {
            MatrixView::new_unchecked(
                self.storage.as_slice(),
                self.rows,
                self.cols,
                self.outer,
                self.inner,
            )
        }
    }

    pub fn view_mut(&mut self) -> MatrixViewMut<'_, T> {
        // SAFETY: as in `view`.
        unsafe {
            MatrixViewMut::new_unchecked(
                self.storage.as_mut_slice(),
                self.rows,
                self.cols,
                self.outer,
                self.inner,
            )
        }
    }
}

impl<T: Copy> Matrix<T> {
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.view().get(row, col)
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.view_mut().set(row, col, value)
    }

    /// Elements in row-major logical order, regardless of storage layout.
    pub fn to_row_major_vec(&self) -> Vec<T> {
        let view = self.view();
        if let Some(slice) = view.as_row_major_slice() {
            return slice.to_vec();
        }
        let mut out = Vec::with_capacity(self.len());
        for row in 0..self.rows {
            for col in 0..self.cols {
                // SAFETY: loop bounds are the view's shape.
                out.push(unsafe { view.get_unchecked(row, col) });
            }
        }
        out
    }
}
