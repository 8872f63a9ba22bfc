//! Pure addressing helpers for 2-D strided matrices.
//!
//! Element `(row, col)` of a matrix with stride pair `(outer, inner)` lives at
//! flat offset `row * outer + col * inner`. Row-major storage is
//! `(cols, 1)`, column-major storage is `(1, rows)`; any other pair describes
//! an interleaved or padded layout over a larger buffer.

use crate::{MatrixError, Result, MAX_DIM};

/// Flat offset of element `(row, col)`.
#[inline(always)]
pub fn offset(row: usize, col: usize, outer: isize, inner: isize) -> isize {
    row as isize * outer + col as isize * inner
}

/// Stride pair for C-order storage (last index varies fastest).
#[inline]
pub fn row_major_strides(_rows: usize, cols: usize) -> (isize, isize) {
    (cols as isize, 1)
}

/// Stride pair for Fortran-order storage (first index varies fastest).
#[inline]
pub fn col_major_strides(rows: usize, _cols: usize) -> (isize, isize) {
    (1, rows as isize)
}

/// Reject empty matrices and dimensions outside the signed 32-bit range.
pub fn validate_dims(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 || rows > MAX_DIM || cols > MAX_DIM {
        return Err(MatrixError::InvalidDimensions { rows, cols });
    }
    Ok(())
}

/// `rows * cols`, for dimensions that pass [`validate_dims`].
pub fn element_count(rows: usize, cols: usize) -> Result<usize> {
    validate_dims(rows, cols)?;
    rows.checked_mul(cols).ok_or(MatrixError::OffsetOverflow)
}

/// Whether two distinct in-range `(row, col)` pairs share an offset.
///
/// Offsets collide when `dr * outer == -dc * inner` for some step
/// `(dr, dc) != (0, 0)` with `|dr| < rows` and `|dc| < cols`. Every such
/// step is a multiple of `(|inner| / g, |outer| / g)` with
/// `g = gcd(|outer|, |inner|)`, so checking the smallest one suffices.
pub fn strides_alias(rows: usize, cols: usize, outer: isize, inner: isize) -> bool {
    let (outer, inner) = (outer.unsigned_abs(), inner.unsigned_abs());
    match (rows > 1, cols > 1) {
        (false, false) => false,
        (true, false) => outer == 0,
        (false, true) => inner == 0,
        (true, true) => {
            if outer == 0 || inner == 0 {
                return true;
            }
            let g = gcd(outer, inner);
            inner / g < rows && outer / g < cols
        }
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Reject stride pairs that make two elements share storage. Required for
/// anything written through.
pub fn validate_distinct(rows: usize, cols: usize, outer: isize, inner: isize) -> Result<()> {
    if strides_alias(rows, cols, outer, inner) {
        return Err(MatrixError::AliasedStrides { outer, inner });
    }
    Ok(())
}

/// Number of buffer elements a `(rows, cols)` matrix with the given strides
/// touches, i.e. the largest reachable offset plus one.
///
/// Fails if any reachable offset is negative or the computation overflows.
pub fn required_len(rows: usize, cols: usize, outer: isize, inner: isize) -> Result<usize> {
    validate_dims(rows, cols)?;
    let mut min_offset = 0isize;
    let mut max_offset = 0isize;
    for (dim, stride) in [(rows, outer), (cols, inner)] {
        if dim > 1 {
            let end = stride
                .checked_mul(dim as isize - 1)
                .ok_or(MatrixError::OffsetOverflow)?;
            if end >= 0 {
                max_offset = max_offset
                    .checked_add(end)
                    .ok_or(MatrixError::OffsetOverflow)?;
            } else {
                min_offset = min_offset
                    .checked_add(end)
                    .ok_or(MatrixError::OffsetOverflow)?;
            }
        }
    }
    if min_offset < 0 {
        return Err(MatrixError::OffsetOverflow);
    }
    Ok(max_offset as usize + 1)
}

/// Validate that all accessed offsets stay within `[0, len)`.
pub fn validate_bounds(len: usize, rows: usize, cols: usize, outer: isize, inner: isize) -> Result<()> {
    let required = required_len(rows, cols, outer, inner)?;
    if required > len {
        return Err(MatrixError::StrideOutOfBounds { required, len });
    }
    Ok(())
}

/// Memory layout class of a stride pair.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Layout {
    /// C-like: columns of a row are adjacent and rows follow each other.
    RowMajor,
    /// Fortran-like: rows of a column are adjacent.
    ColMajor,
    /// Anything else (padded, interleaved, broadcast).
    Strided,
}

impl Layout {
    /// Classify `(outer, inner)` for a `(rows, cols)` matrix.
    ///
    /// Axes of length one do not affect addressability and are ignored, so a
    /// single row or column can be both row- and column-major; row-major wins.
    pub fn of(rows: usize, cols: usize, outer: isize, inner: isize) -> Layout {
        let inner_ok = cols <= 1 || inner == 1;
        let outer_ok = rows <= 1 || outer == cols as isize;
        if inner_ok && outer_ok {
            return Layout::RowMajor;
        }
        let outer_ok = rows <= 1 || outer == 1;
        let inner_ok = cols <= 1 || inner == rows as isize;
        if inner_ok && outer_ok {
            return Layout::ColMajor;
        }
        Layout::Strided
    }

    #[inline]
    pub fn is_contiguous(self) -> bool {
        !matches!(self, Layout::Strided)
    }
}
