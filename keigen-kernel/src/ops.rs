//! Arithmetic, copy and transpose kernels on strided matrix views.

use crate::kernel::{ensure_same_shape, for_each_index};
use crate::map::{map_inplace, map_into, zip_map2_into};
use crate::{MatrixError, Result};
use keigen_traits::Scalar;
use keigen_view::{MatrixView, MatrixViewMut};

const TRANSPOSE_TILE: usize = 16;

/// Copy elements from source to destination: `dest[i, j] = src[i, j]`.
pub fn copy_into<T: Copy>(dest: &mut MatrixViewMut<'_, T>, src: &MatrixView<'_, T>) -> Result<()> {
    map_into(dest, src, |x| x)
}

/// `dest = a + b`.
pub fn add_into<T: Scalar>(
    dest: &mut MatrixViewMut<'_, T>,
    a: &MatrixView<'_, T>,
    b: &MatrixView<'_, T>,
) -> Result<()> {
    ensure_same_shape("plus", a.shape(), b.shape())?;
    zip_map2_into(dest, a, b, |x, y| x + y)
}

/// `dest = a - b`.
pub fn sub_into<T: Scalar>(
    dest: &mut MatrixViewMut<'_, T>,
    a: &MatrixView<'_, T>,
    b: &MatrixView<'_, T>,
) -> Result<()> {
    ensure_same_shape("minus", a.shape(), b.shape())?;
    zip_map2_into(dest, a, b, |x, y| x - y)
}

/// `dest = src * scale`.
pub fn scale_into<T: Scalar>(
    dest: &mut MatrixViewMut<'_, T>,
    src: &MatrixView<'_, T>,
    scale: T,
) -> Result<()> {
    map_into(dest, src, |x| x * scale)
}

/// `dest = src / divisor`. Division by zero yields whatever `T` produces.
pub fn div_into<T: Scalar>(
    dest: &mut MatrixViewMut<'_, T>,
    src: &MatrixView<'_, T>,
    divisor: T,
) -> Result<()> {
    map_into(dest, src, |x| x / divisor)
}

/// `dest *= scale`.
pub fn scale_inplace<T: Scalar>(dest: &mut MatrixViewMut<'_, T>, scale: T) -> Result<()> {
    map_inplace(dest, |x| x * scale)
}

/// `dest /= divisor`.
pub fn div_inplace<T: Scalar>(dest: &mut MatrixViewMut<'_, T>, divisor: T) -> Result<()> {
    map_inplace(dest, |x| x / divisor)
}

/// `dest = src^T`, where `dest` is `(cols, rows)` of `src`.
///
/// Walks the matrix in square tiles so neither side strides through memory a
/// whole row at a time when the two layouts disagree.
pub fn transpose_into<T: Copy>(
    dest: &mut MatrixViewMut<'_, T>,
    src: &MatrixView<'_, T>,
) -> Result<()> {
    let (rows, cols) = src.shape();
    ensure_same_shape("transpose", dest.shape(), (cols, rows))?;

    let src_t = src.t();
    if dest.layout().is_contiguous() && dest.layout() == src_t.layout() {
        // Same memory order once transposed: a straight copy.
        return copy_into(dest, &src_t);
    }

    for r0 in (0..rows).step_by(TRANSPOSE_TILE) {
        let r1 = (r0 + TRANSPOSE_TILE).min(rows);
        for c0 in (0..cols).step_by(TRANSPOSE_TILE) {
            let c1 = (c0 + TRANSPOSE_TILE).min(cols);
            for r in r0..r1 {
                for c in c0..c1 {
                    // SAFETY: r < rows, c < cols; dest is (cols, rows).
                    unsafe { dest.set_unchecked(c, r, src.get_unchecked(r, c)) }
                }
            }
        }
    }
    Ok(())
}

/// Copy `src` out into `dst` in row-major logical order.
///
/// `dst` must hold at least `rows * cols` elements; extra elements are left
/// untouched. Works for any stride layout.
pub fn copy_to_slice<T: Copy>(src: &MatrixView<'_, T>, dst: &mut [T]) -> Result<()> {
    let (rows, cols) = src.shape();
    let len = rows * cols;
    if dst.len() < len {
        return Err(MatrixError::BufferTooSmall {
            required: len,
            len: dst.len(),
        });
    }
    if let Some(s) = src.as_row_major_slice() {
        dst[..len].copy_from_slice(s);
        return Ok(());
    }
    let strides = [(cols as isize, 1), src.strides()];
    for_each_index(rows, cols, &strides, |r, c| {
        // SAFETY: r < rows, c < cols.
        dst[r * cols + c] = unsafe { src.get_unchecked(r, c) };
    });
    Ok(())
}

/// Copy `src`, read in row-major logical order, into `dest`.
pub fn copy_from_slice<T: Copy>(dest: &mut MatrixViewMut<'_, T>, src: &[T]) -> Result<()> {
    let (rows, cols) = dest.shape();
    let len = rows * cols;
    if src.len() < len {
        return Err(MatrixError::BufferTooSmall {
            required: len,
            len: src.len(),
        });
    }
    if let Some(d) = dest.as_row_major_slice_mut() {
        d.copy_from_slice(&src[..len]);
        return Ok(());
    }
    let strides = [dest.strides(), (cols as isize, 1)];
    for_each_index(rows, cols, &strides, |r, c| {
        // SAFETY: r < rows, c < cols.
        unsafe { dest.set_unchecked(r, c, src[r * cols + c]) }
    });
    Ok(())
}
