//! Elementwise map operations on strided matrix views.
//!
//! When every operand is stored row-major the kernels walk plain slices so
//! the loop auto-vectorizes; otherwise they go through [`for_each_index`]
//! with the loop order chosen from the operands' strides.

use crate::kernel::{ensure_same_shape, for_each_index};
use crate::Result;
use keigen_view::{MatrixView, MatrixViewMut};

/// `dest[i, j] = f(src[i, j])`.
pub fn map_into<D: Copy, A: Copy>(
    dest: &mut MatrixViewMut<'_, D>,
    src: &MatrixView<'_, A>,
    f: impl Fn(A) -> D,
) -> Result<()> {
    ensure_same_shape("map", dest.shape(), src.shape())?;

    if let Some(s) = src.as_row_major_slice() {
        if let Some(d) = dest.as_row_major_slice_mut() {
            for (d, s) in d.iter_mut().zip(s.iter()) {
                *d = f(*s);
            }
            return Ok(());
        }
    }

    let (rows, cols) = dest.shape();
    let strides = [dest.strides(), src.strides()];
    for_each_index(rows, cols, &strides, |r, c| {
        // SAFETY: indices come from the shared (validated) shape.
        unsafe { dest.set_unchecked(r, c, f(src.get_unchecked(r, c))) }
    });
    Ok(())
}

/// `dest[i, j] = f(a[i, j], b[i, j])`.
pub fn zip_map2_into<D: Copy, A: Copy, B: Copy>(
    dest: &mut MatrixViewMut<'_, D>,
    a: &MatrixView<'_, A>,
    b: &MatrixView<'_, B>,
    f: impl Fn(A, B) -> D,
) -> Result<()> {
    ensure_same_shape("zip_map", a.shape(), b.shape())?;
    ensure_same_shape("zip_map", dest.shape(), a.shape())?;

    if let (Some(sa), Some(sb)) = (a.as_row_major_slice(), b.as_row_major_slice()) {
        if let Some(d) = dest.as_row_major_slice_mut() {
            for i in 0..d.len() {
                d[i] = f(sa[i], sb[i]);
            }
            return Ok(());
        }
    }

    let (rows, cols) = dest.shape();
    let strides = [dest.strides(), a.strides(), b.strides()];
    for_each_index(rows, cols, &strides, |r, c| {
        // SAFETY: all three shapes were checked equal above.
        unsafe {
            let v = f(a.get_unchecked(r, c), b.get_unchecked(r, c));
            dest.set_unchecked(r, c, v)
        }
    });
    Ok(())
}

/// `dest[i, j] = f(dest[i, j])`.
///
/// Only `dest` is read, so in-place evaluation cannot observe a partially
/// updated operand.
pub fn map_inplace<T: Copy>(dest: &mut MatrixViewMut<'_, T>, f: impl Fn(T) -> T) -> Result<()> {
    if let Some(d) = dest.as_row_major_slice_mut() {
        for x in d.iter_mut() {
            *x = f(*x);
        }
        return Ok(());
    }

    let (rows, cols) = dest.shape();
    let strides = [dest.strides()];
    for_each_index(rows, cols, &strides, |r, c| {
        // SAFETY: indices come from dest's own shape.
        unsafe {
            let v = f(dest.get_unchecked(r, c));
            dest.set_unchecked(r, c, v)
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keigen_view::Matrix;

    #[test]
    fn test_map_into_contiguous() {
        let a = Matrix::from_fn(2, 3, |r, c| (r * 3 + c) as f64).unwrap();
        let mut out = Matrix::<f64>::zeros(2, 3).unwrap();
        map_into(&mut out.view_mut(), &a.view(), |x| x * 2.0).unwrap();
        assert_eq!(out.data(), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_map_into_transposed_source() {
        let a = Matrix::from_fn(2, 3, |r, c| (r * 3 + c) as f64).unwrap();
        let mut out = Matrix::<f64>::zeros(3, 2).unwrap();
        map_into(&mut out.view_mut(), &a.view().t(), |x| x).unwrap();
        for r in 0..3 {
            for c in 0..2 {
                assert_eq!(out.get(r, c).unwrap(), a.get(c, r).unwrap());
            }
        }
    }

    #[test]
    fn test_map_into_shape_mismatch() {
        let a = Matrix::<f32>::zeros(2, 3).unwrap();
        let mut out = Matrix::<f32>::zeros(3, 2).unwrap();
        assert!(map_into(&mut out.view_mut(), &a.view(), |x| x).is_err());
    }

    #[test]
    fn test_zip_map2_mixed_layouts() {
        let data_b = vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
        let a = Matrix::from_fn(2, 3, |r, c| (r * 3 + c + 1) as f64).unwrap();
        let b = Matrix::from_strided(2, 3, &data_b, 1, 2).unwrap();
        let mut out = Matrix::<f64>::zeros(2, 3).unwrap();
        zip_map2_into(&mut out.view_mut(), &a.view(), &b.view(), |x, y| x + y).unwrap();
        assert_eq!(out.data(), &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
    }

    #[test]
    fn test_map_inplace_strided() {
        let mut data = vec![1.0f32, -1.0, 2.0, -1.0, 3.0, -1.0, 4.0, -1.0];
        let mut view = MatrixViewMut::new(&mut data, 2, 2, 4, 2).unwrap();
        map_inplace(&mut view, |x| x * 10.0).unwrap();
        assert_eq!(data, vec![10.0, -1.0, 20.0, -1.0, 30.0, -1.0, 40.0, -1.0]);
    }
}
