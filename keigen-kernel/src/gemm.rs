//! Dense matrix product on strided views.

use crate::{MatrixError, Result};
use keigen_traits::Scalar;
use keigen_view::{MatrixView, MatrixViewMut};

/// Check that `a * b` is defined and return the `(m, k, n)` triple.
pub fn product_shape(a: (usize, usize), b: (usize, usize)) -> Result<(usize, usize, usize)> {
    if a.1 != b.0 {
        return Err(MatrixError::DimensionMismatch {
            op: "times",
            lhs: a,
            rhs: b,
        });
    }
    Ok((a.0, a.1, b.1))
}

/// `c = a * b` with `a: (m, k)`, `b: (k, n)`, `c: (m, n)`.
///
/// `c` is overwritten, never read. The borrow of `c` is exclusive, so it
/// cannot share memory with `a` or `b` and the result is accumulated straight
/// into `c` without a temporary.
///
/// Every `c[i, j]` is summed over `p = 0..k` in ascending order on both the
/// contiguous and the strided path, so the two give identical results.
pub fn matmul_into<T: Scalar>(
    c: &mut MatrixViewMut<'_, T>,
    a: &MatrixView<'_, T>,
    b: &MatrixView<'_, T>,
) -> Result<()> {
    let (m, k, n) = product_shape(a.shape(), b.shape())?;
    if c.shape() != (m, n) {
        return Err(MatrixError::DimensionMismatch {
            op: "times_into",
            lhs: c.shape(),
            rhs: (m, n),
        });
    }

    if let (Some(sa), Some(sb)) = (a.as_row_major_slice(), b.as_row_major_slice()) {
        if let Some(sc) = c.as_row_major_slice_mut() {
            matmul_row_major(sc, sa, sb, m, k, n);
            return Ok(());
        }
    }

    for i in 0..m {
        for j in 0..n {
            let mut acc = T::zero();
            for p in 0..k {
                // SAFETY: i < m, p < k, j < n match the checked shapes.
                acc = acc + unsafe { a.get_unchecked(i, p) * b.get_unchecked(p, j) };
            }
            // SAFETY: (i, j) is inside c's (m, n) shape.
            unsafe { c.set_unchecked(i, j, acc) };
        }
    }
    Ok(())
}

/// i-k-j loop over row-major slices; the inner loop streams a row of `b` into
/// a row of `c`.
fn matmul_row_major<T: Scalar>(c: &mut [T], a: &[T], b: &[T], m: usize, k: usize, n: usize) {
    c.fill(T::zero());
    for i in 0..m {
        let c_row = &mut c[i * n..(i + 1) * n];
        let a_row = &a[i * k..(i + 1) * k];
        for (p, &a_ip) in a_row.iter().enumerate() {
            let b_row = &b[p * n..(p + 1) * n];
            for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row.iter()) {
                *c_ij = *c_ij + a_ip * b_pj;
            }
        }
    }
}
