//! Iteration engine shared by the map, copy and transpose kernels.

use crate::order::{compute_order, LoopOrder};
use crate::{MatrixError, Result};

pub(crate) fn ensure_same_shape(
    op: &'static str,
    lhs: (usize, usize),
    rhs: (usize, usize),
) -> Result<()> {
    if lhs != rhs {
        return Err(MatrixError::DimensionMismatch { op, lhs, rhs });
    }
    Ok(())
}

/// Visit every `(row, col)` of a `(rows, cols)` shape in the order that keeps
/// the smaller strides innermost.
#[inline]
pub(crate) fn for_each_index<F>(rows: usize, cols: usize, strides_list: &[(isize, isize)], mut f: F)
where
    F: FnMut(usize, usize),
{
    match compute_order(rows, cols, strides_list) {
        LoopOrder::RowOuter => {
            for row in 0..rows {
                for col in 0..cols {
                    f(row, col);
                }
            }
        }
        LoopOrder::ColOuter => {
            for col in 0..cols {
                for row in 0..rows {
                    f(row, col);
                }
            }
        }
    }
}
