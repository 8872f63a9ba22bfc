//! Loop ordering for 2-D strided iteration.
//!
//! Every operand votes for the axis with the smaller absolute stride to be
//! iterated innermost; the destination's vote counts twice. Axes of length
//! one never win a vote since their stride is irrelevant.

/// Which axis the inner loop walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopOrder {
    /// `for row { for col { .. } }`
    RowOuter,
    /// `for col { for row { .. } }`
    ColOuter,
}

/// Pick the loop order for a `(rows, cols)` iteration over operands with the
/// given `(outer, inner)` stride pairs. `strides_list[0]` is the destination.
pub(crate) fn compute_order(rows: usize, cols: usize, strides_list: &[(isize, isize)]) -> LoopOrder {
    if rows <= 1 || cols <= 1 {
        return if rows <= 1 {
            LoopOrder::RowOuter
        } else {
            LoopOrder::ColOuter
        };
    }
    let mut score = 0i64;
    for (k, &(outer, inner)) in strides_list.iter().enumerate() {
        let weight = if k == 0 { 2 } else { 1 };
        if inner.unsigned_abs() <= outer.unsigned_abs() {
            score += weight;
        } else {
            score -= weight;
        }
    }
    if score >= 0 {
        LoopOrder::RowOuter
    } else {
        LoopOrder::ColOuter
    }
}
