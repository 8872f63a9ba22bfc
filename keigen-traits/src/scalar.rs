//! Scalar type bounds for matrix storage and arithmetic.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// Element type of a matrix.
///
/// Everything the engine does to an element is expressed through these
/// bounds: the four arithmetic operators, the additive and multiplicative
/// identities, and equality. Exceptional values (division by zero, overflow)
/// follow whatever the type's own operators do.
///
/// There is a blanket implementation, so `f32` and `f64` (and any custom type
/// with the same operators) are scalars without further work.
pub trait Scalar:
    Copy
    + Send
    + Sync
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + num_traits::Zero
    + num_traits::One
    + 'static
{
}

impl<T> Scalar for T where
    T: Copy
        + Send
        + Sync
        + Debug
        + PartialEq
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
        + num_traits::Zero
        + num_traits::One
        + 'static
{
}
