//! Shared traits for the keigen matrix engine.
//!
//! This crate holds the scalar bound used by `keigen-view`, `keigen-kernel`
//! and the handle layer in `keigen`. External crates can depend on it to
//! implement [`Scalar`] for their own element types without pulling in the
//! engine.

pub mod scalar;

pub use scalar::Scalar;
