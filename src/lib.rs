//! Dense strided matrices behind opaque handles.
//!
//! A [`MatrixEngine`] owns a set of matrices and names each one by a
//! [`MatrixHandle`], a plain `u64` that can cross a foreign-function boundary.
//! Every operation takes and returns handles; the matrices themselves never
//! leave the engine.
//!
//! # Core Types
//!
//! - [`MatrixEngine`]: the handle-addressed engine, with [`FloatEngine`] and
//!   [`DoubleEngine`] for `f32` and `f64`
//! - [`MatrixHandle`]: generation-tagged handle; stale handles are detected
//! - [`EngineConfig`]: trace and aliasing switches
//!
//! # Operations
//!
//! - Construction: [`initialize_fill`](MatrixEngine::initialize_fill),
//!   [`initialize_with_data`](MatrixEngine::initialize_with_data),
//!   [`identity`](MatrixEngine::identity), [`wrap_raw`](MatrixEngine::wrap_raw)
//! - Elementwise: [`plus`](MatrixEngine::plus), [`minus`](MatrixEngine::minus)
//!   and their `_assign` forms
//! - Products: [`times`](MatrixEngine::times),
//!   [`times_assign`](MatrixEngine::times_assign),
//!   [`times_assign_square`](MatrixEngine::times_assign_square),
//!   [`times_into`](MatrixEngine::times_into)
//! - Scalars: [`times_scalar`](MatrixEngine::times_scalar),
//!   [`div_scalar`](MatrixEngine::div_scalar) and their `_assign` forms
//! - Element and bulk access: [`get`](MatrixEngine::get),
//!   [`set`](MatrixEngine::set), [`get_array`](MatrixEngine::get_array),
//!   [`set_array`](MatrixEngine::set_array)
//!
//! # Example
//!
//! ```rust
//! use keigen::DoubleEngine;
//!
//! let mut engine = DoubleEngine::new();
//! let a = engine.initialize_with_data(2, 2, &[1.0, 2.0, 3.0, 4.0], 2, 1).unwrap();
//! let i = engine.identity(2).unwrap();
//! let c = engine.times(a, i).unwrap();
//! assert_eq!(engine.to_vec(c).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
//!
//! engine.dispose(c).unwrap();
//! assert!(engine.get(c, 0, 0).is_err());
//! ```

mod config;
mod engine;
mod handle;
mod registry;

pub use config::{EngineConfig, TRACE_ENV};
pub use engine::{DoubleEngine, FloatEngine, MatrixEngine};
pub use handle::MatrixHandle;

pub use keigen_view::{Layout, Matrix, MatrixError, Ownership, Scalar};

// ============================================================================
// Error types
// ============================================================================

/// Errors returned by [`MatrixEngine`] operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Handle was never issued by this engine.
    #[error("invalid handle {0}")]
    InvalidHandle(MatrixHandle),

    /// Handle was issued but its matrix has been disposed.
    #[error("handle {0} already disposed")]
    AlreadyDisposed(MatrixHandle),

    /// Output of a non-allocating product shares a handle or storage with an
    /// operand.
    #[error("destination {dst} aliases operand {operand}")]
    Aliased {
        dst: MatrixHandle,
        operand: MatrixHandle,
    },

    /// Every slot index has been issued.
    #[error("handle registry is full")]
    RegistryFull,

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
