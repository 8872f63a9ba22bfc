//! Engine configuration.

/// Environment variable that turns on per-operation tracing when set to `1`.
pub const TRACE_ENV: &str = "KEIGEN_TRACE";

/// Runtime switches for a [`MatrixEngine`](crate::MatrixEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Emit a `tracing::trace!` event for every operation, naming its operand handles.
    pub trace: bool,
    /// In `times_into`, also compare backing-buffer address ranges so that
    /// distinct handles wrapping overlapping caller memory are rejected.
    /// Distinct handles with owned storage never overlap.
    pub check_aliasing: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trace: false,
            check_aliasing: true,
        }
    }
}

impl EngineConfig {
    /// Defaults, with `trace` taken from `KEIGEN_TRACE`.
    pub fn from_env() -> Self {
        Self {
            trace: matches!(std::env::var(TRACE_ENV), Ok(ref v) if v == "1"),
            ..Self::default()
        }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_check_aliasing(mut self, check_aliasing: bool) -> Self {
        self.check_aliasing = check_aliasing;
        self
    }
}
