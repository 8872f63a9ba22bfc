//! Opaque matrix handles.

use std::fmt;

/// Opaque token naming one matrix owned by a [`MatrixEngine`](crate::MatrixEngine).
///
/// The raw value is a `u64`, wide enough to stand in for a native pointer on
/// the far side of a foreign-function boundary. The low 32 bits are a slot
/// index and the high 32 bits a generation counter; the generation is what
/// lets the engine tell a stale handle from a live one after its slot has
/// been reused. Raw value `0` is never issued.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixHandle(u64);

impl MatrixHandle {
    /// The handle no engine ever issues.
    pub const NULL: MatrixHandle = MatrixHandle(0);

    #[inline]
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        MatrixHandle(((generation as u64) << 32) | index as u64)
    }

    /// Rebuild a handle from the integer the caller was given.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        MatrixHandle(raw)
    }

    /// The integer to hand across the boundary.
    #[inline]
    pub fn into_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        (self.0 & u32::MAX as u64) as usize
    }

    #[inline]
    pub(crate) fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl fmt::Debug for MatrixHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatrixHandle({}v{})", self.index(), self.generation())
    }
}

impl fmt::Display for MatrixHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index(), self.generation())
    }
}
