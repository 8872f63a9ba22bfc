//! Generational arena mapping [`MatrixHandle`]s to live records.
//!
//! Each slot carries a generation that starts at 1 and is bumped every time
//! the slot's record is removed. A handle is live only while its generation
//! equals the slot's; an older generation means the record was disposed, a
//! newer one (or an index past the end) means the handle was never issued.
//! A slot whose generation would wrap to 0 is retired instead of reused.

use crate::handle::MatrixHandle;
use crate::{EngineError, Result};

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

pub(crate) struct Registry<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }
}

impl<T> Registry<T> {
    /// Number of live records.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn insert(&mut self, value: T) -> Result<MatrixHandle> {
        let handle = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.value.is_none());
            slot.value = Some(value);
            MatrixHandle::new(index, slot.generation)
        } else {
            let index = u32::try_from(self.slots.len()).map_err(|_| EngineError::RegistryFull)?;
            self.slots.push(Slot {
                generation: 1,
                value: Some(value),
            });
            MatrixHandle::new(index, 1)
        };
        self.live += 1;
        Ok(handle)
    }

    fn slot(&self, handle: MatrixHandle) -> Result<&Slot<T>> {
        let slot = self
            .slots
            .get(handle.index())
            .ok_or(EngineError::InvalidHandle(handle))?;
        check_generation(slot, handle)?;
        Ok(slot)
    }

    fn slot_mut(&mut self, handle: MatrixHandle) -> Result<&mut Slot<T>> {
        let slot = self
            .slots
            .get_mut(handle.index())
            .ok_or(EngineError::InvalidHandle(handle))?;
        check_generation(slot, handle)?;
        Ok(slot)
    }

    pub(crate) fn get(&self, handle: MatrixHandle) -> Result<&T> {
        self.slot(handle)?
            .value
            .as_ref()
            .ok_or(EngineError::AlreadyDisposed(handle))
    }

    pub(crate) fn get_mut(&mut self, handle: MatrixHandle) -> Result<&mut T> {
        self.slot_mut(handle)?
            .value
            .as_mut()
            .ok_or(EngineError::AlreadyDisposed(handle))
    }

    /// Swap the record behind a live handle; the handle stays valid.
    pub(crate) fn replace(&mut self, handle: MatrixHandle, value: T) -> Result<T> {
        let slot = self.slot_mut(handle)?;
        match slot.value.as_mut() {
            Some(current) => Ok(std::mem::replace(current, value)),
            None => Err(EngineError::AlreadyDisposed(handle)),
        }
    }

    /// Lend the record behind `handle` out mutably while the rest of the
    /// registry stays readable, then put it back.
    ///
    /// While `f` runs, lookups of `handle` itself report `AlreadyDisposed`;
    /// callers reject operands equal to `handle` beforehand.
    pub(crate) fn with_taken<R>(
        &mut self,
        handle: MatrixHandle,
        f: impl FnOnce(&mut T, &Self) -> R,
    ) -> Result<R> {
        let mut value = self
            .slot_mut(handle)?
            .value
            .take()
            .ok_or(EngineError::AlreadyDisposed(handle))?;
        let out = f(&mut value, &*self);
        self.slots[handle.index()].value = Some(value);
        Ok(out)
    }

    /// Remove the record and invalidate `handle` (and every copy of it).
    pub(crate) fn remove(&mut self, handle: MatrixHandle) -> Result<T> {
        let slot = self.slot_mut(handle)?;
        let value = slot
            .value
            .take()
            .ok_or(EngineError::AlreadyDisposed(handle))?;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free.push(handle.index() as u32);
        }
        self.live -= 1;
        Ok(value)
    }
}

fn check_generation<T>(slot: &Slot<T>, handle: MatrixHandle) -> Result<()> {
    let generation = handle.generation();
    if generation == 0 || (generation > slot.generation && slot.generation != 0) {
        return Err(EngineError::InvalidHandle(handle));
    }
    if generation != slot.generation {
        return Err(EngineError::AlreadyDisposed(handle));
    }
    Ok(())
}
