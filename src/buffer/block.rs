// src/buffer/block.rs

//! Fixed-length numeric buffers and the handles tasks use to reach them.

use std::collections::TryReserveError;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use tracing::warn;

use crate::errors::{ReduceError, Result};

/// Identifier of a buffer inside a [`super::BufferStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// Owned `f64` storage whose length never changes after allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    data: Vec<f64>,
}

impl Buffer {
    /// Allocate `len` slots, reporting allocator failure instead of aborting.
    ///
    /// Slots start at zero; callers must not rely on that.
    pub fn try_new(len: usize) -> std::result::Result<Self, TryReserveError> {
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, 0.0);
        Ok(Self { data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }
}

/// Shared handle to a buffer.
///
/// Handles are cheap to clone and travel inside event payloads. Access is
/// exclusive and never waits: whoever holds the event that carries the handle
/// is expected to be the only task touching the buffer.
#[derive(Clone)]
pub struct BufferHandle {
    id: BufferId,
    cell: Arc<Mutex<Buffer>>,
}

impl fmt::Debug for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl BufferHandle {
    pub(crate) fn new(id: BufferId, buffer: Buffer) -> Self {
        Self {
            id,
            cell: Arc::new(Mutex::new(buffer)),
        }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Whether both handles point at the same storage.
    pub fn same_buffer(&self, other: &BufferHandle) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// Take exclusive access to the buffer.
    ///
    /// Fails with [`ReduceError::BufferBusy`] if another task currently holds
    /// it.
    pub fn acquire(&self) -> Result<BufferGuard<'_>> {
        let guard = match self.cell.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(ReduceError::BufferBusy(self.id)),
            Err(TryLockError::Poisoned(poisoned)) => {
                warn!(buffer = %self.id, "previous holder panicked; reusing buffer contents");
                poisoned.into_inner()
            }
        };

        Ok(BufferGuard { id: self.id, guard })
    }

    /// Copy of the first `len` slots.
    pub fn snapshot(&self, len: usize) -> Result<Vec<f64>> {
        let guard = self.acquire()?;
        Ok(guard.prefix(len)?.to_vec())
    }
}

/// Exclusive access to one buffer, with length-checked bulk operations.
pub struct BufferGuard<'a> {
    id: BufferId,
    guard: MutexGuard<'a, Buffer>,
}

impl BufferGuard<'_> {
    pub fn id(&self) -> BufferId {
        self.id
    }

    fn require(&self, needed: usize) -> Result<()> {
        if self.guard.len() < needed {
            return Err(ReduceError::BufferLength {
                id: self.id,
                len: self.guard.len(),
                needed,
            });
        }
        Ok(())
    }

    /// The first `len` slots.
    pub fn prefix(&self, len: usize) -> Result<&[f64]> {
        self.require(len)?;
        Ok(&self.guard.as_slice()[..len])
    }

    /// Write `value` into the first `len` slots.
    pub fn fill_prefix(&mut self, len: usize, value: f64) -> Result<()> {
        self.require(len)?;
        self.guard.as_mut_slice()[..len].fill(value);
        Ok(())
    }

    /// `self[i] += self[i + half]` for `i in 0..half`.
    pub fn fold_halves(&mut self, half: usize) -> Result<()> {
        self.require(half.saturating_mul(2))?;
        let (low, high) = self.guard.as_mut_slice().split_at_mut(half);
        for (dst, src) in low.iter_mut().zip(&high[..half]) {
            *dst += *src;
        }
        Ok(())
    }

    /// `self[i] += other[i]` for `i in 0..len`.
    pub fn accumulate(&mut self, other: &BufferGuard<'_>, len: usize) -> Result<()> {
        self.require(len)?;
        let src = other.prefix(len)?;
        for (dst, src) in self.guard.as_mut_slice()[..len].iter_mut().zip(src) {
            *dst += *src;
        }
        Ok(())
    }
}

impl Deref for BufferGuard<'_> {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        &self.guard
    }
}

impl DerefMut for BufferGuard<'_> {
    fn deref_mut(&mut self) -> &mut Buffer {
        &mut self.guard
    }
}
