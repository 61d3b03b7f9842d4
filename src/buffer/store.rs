// src/buffer/store.rs

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::buffer::block::{Buffer, BufferHandle, BufferId};
use crate::errors::{ReduceError, Result};

/// Registry of every buffer allocated during a run, keyed by pair index.
///
/// The store only hands out handles; it never reads or writes buffer
/// contents itself, so it does not interfere with the single-writer handoff
/// between tasks.
#[derive(Debug, Default)]
pub struct BufferStore {
    slots: Mutex<BTreeMap<usize, BufferHandle>>,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, BTreeMap<usize, BufferHandle>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate a buffer of `len` slots for `pair` and register it.
    pub fn allocate(&self, pair: usize, len: usize) -> Result<BufferHandle> {
        let buffer = Buffer::try_new(len).map_err(|err| {
            warn!(pair, len, error = %err, "buffer allocation failed");
            ReduceError::Allocation { pair, len }
        })?;

        let handle = BufferHandle::new(BufferId(pair), buffer);
        if self.slots().insert(pair, handle.clone()).is_some() {
            warn!(pair, "pair already had a buffer; replacing it");
        }
        debug!(buffer = %handle.id(), len, "created buffer");

        Ok(handle)
    }

    pub fn get(&self, pair: usize) -> Option<BufferHandle> {
        self.slots().get(&pair).cloned()
    }

    /// Number of buffers allocated so far.
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }
}
