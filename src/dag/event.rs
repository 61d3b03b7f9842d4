// src/dag/event.rs

//! One-shot events.

use std::fmt;

use crate::buffer::BufferHandle;
use crate::dag::task_info::TaskHandle;

/// What a satisfied event carries to its listeners.
pub type Payload = BufferHandle;

/// Handle to an event owned by a [`crate::dag::Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventHandle(pub(crate) usize);

impl EventHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EventHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

/// Public view of an event's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    Pending,
    Satisfied,
}

/// Scheduler-side storage for one event.
#[derive(Debug, Default)]
pub(crate) struct EventSlot {
    /// `Some` once satisfied; never replaced afterwards.
    pub payload: Option<Payload>,
    /// Tasks whose join includes this event, in submission order.
    pub listeners: Vec<TaskHandle>,
    /// Every satisfy attempt, including rejected ones.
    pub satisfy_calls: usize,
}

impl EventSlot {
    pub fn state(&self) -> EventState {
        if self.payload.is_some() {
            EventState::Satisfied
        } else {
            EventState::Pending
        }
    }
}
