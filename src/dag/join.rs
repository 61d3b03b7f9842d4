// src/dag/join.rs

use crate::dag::event::EventHandle;
use crate::errors::{ReduceError, Result};

/// Conjunctive set of input events: a task joined on these runs only once
/// every one of them is satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Join {
    events: Vec<EventHandle>,
}

impl Join {
    /// Join for tasks without inputs; they are ready as soon as submitted.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn one(event: EventHandle) -> Self {
        Self {
            events: vec![event],
        }
    }

    /// AND-join over `events`. At least one event is required.
    pub fn all(events: impl IntoIterator<Item = EventHandle>) -> Result<Self> {
        let events: Vec<EventHandle> = events.into_iter().collect();
        if events.is_empty() {
            return Err(ReduceError::EmptyJoin);
        }
        Ok(Self { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[EventHandle] {
        &self.events
    }

    pub fn into_events(self) -> Vec<EventHandle> {
        self.events
    }
}
