// src/dag/task_context.rs

use crate::dag::event::{EventHandle, Payload};
use crate::dag::task_info::TaskHandle;

/// Side effects a task body asks for while it runs.
///
/// They are applied by the core runtime after the body returns, in the order
/// they were recorded.
#[derive(Debug, Default)]
pub struct TaskEffects {
    pub satisfied: Vec<(EventHandle, Payload)>,
    pub shutdown_requested: bool,
}

/// Handed to a task body for the duration of one execution.
#[derive(Debug)]
pub struct TaskContext {
    task: TaskHandle,
    effects: TaskEffects,
}

impl TaskContext {
    pub fn new(task: TaskHandle) -> Self {
        Self {
            task,
            effects: TaskEffects::default(),
        }
    }

    pub fn task(&self) -> TaskHandle {
        self.task
    }

    /// Satisfy `event` with `payload` once this task finishes.
    pub fn satisfy(&mut self, event: EventHandle, payload: Payload) {
        self.effects.satisfied.push((event, payload));
    }

    /// Ask the runtime to shut down once the graph has drained.
    pub fn request_shutdown(&mut self) {
        self.effects.shutdown_requested = true;
    }

    pub fn into_effects(self) -> TaskEffects {
        self.effects
    }
}
