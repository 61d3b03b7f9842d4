// src/dag/task_info.rs

//! Task metadata and per-task run state.

use std::fmt;

use crate::dag::event::EventHandle;
use crate::dag::template::{Param, TaskArgs, TaskBody, TemplateHandle};

/// Handle returned by [`crate::dag::Scheduler::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(pub(crate) u64);

impl TaskHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Where a task is in its single execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRunState {
    /// Submitted; at least one input event is still pending.
    Pending,
    /// Every input is satisfied; waiting to be handed to the executor.
    Ready,
    /// Dispatched to the executor.
    Running,
    /// Finished and discarded.
    Done,
}

/// A submitted task, as the scheduler tracks it until it finishes.
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub handle: TaskHandle,
    pub template: TemplateHandle,
    pub params: Vec<Param>,
    /// Input events in join order.
    pub deps: Vec<EventHandle>,
    /// Inputs not yet satisfied.
    pub missing: usize,
    pub run_state: TaskRunState,
}

impl TaskInfo {
    /// Events this task will satisfy, according to its parameters.
    pub fn produced_events(&self) -> impl Iterator<Item = EventHandle> + '_ {
        self.params
            .iter()
            .flat_map(|p| p.produced_events().iter().copied())
    }
}

/// A task the scheduler wants the executor to run now.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub handle: TaskHandle,
    pub body: TaskBody,
    pub args: TaskArgs,
}

impl ScheduledTask {
    pub fn template_name(&self) -> &str {
        &self.args.template
    }
}
