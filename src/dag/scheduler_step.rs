// src/dag/scheduler_step.rs

//! Step-by-step result types for the scheduler.

use crate::dag::event::EventHandle;
use crate::dag::task_info::TaskHandle;

/// Structured result of satisfying a single event.
///
/// Useful for tests that drive the scheduler by hand and want to assert on
/// fan-out.
#[derive(Debug, Clone)]
pub struct SchedulerStep {
    /// The event that was satisfied.
    pub event: EventHandle,
    /// Tasks whose join completed because of this event.
    pub newly_ready: Vec<TaskHandle>,
}
