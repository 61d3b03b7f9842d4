// src/dag/mod.rs

//! Dataflow scheduling.
//!
//! - [`scheduler`] owns templates, events and tasks, and decides when a
//!   task's inputs are all present.
//! - [`event`] holds the single-assignment events tasks wait on.
//! - [`join`] is the AND-join a task declares over its inputs.
//! - [`template`] describes task kinds, typed parameters and task bodies.
//! - [`task_info`] provides task handles, run state and scheduled tasks.
//! - [`task_context`] collects what a running body asks the scheduler to do.
//! - [`state_manager`] implements readiness transitions.
//! - [`scheduler_step`] defines the result type for manual stepping.
//! - [`graph`] derives and validates the producer → consumer graph.

pub mod event;
pub mod graph;
pub mod join;
pub mod scheduler;
pub mod scheduler_step;
pub mod state_manager;
pub mod task_context;
pub mod task_info;
pub mod template;

pub use event::{EventHandle, EventState, Payload};
pub use graph::TaskGraph;
pub use join::Join;
pub use scheduler::Scheduler;
pub use scheduler_step::SchedulerStep;
pub use task_context::{TaskContext, TaskEffects};
pub use task_info::{ScheduledTask, TaskHandle, TaskRunState};
pub use template::{Param, TaskArgs, TaskBody, Template, TemplateHandle};
