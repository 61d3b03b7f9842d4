// src/engine/mod.rs

//! Execution engine.
//!
//! This module ties together:
//! - the dataflow scheduler
//! - the run progress counters (what is in flight, whether shutdown was asked)
//! - the main runtime event loop that reacts to task completions
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::time::Duration;

use crate::dag::{TaskEffects, TaskHandle};
use crate::errors::ReduceError;

/// Outcome of one task body execution.
#[derive(Debug)]
pub enum TaskOutcome {
    /// The body returned normally; its recorded effects are to be applied.
    Success(TaskEffects),
    /// The body returned an error or panicked. Fatal for the run.
    Failed(ReduceError),
}

/// Events flowing into the runtime from the executor.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// A task body finished running.
    TaskCompleted {
        task: TaskHandle,
        outcome: TaskOutcome,
    },
}

/// Summary of a drained run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    pub tasks_executed: usize,
    pub events_satisfied: usize,
    /// Wall-clock time from the first dispatch to the last completion.
    pub elapsed: Duration,
}

pub mod core;
pub mod event_handlers;
pub mod progress;
pub mod runtime;

pub use self::core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use progress::RunProgress;
pub use runtime::Runtime;
