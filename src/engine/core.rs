// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for reading
//! completions from a channel and handing scheduled tasks to the executor.
//!
//! The core can be driven entirely by tests, without Tokio or threads.

use crate::dag::Scheduler;
use crate::engine::event_handlers::{CoreStep, dispatch_and_settle, handle_task_completion};
use crate::engine::progress::RunProgress;
use crate::engine::RuntimeEvent;
use crate::errors::Result;

/// Pure core runtime state.
///
/// This owns:
/// - the dataflow scheduler, with every task already submitted
/// - the run progress counters
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    scheduler: Scheduler,
    progress: RunProgress,
}

impl CoreRuntime {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            progress: RunProgress::new(),
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn progress(&self) -> &RunProgress {
        &self.progress
    }

    /// Give the scheduler back, e.g. to inspect events after a run.
    pub fn into_scheduler(self) -> Scheduler {
        self.scheduler
    }

    /// Dispatch the tasks that are ready before anything has run.
    pub fn start(&mut self) -> Result<CoreStep> {
        dispatch_and_settle(&mut self.scheduler, &mut self.progress)
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> Result<CoreStep> {
        match event {
            RuntimeEvent::TaskCompleted { task, outcome } => {
                handle_task_completion(&mut self.scheduler, &mut self.progress, task, outcome)
            }
        }
    }
}
