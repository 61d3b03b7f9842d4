// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{debug, error, info, warn};

use crate::dag::{ScheduledTask, Scheduler, TaskHandle};
use crate::engine::TaskOutcome;
use crate::engine::progress::RunProgress;
use crate::errors::{ReduceError, Result};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Send these tasks to the executor.
    DispatchTasks(Vec<ScheduledTask>),
    /// The graph has drained; the shell should stop.
    RequestExit,
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

/// Dispatch whatever the scheduler has ready and decide whether the run goes
/// on.
///
/// - Tasks in flight: keep running.
/// - Nothing in flight and nothing left: the graph drained, request exit.
/// - Nothing in flight but tasks still pending: nothing can ever satisfy
///   them, so the run is stalled.
pub fn dispatch_and_settle(
    scheduler: &mut Scheduler,
    progress: &mut RunProgress,
) -> Result<CoreStep> {
    let mut commands = Vec::new();

    let ready = scheduler.collect_ready();
    if !ready.is_empty() {
        progress.dispatched(ready.len());
        commands.push(CoreCommand::DispatchTasks(ready));
    }

    if !progress.is_quiet() {
        return Ok(CoreStep {
            commands,
            keep_running: true,
        });
    }

    if !scheduler.is_drained() {
        let pending = scheduler.pending_count();
        error!(pending, "no task in flight but tasks remain pending");
        return Err(ReduceError::Stalled { pending });
    }

    if progress.shutdown_requested {
        info!("graph drained after shutdown request");
    } else {
        warn!("graph drained without any task requesting shutdown");
    }
    commands.push(CoreCommand::RequestExit);

    Ok(CoreStep {
        commands,
        keep_running: false,
    })
}

/// Handle a task completion event.
///
/// Applies the task's recorded satisfactions in order. A failed task, or a
/// satisfaction the scheduler rejects, aborts the run.
pub fn handle_task_completion(
    scheduler: &mut Scheduler,
    progress: &mut RunProgress,
    task: TaskHandle,
    outcome: TaskOutcome,
) -> Result<CoreStep> {
    progress.finished_one();
    scheduler.complete(task)?;

    let effects = match outcome {
        TaskOutcome::Success(effects) => effects,
        TaskOutcome::Failed(err) => {
            error!(task = %task, error = %err, "task failed; aborting run");
            return Err(err);
        }
    };

    for (event, payload) in effects.satisfied {
        scheduler.satisfy(event, payload)?;
        progress.events_satisfied += 1;
    }

    if effects.shutdown_requested {
        debug!(task = %task, "task requested shutdown");
        progress.shutdown_requested = true;
    }

    dispatch_and_settle(scheduler, progress)
}
