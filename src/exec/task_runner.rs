// src/exec/task_runner.rs

//! Individual task body runner.

use tracing::{debug, error};

use crate::dag::{ScheduledTask, TaskContext};
use crate::engine::TaskOutcome;

/// Run one task body to completion on the current thread.
///
/// The body's satisfactions and shutdown request are returned as effects;
/// nothing is applied to the scheduler here.
pub fn run_task(task: ScheduledTask) -> TaskOutcome {
    let ScheduledTask { handle, body, args } = task;
    let mut ctx = TaskContext::new(handle);

    debug!(task = %handle, template = %args.template, "task started");

    match body.call(&args, &mut ctx) {
        Ok(()) => {
            let effects = ctx.into_effects();
            debug!(
                task = %handle,
                template = %args.template,
                satisfied = effects.satisfied.len(),
                "task finished"
            );
            TaskOutcome::Success(effects)
        }
        Err(err) => {
            error!(
                task = %handle,
                template = %args.template,
                error = %err,
                "task body returned an error"
            );
            TaskOutcome::Failed(err)
        }
    }
}
