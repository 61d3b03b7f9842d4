// src/exec/executor_loop.rs

//! Main executor loop that hands task bodies to the worker pool.

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::dag::ScheduledTask;
use crate::engine::{RuntimeEvent, TaskOutcome};
use crate::errors::ReduceError;
use crate::exec::task_runner::run_task;

/// Spawn the background executor loop.
///
/// The returned `mpsc::Sender<ScheduledTask>` is what `RealExecutorBackend`
/// forwards ready tasks to. Each task body runs on Tokio's blocking pool,
/// which is the worker pool of this program; its size is set when the Tokio
/// runtime is built. Bodies never yield, so they do not belong on the async
/// workers.
pub fn spawn_executor(runtime_tx: mpsc::Sender<RuntimeEvent>) -> mpsc::Sender<ScheduledTask> {
    let (tx, mut rx) = mpsc::channel::<ScheduledTask>(64);

    tokio::spawn(async move {
        info!("executor loop started");

        while let Some(task) = rx.recv().await {
            dispatch_task(task, &runtime_tx);
        }

        info!("executor loop finished (channel closed)");
    });

    tx
}

/// Run `task` on the blocking pool and report its completion.
///
/// A panicking body is reported as a failed task so the runtime aborts
/// instead of waiting forever.
fn dispatch_task(task: ScheduledTask, runtime_tx: &mpsc::Sender<RuntimeEvent>) {
    let rt_tx = runtime_tx.clone();
    let handle = task.handle;

    tokio::spawn(async move {
        let outcome = match tokio::task::spawn_blocking(move || run_task(task)).await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                error!(task = %handle, error = %join_err, "task body panicked");
                TaskOutcome::Failed(ReduceError::TaskFailed {
                    task: handle,
                    message: join_err.to_string(),
                })
            }
        };

        if rt_tx
            .send(RuntimeEvent::TaskCompleted {
                task: handle,
                outcome,
            })
            .await
            .is_err()
        {
            debug!(task = %handle, "runtime already gone; dropping completion");
        }
    });
}
