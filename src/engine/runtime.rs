// src/engine/runtime.rs

use std::fmt;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::dag::ScheduledTask;
use crate::errors::{ReduceError, Result};
use crate::exec::ExecutorBackend;

use super::core::CoreRuntime;
use super::{CoreCommand, RunStats, RuntimeEvent};

/// Drives the dataflow scheduler in response to `RuntimeEvent`s and
/// delegates task execution to an `ExecutorBackend`.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics.
pub struct Runtime<E: ExecutorBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(core: CoreRuntime, event_rx: mpsc::Receiver<RuntimeEvent>, executor: E) -> Self {
        Self {
            core,
            event_rx,
            executor,
        }
    }

    /// Run the graph until no task is runnable or pending, then dispose of
    /// the scheduler.
    ///
    /// Returns early with the first fatal error (failed task, double
    /// satisfaction, stalled graph).
    pub async fn drain_and_shutdown(mut self) -> Result<RunStats> {
        info!("runtime started");
        let started = Instant::now();

        let step = self.core.start()?;
        let mut keep_running = step.keep_running;
        for command in step.commands {
            self.execute_command(command).await?;
        }

        while keep_running {
            let event = self.event_rx.recv().await.ok_or(ReduceError::ChannelClosed)?;

            let step = self.core.step(event)?;
            for command in step.commands {
                self.execute_command(command).await?;
            }
            keep_running = step.keep_running;
        }

        let progress = self.core.progress().clone();
        let stats = RunStats {
            tasks_executed: progress.tasks_executed,
            events_satisfied: progress.events_satisfied,
            elapsed: started.elapsed(),
        };

        info!(
            tasks = stats.tasks_executed,
            events = stats.events_satisfied,
            elapsed_ms = stats.elapsed.as_millis(),
            "runtime drained; shutting down"
        );

        drop(self.core.into_scheduler());
        Ok(stats)
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::DispatchTasks(tasks) => {
                self.spawn_ready(tasks).await?;
            }
            CoreCommand::RequestExit => {
                debug!("core issued RequestExit command");
            }
        }
        Ok(())
    }

    async fn spawn_ready(&mut self, tasks: Vec<ScheduledTask>) -> Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }

        let handles: Vec<_> = tasks.iter().map(|t| t.handle.id()).collect();
        debug!(?handles, "spawning ready tasks");

        self.executor.spawn_ready_tasks(tasks).await
    }
}
