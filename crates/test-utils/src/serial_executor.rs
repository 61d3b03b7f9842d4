use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use ocr_reduce::dag::ScheduledTask;
use ocr_reduce::engine::RuntimeEvent;
use ocr_reduce::errors::{ReduceError, Result};
use ocr_reduce::exec::{ExecutorBackend, run_task};

/// An executor backend that:
/// - runs every body inline, one at a time, in dispatch order
/// - records the template name of each task it ran
/// - reports `TaskCompleted` for each task right after it ran.
///
/// The runtime does not read its channel while a batch is being dispatched,
/// so the channel must have room for the largest ready batch.
pub struct SerialExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl SerialExecutor {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            runtime_tx,
            executed,
        }
    }
}

impl ExecutorBackend for SerialExecutor {
    fn spawn_ready_tasks(
        &mut self,
        tasks: Vec<ScheduledTask>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            for t in tasks {
                {
                    let mut guard = executed.lock().unwrap();
                    guard.push(t.template_name().to_string());
                }

                let task = t.handle;
                let outcome = run_task(t);
                tx.send(RuntimeEvent::TaskCompleted { task, outcome })
                    .await
                    .map_err(|_| ReduceError::ChannelClosed)?;
            }
            Ok(())
        })
    }
}
