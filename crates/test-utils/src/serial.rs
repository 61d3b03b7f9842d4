use std::collections::VecDeque;

use ocr_reduce::dag::{EventHandle, TaskHandle};
use ocr_reduce::engine::{CoreCommand, CoreRuntime, CoreStep, RuntimeEvent, TaskOutcome};
use ocr_reduce::errors::Result;
use ocr_reduce::exec::run_task;

/// What a synchronous single-worker run did, in order.
#[derive(Debug, Default, Clone)]
pub struct SerialTrace {
    /// `(task, template name)` in execution order.
    pub executed: Vec<(TaskHandle, String)>,
    /// Every satisfaction a body recorded, in the order the core applied it.
    pub satisfied: Vec<EventHandle>,
    /// Tasks that were handed out before all of their inputs were satisfied.
    /// Must stay empty.
    pub early_reads: Vec<TaskHandle>,
}

/// Drive `core` to completion on the current thread with a FIFO queue and a
/// single worker.
///
/// Before each task runs, its inputs are checked against the scheduler so a
/// read through a pending event shows up in `early_reads`.
pub fn run_serial(core: &mut CoreRuntime) -> Result<SerialTrace> {
    let mut trace = SerialTrace::default();
    let mut queue = VecDeque::new();

    let step = core.start()?;
    let mut keep_running = enqueue(step, &mut queue);

    while keep_running {
        let Some(task) = queue.pop_front() else {
            // The core says tasks are in flight but none were handed to us.
            break;
        };

        if core.scheduler().deps_satisfied(task.handle) != Some(true) {
            trace.early_reads.push(task.handle);
        }

        let handle = task.handle;
        trace.executed.push((handle, task.template_name().to_string()));

        let outcome = run_task(task);
        if let TaskOutcome::Success(effects) = &outcome {
            trace
                .satisfied
                .extend(effects.satisfied.iter().map(|(event, _)| *event));
        }

        let step = core.step(RuntimeEvent::TaskCompleted {
            task: handle,
            outcome,
        })?;
        keep_running = enqueue(step, &mut queue);
    }

    Ok(trace)
}

fn enqueue(step: CoreStep, queue: &mut VecDeque<ocr_reduce::dag::ScheduledTask>) -> bool {
    for command in step.commands {
        if let CoreCommand::DispatchTasks(tasks) = command {
            queue.extend(tasks);
        }
    }
    step.keep_running
}
