// src/dag/state_manager.rs

//! Readiness bookkeeping: which tasks wait on which events, and when a task's
//! join is complete.

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, trace, warn};

use crate::dag::event::{EventHandle, EventSlot, Payload};
use crate::dag::task_info::{ScheduledTask, TaskHandle, TaskInfo, TaskRunState};
use crate::dag::template::{TaskArgs, Template};
use crate::errors::{ReduceError, Result};

/// Mutable view over the scheduler's tables for a single transition.
pub struct StateManager<'a> {
    templates: &'a [Template],
    events: &'a mut [EventSlot],
    tasks: &'a mut BTreeMap<TaskHandle, TaskInfo>,
    ready: &'a mut VecDeque<TaskHandle>,
}

impl<'a> StateManager<'a> {
    pub(crate) fn new(
        templates: &'a [Template],
        events: &'a mut [EventSlot],
        tasks: &'a mut BTreeMap<TaskHandle, TaskInfo>,
        ready: &'a mut VecDeque<TaskHandle>,
    ) -> Self {
        Self {
            templates,
            events,
            tasks,
            ready,
        }
    }

    /// Register a freshly submitted task as a listener of each of its inputs.
    ///
    /// Inputs that are already satisfied count as present, so a task whose
    /// inputs all fired before submission goes straight to `Ready`.
    pub(crate) fn register_task(&mut self, mut info: TaskInfo) {
        let mut missing = 0;
        for dep in &info.deps {
            let slot = &mut self.events[dep.0];
            if slot.payload.is_none() {
                slot.listeners.push(info.handle);
                missing += 1;
            }
        }

        info.missing = missing;
        if missing == 0 {
            info.run_state = TaskRunState::Ready;
            self.ready.push_back(info.handle);
            trace!(task = %info.handle, "all inputs present at submission; Ready");
        } else {
            info.run_state = TaskRunState::Pending;
            trace!(task = %info.handle, missing, "waiting on inputs");
        }

        self.tasks.insert(info.handle, info);
    }

    /// Satisfy `event` and release every listener whose join is now complete.
    ///
    /// Returns the tasks that became ready, in listener order.
    pub fn satisfy(&mut self, event: EventHandle, payload: Payload) -> Result<Vec<TaskHandle>> {
        let slot = self
            .events
            .get_mut(event.0)
            .ok_or(ReduceError::UnknownEvent(event))?;

        slot.satisfy_calls += 1;
        if slot.payload.is_some() {
            return Err(ReduceError::DoubleSatisfy(event));
        }

        debug!(event = %event, buffer = %payload.id(), "event satisfied");
        slot.payload = Some(payload);
        let listeners = std::mem::take(&mut slot.listeners);

        let mut newly_ready = Vec::new();
        for handle in listeners {
            let Some(info) = self.tasks.get_mut(&handle) else {
                warn!(task = %handle, event = %event, "listener missing from task table");
                continue;
            };

            if info.run_state != TaskRunState::Pending {
                continue;
            }

            info.missing = info.missing.saturating_sub(1);
            if info.missing == 0 {
                info.run_state = TaskRunState::Ready;
                self.ready.push_back(handle);
                newly_ready.push(handle);
                trace!(task = %handle, "join complete; Ready");
            }
        }

        Ok(newly_ready)
    }

    /// Hand out every `Ready` task, marking it `Running`.
    ///
    /// Order is the order in which tasks became ready.
    pub fn collect_new_ready_tasks(&mut self) -> Vec<ScheduledTask> {
        let mut scheduled = Vec::with_capacity(self.ready.len());

        while let Some(handle) = self.ready.pop_front() {
            let Some(info) = self.tasks.get_mut(&handle) else {
                warn!(task = %handle, "ready task missing from task table");
                continue;
            };

            let inputs: Option<Vec<Payload>> = info
                .deps
                .iter()
                .map(|dep| self.events[dep.0].payload.clone())
                .collect();

            // Should not happen: `missing` reached zero only after every
            // input fired. Leave the task pending rather than run it blind.
            let Some(inputs) = inputs else {
                warn!(task = %handle, "ready task has a pending input; keeping it Pending");
                info.run_state = TaskRunState::Pending;
                continue;
            };

            let template = &self.templates[info.template.0];
            info.run_state = TaskRunState::Running;
            debug!(task = %handle, template = %template.name, "dispatching task");

            scheduled.push(ScheduledTask {
                handle,
                body: template.body.clone(),
                args: TaskArgs {
                    task: handle,
                    template: template.name.clone(),
                    params: std::mem::take(&mut info.params),
                    inputs,
                },
            });
        }

        scheduled
    }

    /// Mark a running task as finished and discard it.
    pub fn complete(&mut self, handle: TaskHandle) -> Result<()> {
        match self.tasks.get(&handle) {
            Some(info) if info.run_state == TaskRunState::Running => {
                self.tasks.remove(&handle);
                Ok(())
            }
            Some(info) => {
                warn!(task = %handle, state = ?info.run_state, "completion for a task that is not running");
                Err(ReduceError::UnknownTask(handle))
            }
            None => Err(ReduceError::UnknownTask(handle)),
        }
    }

    /// Whether every submitted task has finished.
    pub fn all_tasks_terminal(&self) -> bool {
        self.tasks.is_empty()
    }
}
