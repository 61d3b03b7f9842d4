// src/dag/scheduler.rs

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, info};

use crate::dag::event::{EventHandle, EventSlot, EventState, Payload};
use crate::dag::graph::TaskGraph;
use crate::dag::join::Join;
use crate::dag::scheduler_step::SchedulerStep;
use crate::dag::state_manager::StateManager;
use crate::dag::task_info::{ScheduledTask, TaskHandle, TaskInfo, TaskRunState};
use crate::dag::template::{Param, TaskBody, Template, TemplateHandle};
use crate::errors::{ReduceError, Result};

/// Dataflow scheduler: owns templates, events and submitted tasks.
///
/// It is responsible for:
/// - validating task instances against their template
/// - tracking which inputs of each task are still pending
/// - releasing tasks whose whole join has been satisfied
/// - rejecting a second satisfaction of the same event
///
/// The scheduler is synchronous and performs no IO; running task bodies is
/// the executor's job.
///
/// Event slots are never compacted. A satisfied slot keeps its payload handle
/// for the whole run so late listeners, `satisfy_count` and `event_payload`
/// still see it, which makes memory grow with `iterations * pairs`. Payloads
/// are shared handles into the buffer store, so the vectors themselves are
/// not duplicated.
#[derive(Debug, Default)]
pub struct Scheduler {
    templates: Vec<Template>,
    events: Vec<EventSlot>,
    tasks: BTreeMap<TaskHandle, TaskInfo>,
    ready: VecDeque<TaskHandle>,
    next_task: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn manager(&mut self) -> StateManager<'_> {
        StateManager::new(
            &self.templates,
            &mut self.events,
            &mut self.tasks,
            &mut self.ready,
        )
    }

    /// Register a task kind.
    pub fn create_template(
        &mut self,
        name: &str,
        body: TaskBody,
        param_arity: usize,
        dependency_arity: usize,
    ) -> TemplateHandle {
        let handle = TemplateHandle(self.templates.len());
        self.templates.push(Template {
            name: Arc::from(name),
            body,
            param_arity,
            dependency_arity,
        });
        debug!(template = %handle, name, param_arity, dependency_arity, "template created");
        handle
    }

    pub fn template(&self, handle: TemplateHandle) -> Option<&Template> {
        self.templates.get(handle.0)
    }

    /// Create a new pending event.
    pub fn create_event(&mut self) -> EventHandle {
        let handle = EventHandle(self.events.len());
        self.events.push(EventSlot::default());
        handle
    }

    /// Submit a task instance. Never blocks.
    ///
    /// The task becomes eligible to run once every event in `join` is
    /// satisfied.
    pub fn submit(
        &mut self,
        template: TemplateHandle,
        params: Vec<Param>,
        join: Join,
    ) -> Result<TaskHandle> {
        let tpl = self
            .templates
            .get(template.0)
            .ok_or(ReduceError::UnknownTemplate(template))?;

        if params.len() != tpl.param_arity {
            return Err(ReduceError::ArityMismatch {
                template: tpl.name.to_string(),
                what: "parameters",
                expected: tpl.param_arity,
                got: params.len(),
            });
        }
        if join.len() != tpl.dependency_arity {
            return Err(ReduceError::ArityMismatch {
                template: tpl.name.to_string(),
                what: "dependencies",
                expected: tpl.dependency_arity,
                got: join.len(),
            });
        }

        let referenced = join
            .events()
            .iter()
            .chain(params.iter().flat_map(|p| p.produced_events()));
        for &event in referenced {
            if event.0 >= self.events.len() {
                return Err(ReduceError::UnknownEvent(event));
            }
        }

        let handle = TaskHandle(self.next_task);
        self.next_task += 1;

        debug!(task = %handle, template = %tpl.name, deps = join.len(), "task submitted");

        let info = TaskInfo {
            handle,
            template,
            params,
            deps: join.into_events(),
            missing: 0,
            run_state: TaskRunState::Pending,
        };
        self.manager().register_task(info);

        Ok(handle)
    }

    /// Satisfy `event` with `payload`, releasing tasks whose join completes.
    pub fn satisfy(&mut self, event: EventHandle, payload: Payload) -> Result<()> {
        self.step_satisfy(event, payload).map(|_| ())
    }

    /// Manual-step variant of [`Scheduler::satisfy`] that reports which tasks
    /// became ready.
    pub fn step_satisfy(&mut self, event: EventHandle, payload: Payload) -> Result<SchedulerStep> {
        let newly_ready = self.manager().satisfy(event, payload)?;
        Ok(SchedulerStep {
            event,
            newly_ready,
        })
    }

    /// Hand out every ready task, marking each `Running`.
    pub fn collect_ready(&mut self) -> Vec<ScheduledTask> {
        self.manager().collect_new_ready_tasks()
    }

    /// Record that a running task finished.
    pub fn complete(&mut self, task: TaskHandle) -> Result<()> {
        let mut manager = self.manager();
        manager.complete(task)?;
        if manager.all_tasks_terminal() {
            info!("scheduler: all submitted tasks finished");
        }
        Ok(())
    }

    /// Build the producer → consumer graph of the tasks not yet run and
    /// validate it.
    pub fn task_graph(&self) -> Result<TaskGraph> {
        TaskGraph::build(self.tasks.values(), &self.events)
    }

    /// Validate the submitted graph without keeping it.
    pub fn validate_graph(&self) -> Result<()> {
        self.task_graph().map(|_| ())
    }

    pub fn event_state(&self, event: EventHandle) -> Option<EventState> {
        self.events.get(event.0).map(EventSlot::state)
    }

    /// Payload of a satisfied event.
    pub fn event_payload(&self, event: EventHandle) -> Option<&Payload> {
        self.events.get(event.0)?.payload.as_ref()
    }

    /// Number of satisfy attempts made on `event`, rejected ones included.
    pub fn satisfy_count(&self, event: EventHandle) -> Option<usize> {
        self.events.get(event.0).map(|slot| slot.satisfy_calls)
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn events(&self) -> impl Iterator<Item = EventHandle> + '_ {
        (0..self.events.len()).map(EventHandle)
    }

    /// State of a task. Finished tasks are discarded and report `Done`.
    pub fn task_state(&self, task: TaskHandle) -> Option<TaskRunState> {
        match self.tasks.get(&task) {
            Some(info) => Some(info.run_state),
            None if task.0 < self.next_task => Some(TaskRunState::Done),
            None => None,
        }
    }

    /// Whether every input of `task` is satisfied. `None` for unknown or
    /// finished tasks.
    pub fn deps_satisfied(&self, task: TaskHandle) -> Option<bool> {
        let info = self.tasks.get(&task)?;
        Some(
            info.deps
                .iter()
                .all(|dep| self.events[dep.0].payload.is_some()),
        )
    }

    /// Unfinished tasks per template, in registration order.
    pub fn template_census(&self) -> Vec<(&str, usize)> {
        let mut counts = vec![0usize; self.templates.len()];
        for info in self.tasks.values() {
            if let Some(count) = counts.get_mut(info.template.0) {
                *count += 1;
            }
        }
        self.templates
            .iter()
            .zip(counts)
            .map(|(tpl, count)| (&*tpl.name, count))
            .collect()
    }

    pub fn submitted_count(&self) -> u64 {
        self.next_task
    }

    fn count_in(&self, state: TaskRunState) -> usize {
        self.tasks
            .values()
            .filter(|info| info.run_state == state)
            .count()
    }

    /// Tasks still waiting on at least one input.
    pub fn pending_count(&self) -> usize {
        self.count_in(TaskRunState::Pending)
    }

    /// Tasks ready but not yet collected.
    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }

    pub fn running_count(&self) -> usize {
        self.count_in(TaskRunState::Running)
    }

    /// `true` once no task is pending, ready or running.
    pub fn is_drained(&self) -> bool {
        self.tasks.is_empty()
    }
}
