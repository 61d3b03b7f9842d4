// src/dag/template.rs

//! Task templates, typed parameters and the argument view task bodies see.

use std::fmt;
use std::sync::Arc;

use crate::dag::event::{EventHandle, Payload};
use crate::dag::task_context::TaskContext;
use crate::dag::task_info::TaskHandle;
use crate::errors::{ReduceError, Result};

/// Handle to a template registered with a [`crate::dag::Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateHandle(pub(crate) usize);

impl fmt::Display for TemplateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template#{}", self.0)
    }
}

type BodyFn = dyn Fn(&TaskArgs, &mut TaskContext) -> Result<()> + Send + Sync;

/// Code run by every task instantiated from a template.
///
/// A body runs to completion on a worker thread. It reports its output by
/// calling [`TaskContext::satisfy`]; nothing it records is visible to other
/// tasks before it returns.
#[derive(Clone)]
pub struct TaskBody(Arc<BodyFn>);

impl TaskBody {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&TaskArgs, &mut TaskContext) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(body))
    }

    pub fn call(&self, args: &TaskArgs, ctx: &mut TaskContext) -> Result<()> {
        (self.0)(args, ctx)
    }
}

impl fmt::Debug for TaskBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TaskBody(..)")
    }
}

/// A task kind: body plus the parameter and dependency counts every instance
/// must match.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: Arc<str>,
    pub body: TaskBody,
    pub param_arity: usize,
    pub dependency_arity: usize,
}

/// A typed task parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Value(u64),
    /// An event this task is expected to satisfy.
    Event(EventHandle),
    /// Several events this task is expected to satisfy.
    Events(Vec<EventHandle>),
}

impl Param {
    pub fn count(n: usize) -> Self {
        Param::Value(n as u64)
    }

    /// Events this parameter hands to the task as outputs.
    pub fn produced_events(&self) -> &[EventHandle] {
        match self {
            Param::Value(_) => &[],
            Param::Event(event) => std::slice::from_ref(event),
            Param::Events(events) => events,
        }
    }
}

/// Everything a body gets to read: its parameters and the payloads of its
/// input events, in join order.
#[derive(Debug, Clone)]
pub struct TaskArgs {
    pub task: TaskHandle,
    pub template: Arc<str>,
    pub params: Vec<Param>,
    pub inputs: Vec<Payload>,
}

impl TaskArgs {
    fn bad_param(&self, index: usize, expected: &'static str) -> ReduceError {
        ReduceError::BadParam {
            template: self.template.to_string(),
            index,
            expected,
        }
    }

    pub fn value(&self, index: usize) -> Result<u64> {
        match self.params.get(index) {
            Some(Param::Value(v)) => Ok(*v),
            _ => Err(self.bad_param(index, "a value")),
        }
    }

    pub fn count(&self, index: usize) -> Result<usize> {
        let value = self.value(index)?;
        usize::try_from(value).map_err(|_| self.bad_param(index, "a count"))
    }

    pub fn event(&self, index: usize) -> Result<EventHandle> {
        match self.params.get(index) {
            Some(Param::Event(e)) => Ok(*e),
            _ => Err(self.bad_param(index, "an event")),
        }
    }

    pub fn events(&self, index: usize) -> Result<&[EventHandle]> {
        match self.params.get(index) {
            Some(Param::Events(events)) => Ok(events),
            _ => Err(self.bad_param(index, "an event list")),
        }
    }

    pub fn input(&self, index: usize) -> Result<&Payload> {
        self.inputs
            .get(index)
            .ok_or_else(|| ReduceError::ArityMismatch {
                template: self.template.to_string(),
                what: "inputs",
                expected: index + 1,
                got: self.inputs.len(),
            })
    }
}
