// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::buffer::BufferId;
use crate::dag::{EventHandle, TaskHandle, TemplateHandle};

/// Exit code used for every invalid command line.
pub const ARGUMENT_EXIT_CODE: i32 = 666;

#[derive(Error, Debug)]
pub enum ReduceError {
    #[error("ERROR: {0}")]
    Argument(String),

    #[error("allocation of {len} slots for pair {pair} failed")]
    Allocation { pair: usize, len: usize },

    #[error("{0} satisfied more than once")]
    DoubleSatisfy(EventHandle),

    #[error("unknown template {0}")]
    UnknownTemplate(TemplateHandle),

    #[error("unknown event {0}")]
    UnknownEvent(EventHandle),

    #[error("unknown task {0}")]
    UnknownTask(TaskHandle),

    #[error("template '{template}' expects {expected} {what}, got {got}")]
    ArityMismatch {
        template: String,
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("a join needs at least one event")]
    EmptyJoin,

    #[error("{event} has more than one producer ({first} and {second})")]
    MultipleProducers {
        event: EventHandle,
        first: TaskHandle,
        second: TaskHandle,
    },

    #[error("{task} depends on {event}, which no task produces")]
    DanglingDependency { task: TaskHandle, event: EventHandle },

    #[error("cycle detected in task graph involving {0}")]
    GraphCycle(TaskHandle),

    #[error("template '{template}': parameter {index} is not {expected}")]
    BadParam {
        template: String,
        index: usize,
        expected: &'static str,
    },

    #[error("{0} is already held by another task")]
    BufferBusy(BufferId),

    #[error("{id} has {len} slots, {needed} required")]
    BufferLength {
        id: BufferId,
        len: usize,
        needed: usize,
    },

    #[error("{task} failed: {message}")]
    TaskFailed { task: TaskHandle, message: String },

    #[error("run stalled with {pending} task(s) that can never become ready")]
    Stalled { pending: usize },

    #[error("runtime channel closed")]
    ChannelClosed,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReduceError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReduceError::Argument(_) => ARGUMENT_EXIT_CODE,
            _ => 1,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ReduceError>;
