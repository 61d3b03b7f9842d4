// src/exec/mod.rs

//! Task execution layer.
//!
//! This module runs task bodies on the worker pool and reports back to the
//! runtime via `RuntimeEvent`s.
//!
//! - [`executor_loop`] owns the background loop that hands tasks to the
//!   blocking pool.
//! - [`task_runner`] runs a single task body and turns its result into a
//!   `TaskOutcome`.
//! - [`backend`] provides the `ExecutorBackend` trait and the concrete
//!   `RealExecutorBackend` the runtime uses in production, and which tests
//!   can replace with a deterministic implementation.

pub mod backend;
pub mod executor_loop;
pub mod task_runner;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use executor_loop::spawn_executor;
pub use task_runner::run_task;
