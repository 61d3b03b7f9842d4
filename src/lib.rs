// src/lib.rs

pub mod buffer;
pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pipeline;
pub mod report;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::buffer::BufferStore;
use crate::config::RunConfig;
use crate::dag::Scheduler;
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent};
use crate::errors::Result;
use crate::exec::RealExecutorBackend;
use crate::pipeline::Pipeline;
use crate::report::{GraphSummary, RunReport};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the scheduler and the buffer store
/// - the reduction graph
/// - the pure core runtime and its async shell
/// - the blocking-pool executor
///
/// Must be called inside a Tokio runtime; task bodies run on its blocking
/// pool, so `max_blocking_threads` bounds the number of concurrent tasks.
pub async fn run(cfg: &RunConfig) -> Result<RunReport> {
    let mut scheduler = Scheduler::new();
    let store = Arc::new(BufferStore::new());
    let pipeline = Pipeline::build(&mut scheduler, cfg.params, store, cfg.verify_mode)?;

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let executor = RealExecutorBackend::new(rt_tx);

    let core = CoreRuntime::new(scheduler);
    let runtime = Runtime::new(core, rt_rx, executor);

    info!(workers = cfg.workers, "starting reduction");
    let stats = runtime.drain_and_shutdown().await?;

    Ok(RunReport {
        params: pipeline.params(),
        stats,
        verification: pipeline.report().cloned(),
    })
}

/// Build and validate the graph for `cfg` without running anything.
pub fn dry_run(cfg: &RunConfig) -> Result<GraphSummary> {
    let mut scheduler = Scheduler::new();
    let store = Arc::new(BufferStore::new());
    Pipeline::build(&mut scheduler, cfg.params, store, cfg.verify_mode)?;

    let graph = scheduler.task_graph()?;
    let templates = scheduler
        .template_census()
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();

    debug!("dry-run complete (no execution)");
    Ok(GraphSummary::new(&graph, templates, scheduler.event_count()))
}
