// src/pipeline/builder.rs

use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::buffer::BufferStore;
use crate::dag::{EventHandle, Join, Param, Scheduler, TemplateHandle};
use crate::errors::{ReduceError, Result};
use crate::pipeline::params::ReduceParams;
use crate::pipeline::tasks;
use crate::pipeline::verify::{VerificationReport, VerifyMode};

/// Templates registered for one reduction run.
#[derive(Debug, Clone, Copy)]
struct PipelineTemplates {
    allocate: TemplateHandle,
    initialize: TemplateHandle,
    local_reduce: TemplateHandle,
    global_reduce: TemplateHandle,
    verify: TemplateHandle,
}

/// The reduction graph, fully submitted to a scheduler.
///
/// Wiring per pair `p` and iteration `i`:
///
/// ```text
/// Allocate(p) ──► Initialize(p, 0) ──► LocalReduce(p, 0) ──┐
///                                                         ├─► GlobalReduce(0) ──► ...
///  release(p, i-1) ──► Initialize(p, i) ──► LocalReduce(p, i) ──┘
/// ```
///
/// GlobalReduce of iteration `i` satisfies one release event per pair once it
/// has finished reading; Initialize of iteration `i + 1` for that pair waits on
/// it. Buffer reuse across iterations is therefore ordered by the graph alone.
/// Verify waits on the last iteration's GlobalReduce.
#[derive(Debug)]
pub struct Pipeline {
    params: ReduceParams,
    store: Arc<BufferStore>,
    report: Arc<OnceLock<VerificationReport>>,
    global_events: Vec<EventHandle>,
}

impl Pipeline {
    /// Register the five templates and submit every task of the run.
    ///
    /// Nothing executes here; the scheduler only has the graph.
    pub fn build(
        scheduler: &mut Scheduler,
        params: ReduceParams,
        store: Arc<BufferStore>,
        mode: VerifyMode,
    ) -> Result<Self> {
        let pairs = params.pairs;
        let len = params.vector_length;
        let report = Arc::new(OnceLock::new());

        let templates = PipelineTemplates {
            allocate: scheduler.create_template(
                tasks::ALLOCATE,
                tasks::allocate(store.clone()),
                3,
                0,
            ),
            initialize: scheduler.create_template(tasks::INITIALIZE, tasks::initialize(), 3, 1),
            local_reduce: scheduler.create_template(
                tasks::LOCAL_REDUCE,
                tasks::local_reduce(),
                2,
                1,
            ),
            global_reduce: scheduler.create_template(
                tasks::GLOBAL_REDUCE,
                tasks::global_reduce(),
                4,
                pairs,
            ),
            verify: scheduler.create_template(
                tasks::VERIFY,
                tasks::verify(mode, report.clone()),
                2,
                1,
            ),
        };

        // Setup: one buffer per pair, before any iteration.
        let mut gates = Vec::new();
        for pair in 0..pairs {
            let allocated = scheduler.create_event();
            scheduler.submit(
                templates.allocate,
                vec![Param::count(len), Param::count(pair), Param::Event(allocated)],
                Join::none(),
            )?;
            gates.push(allocated);
        }

        let mut global_events = Vec::new();
        for iteration in 0..params.iterations {
            let mut reduced = Vec::new();
            for (pair, &gate) in gates.iter().enumerate() {
                let initialized = scheduler.create_event();
                scheduler.submit(
                    templates.initialize,
                    vec![Param::count(len), Param::count(pair), Param::Event(initialized)],
                    Join::one(gate),
                )?;

                let local = scheduler.create_event();
                scheduler.submit(
                    templates.local_reduce,
                    vec![Param::count(len), Param::Event(local)],
                    Join::one(initialized),
                )?;
                reduced.push(local);
            }

            let global = scheduler.create_event();
            let releases: Vec<EventHandle> = (0..pairs).map(|_| scheduler.create_event()).collect();
            scheduler.submit(
                templates.global_reduce,
                vec![
                    Param::count(len),
                    Param::Event(global),
                    Param::count(pairs),
                    Param::Events(releases.clone()),
                ],
                Join::all(reduced)?,
            )?;

            debug!(iteration, global = %global, "iteration wired");
            global_events.push(global);
            gates = releases;
        }

        let last = *global_events
            .last()
            .ok_or_else(|| ReduceError::Argument("Iterations must be positive: 0".to_string()))?;
        scheduler.submit(
            templates.verify,
            vec![Param::count(pairs), Param::count(len)],
            Join::one(last),
        )?;

        scheduler.validate_graph()?;

        info!(
            tasks = scheduler.submitted_count(),
            events = scheduler.event_count(),
            pairs,
            iterations = params.iterations,
            "reduction graph submitted"
        );

        Ok(Self {
            params,
            store,
            report,
            global_events,
        })
    }

    pub fn params(&self) -> ReduceParams {
        self.params
    }

    /// The GlobalReduce output event of every iteration, in order.
    pub fn global_events(&self) -> &[EventHandle] {
        &self.global_events
    }

    /// Set once Verify has run.
    pub fn report(&self) -> Option<&VerificationReport> {
        self.report.get()
    }

    /// Current contents of the accumulator (the first `L` slots of pair 0's
    /// buffer), if it has been allocated and is not held by a task.
    pub fn accumulator(&self) -> Option<Vec<f64>> {
        self.store.get(0)?.snapshot(self.params.vector_length).ok()
    }
}
