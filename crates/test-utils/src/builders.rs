use std::sync::Arc;

use ocr_reduce::buffer::BufferStore;
use ocr_reduce::dag::Scheduler;
use ocr_reduce::engine::CoreRuntime;
use ocr_reduce::pipeline::{Pipeline, ReduceParams, VerifyMode};

/// A scheduler with a fully submitted reduction graph, ready to drive.
pub struct PipelineFixture {
    pub pipeline: Pipeline,
    pub core: CoreRuntime,
}

/// Builder for a reduction run to simplify test setup.
pub struct PipelineBuilder {
    iterations: i64,
    pairs: i64,
    vector_length: i64,
    mode: VerifyMode,
}

impl PipelineBuilder {
    pub fn new(iterations: i64, pairs: i64, vector_length: i64) -> Self {
        Self {
            iterations,
            pairs,
            vector_length,
            mode: VerifyMode::First,
        }
    }

    pub fn verify_mode(mut self, mode: VerifyMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn params(&self) -> ReduceParams {
        ReduceParams::new(self.iterations, self.pairs, self.vector_length)
            .expect("builder parameters must be positive")
    }

    pub fn build(self) -> PipelineFixture {
        let params = self.params();
        let mut scheduler = Scheduler::new();
        let store = Arc::new(BufferStore::new());
        let pipeline = Pipeline::build(&mut scheduler, params, store, self.mode)
            .expect("failed to build reduction graph");
        PipelineFixture {
            pipeline,
            core: CoreRuntime::new(scheduler),
        }
    }
}
