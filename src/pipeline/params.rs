// src/pipeline/params.rs

use crate::errors::{ReduceError, Result};

/// Largest reduction graph, counted in events, that a run will build.
pub const MAX_GRAPH_EVENTS: usize = u32::MAX as usize;

/// Shape of one reduction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceParams {
    /// Number of times the whole reduction is repeated.
    pub iterations: usize,
    /// Number of vector pairs, one buffer each.
    pub pairs: usize,
    /// Length `L` of each vector; every buffer holds `2 * L` slots.
    pub vector_length: usize,
}

impl ReduceParams {
    /// Validate raw command-line values. Every value must be positive.
    pub fn new(iterations: i64, pairs: i64, vector_length: i64) -> Result<Self> {
        let iterations = positive(iterations, "Iterations must be positive")?;
        let pairs = positive(pairs, "Number of vector pairs must be positive")?;
        let vector_length = positive(vector_length, "Vector length should be positive")?;

        vector_length
            .checked_mul(2)
            .ok_or_else(|| ReduceError::Argument(format!("Vector length too large: {vector_length}")))?;

        let params = Self {
            iterations,
            pairs,
            vector_length,
        };
        if params.event_count().is_none_or(|events| events > MAX_GRAPH_EVENTS) {
            return Err(ReduceError::Argument(format!(
                "Task graph too large: {iterations} iterations of {pairs} vector pairs"
            )));
        }
        Ok(params)
    }

    /// Events the reduction graph needs: `N + I * (3N + 1)`, or `None` if
    /// that does not fit in `usize`. Bounds the task count too, which is
    /// `N + I * (2N + 1) + 1`.
    pub fn event_count(&self) -> Option<usize> {
        let per_iteration = self.pairs.checked_mul(3)?.checked_add(1)?;
        self.iterations
            .checked_mul(per_iteration)?
            .checked_add(self.pairs)
    }

    /// Slots per buffer.
    pub fn buffer_len(&self) -> usize {
        2 * self.vector_length
    }

    /// Value every accumulator slot holds after a correct reduction:
    /// `N * (N + 1)`.
    pub fn expected_value(&self) -> f64 {
        expected_value(self.pairs)
    }

    /// Additions performed per iteration: `N * L` local, `(N - 1) * L` global.
    pub fn flops_per_iteration(&self) -> f64 {
        (2.0 * self.pairs as f64 - 1.0) * self.vector_length as f64
    }
}

fn positive(value: i64, message: &str) -> Result<usize> {
    if value < 1 {
        return Err(ReduceError::Argument(format!("{message}: {value}")));
    }
    usize::try_from(value).map_err(|_| ReduceError::Argument(format!("{message}: {value}")))
}

/// `N * (N + 1)`: what every accumulator slot holds after reducing `pairs`
/// vector pairs.
pub fn expected_value(pairs: usize) -> f64 {
    let n = pairs as f64;
    n * (n + 1.0)
}
