// src/report.rs

//! Everything the binary writes to stdout.
//!
//! Each type renders to lines so tests can check the exact text without
//! capturing the process output.

use crate::dag::TaskGraph;
use crate::engine::RunStats;
use crate::pipeline::{ReduceParams, VerificationReport};

/// Parameter echo printed before anything runs.
pub fn banner_lines(params: &ReduceParams) -> Vec<String> {
    vec![
        "OCR Vector Reduction".to_string(),
        format!("Number of vector pairs  = {}", params.pairs),
        format!("Vector length           = {}", params.vector_length),
        format!("Number of iterations    = {}", params.iterations),
    ]
}

/// Outcome of a drained run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub params: ReduceParams,
    pub stats: RunStats,
    /// `None` only if the graph drained without Verify running.
    pub verification: Option<VerificationReport>,
}

impl RunReport {
    /// Wall-clock seconds per iteration.
    pub fn avg_time_secs(&self) -> f64 {
        self.stats.elapsed.as_secs_f64() / self.params.iterations as f64
    }

    /// Millions of additions per second over the whole run.
    pub fn mflops(&self) -> f64 {
        let avg = self.avg_time_secs();
        if avg > 0.0 {
            1.0e-6 * self.params.flops_per_iteration() / avg
        } else {
            0.0
        }
    }

    pub fn is_valid(&self) -> bool {
        self.verification.as_ref().is_some_and(VerificationReport::is_valid)
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = match &self.verification {
            Some(report) => report.lines(),
            None => vec!["Verification did not run".to_string()],
        };
        lines.push(format!(
            "Rate (MFlops/s): {:.6},  Avg time (s): {:.6}",
            self.mflops(),
            self.avg_time_secs()
        ));
        lines
    }
}

/// Shape of a submitted graph, for `--dry-run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSummary {
    pub templates: Vec<(String, usize)>,
    pub tasks: usize,
    pub events: usize,
    pub edges: usize,
    pub depth: usize,
}

impl GraphSummary {
    pub fn new(graph: &TaskGraph, templates: Vec<(String, usize)>, events: usize) -> Self {
        Self {
            templates,
            tasks: graph.task_count(),
            events,
            edges: graph.edge_count(),
            depth: graph.depth(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            "ocr-reduce dry-run".to_string(),
            format!("  tasks  = {}", self.tasks),
            format!("  events = {}", self.events),
            format!("  edges  = {}", self.edges),
            format!("  depth  = {}", self.depth),
            String::new(),
            format!("templates ({}):", self.templates.len()),
        ];
        lines.extend(
            self.templates
                .iter()
                .map(|(name, count)| format!("  - {name}: {count} task(s)")),
        );
        lines
    }
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
