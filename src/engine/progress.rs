// src/engine/progress.rs

/// Counters the core keeps about the current run.
///
/// The scheduler knows about tasks and events; this tracks what only the
/// runtime can see: how many dispatched tasks have not reported back yet,
/// and whether a task asked for shutdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProgress {
    pub in_flight: usize,
    pub shutdown_requested: bool,
    pub tasks_executed: usize,
    pub events_satisfied: usize,
}

impl RunProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&mut self, count: usize) {
        self.in_flight += count;
    }

    pub fn finished_one(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.tasks_executed += 1;
    }

    pub fn is_quiet(&self) -> bool {
        self.in_flight == 0
    }
}
