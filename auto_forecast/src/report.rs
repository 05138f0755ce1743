//! Sinks that record which model a facade selected

use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Receives the winner's name once per successful training
pub trait SelectionReporter: Send + Sync + Debug {
    fn record_chosen_model(&self, name: &str);
}

/// Logs the chosen model at `info`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl SelectionReporter for LogReporter {
    fn record_chosen_model(&self, name: &str) {
        log::info!("Chosen forecast model: {}", name);
    }
}

/// Discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl SelectionReporter for NoopReporter {
    fn record_chosen_model(&self, _name: &str) {}
}

#[derive(Debug, Default)]
struct Reported {
    last: Option<String>,
    count: usize,
}

/// Keeps the most recently chosen model name
///
/// Share one instance (behind an `Arc`) between facades to observe the last
/// choice made by any of them.
#[derive(Debug, Default)]
pub struct LastChosenModel {
    state: Mutex<Reported>,
}

impl LastChosenModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Reported> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Name recorded by the latest report, if any
    pub fn last(&self) -> Option<String> {
        self.lock().last.clone()
    }

    /// Number of reports received
    pub fn count(&self) -> usize {
        self.lock().count
    }
}

impl SelectionReporter for LastChosenModel {
    fn record_chosen_model(&self, name: &str) {
        let mut state = self.lock();
        state.last = Some(name.to_string());
        state.count += 1;
    }
}
