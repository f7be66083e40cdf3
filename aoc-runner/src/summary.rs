//! Folding solver results into a run summary

use crate::orchestrator::SolverResult;
use std::time::Duration;

/// Running totals over the results of one run
#[derive(Debug, Default)]
pub struct RunSummary {
    count: usize,
    slowest: Option<SolverResult>,
    all_passed: Option<bool>,
}

impl RunSummary {
    /// Record one result; returns whether it passed
    ///
    /// A result without a known answer counts as passing.
    pub fn record(&mut self, result: &SolverResult) -> bool {
        self.count += 1;
        if self
            .slowest
            .as_ref()
            .is_none_or(|slowest| result.duration > slowest.duration)
        {
            self.slowest = Some(result.clone());
        }
        let passed = !result.incorrect();
        self.all_passed = Some(self.all_passed.unwrap_or(true) && passed);
        passed
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Longest running result, the first one on ties
    pub fn slowest(&self) -> Option<&SolverResult> {
        self.slowest.as_ref()
    }

    pub fn slowest_duration(&self) -> Option<Duration> {
        self.slowest.as_ref().map(|result| result.duration)
    }

    /// `None` until a result is recorded
    pub fn all_passed(&self) -> Option<bool> {
        self.all_passed
    }

    pub fn exit_code(&self) -> i32 {
        match self.all_passed {
            Some(false) => 1,
            Some(true) | None => 0,
        }
    }
}
