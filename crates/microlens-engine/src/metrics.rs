//! Per-run counters for the simulation engine.
//!
//! [`RunMetrics`] accumulates as a run steps and is reset when a new run
//! starts. Paced drivers additionally count frames they could not hand to
//! a slow consumer and steps that overran their frame budget.

use crate::step::StepEvaluation;

/// Counters collected over one run.
///
/// Durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Steps evaluated so far.
    pub steps_executed: u64,
    /// Wall-clock time spent evaluating steps, in microseconds.
    pub busy_us: u64,
    /// Steps where the companion added to the magnification.
    pub perturbed_steps: u64,
    /// Steps where the impact parameter was raised to the model's floor.
    pub floor_clamped_steps: u64,
    /// Frames a paced driver dropped because the consumer fell behind.
    pub dropped_frames: u64,
    /// Steps whose processing took longer than the frame interval.
    pub budget_overruns: u64,
}

impl RunMetrics {
    /// Fold one step's evaluation into the counters.
    pub(crate) fn record(&mut self, evaluation: &StepEvaluation, elapsed_us: u64) {
        self.steps_executed += 1;
        self.busy_us = self.busy_us.saturating_add(elapsed_us);
        if evaluation.perturbed() {
            self.perturbed_steps += 1;
        }
        if evaluation.hit_floor() {
            self.floor_clamped_steps += 1;
        }
    }
}
