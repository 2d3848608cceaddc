//! The run state machine.
//!
//! [`Stepper`] owns everything belonging to one run: the validated
//! config, the next step index, the growing [`LightCurve`] and the run's
//! metrics. There is no ambient state; drivers hold a `Stepper` and
//! thread it through successive steps.
//!
//! # States
//!
//! ```text
//!            start(cfg)             step() reaches total_steps
//!   Idle ─────────────────▶ Running ─────────────────────────▶ Completed
//!    ▲                        │  ▲                                  │
//!    │                cancel()│  │start(cfg) (restart)              │
//!    │                        ▼  │                                  │
//!    │                     Cancelled ◀──────────────────────────────┘
//!    │                        │          (start(cfg) from either
//!    └──────── reset() ───────┘           terminal state re-enters Running)
//! ```
//!
//! A rejected `start()` leaves the stepper exactly as it was, including
//! the previous run's curve.

use std::fmt;
use std::time::Instant;

use microlens_core::{CurveError, LightCurve, StepIndex};

use crate::config::{ConfigError, SimulationConfig};
use crate::frame::Frame;
use crate::metrics::RunMetrics;
use crate::step::evaluate_step;

/// Upper bound on the curve capacity reserved up front.
const MAX_PREALLOCATED_SAMPLES: u64 = 1 << 16;

// ── RunState ────────────────────────────────────────────────────

/// Lifecycle state of a [`Stepper`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// No run in progress.
    Idle,
    /// A run is in progress and accepts `step()`.
    Running,
    /// The run evaluated every configured step.
    Completed,
    /// The run was stopped early; its partial curve is retained.
    Cancelled,
}

impl RunState {
    /// Whether `step()` will advance the run.
    pub fn is_running(self) -> bool {
        self == Self::Running
    }

    /// Whether the run has ended, normally or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

// ── StepError ───────────────────────────────────────────────────

/// Errors from [`Stepper::step()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// `step()` was called while no run was in progress.
    NotRunning {
        /// The state the stepper was in.
        state: RunState,
    },
    /// The light curve refused the sample.
    Curve(CurveError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRunning { state } => write!(f, "cannot step: run is {state}"),
            Self::Curve(e) => write!(f, "light curve: {e}"),
        }
    }
}

impl std::error::Error for StepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Curve(e) => Some(e),
            Self::NotRunning { .. } => None,
        }
    }
}

impl From<CurveError> for StepError {
    fn from(e: CurveError) -> Self {
        Self::Curve(e)
    }
}

// ── Stepper ─────────────────────────────────────────────────────

/// Single-run simulation state machine.
///
/// # Example
///
/// ```
/// use microlens_engine::{RunState, SimulationConfig, Stepper};
///
/// let mut stepper = Stepper::new();
/// stepper.start(SimulationConfig::default()).unwrap();
/// while stepper.state().is_running() {
///     let frame = stepper.step().unwrap();
///     let _ = (frame.lens(), frame.companion(), frame.magnification());
/// }
/// assert_eq!(stepper.state(), RunState::Completed);
/// assert_eq!(stepper.light_curve().len(), 200);
/// ```
#[derive(Debug)]
pub struct Stepper {
    config: Option<SimulationConfig>,
    next_step: StepIndex,
    curve: LightCurve,
    state: RunState,
    metrics: RunMetrics,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new()
    }
}

impl Stepper {
    /// An idle stepper with an empty curve.
    pub fn new() -> Self {
        Self {
            config: None,
            next_step: StepIndex::ZERO,
            curve: LightCurve::new(),
            state: RunState::Idle,
            metrics: RunMetrics::default(),
        }
    }

    /// Begin a fresh run with `config`.
    ///
    /// Valid from any state. Starting while `Running` abandons the
    /// in-progress run: configs never change mid-run, they restart it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by validation. The stepper
    /// is left untouched: same state, same config, same curve.
    pub fn start(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if self.state.is_running() {
            log::debug!(
                "restarting run at step {} of {}",
                self.next_step,
                self.total_steps()
            );
        }
        log::debug!(
            "starting run: {} steps, span {}, orbit {} @ {} rad/step",
            config.total_steps,
            config.transit_span,
            config.orbital_distance,
            config.angular_speed,
        );

        let capacity = config.total_steps.min(MAX_PREALLOCATED_SAMPLES) as usize;
        self.curve = LightCurve::with_capacity(capacity);
        self.next_step = StepIndex::ZERO;
        self.metrics = RunMetrics::default();
        self.config = Some(config);
        self.state = RunState::Running;
        Ok(())
    }

    /// Evaluate the next step, append its sample, and advance.
    ///
    /// Returns a [`Frame`] borrowing the curve so far. When the final step
    /// is recorded the stepper moves to [`RunState::Completed`] before
    /// returning that step's frame.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::NotRunning`] outside [`RunState::Running`].
    pub fn step(&mut self) -> Result<Frame<'_>, StepError> {
        let config = match (&self.config, self.state) {
            (Some(config), RunState::Running) => config,
            (_, state) => return Err(StepError::NotRunning { state }),
        };

        let started = Instant::now();
        let evaluation = evaluate_step(self.next_step, config);
        self.curve.push(evaluation.sample())?;
        let elapsed_us = started.elapsed().as_micros() as u64;
        self.metrics.record(&evaluation, elapsed_us);

        log::trace!(
            "step {}: lens x {:.4}, A = {:.5} (+{:.5})",
            evaluation.step,
            evaluation.positions.lens.x,
            evaluation.magnification,
            evaluation.perturbation,
        );

        self.next_step = self.next_step.next();
        // Step-indexed transits end exactly on `half_span()`, so the step
        // count ends the run first; this bounds a lens that overshoots.
        let out_of_range = evaluation.positions.lens.x > config.kinematics().half_span();
        if self.next_step.0 >= config.total_steps || out_of_range {
            self.state = RunState::Completed;
            log::debug!(
                "run completed after {} steps ({} us busy)",
                self.metrics.steps_executed,
                self.metrics.busy_us,
            );
        }

        Ok(Frame {
            evaluation,
            curve: self.curve.samples(),
        })
    }

    /// Stop the run between steps, keeping the samples recorded so far.
    ///
    /// Returns `true` if a running run was cancelled, `false` if there was
    /// nothing to cancel.
    pub fn cancel(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        log::debug!(
            "run cancelled at step {} of {}",
            self.next_step,
            self.total_steps()
        );
        self.state = RunState::Cancelled;
        true
    }

    /// Return to [`RunState::Idle`], discarding the config, curve and
    /// metrics.
    pub fn reset(&mut self) {
        self.config = None;
        self.next_step = StepIndex::ZERO;
        self.curve.clear();
        self.metrics = RunMetrics::default();
        self.state = RunState::Idle;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The config of the current or most recent run.
    pub fn config(&self) -> Option<&SimulationConfig> {
        self.config.as_ref()
    }

    /// Index of the step the next `step()` call will evaluate.
    pub fn next_step(&self) -> StepIndex {
        self.next_step
    }

    /// The current run's curve (the previous run's while idle after a
    /// rejected start).
    pub fn light_curve(&self) -> &LightCurve {
        &self.curve
    }

    /// Consume the stepper and keep its curve.
    pub fn into_light_curve(self) -> LightCurve {
        self.curve
    }

    /// Counters for the current run.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    pub(crate) fn metrics_mut(&mut self) -> &mut RunMetrics {
        &mut self.metrics
    }

    /// Fraction of the configured steps evaluated, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        match self.total_steps() {
            0 => 0.0,
            total => self.next_step.as_f64() / total as f64,
        }
    }

    fn total_steps(&self) -> u64 {
        self.config.as_ref().map_or(0, |c| c.total_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use microlens_core::Sample;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            total_steps: 10,
            ..SimulationConfig::default()
        }
    }

    fn run_to_end(stepper: &mut Stepper) {
        while stepper.state().is_running() {
            stepper.step().unwrap();
        }
    }

    // ── Lifecycle ────────────────────────────────────────────

    #[test]
    fn new_stepper_is_idle_and_empty() {
        let stepper = Stepper::new();
        assert_eq!(stepper.state(), RunState::Idle);
        assert!(stepper.light_curve().is_empty());
        assert!(stepper.config().is_none());
        assert_eq!(stepper.progress(), 0.0);
    }

    #[test]
    fn step_while_idle_is_rejected() {
        let mut stepper = Stepper::new();
        match stepper.step() {
            Err(StepError::NotRunning {
                state: RunState::Idle,
            }) => {}
            other => panic!("expected NotRunning(Idle), got {other:?}"),
        }
    }

    #[test]
    fn start_enters_running_at_step_zero() {
        let mut stepper = Stepper::new();
        stepper.start(small_config()).unwrap();
        assert_eq!(stepper.state(), RunState::Running);
        assert_eq!(stepper.next_step(), StepIndex(0));
        assert!(stepper.light_curve().is_empty());
    }

    #[test]
    fn run_completes_after_total_steps() {
        let mut stepper = Stepper::new();
        stepper.start(small_config()).unwrap();
        for i in 0..10u64 {
            assert_eq!(stepper.state(), RunState::Running);
            let frame = stepper.step().unwrap();
            assert_eq!(frame.step(), StepIndex(i));
            assert_eq!(frame.curve.len() as u64, i + 1);
        }
        assert_eq!(stepper.state(), RunState::Completed);
        assert!(stepper.state().is_terminal());
        assert_eq!(stepper.light_curve().len(), 10);
        assert_eq!(stepper.progress(), 1.0);
        assert_eq!(stepper.metrics().steps_executed, 10);
    }

    #[test]
    fn step_after_completion_is_rejected() {
        let mut stepper = Stepper::new();
        stepper.start(small_config()).unwrap();
        run_to_end(&mut stepper);
        match stepper.step() {
            Err(StepError::NotRunning {
                state: RunState::Completed,
            }) => {}
            other => panic!("expected NotRunning(Completed), got {other:?}"),
        }
        assert_eq!(stepper.light_curve().len(), 10);
    }

    #[test]
    fn frame_curve_ends_with_this_step() {
        let mut stepper = Stepper::new();
        stepper.start(small_config()).unwrap();
        stepper.step().unwrap();
        let frame = stepper.step().unwrap();
        let last: &Sample = frame.curve.last().unwrap();
        assert_eq!(last.step, StepIndex(1));
        assert_eq!(last.magnification, frame.magnification());
    }

    #[test]
    fn curve_steps_match_indices() {
        let mut stepper = Stepper::new();
        stepper.start(SimulationConfig::default()).unwrap();
        run_to_end(&mut stepper);
        let curve = stepper.light_curve();
        assert_eq!(curve.len(), 200);
        for (i, sample) in curve.iter().enumerate() {
            assert_eq!(sample.step, StepIndex(i as u64));
        }
    }

    // ── Cancellation ─────────────────────────────────────────

    #[test]
    fn cancel_keeps_partial_curve() {
        let mut stepper = Stepper::new();
        stepper.start(small_config()).unwrap();
        for _ in 0..4 {
            stepper.step().unwrap();
        }
        assert!(stepper.cancel());
        assert_eq!(stepper.state(), RunState::Cancelled);
        assert_eq!(stepper.light_curve().len(), 4);
        assert!(stepper.step().is_err());
    }

    #[test]
    fn cancel_when_not_running_is_noop() {
        let mut stepper = Stepper::new();
        assert!(!stepper.cancel());
        stepper.start(small_config()).unwrap();
        run_to_end(&mut stepper);
        assert!(!stepper.cancel());
        assert_eq!(stepper.state(), RunState::Completed);
    }

    // ── Restart and reset ────────────────────────────────────

    #[test]
    fn start_after_completion_begins_fresh_run() {
        let mut stepper = Stepper::new();
        stepper.start(small_config()).unwrap();
        run_to_end(&mut stepper);

        let next = SimulationConfig {
            total_steps: 5,
            ..SimulationConfig::default()
        };
        stepper.start(next).unwrap();
        assert_eq!(stepper.state(), RunState::Running);
        assert!(stepper.light_curve().is_empty());
        assert_eq!(stepper.metrics().steps_executed, 0);
        run_to_end(&mut stepper);
        assert_eq!(stepper.light_curve().len(), 5);
    }

    #[test]
    fn start_while_running_restarts() {
        let mut stepper = Stepper::new();
        stepper.start(small_config()).unwrap();
        stepper.step().unwrap();
        stepper.step().unwrap();

        stepper.start(small_config()).unwrap();
        assert_eq!(stepper.next_step(), StepIndex(0));
        assert!(stepper.light_curve().is_empty());
        let frame = stepper.step().unwrap();
        assert_eq!(frame.step(), StepIndex(0));
    }

    #[test]
    fn start_after_cancel_begins_fresh_run() {
        let mut stepper = Stepper::new();
        stepper.start(small_config()).unwrap();
        stepper.step().unwrap();
        stepper.cancel();
        stepper.start(small_config()).unwrap();
        assert_eq!(stepper.state(), RunState::Running);
        assert!(stepper.light_curve().is_empty());
    }

    #[test]
    fn rejected_start_leaves_previous_run_untouched() {
        let mut stepper = Stepper::new();
        stepper.start(small_config()).unwrap();
        run_to_end(&mut stepper);
        let before = stepper.light_curve().clone();

        let bad = SimulationConfig {
            total_steps: 1,
            ..SimulationConfig::default()
        };
        assert_eq!(
            stepper.start(bad),
            Err(ConfigError::TooFewSteps { configured: 1 })
        );
        assert_eq!(stepper.state(), RunState::Completed);
        assert_eq!(stepper.light_curve(), &before);
        assert_eq!(stepper.config().map(|c| c.total_steps), Some(10));
    }

    #[test]
    fn rejected_start_while_idle_stays_idle() {
        let mut stepper = Stepper::new();
        let bad = SimulationConfig {
            transit_span: -1.0,
            ..SimulationConfig::default()
        };
        assert!(stepper.start(bad).is_err());
        assert_eq!(stepper.state(), RunState::Idle);
        assert!(stepper.config().is_none());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut stepper = Stepper::new();
        stepper.start(small_config()).unwrap();
        stepper.step().unwrap();
        stepper.reset();
        assert_eq!(stepper.state(), RunState::Idle);
        assert!(stepper.light_curve().is_empty());
        assert!(stepper.config().is_none());
        assert_eq!(stepper.next_step(), StepIndex(0));
    }

    // ── Determinism ──────────────────────────────────────────

    #[test]
    fn identical_configs_give_identical_curves() {
        let mut a = Stepper::new();
        let mut b = Stepper::new();
        a.start(SimulationConfig::default()).unwrap();
        b.start(SimulationConfig::default()).unwrap();
        run_to_end(&mut a);
        run_to_end(&mut b);
        let bits = |s: &Stepper| -> Vec<u64> {
            s.light_curve()
                .magnifications()
                .map(f64::to_bits)
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn into_light_curve_keeps_samples() {
        let mut stepper = Stepper::new();
        stepper.start(small_config()).unwrap();
        run_to_end(&mut stepper);
        let curve = stepper.into_light_curve();
        assert_eq!(curve.len(), 10);
    }

    // ── Display ──────────────────────────────────────────────

    #[test]
    fn terminal_states() {
        assert!(!RunState::Idle.is_terminal());
        assert!(!RunState::Running.is_terminal());
        assert!(RunState::Completed.is_terminal());
        assert!(RunState::Cancelled.is_terminal());
        assert_eq!(RunState::Completed.to_string(), "completed");
    }

    #[test]
    fn not_running_error_names_state() {
        let err = StepError::NotRunning {
            state: RunState::Cancelled,
        };
        assert_eq!(err.to_string(), "cannot step: run is cancelled");
    }

    // ── Properties ───────────────────────────────────────────

    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn completed_run_has_one_sample_per_step(
            steps in 2u64..400,
            span in 0.5f64..40.0,
            speed in -1.0f64..1.0,
        ) {
            let cfg = SimulationConfig {
                total_steps: steps,
                transit_span: span,
                angular_speed: speed,
                ..SimulationConfig::default()
            };
            let mut stepper = Stepper::new();
            stepper.start(cfg).unwrap();
            run_to_end(&mut stepper);
            prop_assert_eq!(stepper.state(), RunState::Completed);
            prop_assert_eq!(stepper.light_curve().len() as u64, steps);
            for (i, step) in stepper.light_curve().steps().enumerate() {
                prop_assert_eq!(step, StepIndex(i as u64));
            }
        }
    }
}
