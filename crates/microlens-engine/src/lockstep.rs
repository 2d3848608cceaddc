//! Batch (lockstep) driver.
//!
//! [`LockstepRun`] steps a [`Stepper`] on the caller's thread with no
//! pacing, for pre-rendering a whole animation ahead of time.
//! [`precompute()`] is the one-call form: validate, run every step,
//! and hand back all frames with the finished curve.
//!
//! # Ownership model
//!
//! [`step_sync()`](LockstepRun::step_sync) returns a [`Frame`] that
//! borrows the run's curve, so the caller cannot step again while
//! holding it. No background threads are involved.

use std::fmt;

use microlens_core::{LightCurve, StepIndex};

use crate::config::{ConfigError, SimulationConfig};
use crate::frame::{Frame, FrameRecord};
use crate::metrics::RunMetrics;
use crate::stepper::{RunState, StepError, Stepper};

// Compile-time assertion: LockstepRun can be moved to a worker thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<LockstepRun>();
    }
};

// ── RunError ────────────────────────────────────────────────────

/// Errors from [`precompute()`].
#[derive(Clone, Debug, PartialEq)]
pub enum RunError {
    /// The configuration was rejected before any step ran.
    Config(ConfigError),
    /// A step failed mid-run.
    Step(StepError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Step(e) => write!(f, "step error: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Step(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StepError> for RunError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

// ── CompletedRun ────────────────────────────────────────────────

/// Output of [`precompute()`]: one record per step plus the final curve.
#[derive(Clone, Debug)]
pub struct CompletedRun {
    /// The config the run was started with.
    pub config: SimulationConfig,
    /// One record per step, in step order.
    pub frames: Vec<FrameRecord>,
    /// The complete light curve.
    pub light_curve: LightCurve,
    /// Counters collected over the run.
    pub metrics: RunMetrics,
}

impl CompletedRun {
    /// The sample with the highest magnification.
    pub fn peak_magnification(&self) -> Option<f64> {
        self.light_curve.peak().map(|s| s.magnification)
    }
}

// ── LockstepRun ─────────────────────────────────────────────────

/// Unpaced driver that steps on the caller's thread.
///
/// # Example
///
/// ```
/// use microlens_engine::{LockstepRun, SimulationConfig};
///
/// let mut run = LockstepRun::new(SimulationConfig::default()).unwrap();
/// let frames = run.run_to_completion().unwrap();
/// assert_eq!(frames.len(), 200);
/// assert_eq!(run.light_curve().len(), 200);
/// ```
#[derive(Debug)]
pub struct LockstepRun {
    stepper: Stepper,
}

impl LockstepRun {
    /// Validate `config` and start a run, ready for the first step.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let mut stepper = Stepper::new();
        stepper.start(config)?;
        Ok(Self { stepper })
    }

    /// Evaluate one step and return its frame.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::NotRunning`] once the run has completed or
    /// been cancelled.
    pub fn step_sync(&mut self) -> Result<Frame<'_>, StepError> {
        self.stepper.step()
    }

    /// Step until the run ends, returning the records of the steps taken
    /// by this call.
    ///
    /// On a run that already ended this returns an empty vector.
    pub fn run_to_completion(&mut self) -> Result<Vec<FrameRecord>, StepError> {
        let remaining = self
            .stepper
            .config()
            .map_or(0, |c| c.total_steps.saturating_sub(self.stepper.next_step().0));
        let mut frames = Vec::with_capacity(remaining.min(1 << 16) as usize);
        while self.stepper.state().is_running() {
            let frame = self.stepper.step()?;
            frames.push(frame.to_record());
        }
        Ok(frames)
    }

    /// Stop between steps. See [`Stepper::cancel()`].
    pub fn cancel(&mut self) -> bool {
        self.stepper.cancel()
    }

    /// Abandon the current run and start over with `config`.
    ///
    /// On error the current run is left as it was.
    pub fn restart(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        self.stepper.start(config)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.stepper.state()
    }

    /// The config of the current run.
    pub fn config(&self) -> Option<&SimulationConfig> {
        self.stepper.config()
    }

    /// Index of the next step to evaluate.
    pub fn next_step(&self) -> StepIndex {
        self.stepper.next_step()
    }

    /// The curve recorded so far.
    pub fn light_curve(&self) -> &LightCurve {
        self.stepper.light_curve()
    }

    /// Counters for the current run.
    pub fn metrics(&self) -> &RunMetrics {
        self.stepper.metrics()
    }

    /// Consume the run, keeping its curve.
    pub fn into_light_curve(self) -> LightCurve {
        self.stepper.into_light_curve()
    }
}

/// Run every step of `config` back to back.
///
/// # Example
///
/// ```
/// use microlens_engine::{precompute, SimulationConfig};
///
/// let run = precompute(SimulationConfig::default()).unwrap();
/// assert_eq!(run.frames.len(), 200);
/// assert!(run.peak_magnification().unwrap() > 30.0);
/// ```
pub fn precompute(config: SimulationConfig) -> Result<CompletedRun, RunError> {
    let mut run = LockstepRun::new(config.clone())?;
    let frames = run.run_to_completion()?;
    let metrics = run.metrics().clone();
    log::debug!(
        "precomputed {} frames ({} perturbed, {} floor-clamped)",
        frames.len(),
        metrics.perturbed_steps,
        metrics.floor_clamped_steps,
    );
    Ok(CompletedRun {
        config,
        frames,
        light_curve: run.into_light_curve(),
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(steps: u64) -> SimulationConfig {
        SimulationConfig {
            total_steps: steps,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn step_sync_advances_one_step() {
        let mut run = LockstepRun::new(config(5)).unwrap();
        let frame = run.step_sync().unwrap();
        assert_eq!(frame.step(), StepIndex(0));
        assert_eq!(frame.curve.len(), 1);
        assert_eq!(run.next_step(), StepIndex(1));
    }

    #[test]
    fn run_to_completion_returns_every_frame() {
        let mut run = LockstepRun::new(config(25)).unwrap();
        let frames = run.run_to_completion().unwrap();
        assert_eq!(frames.len(), 25);
        for (i, record) in frames.iter().enumerate() {
            assert_eq!(record.step(), StepIndex(i as u64));
            assert_eq!(record.curve_len, i + 1);
        }
        assert_eq!(run.state(), RunState::Completed);
    }

    #[test]
    fn run_to_completion_after_partial_steps() {
        let mut run = LockstepRun::new(config(10)).unwrap();
        run.step_sync().unwrap();
        run.step_sync().unwrap();
        let frames = run.run_to_completion().unwrap();
        assert_eq!(frames.len(), 8);
        assert_eq!(frames[0].step(), StepIndex(2));
        assert_eq!(run.light_curve().len(), 10);
    }

    #[test]
    fn run_to_completion_on_ended_run_is_empty() {
        let mut run = LockstepRun::new(config(3)).unwrap();
        run.run_to_completion().unwrap();
        assert!(run.run_to_completion().unwrap().is_empty());
    }

    #[test]
    fn invalid_config_rejected_up_front() {
        match LockstepRun::new(config(0)) {
            Err(ConfigError::TooFewSteps { configured: 0 }) => {}
            other => panic!("expected TooFewSteps, got {other:?}"),
        }
        match precompute(config(1)) {
            Err(RunError::Config(ConfigError::TooFewSteps { configured: 1 })) => {}
            other => panic!("expected Config(TooFewSteps), got {other:?}"),
        }
    }

    #[test]
    fn cancel_then_restart() {
        let mut run = LockstepRun::new(config(10)).unwrap();
        run.step_sync().unwrap();
        assert!(run.cancel());
        assert_eq!(run.state(), RunState::Cancelled);
        assert_eq!(run.light_curve().len(), 1);
        match run.step_sync() {
            Err(StepError::NotRunning {
                state: RunState::Cancelled,
            }) => {}
            other => panic!("expected NotRunning(Cancelled), got {other:?}"),
        }

        run.restart(config(4)).unwrap();
        assert_eq!(run.run_to_completion().unwrap().len(), 4);
    }

    #[test]
    fn precompute_frames_match_curve() {
        let done = precompute(SimulationConfig::default()).unwrap();
        assert_eq!(done.frames.len(), 200);
        assert_eq!(done.light_curve.len(), 200);
        assert_eq!(done.metrics.steps_executed, 200);
        for (record, sample) in done.frames.iter().zip(done.light_curve.iter()) {
            assert_eq!(record.sample(), *sample);
        }
    }

    #[test]
    fn precompute_is_deterministic() {
        let a = precompute(SimulationConfig::default()).unwrap();
        let b = precompute(SimulationConfig::default()).unwrap();
        assert_eq!(a.light_curve, b.light_curve);
        assert_eq!(a.frames, b.frames);
    }

    #[test]
    fn default_run_sees_companion_perturbation() {
        let done = precompute(SimulationConfig::default()).unwrap();
        assert!(done.metrics.perturbed_steps > 0);
        assert_eq!(done.metrics.floor_clamped_steps, 0);
    }
}
