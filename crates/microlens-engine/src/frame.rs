//! Per-step output handed to rendering collaborators.
//!
//! [`Frame`] borrows the running light curve from the stepper that
//! produced it, so a renderer can draw the bodies and the curve so far
//! without copying. [`FrameRecord`] is the owned form sent across threads
//! or kept for later animation encoding.
//!
//! A stream of records always adds up to the whole curve: when the paced
//! driver drops frames, the next delivered record carries the skipped
//! samples in [`FrameRecord::backfill`]. Feed every record to
//! [`CurveFollower`] to keep an exact copy of the running curve.

use microlens_core::{CurveError, LightCurve, Position, Sample, StepIndex};

use crate::step::StepEvaluation;

/// Borrowed view of one step: the evaluation plus the curve so far.
///
/// Borrows from the [`Stepper`](crate::Stepper), so the caller must drop
/// it before stepping again.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'r> {
    /// The step's positions and magnification terms.
    pub evaluation: StepEvaluation,
    /// Every sample recorded so far, ending with this step's sample.
    pub curve: &'r [Sample],
}

impl Frame<'_> {
    /// The step this frame shows.
    pub fn step(&self) -> StepIndex {
        self.evaluation.step
    }

    /// The source position.
    pub fn source(&self) -> Position {
        self.evaluation.positions.source
    }

    /// The lens position.
    pub fn lens(&self) -> Position {
        self.evaluation.positions.lens
    }

    /// The companion position.
    pub fn companion(&self) -> Position {
        self.evaluation.positions.companion
    }

    /// Total magnification at this step.
    pub fn magnification(&self) -> f64 {
        self.evaluation.magnification
    }

    /// Detach from the stepper.
    pub fn to_record(&self) -> FrameRecord {
        FrameRecord {
            evaluation: self.evaluation,
            curve_len: self.curve.len(),
            backfill: Vec::new(),
        }
    }
}

/// Owned record of one step.
///
/// Carries the evaluation, the curve length at the time it was taken, and
/// the samples of any earlier steps whose own records were never
/// delivered. Consumers that need the curve so far append
/// [`samples()`](FrameRecord::samples) in record order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameRecord {
    /// The step's positions and magnification terms.
    pub evaluation: StepEvaluation,
    /// Number of samples in the curve once this step was recorded.
    pub curve_len: usize,
    /// Samples recorded since the previous delivered record, before this
    /// one, in step order. Empty unless frames were dropped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub backfill: Vec<Sample>,
}

impl FrameRecord {
    /// The step this record describes.
    pub fn step(&self) -> StepIndex {
        self.evaluation.step
    }

    /// The light-curve sample for this step.
    pub fn sample(&self) -> Sample {
        self.evaluation.sample()
    }

    /// Every sample this record adds to the curve: the backfill, then
    /// this step's own sample.
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.backfill
            .iter()
            .copied()
            .chain(std::iter::once(self.sample()))
    }
}

// ── CurveFollower ───────────────────────────────────────────────

/// Rebuilds the running light curve from a stream of [`FrameRecord`]s.
///
/// # Example
///
/// ```
/// use microlens_engine::{precompute, CurveFollower, SimulationConfig};
///
/// let run = precompute(SimulationConfig::default()).unwrap();
/// let mut follower = CurveFollower::new();
/// for record in &run.frames {
///     follower.apply(record).unwrap();
/// }
/// assert_eq!(follower.light_curve(), &run.light_curve);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CurveFollower {
    curve: LightCurve,
}

impl CurveFollower {
    /// A follower with an empty curve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the samples carried by `record`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NonIncreasingStep`] if `record` does not
    /// continue the curve, e.g. when it belongs to a different run. The
    /// curve keeps whatever samples were appended before the error.
    pub fn apply(&mut self, record: &FrameRecord) -> Result<(), CurveError> {
        for sample in record.samples() {
            self.curve.push(sample)?;
        }
        Ok(())
    }

    /// Whether the follower holds exactly as many samples as the producer
    /// had when it emitted `record`.
    pub fn is_caught_up(&self, record: &FrameRecord) -> bool {
        self.curve.len() == record.curve_len
    }

    /// The curve rebuilt so far.
    pub fn light_curve(&self) -> &LightCurve {
        &self.curve
    }

    /// Consume the follower, keeping its curve.
    pub fn into_light_curve(self) -> LightCurve {
        self.curve
    }
}
