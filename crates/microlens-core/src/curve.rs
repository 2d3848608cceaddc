//! Light-curve samples and the append-only series for one run.
//!
//! A [`LightCurve`] is created empty when a run starts, grows by exactly
//! one [`Sample`] per step, and is handed to rendering collaborators as a
//! read-only value once the run ends. Steps are strictly increasing; the
//! curve refuses anything else.

use crate::error::CurveError;
use crate::id::StepIndex;

/// One point on a light curve: the total magnification observed at a step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// The step at which the magnification was evaluated.
    pub step: StepIndex,
    /// Total magnification (base lens plus companion contribution).
    pub magnification: f64,
}

impl Sample {
    /// Construct a sample.
    pub fn new(step: StepIndex, magnification: f64) -> Self {
        Self {
            step,
            magnification,
        }
    }

    /// Wall-clock offset of this sample from the start of an animation
    /// played back at `frame_interval_ms` per step.
    pub fn elapsed_ms(&self, frame_interval_ms: f64) -> f64 {
        self.step.as_f64() * frame_interval_ms
    }
}

/// Ordered, append-only sequence of [`Sample`]s for a single run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Sample>", into = "Vec<Sample>")
)]
pub struct LightCurve {
    samples: Vec<Sample>,
}

impl LightCurve {
    /// An empty curve.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty curve with room for `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Append a sample.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NonIncreasingStep`] if `sample.step` is not
    /// strictly greater than the last recorded step. The curve is left
    /// unchanged.
    pub fn push(&mut self, sample: Sample) -> Result<(), CurveError> {
        if let Some(last) = self.samples.last() {
            if sample.step <= last.step {
                return Err(CurveError::NonIncreasingStep {
                    previous: last.step,
                    attempted: sample.step,
                });
            }
        }
        self.samples.push(sample);
        Ok(())
    }

    /// Drop every sample, keeping the allocation.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of samples recorded.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples have been recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples in step order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The most recently recorded sample.
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// The sample with the highest magnification.
    ///
    /// Ties resolve to the later sample. Returns `None` for an empty curve.
    pub fn peak(&self) -> Option<&Sample> {
        self.samples
            .iter()
            .max_by(|a, b| a.magnification.total_cmp(&b.magnification))
    }

    /// Iterate over samples in step order.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// The step column, for plotting.
    pub fn steps(&self) -> impl Iterator<Item = StepIndex> + '_ {
        self.samples.iter().map(|s| s.step)
    }

    /// The magnification column, for plotting.
    pub fn magnifications(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.magnification)
    }

    /// Consume the curve and return its samples.
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

impl<'a> IntoIterator for &'a LightCurve {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl TryFrom<Vec<Sample>> for LightCurve {
    type Error = CurveError;

    /// Rebuild a curve from raw samples, re-checking step ordering.
    fn try_from(samples: Vec<Sample>) -> Result<Self, Self::Error> {
        let mut curve = Self::with_capacity(samples.len());
        for sample in samples {
            curve.push(sample)?;
        }
        Ok(curve)
    }
}

impl From<LightCurve> for Vec<Sample> {
    fn from(curve: LightCurve) -> Self {
        curve.samples
    }
}
