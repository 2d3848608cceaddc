//! Light-curve comparison.
//!
//! Hash-first comparison (fast path) with a per-sample bit-exact
//! fallback on mismatch.

use microlens_core::{LightCurve, StepIndex};

use crate::hash::curve_hash;

/// How one position in two curves differs.
#[derive(Clone, Debug, PartialEq)]
pub enum DivergenceKind {
    /// The curves have different lengths; reported once, at the index
    /// where the shorter curve ends.
    LengthMismatch {
        /// Sample count of the recorded curve.
        recorded: usize,
        /// Sample count of the replayed curve.
        replayed: usize,
    },
    /// The samples at this index carry different step indices.
    StepMismatch {
        /// Step in the recorded curve.
        recorded: StepIndex,
        /// Step in the replayed curve.
        replayed: StepIndex,
    },
    /// Same step, different magnification bits.
    MagnificationMismatch {
        /// The step both samples carry.
        step: StepIndex,
        /// Magnification in the recorded curve.
        recorded: f64,
        /// Magnification in the replayed curve.
        replayed: f64,
    },
}

/// A single divergence between a recorded and a replayed curve.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleDivergence {
    /// Position in the sample sequence.
    pub index: usize,
    /// What differs there.
    pub kind: DivergenceKind,
}

/// Report of every divergence between two curves.
#[derive(Clone, Debug, PartialEq)]
pub struct DivergenceReport {
    /// Hash of the recorded curve.
    pub recorded_hash: u64,
    /// Hash of the replayed curve.
    pub replayed_hash: u64,
    /// Divergences in index order.
    pub divergences: Vec<SampleDivergence>,
}

impl DivergenceReport {
    /// The earliest divergence, if any was localised.
    pub fn first(&self) -> Option<&SampleDivergence> {
        self.divergences.first()
    }
}

/// Compare a replayed curve against a recorded one.
///
/// Fast path: hash both and compare. If the hashes match, returns `None`.
/// On mismatch, walks both curves and reports every index where they
/// differ bit for bit, plus a trailing length mismatch if any.
pub fn compare_curves(recorded: &LightCurve, replayed: &LightCurve) -> Option<DivergenceReport> {
    let recorded_hash = curve_hash(recorded);
    let replayed_hash = curve_hash(replayed);
    if recorded_hash == replayed_hash && recorded.len() == replayed.len() {
        return None;
    }

    let mut divergences = Vec::new();
    for (index, (rec, rep)) in recorded.iter().zip(replayed.iter()).enumerate() {
        if rec.step != rep.step {
            divergences.push(SampleDivergence {
                index,
                kind: DivergenceKind::StepMismatch {
                    recorded: rec.step,
                    replayed: rep.step,
                },
            });
        } else if rec.magnification.to_bits() != rep.magnification.to_bits() {
            divergences.push(SampleDivergence {
                index,
                kind: DivergenceKind::MagnificationMismatch {
                    step: rec.step,
                    recorded: rec.magnification,
                    replayed: rep.magnification,
                },
            });
        }
    }
    if recorded.len() != replayed.len() {
        divergences.push(SampleDivergence {
            index: recorded.len().min(replayed.len()),
            kind: DivergenceKind::LengthMismatch {
                recorded: recorded.len(),
                replayed: replayed.len(),
            },
        });
    }

    Some(DivergenceReport {
        recorded_hash,
        replayed_hash,
        divergences,
    })
}
