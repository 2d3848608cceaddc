//! Error types for light-curve construction.

use std::error::Error;
use std::fmt;

use crate::id::StepIndex;

/// Errors from appending to a [`LightCurve`](crate::LightCurve).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurveError {
    /// A sample's step did not strictly follow the last recorded step.
    NonIncreasingStep {
        /// Step of the last sample already in the curve.
        previous: StepIndex,
        /// Step of the rejected sample.
        attempted: StepIndex,
    },
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonIncreasingStep {
                previous,
                attempted,
            } => write!(
                f,
                "sample at step {attempted} does not follow last recorded step {previous}"
            ),
        }
    }
}

impl Error for CurveError {}
