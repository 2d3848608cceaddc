//! Strongly-typed step identifier.

use std::fmt;

/// Zero-based index of a simulation step (one animation frame).
///
/// Step `n` is the `n`-th evaluation of the model within a run. The model
/// is a pure function of this index, never of wall-clock time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepIndex(pub u64);

impl StepIndex {
    /// The first step of every run.
    pub const ZERO: Self = Self(0);

    /// The step immediately after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// The index as `f64`, for use in interpolation and orbital phase.
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl fmt::Display for StepIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepIndex {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_increments() {
        assert_eq!(StepIndex::ZERO.next(), StepIndex(1));
        assert_eq!(StepIndex(41).next(), StepIndex(42));
    }

    #[test]
    fn ordering_follows_index() {
        assert!(StepIndex(3) < StepIndex(4));
        assert_eq!(StepIndex::from(7), StepIndex(7));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(format!("{}", StepIndex(199)), "199");
    }
}
