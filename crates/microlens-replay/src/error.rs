//! Error types for run verification.

use std::fmt;

use microlens_engine::RunError;

/// Errors from [`RunFingerprint::verify()`](crate::RunFingerprint::verify).
#[derive(Clone, Debug, PartialEq)]
pub enum ReplayError {
    /// The config being verified is not the one the fingerprint was
    /// captured from.
    ConfigMismatch {
        /// Hash stored in the fingerprint.
        recorded: u64,
        /// Hash of the config supplied for verification.
        current: u64,
    },
    /// Re-running the config failed.
    Run(RunError),
    /// The re-run produced a different curve.
    CurveMismatch {
        /// Hash stored in the fingerprint.
        recorded: u64,
        /// Hash of the re-run curve.
        replayed: u64,
    },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigMismatch { recorded, current } => write!(
                f,
                "config hash mismatch: recorded {recorded:#018x}, current {current:#018x}"
            ),
            Self::Run(e) => write!(f, "re-run failed: {e}"),
            Self::CurveMismatch { recorded, replayed } => write!(
                f,
                "curve hash mismatch: recorded {recorded:#018x}, replayed {replayed:#018x}"
            ),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Run(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RunError> for ReplayError {
    fn from(e: RunError) -> Self {
        Self::Run(e)
    }
}
