//! Compact record of a finished run.
//!
//! A [`RunFingerprint`] is small enough to store alongside a rendered
//! animation. Re-running the same config later must reproduce it exactly.

use microlens_core::LightCurve;
use microlens_engine::{precompute, SimulationConfig};

use crate::error::ReplayError;
use crate::hash::{config_hash, curve_hash};

/// Hashes identifying a config and the curve it produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunFingerprint {
    /// [`config_hash`] of the run's config.
    pub config_hash: u64,
    /// [`curve_hash`] of the finished curve.
    pub curve_hash: u64,
    /// Number of samples in the curve.
    pub sample_count: u64,
}

impl RunFingerprint {
    /// Fingerprint `curve` as produced by `config`.
    pub fn capture(config: &SimulationConfig, curve: &LightCurve) -> Self {
        Self {
            config_hash: config_hash(config),
            curve_hash: curve_hash(curve),
            sample_count: curve.len() as u64,
        }
    }

    /// Re-run `config` with the batch driver and check it reproduces this
    /// fingerprint.
    ///
    /// # Errors
    ///
    /// [`ReplayError::ConfigMismatch`] if `config` is not the captured
    /// config, [`ReplayError::Run`] if it no longer validates, and
    /// [`ReplayError::CurveMismatch`] if the curve differs.
    pub fn verify(&self, config: &SimulationConfig) -> Result<(), ReplayError> {
        let current = config_hash(config);
        if current != self.config_hash {
            return Err(ReplayError::ConfigMismatch {
                recorded: self.config_hash,
                current,
            });
        }

        let run = precompute(config.clone())?;
        let replayed = curve_hash(&run.light_curve);
        if replayed != self.curve_hash {
            return Err(ReplayError::CurveMismatch {
                recorded: self.curve_hash,
                replayed,
            });
        }
        Ok(())
    }
}
