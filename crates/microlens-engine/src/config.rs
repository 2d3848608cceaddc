//! Run configuration, validation, and error types.
//!
//! [`SimulationConfig`] is the immutable input to a single run. Every
//! driver calls [`validate()`](SimulationConfig::validate) before the first
//! step; a config that fails validation never produces a sample.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use microlens_core::StepIndex;
use microlens_model::{BodyPositions, Kinematics, Perturbation};

// ── CompanionMode ──────────────────────────────────────────────────

/// Whether the companion contributes to the light curve.
///
/// In both modes the companion moves and is reported in every frame;
/// only `Perturbing` adds its bump to the magnification.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompanionMode {
    /// The companion adds a local perturbation with the given shape.
    Perturbing(Perturbation),
    /// The companion is drawn but never changes the magnification.
    Cosmetic,
}

impl CompanionMode {
    /// The perturbation shape, if the companion contributes.
    pub fn perturbation(&self) -> Option<&Perturbation> {
        match self {
            Self::Perturbing(p) => Some(p),
            Self::Cosmetic => None,
        }
    }
}

impl Default for CompanionMode {
    fn default() -> Self {
        Self::Perturbing(Perturbation::default())
    }
}

// ── ParameterRanges ───────────────────────────────────────────────

/// An inclusive slider range offered by a settings form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterRange {
    /// Smallest offered value.
    pub min: f64,
    /// Largest offered value.
    pub max: f64,
    /// Slider increment.
    pub step: f64,
}

impl ParameterRange {
    /// Whether `value` lies within `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Recommended ranges for each user-facing parameter.
///
/// These are what the interactive front end offers. They are advisory:
/// [`SimulationConfig::validate`] accepts anything in the mathematical
/// domain, and [`SimulationConfig::within_recommended_ranges`] reports
/// whether a config stays inside them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterRanges {
    /// Frames per run.
    pub total_steps: ParameterRange,
    /// Lens transit span (Einstein radii).
    pub transit_span: ParameterRange,
    /// Frame interval (milliseconds).
    pub frame_interval_ms: ParameterRange,
    /// Companion–lens distance (Einstein radii).
    pub orbital_distance: ParameterRange,
    /// Companion phase advance (radians per frame).
    pub angular_speed: ParameterRange,
}

/// The front end's slider ranges.
pub const RECOMMENDED_RANGES: ParameterRanges = ParameterRanges {
    total_steps: ParameterRange {
        min: 100.0,
        max: 500.0,
        step: 50.0,
    },
    transit_span: ParameterRange {
        min: 5.0,
        max: 20.0,
        step: 1.0,
    },
    frame_interval_ms: ParameterRange {
        min: 20.0,
        max: 200.0,
        step: 10.0,
    },
    orbital_distance: ParameterRange {
        min: 0.1,
        max: 2.0,
        step: 0.1,
    },
    angular_speed: ParameterRange {
        min: 0.01,
        max: 0.2,
        step: 0.01,
    },
};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimulationConfig::validate()`] or while
/// starting a driver.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Fewer than two steps; the transit interpolates over `steps - 1`.
    TooFewSteps {
        /// The configured step count.
        configured: u64,
    },
    /// Transit span is NaN, infinite, zero, or negative.
    InvalidTransitSpan {
        /// The invalid value.
        value: f64,
    },
    /// Orbital distance is NaN, infinite, zero, or negative.
    InvalidOrbitalDistance {
        /// The invalid value.
        value: f64,
    },
    /// Angular speed is NaN or infinite.
    InvalidAngularSpeed {
        /// The invalid value.
        value: f64,
    },
    /// Frame interval is not a positive, representable duration.
    InvalidFrameInterval {
        /// The invalid value, in milliseconds.
        value: f64,
    },
    /// Perturbation shape invariant violated.
    InvalidPerturbation {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// The pacing thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewSteps { configured } => {
                write!(f, "total_steps {configured} is below minimum of 2")
            }
            Self::InvalidTransitSpan { value } => {
                write!(f, "transit_span must be finite and positive, got {value}")
            }
            Self::InvalidOrbitalDistance { value } => {
                write!(
                    f,
                    "orbital_distance must be finite and positive, got {value}"
                )
            }
            Self::InvalidAngularSpeed { value } => {
                write!(f, "angular_speed must be finite, got {value}")
            }
            Self::InvalidFrameInterval { value } => {
                write!(
                    f,
                    "frame_interval_ms must be a finite positive duration, got {value}"
                )
            }
            Self::InvalidPerturbation { reason } => {
                write!(f, "invalid perturbation: {reason}")
            }
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete, immutable configuration for one run.
///
/// All lengths are in Einstein radii. The defaults reproduce the
/// interactive front end's initial settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Number of steps (animation frames) in the run. Minimum: 2.
    pub total_steps: u64,
    /// Distance the lens travels, centred on the source. Default: 10.0.
    pub transit_span: f64,
    /// Companion–lens distance. Default: 0.5.
    pub orbital_distance: f64,
    /// Companion phase advance per step, in radians. Default: 0.05.
    pub angular_speed: f64,
    /// Wall-clock time between frames, in milliseconds. Only paced
    /// drivers and time-axis labels use it. Default: 50.
    pub frame_interval_ms: f64,
    /// Whether the companion contributes to the magnification.
    pub companion: CompanionMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_steps: 200,
            transit_span: 10.0,
            orbital_distance: 0.5,
            angular_speed: 0.05,
            frame_interval_ms: 50.0,
            companion: CompanionMode::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate all invariants, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. At least two steps (lens interpolation divides by steps - 1).
        if self.total_steps < 2 {
            return Err(ConfigError::TooFewSteps {
                configured: self.total_steps,
            });
        }
        // 2. Span finite and positive.
        if !self.transit_span.is_finite() || self.transit_span <= 0.0 {
            return Err(ConfigError::InvalidTransitSpan {
                value: self.transit_span,
            });
        }
        // 3. Orbit radius finite and positive.
        if !self.orbital_distance.is_finite() || self.orbital_distance <= 0.0 {
            return Err(ConfigError::InvalidOrbitalDistance {
                value: self.orbital_distance,
            });
        }
        // 4. Angular speed finite; either direction is allowed.
        if !self.angular_speed.is_finite() {
            return Err(ConfigError::InvalidAngularSpeed {
                value: self.angular_speed,
            });
        }
        // 5. Frame interval must convert to a Duration (rejects values
        //    too large to represent).
        if !self.frame_interval_ms.is_finite()
            || self.frame_interval_ms <= 0.0
            || Duration::try_from_secs_f64(self.frame_interval_ms / 1000.0).is_err()
        {
            return Err(ConfigError::InvalidFrameInterval {
                value: self.frame_interval_ms,
            });
        }
        // 6. Perturbation shape.
        if let Some(p) = self.companion.perturbation() {
            if !p.influence_radius.is_finite() || p.influence_radius <= 0.0 {
                return Err(ConfigError::InvalidPerturbation {
                    reason: format!(
                        "influence_radius must be finite and positive, got {}",
                        p.influence_radius,
                    ),
                });
            }
            if !p.peak_contribution.is_finite() || p.peak_contribution < 0.0 {
                return Err(ConfigError::InvalidPerturbation {
                    reason: format!(
                        "peak_contribution must be finite and >= 0.0, got {}",
                        p.peak_contribution,
                    ),
                });
            }
        }
        Ok(())
    }

    /// Whether every user-facing parameter lies inside
    /// [`RECOMMENDED_RANGES`].
    pub fn within_recommended_ranges(&self) -> bool {
        let r = &RECOMMENDED_RANGES;
        r.total_steps.contains(self.total_steps as f64)
            && r.transit_span.contains(self.transit_span)
            && r.frame_interval_ms.contains(self.frame_interval_ms)
            && r.orbital_distance.contains(self.orbital_distance)
            && r.angular_speed.contains(self.angular_speed)
    }

    /// The transit/orbit model for this config.
    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            total_steps: self.total_steps,
            transit_span: self.transit_span,
            orbital_distance: self.orbital_distance,
            angular_speed: self.angular_speed,
        }
    }

    /// Body positions at `step`.
    pub fn positions(&self, step: StepIndex) -> BodyPositions {
        self.kinematics().positions(step)
    }

    /// The frame interval as a [`Duration`].
    ///
    /// Returns [`Duration::ZERO`] for an interval that fails validation.
    pub fn frame_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.frame_interval_ms / 1000.0).unwrap_or(Duration::ZERO)
    }

    /// The last step index of the run.
    pub fn last_step(&self) -> StepIndex {
        StepIndex(self.total_steps.saturating_sub(1))
    }
}
