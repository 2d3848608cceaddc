//! Lens transit and companion orbit as functions of the step index.
//!
//! The lens crosses the field along the x axis at constant speed, from
//! `-span/2` at step 0 to `+span/2` at the last step. The companion
//! circles the lens at a fixed distance, starting at phase 0 (directly
//! ahead of the lens on +x) and advancing a fixed angle per step. The
//! source never moves.

use microlens_core::{Position, StepIndex};

/// Positions of all three bodies at one step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyPositions {
    /// Background source, always at the origin.
    pub source: Position,
    /// Foreground lens star.
    pub lens: Position,
    /// Companion orbiting the lens.
    pub companion: Position,
}

impl BodyPositions {
    /// Lens–source impact parameter.
    ///
    /// The lens stays on the x axis and the source at the origin, so this
    /// is `|lens.x|`.
    pub fn impact_parameter(&self) -> f64 {
        (self.lens.x - self.source.x).abs()
    }

    /// Companion–source separation.
    pub fn companion_separation(&self) -> f64 {
        self.companion.distance(self.source)
    }

    /// Companion position relative to the lens.
    pub fn companion_offset(&self) -> Position {
        Position::new(
            self.companion.x - self.lens.x,
            self.companion.y - self.lens.y,
        )
    }
}

/// Transit and orbit parameters for one run.
///
/// `total_steps` must be at least 2: the transit is interpolated over
/// `total_steps - 1` intervals. Callers validate this before building one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    /// Number of steps in the run.
    pub total_steps: u64,
    /// Distance the lens travels, in Einstein radii.
    pub transit_span: f64,
    /// Companion–lens distance, in Einstein radii.
    pub orbital_distance: f64,
    /// Orbital phase advance per step, in radians.
    pub angular_speed: f64,
}

impl Kinematics {
    /// Half the transit span: the lens x coordinate at either end.
    pub fn half_span(&self) -> f64 {
        self.transit_span / 2.0
    }

    /// Lens x coordinate at `step`.
    ///
    /// Exactly `-half_span()` at step 0 and exactly `+half_span()` at
    /// step `total_steps - 1`.
    pub fn lens_x(&self, step: StepIndex) -> f64 {
        debug_assert!(self.total_steps >= 2, "transit needs at least two steps");
        let t = step.as_f64() / (self.total_steps - 1) as f64;
        -self.half_span() + t * self.transit_span
    }

    /// Orbital phase of the companion at `step`, in radians (unwrapped).
    pub fn orbital_angle(&self, step: StepIndex) -> f64 {
        step.as_f64() * self.angular_speed
    }

    /// Positions of source, lens and companion at `step`.
    pub fn positions(&self, step: StepIndex) -> BodyPositions {
        let lens = Position::new(self.lens_x(step), 0.0);
        let offset = Position::from_polar(self.orbital_distance, self.orbital_angle(step));
        BodyPositions {
            source: Position::ORIGIN,
            lens,
            companion: lens.offset(offset),
        }
    }
}
