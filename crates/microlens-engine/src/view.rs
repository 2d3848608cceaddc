//! Geometry a renderer needs that is not part of the simulation.
//!
//! These helpers describe the two panels of the animation: the sky
//! view (bodies plus the lens's Einstein ring) and the light-curve plot.
//! They are pure functions of the config and the curve so far.

use microlens_core::{LightCurve, Position};
use microlens_model::EINSTEIN_RADIUS;

use crate::config::SimulationConfig;

/// Lower bound of the magnification axis, just below the baseline of 1.
pub const CURVE_FLOOR: f64 = 0.95;

/// Headroom applied above the highest sample.
pub const CURVE_HEADROOM: f64 = 1.1;

/// The magnification axis always reaches at least this value.
pub const MIN_CURVE_CEILING: f64 = 2.0;

/// Margin added around the bodies in the sky view, in Einstein radii.
pub const FIELD_OF_VIEW_MARGIN: f64 = 1.0;

/// Half-width of the square sky view that keeps every body in frame for
/// the whole run.
pub fn field_of_view_limit(config: &SimulationConfig) -> f64 {
    config.transit_span / 2.0 + EINSTEIN_RADIUS.max(config.orbital_distance) + FIELD_OF_VIEW_MARGIN
}

/// A circle in the sky view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
    /// Centre of the circle.
    pub center: Position,
    /// Radius in Einstein radii.
    pub radius: f64,
}

/// The lens's Einstein ring, drawn around the lens at every step.
pub fn einstein_ring(lens: Position) -> Ring {
    Ring {
        center: lens,
        radius: EINSTEIN_RADIUS,
    }
}

/// Closed interval for one plot axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// Axis limits for the light-curve plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveAxes {
    /// Step axis.
    pub x: AxisRange,
    /// Magnification axis.
    pub y: AxisRange,
}

/// Axis limits for plotting `curve` in a run of `total_steps`.
///
/// The step axis spans the whole run so the curve grows across a fixed
/// plot. The magnification axis starts at [`CURVE_FLOOR`] and tops out at
/// the highest sample plus headroom, never below [`MIN_CURVE_CEILING`].
pub fn curve_axes(curve: &LightCurve, total_steps: u64) -> CurveAxes {
    let ceiling = curve
        .peak()
        .map_or(MIN_CURVE_CEILING, |s| {
            (s.magnification * CURVE_HEADROOM).max(MIN_CURVE_CEILING)
        });
    CurveAxes {
        x: AxisRange {
            min: 0.0,
            max: total_steps as f64,
        },
        y: AxisRange {
            min: CURVE_FLOOR,
            max: ceiling,
        },
    }
}

/// Playback rate matching a frame interval, for encoding the animation.
pub fn frames_per_second(frame_interval_ms: f64) -> f64 {
    1000.0 / frame_interval_ms
}
