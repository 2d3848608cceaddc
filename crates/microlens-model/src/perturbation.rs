//! Additive magnification bump from the orbiting companion.
//!
//! The companion is not solved as a second lens. Its effect is a local,
//! bounded bump centred on the source:
//!
//! ```text
//! ΔA(d) = P · (1 - (d / R)²)   for d < R
//! ΔA(d) = 0                    for d ≥ R
//! ```
//!
//! where `d` is the companion–source distance, `R` the influence radius
//! and `P` the peak contribution.

use crate::EINSTEIN_RADIUS;

/// Contribution of a companion at `separation_to_source` from the source.
///
/// Exactly `0.0` at or beyond `influence_radius`, exactly
/// `peak_contribution` at zero separation, and never negative.
pub fn perturbation(separation_to_source: f64, influence_radius: f64, peak_contribution: f64) -> f64 {
    if separation_to_source >= influence_radius {
        return 0.0;
    }
    let ratio = separation_to_source / influence_radius;
    (peak_contribution * (1.0 - ratio * ratio)).max(0.0)
}

/// Shape parameters of the companion's perturbation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Perturbation {
    /// Distance from the source beyond which the companion has no effect.
    pub influence_radius: f64,
    /// Contribution added when the companion sits exactly on the source.
    pub peak_contribution: f64,
}

impl Default for Perturbation {
    /// Half an Einstein radius of reach, one unit of extra magnification
    /// at the centre.
    fn default() -> Self {
        Self {
            influence_radius: 0.5 * EINSTEIN_RADIUS,
            peak_contribution: 1.0,
        }
    }
}

impl Perturbation {
    /// Evaluate the bump at `separation_to_source`.
    pub fn at(&self, separation_to_source: f64) -> f64 {
        perturbation(
            separation_to_source,
            self.influence_radius,
            self.peak_contribution,
        )
    }

    /// Whether a companion at `separation_to_source` lies inside the
    /// influence zone.
    pub fn is_active(&self, separation_to_source: f64) -> bool {
        separation_to_source < self.influence_radius
    }
}
