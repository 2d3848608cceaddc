//! Point-source, point-lens magnification.
//!
//! ```text
//! A(u) = (u² + 2) / (u · sqrt(u² + 4))
//! ```
//!
//! `A` diverges as `u → 0`. A real source has finite angular size, which
//! caps the peak; the impact parameter is floored at
//! [`MIN_IMPACT_PARAMETER`] as a coarse stand-in for that.

/// Smallest impact parameter the model will evaluate.
///
/// Separations below this are clamped up to it, so the peak magnification
/// is `A(0.01) ≈ 100.004`.
pub const MIN_IMPACT_PARAMETER: f64 = 0.01;

/// The separation actually fed to the magnification formula.
pub fn effective_impact_parameter(u: f64) -> f64 {
    if u < MIN_IMPACT_PARAMETER {
        MIN_IMPACT_PARAMETER
    } else {
        u
    }
}

/// Magnification of the source at normalized lens–source separation `u`.
///
/// Never fails: separations below [`MIN_IMPACT_PARAMETER`] (including
/// zero and negative values) are clamped. Tends to `1.0` as `u` grows.
pub fn magnification(u: f64) -> f64 {
    let u = effective_impact_parameter(u);
    let u2 = u * u;
    (u2 + 2.0) / (u * (u2 + 4.0).sqrt())
}
