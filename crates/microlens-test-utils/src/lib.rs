//! Test fixtures and assertion helpers for Microlens development.
//!
//! Canonical configurations live in [`fixtures`]; this module holds the
//! assertions shared by the workspace's integration tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{cosmetic_config, fast_config, reference_config, touching_config};

use microlens_core::LightCurve;

/// Assert `actual` is within `tolerance` of `expected`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

/// Assert the curve's steps are exactly `0, 1, .., len - 1`.
#[track_caller]
pub fn assert_steps_are_indices(curve: &LightCurve) {
    for (i, step) in curve.steps().enumerate() {
        assert_eq!(step.0, i as u64, "sample {i} has step {step}");
    }
}

/// Assert two curves hold bit-identical samples.
#[track_caller]
pub fn assert_bit_identical(a: &LightCurve, b: &LightCurve) {
    assert_eq!(a.len(), b.len(), "curve lengths differ");
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.step, y.step);
        assert_eq!(
            x.magnification.to_bits(),
            y.magnification.to_bits(),
            "step {}: {} vs {}",
            x.step,
            x.magnification,
            y.magnification
        );
    }
}

/// Assert the curve is symmetric about its midpoint to within
/// `tolerance`. Only meaningful for runs without a perturbing companion.
#[track_caller]
pub fn assert_symmetric(curve: &LightCurve, tolerance: f64) {
    let samples = curve.samples();
    let n = samples.len();
    for i in 0..n / 2 {
        let (front, back) = (samples[i].magnification, samples[n - 1 - i].magnification);
        assert!(
            (front - back).abs() <= tolerance,
            "samples {i} and {} differ: {front} vs {back}",
            n - 1 - i
        );
    }
}
