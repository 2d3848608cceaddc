//! Hashing utilities for light-curve and configuration comparison.
//!
//! Uses FNV-1a for fast, deterministic hashing. These hashes are not
//! cryptographically secure; they are used for fast equality checks
//! between runs.

use microlens_core::LightCurve;
use microlens_engine::{CompanionMode, SimulationConfig};

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// Tag folded in for a perturbing companion.
const TAG_PERTURBING: u8 = 1;
/// Tag folded in for a cosmetic companion.
const TAG_COSMETIC: u8 = 2;

/// Feed a single byte into an FNV-1a hash state.
#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

/// Feed a u64 (as 8 LE bytes) into an FNV-1a hash state.
#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Feed an f64 by its bit pattern.
#[inline]
fn fnv1a_f64(hash: u64, v: f64) -> u64 {
    fnv1a_u64(hash, v.to_bits())
}

/// Compute a hash over every sample in a curve.
///
/// Folds in the sample count, then each sample's step and
/// `f64::to_bits()` magnification. Bit-level hashing means `0.0` and
/// `-0.0` differ, as do distinct NaN payloads.
pub fn curve_hash(curve: &LightCurve) -> u64 {
    let mut hash = fnv1a_u64(FNV_OFFSET, curve.len() as u64);
    for sample in curve {
        hash = fnv1a_u64(hash, sample.step.0);
        hash = fnv1a_f64(hash, sample.magnification);
    }
    hash
}

/// Compute a hash over the config fields that affect the curve.
///
/// The frame interval only paces the run, so it is left out: the same
/// geometry at a different frame rate hashes the same.
pub fn config_hash(config: &SimulationConfig) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_u64(hash, config.total_steps);
    hash = fnv1a_f64(hash, config.transit_span);
    hash = fnv1a_f64(hash, config.orbital_distance);
    hash = fnv1a_f64(hash, config.angular_speed);
    match &config.companion {
        CompanionMode::Perturbing(p) => {
            hash = fnv1a_byte(hash, TAG_PERTURBING);
            hash = fnv1a_f64(hash, p.influence_radius);
            hash = fnv1a_f64(hash, p.peak_contribution);
        }
        CompanionMode::Cosmetic => {
            hash = fnv1a_byte(hash, TAG_COSMETIC);
        }
    }
    hash
}
