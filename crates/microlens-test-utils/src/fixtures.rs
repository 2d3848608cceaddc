//! Canonical simulation configs.
//!
//! - [`reference_config`]: the defaults (200 steps, span 10, orbit 0.5 at
//!   0.05 rad/step).
//! - [`fast_config`]: the defaults with a sub-millisecond frame interval,
//!   for exercising the paced driver quickly.
//! - [`cosmetic_config`]: the defaults with a non-contributing companion.
//! - [`touching_config`]: three steps where the companion starts on the
//!   source and the lens crosses it at step 1.

use microlens_engine::{CompanionMode, SimulationConfig};
use microlens_model::Perturbation;

/// The interactive application's default settings.
pub fn reference_config() -> SimulationConfig {
    SimulationConfig::default()
}

/// Default geometry over `steps` steps, paced at 0.5 ms per step.
pub fn fast_config(steps: u64) -> SimulationConfig {
    SimulationConfig {
        total_steps: steps,
        frame_interval_ms: 0.5,
        ..SimulationConfig::default()
    }
}

/// Default settings with the companion drawn but not contributing.
pub fn cosmetic_config() -> SimulationConfig {
    SimulationConfig {
        companion: CompanionMode::Cosmetic,
        ..SimulationConfig::default()
    }
}

/// Span 1 over three steps with a stationary companion at distance 0.5.
///
/// Step 0: lens at x = -0.5, companion exactly on the source.
/// Step 1: lens exactly on the source (impact-parameter floor).
/// Step 2: lens at x = 0.5, companion at x = 1.0.
pub fn touching_config() -> SimulationConfig {
    SimulationConfig {
        total_steps: 3,
        transit_span: 1.0,
        orbital_distance: 0.5,
        angular_speed: 0.0,
        companion: CompanionMode::Perturbing(Perturbation::default()),
        ..SimulationConfig::default()
    }
}
