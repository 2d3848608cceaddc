//! Benchmark profiles for the Microlens light-curve simulator.
//!
//! Provides pre-built [`SimulationConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: the interactive defaults (200 steps)
//! - [`long_profile`]: the largest recommended settings (500 steps, fast orbit)
//! - [`stress_profile`]: 100K steps, far beyond any animation

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use microlens_engine::SimulationConfig;

/// The interactive application's defaults.
pub fn reference_profile() -> SimulationConfig {
    SimulationConfig::default()
}

/// Upper end of every recommended range.
pub fn long_profile() -> SimulationConfig {
    SimulationConfig {
        total_steps: 500,
        transit_span: 20.0,
        orbital_distance: 2.0,
        angular_speed: 0.2,
        frame_interval_ms: 20.0,
        ..SimulationConfig::default()
    }
}

/// 100K steps across the default geometry.
///
/// Same transit as [`reference_profile`] at 500x the step count, so the
/// curve resolves the floor region and the companion's passes finely.
pub fn stress_profile() -> SimulationConfig {
    SimulationConfig {
        total_steps: 100_000,
        ..SimulationConfig::default()
    }
}
