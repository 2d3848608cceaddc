//! Microlens: a gravitational microlensing light-curve simulator.
//!
//! A lens star crosses in front of a background source; its gravity
//! magnifies the source by the point-lens factor `A(u)`. A companion
//! orbiting the lens adds a short bump when it passes close to the
//! source. The simulator steps this geometry frame by frame and records
//! the resulting light curve.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Microlens sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use microlens::prelude::*;
//!
//! let config = SimulationConfig {
//!     total_steps: 100,
//!     ..SimulationConfig::default()
//! };
//! let run = precompute(config).unwrap();
//! assert_eq!(run.light_curve.len(), 100);
//!
//! let peak = run.light_curve.peak().unwrap();
//! assert!(peak.magnification > 10.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `microlens-core` | Step indices, positions, samples, the light curve |
//! | [`model`] | `microlens-model` | Magnification, perturbation, kinematics |
//! | [`engine`] | `microlens-engine` | Config, stepper, batch and paced drivers, view helpers |
//! | [`replay`] | `microlens-replay` | Curve hashing and determinism verification |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`microlens-core`).
///
/// [`types::LightCurve`] is the append-only series every run produces.
pub use microlens_core as types;

/// Pure model functions (`microlens-model`).
///
/// [`model::magnification()`], [`model::perturbation()`] and the
/// [`model::Kinematics`] transit/orbit model.
pub use microlens_model as model;

/// Simulation engine (`microlens-engine`).
///
/// [`engine::Stepper`] for manual stepping, [`engine::LockstepRun`] and
/// [`engine::precompute`] for batch runs, [`engine::RealtimeRun`] for runs
/// paced at the frame rate.
pub use microlens_engine as engine;

/// Determinism verification (`microlens-replay`).
///
/// Hash curves with [`replay::curve_hash`], localise differences with
/// [`replay::compare_curves`].
pub use microlens_replay as replay;

/// Common imports for typical Microlens usage.
///
/// ```rust
/// use microlens::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use microlens_core::{LightCurve, Position, Sample, StepIndex};

    // Model
    pub use microlens_model::{magnification, Perturbation, EINSTEIN_RADIUS};

    // Errors
    pub use microlens_core::CurveError;
    pub use microlens_engine::{ConfigError, RealtimeError, RunError, StepError};

    // Engine
    pub use microlens_engine::{
        evaluate_step, precompute, CompanionMode, CompletedRun, CurveFollower, Frame, FrameRecord,
        LockstepRun, RealtimeConfig, RealtimeRun, RunMetrics, RunReport, RunState,
        SimulationConfig, StepEvaluation, Stepper,
    };
}
