//! Physical model for the Microlens light-curve simulator.
//!
//! Every function here is pure and deterministic. All lengths are in
//! Einstein radii ([`EINSTEIN_RADIUS`] is fixed at `1.0`).
//!
//! # Evaluation order (each step)
//!
//! 1. [`Kinematics::positions`] — step index → lens and companion positions
//! 2. [`magnification()`] — lens–source separation → base magnification
//! 3. [`Perturbation::at`] — companion–source separation → additive bump

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod kinematics;
pub mod magnification;
pub mod perturbation;

pub use kinematics::{BodyPositions, Kinematics};
pub use magnification::{effective_impact_parameter, magnification, MIN_IMPACT_PARAMETER};
pub use perturbation::{perturbation, Perturbation};

/// The unit of length: one Einstein radius.
pub const EINSTEIN_RADIUS: f64 = 1.0;
