//! Determinism verification for Microlens runs.
//!
//! A run is a pure function of its [`SimulationConfig`], so two runs of
//! the same config must produce bit-identical light curves, whichever
//! driver ran them. This crate checks that cheaply.
//!
//! # Architecture
//!
//! - [`curve_hash`] and [`config_hash`] fold a curve or a config into an
//!   FNV-1a digest
//! - [`compare_curves`] compares by hash first and, on mismatch, reports
//!   each diverging sample
//! - [`RunFingerprint`] captures a run's hashes so it can be
//!   [verified](RunFingerprint::verify) later by re-running the config
//!
//! [`SimulationConfig`]: microlens_engine::SimulationConfig

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compare;
pub mod error;
pub mod fingerprint;
pub mod hash;

pub use compare::{compare_curves, DivergenceKind, DivergenceReport, SampleDivergence};
pub use error::ReplayError;
pub use fingerprint::RunFingerprint;
pub use hash::{config_hash, curve_hash};
