//! Core types for the Microlens light-curve simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the rest of the workspace: step identifiers,
//! positions in Einstein-radius units, light-curve samples and the
//! append-only [`LightCurve`] series.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod curve;
pub mod error;
pub mod geometry;
pub mod id;

pub use curve::{LightCurve, Sample};
pub use error::CurveError;
pub use geometry::Position;
pub use id::StepIndex;
