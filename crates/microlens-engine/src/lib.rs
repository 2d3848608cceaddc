//! Simulation engine for the Microlens light-curve simulator.
//!
//! Provides the [`Stepper`] state machine that turns a validated
//! [`SimulationConfig`] into a [`LightCurve`](microlens_core::LightCurve),
//! one step at a time, plus two drivers built on it:
//!
//! - [`LockstepRun`] / [`precompute`]: every step back to back, for
//!   pre-rendering a whole animation.
//! - [`RealtimeRun`]: a background thread paced at the configured frame
//!   interval, publishing frames on a channel.
//!
//! Both drivers evaluate the same pure [`evaluate_step`] function and
//! produce identical curves for identical configurations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod frame;
pub mod lockstep;
pub mod metrics;
pub mod realtime;
pub mod step;
pub mod stepper;
pub mod view;

pub use config::{
    CompanionMode, ConfigError, ParameterRange, ParameterRanges, SimulationConfig,
    RECOMMENDED_RANGES,
};
pub use frame::{CurveFollower, Frame, FrameRecord};
pub use lockstep::{precompute, CompletedRun, LockstepRun, RunError};
pub use metrics::RunMetrics;
pub use realtime::{RealtimeConfig, RealtimeError, RealtimeRun, RunReport};
pub use step::{evaluate_step, positions, StepEvaluation};
pub use stepper::{RunState, StepError, Stepper};
