//! The pure per-step function shared by every driver.
//!
//! [`evaluate_step`] is a function of the step index and the config only.
//! Batch and paced drivers call it with the same arguments in the same
//! order, so their light curves are bit-identical.

use microlens_core::{Sample, StepIndex};
use microlens_model::{effective_impact_parameter, magnification, BodyPositions};

use crate::config::SimulationConfig;

/// Everything computed for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepEvaluation {
    /// The step that was evaluated.
    pub step: StepIndex,
    /// Source, lens and companion positions.
    pub positions: BodyPositions,
    /// Lens–source impact parameter before the floor is applied.
    pub impact_parameter: f64,
    /// Point-lens magnification.
    pub base_magnification: f64,
    /// Companion–source separation.
    pub companion_separation: f64,
    /// Additive companion contribution (0 outside the influence zone or in
    /// cosmetic mode).
    pub perturbation: f64,
    /// `base_magnification + perturbation`.
    pub magnification: f64,
}

impl StepEvaluation {
    /// The light-curve sample for this step.
    pub fn sample(&self) -> Sample {
        Sample::new(self.step, self.magnification)
    }

    /// Whether the impact parameter was raised to the model's floor.
    pub fn hit_floor(&self) -> bool {
        effective_impact_parameter(self.impact_parameter) != self.impact_parameter
    }

    /// Whether the companion added anything this step.
    pub fn perturbed(&self) -> bool {
        self.perturbation > 0.0
    }
}

/// Body positions at `step` under `config`.
pub fn positions(step: StepIndex, config: &SimulationConfig) -> BodyPositions {
    config.positions(step)
}

/// Evaluate the model at `step`.
///
/// `config` is assumed valid; callers go through
/// [`SimulationConfig::validate`] first.
pub fn evaluate_step(step: StepIndex, config: &SimulationConfig) -> StepEvaluation {
    let positions = positions(step, config);

    let impact_parameter = positions.impact_parameter();
    let base_magnification = magnification(impact_parameter);

    let companion_separation = positions.companion_separation();
    let perturbation = config
        .companion
        .perturbation()
        .map_or(0.0, |p| p.at(companion_separation));

    StepEvaluation {
        step,
        positions,
        impact_parameter,
        base_magnification,
        companion_separation,
        perturbation,
        magnification: base_magnification + perturbation,
    }
}
