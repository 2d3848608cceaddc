//! Determinism verification integration tests.
//!
//! Each test: build a config → run it through one or more drivers →
//! compare the resulting curves by FNV-1a hash and, on mismatch, by
//! per-sample divergence report.

use microlens_core::{LightCurve, Sample, StepIndex};
use microlens_engine::{
    precompute, CompanionMode, LockstepRun, RealtimeConfig, RealtimeRun, SimulationConfig,
    Stepper,
};
use microlens_replay::{
    compare_curves, config_hash, curve_hash, DivergenceKind, ReplayError, RunFingerprint,
};
use microlens_test_utils::{cosmetic_config, fast_config, reference_config};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────

fn stepper_curve(config: SimulationConfig) -> LightCurve {
    let mut stepper = Stepper::new();
    stepper.start(config).unwrap();
    while stepper.state().is_running() {
        stepper.step().unwrap();
    }
    stepper.into_light_curve()
}

fn paced_curve(config: SimulationConfig) -> LightCurve {
    RealtimeRun::spawn(config, RealtimeConfig::default())
        .unwrap()
        .join()
        .unwrap()
        .light_curve
}

// ── Same config, same curve ─────────────────────────────────────

#[test]
fn repeated_batch_runs_hash_identically() {
    let hashes: Vec<u64> = (0..5)
        .map(|_| curve_hash(&precompute(reference_config()).unwrap().light_curve))
        .collect();
    assert!(hashes.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn all_drivers_agree() {
    let config = fast_config(150);
    let batch = precompute(config.clone()).unwrap().light_curve;
    let stepped = stepper_curve(config.clone());
    let mut lockstep = LockstepRun::new(config.clone()).unwrap();
    lockstep.run_to_completion().unwrap();
    let paced = paced_curve(config);

    let expected = curve_hash(&batch);
    assert_eq!(curve_hash(&stepped), expected);
    assert_eq!(curve_hash(lockstep.light_curve()), expected);
    assert_eq!(curve_hash(&paced), expected);
    assert_eq!(compare_curves(&batch, &paced), None);
}

#[test]
fn frame_interval_does_not_change_the_curve() {
    let slow = reference_config();
    let fast = fast_config(slow.total_steps);
    assert_eq!(config_hash(&slow), config_hash(&fast));
    assert_eq!(
        curve_hash(&precompute(slow).unwrap().light_curve),
        curve_hash(&paced_curve(fast)),
    );
}

#[test]
fn restart_reproduces_a_fresh_run() {
    let config = reference_config();
    let mut stepper = Stepper::new();
    stepper.start(cosmetic_config()).unwrap();
    for _ in 0..37 {
        stepper.step().unwrap();
    }
    stepper.start(config.clone()).unwrap();
    while stepper.state().is_running() {
        stepper.step().unwrap();
    }
    let fresh = precompute(config).unwrap().light_curve;
    assert_eq!(compare_curves(&fresh, stepper.light_curve()), None);
}

// ── Different configs, different curves ─────────────────────────

#[test]
fn companion_mode_changes_the_curve() {
    let perturbing = precompute(reference_config()).unwrap().light_curve;
    let cosmetic = precompute(cosmetic_config()).unwrap().light_curve;

    let report = compare_curves(&perturbing, &cosmetic).unwrap();
    assert!(!report.divergences.is_empty());
    for d in &report.divergences {
        match d.kind {
            DivergenceKind::MagnificationMismatch {
                recorded, replayed, ..
            } => assert!(recorded > replayed),
            ref other => panic!("unexpected divergence {other:?}"),
        }
    }
}

#[test]
fn cancelled_run_diverges_by_length_only() {
    let config = reference_config();
    let full = precompute(config.clone()).unwrap().light_curve;

    let mut run = LockstepRun::new(config).unwrap();
    for _ in 0..120 {
        run.step_sync().unwrap();
    }
    run.cancel();

    let report = compare_curves(&full, run.light_curve()).unwrap();
    assert_eq!(report.divergences.len(), 1);
    assert_eq!(report.divergences[0].index, 120);
    assert_eq!(
        report.divergences[0].kind,
        DivergenceKind::LengthMismatch {
            recorded: 200,
            replayed: 120,
        }
    );
}

// ── Fingerprints ────────────────────────────────────────────────

#[test]
fn fingerprint_from_paced_run_verifies_with_batch() {
    let config = fast_config(80);
    let curve = paced_curve(config.clone());
    let fp = RunFingerprint::capture(&config, &curve);
    assert_eq!(fp.verify(&config), Ok(()));
}

#[test]
fn fingerprint_detects_a_forged_sample() {
    let config = reference_config();
    let mut samples = precompute(config.clone()).unwrap().light_curve.into_samples();
    samples[150] = Sample::new(StepIndex(150), 1.0);
    let forged = LightCurve::try_from(samples).unwrap();

    match RunFingerprint::capture(&config, &forged).verify(&config) {
        Err(ReplayError::CurveMismatch { .. }) => {}
        other => panic!("expected CurveMismatch, got {other:?}"),
    }
}

// ── Property: any valid config is reproducible ──────────────────

fn arb_config() -> impl Strategy<Value = SimulationConfig> {
    (
        2u64..64,
        0.5f64..30.0,
        0.05f64..3.0,
        -0.5f64..0.5,
        any::<bool>(),
    )
        .prop_map(|(steps, span, dist, speed, cosmetic)| SimulationConfig {
            total_steps: steps,
            transit_span: span,
            orbital_distance: dist,
            angular_speed: speed,
            companion: if cosmetic {
                CompanionMode::Cosmetic
            } else {
                SimulationConfig::default().companion
            },
            ..SimulationConfig::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_config_reproduces(config in arb_config()) {
        let a = precompute(config.clone()).unwrap().light_curve;
        let b = stepper_curve(config.clone());
        prop_assert_eq!(a.len() as u64, config.total_steps);
        prop_assert_eq!(curve_hash(&a), curve_hash(&b));
        prop_assert!(RunFingerprint::capture(&config, &a).verify(&config).is_ok());
    }
}
