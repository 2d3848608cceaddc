//! Integration test: batch and paced drivers agree.
//!
//! The paced driver evaluates the same steps as the batch driver, in the
//! same order, on another thread. Its curve must be bit-identical, and
//! the frames it publishes must match the batch frames one for one.

use std::time::Duration;

use microlens_engine::{
    precompute, FrameRecord, LockstepRun, RealtimeConfig, RealtimeRun, RunState, SimulationConfig,
};
use microlens_test_utils::{assert_bit_identical, fast_config};

#[test]
fn paced_curve_matches_batch_curve() {
    let config = fast_config(120);
    let batch = precompute(config.clone()).unwrap();

    let paced = RealtimeRun::spawn(config, RealtimeConfig::default()).unwrap();
    let report = paced.join().unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_bit_identical(&report.light_curve, &batch.light_curve);
}

#[test]
fn paced_frames_match_batch_frames() {
    let config = fast_config(60);
    let batch = precompute(config.clone()).unwrap();

    let realtime = RealtimeConfig {
        frame_channel_capacity: 128,
    };
    let paced = RealtimeRun::spawn(config, realtime).unwrap();
    let frames: Vec<FrameRecord> = std::iter::from_fn(|| paced.recv_frame()).collect();
    let report = paced.join().unwrap();

    assert_eq!(report.metrics.dropped_frames, 0);
    assert_eq!(frames, batch.frames);
}

#[test]
fn step_sync_matches_precompute() {
    let config = SimulationConfig {
        total_steps: 77,
        transit_span: 13.0,
        orbital_distance: 1.3,
        angular_speed: -0.11,
        ..SimulationConfig::default()
    };
    let batch = precompute(config.clone()).unwrap();

    let mut run = LockstepRun::new(config).unwrap();
    let mut records = Vec::new();
    while run.state().is_running() {
        records.push(run.step_sync().unwrap().to_record());
    }
    assert_eq!(records, batch.frames);
    assert_bit_identical(run.light_curve(), &batch.light_curve);
}

#[test]
fn cancelled_paced_run_is_a_prefix_of_the_batch_run() {
    let config = SimulationConfig {
        total_steps: 300,
        frame_interval_ms: 5.0,
        ..SimulationConfig::default()
    };
    let batch = precompute(config.clone()).unwrap();

    let paced = RealtimeRun::spawn(config, RealtimeConfig::default()).unwrap();
    for _ in 0..10 {
        paced
            .recv_frame_timeout(Duration::from_secs(5))
            .unwrap();
    }
    let report = paced.stop().unwrap();

    assert_eq!(report.state, RunState::Cancelled);
    let n = report.light_curve.len();
    assert!((10..300).contains(&n), "cancelled with {n} samples");
    assert_eq!(report.light_curve.samples(), &batch.light_curve.samples()[..n]);
}
