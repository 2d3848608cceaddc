//! Microlens realtime run: step on a background thread at the frame rate.
//!
//! Demonstrates:
//!   1. Spawning a RealtimeRun paced at the config's frame interval
//!   2. Consuming FrameRecords and following the curve with CurveFollower
//!   3. Cancelling mid-run and restarting with new parameters
//!   4. Joining the pacing thread for the final report
//!
//! # Batch vs. realtime
//!
//! `precompute` evaluates every step immediately, for rendering an
//! animation to a file. `RealtimeRun` evaluates one step per frame
//! interval on its own thread, for driving a live display. Both call the
//! same step function, so their curves are identical.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example realtime

use std::time::Duration;

use microlens_engine::{
    CurveFollower, RealtimeConfig, RealtimeError, RealtimeRun, SimulationConfig,
};

fn main() {
    env_logger::init();

    // First run: cancelled halfway, as a settings change would.
    let config = SimulationConfig {
        total_steps: 100,
        frame_interval_ms: 20.0,
        ..SimulationConfig::default()
    };
    let run = match RealtimeRun::spawn(config, RealtimeConfig::default()) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("cannot start: {e}");
            std::process::exit(1);
        }
    };
    while let Some(record) = run.recv_frame() {
        if record.step().0 == 50 {
            println!("changing orbit speed at step 50");
            break;
        }
    }
    match run.stop() {
        Ok(report) => println!(
            "first run {} with {} samples",
            report.state,
            report.light_curve.len()
        ),
        Err(e) => eprintln!("first run: {e}"),
    }

    // Second run: new parameters, run to completion.
    let config = SimulationConfig {
        total_steps: 100,
        frame_interval_ms: 20.0,
        angular_speed: 0.15,
        ..SimulationConfig::default()
    };
    let run = match RealtimeRun::spawn(config, RealtimeConfig::default()) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("cannot restart: {e}");
            std::process::exit(1);
        }
    };
    let mut follower = CurveFollower::new();
    loop {
        match run.recv_frame_timeout(Duration::from_millis(500)) {
            Ok(record) => {
                if let Err(e) = follower.apply(&record) {
                    eprintln!("frame out of order: {e}");
                    break;
                }
                if record.evaluation.perturbed() {
                    println!(
                        "step {:>3}: A = {:.3} (companion +{:.3})",
                        record.step(),
                        record.evaluation.magnification,
                        record.evaluation.perturbation,
                    );
                }
            }
            Err(RealtimeError::Finished) => break,
            Err(e) => {
                eprintln!("frame stream: {e}");
                break;
            }
        }
    }
    match run.join() {
        Ok(report) => println!(
            "second run {}: {} samples ({} followed live), {} dropped frames, {} overruns",
            report.state,
            report.light_curve.len(),
            follower.light_curve().len(),
            report.metrics.dropped_frames,
            report.metrics.budget_overruns,
        ),
        Err(e) => eprintln!("second run: {e}"),
    }
}
