//! Microlens quickstart: pre-render a whole run and print its light curve.
//!
//! Demonstrates:
//!   1. Building and validating a SimulationConfig
//!   2. Running every step back to back with `precompute`
//!   3. Reading per-frame records and view geometry
//!   4. Plotting the finished curve as text
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example quickstart

use microlens_engine::view::{curve_axes, field_of_view_limit, frames_per_second};
use microlens_engine::{precompute, SimulationConfig};

// ─── Plot size ──────────────────────────────────────────────────

const PLOT_ROWS: usize = 16;
const PLOT_COLS: usize = 72;

fn main() {
    env_logger::init();

    let config = SimulationConfig::default();
    if !config.within_recommended_ranges() {
        eprintln!("note: config is outside the recommended settings ranges");
    }

    let run = match precompute(config) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("run failed: {e}");
            std::process::exit(1);
        }
    };

    let cfg = &run.config;
    println!(
        "{} frames at {:.0} fps, sky view ±{:.1} RE",
        run.frames.len(),
        frames_per_second(cfg.frame_interval_ms),
        field_of_view_limit(cfg),
    );
    if let Some(peak) = run.light_curve.peak() {
        println!(
            "peak A = {:.3} at step {} (t = {:.0} ms)",
            peak.magnification,
            peak.step,
            peak.elapsed_ms(cfg.frame_interval_ms),
        );
    }
    println!(
        "{} steps perturbed by the companion",
        run.metrics.perturbed_steps
    );

    // ─── Selected frames ────────────────────────────────────────

    for record in run.frames.iter().step_by(40) {
        let p = record.evaluation.positions;
        println!(
            "step {:>3}: lens ({:+.2}, {:+.2}) companion ({:+.2}, {:+.2}) A = {:.4}",
            record.step(),
            p.lens.x,
            p.lens.y,
            p.companion.x,
            p.companion.y,
            record.evaluation.magnification,
        );
    }

    // ─── Text plot ──────────────────────────────────────────────

    let axes = curve_axes(&run.light_curve, cfg.total_steps);
    let mut grid = vec![[' '; PLOT_COLS]; PLOT_ROWS];
    let log_span = (axes.y.max / axes.y.min).ln();
    for sample in &run.light_curve {
        let col = ((sample.step.as_f64() / axes.x.max) * PLOT_COLS as f64) as usize;
        let height = (sample.magnification / axes.y.min).ln() / log_span;
        let row = ((1.0 - height) * (PLOT_ROWS - 1) as f64).round() as usize;
        grid[row.min(PLOT_ROWS - 1)][col.min(PLOT_COLS - 1)] = '*';
    }
    println!("\nmagnification (log scale, {:.2} .. {:.2})", axes.y.min, axes.y.max);
    for row in &grid {
        println!("|{}", row.iter().collect::<String>());
    }
    println!("+{}", "-".repeat(PLOT_COLS));
}
