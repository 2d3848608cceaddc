//! Paced (realtime) driver.
//!
//! [`RealtimeRun`] moves a [`Stepper`] onto a dedicated background thread
//! that evaluates one step per frame interval and publishes each step's
//! [`FrameRecord`] on a bounded channel.
//!
//! # Architecture
//!
//! ```text
//! Caller thread                    Pacing thread ("microlens-pacer")
//!     |                                 |
//!     |                                 | cancel flag set? -> stop
//!     |                                 | stepper.step()
//!     |<-- recv_frame() ----------------| frame_tx.try_send(record + backfill)
//!     |   [frames: bounded(64)]         |   full -> drop frame, backfill it
//!     |                                 | completed? -> send final, stop
//!     |                                 | park(interval - elapsed)
//!     |-- cancel() ------------------->|
//!     |   [AtomicBool + unpark]         |
//!     |<-- join() -> RunReport ---------|
//! ```
//!
//! The pacing thread never blocks on the consumer mid-run. A slow renderer
//! loses frames but not samples: the next delivered record carries the
//! samples of the dropped steps in its `backfill`, and the final record is
//! always delivered (the pacer waits for room, or for cancellation), so a
//! [`CurveFollower`](crate::CurveFollower) fed every received record ends
//! with the complete curve.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender, TrySendError};
use microlens_core::{LightCurve, Sample};

use crate::config::{ConfigError, SimulationConfig};
use crate::frame::FrameRecord;
use crate::metrics::RunMetrics;
use crate::stepper::{RunState, Stepper};

// ── RealtimeConfig ───────────────────────────────────────────────

/// Settings for the paced driver that are not part of the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RealtimeConfig {
    /// Capacity of the frame channel. Frames produced while it is full
    /// are dropped and their samples backfilled into the next delivered
    /// frame. Zero is treated as one.
    pub frame_channel_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            frame_channel_capacity: 64,
        }
    }
}

// ── Error types ──────────────────────────────────────────────────

/// Errors from receiving frames or joining a [`RealtimeRun`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RealtimeError {
    /// No frame arrived within the timeout.
    Timeout,
    /// The run has ended and every published frame was received.
    Finished,
    /// The pacing thread panicked.
    ThreadPanicked,
}

impl fmt::Display for RealtimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for a frame"),
            Self::Finished => write!(f, "run has finished"),
            Self::ThreadPanicked => write!(f, "pacing thread panicked"),
        }
    }
}

impl std::error::Error for RealtimeError {}

// ── RunReport ────────────────────────────────────────────────────

/// What the pacing thread hands back when it stops.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Final state: `Completed`, or `Cancelled` if stopped early.
    pub state: RunState,
    /// Every sample recorded, including those whose frames were dropped.
    pub light_curve: LightCurve,
    /// Counters for the run, including dropped frames and overruns.
    pub metrics: RunMetrics,
}

// ── RealtimeRun ──────────────────────────────────────────────────

/// A run paced at its config's frame interval on a background thread.
///
/// Dropping a `RealtimeRun` cancels it and joins the thread.
///
/// # Example
///
/// ```
/// use microlens_engine::{RealtimeConfig, RealtimeRun, RunState, SimulationConfig};
///
/// let config = SimulationConfig {
///     total_steps: 20,
///     frame_interval_ms: 1.0,
///     ..SimulationConfig::default()
/// };
/// let run = RealtimeRun::spawn(config, RealtimeConfig::default()).unwrap();
/// let mut received = 0;
/// while let Some(_frame) = run.recv_frame() {
///     received += 1;
/// }
/// let report = run.join().unwrap();
/// assert_eq!(report.state, RunState::Completed);
/// assert_eq!(received, 20);
/// ```
pub struct RealtimeRun {
    frames: Receiver<FrameRecord>,
    cancel_flag: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    pacer: Option<JoinHandle<RunReport>>,
}

impl RealtimeRun {
    /// Validate `config` and start pacing it on a new thread.
    ///
    /// The config is checked on the caller's thread; nothing is spawned
    /// for an invalid config.
    pub fn spawn(config: SimulationConfig, realtime: RealtimeConfig) -> Result<Self, ConfigError> {
        let mut stepper = Stepper::new();
        stepper.start(config)?;

        let (frame_tx, frames) = crossbeam_channel::bounded(realtime.frame_channel_capacity.max(1));
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));

        let pacer_cancel = Arc::clone(&cancel_flag);
        let pacer_finished = Arc::clone(&finished);
        let pacer = thread::Builder::new()
            .name("microlens-pacer".into())
            .spawn(move || {
                let report = pace(stepper, &frame_tx, &pacer_cancel);
                pacer_finished.store(true, Ordering::Release);
                report
            })
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;

        Ok(Self {
            frames,
            cancel_flag,
            finished,
            pacer: Some(pacer),
        })
    }

    /// Block until the next frame arrives.
    ///
    /// Returns `None` once the run has ended and every published frame
    /// has been received.
    pub fn recv_frame(&self) -> Option<FrameRecord> {
        self.frames.recv().ok()
    }

    /// Take the next frame if one is waiting.
    pub fn try_recv_frame(&self) -> Option<FrameRecord> {
        self.frames.try_recv().ok()
    }

    /// Wait up to `timeout` for the next frame.
    pub fn recv_frame_timeout(&self, timeout: Duration) -> Result<FrameRecord, RealtimeError> {
        self.frames.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => RealtimeError::Timeout,
            RecvTimeoutError::Disconnected => RealtimeError::Finished,
        })
    }

    /// The frame channel, for use with `crossbeam_channel::select!`.
    pub fn frames(&self) -> &Receiver<FrameRecord> {
        &self.frames
    }

    /// Ask the pacing thread to stop before its next step.
    ///
    /// Wakes the thread if it is waiting out a frame interval.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Release);
        if let Some(handle) = &self.pacer {
            handle.thread().unpark();
        }
    }

    /// Whether the pacing thread has stopped stepping.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Wait for the pacing thread to stop and collect its report.
    ///
    /// Does not cancel: a running run is joined once it completes. Frames
    /// not yet received are discarded.
    pub fn join(mut self) -> Result<RunReport, RealtimeError> {
        let Some(handle) = self.pacer.take() else {
            return Err(RealtimeError::Finished);
        };
        // The pacer may be waiting for room to send the final frame.
        while !handle.is_finished() {
            let _ = self.frames.recv_timeout(JOIN_POLL);
        }
        handle.join().map_err(|_| RealtimeError::ThreadPanicked)
    }

    /// Cancel and join in one call.
    pub fn stop(self) -> Result<RunReport, RealtimeError> {
        self.cancel();
        self.join()
    }
}

impl fmt::Debug for RealtimeRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeRun")
            .field("pending_frames", &self.frames.len())
            .field("cancelled", &self.cancel_flag.load(Ordering::Relaxed))
            .field("finished", &self.is_finished())
            .finish()
    }
}

impl Drop for RealtimeRun {
    fn drop(&mut self) {
        if let Some(handle) = self.pacer.take() {
            self.cancel_flag.store(true, Ordering::Release);
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

// ── Pacing loop ──────────────────────────────────────────────────

/// How often a blocked final send re-checks the cancel flag.
const FINAL_SEND_POLL: Duration = Duration::from_millis(5);

/// How often `join()` drains the channel while waiting for the pacer.
const JOIN_POLL: Duration = Duration::from_millis(1);

fn pace(mut stepper: Stepper, frame_tx: &Sender<FrameRecord>, cancel: &AtomicBool) -> RunReport {
    let budget = stepper
        .config()
        .map_or(Duration::ZERO, SimulationConfig::frame_interval);
    log::debug!("pacer started: one step every {budget:?}");

    // Samples whose frames were dropped, owed to the next delivered frame.
    let mut backfill: Vec<Sample> = Vec::new();

    while stepper.state().is_running() {
        if cancel.load(Ordering::Acquire) {
            stepper.cancel();
            break;
        }

        let step_start = Instant::now();

        // 1. Evaluate and record the step.
        let mut record = match stepper.step() {
            Ok(frame) => frame.to_record(),
            Err(e) => {
                log::warn!("pacer stopped: {e}");
                break;
            }
        };
        let step = record.step();
        record.backfill = std::mem::take(&mut backfill);

        if !stepper.state().is_running() {
            // 2a. The final frame closes the curve, so it must arrive.
            if !send_final(frame_tx, record, cancel) {
                stepper.metrics_mut().dropped_frames += 1;
                log::warn!("run cancelled before final step {step} was delivered");
            }
            break;
        }

        // 2b. Publish without blocking on the consumer.
        match frame_tx.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(rejected)) => {
                stepper.metrics_mut().dropped_frames += 1;
                log::warn!("frame channel full, dropped step {step}");
                let sample = rejected.sample();
                backfill = rejected.backfill;
                backfill.push(sample);
            }
            // Receiver gone: the run is being dropped and the cancel
            // flag is already set.
            Err(TrySendError::Disconnected(_)) => {}
        }

        // 3. Wait out the rest of the frame interval.
        let deadline = step_start + budget;
        let now = Instant::now();
        if now > deadline {
            stepper.metrics_mut().budget_overruns += 1;
            log::warn!(
                "step {step} overran frame interval by {:?}",
                now - deadline
            );
            continue;
        }
        park_until(deadline, cancel);
    }

    let metrics = stepper.metrics().clone();
    log::debug!(
        "pacer stopped: {} after {} steps, {} dropped frames",
        stepper.state(),
        metrics.steps_executed,
        metrics.dropped_frames,
    );
    RunReport {
        state: stepper.state(),
        metrics,
        light_curve: stepper.into_light_curve(),
    }
}

/// Block until `record` is queued, the receiver is gone, or the run is
/// cancelled. Returns whether the record was queued.
fn send_final(frame_tx: &Sender<FrameRecord>, mut record: FrameRecord, cancel: &AtomicBool) -> bool {
    loop {
        if cancel.load(Ordering::Acquire) {
            return false;
        }
        match frame_tx.send_timeout(record, FINAL_SEND_POLL) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(pending)) => record = pending,
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}

/// Park until `deadline` or until cancelled. `park_timeout` can wake
/// spuriously, so re-check both conditions.
fn park_until(deadline: Instant, cancel: &AtomicBool) {
    loop {
        if cancel.load(Ordering::Acquire) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::park_timeout(deadline - now);
    }
}
