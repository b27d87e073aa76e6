//! Frame pacing and backpressure.
//!
//! [`FramePacer`] decides how long the producer pauses after each frame.
//! It is pure arithmetic over the frame's compute time and the current
//! queue length; the pipeline does the actual sleeping.

use std::time::Duration;

use crate::config::PipelineConfig;

/// Smallest compute time the backpressure penalty is based on, so an
/// instantaneous frame still backs off.
const MIN_PENALTY_BASE: Duration = Duration::from_millis(1);

/// The pause after one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FramePause {
    /// Remainder of the frame budget (zero if the frame ran over).
    pub pace: Duration,
    /// Extra pause because the queue is backed up (zero otherwise).
    pub backpressure: Duration,
}

impl FramePause {
    /// Total pause.
    pub fn total(&self) -> Duration {
        self.pace.saturating_add(self.backpressure)
    }

    /// Whether backpressure contributed to this pause.
    pub fn is_backpressured(&self) -> bool {
        !self.backpressure.is_zero()
    }
}

/// Per-frame pause calculator and rolling frame-time average.
#[derive(Clone, Debug)]
pub struct FramePacer {
    target: Duration,
    backlog_threshold: usize,
    penalty_factor: u32,
    average_ms: u64,
}

impl FramePacer {
    /// A pacer for `config`.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            target: config.target_frame(),
            backlog_threshold: config.backpressure.backlog_threshold,
            penalty_factor: config.backpressure.penalty_factor,
            average_ms: 0,
        }
    }

    /// Pause for a frame that took `elapsed` with `backlog` generations
    /// still waiting.
    ///
    /// `pace` tops the frame up to the target; `backpressure` adds
    /// `penalty_factor × max(elapsed, 1 ms)` once `backlog` exceeds the
    /// threshold.
    pub fn pause(&self, elapsed: Duration, backlog: usize) -> FramePause {
        let pace = self.target.saturating_sub(elapsed);
        let backpressure = if backlog > self.backlog_threshold {
            elapsed
                .max(MIN_PENALTY_BASE)
                .saturating_mul(self.penalty_factor)
        } else {
            Duration::ZERO
        };
        FramePause { pace, backpressure }
    }

    /// Fold a frame time into the rolling average,
    /// `avg = (avg × 7 + elapsed_ms) / 8`.
    pub fn record(&mut self, elapsed: Duration) {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.average_ms = self.average_ms.saturating_mul(7).saturating_add(ms) / 8;
    }

    /// Rolling average frame time in milliseconds.
    pub fn average_ms(&self) -> u64 {
        self.average_ms
    }
}
