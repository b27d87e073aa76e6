//! Pipeline configuration and validation.
//!
//! [`PipelineConfig`] is the input for constructing a
//! [`GenerationPipeline`](crate::GenerationPipeline).
//! [`validate()`](PipelineConfig::validate) checks its invariants once, at
//! construction; the producer loop assumes a valid config.

use std::time::Duration;

use crate::engine::SeedMode;
use crate::error::ConfigError;

// ── BackpressureConfig ─────────────────────────────────────────────

/// Shape of the producer's backpressure response.
///
/// Once more than `backlog_threshold` generations are waiting in the
/// queue, every frame adds an extra pause of `penalty_factor` times the
/// frame's compute time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackpressureConfig {
    /// Queue length above which backpressure engages. Default: 8.
    pub backlog_threshold: usize,
    /// Multiplier applied to the frame's compute time. Default: 7.
    pub penalty_factor: u32,
}

impl Default for BackpressureConfig {
    fn default() -> Self {
        Self {
            backlog_threshold: 8,
            penalty_factor: 7,
        }
    }
}

// ── PipelineConfig ─────────────────────────────────────────────────

/// Configuration for a [`GenerationPipeline`](crate::GenerationPipeline).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Target wall-clock time per frame, in milliseconds. Frames that
    /// finish early sleep for the remainder. Default: 1000.
    pub target_frame_ms: u64,
    /// Seed each next board with the current one instead of an empty
    /// board (see [`SeedMode`]). Default: `false`.
    pub start_from_previous: bool,
    /// Soft bound on the queue.
    pub backpressure: BackpressureConfig,
    /// Hard bound on the queue. When set, publishing evicts the oldest
    /// waiting generations to stay within it. Default: `None`.
    pub max_backlog: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_frame_ms: 1000,
            start_from_previous: false,
            backpressure: BackpressureConfig::default(),
            max_backlog: None,
        }
    }
}

impl PipelineConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backpressure.penalty_factor == 0 {
            return Err(ConfigError::ZeroPenaltyFactor);
        }
        match self.max_backlog {
            Some(0) => Err(ConfigError::ZeroBacklogCap),
            Some(cap) if cap <= self.backpressure.backlog_threshold => {
                Err(ConfigError::BacklogCapBelowThreshold {
                    cap,
                    threshold: self.backpressure.backlog_threshold,
                })
            }
            _ => Ok(()),
        }
    }

    /// [`target_frame_ms`](Self::target_frame_ms) as a `Duration`.
    pub fn target_frame(&self) -> Duration {
        Duration::from_millis(self.target_frame_ms)
    }

    /// The seed mode selected by
    /// [`start_from_previous`](Self::start_from_previous).
    pub fn seed_mode(&self) -> SeedMode {
        SeedMode::from(self.start_from_previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.target_frame_ms, 1000);
        assert!(!cfg.start_from_previous);
        assert_eq!(cfg.backpressure.backlog_threshold, 8);
        assert_eq!(cfg.backpressure.penalty_factor, 7);
        assert_eq!(cfg.max_backlog, None);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.seed_mode(), SeedMode::Empty);
        assert_eq!(cfg.target_frame(), Duration::from_secs(1));
    }

    #[test]
    fn zero_cap_rejected() {
        let cfg = PipelineConfig {
            max_backlog: Some(0),
            ..PipelineConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroBacklogCap));
    }

    #[test]
    fn cap_must_exceed_threshold() {
        let mut cfg = PipelineConfig {
            max_backlog: Some(8),
            ..PipelineConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::BacklogCapBelowThreshold {
                cap: 8,
                threshold: 8,
            })
        );
        cfg.max_backlog = Some(9);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_penalty_rejected() {
        let cfg = PipelineConfig {
            backpressure: BackpressureConfig {
                penalty_factor: 0,
                ..BackpressureConfig::default()
            },
            ..PipelineConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPenaltyFactor));
    }

    #[test]
    fn zero_target_is_allowed() {
        let cfg = PipelineConfig {
            target_frame_ms: 0,
            start_from_previous: true,
            ..PipelineConfig::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.seed_mode(), SeedMode::Previous);
    }
}
