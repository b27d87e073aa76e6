//! Error types for the life engine and generation pipeline, organised by
//! subsystem: stepping, rule parsing, configuration, and pipeline control.

use std::error::Error;
use std::fmt;

use petri_grid::GridError;

/// Errors from computing one generation.
///
/// Inside a running pipeline these never escape: the producer logs them,
/// counts them in [`PipelineMetrics::faults`](crate::PipelineMetrics::faults)
/// and skips the frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// The engine's `step` returned an error.
    EngineFailed {
        /// Name of the failing engine.
        name: String,
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The engine panicked while stepping. The panic was caught at the
    /// frame boundary.
    EnginePanicked {
        /// Name of the panicking engine.
        name: String,
        /// Panic payload, if it was a string.
        message: String,
    },
    /// A grid traversal failed mid-step.
    Grid(GridError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngineFailed { name, reason } => write!(f, "engine '{name}' failed: {reason}"),
            Self::EnginePanicked { name, message } => {
                write!(f, "engine '{name}' panicked: {message}")
            }
            Self::Grid(e) => write!(f, "grid: {e}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for StepError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

/// Errors from parsing a `B.../S...` rule string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleError {
    /// The rule string does not have the expected shape.
    Malformed {
        /// The offending input.
        rule: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { rule, reason } => write!(f, "malformed rule '{rule}': {reason}"),
        }
    }
}

impl Error for RuleError {}

/// Errors detected by [`PipelineConfig::validate()`](crate::PipelineConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_backlog` is `Some(0)`: the queue could never hold a generation.
    ZeroBacklogCap,
    /// The hard cap does not exceed the backpressure threshold, so the
    /// backlog could never grow past the threshold and backpressure would
    /// never engage.
    BacklogCapBelowThreshold {
        /// Configured hard cap.
        cap: usize,
        /// Configured backpressure threshold.
        threshold: usize,
    },
    /// `penalty_factor` is zero, which disables backpressure entirely.
    ZeroPenaltyFactor,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBacklogCap => write!(f, "max_backlog must be at least 1"),
            Self::BacklogCapBelowThreshold { cap, threshold } => write!(
                f,
                "max_backlog {cap} must exceed the backpressure threshold {threshold}"
            ),
            Self::ZeroPenaltyFactor => write!(f, "penalty_factor must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

/// Errors from pipeline lifecycle control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineError {
    /// `run` was called while the producer loop is already running.
    AlreadyRunning,
    /// `run` was called after the pipeline stopped. Stopping is terminal.
    AlreadyStopped,
    /// The producer thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "pipeline is already running"),
            Self::AlreadyStopped => write!(f, "pipeline has been stopped"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for PipelineError {}
