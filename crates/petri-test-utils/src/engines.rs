//! Mock engines.
//!
//! - [`IdentityEngine`]: copies the current board forward unchanged.
//! - [`FailingEngine`]: fails deterministically after N calls.
//! - [`PanickingEngine`]: panics deterministically after N calls.

use std::sync::atomic::{AtomicUsize, Ordering};

use petri_engine::{LifeEngine, StepError};
use petri_grid::SparseBoolGrid;

/// Copies `current` into `next` (on top of whatever the seed holds).
///
/// Useful for pipeline tests that care about hand-off and pacing rather
/// than rule semantics: every generation holds the same cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityEngine;

impl LifeEngine for IdentityEngine {
    fn name(&self) -> &str {
        "identity"
    }

    fn step(&self, current: &SparseBoolGrid, next: &mut SparseBoolGrid) -> Result<(), StepError> {
        next.add(current);
        Ok(())
    }
}

/// Behaves like [`IdentityEngine`] for `succeed_count` calls, then returns
/// [`StepError::EngineFailed`] forever.
#[derive(Debug)]
pub struct FailingEngine {
    pub succeed_count: usize,
    call_count: AtomicUsize,
}

impl FailingEngine {
    /// An engine that succeeds `succeed_count` times then fails.
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `step()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl LifeEngine for FailingEngine {
    fn name(&self) -> &str {
        "failing"
    }

    fn step(&self, current: &SparseBoolGrid, next: &mut SparseBoolGrid) -> Result<(), StepError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(StepError::EngineFailed {
                name: self.name().to_owned(),
                reason: format!(
                    "deliberate failure after {} successful calls",
                    self.succeed_count
                ),
            });
        }
        next.add(current);
        Ok(())
    }
}

/// Behaves like [`IdentityEngine`] for `succeed_count` calls, then panics
/// on every call.
#[derive(Debug)]
pub struct PanickingEngine {
    pub succeed_count: usize,
    call_count: AtomicUsize,
}

impl PanickingEngine {
    /// An engine that succeeds `succeed_count` times then panics.
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `step()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl LifeEngine for PanickingEngine {
    fn name(&self) -> &str {
        "panicking"
    }

    fn step(&self, current: &SparseBoolGrid, next: &mut SparseBoolGrid) -> Result<(), StepError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            panic!("deliberate panic on call {n}");
        }
        next.add(current);
        Ok(())
    }
}
