//! The [`LifeEngine`] trait and [`SeedMode`] enum.
//!
//! An engine turns one board into the next. It is stateless (`&self`) and
//! shared with the producer thread, so it must be `Send + Sync`.

use petri_grid::SparseBoolGrid;

use crate::error::StepError;
use crate::generation::Generation;

/// How the next board is initialised before the engine writes to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedMode {
    /// Fresh empty board. The engine must set every cell that is alive
    /// next generation.
    #[default]
    Empty,
    /// Clone of the current composed board. The engine only writes the
    /// cells whose state changes.
    Previous,
}

impl From<bool> for SeedMode {
    /// `true` selects [`SeedMode::Previous`].
    fn from(start_from_previous: bool) -> Self {
        if start_from_previous {
            Self::Previous
        } else {
            Self::Empty
        }
    }
}

/// A generation-to-generation transition function.
///
/// # Contract
///
/// - `step()` reads only `current` and writes only `next`.
/// - `step()` must be deterministic for a given `current` and seeded `next`.
/// - Failures are reported as `Err`; a panicking engine is caught at the
///   frame boundary by the pipeline and treated like an `Err`.
///
/// # Examples
///
/// An engine that shifts every live cell one column to the right:
///
/// ```
/// use petri_engine::{Generation, LifeEngine, SeedMode, StepError};
/// use petri_grid::SparseBoolGrid;
///
/// struct Drift;
///
/// impl LifeEngine for Drift {
///     fn name(&self) -> &str { "drift" }
///
///     fn step(&self, current: &SparseBoolGrid, next: &mut SparseBoolGrid) -> Result<(), StepError> {
///         next.clear();
///         for cell in current {
///             next.set(cell.x + 1, cell.y, true);
///         }
///         Ok(())
///     }
/// }
///
/// let seed = Generation::seed([(0, 0)].into_iter().collect());
/// let next = Drift.advance(&seed, SeedMode::Empty).unwrap();
/// assert!(next.live().get(1, 0));
/// assert_eq!(next.id().0, 1);
/// ```
pub trait LifeEngine: Send + Sync + 'static {
    /// Human-readable name for logging and error reporting.
    fn name(&self) -> &str;

    /// Compute the next board from `current`, writing into `next`.
    ///
    /// `next` arrives seeded according to the caller's [`SeedMode`].
    fn step(&self, current: &SparseBoolGrid, next: &mut SparseBoolGrid)
        -> Result<(), StepError>;

    /// Produce the generation after `current`.
    ///
    /// Composes `current` (live ∪ born − dead), seeds the next board per
    /// `seed`, runs [`step`](Self::step), and wraps the result with the
    /// next id and no deltas.
    fn advance(&self, current: &Generation, seed: SeedMode) -> Result<Generation, StepError> {
        let board = current.composed();
        let mut next = match seed {
            SeedMode::Empty => SparseBoolGrid::new(),
            SeedMode::Previous => SparseBoolGrid::clone(&board),
        };
        self.step(&board, &mut next)?;
        Ok(Generation::new(current.id().next(), next))
    }
}
