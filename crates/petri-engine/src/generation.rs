//! Immutable generation snapshots.

use std::borrow::Cow;
use std::fmt;

use petri_grid::SparseBoolGrid;

/// Sequence number of a generation. The seed generation is `GenerationId(0)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationId(pub u64);

impl GenerationId {
    /// The id of the generation after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GenerationId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// One board state: the live cells plus optional born/dead deltas.
///
/// The effective board is `live ∪ born − dead` (see
/// [`composed`](Self::composed)). Engines produce generations without
/// deltas; deltas only appear in caller-supplied seeds handed to
/// [`GenerationPipeline::initialize`](crate::GenerationPipeline::initialize).
///
/// Once published behind an `Arc` a generation is never mutated; the
/// pipeline edits its current board through `Arc::make_mut`, which clones
/// if any consumer still holds the snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Generation {
    id: GenerationId,
    live: SparseBoolGrid,
    born: Option<SparseBoolGrid>,
    dead: Option<SparseBoolGrid>,
}

impl Generation {
    /// A generation with the given id and no deltas.
    pub fn new(id: GenerationId, live: SparseBoolGrid) -> Self {
        Self {
            id,
            live,
            born: None,
            dead: None,
        }
    }

    /// The seed generation (`id == 0`) for `live`.
    pub fn seed(live: SparseBoolGrid) -> Self {
        Self::new(GenerationId(0), live)
    }

    /// Attach a set of cells that become live when composed.
    pub fn with_born(mut self, born: SparseBoolGrid) -> Self {
        self.born = Some(born);
        self
    }

    /// Attach a set of cells that die when composed.
    pub fn with_dead(mut self, dead: SparseBoolGrid) -> Self {
        self.dead = Some(dead);
        self
    }

    /// Sequence number.
    pub fn id(&self) -> GenerationId {
        self.id
    }

    /// Live cells, before deltas.
    pub fn live(&self) -> &SparseBoolGrid {
        &self.live
    }

    /// Cells born this generation, if tracked.
    pub fn born(&self) -> Option<&SparseBoolGrid> {
        self.born.as_ref()
    }

    /// Cells that died this generation, if tracked.
    pub fn dead(&self) -> Option<&SparseBoolGrid> {
        self.dead.as_ref()
    }

    /// Whether either delta is present.
    pub fn has_deltas(&self) -> bool {
        self.born.is_some() || self.dead.is_some()
    }

    /// The effective board, `live ∪ born − dead`.
    ///
    /// Borrows `live` when there are no deltas; otherwise clones it and
    /// applies them.
    pub fn composed(&self) -> Cow<'_, SparseBoolGrid> {
        if !self.has_deltas() {
            return Cow::Borrowed(&self.live);
        }
        let mut board = self.live.clone();
        if let Some(born) = &self.born {
            board.add(born);
        }
        if let Some(dead) = &self.dead {
            board.remove(dead);
        }
        Cow::Owned(board)
    }

    pub(crate) fn live_mut(&mut self) -> &mut SparseBoolGrid {
        &mut self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn grid_of(cells: &[(i32, i32)]) -> SparseBoolGrid {
        cells.iter().copied().collect()
    }

    fn live_set(grid: &SparseBoolGrid) -> BTreeSet<(i32, i32)> {
        grid.cells().map(Into::into).collect()
    }

    #[test]
    fn ids_increment_and_display() {
        let id = GenerationId(41);
        assert_eq!(id.next(), GenerationId(42));
        assert_eq!(id.next().to_string(), "42");
        assert_eq!(GenerationId::default(), GenerationId(0));
    }

    #[test]
    fn composed_without_deltas_borrows() {
        let g = Generation::seed(grid_of(&[(0, 0)]));
        assert!(matches!(g.composed(), Cow::Borrowed(_)));
        assert_eq!(g.id(), GenerationId(0));
    }

    #[test]
    fn composed_applies_born_then_dead() {
        let g = Generation::seed(grid_of(&[(0, 0), (1, 0)]))
            .with_born(grid_of(&[(2, 0), (3, 0)]))
            .with_dead(grid_of(&[(0, 0), (3, 0)]));
        assert!(g.has_deltas());
        assert_eq!(live_set(&g.composed()), BTreeSet::from([(1, 0), (2, 0)]));
        // Composition never touches the stored live board.
        assert_eq!(g.live().len(), 2);
    }

    #[test]
    fn dead_only_delta() {
        let g = Generation::seed(grid_of(&[(0, 0), (1, 0)])).with_dead(grid_of(&[(1, 0)]));
        assert_eq!(live_set(&g.composed()), BTreeSet::from([(0, 0)]));
        assert!(g.born().is_none());
    }
}
