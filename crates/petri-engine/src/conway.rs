//! Full-board rule application.

use petri_grid::{RlePattern, SparseBoolGrid};

use crate::engine::LifeEngine;
use crate::error::{RuleError, StepError};
use crate::rule::Rule;

/// Applies a [`Rule`] to every coordinate of the current board's bounds.
///
/// Each coordinate's live neighbours are counted with individual `get`
/// queries. A cell that is born or survives is set live in `next`; a live
/// cell that dies is set dead. Coordinates that stay dead are not written,
/// so with [`SeedMode::Previous`](crate::SeedMode::Previous) they keep
/// whatever the seeded board holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConwayEngine {
    rule: Rule,
}

impl ConwayEngine {
    /// An engine for `rule`.
    pub fn new(rule: Rule) -> Self {
        Self { rule }
    }

    /// An engine for the rule named in a pattern's header, falling back to
    /// [`Rule::CONWAY`] when the header or its rule field is absent.
    pub fn for_pattern(pattern: &RlePattern) -> Result<Self, RuleError> {
        let rule = match pattern.header.as_ref().and_then(|h| h.rule.as_deref()) {
            Some(text) => text.parse()?,
            None => Rule::CONWAY,
        };
        Ok(Self::new(rule))
    }

    /// The rule this engine applies.
    pub fn rule(&self) -> Rule {
        self.rule
    }
}

impl LifeEngine for ConwayEngine {
    fn name(&self) -> &str {
        "conway"
    }

    fn step(&self, current: &SparseBoolGrid, next: &mut SparseBoolGrid) -> Result<(), StepError> {
        let bounds = current.bounds();
        for y in bounds.ys() {
            for x in bounds.xs() {
                let alive = current.get(x, y);
                let neighbours = current.live_neighbours(x, y);
                if self.rule.next_state(alive, neighbours) {
                    next.set(x, y, true);
                } else if alive {
                    next.set(x, y, false);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SeedMode;
    use crate::generation::Generation;
    use petri_grid::parse_rle_pattern;
    use std::collections::BTreeSet;

    fn grid_of(cells: &[(i32, i32)]) -> SparseBoolGrid {
        cells.iter().copied().collect()
    }

    fn live_set(grid: &SparseBoolGrid) -> BTreeSet<(i32, i32)> {
        grid.cells().map(Into::into).collect()
    }

    fn tick(engine: &ConwayEngine, board: &SparseBoolGrid, seed: SeedMode) -> SparseBoolGrid {
        let generation = Generation::seed(board.clone());
        engine
            .advance(&generation, seed)
            .unwrap()
            .live()
            .clone()
    }

    // ── Still lifes and oscillators ─────────────────────────────

    #[test]
    fn blinker_has_period_two() {
        let horizontal = grid_of(&[(0, 1), (1, 1), (2, 1)]);
        let vertical = grid_of(&[(1, 0), (1, 1), (1, 2)]);
        let engine = ConwayEngine::default();
        for seed in [SeedMode::Empty, SeedMode::Previous] {
            let once = tick(&engine, &horizontal, seed);
            assert_eq!(once, vertical, "{seed:?}");
            let twice = tick(&engine, &once, seed);
            assert_eq!(twice, horizontal, "{seed:?}");
        }
    }

    #[test]
    fn block_is_still() {
        let block = grid_of(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        let engine = ConwayEngine::default();
        assert_eq!(tick(&engine, &block, SeedMode::Empty), block);
    }

    #[test]
    fn lone_cell_dies() {
        let engine = ConwayEngine::default();
        assert!(tick(&engine, &grid_of(&[(5, 5)]), SeedMode::Previous).is_empty());
    }

    #[test]
    fn empty_board_stays_empty() {
        let engine = ConwayEngine::default();
        let next = tick(&engine, &SparseBoolGrid::new(), SeedMode::Empty);
        assert!(next.is_empty());
        assert!(next.bounds().is_empty());
    }

    #[test]
    fn glider_translates_after_four_generations() {
        let glider = grid_of(&[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
        let engine = ConwayEngine::default();
        let mut board = glider.clone();
        for _ in 0..4 {
            board = tick(&engine, &board, SeedMode::Empty);
        }
        let shifted: BTreeSet<_> = live_set(&glider)
            .into_iter()
            .map(|(x, y)| (x + 1, y + 1))
            .collect();
        assert_eq!(live_set(&board), shifted);
    }

    #[test]
    fn board_straddling_word_and_sign_boundaries() {
        // Blinker centred on column -64/-65 and row 0/-1 edges.
        let horizontal = grid_of(&[(-66, -1), (-65, -1), (-64, -1)]);
        let vertical = grid_of(&[(-65, -2), (-65, -1), (-65, 0)]);
        let engine = ConwayEngine::default();
        assert_eq!(tick(&engine, &horizontal, SeedMode::Empty), vertical);
    }

    // ── Rules ───────────────────────────────────────────────────

    #[test]
    fn highlife_births_on_six() {
        // A dead centre with six live neighbours.
        let ring = grid_of(&[(0, 0), (1, 0), (2, 0), (0, 2), (1, 2), (2, 2)]);
        let conway = tick(&ConwayEngine::default(), &ring, SeedMode::Empty);
        let highlife = tick(
            &ConwayEngine::new("B36/S23".parse().unwrap()),
            &ring,
            SeedMode::Empty,
        );
        assert!(!conway.get(1, 1));
        assert!(highlife.get(1, 1));
    }

    #[test]
    fn for_pattern_reads_header_rule() {
        let p = parse_rle_pattern("x = 1, y = 1, rule = B36/S23\no!");
        let engine = ConwayEngine::for_pattern(&p).unwrap();
        assert_eq!(engine.rule().to_string(), "B36/S23");

        let p = parse_rle_pattern("o!");
        assert_eq!(ConwayEngine::for_pattern(&p).unwrap().rule(), Rule::CONWAY);

        let p = parse_rle_pattern("x = 1, y = 1, rule = whatever\no!");
        assert!(ConwayEngine::for_pattern(&p).is_err());
    }
}
