//! Puzzle facade: the call surface a presentation layer drives
//!
//! Owns one pyramid plus its shuffle RNG and the latest validation report.
//! Every mutation recomputes the cascade and validation before returning,
//! so readers never observe a partially updated state.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::seq::index;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{PuzzleConfig, Shape};
use crate::error::{PyramidError, Result};
use crate::pyramid::{Cell, CellCoord, CellStatus, Pyramid, UniqueScore, ValidationReport};

/// One playable difference pyramid
#[derive(Debug, Clone)]
pub struct Puzzle {
    config: PuzzleConfig,
    /// Seed the shuffle RNG started from
    seed: u64,
    rng: Pcg32,
    pyramid: Pyramid,
    report: ValidationReport,
    /// Successful edits since the last clear
    moves: u32,
}

impl Puzzle {
    /// Create an empty puzzle
    pub fn new(config: PuzzleConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let pyramid = Pyramid::new(config.shape, config.top_size, config.max_value);
        let report = ValidationReport::compute(&pyramid, config.duplicate_scope);
        log::info!(
            "New {} puzzle: top size {}, values 1..={}, seed {}",
            config.shape.as_str(),
            config.top_size,
            config.max_value,
            seed
        );
        Ok(Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            pyramid,
            report,
            moves: 0,
        })
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn pyramid(&self) -> &Pyramid {
        &self.pyramid
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Write one top cell (flat index) and recompute
    pub fn set_top_value(&mut self, index: usize, value: i64) -> Result<()> {
        self.pyramid
            .set_top_value(index, value)
            .inspect_err(|err| log::warn!("Rejected top write at {index}: {err}"))?;
        self.moves += 1;
        self.refresh();
        Ok(())
    }

    /// Write one top cell from an untyped number, rejecting non-integers
    pub fn set_top_number(&mut self, index: usize, value: f64) -> Result<()> {
        let value = self.integral_input(value)?;
        self.set_top_value(index, value)
    }

    /// Grid counterpart of [`Puzzle::set_top_number`]
    pub fn set_top_at_number(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let value = self.integral_input(value)?;
        self.set_top_at(row, col, value)
    }

    /// Accept only integers in `[1, R]`; the error keeps the caller's number
    fn integral_input(&self, value: f64) -> Result<i64> {
        let max = self.config.max_value;
        if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > f64::from(max) {
            log::warn!("Rejected top write: {value} is not an integer in 1..={max}");
            return Err(PyramidError::InvalidValue { value, max });
        }
        Ok(value as i64)
    }

    /// Write one cell of the base grid and recompute
    pub fn set_top_at(&mut self, row: usize, col: usize, value: i64) -> Result<()> {
        self.pyramid
            .set_top_at(row, col, value)
            .inspect_err(|err| log::warn!("Rejected top write at ({row}, {col}): {err}"))?;
        self.moves += 1;
        self.refresh();
        Ok(())
    }

    /// Fill the whole top layer with distinct values drawn from `[1, R]`
    pub fn shuffle_top(&mut self) {
        let count = self.pyramid.top_row().len();
        let values: Vec<u32> = index::sample(&mut self.rng, self.config.max_value as usize, count)
            .into_iter()
            .map(|i| i as u32 + 1)
            .collect();
        if let Err(err) = self.pyramid.set_top_row(&values) {
            log::error!("Shuffle drew an unusable top row {values:?}: {err}");
            return;
        }
        log::info!("Shuffled top row: {values:?}");
        self.moves += 1;
        self.refresh();
    }

    /// Unset every cell
    pub fn clear(&mut self) {
        self.pyramid.clear();
        self.moves = 0;
        self.refresh();
        log::info!("Puzzle cleared");
    }

    pub fn value(&self, layer: usize, index: usize) -> Result<Cell> {
        self.pyramid.get(layer, index)
    }

    pub fn value_at(&self, layer: usize, row: usize, col: usize) -> Result<Cell> {
        self.pyramid.get_at(layer, row, col)
    }

    pub fn duplicates(&self) -> &BTreeSet<u32> {
        &self.report.duplicates
    }

    pub fn invalid(&self) -> &BTreeSet<CellCoord> {
        &self.report.invalid
    }

    pub fn unique_score(&self) -> UniqueScore {
        self.report.score
    }

    pub fn is_solved(&self) -> bool {
        self.report.solved
    }

    pub fn cell_status(&self, coord: CellCoord) -> Result<CellStatus> {
        let cell = self.pyramid.get_at(coord.layer, coord.row, coord.col)?;
        Ok(self.report.status(coord, cell))
    }

    /// Render-ready view of every cell with its status tag
    pub fn snapshot(&self) -> Snapshot {
        let mut layers: Vec<LayerView> = (0..self.pyramid.layer_count())
            .filter_map(|l| self.pyramid.layer_size(l).ok())
            .map(|size| LayerView {
                rows: size.rows,
                cols: size.cols,
                cells: Vec::with_capacity(size.cells()),
            })
            .collect();
        for (coord, cell) in self.pyramid.cells() {
            layers[coord.layer].cells.push(CellView {
                value: cell.value(),
                status: self.report.status(coord, cell),
            });
        }
        Snapshot {
            shape: self.config.shape,
            max_value: self.config.max_value,
            layers,
            score: self.report.score,
            solved: self.report.solved,
            moves: self.moves,
        }
    }

    fn refresh(&mut self) {
        let was_solved = self.report.solved;
        self.report = ValidationReport::compute(&self.pyramid, self.config.duplicate_scope);
        log::debug!(
            "Recomputed pyramid: score {}, {} duplicate values, {} invalid cells",
            self.report.score,
            self.report.duplicates.len(),
            self.report.invalid.len()
        );
        if self.report.solved && !was_solved {
            log::info!("Puzzle solved after {} moves", self.moves);
        }
    }
}

/// One cell as the presentation layer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub value: Option<u32>,
    pub status: CellStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerView {
    pub rows: usize,
    pub cols: usize,
    /// Row-major
    pub cells: Vec<CellView>,
}

/// Full render-from-state view of a puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub shape: Shape,
    pub max_value: u32,
    pub layers: Vec<LayerView>,
    pub score: UniqueScore,
    pub solved: bool,
    pub moves: u32,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicateScope;
    use crate::pyramid::{LinearCascade, derive_all};
    use proptest::prelude::*;

    fn seeded(seed: u64) -> Puzzle {
        Puzzle::new(PuzzleConfig::default().with_seed(seed)).unwrap()
    }

    fn fill(puzzle: &mut Puzzle, values: &[i64]) {
        for (i, &v) in values.iter().enumerate() {
            puzzle.set_top_value(i, v).unwrap();
        }
    }

    fn all_values(puzzle: &Puzzle) -> Vec<Cell> {
        puzzle.pyramid().cells().map(|(_, c)| c).collect()
    }

    #[test]
    fn test_new_puzzle_is_empty() {
        let puzzle = seeded(1);
        assert_eq!(puzzle.seed(), 1);
        assert!(all_values(&puzzle).iter().all(|c| !c.is_defined()));
        assert_eq!(puzzle.unique_score(), UniqueScore { count: 0, total: 10 });
        assert!(!puzzle.is_solved());
        assert_eq!(puzzle.moves(), 0);
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = PuzzleConfig {
            max_value: 4,
            ..PuzzleConfig::default()
        };
        assert!(matches!(Puzzle::new(config), Err(PyramidError::InvalidConfig(_))));
    }

    #[test]
    fn test_fixture_findings() {
        let mut puzzle = seeded(1);
        fill(&mut puzzle, &[1, 4, 9, 11, 15]);
        assert_eq!(puzzle.duplicates(), &BTreeSet::from([1, 2, 3, 4]));
        assert_eq!(puzzle.invalid(), &BTreeSet::from([CellCoord::new(4, 0, 0)]));
        assert_eq!(puzzle.value(4, 0).unwrap(), Cell::Defined(0));
        assert_eq!(puzzle.cell_status(CellCoord::new(4, 0, 0)).unwrap(), CellStatus::Invalid);
        assert_eq!(puzzle.unique_score().to_string(), "5/10");
        assert_eq!(puzzle.moves(), 5);
    }

    #[test]
    fn test_partial_input_propagation() {
        let mut puzzle = seeded(1);
        for (i, v) in [(0, 2), (1, 12), (3, 5), (4, 8)] {
            puzzle.set_top_value(i, v).unwrap();
        }
        assert_eq!(puzzle.value(1, 0).unwrap(), Cell::Defined(10));
        assert_eq!(puzzle.value(1, 1).unwrap(), Cell::Unset);
        assert_eq!(puzzle.value(1, 2).unwrap(), Cell::Unset);
        assert_eq!(puzzle.value(1, 3).unwrap(), Cell::Defined(3));
        for layer in 2..5 {
            let size = puzzle.pyramid().layer_size(layer).unwrap().cols;
            for i in 0..size {
                assert_eq!(puzzle.value(layer, i).unwrap(), Cell::Unset);
            }
        }
    }

    #[test]
    fn test_range_rejection_leaves_state() {
        let mut puzzle = seeded(1);
        fill(&mut puzzle, &[3, 7, 12, 1, 9]);
        let before = all_values(&puzzle);
        let report = puzzle.report().clone();

        assert!(puzzle.set_top_value(0, 0).unwrap_err().is_invalid_value());
        assert!(puzzle.set_top_value(0, 16).unwrap_err().is_invalid_value());
        assert!(puzzle.set_top_number(0, 2.5).unwrap_err().is_invalid_value());
        assert!(puzzle.set_top_number(0, f64::NAN).unwrap_err().is_invalid_value());
        assert!(puzzle.set_top_value(5, 3).unwrap_err().is_out_of_range());

        assert_eq!(all_values(&puzzle), before);
        assert_eq!(puzzle.report(), &report);
        assert_eq!(puzzle.moves(), 5);

        puzzle.set_top_number(0, 4.0).unwrap();
        assert_eq!(puzzle.value(0, 0).unwrap(), Cell::Defined(4));
    }

    #[test]
    fn test_out_of_range_reads() {
        let puzzle = seeded(1);
        assert!(puzzle.value(5, 0).unwrap_err().is_out_of_range());
        assert!(puzzle.value(1, 4).unwrap_err().is_out_of_range());
        assert!(puzzle.value_at(0, 1, 0).unwrap_err().is_out_of_range());
        assert!(puzzle.cell_status(CellCoord::new(2, 0, 3)).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut puzzle = seeded(3);
        puzzle.shuffle_top();
        puzzle.clear();
        let once = all_values(&puzzle);
        let report = puzzle.report().clone();
        puzzle.clear();
        assert_eq!(all_values(&puzzle), once);
        assert_eq!(puzzle.report(), &report);
        assert!(once.iter().all(|c| !c.is_defined()));
        assert_eq!(puzzle.moves(), 0);
    }

    #[test]
    fn test_shuffle_matches_manual_cascade() {
        let mut puzzle = seeded(42);
        puzzle.shuffle_top();

        let top: Vec<u32> = puzzle.pyramid().top_row().iter().map(|c| c.value().unwrap()).collect();
        assert_eq!(top.len(), 5);
        assert!(top.iter().all(|&v| (1..=15).contains(&v)));
        assert_eq!(top.iter().collect::<BTreeSet<_>>().len(), 5);

        let expected = derive_all(&LinearCascade, 5, top.iter().copied().map(Cell::Defined).collect());
        for (layer, cells) in expected.iter().enumerate() {
            assert_eq!(puzzle.pyramid().layer(layer).unwrap(), cells.as_slice());
        }

        let manual = Pyramid::from_top_row(&top, 15).unwrap();
        assert_eq!(puzzle.unique_score(), crate::pyramid::unique_score(&manual));
    }

    #[test]
    fn test_shuffle_is_reproducible_from_seed() {
        let mut a = seeded(7);
        let mut b = seeded(7);
        for _ in 0..3 {
            a.shuffle_top();
            b.shuffle_top();
            assert_eq!(a.pyramid(), b.pyramid());
        }
    }

    #[test]
    fn test_grid_shuffle() {
        let mut puzzle = Puzzle::new(PuzzleConfig::grid().with_seed(5)).unwrap();
        puzzle.shuffle_top();
        let top: BTreeSet<u32> = puzzle.pyramid().top_row().iter().filter_map(|c| c.value()).collect();
        assert_eq!(top.len(), 25);
        assert!(top.iter().all(|&v| (1..=99).contains(&v)));
        assert!(puzzle.pyramid().cells().all(|(_, c)| c.is_defined()));
        assert_eq!(puzzle.unique_score().total, 30);

        puzzle.set_top_at(4, 4, 1).unwrap();
        assert_eq!(puzzle.value_at(0, 4, 4).unwrap(), Cell::Defined(1));
        assert!(puzzle.set_top_at(5, 0, 1).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_grid_number_input() {
        let mut puzzle = Puzzle::new(PuzzleConfig::grid().with_seed(5)).unwrap();
        puzzle.set_top_at_number(2, 3, 17.0).unwrap();
        assert_eq!(puzzle.value_at(0, 2, 3).unwrap(), Cell::Defined(17));

        let before = puzzle.pyramid().clone();
        assert!(puzzle.set_top_at_number(0, 0, 2.5).unwrap_err().is_invalid_value());
        assert!(puzzle.set_top_at_number(0, 0, f64::INFINITY).unwrap_err().is_invalid_value());
        assert!(puzzle.set_top_at_number(9, 0, 3.0).unwrap_err().is_out_of_range());
        match puzzle.set_top_at_number(0, 0, 1e20) {
            Err(PyramidError::InvalidValue { value, max }) => {
                assert_eq!(value, 1e20);
                assert_eq!(max, 99);
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        assert_eq!(puzzle.pyramid(), &before);
        assert_eq!(puzzle.moves(), 1);
    }

    #[test]
    fn test_solved_puzzle() {
        let config = PuzzleConfig {
            top_size: 4,
            ..PuzzleConfig::default()
        };
        let mut puzzle = Puzzle::new(config).unwrap();
        fill(&mut puzzle, &[6, 1, 10, 8]);
        assert!(puzzle.is_solved());
        assert!(puzzle.duplicates().is_empty());
        assert!(puzzle.invalid().is_empty());

        puzzle.set_top_value(3, 9).unwrap();
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn test_derived_only_scope() {
        let config = PuzzleConfig {
            duplicate_scope: DuplicateScope::DerivedOnly,
            seed: Some(1),
            ..PuzzleConfig::default()
        };
        let mut puzzle = Puzzle::new(config).unwrap();
        fill(&mut puzzle, &[1, 4, 9, 11, 15]);
        assert_eq!(puzzle.duplicates(), &BTreeSet::from([1, 2, 3]));
        assert_eq!(puzzle.cell_status(CellCoord::new(0, 1, 0)).ok(), None);
        assert_eq!(puzzle.cell_status(CellCoord::new(0, 0, 1)).unwrap(), CellStatus::Valid);
    }

    #[test]
    fn test_snapshot() {
        let mut puzzle = seeded(1);
        fill(&mut puzzle, &[1, 4, 9, 11, 15]);
        let snap = puzzle.snapshot();
        assert_eq!(snap.layers.len(), 5);
        assert_eq!(snap.layers[1].cols, 4);
        assert_eq!(
            snap.layers[1].cells[1],
            CellView {
                value: Some(5),
                status: CellStatus::Valid
            }
        );
        assert_eq!(snap.layers[4].cells[0].status, CellStatus::Invalid);
        assert_eq!(snap.score, UniqueScore { count: 5, total: 10 });

        let json = snap.to_json().unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    proptest! {
        #[test]
        fn prop_shuffle_draws_distinct_values(seed in any::<u64>()) {
            let mut puzzle = seeded(seed);
            puzzle.shuffle_top();
            let top: Vec<u32> = puzzle.pyramid().top_row().iter().filter_map(|c| c.value()).collect();
            prop_assert_eq!(top.len(), 5);
            prop_assert!(top.iter().all(|&v| (1..=15).contains(&v)));
            prop_assert_eq!(top.iter().collect::<BTreeSet<_>>().len(), 5);
            let manual = Pyramid::from_top_row(&top, 15).unwrap();
            prop_assert_eq!(puzzle.pyramid(), &manual);
        }
    }
}
