//! Validation: duplicates, invalid cells and the unique-differences score
//!
//! Findings here are never errors. A pyramid may be fully defined and still
//! wrong; these functions only report how.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellCoord};
use super::model::Pyramid;
use crate::config::DuplicateScope;

/// Per-cell tag for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    Unset,
    Valid,
    /// Value occurs more than once within the duplicate scope
    Duplicate,
    /// Zero or outside `[1, R]`; takes precedence over `Duplicate`
    Invalid,
}

/// Distinct non-zero derived values out of the derived cell count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UniqueScore {
    pub count: usize,
    pub total: usize,
}

impl std::fmt::Display for UniqueScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.count, self.total)
    }
}

/// Values occurring more than once among defined cells in `scope`
pub fn find_duplicates(pyramid: &Pyramid, scope: DuplicateScope) -> BTreeSet<u32> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for (coord, cell) in pyramid.cells() {
        if scope == DuplicateScope::DerivedOnly && coord.layer == 0 {
            continue;
        }
        if let Some(v) = cell.value() {
            *counts.entry(v).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|&(_, n)| n > 1)
        .map(|(v, _)| v)
        .collect()
}

/// Defined cells whose value is zero or above the pyramid's maximum
pub fn find_invalid(pyramid: &Pyramid) -> BTreeSet<CellCoord> {
    let max = pyramid.max_value();
    pyramid
        .cells()
        .filter(|(_, cell)| matches!(cell, Cell::Defined(v) if *v == 0 || *v > max))
        .map(|(coord, _)| coord)
        .collect()
}

/// Count of distinct, non-zero values among derived cells
pub fn unique_difference_count(pyramid: &Pyramid) -> usize {
    pyramid
        .derived_cells()
        .filter_map(|(_, cell)| cell.value())
        .filter(|&v| v != 0)
        .collect::<BTreeSet<_>>()
        .len()
}

pub fn unique_score(pyramid: &Pyramid) -> UniqueScore {
    UniqueScore {
        count: unique_difference_count(pyramid),
        total: pyramid.derived_cell_count(),
    }
}

/// Every cell defined, no invalid cell, and no value repeated anywhere
pub fn is_solved(pyramid: &Pyramid) -> bool {
    pyramid.cells().all(|(_, cell)| cell.is_defined())
        && find_invalid(pyramid).is_empty()
        && find_duplicates(pyramid, DuplicateScope::AllCells).is_empty()
}

/// Validation findings for one pyramid state, recomputed after every mutation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub duplicates: BTreeSet<u32>,
    pub invalid: BTreeSet<CellCoord>,
    pub score: UniqueScore,
    /// Every cell defined
    pub complete: bool,
    pub solved: bool,
    scope: DuplicateScope,
}

impl ValidationReport {
    pub fn compute(pyramid: &Pyramid, scope: DuplicateScope) -> Self {
        let duplicates = find_duplicates(pyramid, scope);
        let invalid = find_invalid(pyramid);
        let complete = pyramid.cells().all(|(_, cell)| cell.is_defined());
        // "solved" always uses the full set, whatever scope highlights use
        let solved = complete
            && invalid.is_empty()
            && match scope {
                DuplicateScope::AllCells => duplicates.is_empty(),
                DuplicateScope::DerivedOnly => find_duplicates(pyramid, DuplicateScope::AllCells).is_empty(),
            };
        Self {
            duplicates,
            invalid,
            score: unique_score(pyramid),
            complete,
            solved,
            scope,
        }
    }

    /// Tag for one cell given its current value
    pub fn status(&self, coord: CellCoord, cell: Cell) -> CellStatus {
        match cell {
            Cell::Unset => CellStatus::Unset,
            Cell::Defined(_) if self.invalid.contains(&coord) => CellStatus::Invalid,
            Cell::Defined(v) => {
                let in_scope = coord.layer > 0 || self.scope == DuplicateScope::AllCells;
                if in_scope && self.duplicates.contains(&v) {
                    CellStatus::Duplicate
                } else {
                    CellStatus::Valid
                }
            }
        }
    }
}
