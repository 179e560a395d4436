//! Cell values and coordinates

use serde::{Deserialize, Serialize};

/// A single pyramid cell: either unset or holding an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Unset,
    Defined(u32),
}

impl Cell {
    #[inline]
    pub fn value(self) -> Option<u32> {
        match self {
            Cell::Unset => None,
            Cell::Defined(v) => Some(v),
        }
    }

    #[inline]
    pub fn is_defined(self) -> bool {
        matches!(self, Cell::Defined(_))
    }

    /// `|a - b|` of two parents, unset if either parent is
    #[inline]
    pub fn abs_diff(self, other: Cell) -> Cell {
        match (self, other) {
            (Cell::Defined(a), Cell::Defined(b)) => Cell::Defined(a.abs_diff(b)),
            _ => Cell::Unset,
        }
    }
}

impl From<Option<u32>> for Cell {
    fn from(value: Option<u32>) -> Self {
        value.map_or(Cell::Unset, Cell::Defined)
    }
}

/// Location of a cell. Triangle layers always use `row == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub layer: usize,
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(layer: usize, row: usize, col: usize) -> Self {
        Self { layer, row, col }
    }
}

/// Dimensions of one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSize {
    pub rows: usize,
    pub cols: usize,
}

impl LayerSize {
    #[inline]
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }
}
