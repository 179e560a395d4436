//! Puzzle configuration
//!
//! Selects the cascade variant and the numeric bounds. Loaded from JSON by
//! the native driver and the browser binding.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{PyramidError, Result};

/// Pyramid geometry and cascade rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// 1-D triangle, each cell is `|a - b|` of its two parents
    #[default]
    Triangle,
    /// 2-D shrinking grids, each cell is `max(|a - b|, |a - c|)`
    Grid,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Triangle => "triangle",
            Shape::Grid => "grid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "triangle" | "tri" | "1d" => Some(Shape::Triangle),
            "grid" | "2d" => Some(Shape::Grid),
            _ => None,
        }
    }

    /// Number of writable cells for a base of `top_size`, `None` on overflow
    pub fn top_cells(&self, top_size: usize) -> Option<usize> {
        match self {
            Shape::Triangle => Some(top_size),
            Shape::Grid => top_size.checked_mul(top_size),
        }
    }
}

/// Which cells take part in duplicate detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateScope {
    /// Top row and every derived cell
    #[default]
    AllCells,
    /// Derived cells only; the top row is ignored
    DerivedOnly,
}

/// Puzzle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub shape: Shape,
    /// Width of the top row (or side of the base grid)
    pub top_size: usize,
    /// Largest legal input value (R)
    pub max_value: u32,
    pub duplicate_scope: DuplicateScope,
    /// Shuffle seed; `None` draws one from entropy
    pub seed: Option<u64>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            shape: Shape::Triangle,
            top_size: DEFAULT_TOP_SIZE,
            max_value: DEFAULT_MAX_VALUE,
            duplicate_scope: DuplicateScope::AllCells,
            seed: None,
        }
    }
}

impl PuzzleConfig {
    /// The 5x5 grid variant
    pub fn grid() -> Self {
        Self {
            shape: Shape::Grid,
            max_value: GRID_MAX_VALUE,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of writable cells, `None` on overflow
    pub fn top_cells(&self) -> Option<usize> {
        self.shape.top_cells(self.top_size)
    }

    /// Check that the bounds describe a playable puzzle
    pub fn validate(&self) -> Result<()> {
        if self.top_size == 0 || self.top_size > MAX_TOP_SIZE {
            return Err(PyramidError::InvalidConfig(format!(
                "top_size {} outside 1..={MAX_TOP_SIZE}",
                self.top_size
            )));
        }
        let top_cells = self
            .top_cells()
            .ok_or_else(|| PyramidError::InvalidConfig(format!("top_size {} overflows", self.top_size)))?;
        if (self.max_value as usize) < top_cells {
            return Err(PyramidError::InvalidConfig(format!(
                "max_value {} cannot fill {top_cells} distinct top cells",
                self.max_value
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }
}
