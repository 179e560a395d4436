//! Difference Pyramid - a cascading absolute-difference number puzzle
//!
//! Core modules:
//! - `pyramid`: Pure engine (cell model, 1-D and 2-D cascades, validation)
//! - `puzzle`: Stateful facade a presentation layer drives
//! - `config`: Shape selection and numeric bounds
//! - `web`: Browser binding (wasm32 only)

pub mod config;
pub mod error;
pub mod puzzle;
pub mod pyramid;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{DuplicateScope, PuzzleConfig, Shape};
pub use error::{PyramidError, Result};
pub use puzzle::{Puzzle, Snapshot};
pub use pyramid::{Cell, CellCoord, CellStatus, Pyramid, UniqueScore};

/// Puzzle defaults
pub mod consts {
    /// Width of the classic top row
    pub const DEFAULT_TOP_SIZE: usize = 5;
    /// Largest value on the classic number palette
    pub const DEFAULT_MAX_VALUE: u32 = 15;
    /// Widest top row (or grid side) a config may ask for
    pub const MAX_TOP_SIZE: usize = 64;
    /// Upper bound for the 5x5 grid variant (needs room for 25 distinct inputs)
    pub const GRID_MAX_VALUE: u32 = 99;
}
