//! Difference pyramid engine
//!
//! Pure, synchronous and free of presentation concerns:
//! - The top layer is the only input
//! - Every lower layer is re-derived in full on each write
//! - Validation findings are reported, never enforced

pub mod cascade;
pub mod cell;
pub mod grid;
pub mod model;
pub mod validate;

pub use cascade::{Cascade, LinearCascade, cascade_for, derive_all};
pub use cell::{Cell, CellCoord, LayerSize};
pub use grid::GridCascade;
pub use model::Pyramid;
pub use validate::{
    CellStatus, UniqueScore, ValidationReport, find_duplicates, find_invalid, is_solved,
    unique_difference_count, unique_score,
};
