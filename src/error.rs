//! Error types for pyramid operations
//!
//! Only structural problems are errors. Duplicates and derived zeros are
//! validation findings and never surface here.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, PyramidError>;

/// Errors returned at the engine call boundary
#[derive(Debug, Error)]
pub enum PyramidError {
    /// A layer, index, row or column that does not exist in the current geometry
    #[error("{what} {index} out of range (limit {limit})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    /// A proposed top-row value that is not an integer in [1, max]
    #[error("invalid value {value}: expected an integer in 1..={max}")]
    InvalidValue { value: f64, max: u32 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PyramidError {
    pub(crate) fn out_of_range(what: &'static str, index: usize, limit: usize) -> Self {
        Self::OutOfRange { what, index, limit }
    }

    /// True for errors caused by a bad coordinate
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// True for errors caused by a bad input value
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, Self::InvalidValue { .. })
    }
}
