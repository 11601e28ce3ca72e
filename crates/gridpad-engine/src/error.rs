//! Error types for the grid engine.

use thiserror::Error;

/// Errors raised by grid mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },

    /// The grid must keep at least one row and one column.
    #[error("Cannot delete the last {0}")]
    ShapeViolation(&'static str),
}

pub type Result<T> = std::result::Result<T, GridError>;
