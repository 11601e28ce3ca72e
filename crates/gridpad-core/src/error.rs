//! Error types for Gridpad core.

use gridpad_engine::GridError;
use thiserror::Error;

/// Errors that can occur in the Gridpad application
#[derive(Error, Debug)]
pub enum GridpadError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Malformed CSV at line {line}: {message}")]
    MalformedInput { line: usize, message: String },

    #[error("CSV file is empty")]
    EmptyCsv,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No file path set")]
    NoFilePath,

    #[error("No format copied")]
    NothingToPaint,
}

pub type Result<T> = std::result::Result<T, GridpadError>;
