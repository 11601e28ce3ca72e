//! gridpad-engine - cells, formats, selection and the view pipeline.

pub mod engine;
pub mod error;

pub use engine::{Cell, CellRef, Grid};
pub use error::{GridError, Result};
