//! gridpad-core - UI-agnostic document model, history + storage.

pub mod document;
pub mod error;
pub mod history;
pub mod storage;

pub use document::{Document, DocumentOptions};
pub use error::{GridpadError, Result};
pub use history::History;

pub use gridpad_engine::engine::CellRef;
