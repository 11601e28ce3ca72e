//! Grid engine API.
//!
//! - [`Cell`], [`Format`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`], [`CellRect`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`FormatPainter`], [`Palette`] - Attribute edits and format copying
//! - [`Selection`] - Active cell and range state machine
//! - [`derive_view`] - Filter/sort/hide pipeline producing a [`View`]

mod cell;
mod cell_ref;
mod format;
mod grid;
mod selection;
mod view;

pub use cell::{Cell, ColorKey, Format, FormatAttr, ToggleAttr};
pub use cell_ref::{CellRect, CellRef, letters_to_col};
pub use format::{
    ColorToken, FormatPainter, PaintState, Palette, apply_attr, clear_format, set_color_attribute,
    toggle_attribute,
};
pub use grid::{DEFAULT_COLS, DEFAULT_ROWS, Dimension, Grid, GridStats};
pub use selection::{Nav, Phase, Range, Selection};
pub use view::{ColumnSettings, SortConfig, SortDirection, View, ViewState, derive_view};
