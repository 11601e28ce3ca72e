use crate::error::{GridpadError, Result};
use crate::history::{ColumnEdit, History, MAX_UNDO_STACK, Snapshot};
use crate::storage::CsvOptions;
use gridpad_engine::GridError;
use gridpad_engine::engine::{
    Cell, CellRef, DEFAULT_COLS, DEFAULT_ROWS, FormatPainter, Grid, GridStats, Selection, View,
    ViewState, derive_view,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Construction settings for a [`Document`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentOptions {
    pub rows: usize,
    pub cols: usize,
    /// `None` keeps every undo snapshot.
    pub history_limit: Option<usize>,
    pub csv: CsvOptions,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        DocumentOptions {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            history_limit: Some(MAX_UNDO_STACK),
            csv: CsvOptions::default(),
        }
    }
}

/// UI-agnostic editor state.
///
/// Every grid mutation goes through this type: it snapshots the grid for undo, applies the
/// change, re-derives the [`View`] and brings the [`Selection`] back in bounds. Positions
/// passed in are displayed coordinates unless a method says otherwise.
pub struct Document {
    pub(crate) grid: Grid,
    pub(crate) history: History<Snapshot>,
    pub(crate) view_state: ViewState,
    pub(crate) view: View,
    pub(crate) selection: Selection,
    pub(crate) painter: FormatPainter,
    pub(crate) csv_options: CsvOptions,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the grid has been modified since the last load or save
    pub modified: bool,
}

impl Document {
    /// Create a new document with the default 10 x 5 grid.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    pub fn with_options(options: DocumentOptions) -> Self {
        let grid = Grid::new(options.rows, options.cols);
        let view_state = ViewState::new();
        let view = derive_view(&grid, &view_state);
        Document {
            grid,
            history: History::with_limit(options.history_limit),
            view_state,
            view,
            selection: Selection::new(),
            painter: FormatPainter::new(),
            csv_options: options.csv,
            file_path: None,
            modified: false,
        }
    }

    /// Create a document and load `path` if it exists. A missing file only sets the path.
    pub fn with_file(path: Option<&Path>, options: DocumentOptions) -> Result<Self> {
        let mut doc = Self::with_options(options);
        if let Some(p) = path {
            if p.exists() {
                doc.load_file(p)?;
            } else {
                doc.file_path = Some(p.to_path_buf());
            }
        }
        Ok(doc)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn painter(&self) -> &FormatPainter {
        &self.painter
    }

    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    pub fn csv_options(&self) -> CsvOptions {
        self.csv_options
    }

    pub fn set_csv_options(&mut self, options: CsvOptions) {
        self.csv_options = options;
    }

    pub fn display_cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.view.cell(&self.grid, row, col)
    }

    pub fn display_value(&self, row: usize, col: usize) -> Option<&str> {
        self.display_cell(row, col).map(|c| c.value.as_str())
    }

    pub fn display_column_name(&self, col: usize) -> Option<&str> {
        self.view
            .canonical_col(col)
            .and_then(|c| self.grid.column_name(c))
    }

    pub fn stats(&self) -> GridStats {
        self.grid.stats()
    }

    /// Translate a displayed position, failing with `OutOfBounds` when it is not shown.
    pub(crate) fn canonical(&self, pos: CellRef) -> Result<CellRef> {
        self.view
            .to_canonical(pos)
            .ok_or(GridpadError::Grid(GridError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            }))
    }

    pub(crate) fn canonical_row(&self, row: usize) -> Result<usize> {
        self.view
            .canonical_row(row)
            .ok_or(GridpadError::Grid(GridError::OutOfBounds { row, col: 0 }))
    }

    pub(crate) fn canonical_col(&self, col: usize) -> Result<usize> {
        self.view
            .canonical_col(col)
            .ok_or(GridpadError::Grid(GridError::OutOfBounds { row: 0, col }))
    }

    /// Re-derive the view and clamp the selection into it.
    pub(crate) fn refresh(&mut self) {
        self.view = derive_view(&self.grid, &self.view_state);
        self.selection
            .revalidate(self.view.row_count(), self.view.col_count());
    }

    /// After a filter/sort/visibility change the displayed cells under a range are no
    /// longer the ones the user picked, so the range goes.
    pub(crate) fn refresh_after_view_change(&mut self) {
        self.selection.clear_range();
        self.refresh();
    }

    /// Run a grid mutation under the history protocol.
    ///
    /// The pre-mutation grid is committed only when `f` succeeds and the grid actually
    /// changed. `ShapeViolation` is a refused no-op (`Ok(false)`); other errors restore
    /// the snapshot and propagate.
    pub(crate) fn mutate<F>(&mut self, label: &'static str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Grid) -> gridpad_engine::Result<()>,
    {
        self.mutate_columns(label, |g| f(g).map(|()| ColumnEdit::None))
    }

    /// Like [`mutate`](Self::mutate) for edits that move columns. The returned
    /// [`ColumnEdit`] is applied to the view state and stored with the snapshot.
    pub(crate) fn mutate_columns<F>(&mut self, label: &'static str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Grid) -> gridpad_engine::Result<ColumnEdit>,
    {
        let snapshot = self.grid.clone();
        match f(&mut self.grid) {
            Ok(columns) => {
                if self.grid == snapshot {
                    return Ok(false);
                }
                self.apply_column_edit(&columns);
                self.history.commit(Snapshot {
                    grid: snapshot,
                    columns,
                });
                self.modified = true;
                self.refresh();
                debug!(
                    op = label,
                    rows = self.grid.row_count(),
                    cols = self.grid.col_count(),
                    "grid mutated"
                );
                Ok(true)
            }
            Err(GridError::ShapeViolation(what)) => {
                self.grid = snapshot;
                debug!(op = label, "refused to remove the last {what}");
                Ok(false)
            }
            Err(err) => {
                self.grid = snapshot;
                Err(err.into())
            }
        }
    }

    /// Shift the view state the way `columns` moved the grid.
    pub(crate) fn apply_column_edit(&mut self, columns: &ColumnEdit) {
        match columns {
            ColumnEdit::None => {}
            ColumnEdit::Inserted(at) => self.view_state.on_column_inserted(*at),
            ColumnEdit::Deleted { at, .. } => self.view_state.on_column_deleted(*at),
            ColumnEdit::Replaced(state) => self.view_state = state.clone(),
        }
    }

    /// Shift the view state back across `columns`.
    pub(crate) fn revert_column_edit(&mut self, columns: &ColumnEdit) {
        match columns {
            ColumnEdit::None => {}
            ColumnEdit::Inserted(at) => self.view_state.on_column_deleted(*at),
            ColumnEdit::Deleted { at, settings } => {
                self.view_state.on_column_inserted(*at);
                self.view_state.restore_column(*at, settings.clone());
            }
            ColumnEdit::Replaced(state) => self.view_state = state.clone(),
        }
    }

    /// Swap in a whole new grid as one undoable change.
    pub(crate) fn replace_grid(&mut self, grid: Grid) {
        let previous = std::mem::replace(&mut self.grid, grid);
        self.history.commit(Snapshot {
            grid: previous,
            columns: ColumnEdit::Replaced(self.view_state.clone()),
        });
        self.view_state.fit_to(self.grid.col_count());
        self.refresh_after_view_change();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
