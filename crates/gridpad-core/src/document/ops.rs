use super::Document;
use crate::error::{GridpadError, Result};
use crate::history::{ColumnEdit, Snapshot};
use gridpad_engine::GridError;
use gridpad_engine::engine::{CellRef, ColorKey, FormatAttr, Grid, Nav, ToggleAttr};
use tracing::debug;

impl Document {
    /// Replace the value at a displayed position, keeping its format.
    pub fn set_value(&mut self, pos: CellRef, value: &str) -> Result<bool> {
        let at = self.canonical(pos)?;
        self.mutate("set_value", |g| g.set_cell_value(at.row, at.col, value))
    }

    pub fn toggle_format(&mut self, pos: CellRef, attr: ToggleAttr) -> Result<bool> {
        let at = self.canonical(pos)?;
        let attr = FormatAttr::from(attr);
        self.mutate("toggle_format", |g| g.set_cell_format(at.row, at.col, &attr))
    }

    pub fn set_color(&mut self, pos: CellRef, key: ColorKey, token: &str) -> Result<bool> {
        let at = self.canonical(pos)?;
        let attr = match key {
            ColorKey::Text => FormatAttr::Color(token.to_string()),
            ColorKey::Background => FormatAttr::Background(token.to_string()),
        };
        self.mutate("set_color", |g| g.set_cell_format(at.row, at.col, &attr))
    }

    pub fn clear_format(&mut self, pos: CellRef) -> Result<bool> {
        let at = self.canonical(pos)?;
        self.mutate("clear_format", |g| {
            g.replace_cell_format(at.row, at.col, Default::default())
        })
    }

    /// Canonical positions of every displayed cell the selection covers.
    fn selected_cells(&self) -> Vec<CellRef> {
        self.selection
            .target()
            .map(|rect| {
                rect.cells()
                    .filter_map(|p| self.view.to_canonical(p))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Set a boolean attribute across the selection to the opposite of the active cell's
    /// current state, so mixed ranges become uniform.
    pub fn format_selection(&mut self, attr: ToggleAttr) -> Result<bool> {
        let cells = self.selected_cells();
        let Some(first) = cells.first() else {
            return Ok(false);
        };
        let lead = self
            .selection
            .active
            .and_then(|a| self.view.to_canonical(a))
            .unwrap_or(*first);
        let target = !self.grid.cell(lead.row, lead.col)?.format.flag(attr);
        self.mutate("format_selection", |g| {
            for p in &cells {
                let mut format = g.cell(p.row, p.col)?.format.clone();
                format.set_flag(attr, target);
                g.replace_cell_format(p.row, p.col, format)?;
            }
            Ok(())
        })
    }

    /// Set a color token on every selected cell.
    pub fn color_selection(&mut self, key: ColorKey, token: &str) -> Result<bool> {
        let cells = self.selected_cells();
        self.mutate("color_selection", |g| {
            for p in &cells {
                let mut format = g.cell(p.row, p.col)?.format.clone();
                format.set_color(key, token);
                g.replace_cell_format(p.row, p.col, format)?;
            }
            Ok(())
        })
    }

    /// Reset the format of every selected cell.
    pub fn clear_selection_format(&mut self) -> Result<bool> {
        let cells = self.selected_cells();
        self.mutate("clear_selection_format", |g| {
            for p in &cells {
                g.replace_cell_format(p.row, p.col, Default::default())?;
            }
            Ok(())
        })
    }

    /// Blank the values of every selected cell.
    pub fn clear_selection_values(&mut self) -> Result<bool> {
        let cells = self.selected_cells();
        self.mutate("clear_values", |g| {
            for p in &cells {
                g.set_cell_value(p.row, p.col, "")?;
            }
            Ok(())
        })
    }

    /// Load the format painter from a displayed cell.
    pub fn copy_format(&mut self, pos: CellRef) -> Result<()> {
        let at = self.canonical(pos)?;
        let cell = self.grid.cell(at.row, at.col)?;
        self.painter.copy(cell);
        Ok(())
    }

    /// Apply the captured format to a displayed cell, consuming it.
    pub fn paint_format(&mut self, pos: CellRef) -> Result<bool> {
        if !self.painter.is_active() {
            return Err(GridpadError::NothingToPaint);
        }
        let at = self.canonical(pos)?;
        let target = self.grid.cell(at.row, at.col)?.clone();
        let Some(painted) = self.painter.apply(&target) else {
            return Err(GridpadError::NothingToPaint);
        };
        self.mutate("paint_format", |g| {
            g.replace_cell_format(at.row, at.col, painted.format)
        })
    }

    pub fn cancel_paint(&mut self) {
        self.painter.cancel();
    }

    /// Insert a blank row before displayed row `at`. `None` (or the displayed row count)
    /// appends after the last canonical row.
    pub fn insert_row(&mut self, at: Option<usize>) -> Result<bool> {
        let canonical = match at {
            Some(row) if row < self.view.row_count() => Some(self.canonical_row(row)?),
            Some(row) if row > self.view.row_count() => {
                return Err(GridError::OutOfBounds { row, col: 0 }.into());
            }
            _ => None,
        };
        self.mutate("insert_row", |g| g.insert_row(canonical).map(|_| ()))
    }

    pub fn delete_row(&mut self, row: usize) -> Result<bool> {
        let canonical = self.canonical_row(row)?;
        self.mutate("delete_row", |g| g.delete_row(canonical))
    }

    pub fn duplicate_row(&mut self, row: usize) -> Result<bool> {
        let canonical = self.canonical_row(row)?;
        self.mutate("duplicate_row", |g| g.duplicate_row(canonical).map(|_| ()))
    }

    pub fn delete_last_row(&mut self) -> Result<bool> {
        let last = self.grid.row_count() - 1;
        self.mutate("delete_last_row", |g| g.delete_row(last))
    }

    /// Insert a blank column before displayed column `at`. `None` appends.
    pub fn insert_column(&mut self, at: Option<usize>) -> Result<bool> {
        let canonical = match at {
            Some(col) if col < self.view.col_count() => Some(self.canonical_col(col)?),
            Some(col) if col > self.view.col_count() => {
                return Err(GridError::OutOfBounds { row: 0, col }.into());
            }
            _ => None,
        };
        self.mutate_columns("insert_column", |g| {
            g.insert_column(canonical).map(ColumnEdit::Inserted)
        })
    }

    pub fn delete_column(&mut self, col: usize) -> Result<bool> {
        let canonical = self.canonical_col(col)?;
        self.remove_column(canonical)
    }

    pub fn delete_last_column(&mut self) -> Result<bool> {
        let last = self.grid.col_count() - 1;
        self.remove_column(last)
    }

    fn remove_column(&mut self, canonical: usize) -> Result<bool> {
        let settings = self.view_state.column_settings(canonical);
        self.mutate_columns("delete_column", |g| {
            g.delete_column(canonical).map(|()| ColumnEdit::Deleted {
                at: canonical,
                settings,
            })
        })
    }

    /// Rename a canonical column.
    pub fn rename_column(&mut self, col: usize, name: &str) -> Result<bool> {
        self.mutate("rename_column", |g| g.rename_column(col, name))
    }

    /// Blank every cell. Callers confirm first.
    pub fn clear_all(&mut self) -> Result<bool> {
        self.mutate("clear_all", |g| {
            g.clear_all();
            Ok(())
        })
    }

    fn check_column(&self, col: usize) -> Result<()> {
        if col < self.grid.col_count() {
            Ok(())
        } else {
            Err(GridError::OutOfBounds { row: 0, col }.into())
        }
    }

    pub fn set_filter(&mut self, text: &str) {
        if self.view_state.filter != text {
            self.view_state.set_filter(text);
            self.refresh_after_view_change();
        }
    }

    /// Filter a canonical column. An empty pattern removes the filter.
    pub fn set_column_filter(&mut self, col: usize, pattern: &str) -> Result<()> {
        self.check_column(col)?;
        self.view_state.set_column_filter(col, pattern);
        self.refresh_after_view_change();
        Ok(())
    }

    /// Sort by a canonical column, flipping the direction if it is already the sort key.
    pub fn toggle_sort(&mut self, col: usize) -> Result<()> {
        self.check_column(col)?;
        self.view_state.toggle_sort(col);
        debug!(sort = ?self.view_state.sort, "sort changed");
        self.refresh_after_view_change();
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        if self.view_state.sort.take().is_some() {
            self.refresh_after_view_change();
        }
    }

    /// Hide or show a canonical column. Returns true when it is now hidden.
    pub fn toggle_hidden(&mut self, col: usize) -> Result<bool> {
        self.check_column(col)?;
        let hidden = self.view_state.toggle_hidden(col);
        self.refresh_after_view_change();
        Ok(hidden)
    }

    pub fn clear_filters(&mut self) {
        self.view_state.clear_filters();
        self.refresh_after_view_change();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let Some(columns) = self.history.peek_undo().map(|s| s.columns.clone()) else {
            return false;
        };
        let parked = match columns {
            ColumnEdit::Replaced(_) => ColumnEdit::Replaced(self.view_state.clone()),
            other => other,
        };
        let current = self.take_grid(parked);
        let (previous, changed) = self.history.undo(current);
        self.grid = previous.grid;
        self.revert_column_edit(&previous.columns);
        self.after_history_move();
        changed
    }

    pub fn redo(&mut self) -> bool {
        let Some(columns) = self.history.peek_redo().map(|s| s.columns.clone()) else {
            return false;
        };
        // The column is about to be deleted again; its settings may have changed since.
        let parked = match columns {
            ColumnEdit::Deleted { at, .. } => ColumnEdit::Deleted {
                at,
                settings: self.view_state.column_settings(at),
            },
            ColumnEdit::Replaced(_) => ColumnEdit::Replaced(self.view_state.clone()),
            other => other,
        };
        let current = self.take_grid(parked);
        let (next, changed) = self.history.redo(current);
        self.grid = next.grid;
        self.apply_column_edit(&next.columns);
        self.after_history_move();
        changed
    }

    fn take_grid(&mut self, columns: ColumnEdit) -> Snapshot {
        Snapshot {
            grid: std::mem::replace(&mut self.grid, Grid::new(1, 1)),
            columns,
        }
    }

    fn after_history_move(&mut self) {
        self.modified = true;
        self.refresh();
    }

    fn in_view(&self, pos: CellRef) -> bool {
        pos.row < self.view.row_count() && pos.col < self.view.col_count()
    }

    pub fn begin_select(&mut self, pos: CellRef) {
        if self.in_view(pos) {
            self.selection.begin_select(pos);
        }
    }

    pub fn extend_select(&mut self, pos: CellRef) {
        if self.in_view(pos) {
            self.selection.extend_select(pos);
        }
    }

    pub fn release_select(&mut self) {
        self.selection.release();
    }

    pub fn set_active(&mut self, pos: CellRef) {
        if self.in_view(pos) {
            self.selection.set_active(pos);
        }
    }

    pub fn clear_selection_range(&mut self) {
        self.selection.clear_range();
    }

    pub fn navigate(&mut self, nav: Nav) {
        self.selection
            .navigate(nav, self.view.row_count(), self.view.col_count());
    }
}
