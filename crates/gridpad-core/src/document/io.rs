use super::Document;
use crate::error::{GridpadError, Result};
use crate::storage::csv::{decode_with, encode_with, read_csv, write_csv};
use std::path::{Path, PathBuf};
use tracing::info;

impl Document {
    /// Replace the grid with a CSV file's contents as a fresh session: history is cleared
    /// and the document points at `path`.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let grid = read_csv(path, &self.csv_options)?;
        self.replace_grid(grid);
        self.history.clear();
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Import a CSV file as an undoable replacement of the grid.
    pub fn import_csv(&mut self, path: &Path) -> Result<()> {
        let grid = read_csv(path, &self.csv_options)?;
        self.replace_grid(grid);
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Replace the grid with decoded CSV text. Undoable.
    pub fn load_csv_text(&mut self, text: &str) -> Result<()> {
        let grid = decode_with(text, &self.csv_options)?;
        self.replace_grid(grid);
        self.modified = true;
        Ok(())
    }

    /// Write the whole canonical grid to `path` and remember it as the document's file.
    pub fn export_csv(&mut self, path: &Path) -> Result<()> {
        write_csv(path, &self.grid, &self.csv_options)?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(GridpadError::NoFilePath);
        };
        self.export_csv(&path)?;
        Ok(path)
    }

    /// CSV text of what is currently displayed (filtered, sorted, hidden columns removed).
    /// Empty when no row is displayed.
    pub fn view_csv_text(&self) -> String {
        self.view
            .materialize(&self.grid)
            .map(|g| encode_with(&g, &self.csv_options))
            .unwrap_or_default()
    }

    /// Write the displayed grid to `path`. The document's own file is unchanged.
    pub fn export_view_csv(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.view_csv_text())?;
        info!(
            path = %path.display(),
            rows = self.view.row_count(),
            cols = self.view.col_count(),
            "exported view"
        );
        Ok(())
    }
}
