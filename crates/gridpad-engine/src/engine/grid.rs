//! Dense grid storage and structural edits.
//!
//! A [`Grid`] is a rectangle of [`Cell`]s with a parallel list of column display names.
//! It always holds at least one row and one column, every row has the same width, and
//! `column_names.len()` equals that width. All coordinates are canonical (unsorted,
//! unfiltered) indices.

use super::cell::{Cell, Format, FormatAttr};
use super::cell_ref::{CellRect, CellRef, letters_to_col};
use super::format::apply_attr;
use crate::error::{GridError, Result};

pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLS: usize = 5;

/// Dimension for row/column operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dimension {
    Row,
    Column,
}

impl Dimension {
    fn name(&self) -> &'static str {
        match self {
            Dimension::Row => "row",
            Dimension::Column => "column",
        }
    }
}

/// Filled/total cell counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridStats {
    pub total: usize,
    pub filled: usize,
}

impl GridStats {
    /// Filled share rounded to a whole percent.
    pub fn percentage(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            (self.filled * 100 + self.total / 2) / self.total
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    column_names: Vec<String>,
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

fn blank_row(width: usize) -> Vec<Cell> {
    // One allocation per cell; never a shared default instance.
    (0..width).map(|_| Cell::new_empty()).collect()
}

fn default_names(width: usize) -> Vec<String> {
    (0..width).map(CellRef::col_to_letters).collect()
}

impl Grid {
    /// Blank grid. Zero sizes are raised to one.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Grid {
            rows: (0..rows).map(|_| blank_row(cols)).collect(),
            column_names: default_names(cols),
        }
    }

    /// Build a grid from row values, padding short rows with blank cells up to the widest
    /// row. Returns the grid and how many rows were padded.
    pub fn from_rows(values: Vec<Vec<String>>) -> (Self, usize) {
        let width = values.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let mut padded = 0;
        let mut rows: Vec<Vec<Cell>> = values
            .into_iter()
            .map(|row| {
                if row.len() < width {
                    padded += 1;
                }
                let mut cells: Vec<Cell> = row.iter().map(|v| Cell::new_text(v)).collect();
                cells.resize_with(width, Cell::new_empty);
                cells
            })
            .collect();
        if rows.is_empty() {
            rows.push(blank_row(width));
        }
        (
            Grid {
                rows,
                column_names: default_names(width),
            },
            padded,
        )
    }

    /// Assemble a grid from cells and names. `None` unless the shape is a non-empty
    /// rectangle whose width matches `column_names`.
    pub fn from_parts(rows: Vec<Vec<Cell>>, column_names: Vec<String>) -> Option<Self> {
        let width = column_names.len();
        if rows.is_empty() || width == 0 || rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(Grid { rows, column_names })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.column_names.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn column_name(&self, col: usize) -> Option<&str> {
        self.column_names.get(col).map(String::as_str)
    }

    /// Resolve a user-supplied column key: an exact (case-insensitive) column name wins,
    /// otherwise the key is read as column letters.
    pub fn find_column(&self, key: &str) -> Option<usize> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        self.column_names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(key))
            .or_else(|| letters_to_col(key).filter(|&col| col < self.col_count()))
    }

    /// Values of one row, in column order.
    pub fn row_values(&self, row: usize) -> Option<Vec<&str>> {
        self.rows
            .get(row)
            .map(|cells| cells.iter().map(|c| c.value.as_str()).collect())
    }

    fn check(&self, row: usize, col: usize) -> Result<()> {
        if row < self.row_count() && col < self.col_count() {
            Ok(())
        } else {
            Err(GridError::OutOfBounds { row, col })
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&Cell> {
        self.check(row, col)?;
        Ok(&self.rows[row][col])
    }

    pub fn get(&self, pos: CellRef) -> Option<&Cell> {
        self.rows.get(pos.row).and_then(|r| r.get(pos.col))
    }

    /// Replace a cell's value, keeping its format.
    pub fn set_cell_value(&mut self, row: usize, col: usize, value: &str) -> Result<()> {
        self.check(row, col)?;
        self.rows[row][col].value = value.to_string();
        Ok(())
    }

    /// Merge one attribute into a cell's format.
    pub fn set_cell_format(&mut self, row: usize, col: usize, attr: &FormatAttr) -> Result<()> {
        self.check(row, col)?;
        let updated = apply_attr(&self.rows[row][col], attr);
        self.rows[row][col] = updated;
        Ok(())
    }

    /// Overwrite a cell's whole format.
    pub fn replace_cell_format(&mut self, row: usize, col: usize, format: Format) -> Result<()> {
        self.check(row, col)?;
        self.rows[row][col].format = format;
        Ok(())
    }

    /// Replace a cell outright.
    pub fn replace_cell(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        self.check(row, col)?;
        self.rows[row][col] = cell;
        Ok(())
    }

    /// Insert a blank row or column before `at` (`None` appends).
    pub fn insert(&mut self, dim: Dimension, at: Option<usize>) -> Result<usize> {
        match dim {
            Dimension::Row => {
                let at = at.unwrap_or(self.row_count());
                if at > self.row_count() {
                    return Err(GridError::OutOfBounds { row: at, col: 0 });
                }
                self.rows.insert(at, blank_row(self.col_count()));
                Ok(at)
            }
            Dimension::Column => {
                let at = at.unwrap_or(self.col_count());
                if at > self.col_count() {
                    return Err(GridError::OutOfBounds { row: 0, col: at });
                }
                for row in &mut self.rows {
                    row.insert(at, Cell::new_empty());
                }
                let name = self.next_column_name();
                self.column_names.insert(at, name);
                Ok(at)
            }
        }
    }

    /// Delete a row or column. Refuses to remove the last one.
    pub fn delete(&mut self, dim: Dimension, at: usize) -> Result<()> {
        let (count, oob) = match dim {
            Dimension::Row => (self.row_count(), GridError::OutOfBounds { row: at, col: 0 }),
            Dimension::Column => (self.col_count(), GridError::OutOfBounds { row: 0, col: at }),
        };
        if at >= count {
            return Err(oob);
        }
        if count == 1 {
            return Err(GridError::ShapeViolation(dim.name()));
        }
        match dim {
            Dimension::Row => {
                self.rows.remove(at);
            }
            Dimension::Column => {
                for row in &mut self.rows {
                    row.remove(at);
                }
                self.column_names.remove(at);
            }
        }
        Ok(())
    }

    pub fn insert_row(&mut self, at: Option<usize>) -> Result<usize> {
        self.insert(Dimension::Row, at)
    }

    pub fn delete_row(&mut self, index: usize) -> Result<()> {
        self.delete(Dimension::Row, index)
    }

    pub fn insert_column(&mut self, at: Option<usize>) -> Result<usize> {
        self.insert(Dimension::Column, at)
    }

    pub fn delete_column(&mut self, index: usize) -> Result<()> {
        self.delete(Dimension::Column, index)
    }

    /// Insert a deep copy of `row[index]` right after it.
    pub fn duplicate_row(&mut self, index: usize) -> Result<usize> {
        let copy = self
            .rows
            .get(index)
            .cloned()
            .ok_or(GridError::OutOfBounds { row: index, col: 0 })?;
        self.rows.insert(index + 1, copy);
        Ok(index + 1)
    }

    pub fn rename_column(&mut self, col: usize, name: &str) -> Result<()> {
        let slot = self
            .column_names
            .get_mut(col)
            .ok_or(GridError::OutOfBounds { row: 0, col })?;
        *slot = name.to_string();
        Ok(())
    }

    /// Blank every value and format, keeping shape and column names.
    pub fn clear_all(&mut self) {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                *cell = Cell::new_empty();
            }
        }
    }

    /// Blank the values inside `rect`, keeping formats.
    pub fn clear_range(&mut self, rect: CellRect) -> Result<()> {
        self.check(rect.bottom, rect.right)?;
        for pos in rect.cells() {
            self.rows[pos.row][pos.col].value.clear();
        }
        Ok(())
    }

    /// Replace every column name.
    pub fn set_column_names(&mut self, names: Vec<String>) -> Result<()> {
        if names.len() != self.col_count() {
            return Err(GridError::OutOfBounds {
                row: 0,
                col: names.len(),
            });
        }
        self.column_names = names;
        Ok(())
    }

    pub fn stats(&self) -> GridStats {
        let filled = self
            .rows
            .iter()
            .flat_map(|r| r.iter())
            .filter(|c| c.is_filled())
            .count();
        GridStats {
            total: self.row_count() * self.col_count(),
            filled,
        }
    }

    /// First letter label not already used as a column name.
    fn next_column_name(&self) -> String {
        (self.col_count()..)
            .map(CellRef::col_to_letters)
            .find(|name| !self.column_names.iter().any(|n| n == name))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cell::ToggleAttr;
    use pretty_assertions::assert_eq;

    fn values(grid: &Grid) -> Vec<Vec<String>> {
        grid.rows()
            .iter()
            .map(|r| r.iter().map(|c| c.value.clone()).collect())
            .collect()
    }

    #[test]
    fn test_default_shape() {
        let grid = Grid::default();
        assert_eq!(grid.row_count(), 10);
        assert_eq!(grid.col_count(), 5);
        assert_eq!(grid.column_names(), &["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_set_value_keeps_format() {
        let mut grid = Grid::new(2, 2);
        grid.set_cell_format(0, 1, &FormatAttr::Bold).unwrap();
        grid.set_cell_value(0, 1, "x").unwrap();
        let cell = grid.cell(0, 1).unwrap();
        assert_eq!(cell.value, "x");
        assert!(cell.format.is_bold());
    }

    #[test]
    fn test_set_value_out_of_bounds() {
        let mut grid = Grid::new(2, 2);
        assert_eq!(
            grid.set_cell_value(2, 0, "x"),
            Err(GridError::OutOfBounds { row: 2, col: 0 })
        );
        assert_eq!(
            grid.set_cell_value(0, 5, "x"),
            Err(GridError::OutOfBounds { row: 0, col: 5 })
        );
    }

    #[test]
    fn test_set_format_toggles() {
        let mut grid = Grid::new(1, 1);
        grid.set_cell_format(0, 0, &ToggleAttr::Italic.into()).unwrap();
        assert!(grid.cell(0, 0).unwrap().format.is_italic());
        grid.set_cell_format(0, 0, &FormatAttr::Italic).unwrap();
        assert!(!grid.cell(0, 0).unwrap().format.is_italic());
    }

    #[test]
    fn test_insert_row_defaults_to_end() {
        let mut grid = Grid::new(2, 3);
        grid.set_cell_value(1, 0, "last").unwrap();
        assert_eq!(grid.insert_row(None).unwrap(), 2);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.cell(1, 0).unwrap().value, "last");
        assert_eq!(grid.rows()[2].len(), 3);

        grid.insert_row(Some(0)).unwrap();
        assert_eq!(grid.cell(2, 0).unwrap().value, "last");
        assert!(grid.insert_row(Some(9)).is_err());
    }

    #[test]
    fn test_delete_row_keeps_one() {
        let mut grid = Grid::new(1, 2);
        assert_eq!(grid.delete_row(0), Err(GridError::ShapeViolation("row")));
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn test_delete_column_keeps_names_in_lockstep() {
        let mut grid = Grid::new(2, 3);
        grid.set_cell_value(0, 2, "c").unwrap();
        grid.delete_column(1).unwrap();
        assert_eq!(grid.column_names(), &["A", "C"]);
        assert_eq!(grid.cell(0, 1).unwrap().value, "c");
        assert_eq!(grid.delete_column(5), Err(GridError::OutOfBounds { row: 0, col: 5 }));
    }

    #[test]
    fn test_delete_last_column_is_refused() {
        let mut grid = Grid::new(3, 1);
        assert_eq!(grid.delete_column(0), Err(GridError::ShapeViolation("column")));
        assert_eq!(grid.col_count(), 1);
    }

    #[test]
    fn test_insert_column_names_new_column() {
        let mut grid = Grid::new(1, 2);
        grid.insert_column(Some(1)).unwrap();
        assert_eq!(grid.column_names(), &["A", "C", "B"]);
        grid.insert_column(None).unwrap();
        assert_eq!(grid.column_names(), &["A", "C", "B", "D"]);
        assert!(grid.rows().iter().all(|r| r.len() == 4));
    }

    #[test]
    fn test_duplicate_row_is_deep() {
        let mut grid = Grid::new(2, 2);
        grid.set_cell_value(0, 0, "orig").unwrap();
        grid.set_cell_format(0, 0, &FormatAttr::Bold).unwrap();
        assert_eq!(grid.duplicate_row(0).unwrap(), 1);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.cell(1, 0).unwrap(), grid.cell(0, 0).unwrap());

        grid.set_cell_format(1, 0, &FormatAttr::Bold).unwrap();
        assert!(grid.cell(0, 0).unwrap().format.is_bold());
        assert!(!grid.cell(1, 0).unwrap().format.is_bold());
        assert!(grid.duplicate_row(7).is_err());
    }

    #[test]
    fn test_new_cells_do_not_share_format() {
        let mut grid = Grid::new(3, 3);
        grid.set_cell_format(1, 1, &FormatAttr::Color("#ef4444".into()))
            .unwrap();
        let colored = grid
            .rows()
            .iter()
            .flatten()
            .filter(|c| c.format.color.is_some())
            .count();
        assert_eq!(colored, 1);
    }

    #[test]
    fn test_clear_all_preserves_shape() {
        let mut grid = Grid::new(2, 2);
        grid.set_cell_value(0, 0, "a").unwrap();
        grid.set_cell_format(1, 1, &FormatAttr::Bold).unwrap();
        grid.rename_column(0, "Job").unwrap();
        grid.clear_all();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.col_count(), 2);
        assert_eq!(grid.column_names(), &["Job", "B"]);
        assert!(grid.rows().iter().flatten().all(|c| *c == Cell::new_empty()));
    }

    #[test]
    fn test_clear_range_blanks_values_only() {
        let mut grid = Grid::from_rows(vec![
            vec!["a".into(), "b".into()],
            vec!["c".into(), "d".into()],
        ])
        .0;
        grid.set_cell_format(0, 0, &FormatAttr::Bold).unwrap();
        let rect = CellRect::from_corners(CellRef::new(0, 0), CellRef::new(1, 0));
        grid.clear_range(rect).unwrap();
        assert_eq!(values(&grid), vec![vec!["", "b"], vec!["", "d"]]);
        assert!(grid.cell(0, 0).unwrap().format.is_bold());
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let (grid, padded) = Grid::from_rows(vec![
            vec!["a".into()],
            vec!["b".into(), "c".into(), "d".into()],
        ]);
        assert_eq!(padded, 1);
        assert_eq!(values(&grid), vec![vec!["a", "", ""], vec!["b", "c", "d"]]);
        assert_eq!(grid.column_names(), &["A", "B", "C"]);
    }

    #[test]
    fn test_from_rows_empty_is_one_cell() {
        let (grid, _) = Grid::from_rows(Vec::new());
        assert_eq!((grid.row_count(), grid.col_count()), (1, 1));
    }

    #[test]
    fn test_stats() {
        let mut grid = Grid::new(2, 2);
        grid.set_cell_value(0, 0, "x").unwrap();
        grid.set_cell_value(1, 1, "  ").unwrap();
        let stats = grid.stats();
        assert_eq!(stats, GridStats { total: 4, filled: 1 });
        assert_eq!(stats.percentage(), 25);
    }

    #[test]
    fn test_from_parts_checks_shape() {
        let names = vec!["x".to_string(), "y".to_string()];
        assert!(Grid::from_parts(vec![blank_row(1)], names.clone()).is_none());
        assert!(Grid::from_parts(Vec::new(), names.clone()).is_none());
        let grid = Grid::from_parts(vec![blank_row(2)], names).unwrap();
        assert_eq!(grid.column_names(), &["x", "y"]);
    }

    #[test]
    fn test_set_column_names_requires_matching_width() {
        let mut grid = Grid::new(1, 2);
        assert!(grid.set_column_names(vec!["x".into()]).is_err());
        grid.set_column_names(vec!["x".into(), "y".into()]).unwrap();
        assert_eq!(grid.column_name(1), Some("y"));
    }

    #[test]
    fn test_find_column_prefers_names_over_letters() {
        let mut grid = Grid::new(1, 3);
        grid.rename_column(0, "B").unwrap();
        assert_eq!(grid.find_column("b"), Some(0));
        assert_eq!(grid.find_column(" C "), Some(2));
        assert_eq!(grid.find_column("D"), None);
        assert_eq!(grid.find_column(""), None);
    }
}
