//! Derived display of a grid: filtering, sorting and hidden columns.
//!
//! [`derive_view`] is a pure function of the canonical [`Grid`] and a [`ViewState`]. The
//! resulting [`View`] never copies cells; it maps displayed indices to canonical ones and
//! back. Anything addressed in displayed coordinates must go through these maps before
//! touching the grid.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::cell::Cell;
use super::cell_ref::CellRef;
use super::grid::Grid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortConfig {
    /// Canonical column index.
    pub column: usize,
    pub direction: SortDirection,
}

/// The view settings attached to a single canonical column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnSettings {
    pub filter: String,
    pub hidden: bool,
    /// Set when the column is the sort key.
    pub sort: Option<SortDirection>,
}

/// User-controlled filter, sort and visibility settings. Column indices are canonical.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub filter: String,
    /// One pattern per canonical column; `""` means no filter. May be shorter than the grid.
    pub column_filters: Vec<String>,
    pub sort: Option<SortConfig>,
    pub hidden_columns: BTreeSet<usize>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.to_string();
    }

    pub fn set_column_filter(&mut self, col: usize, pattern: &str) {
        if self.column_filters.len() <= col {
            self.column_filters.resize(col + 1, String::new());
        }
        self.column_filters[col] = pattern.to_string();
    }

    pub fn column_filter(&self, col: usize) -> &str {
        self.column_filters.get(col).map_or("", String::as_str)
    }

    /// Same column flips the direction; another column starts ascending.
    pub fn toggle_sort(&mut self, col: usize) {
        self.sort = Some(match self.sort {
            Some(cfg) if cfg.column == col => SortConfig {
                column: col,
                direction: cfg.direction.flipped(),
            },
            _ => SortConfig {
                column: col,
                direction: SortDirection::Asc,
            },
        });
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Returns true when the column is now hidden.
    pub fn toggle_hidden(&mut self, col: usize) -> bool {
        if self.hidden_columns.remove(&col) {
            false
        } else {
            self.hidden_columns.insert(col);
            true
        }
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.column_filters.clear();
    }

    pub fn has_filters(&self) -> bool {
        !self.filter.is_empty() || self.column_filters.iter().any(|f| !f.is_empty())
    }

    /// Shift column-indexed settings after a column was inserted at `at`.
    pub fn on_column_inserted(&mut self, at: usize) {
        if at <= self.column_filters.len() {
            self.column_filters.insert(at, String::new());
        }
        self.hidden_columns = self
            .hidden_columns
            .iter()
            .map(|&c| if c >= at { c + 1 } else { c })
            .collect();
        if let Some(cfg) = self.sort.as_mut()
            && cfg.column >= at
        {
            cfg.column += 1;
        }
    }

    /// Shift column-indexed settings after column `at` was deleted.
    pub fn on_column_deleted(&mut self, at: usize) {
        if at < self.column_filters.len() {
            self.column_filters.remove(at);
        }
        self.hidden_columns = self
            .hidden_columns
            .iter()
            .filter(|&&c| c != at)
            .map(|&c| if c > at { c - 1 } else { c })
            .collect();
        match self.sort {
            Some(cfg) if cfg.column == at => self.sort = None,
            Some(ref mut cfg) if cfg.column > at => cfg.column -= 1,
            _ => {}
        }
    }

    pub fn column_settings(&self, col: usize) -> ColumnSettings {
        ColumnSettings {
            filter: self.column_filter(col).to_string(),
            hidden: self.hidden_columns.contains(&col),
            sort: self
                .sort
                .filter(|cfg| cfg.column == col)
                .map(|cfg| cfg.direction),
        }
    }

    /// Put back settings captured with [`column_settings`](Self::column_settings) onto a
    /// freshly inserted column `col`. A sort on another column is left alone.
    pub fn restore_column(&mut self, col: usize, settings: ColumnSettings) {
        if !settings.filter.is_empty() {
            self.set_column_filter(col, &settings.filter);
        }
        if settings.hidden {
            self.hidden_columns.insert(col);
        }
        if let Some(direction) = settings.sort
            && self.sort.is_none()
        {
            self.sort = Some(SortConfig {
                column: col,
                direction,
            });
        }
    }

    /// Drop settings that point past `width` columns.
    pub fn fit_to(&mut self, width: usize) {
        self.column_filters.truncate(width);
        self.hidden_columns.retain(|&c| c < width);
        if self.sort.is_some_and(|cfg| cfg.column >= width) {
            self.sort = None;
        }
    }
}

/// Displayed grid as index maps into the canonical grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct View {
    row_map: Vec<usize>,
    col_map: Vec<usize>,
    row_lookup: Vec<Option<usize>>,
    col_lookup: Vec<Option<usize>>,
}

fn reverse(map: &[usize], len: usize) -> Vec<Option<usize>> {
    let mut lookup = vec![None; len];
    for (display, &canonical) in map.iter().enumerate() {
        lookup[canonical] = Some(display);
    }
    lookup
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Compute the displayed grid for `state`.
pub fn derive_view(grid: &Grid, state: &ViewState) -> View {
    let width = grid.col_count();
    let text = state.filter.to_lowercase();
    let column_patterns: Vec<(usize, String)> = state
        .column_filters
        .iter()
        .enumerate()
        .filter(|(col, pattern)| *col < width && !pattern.is_empty())
        .map(|(col, pattern)| (col, pattern.to_lowercase()))
        .collect();

    let keep = |row: &[Cell]| {
        let text_ok = text.is_empty() || row.iter().any(|c| contains_ci(&c.value, &text));
        text_ok
            && column_patterns
                .iter()
                .all(|(col, pattern)| contains_ci(&row[*col].value, pattern))
    };

    let mut row_map: Vec<usize> = grid
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| keep(row))
        .map(|(idx, _)| idx)
        .collect();

    if let Some(cfg) = state.sort {
        let key = |idx: usize| -> &str {
            grid.rows()[idx]
                .get(cfg.column)
                .map_or("", |c| c.value.as_str())
        };
        row_map.sort_by(|&a, &b| {
            let ord: Ordering = key(a).cmp(key(b));
            match cfg.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }

    let col_map: Vec<usize> = (0..width)
        .filter(|c| !state.hidden_columns.contains(c))
        .collect();

    View {
        row_lookup: reverse(&row_map, grid.row_count()),
        col_lookup: reverse(&col_map, width),
        row_map,
        col_map,
    }
}

impl View {
    pub fn row_count(&self) -> usize {
        self.row_map.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_map.len()
    }

    pub fn row_map(&self) -> &[usize] {
        &self.row_map
    }

    pub fn col_map(&self) -> &[usize] {
        &self.col_map
    }

    pub fn canonical_row(&self, display: usize) -> Option<usize> {
        self.row_map.get(display).copied()
    }

    pub fn display_row(&self, canonical: usize) -> Option<usize> {
        self.row_lookup.get(canonical).copied().flatten()
    }

    pub fn canonical_col(&self, display: usize) -> Option<usize> {
        self.col_map.get(display).copied()
    }

    pub fn display_col(&self, canonical: usize) -> Option<usize> {
        self.col_lookup.get(canonical).copied().flatten()
    }

    /// Translate a displayed position to its canonical position.
    pub fn to_canonical(&self, pos: CellRef) -> Option<CellRef> {
        Some(CellRef::new(
            self.canonical_row(pos.row)?,
            self.canonical_col(pos.col)?,
        ))
    }

    /// Translate a canonical position to where it is displayed, if it is visible.
    pub fn to_display(&self, pos: CellRef) -> Option<CellRef> {
        Some(CellRef::new(
            self.display_row(pos.row)?,
            self.display_col(pos.col)?,
        ))
    }

    pub fn cell<'g>(&self, grid: &'g Grid, row: usize, col: usize) -> Option<&'g Cell> {
        grid.get(self.to_canonical(CellRef::new(row, col))?)
    }

    /// The displayed grid as a standalone value. `None` when nothing is displayed.
    pub fn materialize(&self, grid: &Grid) -> Option<Grid> {
        let rows: Vec<Vec<Cell>> = self
            .row_map
            .iter()
            .map(|&r| {
                self.col_map
                    .iter()
                    .map(|&c| grid.rows()[r][c].clone())
                    .collect()
            })
            .collect();
        let names = self
            .col_map
            .iter()
            .map(|&c| grid.column_names()[c].clone())
            .collect();
        Grid::from_parts(rows, names)
    }
}
