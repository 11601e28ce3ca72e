//! Application state and logic.
//!
//! [`App`] wraps the [`Document`] with everything that only matters to the terminal: the
//! viewport, editing and command buffers, the status line, column widths, palettes and the
//! help modal. The app operates in different [`Mode`]s similar to Vim's modal editing.
//! Positions handed to the document are displayed coordinates.

use super::keymap::Keymap;
use gridpad_core::history::ColumnEdit;
use gridpad_core::storage::DEFAULT_EXPORT_NAME;
use gridpad_core::{Document, GridpadError};
use gridpad_engine::engine::{CellRef, ColorKey, ColorToken, Nav, Palette, ToggleAttr};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_COLUMN_WIDTH: usize = 12;
pub const MIN_COLUMN_WIDTH: usize = 4;
pub const MAX_COLUMN_WIDTH: usize = 50;

pub const CLEAR_ALL_PROMPT: &str = "Clear all data? (y/n)";

/// Modal editing state for the application.
///
/// - [`Normal`](Mode::Normal): Navigate and execute commands
/// - [`Edit`](Mode::Edit): Edit cell contents
/// - [`Command`](Mode::Command): Enter ex-style commands (`:w`, `:q`, etc.)
/// - [`Visual`](Mode::Visual): Grow a range selection from the keyboard
/// - [`Confirm`](Mode::Confirm): Answer a y/n question before a destructive action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Edit,
    Command,
    Visual,
    Confirm,
}

pub struct App {
    pub doc: Document,
    /// First displayed column in the viewport
    pub viewport_col: usize,
    /// First displayed row in the viewport
    pub viewport_row: usize,
    pub visible_cols: usize,
    pub visible_rows: usize,
    pub mode: Mode,
    pub edit_buffer: String,
    /// Cursor position within edit buffer (byte offset)
    pub edit_cursor: usize,
    pub command_buffer: String,
    /// Cursor position within command buffer (byte offset)
    pub command_cursor: usize,
    pub status_message: String,
    /// Width used for columns without an explicit width
    pub col_width: usize,
    /// Canonical column index -> width
    pub column_widths: HashMap<usize, usize>,
    pub help_modal: bool,
    pub help_scroll: usize,
    pub keymap: Keymap,
    pub text_palette: Palette,
    pub background_palette: Palette,
}

impl App {
    pub fn new(doc: Document) -> Self {
        let mut app = App {
            doc,
            viewport_col: 0,
            viewport_row: 0,
            visible_cols: 5,
            visible_rows: 20,
            mode: Mode::Normal,
            edit_buffer: String::new(),
            edit_cursor: 0,
            command_buffer: String::new(),
            command_cursor: 0,
            status_message: String::new(),
            col_width: DEFAULT_COLUMN_WIDTH,
            column_widths: HashMap::new(),
            help_modal: false,
            help_scroll: 0,
            keymap: Keymap::Vim,
            text_palette: Palette::default_text(),
            background_palette: Palette::default_background(),
        };
        app.ensure_cursor();
        app
    }

    /// The active cell, in displayed coordinates.
    pub fn cursor(&self) -> Option<CellRef> {
        self.doc.selection().active
    }

    /// The moving corner of the range, or the cursor when there is no range.
    pub fn focus(&self) -> Option<CellRef> {
        self.doc
            .selection()
            .range
            .map(|r| r.focus)
            .or_else(|| self.cursor())
    }

    /// Put the cursor on the first cell when the view has cells but no active one.
    pub fn ensure_cursor(&mut self) {
        if self.cursor().is_none() {
            self.doc.set_active(CellRef::new(0, 0));
        }
    }

    /// Show an error in the status line. Returns the value on success.
    fn report<T>(&mut self, result: gridpad_core::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(GridpadError::NoFilePath) => {
                self.status_message = "No file path. Use :w <path>".to_string();
                None
            }
            Err(err) => {
                self.status_message = format!("Error: {}", err);
                None
            }
        }
    }

    /// Canonical column under the cursor.
    fn current_column(&self) -> Option<usize> {
        self.cursor()
            .and_then(|c| self.doc.view().canonical_col(c.col))
    }

    fn column_label(&self, canonical: usize) -> String {
        self.doc
            .grid()
            .column_name(canonical)
            .map(str::to_string)
            .unwrap_or_else(|| CellRef::col_to_letters(canonical))
    }

    /// Resolve a command's column argument, defaulting to the cursor's column.
    fn resolve_column(&mut self, key: Option<&str>) -> Option<usize> {
        match key {
            Some(key) => {
                let found = self.doc.grid().find_column(key);
                if found.is_none() {
                    self.status_message = format!("Unknown column: {}", key);
                }
                found
            }
            None => {
                let found = self.current_column();
                if found.is_none() {
                    self.status_message = "No column under the cursor".to_string();
                }
                found
            }
        }
    }

    fn view_summary(&self) -> String {
        format!(
            "Showing {} of {} rows",
            self.doc.view().row_count(),
            self.doc.grid().row_count()
        )
    }

    // ---- navigation ----

    /// Move cursor by delta, clamping to the displayed grid. Drops any range.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        self.doc.clear_selection_range();
        let Some(cur) = self.cursor() else {
            return;
        };
        let rows = self.doc.view().row_count();
        let cols = self.doc.view().col_count();
        let target = CellRef::new(offset(cur.row, dy, rows), offset(cur.col, dx, cols));
        self.doc.set_active(target);
        self.update_viewport();
    }

    pub fn navigate(&mut self, nav: Nav) {
        self.doc.clear_selection_range();
        self.doc.navigate(nav);
        self.update_viewport();
    }

    pub fn jump_to(&mut self, pos: CellRef) {
        self.doc.clear_selection_range();
        self.doc.set_active(pos);
        self.update_viewport();
    }

    pub fn home_col(&mut self) {
        if let Some(cur) = self.cursor() {
            self.jump_to(CellRef::new(cur.row, 0));
        }
    }

    pub fn end_col(&mut self) {
        if let Some(cur) = self.cursor() {
            let last = self.doc.view().col_count().saturating_sub(1);
            self.jump_to(CellRef::new(cur.row, last));
        }
    }

    pub fn goto_first(&mut self) {
        self.jump_to(CellRef::new(0, 0));
    }

    pub fn goto_last(&mut self) {
        let col = self.cursor().map(|c| c.col).unwrap_or(0);
        let last = self.doc.view().row_count().saturating_sub(1);
        self.jump_to(CellRef::new(last, col));
    }

    /// Grow (or shrink) the range from its anchor, starting one at the cursor if needed.
    pub fn extend_selection(&mut self, dx: i32, dy: i32) {
        let Some(cur) = self.cursor() else {
            return;
        };
        let (anchor, focus) = self
            .doc
            .selection()
            .range
            .map(|r| (r.anchor, r.focus))
            .unwrap_or((cur, cur));
        let rows = self.doc.view().row_count();
        let cols = self.doc.view().col_count();
        let next = CellRef::new(offset(focus.row, dy, rows), offset(focus.col, dx, cols));
        self.doc.begin_select(anchor);
        self.doc.extend_select(next);
        self.doc.release_select();
        self.update_viewport();
    }

    /// Jump to a canonical A1 reference, if it is currently displayed.
    pub fn goto_cell(&mut self, cell_ref_str: &str) {
        let Some(target) = CellRef::from_str(cell_ref_str) else {
            self.status_message = format!("Invalid cell reference: {}", cell_ref_str);
            return;
        };
        if self.doc.grid().get(target).is_none() {
            self.status_message = "Cell out of range".to_string();
            return;
        }
        match self.doc.view().to_display(target) {
            Some(pos) => {
                self.jump_to(pos);
                self.status_message = format!("Jumped to {}", target);
            }
            None => {
                self.status_message = format!("{} is hidden by the current view", target);
            }
        }
    }

    /// Update viewport to keep the selection focus visible
    pub fn update_viewport(&mut self) {
        let Some(focus) = self.focus() else {
            self.viewport_col = 0;
            self.viewport_row = 0;
            return;
        };

        if focus.col < self.viewport_col {
            self.viewport_col = focus.col;
        } else if focus.col >= self.viewport_col + self.visible_cols {
            self.viewport_col = focus.col + 1 - self.visible_cols.max(1);
        }

        if focus.row < self.viewport_row {
            self.viewport_row = focus.row;
        } else if focus.row >= self.viewport_row + self.visible_rows {
            self.viewport_row = focus.row + 1 - self.visible_rows.max(1);
        }
    }

    // ---- mouse selection ----

    pub fn mouse_down(&mut self, pos: CellRef) {
        if self.mode == Mode::Visual {
            self.mode = Mode::Normal;
        }
        self.doc.begin_select(pos);
        self.update_viewport();
    }

    pub fn mouse_drag(&mut self, pos: CellRef) {
        self.doc.extend_select(pos);
        self.update_viewport();
    }

    /// Finish a drag. A click that never left its cell leaves no range behind.
    pub fn mouse_up(&mut self) {
        self.doc.release_select();
        if let Some(range) = self.doc.selection().range
            && range.anchor == range.focus
        {
            self.doc.clear_selection_range();
        }
    }

    // ---- editing ----

    pub fn enter_edit_mode(&mut self) {
        let Some(cur) = self.cursor() else {
            self.status_message = "Nothing to edit: no cells are displayed".to_string();
            return;
        };
        self.edit_buffer = self
            .doc
            .display_value(cur.row, cur.col)
            .unwrap_or_default()
            .to_string();
        self.edit_cursor = self.edit_buffer.len();
        self.mode = Mode::Edit;
    }

    /// Start editing the current cell from an empty buffer.
    pub fn change_cell(&mut self) {
        self.enter_edit_mode();
        if self.mode == Mode::Edit {
            self.edit_buffer.clear();
            self.edit_cursor = 0;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.mode = Mode::Normal;
        self.edit_buffer.clear();
        self.edit_cursor = 0;
    }

    /// Write the edit buffer to the current cell, then move with `nav`.
    pub fn commit_edit(&mut self, nav: Nav) {
        let value = std::mem::take(&mut self.edit_buffer);
        self.edit_cursor = 0;
        self.mode = Mode::Normal;
        let Some(cur) = self.cursor() else {
            return;
        };
        let result = self.doc.set_value(cur, &value);
        if self.report(result).is_some() {
            self.status_message.clear();
            self.navigate(nav);
        }
    }

    pub fn clear_cells(&mut self) {
        let result = self.doc.clear_selection_values();
        self.report(result);
    }

    pub fn enter_visual_mode(&mut self) {
        let Some(cur) = self.cursor() else {
            return;
        };
        self.doc.begin_select(cur);
        self.doc.release_select();
        self.mode = Mode::Visual;
    }

    /// Leave Visual mode. `keep_range` leaves the range on screen for the next action.
    pub fn exit_visual_mode(&mut self, keep_range: bool) {
        if !keep_range {
            self.doc.clear_selection_range();
        }
        self.mode = Mode::Normal;
    }

    // ---- formatting ----

    pub fn toggle_attribute(&mut self, attr: ToggleAttr) {
        let result = self.doc.format_selection(attr);
        if self.report(result).is_some() {
            self.status_message.clear();
        }
    }

    fn palette(&self, key: ColorKey) -> &Palette {
        match key {
            ColorKey::Text => &self.text_palette,
            ColorKey::Background => &self.background_palette,
        }
    }

    fn apply_color(&mut self, key: ColorKey, token: &ColorToken) {
        let result = self.doc.color_selection(key, &token.hex);
        if self.report(result).is_some() {
            let what = match key {
                ColorKey::Text => "Text color",
                ColorKey::Background => "Background",
            };
            self.status_message = format!("{}: {}", what, token.name);
        }
    }

    /// Step the selection's color to the palette entry after the cursor cell's color.
    pub fn cycle_color(&mut self, key: ColorKey) {
        let Some(cur) = self.cursor() else {
            return;
        };
        let current = self
            .doc
            .display_cell(cur.row, cur.col)
            .and_then(|c| c.format.color_of(key))
            .map(str::to_string);
        let token = self.palette(key).next_after(current.as_deref()).clone();
        self.apply_color(key, &token);
    }

    /// Apply a palette color by name or hex value.
    pub fn set_color_named(&mut self, key: ColorKey, name: &str) {
        match self.palette(key).find(name).cloned() {
            Some(token) => self.apply_color(key, &token),
            None => {
                let names: Vec<&str> = self
                    .palette(key)
                    .tokens()
                    .iter()
                    .map(|t| t.name.as_str())
                    .collect();
                self.status_message =
                    format!("Unknown color: {} (try {})", name, names.join(", "));
            }
        }
    }

    pub fn clear_format(&mut self) {
        let result = self.doc.clear_selection_format();
        self.report(result);
    }

    pub fn copy_format(&mut self) {
        let Some(cur) = self.cursor() else {
            return;
        };
        let result = self.doc.copy_format(cur);
        if self.report(result).is_some() {
            self.status_message = "Format copied; paint it onto another cell".to_string();
        }
    }

    pub fn paint_format(&mut self) {
        let Some(cur) = self.cursor() else {
            return;
        };
        let result = self.doc.paint_format(cur);
        if self.report(result).is_some() {
            self.status_message = "Format painted".to_string();
        }
    }

    // ---- view ----

    pub fn sort_column(&mut self, key: Option<&str>) {
        let Some(col) = self.resolve_column(key) else {
            return;
        };
        let result = self.doc.toggle_sort(col);
        if self.report(result).is_some() {
            let arrow = self
                .doc
                .view_state()
                .sort
                .map(|s| s.direction.arrow())
                .unwrap_or_default();
            self.status_message = format!("Sorted by {} {}", self.column_label(col), arrow);
            self.update_viewport();
        }
    }

    pub fn hide_column(&mut self, key: Option<&str>) {
        let Some(col) = self.resolve_column(key) else {
            return;
        };
        let result = self.doc.toggle_hidden(col);
        if let Some(hidden) = self.report(result) {
            let verb = if hidden { "Hid" } else { "Showing" };
            self.status_message = format!("{} column {}", verb, self.column_label(col));
            self.ensure_cursor();
            self.update_viewport();
        }
    }

    pub fn show_all_columns(&mut self) {
        let hidden: Vec<usize> = self
            .doc
            .view_state()
            .hidden_columns
            .iter()
            .copied()
            .collect();
        for col in &hidden {
            let result = self.doc.toggle_hidden(*col);
            self.report(result);
        }
        self.ensure_cursor();
        self.status_message = format!("Showing {} hidden column(s)", hidden.len());
    }

    pub fn set_filter(&mut self, text: &str) {
        self.doc.set_filter(text);
        self.ensure_cursor();
        self.update_viewport();
        self.status_message = self.view_summary();
    }

    pub fn set_column_filter(&mut self, key: &str, pattern: &str) {
        let Some(col) = self.resolve_column(Some(key)) else {
            return;
        };
        let result = self.doc.set_column_filter(col, pattern);
        if self.report(result).is_some() {
            self.ensure_cursor();
            self.update_viewport();
            self.status_message = self.view_summary();
        }
    }

    // ---- structure ----

    pub fn insert_row_above(&mut self) {
        let at = self.cursor().map(|c| c.row);
        let result = self.doc.insert_row(at);
        self.report(result);
        self.ensure_cursor();
    }

    pub fn insert_row_below(&mut self) {
        let at = self.cursor().map(|c| c.row + 1);
        let result = self.doc.insert_row(at);
        if self.report(result) == Some(true) {
            self.move_cursor(0, 1);
        }
        self.ensure_cursor();
    }

    pub fn delete_row(&mut self) {
        let Some(cur) = self.cursor() else {
            return;
        };
        let result = self.doc.delete_row(cur.row);
        if self.report(result) == Some(false) {
            self.status_message = "Cannot delete the only row".to_string();
        }
        self.update_viewport();
    }

    pub fn duplicate_row(&mut self) {
        let Some(cur) = self.cursor() else {
            return;
        };
        let result = self.doc.duplicate_row(cur.row);
        self.report(result);
    }

    pub fn insert_column(&mut self) {
        let at = self.cursor().map(|c| c.col);
        let result = self.doc.insert_column(at);
        if self.report(result) == Some(true) {
            self.follow_last_column_edit();
        }
        self.ensure_cursor();
    }

    pub fn delete_column(&mut self) {
        let Some(cur) = self.cursor() else {
            return;
        };
        let result = self.doc.delete_column(cur.col);
        match self.report(result) {
            Some(true) => self.follow_last_column_edit(),
            Some(false) => self.status_message = "Cannot delete the only column".to_string(),
            None => {}
        }
        self.update_viewport();
    }

    pub fn rename_column(&mut self, name: &str) {
        let Some(col) = self.current_column() else {
            self.status_message = "No column under the cursor".to_string();
            return;
        };
        let result = self.doc.rename_column(col, name);
        if self.report(result).is_some() {
            self.status_message = format!("Renamed column to {}", name);
        }
    }

    /// Ask before blanking the whole grid; [`App::confirm`] does the work.
    pub fn request_clear_all(&mut self) {
        self.mode = Mode::Confirm;
        self.status_message = CLEAR_ALL_PROMPT.to_string();
    }

    pub fn confirm(&mut self) {
        if self.mode != Mode::Confirm {
            return;
        }
        self.mode = Mode::Normal;
        let result = self.doc.clear_all();
        if self.report(result).is_some() {
            self.status_message = "Cleared all data".to_string();
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.mode = Mode::Normal;
        self.status_message = "Cancelled".to_string();
    }

    // ---- history ----

    pub fn undo(&mut self) {
        let edit = self.doc.history().peek_undo().map(|s| s.columns.clone());
        if let Some(edit) = edit {
            self.shift_widths(&edit, true);
        }
        self.status_message = if self.doc.undo() {
            "Undone".to_string()
        } else {
            "Nothing to undo".to_string()
        };
        self.ensure_cursor();
        self.update_viewport();
    }

    pub fn redo(&mut self) {
        let edit = self.doc.history().peek_redo().map(|s| s.columns.clone());
        if let Some(edit) = edit {
            self.shift_widths(&edit, false);
        }
        self.status_message = if self.doc.redo() {
            "Redone".to_string()
        } else {
            "Nothing to redo".to_string()
        };
        self.ensure_cursor();
        self.update_viewport();
    }

    // ---- column widths ----

    /// Width of a displayed column.
    pub fn get_column_width(&self, display_col: usize) -> usize {
        self.doc
            .view()
            .canonical_col(display_col)
            .and_then(|c| self.column_widths.get(&c))
            .copied()
            .unwrap_or(self.col_width)
    }

    fn follow_last_column_edit(&mut self) {
        let edit = self.doc.history().peek_undo().map(|s| s.columns.clone());
        if let Some(edit) = edit {
            self.shift_widths(&edit, false);
        }
    }

    /// Keep custom widths on their columns across a column insert or delete, applied
    /// forward or (`reverse`) undone.
    fn shift_widths(&mut self, edit: &ColumnEdit, reverse: bool) {
        let (at, inserted) = match edit {
            ColumnEdit::Inserted(at) => (*at, !reverse),
            ColumnEdit::Deleted { at, .. } => (*at, reverse),
            ColumnEdit::None | ColumnEdit::Replaced(_) => return,
        };
        self.column_widths = self
            .column_widths
            .drain()
            .filter_map(|(col, width)| match col.cmp(&at) {
                std::cmp::Ordering::Less => Some((col, width)),
                std::cmp::Ordering::Equal if !inserted => None,
                _ if inserted => Some((col + 1, width)),
                _ => Some((col - 1, width)),
            })
            .collect();
    }

    fn set_width_of(&mut self, canonical: usize, width: usize) -> usize {
        let width = width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        self.column_widths.insert(canonical, width);
        width
    }

    pub fn increase_column_width(&mut self) {
        if let Some(cur) = self.cursor() {
            self.adjust_width(cur.col, 2);
        }
    }

    pub fn decrease_column_width(&mut self) {
        if let Some(cur) = self.cursor() {
            self.adjust_width(cur.col, -2);
        }
    }

    fn adjust_width(&mut self, display_col: usize, delta: i32) {
        let Some(canonical) = self.doc.view().canonical_col(display_col) else {
            return;
        };
        let current = self.get_column_width(display_col) as i32;
        self.set_width_of(canonical, (current + delta).max(0) as usize);
    }

    // ---- help ----

    pub fn open_help(&mut self) {
        self.help_modal = true;
        self.help_scroll = 0;
    }

    pub fn close_help_modal(&mut self) {
        self.help_modal = false;
    }

    pub fn scroll_help_by(&mut self, delta: i32) {
        self.help_scroll = if delta < 0 {
            self.help_scroll.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.help_scroll.saturating_add(delta as usize)
        };
    }

    pub fn scroll_help_to_top(&mut self) {
        self.help_scroll = 0;
    }

    /// Clamped to the content height when drawn.
    pub fn scroll_help_to_end(&mut self) {
        self.help_scroll = usize::MAX;
    }

    // ---- files ----

    /// Save the canonical grid, optionally to a new path. Returns true on success.
    pub fn save_file(&mut self, path: Option<&str>) -> bool {
        let result = match path {
            Some(p) => {
                let path = PathBuf::from(p);
                self.doc.export_csv(&path).map(|()| path)
            }
            None => self.doc.save_file(),
        };
        match self.report(result) {
            Some(path) => {
                self.status_message = format!("Saved to {}", path.display());
                true
            }
            None => false,
        }
    }

    /// Like `:w`, but falls back to the default export name when no path is known.
    pub fn export_file(&mut self, path: Option<&str>) -> bool {
        let target = path
            .map(PathBuf::from)
            .or_else(|| self.doc.file_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_NAME));
        let result = self.doc.export_csv(&target);
        if self.report(result).is_some() {
            self.status_message = format!("Exported to {}", target.display());
            true
        } else {
            false
        }
    }

    /// Write only what the view displays.
    pub fn export_view(&mut self, path: &str) {
        let result = self.doc.export_view_csv(Path::new(path));
        if self.report(result).is_some() {
            self.status_message = format!(
                "Exported {} displayed rows to {}",
                self.doc.view().row_count(),
                path
            );
        }
    }

    pub fn import_file(&mut self, path: &str) {
        let result = self.doc.import_csv(Path::new(path));
        if self.report(result).is_some() {
            self.status_message = format!(
                "Imported {}: {} rows x {} columns",
                path,
                self.doc.grid().row_count(),
                self.doc.grid().col_count()
            );
            self.viewport_col = 0;
            self.viewport_row = 0;
            self.ensure_cursor();
        }
    }

    pub fn show_stats(&mut self) {
        let stats = self.doc.stats();
        self.status_message = format!(
            "{} of {} cells filled ({}%)  |  {}",
            stats.filled,
            stats.total,
            stats.percentage(),
            self.view_summary()
        );
    }

    /// Execute a command entered in command mode.
    ///
    /// Returns `true` if the application should quit, `false` otherwise.
    pub fn execute_command(&mut self) -> bool {
        let cmd = self.command_buffer.trim().to_string();
        self.command_buffer.clear();
        self.command_cursor = 0;
        self.mode = Mode::Normal;

        let (command, args) = match cmd.split_once(' ') {
            Some((command, rest)) => (command, Some(rest.trim()).filter(|s| !s.is_empty())),
            None => (cmd.as_str(), None),
        };
        debug!(command, "executing command");

        match command {
            "" => {}
            "q" | "quit" => {
                if self.doc.modified {
                    self.status_message =
                        "Unsaved changes! Use :q! to force quit or :wq to save and quit"
                            .to_string();
                    return false;
                }
                return true;
            }
            "q!" => return true,
            "w" | "save" => {
                self.save_file(args);
            }
            "wq" | "x" => {
                if self.save_file(args) {
                    return true;
                }
            }
            "export" => {
                self.export_file(args);
            }
            "exportview" | "ev" => match args {
                Some(path) => self.export_view(path),
                None => self.status_message = "Usage: :exportview <file.csv>".to_string(),
            },
            "e" | "import" | "open" => match args {
                Some(path) => self.import_file(path),
                None => self.status_message = "Usage: :import <file.csv>".to_string(),
            },
            "goto" | "g" => match args {
                Some(cell_ref) => self.goto_cell(cell_ref),
                None => {
                    self.status_message = "Usage: :goto CELL (e.g., :goto B12)".to_string();
                }
            },
            "filter" | "f" => self.set_filter(args.unwrap_or_default()),
            "cf" | "colfilter" => match args {
                Some(args) => {
                    let (col, pattern) = args
                        .split_once(' ')
                        .map(|(c, p)| (c, p.trim()))
                        .unwrap_or((args, ""));
                    self.set_column_filter(col, pattern);
                }
                None => self.status_message = "Usage: :cf COL [TEXT]".to_string(),
            },
            "nofilter" => {
                self.doc.clear_filters();
                self.ensure_cursor();
                self.status_message = self.view_summary();
            }
            "sort" => self.sort_column(args),
            "nosort" => {
                self.doc.clear_sort();
                self.status_message = "Sort cleared".to_string();
            }
            "hide" => self.hide_column(args),
            "show" => self.show_all_columns(),
            "rename" => match args {
                Some(name) => self.rename_column(name),
                None => self.status_message = "Usage: :rename NAME".to_string(),
            },
            "ir" | "insertrow" => self.insert_row_above(),
            "dr" | "deleterow" => self.delete_row(),
            "dup" => self.duplicate_row(),
            "ic" | "insertcol" => self.insert_column(),
            "dc" | "deletecol" => self.delete_column(),
            "clear" => self.request_clear_all(),
            "color" => match args {
                Some(name) => self.set_color_named(ColorKey::Text, name),
                None => self.cycle_color(ColorKey::Text),
            },
            "bg" => match args {
                Some(name) => self.set_color_named(ColorKey::Background, name),
                None => self.cycle_color(ColorKey::Background),
            },
            "clearformat" => self.clear_format(),
            "stats" => self.show_stats(),
            "colwidth" | "cw" => self.colwidth_command(args),
            "help" | "h" => self.open_help(),
            _ => {
                self.status_message = format!("Unknown command: {}", command);
            }
        }
        false
    }

    fn colwidth_command(&mut self, args: Option<&str>) {
        const USAGE: &str = "Usage: :colwidth [COL] WIDTH";
        let parts: Vec<&str> = args.unwrap_or_default().split_whitespace().collect();
        let (key, width) = match parts.as_slice() {
            [width] => (None, width),
            [col, width] => (Some(*col), width),
            _ => {
                self.status_message = USAGE.to_string();
                return;
            }
        };
        let Ok(width) = width.parse::<usize>() else {
            self.status_message = "Invalid width".to_string();
            return;
        };
        let Some(col) = self.resolve_column(key) else {
            return;
        };
        let width = self.set_width_of(col, width);
        self.status_message = format!("Column {} width set to {}", self.column_label(col), width);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

fn offset(value: usize, delta: i32, len: usize) -> usize {
    let last = len.saturating_sub(1) as i64;
    (value as i64 + delta as i64).clamp(0, last) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpad_core::DocumentOptions;
    use pretty_assertions::assert_eq;

    fn app_with(csv: &str) -> App {
        let mut doc = Document::new();
        doc.load_csv_text(csv).unwrap();
        doc.modified = false;
        App::new(doc)
    }

    fn run(app: &mut App, command: &str) -> bool {
        app.command_buffer = command.to_string();
        app.execute_command()
    }

    fn column(app: &App, display_col: usize) -> Vec<String> {
        (0..app.doc.view().row_count())
            .map(|r| {
                app.doc
                    .display_value(r, display_col)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn new_app_starts_on_first_cell() {
        let app = App::default();
        assert_eq!(app.cursor(), Some(CellRef::new(0, 0)));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn quit_refuses_with_unsaved_changes() {
        let mut app = App::default();
        assert!(run(&mut app, "q"));

        app.doc.set_value(CellRef::new(0, 0), "x").unwrap();
        assert!(!run(&mut app, "q"));
        assert!(app.status_message.contains("Unsaved changes"));
        assert!(run(&mut app, "q!"));
    }

    #[test]
    fn edit_commit_moves_down() {
        let mut app = App::default();
        app.enter_edit_mode();
        assert_eq!(app.mode, Mode::Edit);
        app.edit_buffer = "hello".to_string();
        app.commit_edit(Nav::Enter);
        assert_eq!(app.doc.display_value(0, 0), Some("hello"));
        assert_eq!(app.cursor(), Some(CellRef::new(1, 0)));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn move_cursor_clamps_and_drops_range() {
        let mut app = App::new(Document::with_options(DocumentOptions {
            rows: 3,
            cols: 2,
            ..DocumentOptions::default()
        }));
        app.extend_selection(1, 1);
        assert!(app.doc.selection().range.is_some());
        app.move_cursor(10, 10);
        assert_eq!(app.cursor(), Some(CellRef::new(2, 1)));
        assert_eq!(app.doc.selection().range, None);
    }

    #[test]
    fn extend_selection_keeps_anchor_as_cursor() {
        let mut app = App::default();
        app.jump_to(CellRef::new(1, 1));
        app.extend_selection(1, 0);
        app.extend_selection(0, 2);
        let range = app.doc.selection().range.unwrap();
        assert_eq!(range.anchor, CellRef::new(1, 1));
        assert_eq!(range.focus, CellRef::new(3, 2));
        assert_eq!(app.cursor(), Some(CellRef::new(1, 1)));
        assert_eq!(app.focus(), Some(CellRef::new(3, 2)));
    }

    #[test]
    fn sort_and_filter_commands() {
        let mut app = app_with("pear,3\napple,1\nfig,2");
        run(&mut app, "sort A");
        assert_eq!(column(&app, 0), vec!["apple", "fig", "pear"]);
        assert!(app.status_message.starts_with("Sorted by A"));

        run(&mut app, "sort A");
        assert_eq!(column(&app, 0), vec!["pear", "fig", "apple"]);

        run(&mut app, "cf B 2");
        assert_eq!(column(&app, 0), vec!["fig"]);
        assert_eq!(app.status_message, "Showing 1 of 3 rows");

        run(&mut app, "nofilter");
        run(&mut app, "nosort");
        assert_eq!(column(&app, 0), vec!["pear", "apple", "fig"]);

        run(&mut app, "filter ap");
        assert_eq!(column(&app, 0), vec!["apple"]);
    }

    #[test]
    fn unknown_column_is_reported() {
        let mut app = App::default();
        run(&mut app, "sort nope");
        assert_eq!(app.status_message, "Unknown column: nope");
        assert_eq!(app.doc.view_state().sort, None);
    }

    #[test]
    fn hide_and_show_columns() {
        let mut app = app_with("a,b,c");
        run(&mut app, "hide B");
        assert_eq!(app.doc.view().col_count(), 2);
        assert_eq!(app.status_message, "Hid column B");
        run(&mut app, "show");
        assert_eq!(app.doc.view().col_count(), 3);
    }

    #[test]
    fn rename_targets_column_under_cursor() {
        let mut app = app_with("a,b");
        app.jump_to(CellRef::new(0, 1));
        run(&mut app, "rename Price");
        assert_eq!(app.doc.grid().column_names(), &["A", "Price"]);
        run(&mut app, "sort price");
        assert_eq!(app.doc.view_state().sort.unwrap().column, 1);
    }

    #[test]
    fn clear_asks_for_confirmation() {
        let mut app = app_with("a,b\nc,d");
        run(&mut app, "clear");
        assert_eq!(app.mode, Mode::Confirm);
        assert_eq!(app.status_message, CLEAR_ALL_PROMPT);
        app.cancel_confirm();
        assert_eq!(app.doc.display_value(0, 0), Some("a"));

        run(&mut app, "clear");
        app.confirm();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.doc.stats().filled, 0);
        assert_eq!(app.doc.grid().row_count(), 2);
    }

    #[test]
    fn goto_reports_cells_hidden_by_view() {
        let mut app = app_with("x\ny\nz");
        run(&mut app, "goto A3");
        assert_eq!(app.cursor(), Some(CellRef::new(2, 0)));

        run(&mut app, "filter y");
        run(&mut app, "goto A3");
        assert_eq!(app.status_message, "A3 is hidden by the current view");
        run(&mut app, "goto A2");
        assert_eq!(app.cursor(), Some(CellRef::new(0, 0)));
        run(&mut app, "goto nonsense");
        assert!(app.status_message.starts_with("Invalid cell reference"));
    }

    #[test]
    fn color_commands_use_palette() {
        let mut app = App::default();
        run(&mut app, "color red");
        assert_eq!(app.status_message, "Text color: red");
        let fmt = &app.doc.grid().cell(0, 0).unwrap().format;
        assert_eq!(fmt.color.as_deref(), Some("#ef4444"));

        run(&mut app, "bg");
        let fmt = &app.doc.grid().cell(0, 0).unwrap().format;
        assert_eq!(fmt.background.as_deref(), Some("#fee2e2"));

        run(&mut app, "color chartreuse");
        assert!(app.status_message.starts_with("Unknown color: chartreuse"));
    }

    #[test]
    fn cycle_color_walks_palette() {
        let mut app = App::default();
        app.cycle_color(ColorKey::Text);
        app.cycle_color(ColorKey::Text);
        let fmt = &app.doc.grid().cell(0, 0).unwrap().format;
        assert_eq!(fmt.color.as_deref(), Some("#f59e42"));
    }

    #[test]
    fn format_painter_through_app() {
        let mut app = App::default();
        app.toggle_attribute(ToggleAttr::Bold);
        app.copy_format();
        app.move_cursor(1, 0);
        app.paint_format();
        assert!(app.doc.grid().cell(0, 1).unwrap().format.is_bold());
        app.paint_format();
        assert_eq!(app.status_message, "Error: No format copied");
    }

    #[test]
    fn row_commands_and_shape_floor() {
        let mut app = App::new(Document::with_options(DocumentOptions {
            rows: 1,
            cols: 1,
            ..DocumentOptions::default()
        }));
        run(&mut app, "dr");
        assert_eq!(app.status_message, "Cannot delete the only row");
        run(&mut app, "dc");
        assert_eq!(app.status_message, "Cannot delete the only column");

        app.doc.set_value(CellRef::new(0, 0), "x").unwrap();
        run(&mut app, "dup");
        run(&mut app, "ir");
        run(&mut app, "ic");
        assert_eq!(app.doc.grid().row_count(), 3);
        assert_eq!(app.doc.grid().col_count(), 2);
        assert_eq!(column(&app, 1), vec!["", "x", "x"]);
    }

    #[test]
    fn undo_and_redo_report_status() {
        let mut app = App::default();
        app.undo();
        assert_eq!(app.status_message, "Nothing to undo");
        app.doc.set_value(CellRef::new(0, 0), "x").unwrap();
        app.undo();
        assert_eq!(app.status_message, "Undone");
        app.redo();
        assert_eq!(app.doc.display_value(0, 0), Some("x"));
    }

    #[test]
    fn colwidth_is_clamped_and_follows_column() {
        let mut app = app_with("a,b");
        run(&mut app, "cw B 99");
        assert_eq!(app.status_message, "Column B width set to 50");
        run(&mut app, "hide A");
        assert_eq!(app.get_column_width(0), 50);
        run(&mut app, "cw x");
        assert_eq!(app.status_message, "Invalid width");
    }

    #[test]
    fn colwidth_stays_with_column_across_insert_and_delete() {
        let mut app = app_with("a,b,c");
        run(&mut app, "cw B 30");
        app.jump_to(CellRef::new(0, 0));
        app.insert_column();
        assert_eq!(app.column_widths, HashMap::from([(2, 30)]));
        assert_eq!(app.get_column_width(2), 30);
        assert_eq!(app.get_column_width(1), DEFAULT_COLUMN_WIDTH);

        app.undo();
        assert_eq!(app.column_widths, HashMap::from([(1, 30)]));
        app.redo();
        assert_eq!(app.column_widths, HashMap::from([(2, 30)]));

        app.jump_to(CellRef::new(0, 2));
        app.delete_column();
        assert!(app.column_widths.is_empty());

        run(&mut app, "cw C 40");
        assert_eq!(app.column_widths, HashMap::from([(2, 40)]));
        app.jump_to(CellRef::new(0, 0));
        app.delete_column();
        assert_eq!(app.column_widths, HashMap::from([(1, 40)]));
        app.undo();
        assert_eq!(app.doc.grid().col_count(), 3);
        assert_eq!(app.column_widths, HashMap::from([(2, 40)]));
    }

    #[test]
    fn save_without_path_explains() {
        let mut app = App::default();
        run(&mut app, "w");
        assert_eq!(app.status_message, "No file path. Use :w <path>");
    }

    #[test]
    fn write_and_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let path_str = path.to_str().unwrap();

        let mut app = app_with("a,\"b,c\"");
        app.doc.modified = true;
        assert!(run(&mut app, &format!("wq {}", path_str)));
        assert!(!app.doc.modified);

        let mut other = App::default();
        run(&mut other, &format!("import {}", path_str));
        assert_eq!(other.doc.display_value(0, 1), Some("b,c"));
        assert!(other.status_message.starts_with("Imported"));
        assert!(other.doc.can_undo());
    }

    #[test]
    fn export_view_writes_displayed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.csv");

        let mut app = app_with("b,1\na,2");
        run(&mut app, "sort A");
        run(&mut app, "hide B");
        run(&mut app, &format!("ev {}", path.display()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"a\"\n\"b\"");
    }

    #[test]
    fn unknown_command() {
        let mut app = App::default();
        assert!(!run(&mut app, "frobnicate now"));
        assert_eq!(app.status_message, "Unknown command: frobnicate");
    }

    #[test]
    fn stats_command() {
        let mut app = app_with("a,\n,b");
        run(&mut app, "stats");
        assert_eq!(
            app.status_message,
            "2 of 4 cells filled (50%)  |  Showing 2 of 2 rows"
        );
    }

    #[test]
    fn mouse_click_without_drag_leaves_no_range() {
        let mut app = App::default();
        app.mouse_down(CellRef::new(2, 2));
        app.mouse_up();
        assert_eq!(app.cursor(), Some(CellRef::new(2, 2)));
        assert_eq!(app.doc.selection().range, None);

        app.mouse_down(CellRef::new(0, 0));
        app.mouse_drag(CellRef::new(1, 1));
        app.mouse_up();
        assert!(app.doc.selection().contains(CellRef::new(1, 0)));
    }
}
