//! UI rendering

use super::app::{App, Mode};
use super::help::{get_commands_help, get_help_text};
use gridpad_engine::engine::{CellRef, Format};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

pub(crate) const FORMULA_BAR_HEIGHT: u16 = 3;
pub(crate) const GRID_MIN_HEIGHT: u16 = 10;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 5;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FORMULA_BAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Displayed cell under a terminal position inside the grid block, if any.
pub(crate) fn grid_cell_at(
    app: &App,
    grid_area: Rect,
    mouse_col: u16,
    mouse_row: u16,
) -> Option<CellRef> {
    if grid_area.width < 3 || grid_area.height < 4 {
        return None;
    }

    let inner_x = grid_area.x.saturating_add(1);
    let inner_y = grid_area.y.saturating_add(1);
    let inner_right = inner_x.saturating_add(grid_area.width.saturating_sub(2));
    let inner_bottom = inner_y.saturating_add(grid_area.height.saturating_sub(2));

    if mouse_col < inner_x
        || mouse_col >= inner_right
        || mouse_row < inner_y
        || mouse_row >= inner_bottom
    {
        return None;
    }

    // Header row holds column names, not data cells.
    if mouse_row == inner_y {
        return None;
    }

    let rel_row = (mouse_row - inner_y - 1) as usize;
    if rel_row >= app.visible_rows {
        return None;
    }
    let row = app.viewport_row + rel_row;
    if row >= app.doc.view().row_count() {
        return None;
    }

    let mut x = inner_x
        .saturating_add(ROW_HEADER_WIDTH)
        .saturating_add(GRID_COLUMN_SPACING);
    if mouse_col < x {
        return None;
    }

    let col_count = app.doc.view().col_count();
    for col in app.viewport_col..(app.viewport_col + app.visible_cols).min(col_count) {
        let cell_end = x.saturating_add(app.get_column_width(col) as u16);
        if mouse_col >= x && mouse_col < cell_end {
            return Some(CellRef::new(row, col));
        }
        x = cell_end.saturating_add(GRID_COLUMN_SPACING);
        if mouse_col < x || x >= inner_right {
            return None;
        }
    }

    None
}

/// How many displayed columns fit in `width` starting at the viewport.
fn fitting_columns(app: &App, width: usize) -> usize {
    let col_count = app.doc.view().col_count();
    let mut used = 0;
    let mut fits = 0;
    for col in app.viewport_col..col_count {
        used += app.get_column_width(col) + GRID_COLUMN_SPACING as usize;
        if used > width {
            break;
        }
        fits += 1;
    }
    fits.max(1)
}

/// Parse a `#rrggbb` token.
pub(crate) fn hex_color(token: &str) -> Option<Color> {
    let hex = token.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(Color::Rgb(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

fn format_style(format: &Format) -> Style {
    let mut style = Style::default();
    if let Some(fg) = format.color.as_deref().and_then(hex_color) {
        style = style.fg(fg);
    }
    if let Some(bg) = format.background.as_deref().and_then(hex_color) {
        style = style.bg(bg);
    }
    if format.is_bold() {
        style = style.add_modifier(Modifier::BOLD);
    }
    if format.is_italic() {
        style = style.add_modifier(Modifier::ITALIC);
    }
    style
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = split_main_chunks(f.area());

    // Update visible dimensions based on actual size
    let grid_area = chunks[1];
    let available_width = grid_area
        .width
        .saturating_sub(ROW_HEADER_WIDTH + GRID_COLUMN_SPACING + 2) as usize;
    let available_height = grid_area.height.saturating_sub(3) as usize; // header + borders

    app.visible_cols = fitting_columns(app, available_width);
    app.visible_rows = available_height.max(1);
    app.update_viewport();
    app.visible_cols = fitting_columns(app, available_width);

    draw_formula_bar(f, app, chunks[0]);
    draw_grid(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if app.help_modal {
        draw_help_modal(f, app);
    }
}

fn draw_formula_bar(f: &mut Frame, app: &App, area: Rect) {
    let canonical = app
        .cursor()
        .and_then(|c| app.doc.view().to_canonical(c));
    let cell_name = canonical
        .map(|c| c.to_string())
        .unwrap_or_else(|| "--".to_string());

    let content = match app.mode {
        Mode::Edit => {
            let (before, after) = app.edit_buffer.split_at(app.edit_cursor);
            format!("{}: {}│{}", cell_name, before, after)
        }
        Mode::Command => {
            let (before, after) = app.command_buffer.split_at(app.command_cursor);
            format!(":{}│{}", before, after)
        }
        Mode::Confirm => app.status_message.clone(),
        Mode::Normal | Mode::Visual => {
            let value = canonical
                .and_then(|c| app.doc.grid().get(c))
                .map(|c| c.value.as_str())
                .unwrap_or_default();
            let range = app
                .doc
                .selection()
                .extent()
                .filter(|rect| rect.width() * rect.height() > 1)
                .map(|rect| format!(" ({}x{} selected)", rect.height(), rect.width()))
                .unwrap_or_default();
            if value.is_empty() {
                format!("{}: (empty){}", cell_name, range)
            } else {
                format!("{}: {}{}", cell_name, value, range)
            }
        }
    };

    let (title, color) = match app.mode {
        Mode::Edit => (" Edit ", Color::Yellow),
        Mode::Command => (" Command ", Color::Cyan),
        Mode::Visual => (" Visual ", Color::Magenta),
        Mode::Confirm => (" Confirm ", Color::Red),
        Mode::Normal => (" Cell ", Color::White),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color));

    let paragraph = Paragraph::new(content).block(block);
    f.render_widget(paragraph, area);
}

fn header_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let view = app.doc.view();
    let state = app.doc.view_state();
    let cursor = app.cursor();
    let col_end = (app.viewport_col + app.visible_cols).min(view.col_count());
    let row_end = (app.viewport_row + app.visible_rows).min(view.row_count());

    // Build header row
    let mut header_cells = vec![Cell::from(" ")]; // Corner
    for col in app.viewport_col..col_end {
        let canonical = view.canonical_col(col).unwrap_or(col);
        let mut label = app.doc.display_column_name(col).unwrap_or_default().to_string();
        if let Some(sort) = state.sort
            && sort.column == canonical
        {
            label.push(' ');
            label.push_str(sort.direction.arrow());
        }
        if !state.column_filter(canonical).is_empty() {
            label.push_str(" *");
        }
        let active = cursor.is_some_and(|c| c.col == col);
        header_cells.push(Cell::from(label).style(header_style(active)));
    }
    let header = Row::new(header_cells).height(1);

    // Build data rows
    let mut rows = Vec::new();
    for row in app.viewport_row..row_end {
        let mut cells = Vec::new();

        // Row headers number canonical rows so sorting does not renumber them
        let number = view.canonical_row(row).unwrap_or(row) + 1;
        let active = cursor.is_some_and(|c| c.row == row);
        cells.push(Cell::from(number.to_string()).style(header_style(active)));

        for col in app.viewport_col..col_end {
            let pos = CellRef::new(row, col);
            let (text, base) = app
                .doc
                .display_cell(row, col)
                .map(|c| (c.value.as_str(), format_style(&c.format)))
                .unwrap_or(("", Style::default()));

            let style = if cursor == Some(pos) {
                base.fg(Color::Black).bg(Color::Cyan)
            } else if app.doc.selection().contains(pos) {
                base.fg(Color::White).bg(Color::Blue)
            } else {
                base
            };

            cells.push(Cell::from(text.to_string()).style(style));
        }

        rows.push(Row::new(cells));
    }

    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH)];
    for col in app.viewport_col..col_end {
        widths.push(Constraint::Length(app.get_column_width(col) as u16));
    }

    let title = if view.row_count() == 0 {
        " Gridpad (no rows match) ".to_string()
    } else if state.has_filters() {
        format!(
            " Gridpad ({} of {} rows) ",
            view.row_count(),
            app.doc.grid().row_count()
        )
    } else {
        " Gridpad ".to_string()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(table, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let file_info = if let Some(ref path) = app.doc.file_path {
        let modified_indicator = if app.doc.modified { " [+]" } else { "" };
        format!("{}{}", path.display(), modified_indicator)
    } else if app.doc.modified {
        "[New File] [+]".to_string()
    } else {
        "[New File]".to_string()
    };

    let painter = if app.doc.painter().is_active() {
        "  |  [paint]"
    } else {
        ""
    };

    let status = if !app.status_message.is_empty() {
        app.status_message.clone()
    } else {
        format!(
            "{}  |  [{}]{}  |  {}",
            file_info,
            app.keymap.name(),
            painter,
            app.keymap.status_hint()
        )
    };

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else if app.mode == Mode::Confirm {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if !app.status_message.is_empty() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(status, style)]));
    f.render_widget(paragraph, area);
}

fn help_line(text: String, heading: &str) -> Line<'static> {
    let style = if text == heading {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if text.starts_with("  ") {
        Style::default().fg(Color::White)
    } else {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(text, style))
}

fn draw_help_modal(f: &mut Frame, app: &App) {
    let area = centered_rect(88, 88, f.area());

    let modal_style = Style::default().fg(Color::White).bg(Color::Black);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Gridpad Help (Esc to close) ")
        .border_style(Style::default().fg(Color::Green))
        .style(modal_style);

    let mut lines: Vec<Line> = Vec::new();
    for text in get_help_text(&app.keymap) {
        lines.push(help_line(text, ""));
    }
    lines.push(Line::from(""));
    for text in get_commands_help() {
        lines.push(help_line(text, "Commands"));
    }

    let viewport_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(viewport_height);
    let effective_scroll = app.help_scroll.min(max_scroll);
    let scroll_y = u16::try_from(effective_scroll).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(modal_style)
        .scroll((scroll_y, 0))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
