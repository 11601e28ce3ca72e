use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::prelude::*;
use std::io;

use super::actions::{ApplyResult, apply_action, handle_command_text, handle_edit_text};
use super::app::{App, Mode};
use super::keymap::{Action, BaseKeymap, translate};
use super::ui;

const SCROLL_ROWS: i32 = 3;

fn handle_mouse_event(app: &mut App, terminal_area: Rect, mouse: MouseEvent) {
    if app.help_modal || !matches!(app.mode, Mode::Normal | Mode::Visual) {
        return;
    }

    let [_formula_area, grid_area, _status_area] = ui::split_main_chunks(terminal_area);
    let hit = ui::grid_cell_at(app, grid_area, mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(pos) = hit {
                app.mouse_down(pos);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(pos) = hit {
                app.mouse_drag(pos);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(),
        MouseEventKind::ScrollDown => app.move_cursor(0, SCROLL_ROWS),
        MouseEventKind::ScrollUp => app.move_cursor(0, -SCROLL_ROWS),
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::F(1) => {
            app.close_help_modal();
        }
        KeyCode::Down | KeyCode::Char('j') => app.scroll_help_by(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_help_by(-1),
        KeyCode::PageDown => app.scroll_help_by(12),
        KeyCode::PageUp => app.scroll_help_by(-12),
        KeyCode::Home | KeyCode::Char('g') => app.scroll_help_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.scroll_help_to_end(),
        _ => {}
    }
}

/// In the basic scheme a printable key in Normal mode replaces the cell, like a grid app.
fn type_to_edit(app: &mut App, key: KeyEvent) -> bool {
    if app.keymap.base() != BaseKeymap::Basic || app.mode != Mode::Normal {
        return false;
    }
    let KeyCode::Char(_) = key.code else {
        return false;
    };
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }
    apply_action(app, Action::ChangeCell);
    if app.mode == Mode::Edit {
        handle_edit_text(app, key);
    }
    true
}

/// Route one key press. Returns `ApplyResult::Quit` when the app should exit.
fn handle_key_event(app: &mut App, key: KeyEvent) -> ApplyResult {
    if app.help_modal {
        handle_help_key(app, key);
        return ApplyResult::Continue;
    }

    if let Some(action) = translate(&app.keymap, app.mode, key) {
        return apply_action(app, action);
    }

    if type_to_edit(app, key) {
        return ApplyResult::Continue;
    }

    // Text entry fallbacks (not bound in keymaps).
    match app.mode {
        Mode::Edit => handle_edit_text(app, key),
        Mode::Command => handle_command_text(app, key),
        _ => {}
    }
    ApplyResult::Continue
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match event::read()? {
            Event::Key(key) => {
                // Only process key press events (Windows reports Press + Release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(app, key) == ApplyResult::Quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                let terminal_area = Rect::new(0, 0, size.width, size.height);
                handle_mouse_event(app, terminal_area, mouse);
            }
            _ => {}
        }
    }
}
