use crossterm::event::{self, KeyCode, KeyModifiers};
use gridpad_engine::engine::{ColorKey, Nav, ToggleAttr};

use super::app::{App, Mode};
use super::keymap::Action;

/// Handle text editing operations on a buffer with UTF-8 aware cursor movement.
fn handle_text_input(buffer: &mut String, cursor: &mut usize, key: event::KeyEvent) {
    match key.code {
        KeyCode::Left => {
            if *cursor > 0 {
                let mut new_pos = *cursor - 1;
                while new_pos > 0 && !buffer.is_char_boundary(new_pos) {
                    new_pos -= 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Right => {
            if *cursor < buffer.len() {
                let mut new_pos = *cursor + 1;
                while new_pos < buffer.len() && !buffer.is_char_boundary(new_pos) {
                    new_pos += 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = buffer.len(),
        KeyCode::Backspace | KeyCode::Char('h')
            if key.code == KeyCode::Backspace || key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            if *cursor > 0 {
                let mut del_start = *cursor - 1;
                while del_start > 0 && !buffer.is_char_boundary(del_start) {
                    del_start -= 1;
                }
                buffer.drain(del_start..*cursor);
                *cursor = del_start;
            }
        }
        KeyCode::Delete => {
            if *cursor < buffer.len() {
                let mut del_end = *cursor + 1;
                while del_end < buffer.len() && !buffer.is_char_boundary(del_end) {
                    del_end += 1;
                }
                buffer.drain(*cursor..del_end);
            }
        }
        KeyCode::Char(c) => {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                buffer.insert(*cursor, c);
                *cursor += c.len_utf8();
            }
        }
        _ => {}
    }
}

/// Result of applying an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    Continue,
    Quit,
}

fn open_prompt(app: &mut App, prefix: &str) {
    app.mode = Mode::Command;
    app.command_buffer = prefix.to_string();
    app.command_cursor = app.command_buffer.len();
}

/// Formatting from Visual mode applies to the range, then returns to Normal with the
/// range still shown.
fn leave_visual_after_format(app: &mut App) {
    if app.mode == Mode::Visual {
        app.exit_visual_mode(true);
    }
}

/// Apply an action to the application state.
///
/// Returns `ApplyResult::Quit` if the application should exit.
pub fn apply_action(app: &mut App, action: Action) -> ApplyResult {
    match action {
        Action::Cancel => match app.mode {
            Mode::Edit => app.cancel_edit(),
            Mode::Command => {
                app.mode = Mode::Normal;
                app.command_buffer.clear();
                app.command_cursor = 0;
            }
            Mode::Visual => app.exit_visual_mode(false),
            Mode::Confirm => app.cancel_confirm(),
            Mode::Normal => {
                app.doc.clear_selection_range();
                if app.doc.painter().is_active() {
                    app.doc.cancel_paint();
                    app.status_message = "Format painter cancelled".to_string();
                }
            }
        },

        Action::EnterEdit => app.enter_edit_mode(),
        Action::ChangeCell => app.change_cell(),
        Action::CommitEdit => app.commit_edit(Nav::Enter),
        Action::CommitEditNext => app.commit_edit(Nav::Tab),
        Action::EnterCommand => open_prompt(app, ""),
        Action::ExecuteCommand => {
            if app.execute_command() {
                return ApplyResult::Quit;
            }
        }
        Action::EnterVisual => {
            if app.mode != Mode::Visual {
                app.enter_visual_mode();
            }
        }
        Action::ExitVisual => app.exit_visual_mode(false),
        Action::Confirm => app.confirm(),
        Action::Quit => {
            if app.doc.modified {
                app.status_message =
                    "Unsaved changes! Save first or use :q! to discard them".to_string();
            } else {
                return ApplyResult::Quit;
            }
        }

        Action::Undo => app.undo(),
        Action::Redo => app.redo(),
        Action::ClearCell => {
            app.clear_cells();
            leave_visual_after_format(app);
        }
        Action::ClearFormat => {
            app.clear_format();
            leave_visual_after_format(app);
        }
        Action::ToggleBold => {
            app.toggle_attribute(ToggleAttr::Bold);
            leave_visual_after_format(app);
        }
        Action::ToggleItalic => {
            app.toggle_attribute(ToggleAttr::Italic);
            leave_visual_after_format(app);
        }
        Action::CycleColor => {
            app.cycle_color(ColorKey::Text);
            leave_visual_after_format(app);
        }
        Action::CycleBackground => {
            app.cycle_color(ColorKey::Background);
            leave_visual_after_format(app);
        }
        Action::CopyFormat => app.copy_format(),
        Action::PaintFormat => app.paint_format(),

        Action::SortColumn => app.sort_column(None),
        Action::HideColumn => app.hide_column(None),
        Action::OpenFilterPrompt => {
            let current = app.doc.view_state().filter.clone();
            open_prompt(app, &format!("filter {}", current));
        }

        Action::InsertRowAbove => app.insert_row_above(),
        Action::InsertRowBelow => app.insert_row_below(),
        Action::DeleteRow => app.delete_row(),
        Action::DuplicateRow => app.duplicate_row(),
        Action::InsertColumn => app.insert_column(),
        Action::DeleteColumn => app.delete_column(),
        Action::ClearAll => app.request_clear_all(),

        Action::Move(dx, dy) => app.move_cursor(dx, dy),
        Action::Extend(dx, dy) => app.extend_selection(dx, dy),
        Action::NextCell => app.navigate(Nav::Tab),
        Action::PrevCell => app.navigate(Nav::BackTab),
        Action::Page(dir) => {
            let delta = app.visible_rows as i32 * dir;
            app.move_cursor(0, delta);
        }
        Action::HomeCol => app.home_col(),
        Action::EndCol => app.end_col(),
        Action::GotoFirst => app.goto_first(),
        Action::GotoLast => app.goto_last(),
        Action::OpenGotoPrompt => open_prompt(app, "goto "),

        Action::IncColWidth => app.increase_column_width(),
        Action::DecColWidth => app.decrease_column_width(),
        Action::Save => {
            app.save_file(None);
        }
        Action::ShowHelp => app.open_help(),
    }
    ApplyResult::Continue
}

pub fn handle_edit_text(app: &mut App, key: event::KeyEvent) {
    handle_text_input(&mut app.edit_buffer, &mut app.edit_cursor, key);
}

pub fn handle_command_text(app: &mut App, key: event::KeyEvent) {
    handle_text_input(&mut app.command_buffer, &mut app.command_cursor, key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use gridpad_engine::engine::CellRef;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn text_input_is_utf8_aware() {
        let mut buffer = String::new();
        let mut cursor = 0;
        for c in ['é', 'x'] {
            handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Char(c)));
        }
        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Left));
        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Backspace));
        assert_eq!(buffer, "x");
        assert_eq!(cursor, 0);

        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Delete));
        assert_eq!(buffer, "");
    }

    #[test]
    fn visual_bold_applies_to_range_and_returns_to_normal() {
        let mut app = App::default();
        apply_action(&mut app, Action::EnterVisual);
        apply_action(&mut app, Action::Extend(1, 1));
        apply_action(&mut app, Action::ToggleBold);

        assert_eq!(app.mode, Mode::Normal);
        assert!(app.doc.selection().range.is_some());
        for (r, c) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            assert!(app.doc.grid().cell(r, c).unwrap().format.is_bold());
        }
        assert_eq!(app.doc.history().undo_len(), 1);
    }

    #[test]
    fn escape_in_normal_cancels_painter() {
        let mut app = App::default();
        apply_action(&mut app, Action::CopyFormat);
        assert!(app.doc.painter().is_active());
        apply_action(&mut app, Action::Cancel);
        assert!(!app.doc.painter().is_active());
    }

    #[test]
    fn change_cell_then_commit_next_moves_right() {
        let mut app = App::default();
        app.doc.set_value(CellRef::new(0, 0), "old").unwrap();
        apply_action(&mut app, Action::ChangeCell);
        assert_eq!(app.edit_buffer, "");
        app.edit_buffer = "new".to_string();
        apply_action(&mut app, Action::CommitEditNext);
        assert_eq!(app.doc.display_value(0, 0), Some("new"));
        assert_eq!(app.cursor(), Some(CellRef::new(0, 1)));
    }

    #[test]
    fn quit_action_respects_unsaved_changes() {
        let mut app = App::default();
        assert_eq!(apply_action(&mut app, Action::Quit), ApplyResult::Quit);
        app.doc.set_value(CellRef::new(0, 0), "x").unwrap();
        assert_eq!(apply_action(&mut app, Action::Quit), ApplyResult::Continue);
    }

    #[test]
    fn filter_prompt_is_prefilled() {
        let mut app = App::default();
        app.doc.set_filter("abc");
        apply_action(&mut app, Action::OpenFilterPrompt);
        assert_eq!(app.mode, Mode::Command);
        assert_eq!(app.command_buffer, "filter abc");
        assert_eq!(app.command_cursor, app.command_buffer.len());
    }

    #[test]
    fn clear_all_goes_through_confirm() {
        let mut app = App::default();
        app.doc.set_value(CellRef::new(0, 0), "x").unwrap();
        apply_action(&mut app, Action::ClearAll);
        assert_eq!(app.mode, Mode::Confirm);
        apply_action(&mut app, Action::Cancel);
        assert_eq!(app.status_message, "Cancelled");
        assert_eq!(app.doc.display_value(0, 0), Some("x"));
    }
}
