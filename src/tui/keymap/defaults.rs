use crate::tui::app::Mode;
use crate::tui::keymap::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys shared by every scheme outside Normal/Visual mode.
fn translate_prompt(mode: Mode, key: KeyEvent) -> Option<Action> {
    match mode {
        Mode::Edit => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::CommitEdit),
            KeyCode::Tab => Some(Action::CommitEditNext),
            _ => None,
        },
        Mode::Command => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::ExecuteCommand),
            _ => None,
        },
        Mode::Confirm => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Confirm),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        Mode::Normal | Mode::Visual => None,
    }
}

pub(crate) fn translate_vim(mode: Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match mode {
        Mode::Normal => match key.code {
            KeyCode::Char('u') => Some(Action::Undo),
            KeyCode::Char('r') if ctrl => Some(Action::Redo),
            KeyCode::Char('s') if ctrl => Some(Action::Save),

            KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(0, -1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(0, 1)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(-1, 0)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(1, 0)),
            KeyCode::Tab => Some(Action::NextCell),
            KeyCode::BackTab => Some(Action::PrevCell),

            KeyCode::PageUp => Some(Action::Page(-1)),
            KeyCode::PageDown => Some(Action::Page(1)),
            KeyCode::Home | KeyCode::Char('0') => Some(Action::HomeCol),
            KeyCode::End | KeyCode::Char('$') => Some(Action::EndCol),
            KeyCode::Char('g') => Some(Action::GotoFirst),
            KeyCode::Char('G') => Some(Action::GotoLast),

            KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('a') => Some(Action::EnterEdit),
            KeyCode::Char('S') => Some(Action::ChangeCell),
            KeyCode::Char('x') | KeyCode::Delete => Some(Action::ClearCell),
            KeyCode::Char('v') => Some(Action::EnterVisual),
            KeyCode::Esc => Some(Action::Cancel),

            KeyCode::Char('B') => Some(Action::ToggleBold),
            KeyCode::Char('I') => Some(Action::ToggleItalic),
            KeyCode::Char('f') => Some(Action::CycleColor),
            KeyCode::Char('F') => Some(Action::CycleBackground),
            KeyCode::Char('X') => Some(Action::ClearFormat),
            KeyCode::Char('y') => Some(Action::CopyFormat),
            KeyCode::Char('p') => Some(Action::PaintFormat),

            KeyCode::Char('s') => Some(Action::SortColumn),
            KeyCode::Char('H') => Some(Action::HideColumn),
            KeyCode::Char('/') => Some(Action::OpenFilterPrompt),

            KeyCode::Char('o') => Some(Action::InsertRowBelow),
            KeyCode::Char('O') => Some(Action::InsertRowAbove),
            KeyCode::Char('D') => Some(Action::DeleteRow),
            KeyCode::Char('Y') => Some(Action::DuplicateRow),

            KeyCode::Char('+') | KeyCode::Char('>') => Some(Action::IncColWidth),
            KeyCode::Char('-') | KeyCode::Char('<') => Some(Action::DecColWidth),
            KeyCode::Char(':') => Some(Action::EnterCommand),
            KeyCode::Char('?') => Some(Action::ShowHelp),
            _ => None,
        },

        Mode::Visual => match key.code {
            KeyCode::Esc | KeyCode::Char('v') => Some(Action::ExitVisual),

            KeyCode::Up | KeyCode::Char('k') => Some(Action::Extend(0, -1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Extend(0, 1)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Extend(-1, 0)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Extend(1, 0)),

            KeyCode::Char('x') | KeyCode::Delete => Some(Action::ClearCell),
            KeyCode::Char('B') => Some(Action::ToggleBold),
            KeyCode::Char('I') => Some(Action::ToggleItalic),
            KeyCode::Char('f') => Some(Action::CycleColor),
            KeyCode::Char('F') => Some(Action::CycleBackground),
            KeyCode::Char('X') => Some(Action::ClearFormat),
            KeyCode::Char(':') => Some(Action::EnterCommand),
            _ => None,
        },

        Mode::Edit | Mode::Command | Mode::Confirm => translate_prompt(mode, key),
    }
}

pub(crate) fn translate_basic(mode: Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match mode {
        Mode::Normal | Mode::Visual => match key.code {
            KeyCode::Esc => Some(Action::Cancel),

            // Selection
            KeyCode::Up if shift => Some(Action::Extend(0, -1)),
            KeyCode::Down if shift => Some(Action::Extend(0, 1)),
            KeyCode::Left if shift => Some(Action::Extend(-1, 0)),
            KeyCode::Right if shift => Some(Action::Extend(1, 0)),

            // Movement
            KeyCode::Up => Some(Action::Move(0, -1)),
            KeyCode::Down => Some(Action::Move(0, 1)),
            KeyCode::Left => Some(Action::Move(-1, 0)),
            KeyCode::Right => Some(Action::Move(1, 0)),
            KeyCode::Tab => Some(Action::NextCell),
            KeyCode::BackTab => Some(Action::PrevCell),
            KeyCode::PageUp => Some(Action::Page(-1)),
            KeyCode::PageDown => Some(Action::Page(1)),
            KeyCode::Home if ctrl => Some(Action::GotoFirst),
            KeyCode::End if ctrl => Some(Action::GotoLast),
            KeyCode::Home => Some(Action::HomeCol),
            KeyCode::End => Some(Action::EndCol),
            KeyCode::Char('g') if ctrl => Some(Action::OpenGotoPrompt),

            // Edit
            KeyCode::Enter | KeyCode::F(2) => Some(Action::EnterEdit),
            KeyCode::Delete | KeyCode::Backspace => Some(Action::ClearCell),
            KeyCode::Char('z') if ctrl => Some(Action::Undo),
            KeyCode::Char('y') if ctrl => Some(Action::Redo),

            // Format
            KeyCode::Char('b') if ctrl => Some(Action::ToggleBold),
            KeyCode::Char('i') if alt => Some(Action::ToggleItalic),
            KeyCode::Char('f') if alt => Some(Action::CycleColor),
            KeyCode::Char('b') if alt => Some(Action::CycleBackground),
            KeyCode::Char('x') if alt => Some(Action::ClearFormat),
            KeyCode::Char('c') if alt => Some(Action::CopyFormat),
            KeyCode::Char('v') if alt => Some(Action::PaintFormat),

            // View
            KeyCode::Char('f') if ctrl => Some(Action::OpenFilterPrompt),
            KeyCode::Char('s') if alt => Some(Action::SortColumn),
            KeyCode::Char('h') if alt => Some(Action::HideColumn),

            // Rows
            KeyCode::Char('o') if alt => Some(Action::InsertRowBelow),
            KeyCode::Char('d') if alt => Some(Action::DuplicateRow),

            // File / app
            KeyCode::Char('s') if ctrl => Some(Action::Save),
            KeyCode::Char('p') if ctrl => Some(Action::EnterCommand),
            KeyCode::Char('q') if ctrl => Some(Action::Quit),
            KeyCode::F(1) => Some(Action::ShowHelp),
            _ => None,
        },

        Mode::Edit | Mode::Command | Mode::Confirm => translate_prompt(mode, key),
    }
}
