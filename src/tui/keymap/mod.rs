//! Keymap translation layer.
//!
//! This keeps key handling separate from app behavior.
//! - Vim keymap is modal: letters are commands in Normal mode.
//! - Basic keymap is spreadsheet-like: printable keys start an edit.
//! - Custom keymaps override single keys on top of either built-in.

mod defaults;
mod parse;
mod types;

pub use parse::{KeyOverrides, build_keymap};
pub use types::{Action, BaseKeymap, Binding, CustomKeymap, KeyCombo, Keymap, KeymapBindings};

use crate::tui::app::Mode;
use crossterm::event::KeyEvent;

/// Translate a key event to an action based on the current keymap and mode.
///
/// Returns `None` if the key has no binding in the current context.
pub fn translate(keymap: &Keymap, mode: Mode, key: KeyEvent) -> Option<Action> {
    match keymap {
        Keymap::Vim => defaults::translate_vim(mode, key),
        Keymap::Basic => defaults::translate_basic(mode, key),
        Keymap::Custom(custom) => custom.lookup(mode, key).or_else(|| match custom.base {
            BaseKeymap::Vim => defaults::translate_vim(mode, key),
            BaseKeymap::Basic => defaults::translate_basic(mode, key),
        }),
    }
}
