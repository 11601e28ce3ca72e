use super::{Action, BaseKeymap, Binding, CustomKeymap, KeyCombo, Keymap, KeymapBindings};
use crossterm::event::{KeyCode, KeyModifiers};
use serde::Deserialize;
use std::collections::BTreeMap;

const MAX_BINDINGS_PER_MODE: usize = 512;
const MAX_TOTAL_BINDINGS: usize = 1_024;

/// The `[keys.*]` tables of the config file: key combo -> action name, per mode.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct KeyOverrides {
    pub normal: BTreeMap<String, String>,
    pub visual: BTreeMap<String, String>,
    pub edit: BTreeMap<String, String>,
    pub command: BTreeMap<String, String>,
}

impl KeyOverrides {
    pub fn is_empty(&self) -> bool {
        self.normal.is_empty()
            && self.visual.is_empty()
            && self.edit.is_empty()
            && self.command.is_empty()
    }
}

/// Resolve the keymap to run with.
///
/// `requested` names a built-in scheme (`vim` or `basic`); unknown names fall back to
/// `vim` with a warning. Non-empty `overrides` produce a [`Keymap::Custom`] on top of that
/// scheme. Any invalid override discards all overrides, again with warnings.
pub fn build_keymap(requested: Option<&str>, overrides: &KeyOverrides) -> (Keymap, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let requested = requested.map(str::trim).filter(|s| !s.is_empty());
    let base = match requested {
        None => BaseKeymap::Vim,
        Some(name) => BaseKeymap::from_name(name).unwrap_or_else(|| {
            warnings.push(format!(
                "Unknown keymap '{}'; falling back to built-in 'vim'",
                name
            ));
            BaseKeymap::Vim
        }),
    };
    let builtin = match base {
        BaseKeymap::Vim => Keymap::Vim,
        BaseKeymap::Basic => Keymap::Basic,
    };

    if overrides.is_empty() {
        return (builtin, warnings);
    }

    match build_custom_keymap(base, overrides) {
        Ok(custom) => (Keymap::Custom(custom), warnings),
        Err(errs) => {
            warnings.extend(errs);
            warnings.push(format!(
                "Ignoring [keys] overrides; using built-in '{}'",
                base.name()
            ));
            (builtin, warnings)
        }
    }
}

fn build_custom_keymap(
    base: BaseKeymap,
    overrides: &KeyOverrides,
) -> Result<CustomKeymap, Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    let bindings = KeymapBindings {
        normal: parse_mode_bindings("normal", &overrides.normal, &mut errors),
        visual: parse_mode_bindings("visual", &overrides.visual, &mut errors),
        edit: parse_mode_bindings("edit", &overrides.edit, &mut errors),
        command: parse_mode_bindings("command", &overrides.command, &mut errors),
    };
    if bindings.len() > MAX_TOTAL_BINDINGS {
        errors.push(format!(
            "Too many total bindings: {} (max {})",
            bindings.len(),
            MAX_TOTAL_BINDINGS
        ));
    }

    if errors.is_empty() {
        Ok(CustomKeymap {
            name: format!("{}+keys", base.name()),
            base,
            bindings,
        })
    } else {
        Err(errors)
    }
}

fn parse_mode_bindings(
    mode: &str,
    raw: &BTreeMap<String, String>,
    errors: &mut Vec<String>,
) -> Vec<Binding> {
    let mut bindings: Vec<Binding> = Vec::new();
    if raw.len() > MAX_BINDINGS_PER_MODE {
        errors.push(format!(
            "Too many {} bindings: {} (max {})",
            mode,
            raw.len(),
            MAX_BINDINGS_PER_MODE
        ));
        return bindings;
    }
    for (combo_str, action_str) in raw {
        match (parse_key_combo(combo_str), action_from_str(action_str)) {
            (Ok(combo), Some(action)) => {
                if bindings.iter().any(|binding| binding.combo == combo) {
                    errors.push(format!(
                        "Duplicate key '{}' in {} bindings",
                        combo.display(),
                        mode
                    ));
                    continue;
                }
                bindings.push(Binding { combo, action });
            }
            (Ok(_), None) => errors.push(format!(
                "Invalid action '{}' in {} bindings",
                action_str, mode
            )),
            (Err(err), _) => errors.push(format!(
                "Invalid key '{}' in {} bindings: {}",
                combo_str, mode, err
            )),
        }
    }
    bindings
}

fn parse_key_combo(input: &str) -> Result<KeyCombo, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty key".to_string());
    }
    if let Some(ch) = parse_single_char(trimmed) {
        return Ok(KeyCombo {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::empty(),
        });
    }

    let (mods, key_part) = if !trimmed.contains('-') {
        (KeyModifiers::empty(), trimmed)
    } else if let Some(mod_str) = trimmed.strip_suffix('-') {
        let mod_str = mod_str.trim_end_matches('-');
        if mod_str.is_empty() {
            return Err("missing modifier before '-'".to_string());
        }
        (parse_modifiers(mod_str)?, "-")
    } else {
        let mut split = trimmed.rsplitn(2, '-');
        let key_part = split.next().ok_or_else(|| "empty key".to_string())?;
        let mod_str = split.next().unwrap_or_default();
        (parse_modifiers(mod_str)?, key_part)
    };

    Ok(KeyCombo {
        code: parse_key_code(key_part)?,
        modifiers: mods,
    })
}

fn parse_modifiers(input: &str) -> Result<KeyModifiers, String> {
    let mut modifiers = KeyModifiers::empty();
    for part in input.split('-') {
        let raw = part.trim();
        if raw.is_empty() {
            return Err("empty modifier segment".to_string());
        }
        let flag = match raw.to_ascii_lowercase().as_str() {
            "c" | "ctrl" | "control" => KeyModifiers::CONTROL,
            "m" | "alt" | "meta" => KeyModifiers::ALT,
            "s" | "shift" => KeyModifiers::SHIFT,
            _ => return Err(format!("unknown modifier '{}'", part)),
        };
        if modifiers.contains(flag) {
            return Err(format!("duplicate modifier '{}'", raw));
        }
        modifiers.insert(flag);
    }
    Ok(modifiers)
}

fn parse_key_code(input: &str) -> Result<KeyCode, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty key".to_string());
    }
    if let Some(ch) = parse_single_char(trimmed) {
        return Ok(KeyCode::Char(ch));
    }
    let norm = trimmed.to_ascii_lowercase();
    if let Some(n) = norm.strip_prefix('f')
        && let Ok(n) = n.parse::<u8>()
        && (1..=12).contains(&n)
    {
        return Ok(KeyCode::F(n));
    }
    match norm.as_str() {
        "enter" => Ok(KeyCode::Enter),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "backspace" => Ok(KeyCode::Backspace),
        "delete" => Ok(KeyCode::Delete),
        "tab" => Ok(KeyCode::Tab),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" => Ok(KeyCode::PageUp),
        "pagedown" => Ok(KeyCode::PageDown),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "space" | "spc" => Ok(KeyCode::Char(' ')),
        "dash" | "minus" => Ok(KeyCode::Char('-')),
        "plus" => Ok(KeyCode::Char('+')),
        "comma" => Ok(KeyCode::Char(',')),
        "period" | "dot" => Ok(KeyCode::Char('.')),
        "slash" => Ok(KeyCode::Char('/')),
        "semicolon" => Ok(KeyCode::Char(';')),
        "equal" => Ok(KeyCode::Char('=')),
        _ => Err(format!("unknown key '{}'", input)),
    }
}

fn parse_single_char(input: &str) -> Option<char> {
    let mut chars = input.chars();
    let ch = chars.next()?;
    if chars.next().is_none() {
        Some(ch)
    } else {
        None
    }
}

fn action_from_str(input: &str) -> Option<Action> {
    match input.trim().to_ascii_lowercase().as_str() {
        "cancel" => Some(Action::Cancel),
        "enter_edit" => Some(Action::EnterEdit),
        "change_cell" => Some(Action::ChangeCell),
        "commit_edit" => Some(Action::CommitEdit),
        "commit_edit_next" => Some(Action::CommitEditNext),
        "enter_command" => Some(Action::EnterCommand),
        "execute_command" => Some(Action::ExecuteCommand),
        "enter_visual" => Some(Action::EnterVisual),
        "exit_visual" => Some(Action::ExitVisual),
        "quit" => Some(Action::Quit),
        "undo" => Some(Action::Undo),
        "redo" => Some(Action::Redo),
        "clear_cell" => Some(Action::ClearCell),
        "clear_format" => Some(Action::ClearFormat),
        "bold" => Some(Action::ToggleBold),
        "italic" => Some(Action::ToggleItalic),
        "cycle_color" => Some(Action::CycleColor),
        "cycle_background" => Some(Action::CycleBackground),
        "copy_format" => Some(Action::CopyFormat),
        "paint_format" => Some(Action::PaintFormat),
        "sort_column" => Some(Action::SortColumn),
        "hide_column" => Some(Action::HideColumn),
        "open_filter" => Some(Action::OpenFilterPrompt),
        "insert_row_above" => Some(Action::InsertRowAbove),
        "insert_row_below" => Some(Action::InsertRowBelow),
        "delete_row" => Some(Action::DeleteRow),
        "duplicate_row" => Some(Action::DuplicateRow),
        "insert_column" => Some(Action::InsertColumn),
        "delete_column" => Some(Action::DeleteColumn),
        "clear_all" => Some(Action::ClearAll),
        "move_left" => Some(Action::Move(-1, 0)),
        "move_right" => Some(Action::Move(1, 0)),
        "move_up" => Some(Action::Move(0, -1)),
        "move_down" => Some(Action::Move(0, 1)),
        "extend_left" => Some(Action::Extend(-1, 0)),
        "extend_right" => Some(Action::Extend(1, 0)),
        "extend_up" => Some(Action::Extend(0, -1)),
        "extend_down" => Some(Action::Extend(0, 1)),
        "next_cell" => Some(Action::NextCell),
        "prev_cell" => Some(Action::PrevCell),
        "page_up" => Some(Action::Page(-1)),
        "page_down" => Some(Action::Page(1)),
        "home_col" => Some(Action::HomeCol),
        "end_col" => Some(Action::EndCol),
        "goto_first" => Some(Action::GotoFirst),
        "goto_last" => Some(Action::GotoLast),
        "open_goto" => Some(Action::OpenGotoPrompt),
        "inc_col_width" => Some(Action::IncColWidth),
        "dec_col_width" => Some(Action::DecColWidth),
        "save" => Some(Action::Save),
        "help" => Some(Action::ShowHelp),
        _ => None,
    }
}
