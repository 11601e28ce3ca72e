//! Help text content for the help modal

use super::keymap::{Action, BaseKeymap, Binding, CustomKeymap, Keymap};

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|s| s.to_string()).collect()
}

fn vim_help() -> Vec<String> {
    lines(&[
        "Navigation:",
        "  h/j/k/l      Move left/down/up/right",
        "  Tab/S-Tab    Next/previous cell",
        "  PageUp/Down  Scroll by page",
        "  0 / $        First/last column",
        "  g / G        First/last row",
        "",
        "Editing:",
        "  i / Enter    Edit cell",
        "  S            Replace cell contents",
        "  x / Delete   Clear cell or range",
        "  Esc          Cancel edit, drop range",
        "  u / Ctrl+r   Undo / redo",
        "",
        "Selection:",
        "  v            Visual mode (hjkl grows the range)",
        "  Mouse drag   Select a range",
        "",
        "Format:",
        "  B / I        Toggle bold / italic",
        "  f / F        Cycle text / background color",
        "  X            Clear format",
        "  y / p        Copy format / paint it",
        "",
        "View:",
        "  s            Sort by column (again to flip)",
        "  H            Hide column",
        "  /            Filter rows",
        "",
        "Rows:",
        "  o / O        Insert row below / above",
        "  D            Delete row",
        "  Y            Duplicate row",
        "",
        "Other:",
        "  :            Enter command mode",
        "  +/-          Adjust column width",
        "  Ctrl+s       Save",
        "  ?            This help",
    ])
}

fn basic_help() -> Vec<String> {
    lines(&[
        "Navigation:",
        "  Arrow keys   Move cursor",
        "  Tab/S-Tab    Next/previous cell",
        "  PageUp/Down  Scroll by page",
        "  Home/End     First/last column",
        "  C-Home/C-End First/last row",
        "  C-g          Open goto prompt",
        "",
        "Editing:",
        "  Type         Replace cell contents",
        "  Enter / F2   Edit cell",
        "  Delete       Clear cell or range",
        "  C-z / C-y    Undo / redo",
        "",
        "Selection:",
        "  S-Arrows     Grow the range",
        "  Mouse drag   Select a range",
        "",
        "Format:",
        "  C-b / M-i    Toggle bold / italic",
        "  M-f / M-b    Cycle text / background color",
        "  M-x          Clear format",
        "  M-c / M-v    Copy format / paint it",
        "",
        "View:",
        "  M-s          Sort by column (again to flip)",
        "  M-h          Hide column",
        "  C-f          Filter rows",
        "",
        "Other:",
        "  M-o / M-d    Insert / duplicate row",
        "  C-p          Command prompt",
        "  C-s          Save",
        "  C-q          Quit",
        "  F1           This help",
    ])
}

/// Get keybinding help text for the current keymap
pub fn get_help_text(keymap: &Keymap) -> Vec<String> {
    match keymap {
        Keymap::Vim => vim_help(),
        Keymap::Basic => basic_help(),
        Keymap::Custom(custom) => custom_help_text(custom),
    }
}

/// Get command help text
pub fn get_commands_help() -> Vec<String> {
    lines(&[
        "Commands",
        "",
        "File:",
        "  :w [file]         Save (CSV)",
        "  :q                Quit",
        "  :q!               Force quit",
        "  :wq [file]        Save and quit",
        "  :export [file]    Write CSV (default spreadsheet.csv)",
        "  :ev <file>        Export only the displayed rows/columns",
        "  :import <file>    Import CSV (undoable)",
        "",
        "View:",
        "  :filter [text]    Show rows containing text",
        "  :cf <col> [text]  Filter one column",
        "  :nofilter         Remove all filters",
        "  :sort [col]       Sort (again to flip direction)",
        "  :nosort           Original row order",
        "  :hide [col]       Hide/show a column",
        "  :show             Show all columns",
        "",
        "Row/Column:",
        "  :ir / :dr         Insert / delete row",
        "  :dup              Duplicate row",
        "  :ic / :dc         Insert / delete column",
        "  :rename <name>    Rename current column",
        "  :clear            Clear all cells (asks first)",
        "",
        "Format:",
        "  :color [name]     Text color (or cycle)",
        "  :bg [name]        Background color (or cycle)",
        "  :clearformat      Reset format",
        "",
        "Other:",
        "  :goto <cell>      Go to cell (e.g. :goto B12)",
        "  :cw [col] <n>     Set column width",
        "  :stats            Filled cell count",
        "",
        "Press Esc or q to close",
    ])
}

fn custom_help_text(custom: &CustomKeymap) -> Vec<String> {
    let base = match custom.base {
        BaseKeymap::Vim => vim_help(),
        BaseKeymap::Basic => basic_help(),
    };
    let mut lines: Vec<String> = vec![format!("Overrides ({}):", custom.name)];
    for (mode, bindings) in [
        ("Normal", &custom.bindings.normal),
        ("Visual", &custom.bindings.visual),
        ("Edit", &custom.bindings.edit),
        ("Command", &custom.bindings.command),
    ] {
        if bindings.is_empty() {
            continue;
        }
        lines.push(format!(" {}:", mode));
        append_bindings(&mut lines, bindings);
    }
    lines.push(String::new());
    lines.push(format!("Base keymap ({}):", custom.base.name()));
    lines.extend(base);
    lines
}

fn append_bindings(lines: &mut Vec<String>, bindings: &[Binding]) {
    for binding in bindings {
        let label = action_label(&binding.action);
        lines.push(format!("  {:<12} {}", binding.combo.display(), label));
    }
}

fn action_label(action: &Action) -> &'static str {
    match action {
        Action::Cancel => "Cancel",
        Action::EnterEdit => "Edit cell",
        Action::ChangeCell => "Replace cell",
        Action::CommitEdit => "Commit edit",
        Action::CommitEditNext => "Commit and move right",
        Action::EnterCommand => "Command mode",
        Action::ExecuteCommand => "Execute command",
        Action::EnterVisual => "Visual mode",
        Action::ExitVisual => "Exit visual",
        Action::Confirm => "Confirm",
        Action::Quit => "Quit",
        Action::Undo => "Undo",
        Action::Redo => "Redo",
        Action::ClearCell => "Clear cell",
        Action::ClearFormat => "Clear format",
        Action::ToggleBold => "Toggle bold",
        Action::ToggleItalic => "Toggle italic",
        Action::CycleColor => "Cycle text color",
        Action::CycleBackground => "Cycle background",
        Action::CopyFormat => "Copy format",
        Action::PaintFormat => "Paint format",
        Action::SortColumn => "Sort by column",
        Action::HideColumn => "Hide column",
        Action::OpenFilterPrompt => "Filter prompt",
        Action::InsertRowAbove => "Insert row above",
        Action::InsertRowBelow => "Insert row below",
        Action::DeleteRow => "Delete row",
        Action::DuplicateRow => "Duplicate row",
        Action::InsertColumn => "Insert column",
        Action::DeleteColumn => "Delete column",
        Action::ClearAll => "Clear all",
        Action::Move(-1, 0) => "Move left",
        Action::Move(1, 0) => "Move right",
        Action::Move(0, -1) => "Move up",
        Action::Move(0, 1) => "Move down",
        Action::Move(_, _) => "Move",
        Action::Extend(_, _) => "Extend selection",
        Action::NextCell => "Next cell",
        Action::PrevCell => "Previous cell",
        Action::Page(-1) => "Page up",
        Action::Page(1) => "Page down",
        Action::Page(_) => "Page",
        Action::HomeCol => "First column",
        Action::EndCol => "Last column",
        Action::GotoFirst => "Go to first row",
        Action::GotoLast => "Go to last row",
        Action::OpenGotoPrompt => "Goto prompt",
        Action::IncColWidth => "Increase column width",
        Action::DecColWidth => "Decrease column width",
        Action::Save => "Save",
        Action::ShowHelp => "Help",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::keymap::{KeyOverrides, build_keymap};

    #[test]
    fn builtin_help_mentions_format_keys() {
        assert!(get_help_text(&Keymap::Vim).iter().any(|l| l.contains("B / I")));
        assert!(get_help_text(&Keymap::Basic).iter().any(|l| l.contains("C-b")));
    }

    #[test]
    fn custom_help_lists_overrides_then_base() {
        let overrides: KeyOverrides = toml::from_str("[normal]\n\"C-d\" = \"delete_row\"\n")
            .expect("valid overrides");
        let (keymap, warnings) = build_keymap(Some("basic"), &overrides);
        assert!(warnings.is_empty());

        let help = get_help_text(&keymap);
        let delete = help
            .iter()
            .position(|l| l.contains("Delete row"))
            .expect("override listed");
        let base = help
            .iter()
            .position(|l| l == "Base keymap (basic):")
            .expect("base listed");
        assert!(delete < base);
    }
}
