use crate::tui::app::Mode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Available keybinding schemes.
///
/// - [`Vim`](Keymap::Vim): hjkl navigation, `:` commands, modal editing
/// - [`Basic`](Keymap::Basic): arrow keys, Ctrl shortcuts, type-to-edit
/// - [`Custom`](Keymap::Custom): overrides from the config file layered on a built-in
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Keymap {
    Vim,
    Basic,
    Custom(CustomKeymap),
}

/// The built-in scheme a custom keymap falls back to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseKeymap {
    Vim,
    Basic,
}

impl BaseKeymap {
    pub fn name(self) -> &'static str {
        match self {
            BaseKeymap::Vim => "vim",
            BaseKeymap::Basic => "basic",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "vim" => Some(BaseKeymap::Vim),
            "basic" => Some(BaseKeymap::Basic),
            _ => None,
        }
    }
}

impl Keymap {
    pub fn name(&self) -> &str {
        match self {
            Keymap::Vim => "vim",
            Keymap::Basic => "basic",
            Keymap::Custom(custom) => &custom.name,
        }
    }

    pub fn base(&self) -> BaseKeymap {
        match self {
            Keymap::Vim => BaseKeymap::Vim,
            Keymap::Basic => BaseKeymap::Basic,
            Keymap::Custom(custom) => custom.base,
        }
    }

    pub fn status_hint(&self) -> String {
        match self {
            Keymap::Vim => {
                "hjkl:move  i:edit  v:visual  B/I:bold/italic  f/F:color  s:sort  /:filter  u:undo  :w:save  ?:help".to_string()
            }
            Keymap::Basic => {
                "arrows:move  type:edit  S-arrows:select  C-b:bold  C-z/C-y:undo/redo  C-f:filter  C-s:save  F1:help".to_string()
            }
            Keymap::Custom(custom) => {
                format!(
                    "custom keymap on {}  :help for bindings",
                    custom.base.name()
                )
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomKeymap {
    pub name: String,
    pub base: BaseKeymap,
    pub bindings: KeymapBindings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeymapBindings {
    pub normal: Vec<Binding>,
    pub visual: Vec<Binding>,
    pub edit: Vec<Binding>,
    pub command: Vec<Binding>,
}

impl KeymapBindings {
    pub fn len(&self) -> usize {
        self.normal.len() + self.visual.len() + self.edit.len() + self.command.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn for_mode(&self, mode: Mode) -> &[Binding] {
        match mode {
            Mode::Normal => &self.normal,
            Mode::Visual => &self.visual,
            Mode::Edit => &self.edit,
            Mode::Command => &self.command,
            Mode::Confirm => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub combo: KeyCombo,
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    fn matches(&self, key: KeyEvent) -> bool {
        if self.code != key.code {
            return false;
        }
        if self.modifiers.is_empty() {
            return true;
        }
        key.modifiers.contains(self.modifiers)
    }

    pub fn display(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("C");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("M");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("S");
        }
        let key = match self.code {
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            _ => "Unknown".to_string(),
        };
        if parts.is_empty() {
            key
        } else {
            format!("{}-{}", parts.join("-"), key)
        }
    }
}

impl CustomKeymap {
    /// Look the key up in the overrides, modified combos first.
    pub(crate) fn lookup(&self, mode: Mode, key: KeyEvent) -> Option<Action> {
        let bindings = self.bindings.for_mode(mode);
        bindings
            .iter()
            .filter(|binding| !binding.combo.modifiers.is_empty())
            .find(|binding| binding.combo.matches(key))
            .or_else(|| {
                bindings
                    .iter()
                    .filter(|binding| binding.combo.modifiers.is_empty())
                    .find(|binding| binding.combo.matches(key))
            })
            .map(|binding| binding.action.clone())
    }
}

/// Actions that can be triggered by key presses.
///
/// The keymap translates key events into actions, which are then applied to the
/// application state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Leave the current mode, or drop the range / pending paint in Normal mode.
    Cancel,
    /// Edit the current cell, starting from its value.
    EnterEdit,
    /// Edit the current cell, starting from an empty buffer.
    ChangeCell,
    /// Commit the edit and move down.
    CommitEdit,
    /// Commit the edit and move right (wrapping to the next row).
    CommitEditNext,
    EnterCommand,
    ExecuteCommand,
    EnterVisual,
    ExitVisual,
    /// Answer "yes" to a pending confirmation.
    Confirm,
    Quit,

    Undo,
    Redo,
    /// Blank the values of the selected cells.
    ClearCell,
    ClearFormat,
    ToggleBold,
    ToggleItalic,
    /// Step the text color of the selection through the palette.
    CycleColor,
    /// Step the background color of the selection through the palette.
    CycleBackground,
    CopyFormat,
    PaintFormat,

    SortColumn,
    HideColumn,
    OpenFilterPrompt,

    InsertRowAbove,
    InsertRowBelow,
    DeleteRow,
    DuplicateRow,
    InsertColumn,
    DeleteColumn,
    /// Ask for confirmation, then blank the whole grid.
    ClearAll,

    /// Move cursor by (dx, dy).
    Move(i32, i32),
    /// Grow the range from the cursor by (dx, dy).
    Extend(i32, i32),
    NextCell,
    PrevCell,
    /// Page up (-1) or down (+1).
    Page(i32),
    HomeCol,
    EndCol,
    GotoFirst,
    GotoLast,
    OpenGotoPrompt,

    IncColWidth,
    DecColWidth,
    Save,
    ShowHelp,
}
