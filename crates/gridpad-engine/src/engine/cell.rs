//! Cell data structures for the grid.
//!
//! - [`Cell`] - A text value plus its [`Format`]
//! - [`Format`] - Optional style attributes; `None` means "inherit default rendering"
//! - [`FormatAttr`], [`ToggleAttr`], [`ColorKey`] - Attribute selectors used by format edits
//!
//! Cells own their format outright. Cloning a cell (row duplication, history snapshots,
//! format painting) always produces independent format storage.

/// Style attributes of a cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Format {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Text color token (e.g. `#ef4444`).
    pub color: Option<String>,
    /// Background color token.
    pub background: Option<String>,
}

impl Format {
    /// True when no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.bold.is_none()
            && self.italic.is_none()
            && self.color.is_none()
            && self.background.is_none()
    }

    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }

    /// Current value of a boolean attribute, defaulting to `false`.
    pub fn flag(&self, attr: ToggleAttr) -> bool {
        match attr {
            ToggleAttr::Bold => self.is_bold(),
            ToggleAttr::Italic => self.is_italic(),
        }
    }

    pub fn set_flag(&mut self, attr: ToggleAttr, value: bool) {
        match attr {
            ToggleAttr::Bold => self.bold = Some(value),
            ToggleAttr::Italic => self.italic = Some(value),
        }
    }

    pub fn color_of(&self, key: ColorKey) -> Option<&str> {
        match key {
            ColorKey::Text => self.color.as_deref(),
            ColorKey::Background => self.background.as_deref(),
        }
    }

    pub fn set_color(&mut self, key: ColorKey, token: &str) {
        let slot = match key {
            ColorKey::Text => &mut self.color,
            ColorKey::Background => &mut self.background,
        };
        *slot = Some(token.to_string());
    }
}

/// Boolean style attributes (toggle semantics).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToggleAttr {
    Bold,
    Italic,
}

/// Color style attributes (last write wins).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorKey {
    Text,
    Background,
}

/// A single attribute edit merged into a cell's format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatAttr {
    Bold,
    Italic,
    Color(String),
    Background(String),
}

impl From<ToggleAttr> for FormatAttr {
    fn from(attr: ToggleAttr) -> Self {
        match attr {
            ToggleAttr::Bold => FormatAttr::Bold,
            ToggleAttr::Italic => FormatAttr::Italic,
        }
    }
}

/// A cell in the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub value: String,
    pub format: Format,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell::default()
    }

    pub fn new_text(text: &str) -> Cell {
        Cell {
            value: text.to_string(),
            format: Format::default(),
        }
    }

    /// True when the value contains something other than whitespace.
    pub fn is_filled(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Same value with the given format.
    pub fn with_format(&self, format: Format) -> Cell {
        Cell {
            value: self.value.clone(),
            format,
        }
    }
}
