//! Format engine: attribute toggles, color tokens, and the format painter.
//!
//! Every function returns a new [`Cell`]; the input cell is never modified, so a
//! caller holding the old value (a history snapshot, for instance) keeps it intact.

use serde::Deserialize;

use super::cell::{Cell, ColorKey, Format, FormatAttr, ToggleAttr};

/// Flip a boolean attribute. An unset attribute counts as `false`.
pub fn toggle_attribute(cell: &Cell, attr: ToggleAttr) -> Cell {
    let mut format = cell.format.clone();
    let next = !format.flag(attr);
    format.set_flag(attr, next);
    cell.with_format(format)
}

/// Set the text or background color token. Last write wins.
pub fn set_color_attribute(cell: &Cell, key: ColorKey, token: &str) -> Cell {
    let mut format = cell.format.clone();
    format.set_color(key, token);
    cell.with_format(format)
}

/// Drop every attribute, keeping the value.
pub fn clear_format(cell: &Cell) -> Cell {
    cell.with_format(Format::default())
}

/// Merge one [`FormatAttr`] edit into a cell.
pub fn apply_attr(cell: &Cell, attr: &FormatAttr) -> Cell {
    match attr {
        FormatAttr::Bold => toggle_attribute(cell, ToggleAttr::Bold),
        FormatAttr::Italic => toggle_attribute(cell, ToggleAttr::Italic),
        FormatAttr::Color(token) => set_color_attribute(cell, ColorKey::Text, token),
        FormatAttr::Background(token) => set_color_attribute(cell, ColorKey::Background, token),
    }
}

/// A format captured by the painter. Holds values, never a link to the source cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaintState {
    pub format: Format,
}

/// Single-use copy/apply of a cell format.
#[derive(Clone, Debug, Default)]
pub struct FormatPainter {
    state: Option<PaintState>,
}

impl FormatPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the format of `cell`, replacing anything captured earlier.
    pub fn copy(&mut self, cell: &Cell) {
        self.state = Some(PaintState {
            format: cell.format.clone(),
        });
    }

    /// Overwrite `target`'s format with the captured one and consume the paint state.
    /// Returns `None` when nothing is captured.
    pub fn apply(&mut self, target: &Cell) -> Option<Cell> {
        let state = self.state.take()?;
        Some(target.with_format(state.format))
    }

    pub fn cancel(&mut self) {
        self.state = None;
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&PaintState> {
        self.state.as_ref()
    }
}

/// A named color token.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorToken {
    pub name: String,
    pub hex: String,
}

impl ColorToken {
    fn new(name: &str, hex: &str) -> Self {
        ColorToken {
            name: name.to_string(),
            hex: hex.to_string(),
        }
    }
}

/// An ordered list of color tokens offered for one [`ColorKey`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    tokens: Vec<ColorToken>,
}

impl Palette {
    pub fn new(tokens: Vec<ColorToken>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Palette { tokens })
        }
    }

    pub fn default_text() -> Self {
        Palette {
            tokens: vec![
                ColorToken::new("default", "#111827"),
                ColorToken::new("red", "#ef4444"),
                ColorToken::new("orange", "#f59e42"),
                ColorToken::new("yellow", "#eab308"),
                ColorToken::new("green", "#22c55e"),
                ColorToken::new("blue", "#3b82f6"),
                ColorToken::new("purple", "#a21caf"),
            ],
        }
    }

    pub fn default_background() -> Self {
        Palette {
            tokens: vec![
                ColorToken::new("default", "#ffffff"),
                ColorToken::new("red", "#fee2e2"),
                ColorToken::new("yellow", "#fef9c3"),
                ColorToken::new("green", "#bbf7d0"),
                ColorToken::new("blue", "#dbeafe"),
                ColorToken::new("purple", "#ede9fe"),
            ],
        }
    }

    pub fn tokens(&self) -> &[ColorToken] {
        &self.tokens
    }

    /// Look a token up by name (case-insensitive) or by hex value.
    pub fn find(&self, name_or_hex: &str) -> Option<&ColorToken> {
        self.tokens.iter().find(|t| {
            t.name.eq_ignore_ascii_case(name_or_hex) || t.hex.eq_ignore_ascii_case(name_or_hex)
        })
    }

    /// The token after `current` (by hex), wrapping around. Unknown or unset values
    /// start at the second entry so the first press always changes something visible.
    pub fn next_after(&self, current: Option<&str>) -> &ColorToken {
        let idx = current
            .and_then(|hex| {
                self.tokens
                    .iter()
                    .position(|t| t.hex.eq_ignore_ascii_case(hex))
            })
            .unwrap_or(0);
        &self.tokens[(idx + 1) % self.tokens.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_attribute_flips_and_defaults_to_false() {
        let cell = Cell::new_text("a");
        let bold = toggle_attribute(&cell, ToggleAttr::Bold);
        assert_eq!(bold.format.bold, Some(true));
        let unbold = toggle_attribute(&bold, ToggleAttr::Bold);
        assert_eq!(unbold.format.bold, Some(false));
        // Source untouched.
        assert_eq!(cell.format.bold, None);
        assert_eq!(bold.format.bold, Some(true));
    }

    #[test]
    fn test_toggle_keeps_other_attributes() {
        let cell = set_color_attribute(&Cell::new_text("a"), ColorKey::Text, "#ef4444");
        let italic = toggle_attribute(&cell, ToggleAttr::Italic);
        assert_eq!(italic.format.color.as_deref(), Some("#ef4444"));
        assert!(italic.format.is_italic());
        assert_eq!(italic.value, "a");
    }

    #[test]
    fn test_set_color_last_write_wins() {
        let cell = Cell::new_text("a");
        let red = set_color_attribute(&cell, ColorKey::Background, "#fee2e2");
        let blue = set_color_attribute(&red, ColorKey::Background, "#dbeafe");
        assert_eq!(blue.format.background.as_deref(), Some("#dbeafe"));
    }

    #[test]
    fn test_painter_is_single_use() {
        let mut source = Cell::new_text("src");
        source.format.bold = Some(true);
        let target = Cell::new_text("dst");

        let mut painter = FormatPainter::new();
        painter.copy(&source);
        assert!(painter.is_active());

        let painted = painter.apply(&target).expect("painter was loaded");
        assert!(painted.format.is_bold());
        assert_eq!(painted.value, "dst");
        assert!(!painter.is_active());
        assert!(painter.apply(&target).is_none());
    }

    #[test]
    fn test_painter_captures_values_at_copy_time() {
        let mut source = Cell::new_text("src");
        source.format.italic = Some(true);

        let mut painter = FormatPainter::new();
        painter.copy(&source);
        source.format.italic = Some(false);
        source.format.color = Some("#ef4444".to_string());

        let painted = painter.apply(&Cell::new_text("dst")).expect("loaded");
        assert!(painted.format.is_italic());
        assert_eq!(painted.format.color, None);
    }

    #[test]
    fn test_painter_overwrites_target_format() {
        let mut target = Cell::new_text("dst");
        target.format.background = Some("#fee2e2".to_string());
        let mut painter = FormatPainter::new();
        painter.copy(&Cell::new_text("plain"));
        let painted = painter.apply(&target).expect("loaded");
        assert!(painted.format.is_empty());
    }

    #[test]
    fn test_palette_cycles() {
        let palette = Palette::default_text();
        assert_eq!(palette.next_after(None).name, "red");
        assert_eq!(palette.next_after(Some("#ef4444")).name, "orange");
        assert_eq!(palette.next_after(Some("#a21caf")).name, "default");
        assert_eq!(palette.find("Blue").map(|t| t.hex.as_str()), Some("#3b82f6"));
        assert!(Palette::new(Vec::new()).is_none());
    }
}
