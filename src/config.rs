//! User configuration (`config.toml`).
//!
//! ```toml
//! [grid]
//! rows = 20
//! columns = 8
//!
//! [history]
//! limit = 100        # 0 keeps every snapshot
//!
//! [ui]
//! column_width = 14
//! keymap = "basic"
//!
//! [palette]
//! text = [{ name = "ink", hex = "#0f172a" }, { name = "alert", hex = "#dc2626" }]
//!
//! [keys.normal]
//! "C-d" = "delete_row"
//! ```
//!
//! Problems never stop the program: they are returned as warnings and the affected
//! setting keeps its default.

use crate::tui::KeyOverrides;
use directories::ProjectDirs;
use gridpad_core::DocumentOptions;
use gridpad_core::history::MAX_UNDO_STACK;
use gridpad_core::storage::CsvOptions;
use gridpad_engine::engine::{ColorToken, DEFAULT_COLS, DEFAULT_ROWS, Palette};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

pub const DEFAULT_COLUMN_WIDTH: usize = crate::tui::DEFAULT_COLUMN_WIDTH;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub grid: GridConfig,
    pub history: HistoryConfig,
    pub ui: UiConfig,
    pub palette: PaletteConfig,
    pub keys: KeyOverrides,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub rows: usize,
    pub columns: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLS,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum undo depth; 0 means unbounded.
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            limit: MAX_UNDO_STACK,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub column_width: usize,
    pub keymap: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            column_width: DEFAULT_COLUMN_WIDTH,
            keymap: None,
        }
    }
}

/// Empty lists keep the built-in palettes.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    pub text: Vec<ColorToken>,
    pub background: Vec<ColorToken>,
}

impl Config {
    pub fn document_options(&self, csv: CsvOptions) -> DocumentOptions {
        DocumentOptions {
            rows: self.grid.rows,
            cols: self.grid.columns,
            history_limit: Some(self.history.limit),
            csv,
        }
    }

    pub fn text_palette(&self) -> Palette {
        Palette::new(self.palette.text.clone()).unwrap_or_else(Palette::default_text)
    }

    pub fn background_palette(&self) -> Palette {
        Palette::new(self.palette.background.clone()).unwrap_or_else(Palette::default_background)
    }

    /// Replace out-of-range values with defaults, one warning each.
    fn validate(&mut self, warnings: &mut Vec<String>) {
        if self.grid.rows == 0 {
            warnings.push(format!("grid.rows must be at least 1; using {}", DEFAULT_ROWS));
            self.grid.rows = DEFAULT_ROWS;
        }
        if self.grid.columns == 0 {
            warnings.push(format!(
                "grid.columns must be at least 1; using {}",
                DEFAULT_COLS
            ));
            self.grid.columns = DEFAULT_COLS;
        }

        let width = self
            .ui
            .column_width
            .clamp(crate::tui::MIN_COLUMN_WIDTH, crate::tui::MAX_COLUMN_WIDTH);
        if width != self.ui.column_width {
            warnings.push(format!(
                "ui.column_width {} is out of range; using {}",
                self.ui.column_width, width
            ));
            self.ui.column_width = width;
        }

        for (section, tokens) in [
            ("palette.text", &mut self.palette.text),
            ("palette.background", &mut self.palette.background),
        ] {
            tokens.retain(|token| {
                let ok = is_hex_color(&token.hex);
                if !ok {
                    warnings.push(format!(
                        "Ignoring {} color '{}': '{}' is not #rrggbb",
                        section, token.name, token.hex
                    ));
                }
                ok
            });
        }
    }
}

fn is_hex_color(token: &str) -> bool {
    token
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gridpad").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load the config from `explicit` or the default location.
///
/// A missing default file is silent; a missing explicit file is a warning.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let path = explicit.map(Path::to_path_buf).or_else(default_config_path);
    let mut config = Config::default();

    if let Some(path) = path.as_ref() {
        if path.exists() {
            if let Some(parsed) = read_config(path, &mut warnings) {
                config = parsed;
            }
        } else if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
    }

    config.validate(&mut warnings);
    (config, warnings)
}

fn read_config(path: &Path, warnings: &mut Vec<String>) -> Option<Config> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn load_str(content: &str) -> (Config, Vec<String>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).expect("write config");
        load_config(Some(&path))
    }

    #[test]
    fn empty_file_gives_defaults() {
        let (config, warnings) = load_str("");
        assert_eq!(config, Config::default());
        assert!(warnings.is_empty());
        assert_eq!(
            config.document_options(CsvOptions::default()),
            DocumentOptions::default()
        );
    }

    #[test]
    fn full_file_is_applied() {
        let (config, warnings) = load_str(
            r##"
[grid]
rows = 3
columns = 2

[history]
limit = 0

[ui]
column_width = 20
keymap = "basic"

[palette]
text = [{ name = "ink", hex = "#0f172a" }]

[keys.normal]
"C-d" = "delete_row"
"##,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        let options = config.document_options(CsvOptions { has_header: true });
        assert_eq!(options.rows, 3);
        assert_eq!(options.cols, 2);
        assert_eq!(options.history_limit, Some(0));
        assert!(options.csv.has_header);
        assert_eq!(config.ui.keymap.as_deref(), Some("basic"));
        assert_eq!(config.text_palette().tokens()[0].name, "ink");
        assert_eq!(config.background_palette(), Palette::default_background());
        assert_eq!(config.keys.normal.len(), 1);
    }

    #[test]
    fn unknown_fields_are_rejected_with_warning() {
        let (config, warnings) = load_str("[grid]\nrowz = 4\n");
        assert_eq!(config, Config::default());
        assert!(warnings.iter().any(|w| w.starts_with("Failed to parse")));
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let (config, warnings) = load_str(
            r##"
[grid]
rows = 0

[ui]
column_width = 500

[palette]
background = [{ name = "bad", hex = "blue" }]
"##,
        );
        assert_eq!(config.grid.rows, DEFAULT_ROWS);
        assert_eq!(config.ui.column_width, crate::tui::MAX_COLUMN_WIDTH);
        assert!(config.palette.background.is_empty());
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn missing_explicit_file_warns() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (config, warnings) = load_config(Some(&dir.path().join("nope.toml")));
        assert_eq!(config, Config::default());
        assert!(warnings[0].starts_with("Config file not found"));
    }

    #[test]
    fn oversized_file_is_refused() {
        let (_, warnings) = load_str(&"#".repeat(MAX_CONFIG_FILE_BYTES as usize + 1));
        assert!(
            warnings
                .iter()
                .any(|w| w.contains("file too large") && w.contains("Refusing to read"))
        );
    }
}
