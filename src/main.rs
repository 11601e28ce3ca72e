//! Gridpad - a terminal grid editor with filtering, sorting, formatting and CSV round-trip.

mod config;
mod logging;
mod tui;

use anyhow::{Context, Result, bail};
use clap::Parser;
use gridpad_core::Document;
use gridpad_core::storage::CsvOptions;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "gridpad")]
#[command(author, version, about = "Terminal grid editor with CSV round-trip")]
struct Cli {
    /// CSV file to open (created on first save if missing)
    file: Option<PathBuf>,

    /// Config file (default: the platform config dir's gridpad/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keybindings: vim or basic (overrides the config file)
    #[arg(long, value_name = "NAME")]
    keymap: Option<String>,

    /// First CSV record holds column names
    #[arg(long)]
    header: bool,

    /// Write the displayed grid to this CSV file and exit (non-interactive)
    #[arg(short = 'o', long, value_name = "OUT.csv")]
    export: Option<PathBuf>,

    /// Only show rows containing TEXT in any column
    #[arg(long, value_name = "TEXT")]
    filter: Option<String>,

    /// Only show rows whose column COL contains TEXT (repeatable)
    #[arg(long = "column-filter", value_name = "COL=TEXT")]
    column_filter: Vec<String>,

    /// Sort by a column, ascending unless `:desc` is given
    #[arg(long, value_name = "COL[:asc|desc]")]
    sort: Option<String>,

    /// Hide a column (repeatable)
    #[arg(long, value_name = "COL")]
    hide: Vec<String>,
}

fn resolve_column(doc: &Document, key: &str) -> Result<usize> {
    doc.grid()
        .find_column(key)
        .with_context(|| format!("Unknown column: {}", key))
}

/// Apply the view flags. Columns are looked up by name first, then by letter.
fn apply_view_options(doc: &mut Document, cli: &Cli) -> Result<()> {
    if let Some(text) = cli.filter.as_deref() {
        doc.set_filter(text);
    }

    for arg in &cli.column_filter {
        let (key, text) = arg
            .split_once('=')
            .with_context(|| format!("--column-filter expects COL=TEXT, got '{}'", arg))?;
        let col = resolve_column(doc, key)?;
        doc.set_column_filter(col, text)?;
    }

    if let Some(arg) = cli.sort.as_deref() {
        let (key, descending) = match arg.rsplit_once(':') {
            Some((key, dir)) if dir.eq_ignore_ascii_case("asc") => (key, false),
            Some((key, dir)) if dir.eq_ignore_ascii_case("desc") => (key, true),
            _ => (arg, false),
        };
        let col = resolve_column(doc, key)?;
        doc.toggle_sort(col)?;
        if descending {
            doc.toggle_sort(col)?;
        }
    }

    for key in &cli.hide {
        let col = resolve_column(doc, key)?;
        if !doc.view_state().hidden_columns.contains(&col) {
            doc.toggle_hidden(col)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.export.is_some() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    let (config, mut warnings) = config::load_config(cli.config.as_deref());
    let options = config.document_options(CsvOptions {
        has_header: cli.header,
    });

    if let Some(output) = cli.export.as_deref() {
        for warning in &warnings {
            warn!("{}", warning);
        }
        let Some(input) = cli.file.as_deref() else {
            bail!("--export needs an input FILE");
        };
        if !input.exists() {
            bail!("File not found: {}", input.display());
        }
        let mut doc = Document::with_file(Some(input), options)
            .with_context(|| format!("Failed to open {}", input.display()))?;
        apply_view_options(&mut doc, &cli)?;
        doc.export_view_csv(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("Exported to {}", output.display());
        return Ok(());
    }

    let requested = cli.keymap.as_deref().or(config.ui.keymap.as_deref());
    let (keymap, keymap_warnings) = tui::build_keymap(requested, &config.keys);
    warnings.extend(keymap_warnings);
    for warning in &warnings {
        warn!("{}", warning);
    }

    let mut doc = match cli.file.as_deref() {
        Some(path) => Document::with_file(Some(path), options)
            .with_context(|| format!("Failed to open {}", path.display()))?,
        None => Document::with_options(options),
    };
    apply_view_options(&mut doc, &cli)?;
    info!(
        file = ?doc.file_path,
        rows = doc.grid().row_count(),
        cols = doc.grid().col_count(),
        "starting editor"
    );

    let mut app = tui::App::new(doc);
    app.keymap = keymap;
    app.col_width = config.ui.column_width;
    app.text_palette = config.text_palette();
    app.background_palette = config.background_palette();
    if let Some(first) = warnings.first() {
        app.status_message = format!("Warning: {}", first);
    }

    tui::run(&mut app)?;
    Ok(())
}
