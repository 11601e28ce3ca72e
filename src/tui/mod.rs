//! Terminal front end: raw-mode setup, the event loop and rendering.

mod actions;
mod app;
mod help;
mod input;
mod keymap;
mod ui;

pub use app::{App, DEFAULT_COLUMN_WIDTH, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH};
pub use keymap::{KeyOverrides, build_keymap};

use crossterm::{
    ExecutableCommand,
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, stdout};

/// Leaves the alternate screen even when the event loop errors or panics.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        let _ = out.execute(DisableMouseCapture);
        let _ = out.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the interactive editor until the user quits.
pub fn run(app: &mut App) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let _guard = TerminalGuard;
    let mut out = stdout();
    out.execute(EnterAlternateScreen)?;
    out.execute(EnableMouseCapture)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
    terminal.clear()?;
    let result = input::run_app(&mut terminal, app);
    terminal.show_cursor()?;
    result
}
