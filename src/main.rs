//! `csvpad`: a terminal spreadsheet-style editor for a single CSV file.
//!
//! ## Reading guide (high level architecture)
//! - **`main()` / `run()`**: parses the command line, loads the file, then runs the input/render loop.
//! - **`terminal::TerminalGuard`**: raw mode + alternate screen, restored on exit (even on panic unwind).
//! - **`grid::Grid`**: the rectangular table and its structural edits (insert/delete rows and columns).
//! - **`storage`**: CSV reading, the atomic save, and the `.completed.csv` archive.
//! - **`config`**: the `<name>.config` sidecar holding per-column display widths.
//! - **`editor::Editor`**: session state, key dispatch, edit mode, confirmation dialogs, rendering.
//! - **`commands::Keymap`**: which key runs which action, overridable from `settings.toml`.

mod commands;
mod config;
mod editor;
mod grid;
mod logging;
mod settings;
mod storage;
mod terminal;
mod types;
mod utils;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use editor::Editor;
use settings::Settings;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use terminal::TerminalGuard;

/// Edit a CSV file as a table in the terminal.
#[derive(Parser, Debug)]
#[command(name = "csvpad", version, about)]
struct Cli {
    /// CSV file to edit (must exist and have at least a header row)
    file: PathBuf,

    /// Field delimiter (overrides settings.toml)
    #[arg(short, long)]
    delimiter: Option<char>,
}

/// Program entry point.
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}

/// Runs the editor:
/// - loads settings, the CSV file and its sidecar config (before touching the terminal, so
///   load errors print normally)
/// - sets up the terminal
/// - loops: render → read input events → update state
fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init();
    tracing::info!("csvpad v{} starting on {}", env!("CARGO_PKG_VERSION"), cli.file.display());

    let settings = Settings::load().with_delimiter(cli.delimiter)?;
    let mut editor = Editor::open(cli.file, settings)?;

    let mut stdout = io::stdout();
    let _term = TerminalGuard::new(&mut stdout)?;
    let (w, h) = crossterm::terminal::size()?;
    editor.on_resize(w, h);

    loop {
        editor.render(&mut stdout)?;

        // Poll so we can expire transient status messages.
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if editor.handle_key(key)? {
                        break;
                    }
                }
                Event::Mouse(mouse) => editor.handle_mouse(mouse)?,
                Event::Resize(w, h) => editor.on_resize(w, h),
                _ => {}
            }
        } else {
            editor.tick();
        }
    }

    tracing::info!("csvpad exiting");
    Ok(())
}
