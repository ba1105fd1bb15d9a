//! Editor: the session object that owns the grid, the edit mode, the confirmation gate and the
//! viewport. Every command handler takes `&mut Editor`; there is no global state.

mod clipboard;
mod confirm;
mod edit;
mod file_ops;
mod input;
mod movement;
mod render;
mod screens;

use crate::commands::Keymap;
use crate::config::{load_config, ColumnWidths};
use crate::grid::Grid;
use crate::settings::Settings;
use crate::storage::read_grid;
use crate::types::{Confirmation, Mode, Overlay, StatusMsg};
use anyhow::Result;
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub use clipboard::{ClipboardProvider, SystemClipboard};

/// The top-level application state.
pub struct Editor {
    /// The table being edited.
    pub grid: Grid,
    /// CSV file we load from and save to.
    pub file_path: PathBuf,
    /// Display width per column (read-only after startup).
    pub(crate) widths: ColumnWidths,
    pub(crate) settings: Settings,
    pub(crate) keymap: Keymap,
    /// Navigating or editing one cell.
    pub mode: Mode,
    /// The one open yes/no dialog, if any.
    pub(crate) confirm: Option<Confirmation>,
    /// Help or magnify screen drawn instead of the table.
    pub(crate) overlay: Option<Overlay>,
    /// "Dirty" means the grid differs from the file on disk.
    pub dirty: bool,
    /// Short-lived status message.
    pub(crate) status: Option<StatusMsg>,
    /// Clipboard access, if the platform has one.
    pub(crate) clipboard: Option<Box<dyn ClipboardProvider>>,
    /// Terminal size in cells (width, height).
    pub(crate) viewport: (usize, usize),
    /// First body row drawn below the header.
    pub(crate) scroll_row: usize,
    /// First column drawn after the frozen columns.
    pub(crate) col_offset: usize,
    /// Whether the screen needs to be redrawn.
    pub(crate) needs_redraw: bool,
}

impl Editor {
    /// Load `path` and its sidecar config. Any problem with the CSV itself is fatal.
    pub fn open(path: PathBuf, settings: Settings) -> Result<Self> {
        let grid = read_grid(&path, settings.delimiter_byte())?;
        let widths = load_config(&path, settings.generated_columns, settings.default_column_width);

        let clipboard: Option<Box<dyn ClipboardProvider>> = match SystemClipboard::new() {
            Ok(cb) => Some(Box::new(cb)),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {e:#}");
                None
            }
        };

        let mut ed = Self::from_parts(path, grid, widths, settings, clipboard);
        ed.set_status("e edit • Tab/Enter insert • d delete row • q quit • F1 help", Duration::from_secs(4));
        Ok(ed)
    }

    /// Assemble an editor from already-loaded pieces.
    pub fn from_parts(
        file_path: PathBuf,
        grid: Grid,
        widths: ColumnWidths,
        settings: Settings,
        clipboard: Option<Box<dyn ClipboardProvider>>,
    ) -> Self {
        let keymap = Keymap::new(&settings.keys);
        let col_offset = settings.frozen_columns.min(grid.num_cols().saturating_sub(1));
        Self {
            grid,
            file_path,
            widths,
            settings,
            keymap,
            mode: Mode::Navigating,
            confirm: None,
            overlay: None,
            dirty: false,
            status: None,
            clipboard,
            viewport: (80, 24),
            scroll_row: 1,
            col_offset,
            needs_redraw: true,
        }
    }

    /// Mark that the screen needs to be redrawn.
    pub fn mark_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Record that the grid changed.
    pub(crate) fn touch(&mut self) {
        self.dirty = true;
        self.mark_redraw();
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing(_))
    }

    /// Periodic updates (expire status messages).
    pub fn tick(&mut self) {
        if let Some(st) = &self.status {
            if Instant::now() >= st.until {
                self.status = None;
                self.mark_redraw();
            }
        }
    }

    /// Called with the new terminal size.
    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.viewport = (usize::from(width), usize::from(height));
        self.ensure_visible();
        self.mark_redraw();
    }

    /// Show a message in the status bar.
    pub fn set_status(&mut self, msg: impl Into<String>, ttl: Duration) {
        self.status = Some(StatusMsg { text: msg.into(), until: Instant::now() + ttl });
        self.mark_redraw();
    }
}
