//! Clipboard operations: copy, cut, paste of the selected cell.

use super::Editor; // main editor logic
use anyhow::Result; // anyhow error handling
use std::time::Duration; // timing for status messages

/// Text clipboard the editor reads from and writes to.
pub trait ClipboardProvider {
    fn get_text(&mut self) -> Result<String>;
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard.
pub struct SystemClipboard(arboard::Clipboard);

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        Ok(Self(arboard::Clipboard::new()?))
    }
}

impl ClipboardProvider for SystemClipboard {
    fn get_text(&mut self) -> Result<String> {
        Ok(self.0.get_text()?)
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.0.set_text(text)?;
        Ok(())
    }
}

impl Editor {
    fn clipboard_write(&mut self, text: &str) -> bool {
        let res = match &mut self.clipboard {
            Some(cb) => cb.set_text(text),
            None => Err(anyhow::anyhow!("no clipboard")),
        };
        match res {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Clipboard write failed: {e:#}");
                self.set_status("Clipboard unavailable.", Duration::from_secs(2));
                false
            }
        }
    }

    /// Read clipboard text, reporting failures in the status bar.
    pub(crate) fn clipboard_read(&mut self) -> Option<String> {
        let res = match &mut self.clipboard {
            Some(cb) => cb.get_text(),
            None => Err(anyhow::anyhow!("no clipboard")),
        };
        match res {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Clipboard read failed: {e:#}");
                self.set_status("Clipboard unavailable.", Duration::from_secs(2));
                None
            }
        }
    }

    /// Copy the selected cell.
    pub fn copy_cell(&mut self) {
        let text = self.grid.selected_value().to_string();
        if self.clipboard_write(&text) {
            self.set_status("Copied cell.", Duration::from_secs(2));
        }
    }

    /// Copy the selected cell, then clear it. The cell is only cleared if the copy worked.
    pub fn cut_cell(&mut self) {
        let text = self.grid.selected_value().to_string();
        if self.clipboard_write(&text) {
            let pos = self.grid.selection();
            self.grid.set_cell(pos.row, pos.col, "");
            self.touch();
            self.set_status("Cut cell.", Duration::from_secs(2));
        }
    }

    /// Replace the selected cell with the clipboard text.
    pub fn paste_cell(&mut self) {
        if let Some(text) = self.clipboard_read() {
            let pos = self.grid.selection();
            self.grid.set_cell(pos.row, pos.col, text);
            self.touch();
            self.set_status("Pasted.", Duration::from_secs(2));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;

    #[test]
    fn copy_then_paste_elsewhere() {
        let (mut ed, _dir, cb) = people_editor();
        ed.grid.select_cell(1, 1);
        ed.copy_cell();
        assert_eq!(cb.0.borrow().as_deref(), Some("alice"));
        assert!(!ed.dirty);

        ed.grid.select_cell(2, 1);
        ed.paste_cell();
        assert_eq!(ed.grid.get_cell(2, 1), Some("alice"));
        assert!(ed.dirty);
    }

    #[test]
    fn cut_clears_cell() {
        let (mut ed, _dir, cb) = people_editor();
        ed.grid.select_cell(2, 1);
        ed.cut_cell();
        assert_eq!(cb.0.borrow().as_deref(), Some("bob"));
        assert_eq!(ed.grid.get_cell(2, 1), Some(""));
    }

    #[test]
    fn paste_with_empty_clipboard_changes_nothing() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.grid.select_cell(1, 0);
        ed.paste_cell();
        assert_eq!(ed.grid.get_cell(1, 0), Some("1"));
        assert!(!ed.dirty);
    }

    #[test]
    fn missing_clipboard_is_not_fatal() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.clipboard = None;
        ed.grid.select_cell(1, 1);
        ed.cut_cell();
        assert_eq!(ed.grid.get_cell(1, 1), Some("alice"));
        assert!(ed.status.is_some());
    }
}
