//! Edit mode: single-cell text editing.
//!
//! `Navigating -> Editing` captures the selected cell and its value. `Editing -> Navigating`
//! either commits the buffer into that captured cell or drops it. While editing, only the keys
//! below are honored; navigation and structural commands never run.

use crate::types::{CellEdit, Mode};
use crate::utils::char_to_byte_index;
use super::Editor;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::mem;

impl CellEdit {
    fn insert_str(&mut self, text: &str) {
        let at = char_to_byte_index(&self.buffer, self.cursor);
        self.buffer.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            let at = char_to_byte_index(&self.buffer, self.cursor - 1);
            self.buffer.remove(at);
            self.cursor -= 1;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.buffer.chars().count() {
            let at = char_to_byte_index(&self.buffer, self.cursor);
            self.buffer.remove(at);
        }
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}

impl Editor {
    /// Enter edit mode on the selected cell.
    pub fn start_edit(&mut self) {
        let target = self.grid.selection();
        let value = self.grid.selected_value().to_string();
        self.mode = Mode::Editing(CellEdit::new(target, value));
        self.mark_redraw();
    }

    /// Write the buffer into the cell edit mode was started on, and leave edit mode.
    pub fn commit_edit(&mut self) {
        if let Mode::Editing(edit) = mem::replace(&mut self.mode, Mode::Navigating) {
            let CellEdit { target, buffer, .. } = edit;
            let changed = self.grid.get_cell(target.row, target.col).is_some_and(|old| old != buffer);
            if changed && self.grid.set_cell(target.row, target.col, buffer) {
                tracing::debug!(row = target.row, col = target.col, "cell edited");
                self.touch();
            }
        }
        self.mark_redraw();
    }

    /// Leave edit mode without touching the grid.
    pub fn cancel_edit(&mut self) {
        self.mode = Mode::Navigating;
        self.mark_redraw();
    }

    /// Handle a key while editing.
    pub(crate) fn handle_edit_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        // Clipboard text is fetched before borrowing the edit state.
        let pasted = if ctrl && key.code == KeyCode::Char('v') { self.clipboard_read() } else { None };

        let Mode::Editing(edit) = &mut self.mode else { return; };

        match (key.code, ctrl) {
            (KeyCode::Enter, _) => {
                self.commit_edit();
                return;
            }
            (KeyCode::Esc, _) => {
                self.cancel_edit();
                return;
            }
            (KeyCode::Char('u'), true) => edit.clear(),
            (KeyCode::Char('v'), true) => {
                if let Some(text) = pasted {
                    // a single-line field: keep only the first line
                    edit.insert_str(text.lines().next().unwrap_or(""));
                }
            }
            (KeyCode::Char(ch), false) if !alt => edit.insert_str(ch.encode_utf8(&mut [0; 4])),
            (KeyCode::Backspace, _) => edit.backspace(),
            (KeyCode::Delete, _) => edit.delete(),
            (KeyCode::Left, _) => edit.cursor = edit.cursor.saturating_sub(1),
            (KeyCode::Right, _) => edit.cursor = (edit.cursor + 1).min(edit.buffer.chars().count()),
            (KeyCode::Home, _) => edit.cursor = 0,
            (KeyCode::End, _) => edit.cursor = edit.buffer.chars().count(),
            _ => return,
        }
        self.mark_redraw();
    }
}
