//! Input handling: routes key and mouse events to the right handler.
//!
//! Priority: an open overlay swallows the key, then an open dialog, then edit mode. Only when
//! none of those is active does the keymap run navigation and structural commands.

use crate::commands::Action;
use crate::types::{Overlay, PendingAction};
use super::Editor;
use anyhow::Result;
use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use std::time::Duration;

impl Editor {
    /// Top-level key handler.
    ///
    /// Returns `Ok(true)` if the editor should quit, `Ok(false)` otherwise.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // If help or magnify is shown, any key closes it
        if self.overlay.take().is_some() {
            self.mark_redraw();
            return Ok(false);
        }

        if self.confirm.is_some() {
            return self.handle_confirm_key(key);
        }

        if self.is_editing() {
            self.handle_edit_key(key);
            return Ok(false);
        }

        match self.keymap.resolve(&key) {
            Some(action) => self.run_action(action),
            None => {
                tracing::trace!(?key, "unbound key");
                Ok(false)
            }
        }
    }

    /// Run one navigation-mode action.
    pub fn run_action(&mut self, action: Action) -> Result<bool> {
        let sel = self.grid.selection();

        match action {
            Action::MoveUp => self.move_selection(-1, 0),
            Action::MoveDown => self.move_selection(1, 0),
            Action::MoveLeft => self.move_selection(0, -1),
            Action::MoveRight => self.move_selection(0, 1),
            Action::InsertColumn => {
                if self.grid.insert_column_after(sel.col) {
                    tracing::debug!(after = sel.col, "column inserted");
                    self.touch();
                }
            }
            Action::InsertRow => {
                if self.grid.insert_row_after(sel.row) {
                    tracing::debug!(after = sel.row, "row inserted");
                    self.touch();
                }
            }
            Action::Edit => self.start_edit(),
            Action::DeleteRow => {
                if sel.row == 0 {
                    self.set_status("The header row cannot be deleted.", Duration::from_secs(2));
                } else {
                    self.request_confirmation(PendingAction::DeleteRow(sel.row));
                }
            }
            Action::DeleteColumn => {
                if self.grid.num_cols() <= 1 {
                    self.set_status("The last column cannot be deleted.", Duration::from_secs(2));
                } else {
                    self.request_confirmation(PendingAction::DeleteColumn(sel.col));
                }
            }
            Action::ClearCell => {
                if self.grid.set_cell(sel.row, sel.col, "") {
                    self.touch();
                }
            }
            Action::Copy => self.copy_cell(),
            Action::Cut => self.cut_cell(),
            Action::Paste => self.paste_cell(),
            Action::Save => {
                self.cmd_save();
            }
            Action::Quit => {
                self.request_confirmation(PendingAction::QuitAndSave);
            }
            Action::Magnify => self.overlay = Some(Overlay::Magnify),
            Action::Help => self.overlay = Some(Overlay::Help),
        }

        self.ensure_visible();
        self.mark_redraw();
        Ok(false)
    }

    /// Mouse wheel moves the selection; Shift+wheel moves it sideways.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.overlay.is_some() || self.confirm.is_some() || self.is_editing() {
            return Ok(());
        }
        let shift = mouse.modifiers.contains(KeyModifiers::SHIFT);

        let action = match (mouse.kind, shift) {
            (MouseEventKind::ScrollUp, false) => Action::MoveUp,
            (MouseEventKind::ScrollDown, false) => Action::MoveDown,
            (MouseEventKind::ScrollUp, true) | (MouseEventKind::ScrollLeft, _) => Action::MoveLeft,
            (MouseEventKind::ScrollDown, true) | (MouseEventKind::ScrollRight, _) => Action::MoveRight,
            _ => return Ok(()),
        };
        self.run_action(action)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::grid::rows_of;
    use crate::types::{CellPos, Overlay, PendingAction};
    use crossterm::event::{KeyCode, KeyModifiers, MouseEvent, MouseEventKind};

    #[test]
    fn tab_inserts_column_after_selection() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.grid.select_cell(1, 1);
        ed.handle_key(press(KeyCode::Tab)).unwrap();
        assert_eq!(ed.grid.num_cols(), 3);
        assert_eq!(ed.grid.row(1).unwrap(), ["1", "alice", ""]);
        assert_eq!(ed.grid.selection(), CellPos::new(1, 2));
        assert!(ed.dirty);
    }

    #[test]
    fn enter_inserts_row_below() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.grid.select_cell(1, 1);
        ed.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(ed.grid.num_rows(), 4);
        assert_eq!(ed.grid.selection(), CellPos::new(2, 0));
    }

    #[test]
    fn delete_row_on_header_opens_no_dialog() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.handle_key(press(KeyCode::Char('d'))).unwrap();
        assert!(ed.confirm.is_none());
        assert!(ed.status.is_some());
    }

    #[test]
    fn delete_row_asks_for_selected_row() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.grid.select_cell(2, 1);
        ed.handle_key(press(KeyCode::Char('d'))).unwrap();
        assert_eq!(ed.confirm.as_ref().unwrap().action, PendingAction::DeleteRow(2));
        assert_eq!(ed.grid.num_rows(), 3);
    }

    #[test]
    fn delete_last_column_is_refused() {
        let (mut ed, _dir, _cb) = editor_with(&[&["only"], &["x"]]);
        ed.handle_key(press(KeyCode::Backspace)).unwrap();
        assert!(ed.confirm.is_none());
        assert_eq!(ed.grid.num_cols(), 1);
    }

    #[test]
    fn clear_cell_empties_selection() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.grid.select_cell(1, 1);
        ed.handle_key(press(KeyCode::Char('n'))).unwrap();
        assert_eq!(ed.grid.rows(), rows_of(&[&["id", "name"], &["1", ""], &["2", "bob"]]).as_slice());
    }

    #[test]
    fn unbound_keys_do_nothing() {
        let (mut ed, _dir, _cb) = people_editor();
        let before = ed.grid.clone();
        assert!(!ed.handle_key(press(KeyCode::Char('z'))).unwrap());
        assert!(!ed.handle_key(press(KeyCode::F(9))).unwrap());
        assert_eq!(ed.grid, before);
        assert!(!ed.dirty);
    }

    #[test]
    fn ctrl_s_saves_without_quitting() {
        let (mut ed, dir, _cb) = people_editor();
        ed.grid.select_cell(1, 1);
        ed.handle_key(press(KeyCode::Char('n'))).unwrap();
        assert!(!ed.handle_key(ctrl('s')).unwrap());
        assert!(!ed.dirty);
        let saved = std::fs::read_to_string(dir.path().join("people.csv")).unwrap();
        assert_eq!(saved, "id,name\n1,\n2,bob\n");
    }

    #[test]
    fn overlay_swallows_next_key() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.handle_key(press(KeyCode::F(1))).unwrap();
        assert_eq!(ed.overlay, Some(Overlay::Help));
        ed.handle_key(press(KeyCode::Down)).unwrap();
        assert_eq!(ed.overlay, None);
        assert_eq!(ed.grid.selection(), CellPos::new(0, 0));
    }

    #[test]
    fn mouse_wheel_moves_selection() {
        let (mut ed, _dir, _cb) = people_editor();
        let wheel = |kind, modifiers| MouseEvent { kind, column: 0, row: 0, modifiers };
        ed.handle_mouse(wheel(MouseEventKind::ScrollDown, KeyModifiers::NONE)).unwrap();
        ed.handle_mouse(wheel(MouseEventKind::ScrollDown, KeyModifiers::SHIFT)).unwrap();
        assert_eq!(ed.grid.selection(), CellPos::new(1, 1));
        ed.handle_mouse(wheel(MouseEventKind::ScrollUp, KeyModifiers::NONE)).unwrap();
        assert_eq!(ed.grid.selection(), CellPos::new(0, 1));
    }
}
