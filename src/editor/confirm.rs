//! Confirmation gate for destructive actions (row delete, column delete, quit).
//!
//! At most one dialog is open. "Yes" runs the pending action exactly once, "No" runs nothing;
//! both close the dialog.

use crate::types::{Choice, Confirmation, PendingAction};
use super::Editor;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

impl Editor {
    /// Open a dialog for `action`. Refused (returns `false`) while another one is open.
    pub fn request_confirmation(&mut self, action: PendingAction) -> bool {
        if self.confirm.is_some() {
            return false;
        }
        self.confirm = Some(Confirmation::new(action));
        self.mark_redraw();
        true
    }

    /// Close the dialog, running its action if `accept`.
    ///
    /// Returns `Ok(true)` when the editor should quit.
    pub fn resolve_confirmation(&mut self, accept: bool) -> Result<bool> {
        let Some(confirm) = self.confirm.take() else { return Ok(false); };
        self.mark_redraw();

        if !accept {
            tracing::debug!(action = ?confirm.action, "confirmation declined");
            return Ok(false);
        }
        tracing::debug!(action = ?confirm.action, "confirmation accepted");

        match confirm.action {
            PendingAction::DeleteRow(row) => {
                self.archive_and_delete_row(row);
                Ok(false)
            }
            PendingAction::DeleteColumn(col) => {
                self.delete_column(col);
                Ok(false)
            }
            PendingAction::QuitAndSave => Ok(self.cmd_save()),
        }
    }

    /// Handle a key while a dialog is open.
    pub(crate) fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<bool> {
        let Some(confirm) = &mut self.confirm else { return Ok(false); };

        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                confirm.focus = confirm.focus.toggled();
                self.mark_redraw();
                Ok(false)
            }
            KeyCode::Enter => {
                let accept = confirm.focus == Choice::Yes;
                self.resolve_confirmation(accept)
            }
            KeyCode::Char('y' | 'Y') => self.resolve_confirmation(true),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => self.resolve_confirmation(false),
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::grid::rows_of;
    use crate::storage::archive_path;
    use crate::types::{Choice, PendingAction};
    use crossterm::event::KeyCode;
    use std::fs;

    #[test]
    fn only_one_dialog_at_a_time() {
        let (mut ed, _dir, _cb) = people_editor();
        assert!(ed.request_confirmation(PendingAction::DeleteColumn(0)));
        assert!(!ed.request_confirmation(PendingAction::QuitAndSave));
        assert_eq!(ed.confirm.as_ref().unwrap().action, PendingAction::DeleteColumn(0));
    }

    #[test]
    fn dialog_opens_with_no_focused() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.request_confirmation(PendingAction::QuitAndSave);
        assert_eq!(ed.confirm.as_ref().unwrap().focus, Choice::No);
        // Enter on the default button declines
        assert!(!ed.handle_key(press(KeyCode::Enter)).unwrap());
        assert!(ed.confirm.is_none());
    }

    #[test]
    fn focus_toggle_then_enter_accepts() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.grid.select_cell(1, 1);
        ed.handle_key(press(KeyCode::Backspace)).unwrap();
        ed.handle_key(press(KeyCode::Left)).unwrap();
        assert_eq!(ed.confirm.as_ref().unwrap().focus, Choice::Yes);
        ed.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(ed.grid.num_cols(), 1);
        assert!(ed.confirm.is_none());
    }

    #[test]
    fn decline_runs_nothing() {
        let (mut ed, dir, _cb) = people_editor();
        ed.grid.select_cell(1, 0);
        ed.handle_key(press(KeyCode::Char('d'))).unwrap();
        ed.handle_key(press(KeyCode::Char('n'))).unwrap();
        assert_eq!(ed.grid.num_rows(), 3);
        assert!(!archive_path(&dir.path().join("people.csv")).exists());
    }

    #[test]
    fn resolve_without_dialog_is_a_no_op() {
        let (mut ed, _dir, _cb) = people_editor();
        assert!(!ed.resolve_confirmation(true).unwrap());
        assert_eq!(ed.grid.num_rows(), 3);
    }

    #[test]
    fn accepted_delete_row_archives_first() {
        let (mut ed, dir, _cb) = people_editor();
        ed.grid.select_cell(1, 1);
        ed.handle_key(press(KeyCode::Char('d'))).unwrap();
        ed.handle_key(press(KeyCode::Char('y'))).unwrap();

        assert_eq!(ed.grid.rows(), rows_of(&[&["id", "name"], &["2", "bob"]]).as_slice());
        let archived = fs::read_to_string(archive_path(&dir.path().join("people.csv"))).unwrap();
        assert_eq!(archived, "id,name\n1,alice\n");
    }

    #[test]
    fn two_deletes_archive_header_once_in_order() {
        let (mut ed, dir, _cb) = editor_with(&[&["id"], &["a"], &["b"], &["c"]]);
        ed.grid.select_cell(3, 0);
        ed.handle_key(press(KeyCode::Char('d'))).unwrap();
        ed.handle_key(press(KeyCode::Char('y'))).unwrap();
        ed.grid.select_cell(1, 0);
        ed.handle_key(press(KeyCode::Char('d'))).unwrap();
        ed.handle_key(press(KeyCode::Char('y'))).unwrap();

        let archived = fs::read_to_string(archive_path(&dir.path().join("people.csv"))).unwrap();
        assert_eq!(archived, "id\nc\na\n");
        assert_eq!(ed.grid.rows(), rows_of(&[&["id"], &["b"]]).as_slice());
    }

    #[test]
    fn accepted_quit_saves_and_stops() {
        let (mut ed, dir, _cb) = people_editor();
        ed.grid.set_cell(2, 1, "robert");
        ed.handle_key(press(KeyCode::Char('q'))).unwrap();
        assert!(ed.handle_key(press(KeyCode::Char('y'))).unwrap());
        let saved = fs::read_to_string(dir.path().join("people.csv")).unwrap();
        assert_eq!(saved, "id,name\n1,alice\n2,robert\n");
    }

    #[test]
    fn declined_quit_stays() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.handle_key(press(KeyCode::Esc)).unwrap();
        assert!(ed.confirm.is_some());
        assert!(!ed.handle_key(press(KeyCode::Esc)).unwrap());
        assert!(ed.confirm.is_none());
    }

    #[test]
    fn navigation_is_blocked_while_dialog_open() {
        let (mut ed, _dir, _cb) = people_editor();
        ed.handle_key(press(KeyCode::Char('q'))).unwrap();
        ed.handle_key(press(KeyCode::Down)).unwrap();
        ed.handle_key(press(KeyCode::Tab)).unwrap();
        assert_eq!(ed.grid.selection().row, 0);
        assert_eq!(ed.grid.num_cols(), 2);
    }
}
