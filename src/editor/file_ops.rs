//! File operations: save + reload, archive-then-delete.

use crate::storage::{archive_row, read_grid, save_grid}; // csv persistence
use super::Editor; // editor state
use anyhow::Result; // anyhow error handling
use std::time::Duration; // timing for status messages

impl Editor {
    /// Save the grid over the source file, then reload it so the in-memory grid is exactly what
    /// the file now holds.
    ///
    /// A failed write leaves both the file and the grid untouched. A failed reload after a
    /// successful write keeps the current grid and is only reported.
    pub fn save(&mut self) -> Result<()> {
        save_grid(&self.file_path, &self.grid, self.settings.delimiter_byte())?;
        self.dirty = false;
        tracing::info!("Saved {}", self.file_path.display());

        let reloaded = self.reload();
        self.report_reload(reloaded);
        Ok(())
    }

    /// Status for the reload that follows a written file. On failure the current grid stays.
    fn report_reload(&mut self, reloaded: Result<()>) {
        match reloaded {
            Ok(()) => self.set_status(format!("Saved: {}", self.file_path.display()), Duration::from_secs(2)),
            Err(e) => {
                tracing::error!("Reload after save failed: {e:#}");
                self.set_status(format!("Saved, but reload failed: {e:#}"), Duration::from_secs(5));
            }
        }
    }

    /// Replace the grid with a fresh read of the file, keeping the selection where possible.
    fn reload(&mut self) -> Result<()> {
        let mut grid = read_grid(&self.file_path, self.settings.delimiter_byte())?;
        grid.clamp_selection(self.grid.selection());
        self.grid = grid;
        self.clamp_scroll();
        self.mark_redraw();
        Ok(())
    }

    /// Save, reporting failures in the status bar. Returns whether the file was written.
    pub fn cmd_save(&mut self) -> bool {
        match self.save() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Save failed: {e:#}");
                self.set_status(format!("Save failed: {e:#}"), Duration::from_secs(5));
                false
            }
        }
    }

    /// Append `row` to the `.completed.csv` archive, then delete it from the grid.
    ///
    /// If the archive write fails, nothing is deleted.
    pub fn archive_and_delete_row(&mut self, row: usize) {
        if row == 0 || row >= self.grid.num_rows() {
            return;
        }
        let Some(data) = self.grid.row(row) else { return; };
        let res = archive_row(&self.file_path, self.grid.header(), data, self.settings.delimiter_byte());

        match res {
            Ok(()) => {
                if self.grid.delete_row(row) {
                    tracing::debug!(row, "row deleted");
                    self.touch();
                    self.set_status("Row moved to completed file.", Duration::from_secs(2));
                }
            }
            Err(e) => {
                tracing::error!("Archive failed: {e:#}");
                self.set_status(format!("Archive failed, row kept: {e:#}"), Duration::from_secs(5));
            }
        }
    }

    /// Delete a column (the last remaining column is kept).
    pub fn delete_column(&mut self, col: usize) {
        if self.grid.delete_column(col) {
            tracing::debug!(col, "column deleted");
            self.clamp_scroll();
            self.touch();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::storage::{archive_path, temp_path};
    use crate::types::CellPos;
    use std::fs;

    #[test]
    fn save_reloads_and_keeps_selection() {
        let (mut ed, dir, _cb) = people_editor();
        ed.grid.select_cell(2, 1);
        ed.grid.set_cell(2, 1, "a \"quoted\", value");
        ed.dirty = true;
        ed.save().unwrap();

        assert!(!ed.dirty);
        assert_eq!(ed.grid.selection(), CellPos::new(2, 1));
        assert_eq!(ed.grid.get_cell(2, 1), Some("a \"quoted\", value"));
        let text = fs::read_to_string(dir.path().join("people.csv")).unwrap();
        assert_eq!(text, "id,name\n1,alice\n2,\"a \"\"quoted\"\", value\"\n");
    }

    #[test]
    fn failed_reload_keeps_grid_and_reports() {
        let (mut ed, dir, _cb) = people_editor();
        let path = dir.path().join("people.csv");
        ed.grid.select_cell(2, 1);
        ed.grid.set_cell(2, 1, "robert");
        ed.save().unwrap();

        // the file changes shape behind the editor's back
        fs::write(&path, "id,name\n1\n").unwrap();
        let reloaded = ed.reload();
        assert!(reloaded.is_err());
        ed.report_reload(reloaded);

        assert!(!ed.dirty);
        assert_eq!(ed.grid.get_cell(2, 1), Some("robert"));
        assert_eq!(ed.grid.selection(), CellPos::new(2, 1));
        assert!(ed.status.as_ref().unwrap().text.starts_with("Saved, but reload failed"));
    }

    #[test]
    fn failed_save_keeps_state_and_file() {
        let (mut ed, dir, _cb) = people_editor();
        let path = dir.path().join("people.csv");
        let before = fs::read(&path).unwrap();
        fs::create_dir(temp_path(&path)).unwrap();

        ed.grid.set_cell(1, 1, "changed");
        ed.dirty = true;
        assert!(!ed.cmd_save());
        assert!(ed.dirty);
        assert_eq!(ed.grid.get_cell(1, 1), Some("changed"));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn failed_save_blocks_quit() {
        let (mut ed, dir, _cb) = people_editor();
        fs::create_dir(temp_path(&dir.path().join("people.csv"))).unwrap();
        ed.request_confirmation(crate::types::PendingAction::QuitAndSave);
        assert!(!ed.resolve_confirmation(true).unwrap());
    }

    #[test]
    fn failed_archive_keeps_row() {
        let (mut ed, dir, _cb) = people_editor();
        fs::create_dir(archive_path(&dir.path().join("people.csv"))).unwrap();
        ed.archive_and_delete_row(1);
        assert_eq!(ed.grid.num_rows(), 3);
        assert!(!ed.dirty);
    }

    #[test]
    fn header_is_never_archived() {
        let (mut ed, dir, _cb) = people_editor();
        ed.archive_and_delete_row(0);
        assert_eq!(ed.grid.num_rows(), 3);
        assert!(!archive_path(&dir.path().join("people.csv")).exists());
    }
}
