//! Selection movement and viewport scrolling.
//!
//! Screen layout, top to bottom: header row (always visible), body rows starting at
//! `scroll_row`, the edit line while editing, and the status bar. Horizontally, the first
//! `frozen_columns` columns are always drawn and the rest scroll starting at `col_offset`.

use super::Editor;

impl Editor {
    /// Move the selection by one step, clamped at the grid edges.
    pub fn move_selection(&mut self, d_row: isize, d_col: isize) {
        self.grid.move_selection(d_row, d_col);
        self.ensure_visible();
        self.mark_redraw();
    }

    /// Rows available for body rows (everything except header, edit line, status bar).
    pub(crate) fn body_height(&self) -> usize {
        let edit_line = usize::from(self.is_editing());
        self.viewport.1.saturating_sub(2 + edit_line).max(1)
    }

    fn frozen_count(&self) -> usize {
        self.settings.frozen_columns.min(self.grid.num_cols())
    }

    /// Columns to draw, left to right, with the width each one gets on screen.
    ///
    /// Every column takes its configured width plus one separator cell. The last column of the
    /// grid takes whatever room is left.
    pub(crate) fn visible_columns(&self) -> Vec<(usize, usize)> {
        let screen_w = self.viewport.0;
        let last = self.grid.num_cols() - 1;
        let frozen = self.frozen_count();

        let mut out = Vec::new();
        let mut used = 0;
        let scrolled = self.col_offset.max(frozen)..self.grid.num_cols();
        for col in (0..frozen).chain(scrolled) {
            if used >= screen_w {
                break;
            }
            let room = screen_w - used;
            let w = if col == last { room - 1 } else { self.widths.get(col).min(room - 1) };
            out.push((col, w));
            used += w + 1;
        }
        out
    }

    /// Keep `scroll_row` and `col_offset` inside the grid after it shrank or was replaced.
    pub(crate) fn clamp_scroll(&mut self) {
        let max_row = self.grid.num_rows().saturating_sub(1).max(1);
        self.scroll_row = self.scroll_row.clamp(1, max_row);
        let frozen = self.frozen_count();
        let max_col = self.grid.num_cols().saturating_sub(1).max(frozen);
        self.col_offset = self.col_offset.clamp(frozen, max_col);
    }

    /// Scroll so the selected cell is on screen.
    pub fn ensure_visible(&mut self) {
        self.clamp_scroll();
        let sel = self.grid.selection();

        // rows: the header is always visible
        if sel.row > 0 {
            let body_h = self.body_height();
            if sel.row < self.scroll_row {
                self.scroll_row = sel.row;
            } else if sel.row >= self.scroll_row + body_h {
                self.scroll_row = sel.row + 1 - body_h;
            }
        }

        // columns: frozen columns are always visible
        if sel.col >= self.frozen_count() {
            if sel.col < self.col_offset {
                self.col_offset = sel.col;
            }
            while self.col_offset < sel.col && !self.column_fits(sel.col) {
                self.col_offset += 1;
            }
        }
    }

    fn column_fits(&self, col: usize) -> bool {
        let frozen: usize = (0..self.frozen_count()).map(|c| self.widths.get(c) + 1).sum();
        let scrolled: usize = (self.col_offset..=col).map(|c| self.widths.get(c) + 1).sum();
        frozen + scrolled <= self.viewport.0
    }
}
