//! Rendering: drawing the table, edit line, dialog and status bar to the terminal.

use crate::types::{Choice, Mode, Overlay};
use crate::utils::{display_width, fit_to_width, take_width};
use super::Editor;
use anyhow::Result;
use crossterm::{
    cursor,
    style::{self, Attribute, Color},
    terminal::{self, ClearType},
    QueueableCommand,
};
use std::borrow::Cow;
use std::io::{Stdout, Write};
use unicode_width::UnicodeWidthChar;

const EDIT_LABEL: &str = ":";

/// Cells are drawn on one line; control whitespace would break the layout.
fn single_line(text: &str) -> Cow<'_, str> {
    if text.contains(['\n', '\r', '\t']) {
        Cow::Owned(text.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(text)
    }
}

/// The part of an edit buffer that fits in `avail` columns, scrolled so the cursor is visible.
///
/// Returns the visible slice and the cursor's screen column inside it.
fn edit_window(buffer: &str, cursor: usize, avail: usize) -> (&str, usize) {
    let chars: Vec<(usize, char)> = buffer.char_indices().collect();
    let cursor = cursor.min(chars.len());
    let width_of = |c: char| UnicodeWidthChar::width(c).unwrap_or(1);

    // drop leading chars until the cursor fits (one cell is kept for the cursor itself)
    let mut start = 0;
    let mut before: usize = chars[..cursor].iter().map(|&(_, c)| width_of(c)).sum();
    while before >= avail && start < cursor {
        before -= width_of(chars[start].1);
        start += 1;
    }

    let from = chars.get(start).map_or(buffer.len(), |&(bi, _)| bi);
    let (visible, _) = take_width(&buffer[from..], avail);
    (visible, before)
}

impl Editor {
    /// Render the entire UI.
    pub fn render(&mut self, stdout: &mut Stdout) -> Result<()> {
        if !self.needs_redraw { return Ok(()); }
        self.needs_redraw = false;

        match self.overlay {
            Some(Overlay::Help) => return self.render_help(stdout),
            Some(Overlay::Magnify) => return self.render_magnify(stdout),
            None => {}
        }

        self.ensure_visible();
        let (width, height) = self.viewport;
        let body_h = self.body_height();
        let cols = self.visible_columns();

        stdout.queue(cursor::Hide)?;
        stdout.queue(style::ResetColor)?;

        self.render_row(stdout, 0, 0, &cols)?;
        for i in 0..body_h {
            let y = 1 + i;
            let row = self.scroll_row + i;
            if row < self.grid.num_rows() {
                self.render_row(stdout, y, row, &cols)?;
            } else {
                stdout.queue(cursor::MoveTo(0, y as u16))?;
                stdout.queue(terminal::Clear(ClearType::CurrentLine))?;
                stdout.queue(style::SetForegroundColor(Color::DarkGrey))?;
                stdout.queue(style::Print("~"))?;
                stdout.queue(style::ResetColor)?;
            }
        }

        let edit_y = 1 + body_h;
        let edit_cursor = self.render_edit_line(stdout, edit_y, width)?;
        self.render_status_bar(stdout, height.saturating_sub(1), width)?;

        if self.confirm.is_some() {
            self.render_dialog(stdout)?;
        } else if let Some(x) = edit_cursor {
            stdout.queue(cursor::MoveTo(x.min(width.saturating_sub(1)) as u16, edit_y as u16))?;
            stdout.queue(cursor::Show)?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn render_row(&self, stdout: &mut Stdout, y: usize, row: usize, cols: &[(usize, usize)]) -> Result<()> {
        stdout.queue(cursor::MoveTo(0, y as u16))?;
        stdout.queue(terminal::Clear(ClearType::CurrentLine))?;

        let sel = self.grid.selection();
        let last = self.grid.num_cols() - 1;

        for &(col, w) in cols {
            let text = self.grid.get_cell(row, col).unwrap_or("");
            let selected = sel.row == row && sel.col == col;

            if selected {
                stdout.queue(style::SetBackgroundColor(Color::DarkBlue))?;
                stdout.queue(style::SetForegroundColor(Color::White))?;
            } else if row == 0 {
                stdout.queue(style::SetForegroundColor(Color::Yellow))?;
                stdout.queue(style::SetAttribute(Attribute::Bold))?;
            }
            stdout.queue(style::Print(fit_to_width(&single_line(text), w)))?;
            stdout.queue(style::SetAttribute(Attribute::Reset))?;
            stdout.queue(style::ResetColor)?;

            if col != last {
                stdout.queue(style::SetForegroundColor(Color::DarkGrey))?;
                stdout.queue(style::Print("│"))?;
                stdout.queue(style::ResetColor)?;
            }
        }
        Ok(())
    }

    /// Draw the edit field while editing. Returns the cursor column.
    fn render_edit_line(&self, stdout: &mut Stdout, y: usize, width: usize) -> Result<Option<usize>> {
        let Mode::Editing(edit) = &self.mode else { return Ok(None); };

        stdout.queue(cursor::MoveTo(0, y as u16))?;
        stdout.queue(terminal::Clear(ClearType::CurrentLine))?;
        stdout.queue(style::SetForegroundColor(Color::Yellow))?;
        stdout.queue(style::Print(EDIT_LABEL))?;
        stdout.queue(style::ResetColor)?;

        let label_w = display_width(EDIT_LABEL);
        let (visible, cursor_x) = edit_window(&edit.buffer, edit.cursor, width.saturating_sub(label_w));
        stdout.queue(style::Print(visible))?;
        Ok(Some(label_w + cursor_x))
    }

    fn render_status_bar(&self, stdout: &mut Stdout, status_y: usize, width: usize) -> Result<()> {
        stdout.queue(cursor::MoveTo(0, status_y as u16))?;
        stdout.queue(terminal::Clear(ClearType::CurrentLine))?;
        stdout.queue(style::SetForegroundColor(Color::Black))?;
        stdout.queue(style::SetBackgroundColor(Color::White))?;

        let sel = self.grid.selection();
        let dirty = if self.dirty { "*" } else { " " };
        let mode = if self.is_editing() { "[EDIT]" } else { "" };
        let msg = self.status.as_ref().map(|s| s.text.as_str()).unwrap_or_default();

        let mut bar = format!(
            " {}{}  Row {}/{}, Col {}/{}  {} ",
            dirty,
            self.file_path.display(),
            sel.row + 1,
            self.grid.num_rows(),
            sel.col + 1,
            self.grid.num_cols(),
            mode
        );
        if !msg.is_empty() { bar.push_str(" | "); bar.push_str(msg); }

        let (shown, used) = take_width(&bar, width);
        stdout.queue(style::Print(shown))?;
        stdout.queue(style::Print(" ".repeat(width - used)))?;
        stdout.queue(style::ResetColor)?;
        Ok(())
    }

    /// Centered yes/no box over the table.
    fn render_dialog(&self, stdout: &mut Stdout) -> Result<()> {
        let Some(confirm) = &self.confirm else { return Ok(()); };
        let (width, height) = self.viewport;

        let prompt = confirm.action.prompt();
        let inner = (display_width(prompt) + 4).max(24).min(width.saturating_sub(2));
        let x = width.saturating_sub(inner + 2) / 2;
        let y = height.saturating_sub(6) / 2;

        let line = |stdout: &mut Stdout, dy: usize, text: &str| -> Result<()> {
            stdout.queue(cursor::MoveTo(x as u16, (y + dy) as u16))?;
            stdout.queue(style::Print(text))?;
            Ok(())
        };

        stdout.queue(style::SetBackgroundColor(Color::DarkGrey))?;
        stdout.queue(style::SetForegroundColor(Color::White))?;
        line(stdout, 0, &format!("┌{}┐", "─".repeat(inner)))?;
        line(stdout, 1, &format!("│{}│", " ".repeat(inner)))?;
        let pad = inner.saturating_sub(display_width(prompt)) / 2;
        line(stdout, 2, &format!("│{}│", fit_to_width(&format!("{}{prompt}", " ".repeat(pad)), inner)))?;
        line(stdout, 3, &format!("│{}│", " ".repeat(inner)))?;
        line(stdout, 4, &format!("│{}│", " ".repeat(inner)))?;
        line(stdout, 5, &format!("└{}┘", "─".repeat(inner)))?;

        // buttons on row 4
        let yes = "[ Yes ]";
        let no = "[ No ]";
        let buttons_w = yes.len() + 3 + no.len();
        let bx = x + 1 + inner.saturating_sub(buttons_w) / 2;
        for (label, choice, offset) in [(yes, Choice::Yes, 0), (no, Choice::No, yes.len() + 3)] {
            stdout.queue(cursor::MoveTo((bx + offset) as u16, (y + 4) as u16))?;
            if confirm.focus == choice {
                stdout.queue(style::SetBackgroundColor(Color::White))?;
                stdout.queue(style::SetForegroundColor(Color::Black))?;
            } else {
                stdout.queue(style::SetBackgroundColor(Color::DarkGrey))?;
                stdout.queue(style::SetForegroundColor(Color::White))?;
            }
            stdout.queue(style::Print(label))?;
        }
        stdout.queue(style::ResetColor)?;
        Ok(())
    }
}
