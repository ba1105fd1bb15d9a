//! Full-screen overlays: help screen, magnified cell.

use crate::settings::user_settings_path;
use crate::utils::{display_width, take_width};
use super::Editor;
use anyhow::Result;
use crossterm::{
    cursor,
    style::{self, Color},
    terminal::{self, ClearType},
    QueueableCommand,
};
use std::io::{Stdout, Write};

/// Break `text` into lines no wider than `width` display columns.
///
/// Explicit line breaks are kept; long lines are split at spaces where possible.
fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for para in text.lines() {
        let mut line = String::new();
        for word in para.split(' ') {
            let sep = usize::from(!line.is_empty());
            if display_width(&line) + sep + display_width(word) <= width {
                if sep == 1 { line.push(' '); }
                line.push_str(word);
                continue;
            }
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
            // a word longer than the line gets hard-split
            let mut rest = word;
            while display_width(rest) > width {
                let (head, _) = take_width(rest, width);
                let head = if head.is_empty() { &rest[..rest.chars().next().map_or(0, char::len_utf8)] } else { head };
                out.push(head.to_string());
                rest = &rest[head.len()..];
            }
            line.push_str(rest);
        }
        out.push(line);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

impl Editor {
    /// Draw `lines` centered as a block on a cleared, colored screen.
    fn render_centered(&self, stdout: &mut Stdout, bg: Color, lines: &[String]) -> Result<()> {
        let (width, height) = self.viewport;

        stdout.queue(cursor::Hide)?;
        stdout.queue(style::SetBackgroundColor(bg))?;
        stdout.queue(style::SetForegroundColor(Color::White))?;
        stdout.queue(terminal::Clear(ClearType::All))?;

        let block_w = lines.iter().map(|l| display_width(l)).max().unwrap_or(0).min(width);
        let x = width.saturating_sub(block_w) / 2;
        let start_y = height.saturating_sub(lines.len()) / 2;
        for (i, line) in lines.iter().take(height).enumerate() {
            stdout.queue(cursor::MoveTo(x as u16, (start_y + i) as u16))?;
            stdout.queue(style::Print(take_width(line, width - x).0))?;
        }

        stdout.queue(style::ResetColor)?;
        stdout.flush()?;
        Ok(())
    }

    /// Render the help screen from the live keymap.
    pub fn render_help(&mut self, stdout: &mut Stdout) -> Result<()> {
        let mut lines = vec![
            " CSVPAD HELP ".to_string(),
            "=============".to_string(),
            String::new(),
            " TABLE:".to_string(),
        ];
        for (key, action) in self.keymap.bindings() {
            lines.push(format!("  {:<14} {}", key, action.description()));
        }

        lines.extend(
            [
                "",
                " EDITING A CELL:",
                "  Enter          Commit the edit",
                "  Esc            Cancel the edit",
                "  Left / Right   Move the cursor",
                "  Home / End     Start / end of the field",
                "  Ctrl+U         Clear the field",
                "  Ctrl+V         Paste",
                "",
                " DIALOGS:",
                "  Left / Right   Switch between Yes and No",
                "  Enter          Activate the focused button",
                "  Y / N / Esc    Yes / No / No",
                "",
            ]
            .map(String::from),
        );
        if let Some(path) = user_settings_path() {
            lines.push(format!(" Key overrides: [keys] in {}", path.display()));
            lines.push(String::new());
        }
        lines.push(" Press any key to close help...".to_string());

        self.render_centered(stdout, Color::DarkBlue, &lines)
    }

    /// Render the selected cell's full content.
    pub fn render_magnify(&mut self, stdout: &mut Stdout) -> Result<()> {
        let sel = self.grid.selection();
        let column = self.grid.get_cell(0, sel.col).unwrap_or("");
        let wrap_w = self.viewport.0.saturating_sub(4).max(10);

        let mut lines = vec![format!(" {column} (row {}, col {})", sel.row + 1, sel.col + 1), String::new()];
        lines.extend(wrap_to_width(self.grid.selected_value(), wrap_w));
        lines.push(String::new());
        lines.push(" Press any key to close...".to_string());

        self.render_centered(stdout, Color::DarkMagenta, &lines)
    }
}
