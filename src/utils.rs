//! Utility functions.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthChar;

const APP_DIR: &str = "csvpad";

/// Convert a "character index" to a "byte index" in a UTF‑8 string.
///
/// Rust strings are UTF‑8, so you cannot safely slice with `s[a..b]` unless `a` and `b` are
/// **byte offsets** that lie on UTF‑8 character boundaries.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(bi, _)| bi)
}

/// Terminal display width of a string.
pub fn display_width(s: &str) -> usize {
    s.chars().map(|ch| UnicodeWidthChar::width(ch).unwrap_or(1)).sum()
}

/// Take as many leading chars of `s` as fit into `width` display columns.
pub fn take_width(s: &str, width: usize) -> (&str, usize) {
    let mut used = 0;
    for (bi, ch) in s.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(1);
        if used + w > width {
            return (&s[..bi], used);
        }
        used += w;
    }
    (s, used)
}

/// Fit cell text into exactly `width` display columns.
///
/// Short text is padded with spaces. Long text is cut to `width - 3` columns followed by
/// `...`, or hard-cut when the column is too narrow to hold the ellipsis.
pub fn fit_to_width(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        let mut out = text.to_string();
        out.push_str(&" ".repeat(width - display_width(text)));
        return out;
    }
    let (head, used) = if width > 3 { take_width(text, width - 3) } else { take_width(text, width) };
    let mut out = head.to_string();
    if width > 3 {
        out.push_str("...");
    }
    let total = used + if width > 3 { 3 } else { 0 };
    out.push_str(&" ".repeat(width.saturating_sub(total)));
    out
}

/// Replace a file's contents with `lines`, one per line.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for line in lines {
        writeln!(w, "{line}").with_context(|| format!("Failed writing {}", path.display()))?;
    }
    w.flush().with_context(|| format!("Failed writing {}", path.display()))?;
    Ok(())
}

/// Per-user directory for csvpad files (`~/.config/csvpad` on Unix).
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Where to look for `settings.toml`, in priority order:
/// - the current working directory
/// - next to the executable
/// - the per-user config directory
pub fn settings_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            dirs.push(dir.to_path_buf());
        }
    }

    if let Some(dir) = app_config_dir() {
        dirs.push(dir);
    }

    dirs
}
