//! Sidecar column-width config: `<file>.config` next to the CSV, one `index:width` per line.
//!
//! A missing file is generated from defaults. A file that cannot be read as text is removed
//! and regenerated; custom widths in it are lost. Malformed lines are skipped one by one.

use crate::utils::write_lines;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Display width per column. Columns without an entry use `default_width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWidths {
    widths: HashMap<usize, usize>,
    default_width: usize,
}

impl ColumnWidths {
    pub fn new(default_width: usize) -> Self {
        Self { widths: HashMap::new(), default_width }
    }

    pub fn get(&self, col: usize) -> usize {
        self.widths.get(&col).copied().unwrap_or(self.default_width)
    }

    /// Parse sidecar text. Blank lines and `#` comments are ignored; lines that are not
    /// `<index>:<positive width>` are skipped.
    pub fn parse(content: &str, default_width: usize) -> Self {
        let mut out = Self::new(default_width);
        for (n, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_line(line) {
                Some((col, width)) => {
                    out.widths.insert(col, width);
                }
                None => tracing::debug!(line = n + 1, "skipping malformed config line: {line:?}"),
            }
        }
        out
    }
}

fn parse_line(line: &str) -> Option<(usize, usize)> {
    let (col, width) = line.split_once(':')?;
    let col = col.trim().parse::<usize>().ok()?;
    let width = width.trim().parse::<usize>().ok()?;
    (width > 0).then_some((col, width))
}

/// Sidecar path: the CSV path with its extension replaced by `.config`.
pub fn config_path(csv_path: &Path) -> PathBuf {
    csv_path.with_extension("config")
}

/// Lines of a freshly generated config: columns `0..columns` at `width`.
fn default_lines(columns: usize, width: usize) -> Vec<String> {
    (0..columns).map(|col| format!("{col}:{width}")).collect()
}

/// Write a default config to `path`.
pub fn create_config(path: &Path, columns: usize, width: usize) -> Result<()> {
    write_lines(path, &default_lines(columns, width))
        .with_context(|| format!("Failed to create config {}", path.display()))
}

/// Load the sidecar config for `csv_path`, creating or repairing it as needed.
///
/// Never fails: every problem ends in default widths, and file-system errors while writing a
/// replacement are only logged.
pub fn load_config(csv_path: &Path, columns: usize, default_width: usize) -> ColumnWidths {
    let path = config_path(csv_path);

    match fs::read_to_string(&path) {
        Ok(content) => {
            tracing::info!("Loaded config [{}]", path.display());
            ColumnWidths::parse(&content, default_width)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("No config file found, creating {}", path.display());
            if let Err(e) = create_config(&path, columns, default_width) {
                tracing::warn!("{e:#}");
            }
            ColumnWidths::new(default_width)
        }
        Err(e) => {
            tracing::warn!("Config file {} unreadable ({e}), regenerating", path.display());
            if let Err(e) = regenerate_config(&path, columns, default_width) {
                tracing::warn!("{e:#}");
            }
            ColumnWidths::new(default_width)
        }
    }
}

fn regenerate_config(path: &Path, columns: usize, width: usize) -> Result<()> {
    fs::remove_file(path).with_context(|| format!("Failed removing bad config {}", path.display()))?;
    create_config(path, columns, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sets_listed_widths() {
        let w = ColumnWidths::parse("0:10\n3:20\n", 10);
        assert_eq!(w.get(3), 20);
        assert_eq!(w.get(0), 10);
        assert_eq!(w.get(7), 10);
    }

    #[test]
    fn parse_skips_malformed_lines() {
        let w = ColumnWidths::parse("1:15\nnot a line\n2:abc\n3:4:5\n# 4:99\n\n5:0\n6 : 30\n", 8);
        assert_eq!(w.get(1), 15);
        assert_eq!(w.get(2), 8);
        assert_eq!(w.get(3), 8);
        assert_eq!(w.get(4), 8);
        assert_eq!(w.get(5), 8);
        assert_eq!(w.get(6), 30);
    }

    #[test]
    fn config_path_replaces_extension() {
        assert_eq!(config_path(Path::new("/tmp/data.csv")), PathBuf::from("/tmp/data.config"));
        assert_eq!(config_path(Path::new("todo")), PathBuf::from("todo.config"));
    }

    #[test]
    fn missing_config_is_generated() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("tasks.csv");
        let w = load_config(&csv, 11, 10);
        assert_eq!(w, ColumnWidths::new(10));

        let written = fs::read_to_string(dir.path().join("tasks.config")).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "0:10");
        assert_eq!(lines[10], "10:10");
    }

    #[test]
    fn existing_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("tasks.csv");
        fs::write(dir.path().join("tasks.config"), "3:20\ngarbage\n").unwrap();
        let w = load_config(&csv, 11, 10);
        assert_eq!(w.get(3), 20);
        assert_eq!(w.get(4), 10);
    }

    #[test]
    fn unreadable_config_is_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("tasks.csv");
        let cfg = dir.path().join("tasks.config");
        fs::write(&cfg, [0x33, 0x3a, 0xff, 0xfe, 0x0a]).unwrap();

        let w = load_config(&csv, 3, 12);
        assert_eq!(w, ColumnWidths::new(12));
        assert_eq!(fs::read_to_string(&cfg).unwrap(), "0:12\n1:12\n2:12\n");
    }
}
