//! Reading and writing the CSV file and its `.completed.csv` archive.
//!
//! Saves never expose a half-written target: the grid goes to `<file>.tmp`, is flushed and
//! synced, and only then renamed over `<file>`.

use crate::grid::Grid;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// `<path><suffix>`, keeping the original extension (`a.csv` -> `a.csv.tmp`).
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

pub fn temp_path(path: &Path) -> PathBuf {
    with_suffix(path, ".tmp")
}

pub fn archive_path(path: &Path) -> PathBuf {
    with_suffix(path, ".completed.csv")
}

fn writer_for<W: Write>(out: W, delimiter: u8) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out)
}

/// Parse CSV text from any reader into a grid.
pub fn parse_grid<R: Read>(input: R, delimiter: u8) -> Result<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed record {}", i + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Grid::from_rows(rows)?)
}

/// Load a CSV file.
pub fn read_grid(path: &Path, delimiter: u8) -> Result<Grid> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let grid = parse_grid(file, delimiter).with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::info!(rows = grid.num_rows(), cols = grid.num_cols(), "Loaded {}", path.display());
    Ok(grid)
}

/// Serialize every row of the grid.
pub fn write_grid<W: Write>(out: W, grid: &Grid, delimiter: u8) -> Result<()> {
    let mut w = writer_for(out, delimiter);
    for row in grid.rows() {
        w.write_record(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Atomically replace `path` with the serialized grid.
///
/// On failure the temp file is removed and `path` still holds its previous content.
pub fn save_grid(path: &Path, grid: &Grid, delimiter: u8) -> Result<()> {
    let tmp = temp_path(path);
    let result = write_temp(&tmp, grid, delimiter).and_then(|()| {
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed renaming {} to {}", tmp.display(), path.display()))
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_temp(tmp: &Path, grid: &Grid, delimiter: u8) -> Result<()> {
    let file = File::create(tmp).with_context(|| format!("Failed to create {}", tmp.display()))?;
    let mut out = BufWriter::new(file);
    write_grid(&mut out, grid, delimiter).with_context(|| format!("Failed writing {}", tmp.display()))?;
    let file = out.into_inner().map_err(|e| e.into_error())
        .with_context(|| format!("Failed flushing {}", tmp.display()))?;
    file.sync_all().with_context(|| format!("Failed syncing {}", tmp.display()))?;
    Ok(())
}

/// Append `row` to the archive next to `path`, writing `header` first if the archive is new.
pub fn archive_row(path: &Path, header: &[String], row: &[String], delimiter: u8) -> Result<()> {
    let archive = archive_path(path);
    // an empty leftover file still needs the header
    let is_new = !fs::metadata(&archive).is_ok_and(|m| m.len() > 0);

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&archive)
        .with_context(|| format!("Failed to open {}", archive.display()))?;

    let mut w = writer_for(file, delimiter);
    if is_new {
        w.write_record(header).with_context(|| format!("Failed writing header to {}", archive.display()))?;
    }
    w.write_record(row).with_context(|| format!("Failed writing to {}", archive.display()))?;
    w.flush().with_context(|| format!("Failed flushing {}", archive.display()))?;
    tracing::info!("Archived row to {}", archive.display());
    Ok(())
}
