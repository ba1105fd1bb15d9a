//! The grid model: a rectangular matrix of string cells plus the selection cursor.
//!
//! Row 0 is the header row. It is stored like any other row, but `delete_row` refuses to
//! remove it and the archive workflow never copies it as a data row.
//!
//! Every structural operation touches every row. That is fine for an interactive editor that
//! keeps the whole file in memory.

use crate::types::CellPos;
use thiserror::Error;

/// Why a set of parsed rows could not become a grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("file has no header row")]
    Empty,
    #[error("row {row} has {found} fields but the header has {expected}")]
    RowWidth { row: usize, found: usize, expected: usize },
}

/// The in-memory table.
///
/// Invariants:
/// - `rows.len() == num_rows` and every row has exactly `num_cols` cells.
/// - `num_rows >= 1` and `num_cols >= 1` (there is always a header with at least one column).
/// - `selection` is always inside `[0, num_rows) x [0, num_cols)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
    num_rows: usize,
    num_cols: usize,
    selection: CellPos,
}

impl Grid {
    /// Build a grid from parsed records.
    ///
    /// The column count is fixed by the header. Any row with a different number of fields is
    /// rejected, so a loaded file is never reshaped before the user touches it.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, GridError> {
        let num_cols = match rows.first() {
            Some(header) if !header.is_empty() => header.len(),
            _ => return Err(GridError::Empty),
        };

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != num_cols) {
            return Err(GridError::RowWidth { row: i, found: row.len(), expected: num_cols });
        }

        let num_rows = rows.len();
        Ok(Self { rows, num_rows, num_cols, selection: CellPos::default() })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn selection(&self) -> CellPos {
        self.selection
    }

    /// All rows, header first.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn header(&self) -> &[String] {
        &self.rows[0]
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// The value under the selection.
    pub fn selected_value(&self) -> &str {
        &self.rows[self.selection.row][self.selection.col]
    }

    /// Overwrite one cell. Out-of-bounds coordinates are ignored.
    ///
    /// Returns whether anything was written.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value.into();
                true
            }
            None => false,
        }
    }

    /// Move the selection. Coordinates outside the grid leave it where it is.
    pub fn select_cell(&mut self, row: usize, col: usize) -> CellPos {
        if row < self.num_rows && col < self.num_cols {
            self.selection = CellPos::new(row, col);
        }
        self.selection
    }

    /// Move the selection by a signed offset, stopping at the grid edges (no wrap-around).
    pub fn move_selection(&mut self, d_row: isize, d_col: isize) -> CellPos {
        let row = clamp_step(self.selection.row, d_row, self.num_rows);
        let col = clamp_step(self.selection.col, d_col, self.num_cols);
        self.select_cell(row, col)
    }

    /// Pull the selection back inside the grid after the grid was replaced or shrunk.
    pub fn clamp_selection(&mut self, wanted: CellPos) -> CellPos {
        let row = wanted.row.min(self.num_rows - 1);
        let col = wanted.col.min(self.num_cols - 1);
        self.select_cell(row, col)
    }

    /// Insert an empty column right after `col` and select it.
    pub fn insert_column_after(&mut self, col: usize) -> bool {
        if self.rows.is_empty() || col >= self.num_cols {
            return false;
        }
        let at = col + 1;
        for row in &mut self.rows {
            row.insert(at, String::new());
        }
        self.num_cols += 1;
        self.selection.col = at;
        true
    }

    /// Insert an empty row right after `row` and select its first cell.
    pub fn insert_row_after(&mut self, row: usize) -> bool {
        if row >= self.num_rows {
            return false;
        }
        let at = row + 1;
        self.rows.insert(at, vec![String::new(); self.num_cols]);
        self.num_rows += 1;
        self.selection = CellPos::new(at, 0);
        true
    }

    /// Remove a data row. The header and the last remaining row are never removed.
    pub fn delete_row(&mut self, row: usize) -> bool {
        if row == 0 || row >= self.num_rows || self.num_rows <= 1 {
            return false;
        }
        self.rows.remove(row);
        self.num_rows -= 1;
        self.selection = CellPos::new(row.min(self.num_rows - 1), 0);
        true
    }

    /// Remove a column from every row. The last remaining column is never removed.
    pub fn delete_column(&mut self, col: usize) -> bool {
        if col >= self.num_cols || self.num_cols <= 1 {
            return false;
        }
        for row in &mut self.rows {
            row.remove(col);
        }
        self.num_cols -= 1;
        if self.selection.col >= self.num_cols {
            self.selection.col = self.num_cols - 1;
        }
        true
    }

    #[cfg(test)]
    pub fn is_rectangular(&self) -> bool {
        self.rows.len() == self.num_rows && self.rows.iter().all(|r| r.len() == self.num_cols)
    }
}

fn clamp_step(from: usize, delta: isize, len: usize) -> usize {
    let last = len.saturating_sub(1);
    from.saturating_add_signed(delta).min(last)
}

#[cfg(test)]
pub(crate) fn rows_of(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter().map(|r| r.iter().map(|s| (*s).to_string()).collect()).collect()
}
