use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// Default grid shape for a fresh sheet.
pub const ROWS: usize = 10;
pub const COLS: usize = 10;

/// The single source of truth for sheet state: an ordered sequence of rows,
/// each an ordered sequence of cells.
///
/// Invariants:
/// - rectangular at all times (every row has the same column count);
/// - columns only grow, never shrink, and grow uniformly across all rows.
///
/// Mutations produce a new snapshot instead of editing in place, so callers
/// get equality-based change detection for free (`PartialEq` on snapshots).
///
/// The serialized form is a bare JSON array-of-arrays of cell objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::blank(ROWS, COLS)
    }
}

impl Grid {
    /// A rows x cols grid of empty-value, empty-style cells.
    pub fn blank(rows: usize, cols: usize) -> Self {
        Self {
            rows: (0..rows).map(|_| vec![Cell::new(); cols]).collect(),
        }
    }

    /// Build a grid from pre-assembled rows (CSV import). Ragged input is
    /// accepted and padded with blank cells to the widest row, so the
    /// rectangular invariant holds downstream.
    pub fn from_rows(mut rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::new());
        }
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Direct cell access. Out-of-bounds coordinates are a programming
    /// error and panic; use [`Grid::cell`] for tolerant lookup.
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        &self.rows[row][col]
    }

    /// Bounds-tolerant lookup, for the evaluator and renderers.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Snapshot with an edit applied at (row, col).
    ///
    /// A column index at or beyond the current width first grows every row
    /// uniformly, one blank column at a time, until the index fits - so the
    /// write always lands, however far past the edge it targets. The row
    /// index must be in bounds (rows never grow on edit).
    pub fn with_value(&self, row: usize, col: usize, input: &str) -> Grid {
        let mut next = self.clone();
        while col >= next.col_count() {
            for r in &mut next.rows {
                r.push(Cell::new());
            }
        }
        next.rows[row][col].set(input);
        next
    }

    /// Snapshot with one style entry merged into the cell at (row, col).
    pub fn with_style(&self, row: usize, col: usize, key: &str, value: &str) -> Grid {
        let mut next = self.clone();
        next.rows[row][col].style.set(key, value);
        next
    }
}

/// Spreadsheet-style alphabetic label for a 0-based column index, in
/// bijective base-26: 0=A, 25=Z, 26=AA, 27=AB, ...
///
/// Exact inverse of [`crate::formula::refs::parse_column_label`].
pub fn column_label(index: usize) -> String {
    let mut label = String::new();
    let mut n = index;
    loop {
        label.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    label
}
