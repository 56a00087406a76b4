//! Range-aggregate formula evaluation.
//!
//! The formula language is deliberately small: a single aggregate function
//! applied to one rectangular range, e.g. `=SUM(A1:B3)`. Anything else is
//! passed through for display rather than treated as an error.
//!
//! Evaluation is read-only over the grid and recomputed on every call;
//! nothing is cached or written back.

use gridpad_core::Range;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::grid::Grid;
use super::refs::parse_cell_ref;

/// Marker displayed when MAX/MIN is applied to a range that contributed no
/// numeric values. There is no extremum to report, and surfacing a
/// platform infinity would be worse than an explicit error cell.
pub const EMPTY_RANGE_MARKER: &str = "#EMPTY!";

// Matches an aggregate call over a single rectangular range. Unanchored:
// the first match anywhere in the stripped text wins, the rest is ignored.
static RANGE_FORMULA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(SUM|AVERAGE|MAX|MIN|COUNT)\(([A-Z]+[0-9]+):([A-Z]+[0-9]+)\)")
        .expect("aggregate pattern is valid")
});

/// The five supported range aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Average,
    Max,
    Min,
    Count,
}

impl Aggregate {
    pub fn from_name(name: &str) -> Option<Aggregate> {
        match name {
            "SUM" => Some(Aggregate::Sum),
            "AVERAGE" => Some(Aggregate::Average),
            "MAX" => Some(Aggregate::Max),
            "MIN" => Some(Aggregate::Min),
            "COUNT" => Some(Aggregate::Count),
            _ => None,
        }
    }

    /// Fold the collected numbers. `None` means the aggregate has no
    /// defined result for an empty collection (MAX/MIN).
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        match self {
            Aggregate::Sum => Some(values.iter().sum()),
            Aggregate::Average => {
                if values.is_empty() {
                    Some(0.0)
                } else {
                    Some(values.iter().sum::<f64>() / values.len() as f64)
                }
            }
            Aggregate::Max => values.iter().copied().reduce(f64::max),
            Aggregate::Min => values.iter().copied().reduce(f64::min),
            Aggregate::Count => Some(values.len() as f64),
        }
    }
}

/// Compute the display text for a cell's raw content.
///
/// - Input not starting with `=` is returned unchanged.
/// - Otherwise the `=` is stripped, the rest uppercased, and matched against
///   the aggregate pattern; no match means the uppercased text is returned
///   verbatim (best-effort passthrough, not an error).
/// - A reversed range (start after end on either axis) is empty by
///   definition - bounds are never swapped.
/// - References outside the grid contribute nothing, as do cells whose
///   value does not parse as a number.
pub fn evaluate(grid: &Grid, input: &str) -> String {
    let Some(body) = input.strip_prefix('=') else {
        return input.to_string();
    };
    let body = body.to_uppercase();

    let Some(caps) = RANGE_FORMULA.captures(&body) else {
        return body;
    };

    let Some(func) = Aggregate::from_name(&caps[1]) else {
        return body;
    };
    // The pattern guarantees letters-then-digits; only a zero row number
    // can still fail, and a range anchored on a nonexistent row is empty.
    let start = parse_cell_ref(&caps[2]);
    let end = parse_cell_ref(&caps[3]);

    let values = match (start, end) {
        (Some(start), Some(end)) => collect_numbers(grid, start, end),
        _ => Vec::new(),
    };

    match func.apply(&values) {
        Some(n) => format_number(n),
        None => EMPTY_RANGE_MARKER.to_string(),
    }
}

/// Numeric interpretation of every cell in the inclusive rectangle,
/// row-major. Non-numeric and out-of-grid cells are silently skipped.
fn collect_numbers(grid: &Grid, start: (usize, usize), end: (usize, usize)) -> Vec<f64> {
    // Built without corner normalization: a reversed rectangle iterates as
    // empty instead of being silently swapped.
    let range = Range {
        start_row: start.0,
        start_col: start.1,
        end_row: end.0,
        end_col: end.1,
    };
    range
        .cells()
        .filter_map(|(row, col)| grid.cell(row, col))
        .filter_map(|cell| cell.value.trim().parse::<f64>().ok())
        .collect()
}

/// Whole numbers display without a fractional tail.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
