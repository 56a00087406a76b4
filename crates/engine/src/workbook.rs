//! The grid store owner: current snapshot, selection, injected persistence.
//!
//! Every mutation builds a new grid snapshot, swaps it in, and mirrors it
//! through the store synchronously. Rendering goes through
//! [`Workbook::display`], which evaluates formula cells on every call.

use gridpad_core::Selection;

use crate::cell::StyleKey;
use crate::formula::eval;
use crate::grid::Grid;
use crate::store::Store;

pub struct Workbook {
    grid: Grid,
    selection: Selection,
    store: Box<dyn Store>,
    /// Blank-grid dimensions used by `clear()`. CSV import may change the
    /// live grid's shape; clearing returns to these.
    blank_rows: usize,
    blank_cols: usize,
}

impl Workbook {
    /// Open from the store, falling back to a blank rows x cols grid when
    /// nothing is saved or the save does not decode.
    pub fn open(store: Box<dyn Store>, rows: usize, cols: usize) -> Self {
        let grid = store.load().unwrap_or_else(|| Grid::blank(rows, cols));
        Self {
            grid,
            selection: Selection::none(),
            store,
            blank_rows: rows,
            blank_cols: cols,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection.active_cell()
    }

    pub fn select(&mut self, row: usize, col: usize) {
        self.selection.select(row, col);
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    /// Apply an edit at (row, col) and persist the new snapshot.
    pub fn edit(&mut self, row: usize, col: usize, input: &str) -> Result<(), String> {
        let next = self.grid.with_value(row, col, input);
        self.commit(next)
    }

    /// Merge one style entry into the selected cell and persist.
    /// A no-op when no cell is selected.
    pub fn apply_style(&mut self, key: &str, value: &str) -> Result<(), String> {
        let Some((row, col)) = self.selection.active_cell() else {
            return Ok(());
        };
        let next = self.grid.with_style(row, col, key, value);
        self.commit(next)
    }

    /// Typed variant for the recognized toolbar keys.
    pub fn apply_known_style(&mut self, key: StyleKey, value: &str) -> Result<(), String> {
        self.apply_style(key.as_str(), value)
    }

    /// Replace the whole grid (CSV import). Dimensions become whatever the
    /// new grid carries.
    pub fn replace_grid(&mut self, grid: Grid) -> Result<(), String> {
        self.commit(grid)
    }

    /// Reset to a blank grid at the configured dimensions and erase the
    /// persisted copy. A later `open` against the same store starts blank.
    pub fn clear(&mut self) -> Result<(), String> {
        self.grid = Grid::blank(self.blank_rows, self.blank_cols);
        self.store.clear()
    }

    /// The render value for a cell: the live formula evaluation when a raw
    /// formula source is present, the literal value otherwise. Tolerates
    /// out-of-bounds coordinates (renders as empty).
    pub fn display(&self, row: usize, col: usize) -> String {
        match self.grid.cell(row, col) {
            Some(cell) => match cell.raw.as_deref() {
                Some(raw) => eval::evaluate(&self.grid, raw),
                None => cell.value.clone(),
            },
            None => String::new(),
        }
    }

    fn commit(&mut self, next: Grid) -> Result<(), String> {
        // Snapshot equality makes unchanged commits free.
        if next == self.grid {
            return Ok(());
        }
        self.grid = next;
        self.store.save(&self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn open_blank() -> (Workbook, MemoryStore) {
        let store = MemoryStore::new();
        let wb = Workbook::open(Box::new(store.clone()), 10, 10);
        (wb, store)
    }

    #[test]
    fn test_open_falls_back_to_blank_grid() {
        let (wb, _) = open_blank();
        assert_eq!(wb.grid().row_count(), 10);
        assert_eq!(wb.grid().col_count(), 10);
    }

    #[test]
    fn test_open_recovers_saved_grid() {
        let store = MemoryStore::new();
        {
            let mut wb = Workbook::open(Box::new(store.clone()), 10, 10);
            wb.edit(3, 4, "persisted").unwrap();
        }
        let wb = Workbook::open(Box::new(store.clone()), 10, 10);
        assert_eq!(wb.grid().get(3, 4).value, "persisted");
    }

    #[test]
    fn test_open_with_corrupt_save_falls_back_silently() {
        let store = MemoryStore::with_blob("][ definitely not a grid");
        let wb = Workbook::open(Box::new(store), 10, 10);
        assert_eq!(wb.grid().row_count(), 10);
        assert!(wb.grid().get(0, 0).is_blank());
    }

    #[test]
    fn test_every_edit_is_mirrored_to_the_store() {
        let (mut wb, store) = open_blank();
        wb.edit(0, 0, "1").unwrap();
        let after_first = store.blob();
        wb.edit(0, 1, "2").unwrap();
        assert_ne!(store.blob(), after_first);
        assert_eq!(store.load(), Some(wb.grid().clone()));
    }

    #[test]
    fn test_display_evaluates_captured_formula() {
        let (mut wb, _) = open_blank();
        wb.edit(0, 0, "5").unwrap();
        wb.edit(0, 1, "7").unwrap();
        wb.edit(1, 0, "=SUM(A1:B1)").unwrap();
        assert_eq!(wb.display(1, 0), "12");
        // The literal value keeps the source text.
        assert_eq!(wb.grid().get(1, 0).value, "=SUM(A1:B1)");
    }

    #[test]
    fn test_value_only_formula_displays_literally() {
        // A `=`-prefixed value with no captured raw source renders as-is.
        // Evaluation keys off the raw field alone, and only the edit path
        // produces that field.
        let store = MemoryStore::with_blob(
            r#"[[{"value":"=SUM(A1:A1)","style":{}}]]"#,
        );
        let wb = Workbook::open(Box::new(store), 10, 10);
        assert_eq!(wb.display(0, 0), "=SUM(A1:A1)");
    }

    #[test]
    fn test_style_with_no_selection_is_a_noop() {
        let (mut wb, store) = open_blank();
        let before = wb.grid().clone();
        wb.apply_style("font-weight", "bold").unwrap();
        assert_eq!(wb.grid(), &before);
        assert!(store.blob().is_none());
    }

    #[test]
    fn test_style_applies_to_selected_cell() {
        let (mut wb, _) = open_blank();
        wb.select(2, 3);
        wb.apply_known_style(StyleKey::FontWeight, "bold").unwrap();
        wb.apply_style("color", "#123456").unwrap();
        let style = &wb.grid().get(2, 3).style;
        assert_eq!(style.get("font-weight"), Some("bold"));
        assert_eq!(style.get("color"), Some("#123456"));
    }

    #[test]
    fn test_clear_resets_grid_and_erases_save() {
        let (mut wb, store) = open_blank();
        wb.edit(0, 0, "data").unwrap();
        wb.edit(0, 12, "wide").unwrap();
        wb.clear().unwrap();

        assert_eq!(wb.grid().row_count(), 10);
        assert_eq!(wb.grid().col_count(), 10);
        assert!(wb.grid().iter_rows().all(|r| r.iter().all(|c| c.is_blank())));
        // A subsequent load yields nothing.
        assert!(store.load().is_none());
    }

    #[test]
    fn test_replace_grid_adopts_new_dimensions() {
        let (mut wb, store) = open_blank();
        wb.replace_grid(Grid::blank(3, 2)).unwrap();
        assert_eq!(wb.grid().row_count(), 3);
        assert_eq!(wb.grid().col_count(), 2);
        assert_eq!(store.load(), Some(wb.grid().clone()));
    }

    #[test]
    fn test_edit_grows_columns_and_persists_rectangular() {
        let (mut wb, store) = open_blank();
        wb.edit(0, 10, "edge").unwrap();
        assert_eq!(wb.grid().col_count(), 11);
        let saved = store.load().unwrap();
        assert!(saved.iter_rows().all(|r| r.len() == 11));
    }

    #[test]
    fn test_selection_survives_grid_replacement() {
        // The selection is a weak coordinate; replacing the grid does not
        // reset it.
        let (mut wb, _) = open_blank();
        wb.select(1, 1);
        wb.replace_grid(Grid::blank(5, 5)).unwrap();
        assert_eq!(wb.selection(), Some((1, 1)));
    }
}
