// CSV import/export
//
// Import replaces the whole grid; dimensions become whatever the file
// implies. Export writes every field double-quoted, raw cell values (a
// formula cell exports its source text, not its evaluation).
//
// A naive split-on-delimiter codec loses any value containing a comma or a
// quote character. This one uses a real CSV parser/writer, so quoted fields
// with embedded commas and doubled quotes survive a round-trip; plain
// content is byte-compatible with the naive form.

use std::path::Path;

use gridpad_engine::cell::Cell;
use gridpad_engine::grid::Grid;

pub fn import(path: &Path) -> Result<Grid, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    import_from_string(&content)
}

pub fn import_from_string(content: &str) -> Result<Grid, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        let row = record
            .iter()
            .map(|field| Cell {
                value: field.to_string(),
                ..Cell::default()
            })
            .collect();
        rows.push(row);
    }

    // Ragged rows are accepted; from_rows pads them back to rectangular.
    Ok(Grid::from_rows(rows))
}

pub fn export(grid: &Grid, path: &Path) -> Result<(), String> {
    let content = export_to_string(grid)?;
    std::fs::write(path, content).map_err(|e| e.to_string())
}

pub fn export_to_string(grid: &Grid) -> Result<String, String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    for row in grid.iter_rows() {
        writer
            .write_record(row.iter().map(|cell| cell.value.as_str()))
            .map_err(|e| e.to_string())?;
    }

    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_import_simple_grid() {
        let grid = import_from_string("a,b,c\n1,2,3\n").unwrap();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.col_count(), 3);
        assert_eq!(grid.get(0, 0).value, "a");
        assert_eq!(grid.get(1, 2).value, "3");
        assert!(grid.get(0, 0).style.is_empty());
    }

    #[test]
    fn test_import_strips_field_quotes() {
        let grid = import_from_string("\"a\",\"b\"\n").unwrap();
        assert_eq!(grid.get(0, 0).value, "a");
        assert_eq!(grid.get(0, 1).value, "b");
    }

    #[test]
    fn test_import_pads_ragged_rows() {
        let grid = import_from_string("a\nb,c,d\n").unwrap();
        assert_eq!(grid.col_count(), 3);
        assert_eq!(grid.get(0, 0).value, "a");
        assert!(grid.get(0, 1).is_blank());
        assert!(grid.get(0, 2).is_blank());
    }

    #[test]
    fn test_imported_formula_text_stays_literal() {
        // Import fills values only; the edit path is the one place formula
        // sources are captured.
        let grid = import_from_string("=SUM(A1:B1)\n").unwrap();
        assert_eq!(grid.get(0, 0).value, "=SUM(A1:B1)");
        assert!(grid.get(0, 0).raw.is_none());
    }

    #[test]
    fn test_export_quotes_every_field() {
        let grid = Grid::blank(1, 2).with_value(0, 0, "x").with_value(0, 1, "7");
        let csv = export_to_string(&grid).unwrap();
        assert_eq!(csv, "\"x\",\"7\"\n");
    }

    #[test]
    fn test_export_writes_formula_source_not_result() {
        let grid = Grid::blank(1, 2)
            .with_value(0, 0, "5")
            .with_value(0, 1, "=SUM(A1:A1)");
        let csv = export_to_string(&grid).unwrap();
        assert_eq!(csv, "\"5\",\"=SUM(A1:A1)\"\n");
    }

    #[test]
    fn test_round_trip_plain_values() {
        let grid = Grid::blank(2, 2)
            .with_value(0, 0, "alpha")
            .with_value(0, 1, "42")
            .with_value(1, 0, "beta7")
            .with_value(1, 1, "3.5");
        let back = import_from_string(&export_to_string(&grid).unwrap()).unwrap();
        for r in 0..2 {
            for c in 0..2 {
                assert_eq!(back.get(r, c).value, grid.get(r, c).value);
            }
        }
    }

    #[test]
    fn test_round_trip_embedded_comma_and_quote() {
        // Values a naive split would mangle survive the real codec.
        let grid = Grid::blank(1, 2)
            .with_value(0, 0, "a,b")
            .with_value(0, 1, "say \"hi\"");
        let back = import_from_string(&export_to_string(&grid).unwrap()).unwrap();
        assert_eq!(back.col_count(), 2);
        assert_eq!(back.get(0, 0).value, "a,b");
        assert_eq!(back.get(0, 1).value, "say \"hi\"");
    }

    #[test]
    fn test_round_trip_does_not_keep_styles() {
        let grid = Grid::blank(1, 1)
            .with_value(0, 0, "styled")
            .with_style(0, 0, "font-weight", "bold");
        let back = import_from_string(&export_to_string(&grid).unwrap()).unwrap();
        assert_eq!(back.get(0, 0).value, "styled");
        assert!(back.get(0, 0).style.is_empty());
    }

    #[test]
    fn test_empty_input_imports_empty_grid() {
        let grid = import_from_string("").unwrap();
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.col_count(), 0);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.csv");

        let grid = Grid::blank(2, 2)
            .with_value(0, 0, "Name")
            .with_value(0, 1, "Value")
            .with_value(1, 0, "Alice")
            .with_value(1, 1, "42");
        export(&grid, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Alice\""));

        let imported = import(&path).unwrap();
        assert_eq!(imported.get(1, 1).value, "42");
    }
}
