// gridpad CLI - headless spreadsheet operations
//
// Each invocation loads the persisted grid, applies at most one mutation,
// and autosaves - the same lifecycle a browser session gives the grid, one
// event at a time.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gridpad_config::Settings;
use gridpad_engine::cell::StyleKey;
use gridpad_engine::formula::eval;
use gridpad_engine::formula::refs::parse_cell_ref;
use gridpad_engine::grid::column_label;
use gridpad_engine::workbook::Workbook;
use gridpad_io::csv;
use gridpad_io::store::JsonFileStore;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(name = "gridpad")]
#[command(about = "Small persistent spreadsheet (CLI mode, headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the grid with column labels and row numbers
    Show,

    /// Set a cell's value (formulas start with =)
    #[command(after_help = "\
Examples:
  gridpad set A1 5
  gridpad set B1 7
  gridpad set C1 '=SUM(A1:B1)'")]
    Set {
        /// Target cell, e.g. B3
        cell: String,
        /// New value
        value: String,
    },

    /// Print one cell's display value
    Get {
        /// Target cell, e.g. B3
        cell: String,
        /// Print the raw content instead of the evaluated display
        #[arg(long)]
        raw: bool,
    },

    /// Merge a style entry into a cell
    #[command(after_help = "\
Examples:
  gridpad style B2 font-size 20px
  gridpad style B2 color '#00ff00'")]
    Style {
        /// Target cell, e.g. B3
        cell: String,
        /// Style key (font-weight, font-style, font-size, color, ...)
        key: String,
        /// Style value
        value: String,
    },

    /// Make a cell bold (shorthand for style <CELL> font-weight bold)
    Bold { cell: String },

    /// Make a cell italic (shorthand for style <CELL> font-style italic)
    Italic { cell: String },

    /// Evaluate a formula against the current grid without editing it
    #[command(after_help = "\
Examples:
  gridpad calc '=AVERAGE(A1:B2)'
  gridpad calc '=COUNT(A1:A10)'")]
    Calc {
        /// Formula to evaluate (must start with =)
        formula: String,
    },

    /// Replace the grid with the contents of a CSV file
    Import {
        /// Input file
        file: PathBuf,
    },

    /// Write the grid as CSV
    Export {
        /// Output file (omit for stdout)
        output: Option<PathBuf>,
    },

    /// Reset to a blank grid and erase the persisted copy
    Clear,
}

enum CliError {
    Usage(String),
    Op(String),
}

impl From<String> for CliError {
    fn from(message: String) -> Self {
        CliError::Op(message)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError::Usage(message)) => {
            eprintln!("error: {}", message);
            ExitCode::from(EXIT_USAGE)
        }
        Err(CliError::Op(message)) => {
            eprintln!("error: {}", message);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    let settings = Settings::load();
    let store = match &settings.data_file {
        Some(path) => JsonFileStore::at(path.clone()),
        None => JsonFileStore::new(),
    };
    let mut workbook = Workbook::open(Box::new(store), settings.rows, settings.cols);

    match command {
        Commands::Show => {
            print!("{}", render(&workbook));
            Ok(())
        }
        Commands::Set { cell, value } => {
            let (row, col) = target(&cell)?;
            if row >= workbook.grid().row_count() {
                return Err(CliError::Usage(format!(
                    "row {} is outside the grid ({} rows)",
                    row + 1,
                    workbook.grid().row_count()
                )));
            }
            workbook.edit(row, col, &value)?;
            Ok(())
        }
        Commands::Get { cell, raw } => {
            let (row, col) = target(&cell)?;
            let text = if raw {
                workbook
                    .grid()
                    .cell(row, col)
                    .map(|c| c.value.clone())
                    .unwrap_or_default()
            } else {
                workbook.display(row, col)
            };
            println!("{}", text);
            Ok(())
        }
        Commands::Style { cell, key, value } => apply_style(&mut workbook, &cell, &key, &value),
        Commands::Bold { cell } => {
            apply_style(&mut workbook, &cell, StyleKey::FontWeight.as_str(), "bold")
        }
        Commands::Italic { cell } => {
            apply_style(&mut workbook, &cell, StyleKey::FontStyle.as_str(), "italic")
        }
        Commands::Calc { formula } => {
            if !formula.starts_with('=') {
                return Err(CliError::Usage("formula must start with =".to_string()));
            }
            println!("{}", eval::evaluate(workbook.grid(), &formula));
            Ok(())
        }
        Commands::Import { file } => {
            let grid = csv::import(&file)?;
            workbook.replace_grid(grid)?;
            Ok(())
        }
        Commands::Export { output } => {
            let content = csv::export_to_string(workbook.grid())?;
            match output {
                Some(path) => std::fs::write(&path, content).map_err(|e| e.to_string())?,
                None => print!("{}", content),
            }
            Ok(())
        }
        Commands::Clear => {
            workbook.clear()?;
            Ok(())
        }
    }
}

fn apply_style(
    workbook: &mut Workbook,
    cell: &str,
    key: &str,
    value: &str,
) -> Result<(), CliError> {
    let (row, col) = target(cell)?;
    if workbook.grid().cell(row, col).is_none() {
        return Err(CliError::Usage(format!("{} is outside the grid", cell)));
    }
    if StyleKey::parse(key).is_none() {
        eprintln!("note: unrecognized style key '{}' (stored as-is)", key);
    }
    workbook.select(row, col);
    workbook.apply_style(key, value)?;
    Ok(())
}

fn target(cell: &str) -> Result<(usize, usize), CliError> {
    parse_cell_ref(&cell.to_uppercase())
        .ok_or_else(|| CliError::Usage(format!("'{}' is not a cell reference (like B3)", cell)))
}

fn render(workbook: &Workbook) -> String {
    let grid = workbook.grid();
    let rows = grid.row_count();
    let cols = grid.col_count();

    // Column width: widest display value per column, label included.
    let mut widths: Vec<usize> = (0..cols).map(|c| column_label(c).len()).collect();
    let mut display: Vec<Vec<String>> = Vec::with_capacity(rows);
    for r in 0..rows {
        let mut row = Vec::with_capacity(cols);
        for (c, width) in widths.iter_mut().enumerate() {
            let text = workbook.display(r, c);
            *width = (*width).max(text.len());
            row.push(text);
        }
        display.push(row);
    }
    let row_digits = rows.to_string().len().max(1);

    let mut out = String::new();
    out.push_str(&" ".repeat(row_digits));
    for (c, width) in widths.iter().enumerate() {
        out.push_str(&format!(" {:>width$}", column_label(c), width = *width));
    }
    out.push('\n');
    for (r, row) in display.iter().enumerate() {
        out.push_str(&format!("{:>row_digits$}", r + 1));
        for (text, width) in row.iter().zip(&widths) {
            out.push_str(&format!(" {:>width$}", text, width = *width));
        }
        out.push('\n');
    }
    out
}
