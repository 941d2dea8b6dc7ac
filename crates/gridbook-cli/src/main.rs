//! Gridbook CLI - read and edit spreadsheets from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridbook::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridbook")]
#[command(author, version, about = "Spreadsheet reading and editing tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty workbook
    New {
        /// Workbook file to create
        file: PathBuf,
    },

    /// Show information about a workbook
    Info {
        /// Workbook file
        file: PathBuf,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Workbook file
        file: PathBuf,
    },

    /// Add a sheet to a workbook
    NewSheet {
        /// Workbook file
        file: PathBuf,

        /// Name of the sheet to create
        name: String,
    },

    /// Remove a sheet from a workbook
    RmSheet {
        /// Workbook file
        file: PathBuf,

        /// Name of the sheet to delete
        name: String,
    },

    /// Read a single cell
    Read {
        /// Workbook file
        file: PathBuf,

        /// Sheet name
        sheet: String,

        /// Cell reference (e.g. B2 or Data!B2)
        cell: String,

        /// Follow a direct cell-reference formula one hop
        #[arg(long)]
        hop: bool,
    },

    /// Read a rectangular range as CSV rows
    ReadRange {
        /// Workbook file
        file: PathBuf,

        /// Sheet name
        sheet: String,

        /// Range reference (e.g. A1:C5)
        range: String,
    },

    /// Write a single cell
    Write {
        /// Workbook file
        file: PathBuf,

        /// Sheet name
        sheet: String,

        /// Cell reference (e.g. B2)
        cell: String,

        /// Value to write; a leading '=' makes it a formula
        value: String,
    },

    /// Write a block of cells anchored at a top-left reference
    WriteRange {
        /// Workbook file
        file: PathBuf,

        /// Sheet name
        sheet: String,

        /// Top-left cell reference
        cell: String,

        /// Rows separated by ';', cells within a row by ','
        /// (e.g. "Name,Qty;bolt,12;nut,40")
        rows: String,
    },

    /// Read the last value of a contiguous column run
    Total {
        /// Workbook file
        file: PathBuf,

        /// Sheet name
        sheet: String,

        /// Cell reference where the column starts
        cell: String,
    },

    /// Find a column by title and read the total beneath its data
    TitleTotal {
        /// Workbook file
        file: PathBuf,

        /// Sheet name
        sheet: String,

        /// Cell reference where the header row starts
        cell: String,

        /// Exact title text to match
        title: String,
    },

    /// Read a contiguous column of items
    Items {
        /// Workbook file
        file: PathBuf,

        /// Sheet name
        sheet: String,

        /// Cell reference where the items start
        cell: String,

        /// Number of trailing rows to drop (totals, footers)
        #[arg(short, long, default_value = "0")]
        offset: usize,
    },

    /// Read several columns as a table
    Columns {
        /// Workbook file
        file: PathBuf,

        /// Sheet name
        sheet: String,

        /// Column entries: cell references, or titles with --header-row
        columns: Vec<String>,

        /// Treat entries as titles found in this header row
        #[arg(long)]
        header_row: Option<u32>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::New { file } => new_workbook(&file),
        Commands::Info { file } => show_info(&file),
        Commands::Sheets { file } => list_sheets(&file),
        Commands::NewSheet { file, name } => edit(&file, |m| m.create_sheet(&name)),
        Commands::RmSheet { file, name } => edit(&file, |m| m.delete_sheet(&name)),
        Commands::Read {
            file,
            sheet,
            cell,
            hop,
        } => read_cell(&file, &sheet, &cell, hop),
        Commands::ReadRange { file, sheet, range } => read_range(&file, &sheet, &range),
        Commands::Write {
            file,
            sheet,
            cell,
            value,
        } => edit(&file, |m| {
            m.write_cell(&sheet, cell.as_str(), parse_value(&value))
        }),
        Commands::WriteRange {
            file,
            sheet,
            cell,
            rows,
        } => edit(&file, |m| {
            m.write_range(&sheet, cell.as_str(), &parse_rows(&rows))
        }),
        Commands::Total { file, sheet, cell } => total(&file, &sheet, &cell),
        Commands::TitleTotal {
            file,
            sheet,
            cell,
            title,
        } => title_total(&file, &sheet, &cell, &title),
        Commands::Items {
            file,
            sheet,
            cell,
            offset,
        } => items(&file, &sheet, &cell, offset),
        Commands::Columns {
            file,
            sheet,
            columns,
            header_row,
        } => read_columns(&file, &sheet, &columns, header_row),
    }
}

/// Parse a command-line value: '=' marks a formula, numbers and booleans are
/// recognized, everything else is text
fn parse_value(s: &str) -> CellValue {
    if s.starts_with('=') {
        return CellValue::Formula(s.to_string());
    }
    if let Ok(n) = s.parse::<f64>() {
        return CellValue::Number(n);
    }
    match s {
        "true" | "TRUE" => CellValue::Boolean(true),
        "false" | "FALSE" => CellValue::Boolean(false),
        _ => CellValue::Text(s.to_string()),
    }
}

/// Parse a block of values: rows split on ';', cells within a row on ','
fn parse_rows(s: &str) -> Vec<Vec<CellValue>> {
    s.split(';')
        .map(|row| row.split(',').map(parse_value).collect())
        .collect()
}

fn open(file: &Path) -> Result<WorkbookManager> {
    let mut manager = WorkbookManager::new();
    manager
        .open(file)
        .with_context(|| format!("Failed to open '{}'", file.display()))?;
    Ok(manager)
}

/// Load (or create) the workbook, apply one mutation, and save
fn edit(file: &Path, op: impl FnOnce(&mut WorkbookManager) -> gridbook::Result<()>) -> Result<()> {
    let mut manager = WorkbookManager::with_path(file)
        .with_context(|| format!("Failed to load '{}'", file.display()))?;
    op(&mut manager)?;
    manager.save().context("Failed to save workbook")?;
    Ok(())
}

fn new_workbook(file: &Path) -> Result<()> {
    let mut manager = WorkbookManager::new();
    manager
        .create(Some(file))
        .with_context(|| format!("Failed to create '{}'", file.display()))?;
    eprintln!("Created '{}'", file.display());
    Ok(())
}

fn show_info(file: &Path) -> Result<()> {
    let manager = open(file)?;

    println!("File: {}", file.display());
    println!("Sheets: {}", manager.sheet_count()?);

    for name in manager.sheet_names()? {
        let (rows, cols) = manager.sheet_extent(&name)?;
        if rows == 0 {
            println!("  \"{name}\": empty");
        } else {
            println!("  \"{name}\": {rows} rows x {cols} columns");
        }
    }

    Ok(())
}

fn list_sheets(file: &Path) -> Result<()> {
    let manager = open(file)?;
    for (i, name) in manager.sheet_names()?.iter().enumerate() {
        println!("{i}\t{name}");
    }
    Ok(())
}

fn read_cell(file: &Path, sheet: &str, cell: &str, hop: bool) -> Result<()> {
    let manager = open(file)?;
    let value = if hop {
        manager.read_cell_hopped(sheet, cell)?
    } else {
        manager.read_cell(sheet, cell)?
    };
    println!("{value}");
    Ok(())
}

fn read_range(file: &Path, sheet: &str, range: &str) -> Result<()> {
    let manager = open(file)?;
    for row in manager.read_range(sheet, range)? {
        println!("{}", csv_row(&row));
    }
    Ok(())
}

fn total(file: &Path, sheet: &str, cell: &str) -> Result<()> {
    let manager = open(file)?;
    match manager.read_total(sheet, cell)? {
        Some(value) => println!("{value}"),
        None => eprintln!("No data found"),
    }
    Ok(())
}

fn title_total(file: &Path, sheet: &str, cell: &str, title: &str) -> Result<()> {
    let manager = open(file)?;
    match manager.read_title_total(sheet, cell, title)? {
        Some(value) => println!("{value}"),
        None => eprintln!("Title '{title}' not found or has no data"),
    }
    Ok(())
}

fn items(file: &Path, sheet: &str, cell: &str, offset: usize) -> Result<()> {
    let manager = open(file)?;
    for item in manager.read_items(sheet, cell, offset)? {
        println!("{item}");
    }
    Ok(())
}

fn read_columns(file: &Path, sheet: &str, columns: &[String], header_row: Option<u32>) -> Result<()> {
    let manager = open(file)?;
    let entries: Vec<&str> = columns.iter().map(String::as_str).collect();
    let mode = match header_row {
        Some(row) => ColumnsMode::Titles { header_row: row },
        None => ColumnsMode::Refs,
    };
    for row in manager.read_columns(sheet, &entries, mode)? {
        println!("{}", csv_row(&row));
    }
    Ok(())
}

/// Render one row of values as a CSV line, quoting where needed
fn csv_row(row: &[CellValue]) -> String {
    row.iter()
        .map(|v| {
            let text = v.to_string();
            if text.contains(',') || text.contains('"') || text.contains('\n') {
                format!("\"{}\"", text.replace('"', "\"\""))
            } else {
                text
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("=A1+B1"), CellValue::Formula("=A1+B1".into()));
        assert_eq!(parse_value("12.5"), CellValue::Number(12.5));
        assert_eq!(parse_value("true"), CellValue::Boolean(true));
        assert_eq!(parse_value("hello"), CellValue::Text("hello".into()));
    }

    #[test]
    fn test_parse_rows() {
        let rows = parse_rows("Name,Qty;bolt,12");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], CellValue::Text("Name".into()));
        assert_eq!(rows[1][1], CellValue::Number(12.0));
    }

    #[test]
    fn test_csv_row_quotes_commas() {
        let row = vec![CellValue::Text("a,b".into()), CellValue::Number(1.0)];
        assert_eq!(csv_row(&row), "\"a,b\",1");
    }
}
