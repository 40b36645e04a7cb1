use calamine::{open_workbook_auto, Reader};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Workbook has no worksheet")]
    NoWorksheet,
    #[error("Table has no header row")]
    MissingHeader,
    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
    #[error("Row {row:?} has {actual} cells, header has {expected}")]
    RaggedRow {
        row: String,
        expected: usize,
        actual: usize,
    },
    #[error("Non-numeric cell {value:?} in row {row:?}, column {column:?}")]
    NonNumeric {
        row: String,
        column: String,
        value: String,
    },
}

/// A keyed table as read from disk: the first column is the row key and is
/// not part of `header` or `cells`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub key: String,
    pub cells: Vec<String>,
}

impl RawTable {
    /// Build from a header row (key column included) and data rows.
    /// Blank rows are skipped.
    fn from_rows<I>(mut rows: I) -> Result<Self, TableError>
    where
        I: Iterator<Item = Vec<String>>,
    {
        let header = rows.next().ok_or(TableError::MissingHeader)?;
        let header = header.into_iter().skip(1).map(|h| h.trim().to_string()).collect();

        let rows = rows
            .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
            .map(|cells| {
                let mut cells = cells.into_iter();
                let key = cells.next().unwrap_or_default().trim().to_string();
                RawRow {
                    key,
                    cells: cells.collect(),
                }
            })
            .collect();

        Ok(Self { header, rows })
    }

    /// Index of the first column whose normalized header is one of `aliases`.
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        use crate::core::olfactory::normalize_key;
        self.header
            .iter()
            .position(|h| aliases.iter().any(|a| normalize_key(h) == normalize_key(a)))
    }
}

/// Read a keyed table, choosing the reader from the file extension.
pub fn read_table(path: &Path) -> Result<RawTable, TableError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("xlsx" | "xlsm" | "xls" | "ods") => read_spreadsheet(path),
        _ => read_csv(path),
    }
}

fn read_csv(path: &Path) -> Result<RawTable, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    RawTable::from_rows(rows.into_iter())
}

/// First worksheet only.
fn read_spreadsheet(path: &Path) -> Result<RawTable, TableError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(TableError::NoWorksheet)??;

    let rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());

    RawTable::from_rows(rows)
}

/// Parse a numeric cell. Blank, non-numeric and non-finite values are
/// rejected.
pub fn parse_weight(row: &str, column: &str, value: &str) -> Result<f32, TableError> {
    match value.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TableError::NonNumeric {
            row: row.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}
