use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{DataType, Reader, Sheets, open_workbook_auto};
use tracing::debug;

use crate::techstack::tools::error::{Result, ToolError};

/// One row of cell values, rendered as text.
pub type Row = Vec<String>;

/// Sheet (or CSV file stem) names that carry documentation rather than data.
const RESERVED_SHEET_NAMES: [&str; 2] = ["readme", "instructions"];

/// Reasons a sheet or file is excluded from a run without being an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Named "readme" or "instructions".
    ReservedName,
    /// No data rows below the header row.
    TooFewRows,
    /// No header matched the topic synonyms.
    MissingTopicColumn,
    /// A topic column exists but no row establishes a topic.
    NoTopicValues,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ReservedName => write!(f, "reserved sheet name"),
            SkipReason::TooFewRows => write!(f, "no data rows"),
            SkipReason::MissingTopicColumn => write!(f, "missing topic column"),
            SkipReason::NoTopicValues => write!(f, "no topic values"),
        }
    }
}

/// Returns `true` when the sheet name is reserved for documentation.
pub fn is_reserved_sheet(name: &str) -> bool {
    let name = name.trim();
    RESERVED_SHEET_NAMES
        .iter()
        .any(|reserved| name.eq_ignore_ascii_case(reserved))
}

/// Rejects sheets that cannot contribute any data.
pub fn screen_sheet(name: &str, rows: &[Row]) -> std::result::Result<(), SkipReason> {
    if is_reserved_sheet(name) {
        return Err(SkipReason::ReservedName);
    }
    if rows.len() < 2 {
        return Err(SkipReason::TooFewRows);
    }
    Ok(())
}

/// Multi-sheet workbook source (xlsx, xlsm, xls, ods).
pub struct WorkbookReader {
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookReader {
    /// Opens the workbook at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::SourceNotFound(path.to_path_buf()));
        }
        let workbook = open_workbook_auto(path)?;
        Ok(Self { workbook })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// Reads every row of the named sheet, preserving newlines inside cells.
    pub fn read_sheet(&mut self, name: &str) -> Result<Vec<Row>> {
        let range = self
            .workbook
            .worksheet_range(name)
            .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))??;

        let rows: Vec<Row> = range
            .rows()
            .map(|row| row.iter().map(|cell| cell_to_string(Some(cell))).collect())
            .collect();
        debug!(sheet = name, row_count = rows.len(), "sheet read");
        Ok(rows)
    }
}

/// Reads a single CSV file. Quoted cells may span several lines.
pub fn read_csv(path: &Path) -> Result<Vec<Row>> {
    if !path.exists() {
        return Err(ToolError::SourceNotFound(path.to_path_buf()));
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    debug!(path = %path.display(), row_count = rows.len(), "csv read");
    Ok(rows)
}

/// Returns the text of cell `index`, or an empty string for short rows.
pub fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|index| row.get(index))
        .map(String::as_str)
        .unwrap_or("")
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
