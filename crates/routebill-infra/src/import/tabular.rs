//! Read CSV and spreadsheet files into header-keyed rows

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::ops::Index;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::{debug, warn};

use routebill_types::{ImportError, Result};

/// One data row keyed by normalized column header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// 1-based line in the source file; the header is line 1
    pub line: usize,
    pub cells: BTreeMap<String, String>,
}

impl Row {
    pub fn new(line: usize, cells: BTreeMap<String, String>) -> Self {
        Self { line, cells }
    }

    pub fn get(&self, column: &str) -> Option<&String> {
        self.cells.get(column)
    }
}

impl Index<&str> for Row {
    type Output = String;

    fn index(&self, column: &str) -> &String {
        &self.cells[column]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    /// Pick a reader from the file extension
    pub fn detect(path: &Path) -> Result<FileFormat> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" | "xls" | "xlsm" | "ods" => Ok(FileFormat::Spreadsheet),
            _ => Err(ImportError::UnsupportedFormat(path.display().to_string()).into()),
        }
    }
}

/// `Vendor Name` -> `vendor_name`
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Load every non-blank data row of a CSV or spreadsheet file
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let rows = match FileFormat::detect(path)? {
        FileFormat::Csv => {
            let mut bytes = Vec::new();
            File::open(path)?.read_to_end(&mut bytes)?;
            parse_csv(&bytes)?
        }
        FileFormat::Spreadsheet => read_spreadsheet(path)?,
    };
    debug!(path = %path.display(), rows = rows.len(), "Read tabular file");
    Ok(rows)
}

/// Parse CSV bytes; UTF-8 (BOM tolerated), falling back to Windows-1252
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Row>> {
    let (mut decoded, _, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        warn!("CSV is not valid UTF-8, decoding as Windows-1252");
        decoded = WINDOWS_1252.decode(bytes).0;
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(decoded.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::Parse(e.to_string()))?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| ImportError::Row {
            row: e
                .position()
                .map_or(row_idx + 2, |p| p.line() as usize),
            message: e.to_string(),
        })?;
        if record.iter().all(|v| v.is_empty()) {
            continue;
        }
        // csv skips empty lines; take the line from the record position
        let line = record
            .position()
            .map_or(row_idx + 2, |p| p.line() as usize);
        rows.push(zip_row(&headers, line, record.iter().map(str::to_string)));
    }
    Ok(rows)
}

fn read_spreadsheet(path: &Path) -> Result<Vec<Row>> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ImportError::Parse(e.to_string()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::EmptyWorkbook)?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ImportError::Parse(e.to_string()))?;

    // rows before the first used one are not part of the range
    let first_line = range.start().map_or(1, |(row, _)| row as usize + 1);
    let mut cells = range.rows();
    let headers: Vec<String> = match cells.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| normalize_header(&cell_text(c)))
            .collect(),
        None => return Ok(Vec::new()),
    };

    let rows = cells
        .enumerate()
        .map(|(idx, r)| {
            let values: Vec<String> = r.iter().map(cell_text).collect();
            (first_line + idx + 1, values)
        })
        .filter(|(_, values)| values.iter().any(|v| !v.is_empty()))
        .map(|(line, values)| zip_row(&headers, line, values.into_iter()))
        .collect();
    Ok(rows)
}

fn zip_row(headers: &[String], line: usize, values: impl Iterator<Item = String>) -> Row {
    let cells = headers
        .iter()
        .zip(values)
        .filter(|(h, _)| !h.is_empty())
        .map(|(h, v)| (h.clone(), v.trim().to_string()))
        .collect();
    Row::new(line, cells)
}

/// Render a cell as the text a CSV export of it would hold
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) => s.get(..10).unwrap_or(s.as_str()).to_string(),
        other => other.to_string(),
    }
}
