// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reading statement files and turning their rows into typed records.
//!
//! CSV and XLSX sources both produce rows of [`Cell`]s, so
//! [`normalize_row`] sees the same shape whatever the origin format.

use crate::error::{LedgerError, Result};
use crate::models::TransactionRecord;
use calamine::{Data, Reader};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

/// Cells expected per row; a trailing incoming `Description` column is optional.
const SOURCE_COLUMNS: usize = 9;
const MAX_COLUMNS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(SourceFormat::Csv),
            Some("xlsx") => Ok(SourceFormat::Xlsx),
            _ => Err(LedgerError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<&Data> for Cell {
    fn from(d: &Data) -> Self {
        match d {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
                Some(date) => Cell::Date(date),
                None => Cell::Number(dt.as_f64()),
            },
        }
    }
}

/// One data row and the line it sits on in the source file (1-based, the
/// header being line 1).
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub line: usize,
    pub cells: Vec<Cell>,
}

/// Data rows of a source file, header removed.
#[derive(Debug, Default)]
pub struct SourceTable {
    pub rows: Vec<SourceRow>,
}

impl SourceTable {
    /// Numbers rows as if they directly follow a header on line 1.
    pub fn from_cells(rows: Vec<Vec<Cell>>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| SourceRow {
                line: idx + 2,
                cells,
            })
            .collect();
        SourceTable { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads every data row of a CSV or XLSX file. The extension is checked
/// before the file is touched.
pub fn read_source(path: &Path) -> Result<SourceTable> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Csv => read_csv(path),
        SourceFormat::Xlsx => read_xlsx(path),
    }
}

fn read_csv(path: &Path) -> Result<SourceTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;
    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let rec = result?;
        let line = rec.position().map_or(idx + 2, |p| p.line() as usize);
        rows.push(SourceRow {
            line,
            cells: rec.iter().map(Cell::text).collect(),
        });
    }
    Ok(SourceTable { rows })
}

fn read_xlsx(path: &Path) -> Result<SourceTable> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(SourceTable::default()),
    };
    // The used range may not begin on the first sheet row.
    let first_line = range.start().map_or(1, |(row, _)| row as usize + 1);
    let rows = range
        .rows()
        .enumerate()
        .skip(1)
        .map(|(idx, row)| SourceRow {
            line: first_line + idx,
            cells: row.iter().map(Cell::from).collect(),
        })
        .filter(|row| row.cells.iter().any(|c| *c != Cell::Empty))
        .collect();
    Ok(SourceTable { rows })
}

/// Converts one raw row into a record. `description` is left unset for the
/// classifier to fill.
pub fn normalize_row(cells: &[Cell]) -> Result<TransactionRecord> {
    let width = cells
        .iter()
        .rposition(|c| *c != Cell::Empty)
        .map_or(0, |i| i + 1)
        .max(cells.len().min(MAX_COLUMNS));
    if width < SOURCE_COLUMNS || width > MAX_COLUMNS {
        return Err(LedgerError::validation(
            "row",
            format!(
                "expected {} or {} columns, found {}",
                SOURCE_COLUMNS, MAX_COLUMNS, width
            ),
        ));
    }

    let record = TransactionRecord {
        account_number: text_field(&cells[0]),
        date: date_field("Date", &cells[1])?,
        main_description: text_field(&cells[2]),
        additional_description: text_field(&cells[3]),
        transaction_type: text_field(&cells[4]),
        amount: decimal_field("Amount", &cells[5])?,
        balance: decimal_field("Balance", &cells[6])?,
        spend_category: text_field(&cells[7]),
        currency: text_field(&cells[8]),
        description: None,
    };

    if record.amount.is_none() {
        return Err(LedgerError::validation("Amount", "value is missing"));
    }
    if record.main_description.is_none() {
        return Err(LedgerError::validation("MainDescription", "value is missing"));
    }
    Ok(record)
}

fn text_field(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        Cell::Text(s) => Some(s.clone()),
        Cell::Number(n) => Some(n.to_string()),
        Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
    }
}

fn decimal_field(field: &'static str, cell: &Cell) -> Result<Option<Decimal>> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Text(s) => {
            let cleaned = s.replace(',', "");
            Decimal::from_str(&cleaned)
                .or_else(|_| Decimal::from_scientific(&cleaned))
                .map(Some)
                .map_err(|_| LedgerError::validation(field, format!("'{}' is not a number", s)))
        }
        Cell::Number(n) if n.is_nan() => Ok(None),
        Cell::Number(n) => Decimal::try_from(*n)
            .map(Some)
            .map_err(|_| LedgerError::validation(field, format!("{} is out of range", n))),
        Cell::Date(d) => Err(LedgerError::validation(
            field,
            format!("expected a number, found date {}", d),
        )),
    }
}

fn date_field(field: &'static str, cell: &Cell) -> Result<Option<NaiveDate>> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Date(d) => Ok(Some(*d)),
        Cell::Number(n) => excel_serial_to_date(*n)
            .map(Some)
            .ok_or_else(|| LedgerError::validation(field, format!("{} is not a date", n))),
        Cell::Text(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| LedgerError::validation(field, format!("'{}' is not a date", s))),
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // Spreadsheet exports sometimes carry a midnight time component.
    let day = s.split_whitespace().next().unwrap_or(s);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}

pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = chrono::Duration::try_days(serial.trunc() as i64)?;
    base.checked_add_signed(days)
}
