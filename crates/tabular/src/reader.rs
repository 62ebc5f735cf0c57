use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::NaiveDateTime;
use std::path::Path;

use crate::{file_extension, Cell, Frame, Result, TabularError};

pub const ACCEPTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Excel,
}

impl SourceFormat {
    /// Pick the reader from the filename extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self> {
        match file_extension(filename).as_deref() {
            Some("csv") => Ok(SourceFormat::Csv),
            Some("xlsx") | Some("xls") => Ok(SourceFormat::Excel),
            other => Err(TabularError::UnsupportedFormat(other.unwrap_or("").to_string())),
        }
    }
}

pub fn is_accepted(filename: &str) -> bool {
    SourceFormat::from_filename(filename).is_ok()
}

/// Load `path` as `format`. Blocking: run it off the async runtime.
pub fn read_path(path: &Path, format: SourceFormat) -> Result<Frame> {
    match format {
        SourceFormat::Csv => read_csv(path),
        SourceFormat::Excel => read_excel(path),
    }
}

pub fn read_csv(path: &Path) -> Result<Frame> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if header.is_empty() {
        return Err(TabularError::Malformed("csv has no header row".to_string()));
    }

    let mut raw: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        raw.push(record.iter().map(str::to_string).collect());
    }

    // csv has no cell types: decide per column, keep raw text for text columns
    let width = raw.iter().map(Vec::len).max().unwrap_or(0).max(header.len());
    let kinds: Vec<CsvKind> = (0..width)
        .map(|c| csv_column_kind(raw.iter().filter_map(|r| r.get(c))))
        .collect();

    let rows = raw
        .into_iter()
        .map(|r| {
            r.into_iter()
                .enumerate()
                .map(|(c, v)| csv_cell(v, kinds[c]))
                .collect()
        })
        .collect();

    Frame::from_raw(&header, rows)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum CsvKind {
    Integer,
    Real,
    Text,
}

fn parse_real(v: &str) -> Option<f64> {
    v.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn csv_column_kind<'a>(values: impl Iterator<Item = &'a String>) -> CsvKind {
    let mut kind = CsvKind::Integer;
    for v in values.filter(|v| !v.is_empty()) {
        if kind == CsvKind::Integer && v.trim().parse::<i64>().is_ok() {
            continue;
        }
        if parse_real(v).is_some() {
            kind = CsvKind::Real;
            continue;
        }
        return CsvKind::Text;
    }
    kind
}

fn csv_cell(v: String, kind: CsvKind) -> Cell {
    if v.is_empty() {
        return Cell::Null;
    }
    match kind {
        CsvKind::Integer => v.trim().parse().map(Cell::Integer).unwrap_or(Cell::Text(v)),
        CsvKind::Real => parse_real(&v).map(Cell::Real).unwrap_or(Cell::Text(v)),
        CsvKind::Text => Cell::Text(v),
    }
}

/// First worksheet, first row is the header.
pub fn read_excel(path: &Path) -> Result<Frame> {
    let mut workbook = open_workbook_auto(path).map_err(|e| TabularError::Excel(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TabularError::Malformed("workbook has no sheets".to_string()))?
        .map_err(|e| TabularError::Excel(e.to_string()))?;

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(|c| c.as_string().unwrap_or_default()).collect(),
        None => return Err(TabularError::Malformed("sheet has no header row".to_string())),
    };

    let data = rows
        .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|cells| cells.iter().map(excel_cell).collect())
        .collect();

    Frame::from_raw(&header, data)
}

fn excel_cell(d: &Data) -> Cell {
    match d {
        Data::Empty | Data::Error(_) => Cell::Null,
        Data::Int(v) => Cell::Integer(*v),
        // excel stores every number as a float
        Data::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => Cell::Integer(*v as i64),
        Data::Float(v) => Cell::Real(*v),
        Data::Bool(b) => Cell::Boolean(*b),
        Data::String(s) if s.is_empty() => Cell::Null,
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) => match d.as_datetime() {
            Some(ts) => Cell::Text(format_timestamp(&ts)),
            None => Cell::Real(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
