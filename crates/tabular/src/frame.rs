use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{normalize_column_name, Result, TabularError};

/// One parsed spreadsheet cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Text(String),
}

/// Storage type a column is written with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Convert the cell to the representation of `ty`. Nulls stay null.
    pub fn coerce(&self, ty: ColumnType) -> Cell {
        match (self, ty) {
            (Cell::Null, _) => Cell::Null,
            (Cell::Boolean(b), ColumnType::Integer) => Cell::Integer(*b as i64),
            (Cell::Boolean(b), ColumnType::Real) => Cell::Real(if *b { 1.0 } else { 0.0 }),
            (Cell::Integer(v), ColumnType::Real) => Cell::Real(*v as f64),
            (Cell::Integer(v), ColumnType::Text) => Cell::Text(v.to_string()),
            (Cell::Real(v), ColumnType::Text) => Cell::Text(v.to_string()),
            (Cell::Boolean(b), ColumnType::Text) => Cell::Text(if *b { "True" } else { "False" }.to_string()),
            (other, _) => other.clone(),
        }
    }
}

/// Parsed sheet: normalized column names plus rows aligned to them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Build a frame from a raw header row and data rows.
    ///
    /// Headers are normalized; a header that normalizes to nothing becomes
    /// `column_<n>`. Short rows are padded with nulls, long rows are rejected.
    pub fn from_raw(header: &[String], rows: Vec<Vec<Cell>>) -> Result<Self> {
        let columns = normalize_header(header)?;
        let width = columns.len();

        let mut out = Vec::with_capacity(rows.len());
        for (i, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(TabularError::Malformed(format!(
                    "row {} has {} fields, header has {}",
                    i + 1,
                    row.len(),
                    width
                )));
            }
            row.resize(width, Cell::Null);
            out.push(row);
        }

        Ok(Self { columns, rows: out })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Infer the storage type of every column from its non-null cells.
    pub fn column_types(&self) -> Vec<ColumnType> {
        (0..self.columns.len())
            .map(|c| infer_column_type(self.rows.iter().map(|r| &r[c])))
            .collect()
    }
}

fn normalize_header(header: &[String]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(header.len());

    for (i, raw) in header.iter().enumerate() {
        let mut name = normalize_column_name(raw);
        if name.is_empty() {
            name = format!("column_{}", i + 1);
        }
        if !seen.insert(name.clone()) {
            return Err(TabularError::DuplicateColumn(name));
        }
        columns.push(name);
    }
    Ok(columns)
}

pub fn infer_column_type<'a>(cells: impl Iterator<Item = &'a Cell>) -> ColumnType {
    let mut ty: Option<ColumnType> = None;
    for cell in cells {
        let cell_ty = match cell {
            Cell::Null => continue,
            Cell::Integer(_) | Cell::Boolean(_) => ColumnType::Integer,
            Cell::Real(_) => ColumnType::Real,
            Cell::Text(_) => return ColumnType::Text,
        };
        ty = Some(match (ty, cell_ty) {
            (Some(ColumnType::Real), _) | (_, ColumnType::Real) => ColumnType::Real,
            _ => ColumnType::Integer,
        });
    }
    ty.unwrap_or(ColumnType::Text)
}
