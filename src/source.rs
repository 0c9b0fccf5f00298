//! Table sources: delimited-text files, spreadsheet files, and the warehouse
//! boundary.
//!
//! Files are routed by extension: `xls`/`xlsx`/`xlsm`/`ods` go through the
//! external spreadsheet reader, everything else is decoded to text and fed to
//! [`crate::parse::parse_delimited_text`]. The warehouse is specified purely
//! at its interface: anything implementing [`WarehouseSource`] produces a
//! [`RawTable`] or fails, and the result flows through the same normalization
//! as every other source.

use std::fs;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use encoding_rs::{Encoding, UTF_8};
use log::info;

use crate::error::{CompareError, Result};
use crate::parse::{self, ParseWarning};
use crate::table::{RawCell, RawTable, Table, normalize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    DelimitedText,
    Spreadsheet,
}

pub fn detect_format(path: &Path) -> SourceFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext)
            if ["xls", "xlsx", "xlsm", "ods"]
                .iter()
                .any(|s| ext.eq_ignore_ascii_case(s)) =>
        {
            SourceFormat::Spreadsheet
        }
        _ => SourceFormat::DelimitedText,
    }
}

/// A loaded, normalized table plus any recoverable parse warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    pub table: Table,
    pub warnings: Vec<ParseWarning>,
}

/// Resolves an encoding label to an `encoding_rs` encoding, defaulting to
/// UTF-8 when no label is given.
pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes()).ok_or_else(|| {
            CompareError::Decode {
                encoding: value.to_string(),
            }
        }),
        None => Ok(UTF_8),
    }
}

/// Loads a file source, applying the row cap to ingestion. The encoding only
/// applies to delimited text; spreadsheet decoding is the reader's concern.
pub fn load_path(
    path: &Path,
    max_rows: Option<usize>,
    encoding: &'static Encoding,
) -> Result<LoadedTable> {
    let loaded = match detect_format(path) {
        SourceFormat::Spreadsheet => LoadedTable {
            table: read_spreadsheet(path, max_rows)?,
            warnings: Vec::new(),
        },
        SourceFormat::DelimitedText => {
            let bytes = fs::read(path)?;
            let text = decode_bytes(&bytes, encoding)?;
            let parsed = parse::parse_delimited_text(&text, max_rows)?;
            LoadedTable {
                table: parsed.table,
                warnings: parsed.warnings,
            }
        }
    };
    info!(
        "Loaded {:?}: {} row(s), {} column(s)",
        path,
        loaded.table.row_count(),
        loaded.table.column_count()
    );
    Ok(loaded)
}

fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(CompareError::Decode {
            encoding: encoding.name().to_string(),
        })
    } else {
        Ok(text.into_owned())
    }
}

/// Reads the first sheet of a workbook into a normalized table. The first
/// row supplies the column names; typed cells go through the same
/// normalization as any other source.
fn read_spreadsheet(path: &Path, max_rows: Option<usize>) -> Result<Table> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| CompareError::spreadsheet(e.to_string()))?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CompareError::empty_input(format!("{path:?} contains no sheets")))?;
    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| CompareError::spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| CompareError::empty_input(format!("sheet '{name}' is empty")))?;
    let columns: Vec<String> = header.iter().map(spreadsheet_cell_text).collect();

    let data: Vec<Vec<RawCell>> = rows
        .take(max_rows.unwrap_or(usize::MAX))
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();
    if data.is_empty() {
        return Err(CompareError::empty_table(format!(
            "sheet '{name}' has a header but no data rows"
        )));
    }

    Ok(normalize(RawTable {
        columns,
        rows: data,
    }))
}

fn spreadsheet_cell(data: &Data) -> RawCell {
    match data {
        Data::Empty => RawCell::Null,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::Error(_) => RawCell::Null,
        other => RawCell::Text(other.to_string()),
    }
}

fn spreadsheet_cell_text(data: &Data) -> String {
    spreadsheet_cell(data).into_string()
}

/// Connection parameters for a SQL warehouse. Held only for the duration of a
/// load; the core never persists them.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub user: String,
    pub password: String,
    pub account: String,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
}

/// The warehouse connector boundary: one blocking call that yields a raw
/// table or fails. No retries here; retry policy belongs to the caller.
pub trait WarehouseSource {
    fn query(&self, config: &WarehouseConfig, sql: &str) -> Result<RawTable>;
}

/// Runs a warehouse query and normalizes the result like any file source.
pub fn load_warehouse(
    source: &dyn WarehouseSource,
    config: &WarehouseConfig,
    sql: &str,
) -> Result<Table> {
    let raw = source.query(config, sql).map_err(|e| {
        CompareError::warehouse(format!("query against {} failed: {e}", config.account))
    })?;
    let table = normalize(raw);
    info!(
        "Warehouse query returned {} row(s), {} column(s)",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}
