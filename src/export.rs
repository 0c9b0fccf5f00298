//! Difference-report serialization.
//!
//! Pure transformations from a difference-record sequence to output bytes:
//! a flat CSV report, or a spreadsheet with "All differences", "Summary", and
//! "Unique columns" sheets. No I/O happens here; callers decide where the
//! buffers go.

use chrono::Local;
use csv::QuoteStyle;
use itertools::Itertools;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Serialize;

use crate::diff::{DiffKind, DifferenceRecord};
use crate::error::{CompareError, Result};

const REPORT_HEADER: [&str; 5] = [
    "DifferenceKind",
    "KeyValues",
    "Column",
    "ValueInA",
    "ValueInB",
];

#[derive(Serialize)]
struct ReportRow<'a> {
    kind: &'static str,
    key_values: String,
    column: &'a str,
    value_a: &'a str,
    value_b: &'a str,
}

impl<'a> From<&'a DifferenceRecord> for ReportRow<'a> {
    fn from(record: &'a DifferenceRecord) -> Self {
        ReportRow {
            kind: record.kind.label(),
            key_values: record.key_display(),
            column: &record.column,
            value_a: &record.value_a,
            value_b: &record.value_b,
        }
    }
}

/// Serializes the records to CSV bytes, one row per record. The header row is
/// always present, even for an empty report. Every field is quoted so the
/// output survives values containing delimiters and newlines.
pub fn export_csv(records: &[DifferenceRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(REPORT_HEADER)?;
    for record in records {
        writer.serialize(ReportRow::from(record))?;
    }
    writer
        .into_inner()
        .map_err(|e| CompareError::Io(e.into_error()))
}

/// Builds the multi-sheet spreadsheet report in memory.
///
/// Sheet "All differences" mirrors the CSV report; "Summary" aggregates the
/// record count and sorted distinct affected columns per difference kind;
/// "Unique columns" lists side by side the column names present in only one
/// table.
pub fn export_spreadsheet(
    records: &[DifferenceRecord],
    unique_columns_a: &[String],
    unique_columns_b: &[String],
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet().set_name("All differences")?;
    write_header(sheet, &REPORT_HEADER, &header_format)?;
    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, record.kind.label())?;
        sheet.write_string(row, 1, record.key_display())?;
        sheet.write_string(row, 2, &record.column)?;
        sheet.write_string(row, 3, &record.value_a)?;
        sheet.write_string(row, 4, &record.value_b)?;
    }

    let sheet = workbook.add_worksheet().set_name("Summary")?;
    write_header(
        sheet,
        &["DifferenceKind", "Records", "AffectedColumns"],
        &header_format,
    )?;
    let mut row = 1u32;
    for kind in DiffKind::ALL {
        let of_kind: Vec<&DifferenceRecord> =
            records.iter().filter(|r| r.kind == kind).collect();
        if of_kind.is_empty() {
            continue;
        }
        let affected = of_kind
            .iter()
            .map(|r| r.column.as_str())
            .sorted()
            .dedup()
            .join(", ");
        sheet.write_string(row, 0, kind.label())?;
        sheet.write_number(row, 1, of_kind.len() as f64)?;
        sheet.write_string(row, 2, affected)?;
        row += 1;
    }
    sheet.write_string(row + 1, 0, "Generated at")?;
    sheet.write_string(
        row + 1,
        1,
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    )?;

    let sheet = workbook.add_worksheet().set_name("Unique columns")?;
    write_header(sheet, &["Only in A", "Only in B"], &header_format)?;
    for (idx, name) in unique_columns_a.iter().enumerate() {
        sheet.write_string(idx as u32 + 1, 0, name)?;
    }
    for (idx, name) in unique_columns_b.iter().enumerate() {
        sheet.write_string(idx as u32 + 1, 1, name)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_header(sheet: &mut Worksheet, names: &[&str], format: &Format) -> Result<()> {
    for (idx, name) in names.iter().enumerate() {
        sheet.write_string_with_format(0, idx as u16, *name, format)?;
    }
    Ok(())
}
