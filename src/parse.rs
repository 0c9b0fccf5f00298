//! Delimited-text ingestion.
//!
//! Turns raw UTF-8 text into a normalized [`Table`]. The delimiter is chosen
//! from the first line alone: semicolon if one is present, comma otherwise.
//! This heuristic is deliberately not configurable; downstream expectations
//! depend on it. Tokenization is quote-aware (`"` quotes a field, doubled
//! quotes escape a literal quote, quoted fields may contain the delimiter and
//! newlines).
//!
//! A single malformed row never fails the parse. Ragged rows are padded or
//! truncated to the header width, headerless files get synthesized column
//! names, and duplicate header names are tolerated; each case is reported as
//! a [`ParseWarning`] and logged.

use std::collections::HashSet;
use std::fmt;

use log::warn;

use crate::error::{CompareError, Result};
use crate::table::Table;

/// Prefix for synthesized column names when a file has no header row.
pub const SYNTHETIC_COLUMN_PREFIX: &str = "Column_";

/// Recoverable condition observed while parsing; never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// Every header token parsed as an integer, so the first line was
    /// discarded and `Column_0..Column_{n-1}` synthesized.
    HeaderlessFile { columns: usize },
    /// Two or more header names are identical after trimming.
    DuplicateColumnNames { names: Vec<String> },
    /// A data row had a different field count than the header. `line` is
    /// 1-based over the whole input, so the first data row is line 2.
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::HeaderlessFile { columns } => write!(
                f,
                "no column names found; synthesized {columns} numeric column name(s)"
            ),
            ParseWarning::DuplicateColumnNames { names } => {
                write!(f, "duplicate column name(s): {}", names.join(", "))
            }
            ParseWarning::RaggedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "row at line {line} has {found} field(s), expected {expected}; padded/truncated"
            ),
        }
    }
}

/// A parsed table together with the recoverable conditions met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub table: Table,
    pub warnings: Vec<ParseWarning>,
}

/// First-line delimiter heuristic: semicolon wins if present, comma otherwise.
pub fn detect_delimiter(first_line: &str) -> u8 {
    if first_line.contains(';') { b';' } else { b',' }
}

/// Parses delimited text into a table, ingesting at most `max_rows` data rows
/// when a cap is given.
///
/// Fails with `EmptyInput` when the text or its first line is blank, and with
/// `EmptyTable` when no data rows remain after the header.
pub fn parse_delimited_text(text: &str, max_rows: Option<usize>) -> Result<ParsedTable> {
    if text.trim().is_empty() {
        return Err(CompareError::empty_input("text content is empty"));
    }
    let first_line = text.lines().next().unwrap_or("");
    if first_line.trim().is_empty() {
        return Err(CompareError::empty_input(
            "first line is blank; no header row present",
        ));
    }

    let delimiter = detect_delimiter(first_line);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header_record = match records.next() {
        Some(record) => record?,
        None => return Err(CompareError::empty_input("text content is empty")),
    };

    let mut warnings = Vec::new();
    let columns = resolve_header(&header_record, &mut warnings);
    let width = columns.len();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in records {
        if let Some(cap) = max_rows
            && rows.len() >= cap
        {
            break;
        }
        let record = record?;
        let mut row: Vec<String> = record.iter().map(|field| field.to_string()).collect();
        if row.len() != width {
            let warning = ParseWarning::RaggedRow {
                line: record
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(rows.len() + 2),
                expected: width,
                found: row.len(),
            };
            warn!("{warning}");
            warnings.push(warning);
            row.resize(width, String::new());
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(CompareError::empty_table(
            "input contains a header but no data rows",
        ));
    }

    Ok(ParsedTable {
        table: Table::new(columns, rows),
        warnings,
    })
}

/// Validates the header record: an all-integer header means the file carries
/// no column names, so the line is discarded and names are synthesized.
/// Otherwise each token is trimmed of surrounding whitespace and quotes.
fn resolve_header(record: &csv::StringRecord, warnings: &mut Vec<ParseWarning>) -> Vec<String> {
    let tokens: Vec<&str> = record.iter().collect();
    let headerless = tokens
        .iter()
        .all(|token| token.trim().parse::<i64>().is_ok());

    let columns: Vec<String> = if headerless {
        let warning = ParseWarning::HeaderlessFile {
            columns: tokens.len(),
        };
        warn!("{warning}");
        warnings.push(warning);
        (0..tokens.len())
            .map(|i| format!("{SYNTHETIC_COLUMN_PREFIX}{i}"))
            .collect()
    } else {
        tokens
            .iter()
            .map(|token| {
                token
                    .trim()
                    .trim_matches('"')
                    .trim_matches('\'')
                    .trim()
                    .to_string()
            })
            .collect()
    };

    let mut seen = HashSet::new();
    let duplicates: Vec<String> = columns
        .iter()
        .filter(|name| !seen.insert(name.as_str()))
        .cloned()
        .collect();
    if !duplicates.is_empty() {
        let warning = ParseWarning::DuplicateColumnNames { names: duplicates };
        warn!("{warning}");
        warnings.push(warning);
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_delimited_text_with_headers() {
        let parsed = parse_delimited_text("id,name\n1,Alice\n2,Bob\n", None).unwrap();
        assert_eq!(parsed.table.columns(), ["id", "name"]);
        assert_eq!(parsed.table.row_count(), 2);
        assert_eq!(parsed.table.rows()[0], vec!["1", "Alice"]);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn semicolon_in_first_line_selects_semicolon_delimiter() {
        let parsed = parse_delimited_text("id;name\n1;Alice\n", None).unwrap();
        assert_eq!(parsed.table.columns(), ["id", "name"]);
        assert_eq!(parsed.table.rows()[0], vec!["1", "Alice"]);
    }

    #[test]
    fn all_integer_header_synthesizes_column_names() {
        let parsed = parse_delimited_text("1,2,3\n4,5,6\n", None).unwrap();
        assert_eq!(parsed.table.columns(), ["Column_0", "Column_1", "Column_2"]);
        // The numeric first line is discarded, not kept as data.
        assert_eq!(parsed.table.row_count(), 1);
        assert_eq!(parsed.table.rows()[0], vec!["4", "5", "6"]);
        assert!(matches!(
            parsed.warnings[0],
            ParseWarning::HeaderlessFile { columns: 3 }
        ));
    }

    #[test]
    fn duplicate_header_names_warn_but_parse() {
        let parsed = parse_delimited_text("id,name,name\n1,a,b\n", None).unwrap();
        assert_eq!(parsed.table.columns(), ["id", "name", "name"]);
        assert!(parsed
            .warnings
            .iter()
            .any(|w| matches!(w, ParseWarning::DuplicateColumnNames { .. })));
    }

    #[test]
    fn quoted_fields_keep_delimiters_newlines_and_escaped_quotes() {
        let text = "id,note\n1,\"a,b\"\n2,\"line1\nline2\"\n3,\"say \"\"hi\"\"\"\n";
        let parsed = parse_delimited_text(text, None).unwrap();
        assert_eq!(parsed.table.rows()[0][1], "a,b");
        assert_eq!(parsed.table.rows()[1][1], "line1\nline2");
        assert_eq!(parsed.table.rows()[2][1], "say \"hi\"");
    }

    #[test]
    fn quoted_headers_are_stripped() {
        let parsed = parse_delimited_text("\"id\", \"name\"\n1,Alice\n", None).unwrap();
        assert_eq!(parsed.table.columns(), ["id", "name"]);
    }

    #[test]
    fn ragged_rows_are_padded_or_truncated_with_warnings() {
        let parsed = parse_delimited_text("id,name,city\n1,Alice\n2,Bob,Delft,extra\n", None)
            .unwrap();
        assert_eq!(parsed.table.rows()[0], vec!["1", "Alice", ""]);
        assert_eq!(parsed.table.rows()[1], vec!["2", "Bob", "Delft"]);
        let ragged: Vec<_> = parsed
            .warnings
            .iter()
            .filter(|w| matches!(w, ParseWarning::RaggedRow { .. }))
            .collect();
        assert_eq!(ragged.len(), 2);
    }

    #[test]
    fn row_cap_limits_ingestion() {
        let parsed = parse_delimited_text("id\n1\n2\n3\n4\n", Some(2)).unwrap();
        assert_eq!(parsed.table.row_count(), 2);
    }

    #[test]
    fn empty_text_fails_with_empty_input() {
        assert!(matches!(
            parse_delimited_text("", None),
            Err(CompareError::EmptyInput(_))
        ));
        assert!(matches!(
            parse_delimited_text("   \n  \n", None),
            Err(CompareError::EmptyInput(_))
        ));
    }

    #[test]
    fn header_without_data_rows_fails_with_empty_table() {
        assert!(matches!(
            parse_delimited_text("id,name\n", None),
            Err(CompareError::EmptyTable(_))
        ));
    }
}
