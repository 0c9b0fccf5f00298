//! Error taxonomy for table comparison.
//!
//! Input errors (`EmptyInput`, `EmptyTable`, `UnknownColumn`, `InvalidKeySet`,
//! `Mapping`) are caller-correctable and halt only the input that raised them.
//! Boundary errors (`Decode`, `Spreadsheet`, `Warehouse`, `Io`) wrap failures
//! of external collaborators. Recoverable conditions (headerless file, ragged
//! rows, duplicate column names) are not errors; they surface as
//! [`crate::parse::ParseWarning`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompareError>;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("no data rows: {0}")]
    EmptyTable(String),

    #[error("unknown column '{name}' in {side}")]
    UnknownColumn { side: String, name: String },

    #[error("invalid key set: {0}")]
    InvalidKeySet(String),

    #[error("invalid column mapping: {0}")]
    Mapping(String),

    #[error("no table loaded for {side}")]
    NotLoaded { side: String },

    #[error("failed to decode input using encoding '{encoding}'")]
    Decode { encoding: String },

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("warehouse error: {0}")]
    Warehouse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl CompareError {
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn empty_table(msg: impl Into<String>) -> Self {
        Self::EmptyTable(msg.into())
    }

    pub fn unknown_column(side: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownColumn {
            side: side.into(),
            name: name.into(),
        }
    }

    pub fn invalid_key_set(msg: impl Into<String>) -> Self {
        Self::InvalidKeySet(msg.into())
    }

    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::Mapping(msg.into())
    }

    pub fn spreadsheet(msg: impl Into<String>) -> Self {
        Self::Spreadsheet(msg.into())
    }

    pub fn warehouse(msg: impl Into<String>) -> Self {
        Self::Warehouse(msg.into())
    }
}
