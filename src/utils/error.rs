use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read spreadsheet: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("failed to write workbook: {0}")]
    WriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("missing required columns: {columns:?}")]
    ColumnMissing { columns: Vec<String> },

    #[error("could not classify file: {name}")]
    ClassificationUnknown { name: String },

    #[error("failed to relocate {}: {source}", path.display())]
    RelocationError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("configuration error: {message}")]
    ConfigError { message: String },

    #[error("data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;
