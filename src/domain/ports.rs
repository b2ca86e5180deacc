use crate::domain::model::{RawTable, ReportBook};
use crate::utils::error::Result;
use std::path::Path;

/// Reads tabular data out of a spreadsheet file.
pub trait TableSource: Send + Sync {
    /// Cheap structural check: the file opens as a spreadsheet and a
    /// handful of rows can be read without error.
    fn probe(&self, path: &Path) -> Result<()>;

    /// Reads the first worksheet into a raw header + rows table.
    fn read_table(&self, path: &Path) -> Result<RawTable>;
}

/// Writes a multi-sheet report workbook to disk.
pub trait ReportSink: Send + Sync {
    /// Writes one worksheet per book sheet, in order, overwriting any
    /// existing file at `path`.
    fn write_book(&self, path: &Path, book: &ReportBook) -> Result<()>;
}
