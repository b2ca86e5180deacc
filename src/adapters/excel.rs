use crate::domain::model::{RawTable, ReportBook};
use crate::domain::ports::{ReportSink, TableSource};
use crate::utils::error::{ReportError, Result};
use calamine::{open_workbook_auto, Data, DataType, Range, Reader, Sheets};
use chrono::{NaiveDateTime, Timelike};
use rust_xlsxwriter::{Format, Workbook};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Rows read by the structural probe before a file is accepted.
const PROBE_ROWS: usize = 5;

/// Spreadsheet reader backed by calamine; handles both .xlsx and .xls
/// containers through `open_workbook_auto`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelSource;

impl ExcelSource {
    fn first_range(workbook: &mut Sheets<BufReader<File>>) -> Result<Range<Data>> {
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ReportError::ProcessingError {
                message: "workbook has no sheets".to_string(),
            })??;
        Ok(range)
    }
}

impl TableSource for ExcelSource {
    fn probe(&self, path: &Path) -> Result<()> {
        let mut workbook = open_workbook_auto(path)?;
        let range = Self::first_range(&mut workbook)?;
        for _ in range.rows().take(PROBE_ROWS) {}
        Ok(())
    }

    fn read_table(&self, path: &Path) -> Result<RawTable> {
        if !path.exists() {
            return Err(ReportError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut workbook = open_workbook_auto(path)?;
        let range = Self::first_range(&mut workbook)?;

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|c| render_cell(c).trim().to_string())
                .collect(),
            None => Vec::new(),
        };
        let rows = rows
            .map(|row| row.iter().map(render_cell).collect())
            .collect();

        Ok(RawTable { headers, rows })
    }
}

/// Renders a cell to the string form the pipeline operates on. Empty and
/// error cells become the empty string; integral floats lose the
/// spreadsheet's trailing `.0`.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(format_datetime)
            .unwrap_or_default(),
        Data::DurationIso(s) => s.clone(),
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    let time = value.time();
    if time.hour() == 0 && time.minute() == 0 && time.second() == 0 {
        value.format("%d/%m/%Y").to_string()
    } else {
        value.format("%d/%m/%Y %H:%M").to_string()
    }
}

/// Workbook writer backed by rust_xlsxwriter. Sheets are written in book
/// order, header row in bold, no index column.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelSink;

impl ReportSink for ExcelSink {
    fn write_book(&self, path: &Path, book: &ReportBook) -> Result<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        for sheet in &book.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet.name.as_str())?;

            for (col, header) in sheet.headers.iter().enumerate() {
                worksheet.write_string_with_format(0, col as u16, header.as_str(), &header_format)?;
            }

            for (row_idx, row) in sheet.rows.iter().enumerate() {
                for (col, value) in row.iter().enumerate() {
                    worksheet.write_string((row_idx + 1) as u32, col as u16, value.as_str())?;
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_cell_blank_and_numbers() {
        assert_eq!(render_cell(&Data::Empty), "");
        assert_eq!(render_cell(&Data::String("a@b.com".to_string())), "a@b.com");
        assert_eq!(render_cell(&Data::Float(42.0)), "42");
        assert_eq!(render_cell(&Data::Float(1.5)), "1.5");
        assert_eq!(render_cell(&Data::Int(7)), "7");
    }

    #[test]
    fn test_format_datetime_drops_midnight_time() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 30)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(format_datetime(date), "30/06/2025");

        let stamped = chrono::NaiveDate::from_ymd_opt(2025, 6, 30)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert_eq!(format_datetime(stamped), "30/06/2025 14:05");
    }
}
