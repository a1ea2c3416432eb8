//! Reader for the nationwide licence table.
//!
//! The table is published as an Excel workbook; CSV exports are accepted as
//! well. The format is chosen from the file extension.

use std::io::Cursor;

use beadmap_core::TabularRecord;
use calamine::{Data, Reader};
use camino::Utf8Path;
use cap_std::fs_utf8::File;
use log::{debug, warn};

use crate::LoadError;

/// Column holding the postal abbreviation of each licence's state.
pub const STATE_COLUMN: &str = "state_abbr";

/// Layout of a tabular source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// An Excel workbook (`.xlsx`, `.xlsm`, `.xls`); the first sheet is read.
    Spreadsheet,
    /// Comma-separated text.
    Csv,
}

impl TableFormat {
    /// Pick the format from the extension of `path`, defaulting to CSV.
    ///
    /// # Examples
    /// ```
    /// use beadmap_data::TableFormat;
    /// use camino::Utf8Path;
    ///
    /// assert_eq!(TableFormat::from_path(Utf8Path::new("CBRSCounties.xlsx")), TableFormat::Spreadsheet);
    /// assert_eq!(TableFormat::from_path(Utf8Path::new("legacy.XLS")), TableFormat::Spreadsheet);
    /// assert_eq!(TableFormat::from_path(Utf8Path::new("licences.csv")), TableFormat::Csv);
    /// ```
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("xlsx" | "xlsm" | "xls") => Self::Spreadsheet,
            _ => Self::Csv,
        }
    }
}

/// Read every record of the table at `path`.
///
/// Headers are taken from the first row. Cells are kept as text, and short
/// rows simply lack the trailing columns.
///
/// # Errors
/// Returns [`LoadError::Read`] when the file cannot be opened,
/// [`LoadError::Spreadsheet`] when a workbook cannot be decoded and
/// [`LoadError::Csv`] when a CSV row cannot be decoded.
pub fn read_records(path: &Utf8Path) -> Result<Vec<TabularRecord>, LoadError> {
    let (dir, name) = beadmap_fs::open_dir_and_file(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })?;
    let records = match TableFormat::from_path(path) {
        TableFormat::Spreadsheet => {
            let bytes = dir.read(name.as_str()).map_err(|source| LoadError::Read {
                path: path.to_owned(),
                source,
            })?;
            read_workbook(path, bytes)?
        }
        TableFormat::Csv => {
            let file = dir.open(name.as_str()).map_err(|source| LoadError::Read {
                path: path.to_owned(),
                source,
            })?;
            read_csv(path, file)?
        }
    };
    debug!("Read {} records from {path}", records.len());
    Ok(records)
}

fn read_workbook(path: &Utf8Path, bytes: Vec<u8>) -> Result<Vec<TabularRecord>, LoadError> {
    let spreadsheet_error = |source| LoadError::Spreadsheet {
        path: path.to_owned(),
        source: Box::new(source),
    };
    let mut workbook =
        calamine::open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(spreadsheet_error)?;
    let Some(first_sheet) = workbook.worksheet_range_at(0) else {
        warn!("Workbook {path} has no sheets");
        return Ok(Vec::new());
    };
    let range = first_sheet.map_err(spreadsheet_error)?;
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(ToString::to_string).collect();
    Ok(rows
        .filter(|cells| cells.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|cells| {
            TabularRecord::from_pairs(
                headers
                    .iter()
                    .zip(cells)
                    .filter(|(_, cell)| !matches!(cell, Data::Empty))
                    .map(|(header, cell)| (header.as_str(), cell.to_string())),
            )
        })
        .collect())
}

fn read_csv(path: &Utf8Path, file: File) -> Result<Vec<TabularRecord>, LoadError> {
    let csv_error = |source| LoadError::Csv {
        path: path.to_owned(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader.headers().map_err(csv_error)?.clone();
    reader
        .records()
        .map(|row| {
            row.map(|cells| TabularRecord::from_pairs(headers.iter().zip(cells.iter())))
                .map_err(csv_error)
        })
        .collect()
}

/// Keep the records whose [`STATE_COLUMN`] equals `abbreviation`.
///
/// Comparison ignores ASCII case and surrounding whitespace.
#[must_use]
pub fn filter_by_state(records: Vec<TabularRecord>, abbreviation: &str) -> Vec<TabularRecord> {
    let wanted = abbreviation.trim();
    records
        .into_iter()
        .filter(|record| {
            record
                .get(STATE_COLUMN)
                .is_some_and(|state| state.trim().eq_ignore_ascii_case(wanted))
        })
        .collect()
}
