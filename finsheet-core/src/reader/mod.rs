//! Excel/ODS file reader using calamine

use crate::error::{LoadError, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use log::{debug, info};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

pub mod workbook;

pub use workbook::{CellValue, Sheet, Workbook};

/// Read a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let mut excel = open_workbook_auto(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let sheets = read_sheets(&mut excel)?;
    info!("Loaded {} sheet(s) from {}", sheets.len(), path.display());

    Ok(Workbook {
        path: Some(path.to_path_buf()),
        sheets,
    })
}

/// Read a workbook from uploaded bytes; the format is detected from content
pub fn read_workbook_from_bytes(bytes: Vec<u8>) -> Result<Workbook> {
    let mut excel =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|source| LoadError::Open {
            path: "<memory>".to_string(),
            source,
        })?;

    let sheets = read_sheets(&mut excel)?;
    info!("Loaded {} sheet(s) from in-memory workbook", sheets.len());

    Ok(Workbook { path: None, sheets })
}

fn read_sheets<RS: Read + Seek>(excel: &mut Sheets<RS>) -> Result<Vec<Sheet>> {
    let sheet_names = excel.sheet_names();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = excel
            .worksheet_range(&sheet_name)
            .map_err(|source| LoadError::Sheet {
                name: sheet_name.clone(),
                source,
            })?;
        let sheet = parse_sheet(&sheet_name, &range);
        debug!(
            "Sheet '{}': {} column(s), {} row(s)",
            sheet.name,
            sheet.width(),
            sheet.rows.len()
        );
        sheets.push(sheet);
    }

    Ok(sheets)
}

/// Split a used range into a header row and data rows.
///
/// The first row of the used range is the header. Every data row is padded
/// (or truncated) to the header width.
fn parse_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();

    let headers: Vec<CellValue> = match rows.next() {
        Some(first) => first.iter().map(parse_cell_value).collect(),
        None => return Sheet::new(name, Vec::new(), Vec::new()),
    };
    let width = headers.len();

    let rows = rows
        .map(|row| {
            let mut cells: Vec<CellValue> = row.iter().map(parse_cell_value).collect();
            cells.resize(width, CellValue::Empty);
            cells
        })
        .collect();

    Sheet::new(name, headers, rows)
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
