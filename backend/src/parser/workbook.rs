//! Workbook reader (xlsx, xlsm, xlsb, xls, ods) built on calamine.
//!
//! One worksheet is read: the requested one, or the first sheet when the
//! requested name does not exist. The first row is the header row.

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::NaiveDate;
use serde_json::{Map, Number, Value};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use super::{SheetFormat, SheetRows, SourceInfo};
use crate::error::{SourceError, SourceResult};
use crate::logs::log_warning;
use crate::models::DATE_FORMAT;

/// Largest float still converted to an exact integer cell (2^53).
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Read one worksheet of a workbook file.
pub fn read_workbook_file(path: &Path, sheet_name: &str) -> SourceResult<SheetRows> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| SourceError::Workbook(e.to_string()))?;
    read_sheets(&mut workbook, sheet_name)
}

/// Read one worksheet of an in-memory workbook.
pub fn read_workbook_bytes(bytes: &[u8], sheet_name: &str) -> SourceResult<SheetRows> {
    if bytes.is_empty() {
        return Err(SourceError::Empty);
    }
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| SourceError::Workbook(e.to_string()))?;
    read_sheets(&mut workbook, sheet_name)
}

fn read_sheets<RS: Read + Seek>(
    workbook: &mut calamine::Sheets<RS>,
    sheet_name: &str,
) -> SourceResult<SheetRows> {
    let sheet_names = workbook.sheet_names().to_owned();
    let used_sheet = pick_sheet(&sheet_names, sheet_name)?;
    if used_sheet != sheet_name {
        log_warning(format!(
            "Sheet '{}' not found, reading first sheet '{}'",
            sheet_name, used_sheet
        ));
    }

    let range = workbook
        .worksheet_range(&used_sheet)
        .map_err(|e| SourceError::Workbook(e.to_string()))?;

    let (headers, rows) = rows_from_range(&range)?;

    Ok(SheetRows {
        headers,
        rows,
        source: SourceInfo {
            format: SheetFormat::Workbook,
            encoding: None,
            delimiter: None,
            sheet: Some(used_sheet),
        },
    })
}

/// The requested sheet if present, otherwise the first one.
fn pick_sheet(sheet_names: &[String], requested: &str) -> SourceResult<String> {
    if sheet_names.iter().any(|s| s == requested) {
        return Ok(requested.to_string());
    }
    sheet_names.first().cloned().ok_or(SourceError::NoWorksheet)
}

/// Zip the header row against every data row.
///
/// Empty cells are left out of the row, so a blank cell reads the same as
/// a missing column. Fully blank rows are skipped.
fn rows_from_range(range: &Range<Data>) -> SourceResult<(Vec<String>, Vec<Map<String, Value>>)> {
    let mut rows_iter = range.rows();
    let header_row = rows_iter.next().ok_or(SourceError::Empty)?;

    let headers: Vec<String> = header_row.iter().map(|c| c.to_string().trim().to_string()).collect();
    if headers.iter().all(String::is_empty) {
        return Err(SourceError::NoHeaders);
    }

    let mut rows = Vec::new();
    for cells in rows_iter {
        let mut row = Map::new();
        for (header, cell) in headers.iter().zip(cells.iter()) {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = cell_value(cell) {
                row.insert(header.clone(), value);
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok((headers, rows))
}

/// JSON form of a worksheet cell, `None` for an empty cell.
///
/// Whole floats become integers (spreadsheets store every number as a
/// float) and date cells are written in the `DD-MM-YYYY` pattern.
pub fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Float(f) => Some(float_value(*f)),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(datetime) if dt.is_datetime() => {
                Value::String(datetime.date().format(DATE_FORMAT).to_string())
            }
            _ => float_value(dt.as_f64()),
        }),
        Data::DateTimeIso(s) => Some(Value::String(iso_date_text(s))),
        Data::DurationIso(s) => Some(Value::String(s.clone())),
        Data::Error(e) => Some(Value::String(e.to_string())),
    }
}

fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT {
        Value::from(f as i64)
    } else {
        Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string()))
    }
}

/// `YYYY-MM-DD...` rewritten as `DD-MM-YYYY`; anything else unchanged.
fn iso_date_text(s: &str) -> String {
    s.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(&Data::Empty), None);
        assert_eq!(cell_value(&Data::String(String::new())), None);
        assert_eq!(cell_value(&Data::String("SKU-1".into())), Some(Value::from("SKU-1")));
        assert_eq!(cell_value(&Data::Int(7)), Some(Value::from(7)));
        assert_eq!(cell_value(&Data::Float(42.0)), Some(Value::from(42)));
        assert_eq!(cell_value(&Data::Float(2.5)), Some(Value::from(2.5)));
        assert_eq!(cell_value(&Data::Bool(true)), Some(Value::Bool(true)));
    }

    #[test]
    fn test_iso_dates_rewritten() {
        assert_eq!(
            cell_value(&Data::DateTimeIso("2006-01-02T00:00:00".into())),
            Some(Value::from("02-01-2006"))
        );
        assert_eq!(iso_date_text("not a date"), "not a date");
    }

    #[test]
    fn test_excel_date_cells() {
        let date = ExcelDateTime::new(38719.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_value(&Data::DateTime(date)), Some(Value::from("02-01-2006")));

        let duration = ExcelDateTime::new(38719.0, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(cell_value(&Data::DateTime(duration)), Some(Value::from(38719)));
    }

    #[test]
    fn test_excel_date_cell_composes() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("sku_code".into()));
        range.set_value((0, 1), Data::String("off_start_date".into()));
        range.set_value((1, 0), Data::String("SKU-1".into()));
        range.set_value(
            (1, 1),
            Data::DateTime(ExcelDateTime::new(38719.0, ExcelDateTimeType::DateTime, false)),
        );

        let (_, rows) = rows_from_range(&range).unwrap();
        let records = crate::pipeline::compose_rows(&rows).unwrap();
        assert_eq!(
            records[0].inactive_schedule.start_date,
            NaiveDate::from_ymd_opt(2006, 1, 2)
        );
        assert_eq!(records[0].inactive_schedule.end_date, None);
    }

    #[test]
    fn test_pick_sheet() {
        let names = vec!["Summary".to_string(), "Sheet1".to_string()];
        assert_eq!(pick_sheet(&names, "Sheet1").unwrap(), "Sheet1");
        assert_eq!(pick_sheet(&names, "Missing").unwrap(), "Summary");
        assert!(matches!(pick_sheet(&[], "Sheet1"), Err(SourceError::NoWorksheet)));
    }

    #[test]
    fn test_rows_from_range() {
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("sku_code".into()));
        range.set_value((0, 1), Data::String("buffer_stock".into()));
        range.set_value((0, 2), Data::String("off_start_date".into()));
        range.set_value((1, 0), Data::String("SKU-1".into()));
        range.set_value((1, 1), Data::Float(12.0));
        range.set_value((2, 0), Data::String("SKU-2".into()));

        let (headers, rows) = rows_from_range(&range).unwrap();
        assert_eq!(headers, vec!["sku_code", "buffer_stock", "off_start_date"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["buffer_stock"], 12);
        assert!(!rows[0].contains_key("off_start_date"));
        assert_eq!(rows[1]["sku_code"], "SKU-2");
        assert!(!rows[1].contains_key("buffer_stock"));
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(matches!(rows_from_range(&range), Err(SourceError::Empty)));
    }

    #[test]
    fn test_unreadable_workbook() {
        let result = read_workbook_bytes(b"definitely not a zip archive", "Sheet1");
        assert!(matches!(result, Err(SourceError::Workbook(_))));
    }
}
