//! High-level import API: spreadsheet in, validated records out.
//!
//! Rows are composed strictly in order. The first row that fails aborts
//! the whole import and no records are returned; a batch is either fully
//! valid or rejected.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheetload::{import_file, ImportOptions};
//! use std::path::Path;
//!
//! let result = import_file(Path::new("listings.xlsx"), &ImportOptions::default())?;
//! println!("Imported {} listings", result.records.len());
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::config::ImportOptions;
use crate::error::{FieldError, ImportError, PipelineResult};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::{columns, RawRecord, ValidatedRecord};
use crate::parser::{self, SheetFormat, SheetRows, SourceInfo};

/// Result of a successful import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// Validated records, in sheet order
    pub records: Vec<ValidatedRecord>,
    /// Header row as read
    pub headers: Vec<String>,
    /// How the sheet was read
    pub source: SourceInfo,
    /// Missing and unknown columns
    pub columns: ColumnReport,
}

/// Comparison of a header row against the known columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnReport {
    /// Required columns absent from the header row
    pub missing: Vec<String>,
    /// Header cells that match no known column (their values are ignored)
    pub unknown: Vec<String>,
}

impl ColumnReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unknown.is_empty()
    }
}

/// Every field error of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostics {
    /// 1-based data row
    pub row: usize,
    pub errors: Vec<FieldError>,
}

/// Outcome of [`check_rows`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of data rows inspected
    pub rows: usize,
    /// Rows with at least one problem
    pub failures: Vec<RowDiagnostics>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of field errors over all rows.
    pub fn error_count(&self) -> usize {
        self.failures.iter().map(|f| f.errors.len()).sum()
    }
}

// =============================================================================
// Row-level API
// =============================================================================

/// Compose one row.
///
/// `row` is the 1-based data row number used in the error.
pub fn compose_row(row: usize, cells: &Map<String, Value>) -> PipelineResult<ValidatedRecord> {
    let raw = RawRecord::from_row(cells)
        .map_err(|source| ImportError::Structural { row, source })?;
    raw.compose().map_err(|source| ImportError::Field { row, source })
}

/// Compose all rows, all or nothing.
///
/// # Example
/// ```ignore
/// use serde_json::json;
/// use sheetload::compose_values;
///
/// let rows = vec![
///     json!({ "sku_code": "A", "buffer_stock": "1" }),
///     json!({ "sku_code": "B", "buffer_stock": "xyz" }),
/// ];
/// let err = compose_values(&rows).unwrap_err();
/// assert_eq!(err.row(), Some(2));
/// ```
pub fn compose_rows(rows: &[Map<String, Value>]) -> PipelineResult<Vec<ValidatedRecord>> {
    let mut records = Vec::with_capacity(rows.len());
    for (idx, cells) in rows.iter().enumerate() {
        records.push(compose_row(idx + 1, cells)?);
    }
    Ok(records)
}

/// Same as [`compose_rows`] for rows held as generic JSON values.
pub fn compose_values(rows: &[Value]) -> PipelineResult<Vec<ValidatedRecord>> {
    let mut records = Vec::with_capacity(rows.len());
    for (idx, value) in rows.iter().enumerate() {
        let row = idx + 1;
        let raw = RawRecord::from_value(value)
            .map_err(|source| ImportError::Structural { row, source })?;
        records.push(raw.compose().map_err(|source| ImportError::Field { row, source })?);
    }
    Ok(records)
}

/// Run every field rule on every row without stopping, producing no records.
///
/// Rows that cannot even be reshaped end the check with an error, as they
/// would an import.
pub fn check_rows(rows: &[Map<String, Value>]) -> PipelineResult<CheckReport> {
    let mut report = CheckReport { rows: rows.len(), failures: Vec::new() };

    for (idx, cells) in rows.iter().enumerate() {
        let row = idx + 1;
        let raw = RawRecord::from_row(cells)
            .map_err(|source| ImportError::Structural { row, source })?;
        let errors = raw.diagnose();
        if !errors.is_empty() {
            report.failures.push(RowDiagnostics { row, errors });
        }
    }

    Ok(report)
}

/// Compare a header row against the known columns.
pub fn column_report(headers: &[String]) -> ColumnReport {
    let missing = columns::REQUIRED
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();

    let unknown = headers
        .iter()
        .filter(|h| !h.is_empty() && !columns::is_known(h))
        .cloned()
        .collect();

    ColumnReport { missing, unknown }
}

// =============================================================================
// Sheet-level API
// =============================================================================

/// Import a spreadsheet file (workbook or CSV, by extension).
pub fn import_file(path: &Path, options: &ImportOptions) -> PipelineResult<ImportResult> {
    log_info(format!("📖 Reading {}...", path.display()));
    let sheet = parser::read_sheet_file(path, options)?;
    import_sheet(sheet)
}

/// Import CSV bytes.
pub fn import_csv_bytes(bytes: &[u8], options: &ImportOptions) -> PipelineResult<ImportResult> {
    let sheet = parser::read_csv_bytes(bytes, options.delimiter)?;
    import_sheet(sheet)
}

/// Import workbook bytes.
pub fn import_workbook_bytes(bytes: &[u8], options: &ImportOptions) -> PipelineResult<ImportResult> {
    let sheet = parser::read_workbook_bytes(bytes, &options.sheet_name)?;
    import_sheet(sheet)
}

/// Compose the rows of an already-read sheet.
pub fn import_sheet(sheet: SheetRows) -> PipelineResult<ImportResult> {
    log_source(&sheet);

    let columns = column_report(&sheet.headers);
    log_columns(&columns);

    log_info("⚙️  Composing records...");
    let records = match compose_rows(&sheet.rows) {
        Ok(records) => records,
        Err(e) => {
            log_error(format!("Import aborted at {}", e));
            return Err(e);
        }
    };
    log_success(format!("{} records valid", records.len()));

    Ok(ImportResult {
        records,
        headers: sheet.headers,
        source: sheet.source,
        columns,
    })
}

fn log_source(sheet: &SheetRows) {
    match sheet.source.format {
        SheetFormat::Csv => {
            if let Some(ref encoding) = sheet.source.encoding {
                log_success(format!("Detected encoding: {}", encoding));
            }
            if let Some(delimiter) = sheet.source.delimiter {
                log_success(format!("Delimiter: '{}'", format_delimiter(delimiter)));
            }
        }
        SheetFormat::Workbook => {
            if let Some(ref name) = sheet.source.sheet {
                log_success(format!("Worksheet: {}", name));
            }
        }
    }
    log_success(format!("Read {} rows", sheet.rows.len()));
}

fn log_columns(report: &ColumnReport) {
    if !report.missing.is_empty() {
        log_warning(format!(
            "Missing columns (defaults apply): {}",
            report.missing.join(", ")
        ));
    }
    if !report.unknown.is_empty() {
        log_warning(format!("Ignoring unknown columns: {}", report.unknown.join(", ")));
        for col in &report.unknown {
            log_info_indent(format!("'{}' is not one of: {}", col, columns::ALL.join(", ")), 1);
        }
    }
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use chrono::NaiveDate;
    use serde_json::json;

    fn quiet() {
        crate::logs::set_quiet(true);
    }

    fn row(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("row fixture must be an object"),
        }
    }

    fn valid_row() -> Value {
        json!({
            "sale_channel": "online",
            "sale_source": "shopee",
            "sku_code": "SKU-001",
            "is_unlimited": "false",
            "buffer_stock": "5",
            "badge_ids": "new, hot",
            "is_active": "true",
            "off_start_date": "02-01-2006",
            "off_end_date": ""
        })
    }

    #[test]
    fn test_compose_rows_in_order() {
        let mut second = valid_row();
        second["sku_code"] = json!("SKU-002");
        let records = compose_values(&[valid_row(), second]).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sku_code, "SKU-001");
        assert_eq!(records[1].sku_code, "SKU-002");
        assert_eq!(records[0].badge_ids, vec!["new", "hot"]);
        assert_eq!(records[0].buffer_stock, 5);
        assert!(records[0].is_active);
        assert_eq!(
            records[0].inactive_schedule.start_date,
            NaiveDate::from_ymd_opt(2006, 1, 2)
        );
        assert_eq!(records[0].inactive_schedule.end_date, None);
    }

    #[test]
    fn test_one_bad_row_rejects_batch() {
        let mut bad = valid_row();
        bad["buffer_stock"] = json!("xyz");

        let err = compose_rows(&[row(valid_row()), row(bad)]).unwrap_err();
        assert_eq!(err.row(), Some(2));
        match err.field_error() {
            Some(FieldError::InvalidInteger { field, raw, .. }) => {
                assert_eq!(*field, "buffer_stock");
                assert_eq!(raw, "xyz");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_structural_error_reports_row() {
        let err = compose_values(&[valid_row(), json!("not a row")]).unwrap_err();
        assert!(matches!(err, ImportError::Structural { row: 2, .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(compose_rows(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_check_rows_lists_everything() {
        let mut bad = valid_row();
        bad["is_unlimited"] = json!("perhaps");
        bad["off_end_date"] = json!("2006-01-02");

        let report = check_rows(&[row(valid_row()), row(bad)]).unwrap();
        assert_eq!(report.rows, 2);
        assert!(!report.is_ok());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, 2);
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn test_column_report() {
        let headers: Vec<String> = ["sku_code", "sale_channel", "price", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let report = column_report(&headers);

        assert!(report.missing.contains(&"buffer_stock".to_string()));
        assert!(!report.missing.contains(&"sku_code".to_string()));
        assert!(!report.missing.contains(&"off_start_date".to_string()));
        assert_eq!(report.unknown, vec!["price"]);

        let all: Vec<String> = columns::ALL.iter().map(|s| s.to_string()).collect();
        assert!(column_report(&all).is_clean());
    }

    #[test]
    fn test_import_csv_bytes() {
        quiet();
        let csv = "sale_channel;sale_source;sku_code;is_unlimited;buffer_stock;badge_ids;is_active;off_start_date;off_end_date\n\
                   online;shopee;SKU-1;1;10;\"a, b\";t;02-01-2006;\n\
                   store;walk-in;SKU-2;;;;;;\n";
        let result = import_csv_bytes(csv.as_bytes(), &ImportOptions::default()).unwrap();

        assert_eq!(result.records.len(), 2);
        assert!(result.columns.is_clean());
        assert!(result.records[0].is_unlimited);
        assert_eq!(result.records[0].badge_ids, vec!["a", "b"]);
        assert_eq!(
            result.records[1],
            ValidatedRecord::new("store".into(), "walk-in".into(), "SKU-2".into())
        );
    }

    #[test]
    fn test_import_file_all_or_nothing() {
        quiet();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.csv");
        std::fs::write(
            &path,
            "sku_code,buffer_stock,is_active\nSKU-1,3,true\nSKU-2,xyz,true\n",
        )
        .unwrap();

        let err = import_file(&path, &ImportOptions::default()).unwrap_err();
        assert_eq!(err.row(), Some(2));
        assert_eq!(err.field_error().map(FieldError::field), Some("buffer_stock"));
    }

    #[test]
    fn test_csv_cells_reach_composer_verbatim() {
        quiet();
        let csv = "sale_channel;sku_code;buffer_stock\n  online ; SKU-1 ; 42\n";
        let err = import_csv_bytes(csv.as_bytes(), &ImportOptions::default()).unwrap_err();

        assert_eq!(err.row(), Some(1));
        match err.field_error() {
            Some(FieldError::InvalidInteger { field, raw, .. }) => {
                assert_eq!(*field, "buffer_stock");
                assert_eq!(raw, " 42");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let csv = "sale_channel;sku_code\n  online ; SKU-1 \n";
        let result = import_csv_bytes(csv.as_bytes(), &ImportOptions::default()).unwrap();
        assert_eq!(result.records[0].sale_channel, "  online ");
        assert_eq!(result.records[0].sku_code, " SKU-1 ");
    }

    #[test]
    fn test_import_missing_file() {
        quiet();
        let err = import_file(Path::new("/nonexistent/listings.xlsx"), &ImportOptions::default())
            .unwrap_err();
        assert!(matches!(err, ImportError::Source(SourceError::Workbook(_))));
    }

    #[test]
    fn test_format_delimiter() {
        assert_eq!(format_delimiter('\t'), "\\t");
        assert_eq!(format_delimiter(';'), ";");
    }
}
