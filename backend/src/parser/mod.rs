//! Sheet readers.
//!
//! Turn a spreadsheet into its header row plus one JSON object per data
//! row, keyed by header. Nothing here knows about the record schema; that
//! is the job of [`crate::adapter`] and [`crate::compose`].
//!
//! - [`delimited`] - CSV/TSV with encoding and delimiter auto-detection
//! - [`workbook`] - xlsx/xlsm/xls/ods, one worksheet

pub mod delimited;
pub mod workbook;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::config::ImportOptions;
use crate::error::SourceResult;

pub use delimited::{decode_content, detect_delimiter, detect_encoding, read_csv_bytes};
pub use workbook::{read_workbook_bytes, read_workbook_file};

/// Extensions read as workbooks; anything else is read as CSV.
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Kind of spreadsheet a set of rows came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetFormat {
    Csv,
    Workbook,
}

/// Where the rows came from and how they were read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub format: SheetFormat,
    /// Detected text encoding (CSV only)
    pub encoding: Option<String>,
    /// Detected or configured delimiter (CSV only)
    pub delimiter: Option<char>,
    /// Worksheet actually read (workbooks only)
    pub sheet: Option<String>,
}

/// Header row and data rows of one sheet
#[derive(Debug, Clone)]
pub struct SheetRows {
    pub headers: Vec<String>,
    /// One object per data row, keyed by header
    pub rows: Vec<Map<String, Value>>,
    pub source: SourceInfo,
}

impl SheetRows {
    /// Rows as JSON values, e.g. for dumping.
    pub fn to_values(&self) -> Vec<Value> {
        self.rows.iter().cloned().map(Value::Object).collect()
    }
}

/// Whether `path` should be opened as a workbook.
pub fn is_workbook_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| WORKBOOK_EXTENSIONS.iter().any(|w| e.eq_ignore_ascii_case(w)))
}

/// Read a spreadsheet file, choosing the reader from its extension.
pub fn read_sheet_file(path: &Path, options: &ImportOptions) -> SourceResult<SheetRows> {
    if is_workbook_path(path) {
        read_workbook_file(path, &options.sheet_name)
    } else {
        let bytes = std::fs::read(path)?;
        read_csv_bytes(&bytes, options.delimiter)
    }
}
