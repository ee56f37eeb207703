//! Import options.
//!
//! Defaults can be overridden from the environment (a `.env` file is
//! picked up through dotenvy):
//!
//! | Variable              | Field        | Example |
//! |-----------------------|--------------|---------|
//! | `SHEETLOAD_SHEET`     | `sheet_name` | `Sheet1` |
//! | `SHEETLOAD_DELIMITER` | `delimiter`  | `;` or `tab` |
//! | `SHEETLOAD_PRETTY`    | `pretty`     | `false` |
//! | `SHEETLOAD_QUIET`     | `quiet`      | `1` |

use serde::{Deserialize, Serialize};
use std::env;

use crate::compose::parse_bool;

/// Worksheet read when none is configured.
pub const DEFAULT_SHEET: &str = "Sheet1";

/// Options for reading and importing a spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Worksheet to read from a workbook (falls back to the first sheet)
    pub sheet_name: String,

    /// CSV delimiter (auto-detect if not set)
    pub delimiter: Option<char>,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Don't echo log entries to stderr
    pub quiet: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET.to_string(),
            delimiter: None,
            pretty: true,
            quiet: false,
        }
    }
}

impl ImportOptions {
    /// Defaults overlaid with `SHEETLOAD_*` environment variables.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::default().overlay(|key| env::var(key).ok())
    }

    /// Apply overrides from a key lookup on top of `self`.
    fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(sheet) = lookup("SHEETLOAD_SHEET").filter(|s| !s.trim().is_empty()) {
            self.sheet_name = sheet.trim().to_string();
        }
        if let Some(delimiter) = lookup("SHEETLOAD_DELIMITER").and_then(|s| parse_delimiter(&s)) {
            self.delimiter = Some(delimiter);
        }
        if let Some(pretty) = lookup("SHEETLOAD_PRETTY").and_then(|s| parse_bool(s.trim()).ok()) {
            self.pretty = pretty;
        }
        if let Some(quiet) = lookup("SHEETLOAD_QUIET").and_then(|s| parse_bool(s.trim()).ok()) {
            self.quiet = quiet;
        }
        self
    }
}

/// Parse a delimiter setting: a single character, or `tab` / `\t`.
pub fn parse_delimiter(value: &str) -> Option<char> {
    match value {
        "tab" | "TAB" | "\\t" | "\t" => Some('\t'),
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
    }
}
