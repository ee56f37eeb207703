//! # Sheetload - spreadsheet rows to validated SKU listing records
//!
//! Sheetload reads a sheet of SKU sales-channel settings (xlsx or CSV) and
//! turns every row into a strongly typed [`ValidatedRecord`], or rejects the
//! whole sheet at the first invalid cell.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ xlsx / CSV  │────▶│   Parser    │────▶│   Adapter   │────▶│  Composer   │
//! │   sheet     │     │ (rows/JSON) │     │ (RawRecord) │     │ (validated) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheetload::{import_file, ImportOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), sheetload::ImportError> {
//!     let result = import_file(Path::new("listings.xlsx"), &ImportOptions::default())?;
//!     println!("Imported {} listings", result.records.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Raw and validated records, column names
//! - [`adapter`] - Row mapping to [`RawRecord`]
//! - [`compose`] - Field parsing and validation
//! - [`parser`] - CSV and workbook readers
//! - [`pipeline`] - All-or-nothing batch import
//! - [`config`] - Import options
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Row handling
pub mod adapter;
pub mod compose;

// Reading
pub mod parser;

// Orchestration
pub mod pipeline;

// Ambient
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    AdapterError,
    BoolParseError,
    DateParseError,
    FieldError,
    ImportError,
    SourceError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    columns,
    InactiveSchedule,
    RawRecord,
    ValidatedRecord,
    DATE_FORMAT,
    DATE_PATTERN_HUMAN,
};

// =============================================================================
// Re-exports - Field parsers
// =============================================================================

pub use compose::{parse_bool, parse_date, parse_int, split_badges};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    read_csv_bytes,
    read_sheet_file,
    read_workbook_bytes,
    read_workbook_file,
    SheetFormat,
    SheetRows,
    SourceInfo,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{
    check_rows,
    column_report,
    compose_row,
    compose_rows,
    compose_values,
    import_csv_bytes,
    import_file,
    import_sheet,
    import_workbook_bytes,
    CheckReport,
    ColumnReport,
    ImportResult,
    RowDiagnostics,
};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::ImportOptions;
