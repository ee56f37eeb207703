//! Error types for the Sheetload import pipeline.
//!
//! This module defines one error type per layer:
//!
//! - [`FieldError`] - A single field failed to parse (composer)
//! - [`AdapterError`] - A row could not be reshaped into a raw record
//! - [`SourceError`] - The spreadsheet itself could not be read
//! - [`ImportError`] - Top-level batch errors, tagged with the failing row
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Field Errors
// =============================================================================

/// Failure of one of the boolean parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a recognised boolean (expected true/false, t/f or 1/0)")]
pub struct BoolParseError;

/// Failure of the fixed `DD-MM-YYYY` date parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    /// The text does not have the `DD-MM-YYYY` shape.
    #[error("expected DD-MM-YYYY")]
    Shape,

    /// The shape is right but the day does not exist in the calendar.
    #[error("no such calendar date: {0}")]
    Calendar(#[from] chrono::ParseError),
}

/// A field of a raw record that failed validation.
///
/// Carries the column name, the raw text that failed and the
/// underlying parser error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Boolean column holds something outside the boolean lexicon.
    #[error("invalid {field} '{raw}': {source}")]
    InvalidBoolean {
        field: &'static str,
        raw: String,
        #[source]
        source: BoolParseError,
    },

    /// Integer column is not a base-10 integer.
    #[error("invalid {field} '{raw}': {source}")]
    InvalidInteger {
        field: &'static str,
        raw: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Date column is not a `DD-MM-YYYY` calendar date.
    #[error("invalid {field} '{raw}': {source}")]
    InvalidDate {
        field: &'static str,
        raw: String,
        #[source]
        source: DateParseError,
    },
}

impl FieldError {
    /// Column the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidBoolean { field, .. }
            | Self::InvalidInteger { field, .. }
            | Self::InvalidDate { field, .. } => *field,
        }
    }

    /// Raw cell text that failed to parse.
    pub fn raw(&self) -> &str {
        match self {
            Self::InvalidBoolean { raw, .. }
            | Self::InvalidInteger { raw, .. }
            | Self::InvalidDate { raw, .. } => raw.as_str(),
        }
    }
}

// =============================================================================
// Adapter Errors (structural)
// =============================================================================

/// A row could not be represented as a raw record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The row is not a column-to-value mapping.
    #[error("row is not a column mapping (found {0})")]
    NotAnObject(&'static str),

    /// A cell holds a nested value that has no text form.
    #[error("column '{column}' holds {kind}, expected a scalar cell")]
    UnsupportedCell { column: String, kind: &'static str },
}

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while reading a spreadsheet file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be decoded.
    #[error("Failed to decode content as {0}")]
    Encoding(String),

    /// Malformed delimited text.
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),

    /// The delimiter cannot be used for CSV (must be a single ASCII character).
    #[error("Unsupported delimiter {0:?}")]
    Delimiter(char),

    /// The workbook could not be opened or a sheet could not be read.
    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    /// The workbook has no worksheet at all.
    #[error("Workbook has no worksheet")]
    NoWorksheet,

    /// Empty file.
    #[error("Spreadsheet is empty")]
    Empty,

    /// Header row present but blank.
    #[error("No headers found in first row")]
    NoHeaders,
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Top-level batch error.
///
/// Any of these aborts the whole run: no records are returned.
/// `row` is the 1-based index of the data row (the header is not counted).
#[derive(Debug, Error)]
pub enum ImportError {
    /// Spreadsheet could not be read.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Row could not be reshaped.
    #[error("row {row}: {source}")]
    Structural {
        row: usize,
        #[source]
        source: AdapterError,
    },

    /// Row holds an invalid field.
    #[error("row {row}: {source}")]
    Field {
        row: usize,
        #[source]
        source: FieldError,
    },
}

impl ImportError {
    /// The field error behind this import error, if any.
    pub fn field_error(&self) -> Option<&FieldError> {
        match self {
            Self::Field { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Data row the error occurred on, if it is row-specific.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::Structural { row, .. } | Self::Field { row, .. } => Some(*row),
            Self::Source(_) => None,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for field parsing.
pub type FieldResult<T> = Result<T, FieldError>;

/// Result type for the row adapter.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Result type for spreadsheet reading.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, ImportError>;
