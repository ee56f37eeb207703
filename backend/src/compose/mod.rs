//! Composer: turn a [`RawRecord`] into a [`ValidatedRecord`].
//!
//! Fields are checked in a fixed order and the first invalid one stops
//! composition:
//!
//! 1. `sale_channel`, `sale_source`, `sku_code` - copied verbatim
//! 2. `is_unlimited` - boolean
//! 3. `is_active` - boolean
//! 4. `buffer_stock` - base-10 integer
//! 5. `badge_ids` - comma-separated list, each item trimmed
//! 6. `off_start_date` - `DD-MM-YYYY`
//! 7. `off_end_date` - `DD-MM-YYYY`
//!
//! Empty cells keep the defaults of [`ValidatedRecord::new`].
//!
//! [`RawRecord::diagnose`] runs the same rules without stopping, for
//! reporting every problem in a row at once.

use chrono::NaiveDate;

use crate::error::{BoolParseError, DateParseError, FieldError, FieldResult};
use crate::models::{columns, RawRecord, ValidatedRecord, DATE_FORMAT};

impl RawRecord {
    /// Compose a validated record, failing on the first invalid field.
    ///
    /// # Example
    /// ```ignore
    /// use sheetload::RawRecord;
    ///
    /// let raw = RawRecord { buffer_stock: "42".into(), ..RawRecord::default() };
    /// assert_eq!(raw.compose().unwrap().buffer_stock, 42);
    /// ```
    pub fn compose(&self) -> FieldResult<ValidatedRecord> {
        let mut record = ValidatedRecord::new(
            self.sale_channel.clone(),
            self.sale_source.clone(),
            self.sku_code.clone(),
        );

        if !self.is_unlimited.is_empty() {
            record.is_unlimited = bool_field(columns::IS_UNLIMITED, &self.is_unlimited)?;
        }

        if !self.is_active.is_empty() {
            record.is_active = bool_field(columns::IS_ACTIVE, &self.is_active)?;
        }

        if !self.buffer_stock.is_empty() {
            record.buffer_stock = int_field(columns::BUFFER_STOCK, &self.buffer_stock)?;
        }

        record.badge_ids = split_badges(&self.badge_ids);

        if let Some(raw) = filled(&self.off_start_date) {
            record.inactive_schedule.start_date = Some(date_field(columns::OFF_START_DATE, raw)?);
        }

        if let Some(raw) = filled(&self.off_end_date) {
            record.inactive_schedule.end_date = Some(date_field(columns::OFF_END_DATE, raw)?);
        }

        Ok(record)
    }

    /// Every field error of this row, in rule order.
    ///
    /// Empty exactly when [`RawRecord::compose`] succeeds.
    pub fn diagnose(&self) -> Vec<FieldError> {
        let checks = [
            non_empty(&self.is_unlimited)
                .and_then(|raw| bool_field(columns::IS_UNLIMITED, raw).err()),
            non_empty(&self.is_active).and_then(|raw| bool_field(columns::IS_ACTIVE, raw).err()),
            non_empty(&self.buffer_stock)
                .and_then(|raw| int_field(columns::BUFFER_STOCK, raw).err()),
            filled(&self.off_start_date)
                .and_then(|raw| date_field(columns::OFF_START_DATE, raw).err()),
            filled(&self.off_end_date).and_then(|raw| date_field(columns::OFF_END_DATE, raw).err()),
        ];

        checks.into_iter().flatten().collect()
    }
}

// =============================================================================
// Field parsers
// =============================================================================

/// Parse a boolean cell.
///
/// Accepts `1`, `t`, `T`, `0`, `f`, `F` and `true`/`false` in any letter case.
pub fn parse_bool(raw: &str) -> Result<bool, BoolParseError> {
    match raw {
        "1" | "t" | "T" => Ok(true),
        "0" | "f" | "F" => Ok(false),
        s if s.eq_ignore_ascii_case("true") => Ok(true),
        s if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(BoolParseError),
    }
}

/// Parse a base-10 integer cell with an optional leading sign.
pub fn parse_int(raw: &str) -> Result<i64, std::num::ParseIntError> {
    raw.parse::<i64>()
}

/// Split a comma-separated cell, trimming every item.
///
/// An empty cell yields no items; empty items between commas are kept.
pub fn split_badges(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

/// Parse a `DD-MM-YYYY` date cell.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(DateParseError::Shape);
    }

    Ok(NaiveDate::parse_from_str(raw, DATE_FORMAT)?)
}

fn bool_field(field: &'static str, raw: &str) -> FieldResult<bool> {
    parse_bool(raw).map_err(|source| FieldError::InvalidBoolean {
        field,
        raw: raw.to_string(),
        source,
    })
}

fn int_field(field: &'static str, raw: &str) -> FieldResult<i64> {
    parse_int(raw).map_err(|source| FieldError::InvalidInteger {
        field,
        raw: raw.to_string(),
        source,
    })
}

fn date_field(field: &'static str, raw: &str) -> FieldResult<NaiveDate> {
    parse_date(raw).map_err(|source| FieldError::InvalidDate {
        field,
        raw: raw.to_string(),
        source,
    })
}

fn non_empty(raw: &str) -> Option<&str> {
    (!raw.is_empty()).then_some(raw)
}

fn filled(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().and_then(non_empty)
}

// =============================================================================
// Tests
// =============================================================================
