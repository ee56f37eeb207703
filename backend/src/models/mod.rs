//! Domain models for the Sheetload import pipeline.
//!
//! - [`RawRecord`] - One spreadsheet row, reshaped but not yet validated
//! - [`ValidatedRecord`] - A fully typed SKU sales-channel setting
//! - [`InactiveSchedule`] - Optional start/end dates of an inactive period
//! - [`columns`] - The column headers the importer understands

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// chrono pattern of every date cell (`DD-MM-YYYY`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Human-readable form of [`DATE_FORMAT`].
pub const DATE_PATTERN_HUMAN: &str = "DD-MM-YYYY";

// =============================================================================
// Columns
// =============================================================================

/// Column headers expected in the first row of the sheet.
pub mod columns {
    pub const SALE_CHANNEL: &str = "sale_channel";
    pub const SALE_SOURCE: &str = "sale_source";
    pub const SKU_CODE: &str = "sku_code";
    pub const IS_UNLIMITED: &str = "is_unlimited";
    pub const BUFFER_STOCK: &str = "buffer_stock";
    pub const BADGE_IDS: &str = "badge_ids";
    pub const IS_ACTIVE: &str = "is_active";
    pub const OFF_START_DATE: &str = "off_start_date";
    pub const OFF_END_DATE: &str = "off_end_date";

    /// Columns every sheet is expected to carry.
    pub const REQUIRED: [&str; 7] = [
        SALE_CHANNEL,
        SALE_SOURCE,
        SKU_CODE,
        IS_UNLIMITED,
        BUFFER_STOCK,
        BADGE_IDS,
        IS_ACTIVE,
    ];

    /// Columns that may be left out of the sheet entirely.
    pub const OPTIONAL: [&str; 2] = [OFF_START_DATE, OFF_END_DATE];

    /// All known columns, in sheet order.
    pub const ALL: [&str; 9] = [
        SALE_CHANNEL,
        SALE_SOURCE,
        SKU_CODE,
        IS_UNLIMITED,
        BUFFER_STOCK,
        BADGE_IDS,
        IS_ACTIVE,
        OFF_START_DATE,
        OFF_END_DATE,
    ];

    /// Whether `name` is one of the known columns.
    pub fn is_known(name: &str) -> bool {
        ALL.contains(&name)
    }
}

// =============================================================================
// Raw Record
// =============================================================================

/// A spreadsheet row keyed by known column, every value still text.
///
/// An empty string means "not filled in". The two date columns are
/// optional so that a sheet without them is distinguishable from a sheet
/// with blank date cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    pub sale_channel: String,
    pub sale_source: String,
    pub sku_code: String,
    pub is_unlimited: String,
    pub buffer_stock: String,
    pub badge_ids: String,
    pub is_active: String,
    pub off_start_date: Option<String>,
    pub off_end_date: Option<String>,
}

// =============================================================================
// Inactive Schedule
// =============================================================================

/// Period during which a listing is switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InactiveSchedule {
    /// First inactive day.
    pub start_date: Option<NaiveDate>,
    /// Last inactive day.
    pub end_date: Option<NaiveDate>,
}

impl InactiveSchedule {
    /// Schedule with neither date set.
    pub const fn none() -> Self {
        Self {
            start_date: None,
            end_date: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

// =============================================================================
// Validated Record
// =============================================================================

/// A SKU setting for one sales channel, fully validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedRecord {
    pub sale_channel: String,
    pub sale_source: String,
    pub sku_code: String,
    /// Stock is never depleted for this listing.
    pub is_unlimited: bool,
    /// Units held back from sale.
    pub buffer_stock: i64,
    pub badge_ids: Vec<String>,
    pub is_active: bool,
    pub inactive_schedule: InactiveSchedule,
}

impl ValidatedRecord {
    /// Create a record from its verbatim fields, every other field at its default:
    /// not unlimited, zero buffer stock, no badges, inactive, no schedule.
    pub fn new(sale_channel: String, sale_source: String, sku_code: String) -> Self {
        Self {
            sale_channel,
            sale_source,
            sku_code,
            is_unlimited: false,
            buffer_stock: 0,
            badge_ids: Vec::new(),
            is_active: false,
            inactive_schedule: InactiveSchedule::none(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = ValidatedRecord::new("web".into(), "shopee".into(), "SKU-1".into());
        assert!(!record.is_unlimited);
        assert_eq!(record.buffer_stock, 0);
        assert!(record.badge_ids.is_empty());
        assert!(!record.is_active);
        assert!(record.inactive_schedule.is_empty());
    }

    #[test]
    fn test_column_sets_partition_all() {
        assert_eq!(columns::REQUIRED.len() + columns::OPTIONAL.len(), columns::ALL.len());
        for col in columns::REQUIRED.iter().chain(columns::OPTIONAL.iter()) {
            assert!(columns::is_known(col));
        }
        assert!(!columns::is_known("price"));
    }

    #[test]
    fn test_record_serialization() {
        let mut record = ValidatedRecord::new("web".into(), "lazada".into(), "SKU-9".into());
        record.inactive_schedule.start_date = NaiveDate::from_ymd_opt(2006, 1, 2);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["skuCode"], "SKU-9");
        assert_eq!(json["inactiveSchedule"]["startDate"], "2006-01-02");
        assert!(json["inactiveSchedule"]["endDate"].is_null());
    }
}
