//! Row adapter: reshape a loosely typed row into a [`RawRecord`].
//!
//! Rows arrive as JSON objects keyed by column header, the same shape the
//! sheet readers in [`crate::parser`] produce. Known columns are copied by
//! name, unknown columns are ignored and missing columns come out empty.
//! No semantic validation happens here.

use serde_json::{Map, Value};

use crate::error::{AdapterError, AdapterResult};
use crate::models::{columns, RawRecord};

impl RawRecord {
    /// Build a raw record from a column-to-cell mapping.
    ///
    /// # Example
    /// ```ignore
    /// use serde_json::json;
    /// use sheetload::RawRecord;
    ///
    /// let row = json!({ "sku_code": "SKU-1", "buffer_stock": 5 });
    /// let raw = RawRecord::from_value(&row).unwrap();
    /// assert_eq!(raw.buffer_stock, "5");
    /// assert_eq!(raw.off_start_date, None);
    /// ```
    pub fn from_row(row: &Map<String, Value>) -> AdapterResult<Self> {
        let text = |column: &str| -> AdapterResult<String> {
            Ok(cell_text(row, column)?.unwrap_or_default())
        };

        Ok(Self {
            sale_channel: text(columns::SALE_CHANNEL)?,
            sale_source: text(columns::SALE_SOURCE)?,
            sku_code: text(columns::SKU_CODE)?,
            is_unlimited: text(columns::IS_UNLIMITED)?,
            buffer_stock: text(columns::BUFFER_STOCK)?,
            badge_ids: text(columns::BADGE_IDS)?,
            is_active: text(columns::IS_ACTIVE)?,
            off_start_date: cell_text(row, columns::OFF_START_DATE)?,
            off_end_date: cell_text(row, columns::OFF_END_DATE)?,
        })
    }

    /// Build a raw record from any JSON value; the value must be an object.
    pub fn from_value(row: &Value) -> AdapterResult<Self> {
        match row {
            Value::Object(map) => Self::from_row(map),
            other => Err(AdapterError::NotAnObject(kind_of(other))),
        }
    }

    /// Build a raw record from plain `(header, cell)` pairs.
    ///
    /// Later duplicates of a header win, as they would in a map.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().to_string();
            match key.as_ref() {
                columns::SALE_CHANNEL => raw.sale_channel = value,
                columns::SALE_SOURCE => raw.sale_source = value,
                columns::SKU_CODE => raw.sku_code = value,
                columns::IS_UNLIMITED => raw.is_unlimited = value,
                columns::BUFFER_STOCK => raw.buffer_stock = value,
                columns::BADGE_IDS => raw.badge_ids = value,
                columns::IS_ACTIVE => raw.is_active = value,
                columns::OFF_START_DATE => raw.off_start_date = Some(value),
                columns::OFF_END_DATE => raw.off_end_date = Some(value),
                _ => {}
            }
        }
        raw
    }
}

/// Text form of a cell, `None` when the column is missing or null.
fn cell_text(row: &Map<String, Value>, column: &str) -> AdapterResult<Option<String>> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Number(n)) => Ok(Some(number_text(n))),
        Some(other) => Err(AdapterError::UnsupportedCell {
            column: column.to_string(),
            kind: kind_of(other),
        }),
    }
}

/// Integers print as-is; floats use the shortest form, so `42.0` reads `42`.
fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
