//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and handle the dual
//! datetime format issue (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, Utc};
use stts_core::enums::EntityType;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all stts-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a nullable INTEGER column as `Option<u32>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for negative or oversized values.
pub fn get_opt_u32(row: &libsql::Row, idx: i32) -> Result<Option<u32>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|v| {
            u32::try_from(v)
                .map_err(|_| DatabaseError::Query(format!("Column {idx} out of range: {v}")))
        })
        .transpose()
}

/// Read a required INTEGER column as `u32`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for negative or oversized values.
pub fn get_u32(row: &libsql::Row, idx: i32) -> Result<u32, DatabaseError> {
    let v = row.get::<i64>(idx)?;
    u32::try_from(v).map_err(|_| DatabaseError::Query(format!("Column {idx} out of range: {v}")))
}

/// Read an INTEGER 0/1 column as `bool`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_bool(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Convert an optional value into a bindable libSQL value (`NULL` for `None`).
pub fn opt_value<T: Into<libsql::Value>>(value: Option<T>) -> libsql::Value {
    value.map_or(libsql::Value::Null, Into::into)
}

/// Serialize an optional JSON value for a TEXT column.
#[must_use]
pub fn json_value(value: Option<&serde_json::Value>) -> libsql::Value {
    opt_value(value.map(ToString::to_string))
}

/// Accumulates `SET col = ?n` clauses for a dynamic UPDATE.
///
/// Only fields present in an update struct produce a clause, matching the
/// partial-update builders in [`crate::updates`].
#[derive(Debug, Default)]
pub struct SetClauses {
    sets: Vec<String>,
    params: Vec<libsql::Value>,
}

impl SetClauses {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: &str, value: impl Into<libsql::Value>) {
        self.params.push(value.into());
        self.sets.push(format!("{column} = ?{}", self.params.len()));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Finish as `UPDATE {table} SET ... , updated_at = ? WHERE id = ?`.
    #[must_use]
    pub fn into_update(mut self, table: &str, id: &str, now: DateTime<Utc>) -> (String, Vec<libsql::Value>) {
        self.push("updated_at", now.to_rfc3339());
        self.params.push(id.into());
        let sql = format!(
            "UPDATE {table} SET {} WHERE id = ?{}",
            self.sets.join(", "),
            self.params.len()
        );
        (sql, self.params)
    }
}

/// Map `EntityType` to the corresponding SQL table name.
///
/// Exhaustive match: adding a new `EntityType` variant forces updating this.
#[must_use]
pub const fn entity_type_to_table(entity: EntityType) -> &'static str {
    match entity {
        EntityType::Role => "roles",
        EntityType::User => "users",
        EntityType::Crop => "crops",
        EntityType::Application => "applications",
        EntityType::Permit => "permits",
        EntityType::CropDeclaration => "crop_declarations",
        EntityType::PlantingReturn => "planting_returns",
        EntityType::LabInspection => "lab_inspections",
        EntityType::SeedLabel => "seed_labels",
        EntityType::StockRecord => "stock_records",
        EntityType::Product => "products",
        EntityType::Order => "orders",
        EntityType::Audit => "audit_trail",
    }
}

/// Reject blank required text input.
///
/// # Errors
///
/// Returns `DatabaseError::Validation` naming `field` when `value` is blank.
pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, DatabaseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DatabaseError::validation(format!("{field} must not be blank")));
    }
    Ok(trimmed)
}

/// Reject zero, negative and non-finite quantities.
///
/// # Errors
///
/// Returns `DatabaseError::Validation` naming `field`.
pub fn require_positive(field: &str, value: f64) -> Result<f64, DatabaseError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DatabaseError::validation(format!(
            "{field} must be greater than zero, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_both_datetime_formats() {
        let a = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let b = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn set_clauses_number_parameters() {
        let mut sets = SetClauses::new();
        sets.push("name", "Maize");
        sets.push("quantity", 4.5);
        let now = parse_datetime("2026-02-09 14:30:00").unwrap();
        let (sql, params) = sets.into_update("crops", "crp-1", now);
        assert_eq!(
            sql,
            "UPDATE crops SET name = ?1, quantity = ?2, updated_at = ?3 WHERE id = ?4"
        );
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_text("lot_number", "  ").is_err());
        assert_eq!(require_text("lot_number", " LOT-1 ").unwrap(), "LOT-1");
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        assert!(require_positive("quantity", 0.0).is_err());
        assert!(require_positive("quantity", f64::NAN).is_err());
        assert!(require_positive("quantity", 1.5).is_ok());
    }
}
