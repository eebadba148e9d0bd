use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{NumericField, WeekEntry};
use crate::ordering;
use crate::scorecard;

/// Rejection of a whole stored or imported collection.
#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of weekly entries")]
    NotASequence,
    #[error("entry {index} is not an object")]
    NotARecord { index: usize },
    #[error("entry {index} has no string weekStart")]
    MissingWeekStart { index: usize },
}

/// Validate untrusted input into entries sorted by week start.
///
/// The batch is all-or-nothing: one element without a string `weekStart`
/// rejects everything. Individual malformed fields are coerced instead.
pub fn sanitize(raw: &Value) -> Result<Vec<WeekEntry>, SanitizeError> {
    let items = raw.as_array().ok_or(SanitizeError::NotASequence)?;

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let record = item
            .as_object()
            .ok_or(SanitizeError::NotARecord { index })?;
        entries.push(sanitize_record(record, index)?);
    }

    ordering::sort_entries(&mut entries);
    Ok(entries)
}

pub fn parse_document(text: &str) -> Result<Vec<WeekEntry>, SanitizeError> {
    let raw: Value = serde_json::from_str(text)?;
    sanitize(&raw)
}

/// Stored text to entries, falling back to one empty entry for the current week.
pub fn load_or_default(text: Option<&str>, today: NaiveDate) -> Vec<WeekEntry> {
    let default = || vec![WeekEntry::empty(scorecard::week_label(scorecard::week_start_for(today)))];

    let Some(text) = text else {
        return default();
    };

    match parse_document(text) {
        Ok(entries) if entries.is_empty() => {
            tracing::info!("stored scorecard is empty, starting with the current week");
            default()
        }
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(error = %err, "stored scorecard rejected, starting with the current week");
            default()
        }
    }
}

fn sanitize_record(record: &Map<String, Value>, index: usize) -> Result<WeekEntry, SanitizeError> {
    let week_start = record
        .get("weekStart")
        .and_then(Value::as_str)
        .ok_or(SanitizeError::MissingWeekStart { index })?;

    let mut entry = WeekEntry::empty(week_start);
    for field in NumericField::ALL {
        *field.slot(&mut entry) = record.get(field.key()).and_then(coerce_number);
    }
    entry.manual_red_flag = record.get("manualRedFlag").map_or(false, coerce_bool);
    entry.payment_red_flag = record.get("paymentRedFlag").map_or(false, coerce_bool);
    entry.notes = record
        .get("notes")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(entry)
}

/// Finite numbers pass; numeric strings are trimmed and parsed; anything else is absent.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(text) => parse_number_text(text),
        _ => None,
    }
}

pub fn parse_number_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(value) = parse_radix_literal(trimmed) {
        return Some(value);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Unsigned `0x`, `0o` and `0b` integer literals, as accepted in stored documents.
fn parse_radix_literal(text: &str) -> Option<f64> {
    let prefix = text.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u128::from_str_radix(digits, radix).ok().map(|n| n as f64)
}

pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) if text.eq_ignore_ascii_case("true") => true,
        Value::String(text) if text.eq_ignore_ascii_case("false") => false,
        other => truthy(other),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(false, |n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
