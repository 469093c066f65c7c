//! Load-time schema normalization.
//!
//! The persisted blob does not guarantee field types: older versions stored
//! booleans and counters as strings and had no `individual_charges_this_month`
//! at all. Every record is coerced once, here, so the rest of the crate only
//! ever sees well-typed values.
//!
//! Coercion rules:
//! - `mess_enrolled`: `true` or the string `"true"` (any case) is true,
//!   everything else false.
//! - `meals_taken_this_month`: leading integer of a number or string;
//!   invalid, missing or negative values become 0.
//! - `individual_charges_this_month`: leading decimal of a number or string;
//!   invalid, missing, negative or non-finite values become 0.
//! - text fields: strings are trimmed, numbers rendered, anything else empty.
//!
//! Entries that are not objects, have no roll number, or repeat an earlier
//! roll number (case-insensitive) are skipped and counted.

use crate::{
    core::student::StudentRecord,
    errors::{Error, Result},
};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;

/// Records decoded from a ledger blob.
#[derive(Debug, Default)]
pub struct DecodedLedger {
    /// Normalized records in stored order
    pub records: Vec<StudentRecord>,
    /// Entries left out because they were unusable or duplicated
    pub skipped: usize,
}

/// Decodes a ledger blob into normalized records, preserving order.
///
/// # Arguments
/// * `blob` - The serialized ledger as stored
///
/// # Returns
/// The usable records and the number of entries that were skipped
///
/// # Errors
/// Returns `Error::Deserialization` if the blob is not JSON or not a JSON array.
pub fn decode_ledger(blob: &str) -> Result<DecodedLedger> {
    let value: Value = serde_json::from_str(blob).map_err(|e| Error::Deserialization {
        message: e.to_string(),
    })?;

    let Value::Array(entries) = value else {
        return Err(Error::Deserialization {
            message: "ledger blob is not a list of student records".to_string(),
        });
    };

    let mut seen = HashSet::new();
    let mut decoded = DecodedLedger {
        records: Vec::with_capacity(entries.len()),
        skipped: 0,
    };

    for (position, entry) in entries.iter().enumerate() {
        let Some(fields) = entry.as_object() else {
            warn!("Dropping ledger entry {} that is not an object", position);
            decoded.skipped += 1;
            continue;
        };

        let record = normalize_record(fields);
        if record.roll_no.is_empty() {
            warn!("Dropping ledger entry {} without a roll number", position);
            decoded.skipped += 1;
            continue;
        }
        if !seen.insert(record.roll_no.to_lowercase()) {
            warn!(
                "Dropping ledger entry {} with duplicate roll number {}",
                position, record.roll_no
            );
            decoded.skipped += 1;
            continue;
        }
        decoded.records.push(record);
    }

    Ok(decoded)
}

/// Coerces one persisted object into a record.
fn normalize_record(fields: &Map<String, Value>) -> StudentRecord {
    StudentRecord {
        roll_no: coerce_text(fields.get("roll_no")),
        name: coerce_text(fields.get("name")),
        room_no: coerce_text(fields.get("room_no")),
        mess_enrolled: coerce_bool(fields.get("mess_enrolled")),
        meals_taken_this_month: coerce_count(fields.get("meals_taken_this_month")),
        individual_charges_this_month: coerce_amount(
            fields.get("individual_charges_this_month"),
        ),
    }
}

fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn coerce_count(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(truncate)),
        Some(Value::String(s)) => parse_int_prefix(s),
        _ => None,
    };
    parsed
        .and_then(|count| u32::try_from(count).ok())
        .unwrap_or(0)
}

#[allow(clippy::cast_possible_truncation)] // `as` saturates; out-of-range counts are rejected by the caller
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn coerce_amount(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_float_prefix(s),
        _ => None,
    };
    parsed
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .unwrap_or(0.0)
}

/// Parses the integer at the start of `raw` (after whitespace), ignoring
/// anything that follows it. `"12 meals"` gives 12, `"abc"` gives `None`.
/// Values outside `i64` saturate.
pub(crate) fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let end = s.len() - unsigned.len() + digits;
    // Only overflow can fail here; saturate toward the sign
    Some(s[..end].parse().unwrap_or(if s.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

/// Parses the decimal number at the start of `raw` (after whitespace),
/// ignoring anything that follows it.
pub(crate) fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_decode_well_typed_records() {
        let blob = r#"[
            {"roll_no":"101","name":"Amit Kumar","room_no":"A101","mess_enrolled":true,
             "meals_taken_this_month":4,"individual_charges_this_month":220.5},
            {"roll_no":"102","name":"Priya","room_no":"","mess_enrolled":false,
             "meals_taken_this_month":0,"individual_charges_this_month":0}
        ]"#;
        let decoded = decode_ledger(blob).unwrap();
        assert_eq!(decoded.skipped, 0);
        let records = decoded.records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].roll_no(), "101");
        assert!(records[0].mess_enrolled());
        assert_eq!(records[0].meals_taken_this_month(), 4);
        assert_eq!(records[0].individual_charges_this_month(), 220.5);
        assert_eq!(records[1].name(), "Priya");
    }

    #[test]
    fn test_decode_coerces_string_typed_fields() {
        let blob = r#"[{"roll_no":"101","name":"Amit","room_no":"A1",
            "mess_enrolled":"true","meals_taken_this_month":"7",
            "individual_charges_this_month":"99.5"}]"#;
        let record = &decode_ledger(blob).unwrap().records[0];
        assert!(record.mess_enrolled());
        assert_eq!(record.meals_taken_this_month(), 7);
        assert_eq!(record.individual_charges_this_month(), 99.5);
    }

    #[test]
    fn test_decode_defaults_missing_and_invalid_fields() {
        let blob = r#"[{"roll_no":101,"name":"Amit","mess_enrolled":"yes",
            "meals_taken_this_month":"lots"}]"#;
        let record = &decode_ledger(blob).unwrap().records[0];
        assert_eq!(record.roll_no(), "101");
        assert_eq!(record.room_no(), "");
        assert!(!record.mess_enrolled());
        assert_eq!(record.meals_taken_this_month(), 0);
        assert_eq!(record.individual_charges_this_month(), 0.0);
    }

    #[test]
    fn test_decode_clamps_negative_counters() {
        let blob = r#"[{"roll_no":"101","name":"Amit","meals_taken_this_month":-3,
            "individual_charges_this_month":-10}]"#;
        let record = &decode_ledger(blob).unwrap().records[0];
        assert_eq!(record.meals_taken_this_month(), 0);
        assert_eq!(record.individual_charges_this_month(), 0.0);
    }

    #[test]
    fn test_decode_truncates_fractional_meals() {
        let blob = r#"[{"roll_no":"101","name":"Amit","meals_taken_this_month":3.9}]"#;
        assert_eq!(decode_ledger(blob).unwrap().records[0].meals_taken_this_month(), 3);
    }

    #[test]
    fn test_decode_skips_and_counts_unusable_and_duplicate_entries() {
        let blob = r#"[
            {"roll_no":"A7","name":"First"},
            42,
            {"name":"No roll"},
            {"roll_no":"  ","name":"Blank roll"},
            {"roll_no":"a7","name":"Second"}
        ]"#;
        let decoded = decode_ledger(blob).unwrap();
        assert_eq!(decoded.skipped, 4);
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].name(), "First");
    }

    #[test]
    fn test_decode_rejects_malformed_blob() {
        assert!(matches!(
            decode_ledger("{not json"),
            Err(Error::Deserialization { .. })
        ));
        assert!(matches!(
            decode_ledger(r#"{"roll_no":"101"}"#),
            Err(Error::Deserialization { .. })
        ));
        assert!(matches!(
            decode_ledger("null"),
            Err(Error::Deserialization { .. })
        ));
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  7 meals"), Some(7));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("3.9"), Some(3));
        assert_eq!(parse_int_prefix("x1"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_int_prefix("-99999999999999999999"), Some(i64::MIN));
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("99.5"), Some(99.5));
        assert_eq!(parse_float_prefix(" 12.25 rupees"), Some(12.25));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e2x"), Some(100.0));
        assert_eq!(parse_float_prefix("2e"), Some(2.0));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("."), None);
    }
}
