//! Coercion of raw JSON values into typed field values
//!
//! Coercion is lax in the same places for every schema:
//! - numeric and boolean fields accept their textual forms
//! - integers accept floats with no fractional part
//! - timestamps accept RFC 3339, naive ISO 8601 (read as UTC), bare dates and Unix time
//!   (seconds, or milliseconds above 2e10 in magnitude)
//! - timestamps must fall in years 0000 through 9999 so they print back as RFC 3339
//!
//! Booleans are never accepted where a number is expected, and strings never accept
//! numbers.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use super::types::FieldType;
use super::value::FieldValue;

/// Unix numbers larger than this in magnitude are milliseconds, not seconds.
const MILLIS_THRESHOLD: i64 = 20_000_000_000;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Coerces a non-null raw value to `field_type`. Returns `None` on mismatch.
pub(crate) fn coerce(value: &Value, field_type: FieldType) -> Option<FieldValue> {
    match field_type {
        FieldType::String => value.as_str().map(|s| FieldValue::String(s.to_string())),
        FieldType::Int => coerce_int(value).map(FieldValue::Int),
        FieldType::Decimal => coerce_decimal(value).map(FieldValue::Decimal),
        FieldType::Bool => coerce_bool(value).map(FieldValue::Bool),
        FieldType::Timestamp => coerce_timestamp(value).map(FieldValue::Timestamp),
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            if n.is_u64() {
                // Above i64::MAX
                return None;
            }
            let f = n.as_f64()?;
            let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
            (f.fract() == 0.0 && in_range).then_some(f as i64)
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_decimal(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "t" | "y" => Some(true),
            "false" | "0" | "no" | "off" | "f" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_timestamp(value: &Value) -> Option<DateTime<FixedOffset>> {
    let ts = match value {
        Value::String(s) => parse_timestamp(s.trim())?,
        Value::Number(n) => from_unix_number(n)?.into(),
        _ => return None,
    };
    (0..=9999).contains(&ts.year()).then_some(ts)
}

fn from_unix_number(n: &serde_json::Number) -> Option<DateTime<Utc>> {
    if let Some(i) = n.as_i64() {
        return if i.unsigned_abs() > MILLIS_THRESHOLD.unsigned_abs() {
            DateTime::from_timestamp_millis(i)
        } else {
            DateTime::from_timestamp(i, 0)
        };
    }

    let mut secs = n.as_f64()?;
    if !secs.is_finite() {
        return None;
    }
    if secs.abs() > MILLIS_THRESHOLD as f64 {
        secs /= 1000.0;
    }
    if secs.abs() >= i64::MAX as f64 {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

/// Parses an ISO 8601 timestamp. Inputs without an offset are taken as UTC.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts);
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Some(Utc.from_utc_datetime(&naive).into())
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "decimal"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_rejects_numbers() {
        assert_eq!(
            coerce(&json!("Austin"), FieldType::String),
            Some(FieldValue::String("Austin".into()))
        );
        assert_eq!(coerce(&json!(42), FieldType::String), None);
        assert_eq!(coerce(&json!(true), FieldType::String), None);
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(coerce(&json!(7), FieldType::Int), Some(FieldValue::Int(7)));
        assert_eq!(coerce(&json!(7.0), FieldType::Int), Some(FieldValue::Int(7)));
        assert_eq!(coerce(&json!(" 12 "), FieldType::Int), Some(FieldValue::Int(12)));
        assert_eq!(coerce(&json!(7.5), FieldType::Int), None);
        assert_eq!(coerce(&json!("7.5"), FieldType::Int), None);
        assert_eq!(coerce(&json!(true), FieldType::Int), None);
        assert_eq!(coerce(&json!(u64::MAX), FieldType::Int), None);
    }

    #[test]
    fn test_decimal_coercion() {
        assert_eq!(coerce(&json!(0), FieldType::Decimal), Some(FieldValue::Decimal(0.0)));
        assert_eq!(coerce(&json!(19.99), FieldType::Decimal), Some(FieldValue::Decimal(19.99)));
        assert_eq!(coerce(&json!("-1.5"), FieldType::Decimal), Some(FieldValue::Decimal(-1.5)));
        assert_eq!(coerce(&json!("NaN"), FieldType::Decimal), None);
        assert_eq!(coerce(&json!("inf"), FieldType::Decimal), None);
        assert_eq!(coerce(&json!(false), FieldType::Decimal), None);
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(coerce(&json!(false), FieldType::Bool), Some(FieldValue::Bool(false)));
        assert_eq!(coerce(&json!(1), FieldType::Bool), Some(FieldValue::Bool(true)));
        assert_eq!(coerce(&json!("Yes"), FieldType::Bool), Some(FieldValue::Bool(true)));
        assert_eq!(coerce(&json!("off"), FieldType::Bool), Some(FieldValue::Bool(false)));
        assert_eq!(coerce(&json!(2), FieldType::Bool), None);
        assert_eq!(coerce(&json!("maybe"), FieldType::Bool), None);
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = parse_timestamp("2024-05-01T20:00:00Z").unwrap();
        for input in [
            "2024-05-01T20:00:00",
            "2024-05-01 20:00:00",
            "2024-05-01T20:00",
            "2024-05-01T20:00:00.000",
            "2024-05-01T20:00:00+00:00",
        ] {
            assert_eq!(parse_timestamp(input), Some(expected), "input {input}");
        }

        let midnight = parse_timestamp("2024-05-01").unwrap();
        assert_eq!(midnight, parse_timestamp("2024-05-01T00:00:00Z").unwrap());

        let offset = parse_timestamp("2024-05-01T20:00:00-05:00").unwrap();
        assert_eq!(offset.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_timestamp_from_unix_seconds() {
        let value = coerce(&json!(0), FieldType::Timestamp).unwrap();
        assert_eq!(value, FieldValue::Timestamp(parse_timestamp("1970-01-01T00:00:00Z").unwrap()));
    }

    #[test]
    fn test_large_unix_numbers_are_milliseconds() {
        let expected = parse_timestamp("2024-05-06T12:53:20Z").unwrap();
        assert_eq!(
            coerce(&json!(1_715_000_000_000i64), FieldType::Timestamp),
            Some(FieldValue::Timestamp(expected))
        );
        assert_eq!(
            coerce(&json!(1_715_000_000), FieldType::Timestamp),
            Some(FieldValue::Timestamp(expected))
        );
        assert_eq!(
            coerce(&json!(1.715e12), FieldType::Timestamp),
            Some(FieldValue::Timestamp(expected))
        );
    }

    #[test]
    fn test_timestamp_outside_four_digit_years_rejected() {
        // 1e15 ms is year 33658; -1e15 ms is before year 0
        assert_eq!(coerce(&json!(1_000_000_000_000_000i64), FieldType::Timestamp), None);
        assert_eq!(coerce(&json!(-1_000_000_000_000_000i64), FieldType::Timestamp), None);
        assert_eq!(coerce(&json!(1.0e18), FieldType::Timestamp), None);
        assert_eq!(coerce(&json!("+12024-05-01T00:00:00Z"), FieldType::Timestamp), None);

        let last = coerce(&json!("9999-12-31T23:59:59Z"), FieldType::Timestamp);
        assert!(last.is_some());
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        assert_eq!(coerce(&json!("next tuesday"), FieldType::Timestamp), None);
        assert_eq!(coerce(&json!("2024-13-01"), FieldType::Timestamp), None);
        assert_eq!(coerce(&json!(true), FieldType::Timestamp), None);
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(1)), "int");
        assert_eq!(json_type_name(&json!(1.5)), "decimal");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
