//! Cell value coercion.
//!
//! Every CSV cell arrives as text. [`coerce_value`] infers its JSON type:
//!
//! | Cell                         | Result            |
//! |------------------------------|-------------------|
//! | `""`                         | `null`            |
//! | `true` / `FALSE` (any case)  | boolean           |
//! | strict decimal numeral       | number            |
//! | anything else                | the string itself |
//!
//! The numeral check is a full-string match, so `12abc`, `1.2.3`, ` 12`,
//! `0x1A` and `Infinity` stay strings. Zero-padded integers such as `007`
//! are identifiers, not numbers, and stay strings as well.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::models::RawRecord;

static DECIMAL_NUMERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:(?:0|[1-9][0-9]*)(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("decimal numeral pattern is valid")
});

/// Coerce a single raw cell into a typed JSON value.
pub fn coerce_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    parse_number(raw)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Coerce every cell of a record, keeping column order.
pub fn coerce_record(record: &RawRecord) -> Map<String, Value> {
    record
        .iter()
        .map(|(key, raw)| (key.clone(), coerce_value(raw)))
        .collect()
}

fn parse_number(raw: &str) -> Option<Number> {
    if !DECIMAL_NUMERAL.is_match(raw) {
        return None;
    }

    // Exact path for plain integers
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Number::from(i));
    }

    let f: f64 = raw.parse().ok()?;
    if !f.is_finite() {
        return None;
    }
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Some(Number::from(f as i64));
    }
    Number::from_f64(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_is_null() {
        assert_eq!(coerce_value(""), Value::Null);
    }

    #[test]
    fn test_booleans_any_case() {
        for raw in ["true", "TRUE", "True", "tRuE"] {
            assert_eq!(coerce_value(raw), Value::Bool(true), "{raw}");
        }
        for raw in ["false", "FALSE", "False"] {
            assert_eq!(coerce_value(raw), Value::Bool(false), "{raw}");
        }
        assert_eq!(coerce_value("yes"), json!("yes"));
    }

    #[test]
    fn test_numerals() {
        assert_eq!(coerce_value("3.25"), json!(3.25));
        assert_eq!(coerce_value("-2"), json!(-2));
        assert_eq!(coerce_value("0"), json!(0));
        assert_eq!(coerce_value("+5"), json!(5));
        assert_eq!(coerce_value(".5"), json!(0.5));
        assert_eq!(coerce_value("5."), json!(5));
        assert_eq!(coerce_value("1e3"), json!(1000));
        assert_eq!(coerce_value("2.5E-1"), json!(0.25));
    }

    #[test]
    fn test_integral_floats_serialize_as_integers() {
        assert_eq!(coerce_value("10.0").to_string(), "10");
        assert_eq!(coerce_value("10.5").to_string(), "10.5");
    }

    #[test]
    fn test_partial_numerics_stay_strings() {
        for raw in ["12abc", "1.2.3", " 12", "12 ", "0x1A", "Infinity", "NaN", "-", ".", "e5", "1e"] {
            assert_eq!(coerce_value(raw), json!(raw), "{raw}");
        }
    }

    #[test]
    fn test_zero_padded_ids_stay_strings() {
        assert_eq!(coerce_value("007"), json!("007"));
        assert_eq!(coerce_value("-01"), json!("-01"));
        assert_eq!(coerce_value("0.5"), json!(0.5));
    }

    #[test]
    fn test_overflowing_numeral_stays_string() {
        assert_eq!(coerce_value("1e400"), json!("1e400"));
    }

    #[test]
    fn test_large_integer_is_exact() {
        assert_eq!(coerce_value("9007199254740993").to_string(), "9007199254740993");
    }

    #[test]
    fn test_coerce_record_keeps_order() {
        let record: RawRecord = vec![
            ("name".into(), "Goblin".into()),
            ("stats.hp".into(), "10".into()),
            ("boss".into(), "false".into()),
            ("notes".into(), "".into()),
        ];
        let coerced = coerce_record(&record);
        assert_eq!(
            Value::Object(coerced),
            json!({"name": "Goblin", "stats.hp": 10, "boss": false, "notes": null})
        );
    }
}
