//! # Scalar Coercion
//!
//! Conversion rules used by the type engine when casting input values and
//! when comparing them against bounds. They follow the loose conversions of
//! dynamically typed JSON producers:
//!
//! - [`to_number`]: `null` is `0`, booleans are `0`/`1`, strings are parsed
//!   after trimming (empty string is `0`, `Infinity` and `0x`/`0o`/`0b`
//!   prefixes are understood), arrays convert through their string form,
//!   objects are `NaN`.
//! - [`parse_float`]: parses the longest numeric prefix of the value's string
//!   form, `NaN` when there is none.
//! - [`to_display_string`]: `null`, booleans and numbers render as literals,
//!   arrays join their elements with `,`, objects render as
//!   `[object Object]`.
//!
//! `NaN` and infinities never appear inside a `serde_json::Value`; helpers
//! that produce values return `None` for them instead.

use serde_json::{Number, Value};

/// Convert a value to a number. Returns `NaN` when no conversion exists.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(_) => string_to_number(&to_display_string(value)),
        Value::Object(_) => f64::NAN,
    }
}

fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefixes, radix) in [(["0x", "0X"], 16), (["0o", "0O"], 8), (["0b", "0B"], 2)] {
        if let Some(digits) = prefixes.iter().find_map(|p| t.strip_prefix(p)) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }
    // `str::parse::<f64>` also accepts "inf" and "nan"; rule those out first.
    if !t
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse the longest numeric prefix of the value's string form.
pub fn parse_float(value: &Value) -> f64 {
    if let Value::Number(n) = value {
        return n.as_f64().unwrap_or(f64::NAN);
    }
    let rendered = to_display_string(value);
    let t = rendered.trim_start();
    let bytes = t.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if t[end..].starts_with("Infinity") {
        return if t.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    t[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// True when the value converts to a finite number and has a numeric prefix.
///
/// This is the presence rule of the number type: `""`, `null` and booleans
/// convert to a number but carry no numeric text, so they are rejected.
pub fn is_numeric(value: &Value) -> bool {
    if value.is_null() {
        return false;
    }
    !parse_float(value).is_nan() && to_number(value).is_finite()
}

/// Render a value the way a loosely typed producer would print it.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        format_number(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Format a float without a trailing `.0` for integral values.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// Build a JSON number from a finite float, preferring an integer
/// representation when the value is integral.
pub fn number_value(n: f64) -> Option<Value> {
    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Some(Value::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number)
}

/// Length of a string in UTF-16 code units.
pub fn string_length(s: &str) -> usize {
    s.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_number_follows_loose_rules() {
        assert_eq!(to_number(&json!(null)), 0.0);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!("")), 0.0);
        assert_eq!(to_number(&json!("  12 ")), 12.0);
        assert_eq!(to_number(&json!("1e3")), 1000.0);
        assert_eq!(to_number(&json!(".5")), 0.5);
        assert_eq!(to_number(&json!("0x10")), 16.0);
        assert_eq!(to_number(&json!([])), 0.0);
        assert_eq!(to_number(&json!(["7"])), 7.0);
        assert_eq!(to_number(&json!("-Infinity")), f64::NEG_INFINITY);
        assert!(to_number(&json!("A string")).is_nan());
        assert!(to_number(&json!("inf")).is_nan());
        assert!(to_number(&json!("12abc")).is_nan());
        assert!(to_number(&json!([1, 2])).is_nan());
        assert!(to_number(&json!({})).is_nan());
    }

    #[test]
    fn parse_float_reads_prefix() {
        assert_eq!(parse_float(&json!("12abc")), 12.0);
        assert_eq!(parse_float(&json!("  -3.5e2xyz")), -350.0);
        assert_eq!(parse_float(&json!("4e")), 4.0);
        assert_eq!(parse_float(&json!("Infinity")), f64::INFINITY);
        assert!(parse_float(&json!("")).is_nan());
        assert!(parse_float(&json!(".")).is_nan());
        assert!(parse_float(&json!(null)).is_nan());
        assert!(parse_float(&json!(true)).is_nan());
    }

    #[test]
    fn numeric_presence() {
        assert!(is_numeric(&json!(0)));
        assert!(is_numeric(&json!(-2.5)));
        assert!(is_numeric(&json!("42")));
        assert!(!is_numeric(&json!("")));
        assert!(!is_numeric(&json!(null)));
        assert!(!is_numeric(&json!("12abc")));
        assert!(!is_numeric(&json!("Infinity")));
        assert!(!is_numeric(&json!({})));
    }

    #[test]
    fn display_strings() {
        assert_eq!(to_display_string(&json!(1)), "1");
        assert_eq!(to_display_string(&json!(2.1)), "2.1");
        assert_eq!(to_display_string(&json!(1000.0)), "1000");
        assert_eq!(to_display_string(&json!([1, null, "a"])), "1,,a");
        assert_eq!(to_display_string(&json!([])), "");
        assert_eq!(to_display_string(&json!({"a": 1})), "[object Object]");
        assert_eq!(to_display_string(&json!(null)), "null");
    }

    #[test]
    fn number_values_prefer_integers() {
        assert_eq!(number_value(3.0), Some(json!(3)));
        assert_eq!(number_value(2.5), Some(json!(2.5)));
        assert_eq!(number_value(f64::NAN), None);
        assert_eq!(number_value(f64::INFINITY), None);
    }

    #[test]
    fn utf16_length() {
        assert_eq!(string_length("abc"), 3);
        assert_eq!(string_length("\u{1F600}"), 2);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Integers survive a trip through their display string.
        #[test]
        fn integer_strings_convert_back(n in -1_000_000_000i64..1_000_000_000i64) {
            let rendered = to_display_string(&Value::from(n));
            prop_assert_eq!(to_number(&Value::String(rendered)), n as f64);
        }

        /// Anything that counts as numeric converts to a finite number.
        #[test]
        fn numeric_values_are_finite(s in "[ 0-9.eE+-]{0,12}") {
            let value = Value::String(s);
            if is_numeric(&value) {
                prop_assert!(to_number(&value).is_finite());
            }
        }
    }
}
