//! Never-failing conversions between [`Value`] shapes.
//!
//! Each function takes a default that is returned when the input cannot be
//! interpreted as the target type. None of them panic.

use crate::value::Value;

/// String rendering of a scalar.
///
/// Integral floats render without a fraction, other floats with six
/// fractional digits. Containers and null yield `default`.
pub fn string_value(value: &Value, default: &str) -> String {
    match value {
        Value::Str(s) => s.clone(),
        Value::Number(n) => n.as_str().to_string(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Bool(b) => b.to_string(),
        Value::Record(r) => r.as_text().unwrap_or_else(|| default.to_string()),
        Value::Null | Value::Seq(_) | Value::Map(_) => default.to_string(),
    }
}

fn format_float(f: f64) -> String {
    if f == 0.0 {
        "0".to_string()
    } else if f.is_finite() && f.fract() == 0.0 {
        format!("{f:.0}")
    } else {
        format!("{f:.6}")
    }
}

/// Signed integer reading of a scalar.
///
/// Floats truncate toward zero, booleans map to 1/0. Strings are parsed with
/// radix detection: `0x` prefix is hexadecimal, any other leading `0` is octal.
pub fn int_value(value: &Value, default: i64) -> i64 {
    match value {
        Value::Int(i) => *i,
        Value::UInt(u) => *u as i64,
        Value::Float(f) => *f as i64,
        Value::Bool(b) => *b as i64,
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        Value::Str(s) => {
            let (digits, radix) = split_radix(s);
            i64::from_str_radix(digits, radix).unwrap_or(default)
        }
        _ => default,
    }
}

/// Unsigned counterpart of [`int_value`]. Negative integers wrap, negative
/// floats saturate to zero.
pub fn uint_value(value: &Value, default: u64) -> u64 {
    match value {
        Value::Int(i) => *i as u64,
        Value::UInt(u) => *u,
        Value::Float(f) => *f as u64,
        Value::Bool(b) => *b as u64,
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f as u64))
            .unwrap_or(default),
        Value::Str(s) => {
            let (digits, radix) = split_radix(s);
            u64::from_str_radix(digits, radix).unwrap_or(default)
        }
        _ => default,
    }
}

pub fn float_value(value: &Value, default: f64) -> f64 {
    match value {
        Value::Int(i) => *i as f64,
        Value::UInt(u) => *u as f64,
        Value::Float(f) => *f,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(default),
        Value::Str(s) => s.parse().unwrap_or(default),
        _ => default,
    }
}

/// Truthiness of a scalar: nonzero numbers, and the strings `yes`, `true`
/// and `1`. Any other string is false; null and containers yield `default`.
pub fn bool_value(value: &Value, default: bool) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::UInt(u) => *u != 0,
        Value::Float(f) => *f != 0.0,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Str(s) => matches!(s.as_str(), "yes" | "true" | "1"),
        Value::Record(r) => r.as_text().map_or(default, |s| bool_value(&Value::Str(s), default)),
        Value::Null | Value::Seq(_) | Value::Map(_) => default,
    }
}

fn split_radix(s: &str) -> (&str, u32) {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    fn num(s: &str) -> Value {
        Value::Number(Number::parse(s).unwrap())
    }

    #[test]
    fn strings_from_scalars() {
        assert_eq!(string_value(&Value::from(3.0), ""), "3");
        assert_eq!(string_value(&Value::from(3.5), ""), "3.500000");
        assert_eq!(string_value(&Value::from(1e20), ""), "100000000000000000000");
        assert_eq!(string_value(&Value::from(9.223372036854776e18), ""), "9223372036854775808");
        assert_eq!(string_value(&Value::from(-0.0), ""), "0");
        assert_eq!(string_value(&Value::from(-42), ""), "-42");
        assert_eq!(string_value(&Value::from(u64::MAX), ""), "18446744073709551615");
        assert_eq!(string_value(&Value::from(true), ""), "true");
        assert_eq!(string_value(&num("1e3"), ""), "1e3");
        assert_eq!(string_value(&Value::Null, "dflt"), "dflt");
        assert_eq!(string_value(&Value::Seq(vec![]), "dflt"), "dflt");
    }

    #[test]
    fn int_radix_detection() {
        assert_eq!(int_value(&Value::from("0x1A"), -1), 26);
        assert_eq!(int_value(&Value::from("010"), -1), 8);
        assert_eq!(int_value(&Value::from("0"), -1), 0);
        assert_eq!(int_value(&Value::from("42"), -1), 42);
        assert_eq!(int_value(&Value::from("-7"), -1), -7);
        assert_eq!(int_value(&Value::from("abc"), -1), -1);
        assert_eq!(int_value(&Value::from("09"), -1), -1);
        assert_eq!(int_value(&Value::from(""), -1), -1);
        assert_eq!(int_value(&Value::from("0x"), -1), -1);
    }

    #[test]
    fn int_from_numbers() {
        assert_eq!(int_value(&Value::from(2.9), 0), 2);
        assert_eq!(int_value(&Value::from(-2.9), 0), -2);
        assert_eq!(int_value(&Value::from(true), 0), 1);
        assert_eq!(int_value(&num("12"), 0), 12);
        assert_eq!(int_value(&num("12.75"), 0), 12);
        assert_eq!(int_value(&Value::Null, 9), 9);
        assert_eq!(int_value(&Value::map(), 9), 9);
    }

    #[test]
    fn uint_conversions() {
        assert_eq!(uint_value(&Value::from("0xff"), 0), 255);
        assert_eq!(uint_value(&num("18446744073709551615"), 0), u64::MAX);
        assert_eq!(uint_value(&Value::from(-1.5), 7), 0);
        assert_eq!(uint_value(&Value::from("x"), 7), 7);
    }

    #[test]
    fn float_conversions() {
        assert_eq!(float_value(&Value::from("2.5"), 0.0), 2.5);
        assert_eq!(float_value(&Value::from(3), 0.0), 3.0);
        assert_eq!(float_value(&Value::from(false), 1.0), 0.0);
        assert_eq!(float_value(&Value::from("nope"), 1.5), 1.5);
    }

    #[test]
    fn truthiness() {
        for truthy in ["yes", "true", "1"] {
            assert!(bool_value(&Value::from(truthy), false), "{truthy}");
        }
        for falsy in ["no", "false", "0", "", "TRUE"] {
            assert!(!bool_value(&Value::from(falsy), true), "{falsy}");
        }
        assert!(bool_value(&Value::from(-3), false));
        assert!(!bool_value(&Value::from(0.0), true));
        assert!(bool_value(&num("0.5"), false));
        assert!(bool_value(&Value::Null, true));
        assert!(!bool_value(&Value::Seq(vec![]), false));
    }
}
