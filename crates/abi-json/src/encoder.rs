//! `JsonEncoder`: [`Dynamic`] nodes to JSON text.
//!
//! Integers outside the 32-bit range are written as JSON strings so that
//! consumers decoding numbers as doubles do not lose precision: `Int` values
//! outside `i32` and `UInt` values above `u32::MAX`. Decoded [`Number`]
//! literals are written verbatim.

use std::ops::ControlFlow;

use abi_dynamic::{string_value, Dynamic, Kind, Naming, Number, Value};

use crate::error::EncodeError;
use crate::escape::write_escaped;

/// Line prefix and per-level indentation unit for pretty output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indent {
    pub prefix: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Emit mapping keys in ascending byte order. Record fields keep their
    /// declared order either way.
    pub sort_keys: bool,
    pub indent: Option<Indent>,
    /// Escape `<`, `>` and `&` inside strings.
    pub escape_html: bool,
    pub max_depth: usize,
    /// Tag keys consulted for record field names.
    pub naming: Naming<'static>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            sort_keys: false,
            indent: None,
            escape_html: true,
            max_depth: 1000,
            naming: Naming::DEFAULT,
        }
    }
}

impl EncodeOptions {
    pub fn sorted() -> Self {
        Self {
            sort_keys: true,
            ..Self::default()
        }
    }

    pub fn with_indent(mut self, prefix: &str, unit: &str) -> Self {
        self.indent = Some(Indent {
            prefix: prefix.to_string(),
            unit: unit.to_string(),
        });
        self
    }
}

pub struct JsonEncoder {
    options: EncodeOptions,
    out: Vec<u8>,
    depth: usize,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::with_options(EncodeOptions::default())
    }

    pub fn with_options(options: EncodeOptions) -> Self {
        Self {
            options,
            out: Vec::new(),
            depth: 0,
        }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn encode(&mut self, value: &dyn Dynamic) -> Result<Vec<u8>, EncodeError> {
        self.out.clear();
        self.depth = 0;
        self.write_any(value)?;
        Ok(std::mem::take(&mut self.out))
    }

    pub fn write_any(&mut self, node: &dyn Dynamic) -> Result<(), EncodeError> {
        if let Some(value) = node.as_value() {
            return self.write_value(value);
        }
        match node.kind() {
            Kind::Seq => self.write_seq(node),
            Kind::Map => self.write_map(node),
            Kind::Record => self.write_record(node),
            Kind::Unsupported => Err(EncodeError::UnsupportedType(node.type_name())),
            _ => self.write_value(&node.to_value()),
        }
    }

    fn write_value(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Int(i) => self.write_integer(*i),
            Value::UInt(u) => self.write_u_integer(*u),
            Value::Float(f) => return self.write_float(*f),
            Value::Number(n) => self.write_number(n),
            Value::Str(s) => self.write_str(s),
            Value::Seq(_) => return self.write_seq(value),
            Value::Map(_) => return self.write_map(value),
            Value::Record(r) => return self.write_any(&**r),
        }
        Ok(())
    }

    pub fn write_null(&mut self) {
        self.out.extend_from_slice(b"null");
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.out
            .extend_from_slice(if b { b"true" as &[u8] } else { b"false" });
    }

    pub fn write_integer(&mut self, i: i64) {
        if i32::try_from(i).is_ok() {
            self.out.extend_from_slice(i.to_string().as_bytes());
        } else {
            self.write_quoted_digits(&i.to_string());
        }
    }

    pub fn write_u_integer(&mut self, u: u64) {
        if u32::try_from(u).is_ok() {
            self.out.extend_from_slice(u.to_string().as_bytes());
        } else {
            self.write_quoted_digits(&u.to_string());
        }
    }

    fn write_quoted_digits(&mut self, digits: &str) {
        self.out.push(b'"');
        self.out.extend_from_slice(digits.as_bytes());
        self.out.push(b'"');
    }

    pub fn write_float(&mut self, f: f64) -> Result<(), EncodeError> {
        let text = format_float(f)?;
        self.out.extend_from_slice(text.as_bytes());
        Ok(())
    }

    pub fn write_number(&mut self, n: &Number) {
        self.out.extend_from_slice(n.as_str().as_bytes());
    }

    pub fn write_str(&mut self, s: &str) {
        write_escaped(&mut self.out, s, self.options.escape_html);
    }

    fn write_seq(&mut self, node: &dyn Dynamic) -> Result<(), EncodeError> {
        self.enter()?;
        self.out.push(b'[');
        let mut count = 0;
        let mut result: Result<(), EncodeError> = Ok(());
        let _ = node.each(&mut |_, item| {
            self.begin_item(count);
            count += 1;
            match self.write_any(item) {
                Ok(()) => ControlFlow::Continue(()),
                Err(e) => {
                    result = Err(e);
                    ControlFlow::Break(())
                }
            }
        });
        result?;
        self.end_container(b']', count);
        Ok(())
    }

    fn write_map(&mut self, node: &dyn Dynamic) -> Result<(), EncodeError> {
        let mut entries = Vec::new();
        let _ = node.each(&mut |key, item| {
            entries.push((string_value(&key, ""), item));
            ControlFlow::Continue(())
        });
        if self.options.sort_keys {
            entries.sort_by(|a, b| a.0.cmp(&b.0));
        }
        self.write_entries(&entries)
    }

    fn write_record(&mut self, node: &dyn Dynamic) -> Result<(), EncodeError> {
        let mut entries = Vec::new();
        let naming = self.options.naming;
        let _ = node.each_field(&naming, &mut |info, field| {
            if !(info.omitempty && field.is_nil()) {
                entries.push((info.name.to_string(), field));
            }
            ControlFlow::Continue(())
        });
        self.write_entries(&entries)
    }

    fn write_entries(&mut self, entries: &[(String, &dyn Dynamic)]) -> Result<(), EncodeError> {
        self.enter()?;
        self.out.push(b'{');
        for (i, (key, value)) in entries.iter().enumerate() {
            self.begin_item(i);
            self.write_str(key);
            self.out.push(b':');
            if self.options.indent.is_some() {
                self.out.push(b' ');
            }
            self.write_any(*value)?;
        }
        self.end_container(b'}', entries.len());
        Ok(())
    }

    fn enter(&mut self) -> Result<(), EncodeError> {
        if self.depth >= self.options.max_depth {
            return Err(EncodeError::DepthLimit(self.options.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn begin_item(&mut self, index: usize) {
        if index > 0 {
            self.out.push(b',');
        }
        self.newline();
    }

    fn end_container(&mut self, close: u8, count: usize) {
        self.depth -= 1;
        if count > 0 {
            self.newline();
        }
        self.out.push(close);
    }

    fn newline(&mut self) {
        if let Some(indent) = &self.options.indent {
            self.out.push(b'\n');
            self.out.extend_from_slice(indent.prefix.as_bytes());
            for _ in 0..self.depth {
                self.out.extend_from_slice(indent.unit.as_bytes());
            }
        }
    }
}

/// Shortest round-trip rendering; exponent form below 1e-6 and from 1e21 up.
fn format_float(f: f64) -> Result<String, EncodeError> {
    if !f.is_finite() {
        return Err(EncodeError::UnsupportedFloat(f));
    }
    let abs = f.abs();
    if abs != 0.0 && !(1e-6..1e21).contains(&abs) {
        let text = format!("{f:e}");
        return Ok(match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        });
    }
    Ok(format!("{f}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Value) -> String {
        String::from_utf8(JsonEncoder::new().encode(value).unwrap()).unwrap()
    }

    #[test]
    fn scalars() {
        assert_eq!(encode(&Value::Null), "null");
        assert_eq!(encode(&Value::from(true)), "true");
        assert_eq!(encode(&Value::from(-5)), "-5");
        assert_eq!(encode(&Value::from(1.5)), "1.5");
        assert_eq!(encode(&Value::from(3.0)), "3");
        assert_eq!(encode(&Value::from("x")), "\"x\"");
    }

    #[test]
    fn integers_outside_32_bits_are_strings() {
        assert_eq!(encode(&Value::Int(i32::MAX as i64)), "2147483647");
        assert_eq!(encode(&Value::Int(i32::MIN as i64)), "-2147483648");
        assert_eq!(encode(&Value::Int(i32::MAX as i64 + 1)), "\"2147483648\"");
        assert_eq!(encode(&Value::Int(i32::MIN as i64 - 1)), "\"-2147483649\"");
        assert_eq!(encode(&Value::UInt(u32::MAX as u64)), "4294967295");
        assert_eq!(encode(&Value::UInt(u32::MAX as u64 + 1)), "\"4294967296\"");
        let literal = Number::parse("9007199254740993").unwrap();
        assert_eq!(encode(&Value::Number(literal)), "9007199254740993");
    }

    #[test]
    fn float_formatting() {
        assert_eq!(format_float(1e21).unwrap(), "1e+21");
        assert_eq!(format_float(1e20).unwrap(), "100000000000000000000");
        assert_eq!(format_float(1e-7).unwrap(), "1e-7");
        assert_eq!(format_float(0.000001).unwrap(), "0.000001");
        assert_eq!(format_float(-2.5e-9).unwrap(), "-2.5e-9");
        assert_eq!(format_float(0.0).unwrap(), "0");
        assert!(matches!(
            format_float(f64::NAN),
            Err(EncodeError::UnsupportedFloat(_))
        ));
    }

    #[test]
    fn non_finite_floats_fail() {
        assert!(matches!(
            JsonEncoder::new().encode(&Value::from(f64::INFINITY)),
            Err(EncodeError::UnsupportedFloat(_))
        ));
        let nested: Value = [("x", Value::Seq(vec![Value::from(f64::NAN)]))]
            .into_iter()
            .collect();
        assert!(JsonEncoder::new().encode(&nested).is_err());
    }

    #[test]
    fn natural_and_sorted_order() {
        let v: Value = [("b", 1), ("a", 2)].into_iter().collect();
        assert_eq!(encode(&v), r#"{"b":1,"a":2}"#);
        let sorted = JsonEncoder::with_options(EncodeOptions::sorted())
            .encode(&v)
            .unwrap();
        assert_eq!(sorted, br#"{"a":2,"b":1}"#);
    }

    #[test]
    fn indentation() {
        let v: Value = [
            ("a", Value::Seq(vec![Value::from(1), Value::from(2)])),
            ("b", Value::map()),
            ("c", Value::Seq(vec![])),
        ]
        .into_iter()
        .collect();
        let out = JsonEncoder::with_options(EncodeOptions::default().with_indent(">", "  "))
            .encode(&v)
            .unwrap();
        let expected = "{\n>  \"a\": [\n>    1,\n>    2\n>  ],\n>  \"b\": {},\n>  \"c\": []\n>}";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn depth_limit() {
        let mut v = Value::Null;
        for _ in 0..5 {
            v = Value::Seq(vec![v]);
        }
        let options = EncodeOptions {
            max_depth: 4,
            ..EncodeOptions::default()
        };
        assert_eq!(
            JsonEncoder::with_options(options).encode(&v),
            Err(EncodeError::DepthLimit(4))
        );
        assert_eq!(encode(&v), "[[[[[null]]]]]");
    }
}
