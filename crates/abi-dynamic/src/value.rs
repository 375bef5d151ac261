//! The universal runtime type, [`Value`], and its building blocks.
//!
//! A `Value` is either a scalar, a container (`Seq` / `Map`), a decoded JSON
//! number literal that has not been finalized yet, or a boxed record. Every
//! variant is addressable through the [`Dynamic`] trait, which is what the
//! accessor functions and the JSON codec dispatch on.

use std::any::Any;
use std::fmt;
use std::ops::{ControlFlow, Deref, DerefMut};

use indexmap::IndexMap;
use tracing::debug;

use crate::coerce;
use crate::dynamic::{Dynamic, FieldVisitor, Ref, Visitor};
use crate::record::Naming;
use crate::selector::{self, Selector};

/// Key-unique mapping. Keys are stored in their string rendering.
pub type Mapping = IndexMap<String, Value>;

/// Shape of a node, as reported by [`Dynamic::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    UInt,
    Float,
    /// A JSON number literal not yet finalized to a machine type.
    Number,
    String,
    Seq,
    Map,
    Record,
    /// A custom shape with no JSON representation.
    Unsupported,
}

/// A JSON number literal, kept verbatim until it is coerced.
///
/// The decoder produces these instead of `Int`/`UInt`/`Float` so no precision
/// is lost before the number reaches its destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// Validates `literal` against the JSON number grammar.
    ///
    /// ```
    /// use abi_dynamic::Number;
    ///
    /// assert!(Number::parse("-12.5e3").is_some());
    /// assert!(Number::parse("012").is_none());
    /// assert!(Number::parse("1.").is_none());
    /// ```
    pub fn parse(literal: &str) -> Option<Number> {
        is_json_number(literal.as_bytes()).then(|| Number(literal.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the literal has no fraction and no exponent.
    pub fn is_integer(&self) -> bool {
        !self.0.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'))
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_json_number(b: &[u8]) -> bool {
    let mut i = 0;
    if b.first() == Some(&b'-') {
        i += 1;
    }
    match b.get(i) {
        Some(b'0') => i += 1,
        Some(c) if c.is_ascii_digit() => {
            while b.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        _ => return false,
    }
    if b.get(i) == Some(&b'.') {
        i += 1;
        let start = i;
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let start = i;
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    i == b.len()
}

/// A record (or any custom shape) placed inside a dynamic container.
///
/// Two boxed records compare equal when their plain snapshots do.
pub struct RecordValue(Box<dyn Dynamic>);

impl RecordValue {
    pub fn new<T: Dynamic>(record: T) -> Self {
        Self(Box::new(record))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref()
    }
}

impl Clone for RecordValue {
    fn clone(&self) -> Self {
        Self((*self.0).clone_dyn())
    }
}

impl fmt::Debug for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl PartialEq for RecordValue {
    fn eq(&self, other: &Self) -> bool {
        (*self.0).to_value() == (*other.0).to_value()
    }
}

impl Deref for RecordValue {
    type Target = dyn Dynamic;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl DerefMut for RecordValue {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.0
    }
}

/// Any datum the model can hold.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Number(Number),
    Str(String),
    Seq(Vec<Value>),
    Map(Mapping),
    Record(RecordValue),
}

impl Value {
    /// Boxes a record so it can live inside a `Seq` or `Map`.
    pub fn record<T: Dynamic>(record: T) -> Value {
        Value::Record(RecordValue::new(record))
    }

    /// An empty mapping.
    pub fn map() -> Value {
        Value::Map(Mapping::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Inserts into a `Map` under the string rendering of `key`.
    ///
    /// A null `value` deletes the key. A null receiver becomes a map first.
    pub fn insert(&mut self, key: &Value, value: Value) {
        Dynamic::set(self, &coerce::string_value(key, ""), value);
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_int {
    ($variant:ident, $wide:ty, $($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::$variant(n as $wide)
            }
        }
    )*};
}

from_int!(Int, i64, i8, i16, i32, i64, isize);
from_int!(UInt, u64, u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Seq(iter.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Dynamic for Value {
    fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::UInt(_) => Kind::UInt,
            Value::Float(_) => Kind::Float,
            Value::Number(_) => Kind::Number,
            Value::Str(_) => Kind::String,
            Value::Seq(_) => Kind::Seq,
            Value::Map(_) => Kind::Map,
            Value::Record(r) => r.kind(),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Value::Seq(items) => Value::Seq(items.iter().map(Dynamic::to_value).collect()),
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
            Value::Record(r) => r.to_value(),
            other => other.clone(),
        }
    }

    fn as_value(&self) -> Option<&Value> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_dyn(&self) -> Box<dyn Dynamic> {
        Box::new(self.clone())
    }

    fn as_text(&self) -> Option<String> {
        match self {
            Value::Record(r) => r.as_text(),
            _ => None,
        }
    }

    fn is_nil(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::UInt(u) => *u == 0,
            Value::Float(f) => *f == 0.0,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::Str(s) => s.is_empty(),
            Value::Seq(_) | Value::Map(_) => false,
            Value::Record(r) => r.is_nil(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Value::Seq(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            Value::Record(r) => r.is_empty(),
            other => other.is_nil(),
        }
    }

    fn get(&self, key: &str) -> Option<Ref<'_>> {
        match self {
            Value::Map(map) => map.get(key).map(|v| Ref::Borrowed(v)),
            Value::Seq(items) => match selector::resolve(key, items.len())? {
                Selector::Length => Some(Ref::Owned(Value::Int(items.len() as i64))),
                Selector::Index(i) => Some(Ref::Borrowed(&items[i])),
            },
            Value::Record(r) => r.get(key),
            _ => None,
        }
    }

    fn get_mut(&mut self, key: &str, autocreate: bool) -> Option<&mut dyn Dynamic> {
        match self {
            Value::Null if autocreate => {
                *self = Value::map();
                self.get_mut(key, autocreate)
            }
            Value::Map(map) => {
                if !autocreate {
                    return map.get_mut(key).map(|v| v as &mut dyn Dynamic);
                }
                let slot = map.entry(key.to_string()).or_insert(Value::Null);
                if slot.is_null() {
                    *slot = Value::map();
                }
                Some(slot as &mut dyn Dynamic)
            }
            Value::Seq(items) => match selector::resolve(key, items.len())? {
                Selector::Index(i) => Some(&mut items[i] as &mut dyn Dynamic),
                Selector::Length => None,
            },
            Value::Record(r) => r.get_mut(key, autocreate),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: Value) {
        match self {
            Value::Null => {
                if !value.is_null() {
                    let mut map = Mapping::new();
                    map.insert(key.to_string(), value);
                    *self = Value::Map(map);
                }
            }
            Value::Map(map) => {
                if value.is_null() {
                    map.shift_remove(key);
                } else {
                    map.insert(key.to_string(), value);
                }
            }
            Value::Seq(items) => match selector::resolve(key, items.len()) {
                Some(Selector::Index(i)) => items[i] = value,
                _ => debug!(key, len = items.len(), "sequence write out of range ignored"),
            },
            Value::Record(r) => r.set(key, value),
            other => debug!(kind = ?other.kind(), key, "write into scalar ignored"),
        }
    }

    fn each<'a>(&'a self, visit: &mut Visitor<'a, '_>) -> ControlFlow<()> {
        match self {
            Value::Map(map) => {
                for (k, v) in map {
                    visit(Value::Str(k.clone()), v)?;
                }
                ControlFlow::Continue(())
            }
            Value::Seq(items) => {
                for (i, v) in items.iter().enumerate() {
                    visit(Value::Int(i as i64), v)?;
                }
                ControlFlow::Continue(())
            }
            Value::Record(r) => r.each(visit),
            _ => ControlFlow::Continue(()),
        }
    }

    fn each_field<'a>(
        &'a self,
        naming: &Naming<'_>,
        visit: &mut FieldVisitor<'a, '_>,
    ) -> ControlFlow<()> {
        match self {
            Value::Record(r) => r.each_field(naming, visit),
            _ => ControlFlow::Continue(()),
        }
    }

    fn assign(&mut self, value: &Value) {
        match (self, value) {
            (_, Value::Null) => {}
            (Value::Record(r), value) => r.assign(value),
            (slot, value) => *slot = value.clone(),
        }
    }

    fn add(&mut self, value: Value) {
        match self {
            Value::Seq(items) => items.push(value),
            Value::Null => *self = Value::Seq(vec![value]),
            Value::Record(r) => r.add(value),
            other => debug!(kind = ?other.kind(), "append to non-sequence ignored"),
        }
    }

    fn materialize(&mut self) {
        if self.is_null() {
            *self = Value::map();
        }
    }

    fn clear(&mut self) {
        *self = Value::Null;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(items: &[i64]) -> Value {
        items.iter().copied().map(Value::from).collect()
    }

    #[test]
    fn number_grammar() {
        for ok in ["0", "-0", "12", "1.5", "-1.25e10", "1E+2", "3e-7"] {
            assert!(Number::parse(ok).is_some(), "{ok}");
        }
        for bad in ["", "-", "01", "1.", ".5", "1e", "+1", "0x1", "1 "] {
            assert!(Number::parse(bad).is_none(), "{bad}");
        }
    }

    #[test]
    fn number_finalization() {
        let n = Number::parse("3000000000").unwrap();
        assert!(n.is_integer());
        assert_eq!(n.as_i64(), Some(3_000_000_000));
        assert_eq!(n.as_u64(), Some(3_000_000_000));

        let big = Number::parse("18446744073709551616").unwrap();
        assert_eq!(big.as_u64(), None);
        assert_eq!(big.to_string(), "18446744073709551616");

        let f = Number::parse("2.5").unwrap();
        assert!(!f.is_integer());
        assert_eq!(f.as_i64(), None);
        assert_eq!(f.as_f64(), Some(2.5));
    }

    #[test]
    fn map_set_overwrites_and_null_deletes() {
        let mut v = Value::map();
        v.set("a", Value::from(1));
        v.set("a", Value::from(2));
        assert_eq!(v.as_map().unwrap().len(), 1);
        assert_eq!(v.get("a").unwrap().into_value(), Value::Int(2));

        v.set("a", Value::Null);
        assert!(v.get("a").is_none());
        assert!(v.as_map().unwrap().is_empty());
    }

    #[test]
    fn insert_renders_key_as_string() {
        let mut v = Value::map();
        v.insert(&Value::Int(7), Value::from("seven"));
        v.insert(&Value::Bool(true), Value::from("yes"));
        let map = v.as_map().unwrap();
        assert_eq!(map.get("7"), Some(&Value::from("seven")));
        assert_eq!(map.get("true"), Some(&Value::from("yes")));
    }

    #[test]
    fn set_on_null_promotes_to_map() {
        let mut v = Value::Null;
        v.set("k", Value::from("v"));
        assert_eq!(v, [("k", "v")].into_iter().collect::<Value>());
    }

    #[test]
    fn seq_selectors_are_not_map_keys() {
        let s = seq(&[10, 20, 30]);
        assert_eq!(s.get("@length").unwrap().into_value(), Value::Int(3));
        assert_eq!(s.get("@first").unwrap().into_value(), Value::Int(10));
        assert_eq!(s.get("@last").unwrap().into_value(), Value::Int(30));
        assert!(s.get("3").is_none());
        assert!(s.get("-1").is_none());
        assert!(s.get("x").is_none());

        let m: Value = [("@length", 1)].into_iter().collect();
        assert_eq!(m.get("@length").unwrap().into_value(), Value::Int(1));
        let empty = Value::map();
        assert!(empty.get("@length").is_none());
    }

    #[test]
    fn seq_set_replaces_in_range_only() {
        let mut s = seq(&[1, 2]);
        s.set("1", Value::from(5));
        s.set("@first", Value::from(4));
        s.set("9", Value::from(9));
        assert_eq!(s, seq(&[4, 5]));
    }

    #[test]
    fn add_appends_and_promotes_null() {
        let mut s = Value::Null;
        s.add(Value::from(1));
        s.add(Value::from(2));
        assert_eq!(s, seq(&[1, 2]));

        let mut scalar = Value::from("x");
        scalar.add(Value::from(1));
        assert_eq!(scalar, Value::from("x"));
    }

    #[test]
    fn autocreate_replaces_null_entries() {
        let mut v: Value = [("a", Value::Null)].into_iter().collect();
        v.get_mut("a", true).unwrap().set("b", Value::from(1));
        let expected: Value = [("a", [("b", 1)].into_iter().collect::<Value>())]
            .into_iter()
            .collect();
        assert_eq!(v, expected);
        assert!(v.get_mut("missing", false).is_none());
    }

    #[test]
    fn nil_and_empty() {
        assert!(Value::Null.is_nil());
        assert!(Value::from(0).is_nil());
        assert!(Value::from(0.0).is_nil());
        assert!(Value::from("").is_nil());
        assert!(Value::from(false).is_nil());
        assert!(!Value::from("a").is_nil());

        assert!(!Value::Seq(vec![]).is_nil());
        assert!(Value::Seq(vec![]).is_empty());
        assert!(!Value::map().is_nil());
        assert!(Value::map().is_empty());
        assert!(!seq(&[1]).is_empty());
    }

    #[test]
    fn each_stops_early() {
        let s = seq(&[1, 2, 3]);
        let mut seen = Vec::new();
        let _ = s.each(&mut |k, _| {
            seen.push(k);
            ControlFlow::Break(())
        });
        assert_eq!(seen, vec![Value::Int(0)]);
    }

    #[test]
    fn assign_ignores_null() {
        let mut v = Value::from(1);
        v.assign(&Value::Null);
        assert_eq!(v, Value::from(1));
        v.assign(&Value::from("s"));
        assert_eq!(v, Value::from("s"));
    }
}
