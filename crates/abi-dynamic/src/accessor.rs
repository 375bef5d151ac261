//! Path access over [`Dynamic`] nodes.
//!
//! These are thin, uniform entry points over the trait; anything that
//! implements [`Dynamic`] can be traversed, written and bound with them.

use std::ops::ControlFlow;

use tracing::{debug, trace};

use crate::coerce;
use crate::dynamic::{Dynamic, Ref};
use crate::record::Naming;
use crate::value::{Kind, Value};

/// Reads the child at `key`. Absent keys, out-of-range indexes and null
/// optionals yield `None`.
pub fn get<'a>(object: &'a dyn Dynamic, key: &str) -> Option<Ref<'a>> {
    object.get(key)
}

/// Mutable child lookup; with `autocreate`, missing intermediate maps and
/// unset optional fields are created.
pub fn get_with_autocreate<'a>(
    object: &'a mut dyn Dynamic,
    key: &str,
    autocreate: bool,
) -> Option<&'a mut dyn Dynamic> {
    object.get_mut(key, autocreate)
}

/// Follows `keys` one segment at a time. An empty path yields the object.
pub fn get_path<'a, S: AsRef<str>>(object: &'a dyn Dynamic, keys: &[S]) -> Option<Ref<'a>> {
    let mut current = Ref::Borrowed(object);
    for key in keys {
        let key = key.as_ref();
        current = match current {
            Ref::Borrowed(node) => node.get(key)?,
            Ref::Owned(value) => Ref::Owned(value.get(key)?.into_value()),
        };
    }
    Some(current)
}

/// Writes `value` at `key`, coercing to the destination's type. Writing null
/// deletes a map entry or unsets an optional field.
pub fn set(object: &mut dyn Dynamic, key: &str, value: Value) {
    object.set(key, value);
}

/// Writes through a path, creating intermediate maps as needed.
pub fn set_path<S: AsRef<str>>(object: &mut dyn Dynamic, keys: &[S], value: Value) {
    match keys {
        [] => {}
        [last] => object.set(last.as_ref(), value),
        [head, rest @ ..] => match object.get_mut(head.as_ref(), true) {
            Some(child) => set_path(child, rest, value),
            None => debug!(key = head.as_ref(), "path segment cannot hold children"),
        },
    }
}

/// Visits each child in order until the visitor breaks. Maps and records
/// yield string keys, sequences yield `Int` indexes; scalars yield nothing.
pub fn each<'a, F>(object: &'a dyn Dynamic, mut visit: F)
where
    F: FnMut(Value, &'a dyn Dynamic) -> ControlFlow<()>,
{
    let _ = object.each(&mut visit);
}

/// Like [`each`], but record fields are named under `naming`. Other shapes
/// report their keys rendered as strings.
pub fn each_with_tag<'a, F>(object: &'a dyn Dynamic, naming: &Naming<'_>, mut visit: F)
where
    F: FnMut(&str, &'a dyn Dynamic) -> ControlFlow<()>,
{
    let _ = if object.kind() == Kind::Record {
        object.each_field(naming, &mut |info, child| visit(info.name, child))
    } else {
        object.each(&mut |key, child| visit(&coerce::string_value(&key, ""), child))
    };
}

pub fn is_nil(object: &dyn Dynamic) -> bool {
    object.is_nil()
}

pub fn is_empty(object: &dyn Dynamic) -> bool {
    object.is_empty()
}

/// Appends to a sequence; a null slot becomes a one-element sequence.
pub fn add(object: &mut dyn Dynamic, value: Value) {
    object.add(value);
}

/// Recursively binds a plain value onto a typed destination.
pub fn bind(object: &mut dyn Dynamic, value: &Value) {
    trace!(kind = ?object.kind(), "bind");
    object.assign(value);
}

/// Splits a path on `sep`. An empty path has no segments.
pub fn split_path<'p>(path: &'p str, sep: &str) -> Vec<&'p str> {
    if path.is_empty() {
        return Vec::new();
    }
    if sep.is_empty() {
        return vec![path];
    }
    path.split(sep).collect()
}
