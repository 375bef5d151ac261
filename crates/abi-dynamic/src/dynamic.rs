//! The [`Dynamic`] trait: runtime addressing over any supported shape.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::ops::{ControlFlow, Deref};

use crate::record::Naming;
use crate::value::{Kind, Value};

/// Callback for [`Dynamic::each`]: receives the key (a string for maps and
/// records, an `Int` index for sequences) and the child node.
pub type Visitor<'a, 'f> = dyn FnMut(Value, &'a dyn Dynamic) -> ControlFlow<()> + 'f;

/// Callback for [`Dynamic::each_field`].
pub type FieldVisitor<'a, 'f> = dyn FnMut(&FieldInfo<'_>, &'a dyn Dynamic) -> ControlFlow<()> + 'f;

/// A record field as seen by a field walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo<'a> {
    /// Canonical name under the active naming.
    pub name: &'a str,
    /// Rust identifier of the field.
    pub ident: &'static str,
    pub omitempty: bool,
}

/// A node that can be read, written and walked by key at runtime.
///
/// Implemented for [`Value`], the primitive types, `String`, `Option`, `Vec`,
/// string-keyed maps, and every type declared with [`record!`](crate::record!).
/// Custom shapes implement it by hand; anything left at its default behaves
/// like an opaque leaf.
pub trait Dynamic: fmt::Debug + Any {
    fn kind(&self) -> Kind;

    /// Deep plain snapshot. Records become `Map`s in declared field order.
    fn to_value(&self) -> Value;

    fn as_any(&self) -> &dyn Any;

    fn clone_dyn(&self) -> Box<dyn Dynamic>;

    /// Borrow of `self` when it already is a [`Value`].
    fn as_value(&self) -> Option<&Value> {
        None
    }

    /// Text rendering for string coercion, when the type has one.
    fn as_text(&self) -> Option<String> {
        None
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// True for optional slots (`Option<T>`).
    fn is_optional(&self) -> bool {
        false
    }

    /// True for presence-only types whose only information is being set.
    fn is_flag(&self) -> bool {
        false
    }

    /// Null, zero, empty string, false, or an unset optional.
    /// Containers are never nil.
    fn is_nil(&self) -> bool;

    /// Like [`is_nil`](Dynamic::is_nil), but containers with no elements count too.
    fn is_empty(&self) -> bool {
        self.is_nil()
    }

    fn get(&self, _key: &str) -> Option<Ref<'_>> {
        None
    }

    /// Mutable child lookup. With `autocreate`, absent or null children that
    /// can hold further children are created on the way.
    fn get_mut(&mut self, _key: &str, _autocreate: bool) -> Option<&mut dyn Dynamic> {
        None
    }

    fn set(&mut self, _key: &str, _value: Value) {}

    fn each<'a>(&'a self, _visit: &mut Visitor<'a, '_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Walks record fields with their naming metadata. Non-records yield nothing.
    fn each_field<'a>(
        &'a self,
        _naming: &Naming<'_>,
        _visit: &mut FieldVisitor<'a, '_>,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Replaces the contents of `self` from a plain value, coercing as needed.
    /// Never fails; a null source leaves containers unchanged.
    fn assign(&mut self, value: &Value);

    fn add(&mut self, _value: Value) {}

    /// Turns an unset slot into an empty one.
    fn materialize(&mut self) {}

    /// Resets the slot to its unset or zero state.
    fn clear(&mut self) {}
}

/// A child node returned by [`Dynamic::get`]: borrowed from the parent, or
/// computed on the fly (`@length`).
#[derive(Debug)]
pub enum Ref<'a> {
    Borrowed(&'a dyn Dynamic),
    Owned(Value),
}

impl<'a> Ref<'a> {
    /// Plain view of the node, cloning only when it is not already a [`Value`].
    pub fn value(&self) -> Cow<'_, Value> {
        match self {
            Ref::Borrowed(node) => value_of(*node),
            Ref::Owned(value) => Cow::Borrowed(value),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Ref::Borrowed(node) => value_of(node).into_owned(),
            Ref::Owned(value) => value,
        }
    }
}

impl<'a> Deref for Ref<'a> {
    type Target = dyn Dynamic;

    fn deref(&self) -> &Self::Target {
        match self {
            Ref::Borrowed(node) => *node,
            Ref::Owned(value) => value,
        }
    }
}

impl PartialEq<Value> for Ref<'_> {
    fn eq(&self, other: &Value) -> bool {
        *self.value() == *other
    }
}

pub(crate) fn value_of(node: &dyn Dynamic) -> Cow<'_, Value> {
    match node.as_value() {
        Some(value) => Cow::Borrowed(value),
        None => Cow::Owned(node.to_value()),
    }
}
