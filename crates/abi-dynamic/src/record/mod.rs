//! Typed records with named, tagged fields.
//!
//! A record is a plain Rust struct whose field list is registered with the
//! [`record!`](crate::record!) macro. The registration yields a static
//! [`RecordSchema`] of field accessors; the generic functions in this module
//! implement the [`Dynamic`] behavior of every record on top of it.
//!
//! Field naming: the canonical name of a field comes from its tag, resolved
//! under a [`Naming`]. A name of `-` excludes the field from walks. A field
//! without a name is flattened into its parent when it holds a non-optional
//! record, and skipped otherwise. Lookup by key accepts the canonical name or
//! the Rust identifier.

mod macros;
mod tag;

pub use tag::{FieldTag, Naming, Resolved};

use std::fmt;
use std::ops::ControlFlow;

use tracing::debug;

use crate::dynamic::{Dynamic, FieldInfo, FieldVisitor, Ref, Visitor};
use crate::value::{Kind, Mapping, Value};

/// A type with a static field schema.
pub trait Record: Dynamic + Clone {
    fn schema() -> &'static RecordSchema<Self>;
}

/// Field accessors of a record type, in declaration order.
pub struct RecordSchema<T> {
    name: &'static str,
    fields: Vec<FieldDesc<T>>,
}

impl<T> fmt::Debug for RecordSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

impl<T> RecordSchema<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Appends a field. `tag` takes either form accepted by [`FieldTag::parse`].
    pub fn field(
        mut self,
        ident: &'static str,
        tag: &str,
        get: fn(&T) -> &dyn Dynamic,
        get_mut: fn(&mut T) -> &mut dyn Dynamic,
    ) -> Self {
        let tag = FieldTag::parse(tag);
        let resolved = Naming::DEFAULT.resolve(&tag);
        let name = resolved.name.to_string();
        let omitempty = resolved.omitempty;
        self.fields.push(FieldDesc {
            ident,
            tag,
            name,
            omitempty,
            get,
            get_mut,
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDesc<T>] {
        &self.fields
    }
}

/// One registered field.
pub struct FieldDesc<T> {
    ident: &'static str,
    tag: FieldTag,
    name: String,
    omitempty: bool,
    get: fn(&T) -> &dyn Dynamic,
    get_mut: fn(&mut T) -> &mut dyn Dynamic,
}

impl<T> fmt::Debug for FieldDesc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDesc")
            .field("ident", &self.ident)
            .field("name", &self.name)
            .field("omitempty", &self.omitempty)
            .finish_non_exhaustive()
    }
}

impl<T> FieldDesc<T> {
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn tag(&self) -> &FieldTag {
        &self.tag
    }

    /// Canonical name under [`Naming::DEFAULT`].
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get<'r>(&self, record: &'r T) -> &'r dyn Dynamic {
        (self.get)(record)
    }

    pub fn get_mut<'r>(&self, record: &'r mut T) -> &'r mut dyn Dynamic {
        (self.get_mut)(record)
    }

    fn resolve<'s>(&'s self, naming: &Naming<'_>) -> Resolved<'s> {
        if *naming == Naming::DEFAULT {
            return Resolved {
                name: &self.name,
                omitempty: self.omitempty,
            };
        }
        naming.resolve(&self.tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Named,
    Embedded,
    Hidden,
}

fn placement(name: &str, value: &dyn Dynamic) -> Placement {
    match name {
        "-" => Placement::Hidden,
        "" if value.kind() == Kind::Record && !value.is_optional() => Placement::Embedded,
        "" => Placement::Hidden,
        _ => Placement::Named,
    }
}

/// Finds the field answering to `key`: its index, and whether the key lives
/// inside that field because it is an embedded record. Canonical names win
/// over Rust identifiers, across the whole flattened record.
fn position<T: Record>(record: &T, key: &str) -> Option<(usize, bool)> {
    find_field(record, key, false).or_else(|| find_field(record, key, true))
}

fn find_field<T: Record>(record: &T, key: &str, by_ident: bool) -> Option<(usize, bool)> {
    T::schema()
        .fields()
        .iter()
        .enumerate()
        .find_map(|(index, field)| {
            let value = field.get(record);
            let placement = placement(&field.name, value);
            if placement == Placement::Embedded && has_field(value, key, by_ident) {
                return Some((index, true));
            }
            let matched = if by_ident {
                field.ident == key
            } else {
                placement == Placement::Named && field.name == key
            };
            matched.then_some((index, false))
        })
}

fn has_field(record: &dyn Dynamic, key: &str, by_ident: bool) -> bool {
    let mut found = false;
    let _ = record.each_field(&Naming::DEFAULT, &mut |info, _| {
        let candidate = if by_ident { info.ident } else { info.name };
        if candidate == key {
            found = true;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });
    found
}

/// Field lookup. An unset optional field is absent.
pub fn get<'a, T: Record>(record: &'a T, key: &str) -> Option<Ref<'a>> {
    let (index, embedded) = position(record, key)?;
    let value = T::schema().fields()[index].get(record);
    if embedded {
        return value.get(key);
    }
    (value.kind() != Kind::Null).then_some(Ref::Borrowed(value))
}

/// Mutable field lookup. With `autocreate`, an unset field is materialized.
pub fn get_mut<'a, T: Record>(
    record: &'a mut T,
    key: &str,
    autocreate: bool,
) -> Option<&'a mut dyn Dynamic> {
    let (index, embedded) = position(record, key)?;
    let value = T::schema().fields()[index].get_mut(record);
    if embedded {
        return value.get_mut(key, autocreate);
    }
    if value.kind() == Kind::Null {
        if !autocreate {
            return None;
        }
        value.materialize();
    }
    Some(value)
}

/// Writes one field with coercion. Null unsets the field.
pub fn set<T: Record>(record: &mut T, key: &str, value: Value) {
    let Some((index, embedded)) = position(record, key) else {
        debug!(record = T::schema().name(), key, "no such field");
        return;
    };
    let slot = T::schema().fields()[index].get_mut(record);
    if embedded {
        slot.set(key, value);
    } else if value.is_null() {
        slot.clear();
    } else {
        slot.assign(&value);
    }
}

pub fn each<'a, T: Record>(record: &'a T, visit: &mut Visitor<'a, '_>) -> ControlFlow<()> {
    each_field(record, &Naming::DEFAULT, &mut |info, value| {
        visit(Value::Str(info.name.to_string()), value)
    })
}

/// Walks exposed fields in declaration order, flattening embedded records.
pub fn each_field<'a, T: Record>(
    record: &'a T,
    naming: &Naming<'_>,
    visit: &mut FieldVisitor<'a, '_>,
) -> ControlFlow<()> {
    for field in T::schema().fields() {
        let value = field.get(record);
        let resolved = field.resolve(naming);
        match placement(resolved.name, value) {
            Placement::Named => visit(
                &FieldInfo {
                    name: resolved.name,
                    ident: field.ident,
                    omitempty: resolved.omitempty,
                },
                value,
            )?,
            Placement::Embedded => value.each_field(naming, visit)?,
            Placement::Hidden => {}
        }
    }
    ControlFlow::Continue(())
}

/// Binds a plain value onto the record.
///
/// A record of the same type is copied. Otherwise each named field is bound
/// from the entry of the same name; a missing entry resets scalar fields to
/// their zero value and leaves optional and container fields alone.
pub fn assign<T: Record>(record: &mut T, value: &Value) {
    if value.is_null() {
        return;
    }
    if let Value::Record(other) = value {
        if let Some(same) = other.downcast_ref::<T>() {
            *record = same.clone();
            return;
        }
    }
    for field in T::schema().fields() {
        let slot = field.get_mut(record);
        match placement(&field.name, &*slot) {
            Placement::Named => match value.get(&field.name) {
                Some(entry) => slot.assign(&entry.value()),
                None => slot.assign(&Value::Null),
            },
            Placement::Embedded => slot.assign(value),
            Placement::Hidden => {}
        }
    }
}

/// Plain snapshot: a `Map` of exposed fields in declaration order.
pub fn to_value<T: Record>(record: &T) -> Value {
    let mut map = Mapping::new();
    let _ = each_field(record, &Naming::DEFAULT, &mut |info, value| {
        map.insert(info.name.to_string(), value.to_value());
        ControlFlow::Continue(())
    });
    Value::Map(map)
}
