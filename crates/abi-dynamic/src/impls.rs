//! [`Dynamic`] for primitives, `String`, `Option`, `Vec` and string-keyed maps.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::ops::ControlFlow;

use indexmap::IndexMap;

use crate::coerce;
use crate::dynamic::{value_of, Dynamic, FieldVisitor, Ref, Visitor};
use crate::record::Naming;
use crate::selector::{self, Selector};
use crate::value::{Kind, Mapping, Value};

macro_rules! impl_integer {
    ($kind:ident, $variant:ident, $wide:ty, $coerce:path, $($t:ty),*) => {$(
        impl Dynamic for $t {
            fn kind(&self) -> Kind {
                Kind::$kind
            }

            fn to_value(&self) -> Value {
                Value::$variant(*self as $wide)
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn clone_dyn(&self) -> Box<dyn Dynamic> {
                Box::new(*self)
            }

            fn is_nil(&self) -> bool {
                *self == 0
            }

            fn assign(&mut self, value: &Value) {
                *self = $coerce(value, 0) as $t;
            }

            fn clear(&mut self) {
                *self = 0;
            }
        }
    )*};
}

impl_integer!(Int, Int, i64, coerce::int_value, i8, i16, i32, i64, isize);
impl_integer!(UInt, UInt, u64, coerce::uint_value, u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl Dynamic for $t {
            fn kind(&self) -> Kind {
                Kind::Float
            }

            fn to_value(&self) -> Value {
                Value::Float(*self as f64)
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn clone_dyn(&self) -> Box<dyn Dynamic> {
                Box::new(*self)
            }

            fn is_nil(&self) -> bool {
                *self == 0.0
            }

            fn assign(&mut self, value: &Value) {
                *self = coerce::float_value(value, 0.0) as $t;
            }

            fn clear(&mut self) {
                *self = 0.0;
            }
        }
    )*};
}

impl_float!(f32, f64);

impl Dynamic for bool {
    fn kind(&self) -> Kind {
        Kind::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_dyn(&self) -> Box<dyn Dynamic> {
        Box::new(*self)
    }

    fn is_nil(&self) -> bool {
        !*self
    }

    fn assign(&mut self, value: &Value) {
        *self = coerce::bool_value(value, false);
    }

    fn clear(&mut self) {
        *self = false;
    }
}

impl Dynamic for String {
    fn kind(&self) -> Kind {
        Kind::String
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_dyn(&self) -> Box<dyn Dynamic> {
        Box::new(self.clone())
    }

    fn as_text(&self) -> Option<String> {
        Some(self.clone())
    }

    fn is_nil(&self) -> bool {
        String::is_empty(self)
    }

    fn assign(&mut self, value: &Value) {
        *self = coerce::string_value(value, "");
    }

    fn clear(&mut self) {
        String::clear(self);
    }
}

/// The unit type is a flag: it carries no data, so `Option<()>` records only
/// whether something was present. It encodes as an empty object.
impl Dynamic for () {
    fn kind(&self) -> Kind {
        Kind::Record
    }

    fn to_value(&self) -> Value {
        Value::map()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_dyn(&self) -> Box<dyn Dynamic> {
        Box::new(())
    }

    fn is_flag(&self) -> bool {
        true
    }

    fn is_nil(&self) -> bool {
        false
    }

    fn assign(&mut self, _value: &Value) {}
}

impl<T: Dynamic + Default + Clone> Dynamic for Option<T> {
    fn kind(&self) -> Kind {
        self.as_ref().map_or(Kind::Null, Dynamic::kind)
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, Dynamic::to_value)
    }

    fn as_value(&self) -> Option<&Value> {
        self.as_ref().and_then(Dynamic::as_value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_dyn(&self) -> Box<dyn Dynamic> {
        Box::new(self.clone())
    }

    fn as_text(&self) -> Option<String> {
        self.as_ref().and_then(Dynamic::as_text)
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn is_nil(&self) -> bool {
        self.is_none()
    }

    fn is_empty(&self) -> bool {
        self.is_none()
    }

    fn get(&self, key: &str) -> Option<Ref<'_>> {
        self.as_ref()?.get(key)
    }

    fn get_mut(&mut self, key: &str, autocreate: bool) -> Option<&mut dyn Dynamic> {
        if autocreate {
            self.materialize();
        }
        self.as_mut()?.get_mut(key, autocreate)
    }

    fn set(&mut self, key: &str, value: Value) {
        if self.is_none() && value.is_null() {
            return;
        }
        self.materialize();
        if let Some(inner) = self {
            inner.set(key, value);
        }
    }

    fn each<'a>(&'a self, visit: &mut Visitor<'a, '_>) -> ControlFlow<()> {
        match self {
            Some(inner) => inner.each(visit),
            None => ControlFlow::Continue(()),
        }
    }

    fn each_field<'a>(
        &'a self,
        naming: &Naming<'_>,
        visit: &mut FieldVisitor<'a, '_>,
    ) -> ControlFlow<()> {
        match self {
            Some(inner) => inner.each_field(naming, visit),
            None => ControlFlow::Continue(()),
        }
    }

    fn assign(&mut self, value: &Value) {
        if value.is_null() {
            return;
        }
        let flag = self
            .as_ref()
            .map_or_else(|| T::default().is_flag(), Dynamic::is_flag);
        if flag {
            if coerce::bool_value(value, false) {
                self.materialize();
            }
            return;
        }
        self.materialize();
        if let Some(inner) = self {
            inner.assign(value);
        }
    }

    fn add(&mut self, value: Value) {
        self.materialize();
        if let Some(inner) = self {
            inner.add(value);
        }
    }

    fn materialize(&mut self) {
        if self.is_none() {
            *self = Some(T::default());
        }
    }

    fn clear(&mut self) {
        *self = None;
    }
}

/// Boxes are transparent; `Option<Box<T>>` is the usual way to nest a record
/// inside itself.
impl<T: Dynamic + Clone> Dynamic for Box<T> {
    fn kind(&self) -> Kind {
        (**self).kind()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn as_value(&self) -> Option<&Value> {
        (**self).as_value()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn clone_dyn(&self) -> Box<dyn Dynamic> {
        (**self).clone_dyn()
    }

    fn as_text(&self) -> Option<String> {
        (**self).as_text()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn is_optional(&self) -> bool {
        (**self).is_optional()
    }

    fn is_flag(&self) -> bool {
        (**self).is_flag()
    }

    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn get(&self, key: &str) -> Option<Ref<'_>> {
        (**self).get(key)
    }

    fn get_mut(&mut self, key: &str, autocreate: bool) -> Option<&mut dyn Dynamic> {
        (**self).get_mut(key, autocreate)
    }

    fn set(&mut self, key: &str, value: Value) {
        (**self).set(key, value)
    }

    fn each<'a>(&'a self, visit: &mut Visitor<'a, '_>) -> ControlFlow<()> {
        (**self).each(visit)
    }

    fn each_field<'a>(
        &'a self,
        naming: &Naming<'_>,
        visit: &mut FieldVisitor<'a, '_>,
    ) -> ControlFlow<()> {
        (**self).each_field(naming, visit)
    }

    fn assign(&mut self, value: &Value) {
        (**self).assign(value)
    }

    fn add(&mut self, value: Value) {
        (**self).add(value)
    }

    fn materialize(&mut self) {
        (**self).materialize()
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

fn element<T: Dynamic + Default>(value: &Value) -> T {
    let mut slot = T::default();
    slot.assign(value);
    slot
}

impl<T: Dynamic + Default + Clone> Dynamic for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Seq
    }

    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(Dynamic::to_value).collect())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_dyn(&self) -> Box<dyn Dynamic> {
        Box::new(self.clone())
    }

    fn is_nil(&self) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        <[T]>::is_empty(self)
    }

    fn get(&self, key: &str) -> Option<Ref<'_>> {
        match selector::resolve(key, self.len())? {
            Selector::Length => Some(Ref::Owned(Value::Int(self.len() as i64))),
            Selector::Index(i) => Some(Ref::Borrowed(&self[i])),
        }
    }

    fn get_mut(&mut self, key: &str, _autocreate: bool) -> Option<&mut dyn Dynamic> {
        match selector::resolve(key, self.len())? {
            Selector::Index(i) => Some(&mut self[i] as &mut dyn Dynamic),
            Selector::Length => None,
        }
    }

    fn set(&mut self, key: &str, value: Value) {
        if let Some(Selector::Index(i)) = selector::resolve(key, self.len()) {
            self[i] = element(&value);
        }
    }

    fn each<'a>(&'a self, visit: &mut Visitor<'a, '_>) -> ControlFlow<()> {
        for (i, item) in self.iter().enumerate() {
            visit(Value::Int(i as i64), item)?;
        }
        ControlFlow::Continue(())
    }

    fn assign(&mut self, value: &Value) {
        if value.is_null() {
            return;
        }
        let mut items = Vec::new();
        let _ = value.each(&mut |_, item| {
            items.push(element(&value_of(item)));
            ControlFlow::Continue(())
        });
        *self = items;
    }

    fn add(&mut self, value: Value) {
        self.push(element(&value));
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

macro_rules! impl_string_map {
    ($($map:ident => $remove:ident),*) => {$(
        impl<T: Dynamic + Default + Clone> Dynamic for $map<String, T> {
            fn kind(&self) -> Kind {
                Kind::Map
            }

            fn to_value(&self) -> Value {
                Value::Map(
                    self.iter()
                        .map(|(k, v)| (k.clone(), v.to_value()))
                        .collect::<Mapping>(),
                )
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn clone_dyn(&self) -> Box<dyn Dynamic> {
                Box::new(self.clone())
            }

            fn is_nil(&self) -> bool {
                false
            }

            fn is_empty(&self) -> bool {
                $map::is_empty(self)
            }

            fn get(&self, key: &str) -> Option<Ref<'_>> {
                $map::get(self, key).map(|v| Ref::Borrowed(v))
            }

            fn get_mut(&mut self, key: &str, autocreate: bool) -> Option<&mut dyn Dynamic> {
                if autocreate {
                    let slot = self.entry(key.to_string()).or_default();
                    slot.materialize();
                    return Some(slot as &mut dyn Dynamic);
                }
                $map::get_mut(self, key).map(|v| v as &mut dyn Dynamic)
            }

            fn set(&mut self, key: &str, value: Value) {
                if value.is_null() {
                    self.$remove(key);
                } else {
                    self.insert(key.to_string(), element(&value));
                }
            }

            fn each<'a>(&'a self, visit: &mut Visitor<'a, '_>) -> ControlFlow<()> {
                for (k, v) in self.iter() {
                    visit(Value::Str(k.clone()), v)?;
                }
                ControlFlow::Continue(())
            }

            fn assign(&mut self, value: &Value) {
                if value.is_null() {
                    return;
                }
                let _ = value.each(&mut |key, item| {
                    self.insert(coerce::string_value(&key, ""), element(&value_of(item)));
                    ControlFlow::Continue(())
                });
            }

            fn clear(&mut self) {
                $map::clear(self);
            }
        }
    )*};
}

impl_string_map!(HashMap => remove, BTreeMap => remove, IndexMap => shift_remove);
