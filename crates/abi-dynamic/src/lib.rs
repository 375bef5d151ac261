//! Schema-less dynamic values.
//!
//! A [`Value`] holds JSON-shaped data: scalars, sequences, string-keyed
//! mappings, or boxed typed records. The [`Dynamic`] trait makes `Value`,
//! the primitive types, `Option`, `Vec`, string-keyed maps and every
//! [`record!`] type addressable by key at runtime:
//!
//! - [`get`] / [`get_path`] read children; sequences accept `@length`,
//!   `@first`, `@last` and decimal indexes.
//! - [`set`] / [`set_path`] write with coercion and create missing
//!   intermediate maps.
//! - [`bind`] copies a plain value onto a typed destination.
//! - the [`coerce`] functions convert between scalar shapes and never fail.
//!
//! ```
//! use abi_dynamic::{get_path, set_path, Value};
//!
//! let mut doc = Value::Null;
//! set_path(&mut doc, &["a", "b"], Value::from(1));
//! let b = get_path(&doc, &["a", "b"]).map(|r| r.into_value());
//! assert_eq!(b, Some(Value::Int(1)));
//! ```

pub mod accessor;
pub mod coerce;
mod dynamic;
mod impls;
pub mod record;
pub mod selector;
mod value;

pub use accessor::{
    add, bind, each, each_with_tag, get, get_path, get_with_autocreate, is_empty, is_nil, set,
    set_path, split_path,
};
pub use coerce::{bool_value, float_value, int_value, string_value, uint_value};
pub use dynamic::{Dynamic, FieldInfo, FieldVisitor, Ref, Visitor};
pub use record::{FieldDesc, FieldTag, Naming, Record, RecordSchema};
pub use value::{Kind, Mapping, Number, RecordValue, Value};
