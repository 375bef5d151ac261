//! JSON encoding and decoding for [`abi_dynamic`] values.
//!
//! - [`marshal`] encodes in natural order: mapping insertion order and
//!   declared record field order.
//! - [`stringify`] sorts mapping keys, giving canonical output.
//! - [`marshal_indent`] pretty-prints.
//! - [`unmarshal`] decodes and binds onto any [`Dynamic`] destination.
//!
//! Integers outside the 32-bit range encode as strings.
//!
//! ```
//! use abi_dynamic::Value;
//!
//! let v: Value = [("id", Value::Int(1 << 40)), ("ok", Value::Bool(true))]
//!     .into_iter()
//!     .collect();
//! assert_eq!(abi_json::marshal(&v).unwrap(), br#"{"id":"1099511627776","ok":true}"#);
//! ```

mod decoder;
mod encoder;
mod encoder_stable;
mod error;
pub mod escape;

pub use decoder::{JsonDecoder, MAX_DEPTH};
pub use encoder::{EncodeOptions, Indent, JsonEncoder};
pub use encoder_stable::JsonEncoderStable;
pub use error::{DecodeError, EncodeError};

use abi_dynamic::{Dynamic, Value};
use tracing::trace;

/// Encodes in natural order.
pub fn marshal(value: &dyn Dynamic) -> Result<Vec<u8>, EncodeError> {
    JsonEncoder::new().encode(value)
}

/// Encodes with key-sorted mappings.
pub fn stringify(value: &dyn Dynamic) -> Result<Vec<u8>, EncodeError> {
    JsonEncoderStable::new().encode(value)
}

/// Encodes in natural order, one element per line. Every line after the
/// first starts with `prefix`, followed by `indent` once per nesting level.
pub fn marshal_indent(value: &dyn Dynamic, prefix: &str, indent: &str) -> Result<Vec<u8>, EncodeError> {
    marshal_with(value, EncodeOptions::default().with_indent(prefix, indent))
}

pub fn marshal_with(value: &dyn Dynamic, options: EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    JsonEncoder::with_options(options).encode(value)
}

/// Decodes one JSON document into a plain value. Numbers stay as
/// [`Number`](abi_dynamic::Number) literals.
pub fn parse(data: &[u8]) -> Result<Value, DecodeError> {
    JsonDecoder::new(data).decode()
}

/// Decodes `data` and binds it onto `destination` with coercion.
///
/// On error the destination is left untouched.
pub fn unmarshal(data: &[u8], destination: &mut dyn Dynamic) -> Result<(), DecodeError> {
    let value = parse(data)?;
    trace!(bytes = data.len(), kind = ?destination.kind(), "bind decoded document");
    destination.assign(&value);
    Ok(())
}
