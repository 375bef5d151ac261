//! `JsonEncoderStable`: key-sorted encoding.
//!
//! Mapping keys are emitted in ascending byte order, so two values holding
//! the same entries encode identically regardless of insertion order.

use abi_dynamic::Dynamic;

use crate::encoder::{EncodeOptions, JsonEncoder};
use crate::error::EncodeError;

pub struct JsonEncoderStable {
    inner: JsonEncoder,
}

impl Default for JsonEncoderStable {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonEncoderStable {
    pub fn new() -> Self {
        Self::with_options(EncodeOptions::default())
    }

    /// Uses `options` with key sorting forced on.
    pub fn with_options(options: EncodeOptions) -> Self {
        Self {
            inner: JsonEncoder::with_options(EncodeOptions {
                sort_keys: true,
                ..options
            }),
        }
    }

    pub fn encode(&mut self, value: &dyn Dynamic) -> Result<Vec<u8>, EncodeError> {
        self.inner.encode(value)
    }
}
