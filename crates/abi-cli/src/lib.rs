//! Document operations behind the `abi` binary.
//!
//! Each command takes the input document as bytes and returns the bytes to
//! print, so the binary stays a thin shell over stdin and stdout.

use abi_dynamic::{get_path, set_path, split_path, Value};
use abi_json::{marshal_with, parse, DecodeError, EncodeError, EncodeOptions};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid JSON input: {0}")]
    Decode(#[from] DecodeError),
    #[error("cannot encode result: {0}")]
    Encode(#[from] EncodeError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Output shaping shared by all commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub sorted: bool,
    /// Spaces per nesting level; `None` for compact output.
    pub indent: Option<usize>,
}

impl Output {
    fn options(&self) -> EncodeOptions {
        let options = EncodeOptions {
            sort_keys: self.sorted,
            ..EncodeOptions::default()
        };
        match self.indent {
            Some(width) => options.with_indent("", &" ".repeat(width)),
            None => options,
        }
    }

    fn render(&self, value: &Value) -> Result<Vec<u8>, CliError> {
        let mut out = marshal_with(value, self.options())?;
        out.push(b'\n');
        Ok(out)
    }
}

/// Prints the value at `path`.
pub fn get(input: &[u8], path: &str, sep: &str, output: &Output) -> Result<Vec<u8>, CliError> {
    let doc = parse(input)?;
    let keys = split_path(path, sep);
    let found = get_path(&doc, &keys).ok_or_else(|| CliError::NotFound(path.to_string()))?;
    output.render(&found.value())
}

/// Writes `value` (JSON text) at `path` and prints the whole document.
pub fn set(
    input: &[u8],
    path: &str,
    value: &str,
    sep: &str,
    output: &Output,
) -> Result<Vec<u8>, CliError> {
    let mut doc = parse(input)?;
    let value = parse(value.as_bytes())?;
    let keys = split_path(path, sep);
    debug!(segments = keys.len(), "set");
    set_path(&mut doc, &keys, value);
    output.render(&doc)
}

/// Re-encodes the document.
pub fn fmt(input: &[u8], output: &Output) -> Result<Vec<u8>, CliError> {
    let doc = parse(input)?;
    output.render(&doc)
}
