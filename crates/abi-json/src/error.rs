use thiserror::Error;

/// Errors from [`JsonDecoder`](crate::JsonDecoder). Positions are byte offsets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of JSON input")]
    UnexpectedEnd,
    #[error("invalid JSON at byte {0}")]
    Invalid(usize),
    #[error("invalid number literal at byte {0}")]
    InvalidNumber(usize),
    #[error("invalid UTF-8 in string at byte {0}")]
    InvalidUtf8(usize),
    #[error("invalid string escape at byte {0}")]
    InvalidEscape(usize),
    #[error("trailing characters after JSON value at byte {0}")]
    TrailingCharacters(usize),
    #[error("nesting deeper than {0} levels")]
    DepthLimit(usize),
}

/// Errors from [`JsonEncoder`](crate::JsonEncoder).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    #[error("unsupported float value {0}")]
    UnsupportedFloat(f64),
    #[error("unsupported value of type {0}")]
    UnsupportedType(&'static str),
    #[error("nesting deeper than {0} levels")]
    DepthLimit(usize),
}
