//! `JsonDecoder`: strict JSON text to [`Value`].
//!
//! Numbers are kept as [`Number`] literals; the destination decides their
//! final machine type when the value is bound. Duplicate object keys keep the
//! last occurrence at the position of the first.

use abi_dynamic::{Mapping, Number, Value};

use crate::error::DecodeError;

/// Nesting limit for arrays and objects.
pub const MAX_DEPTH: usize = 1000;

pub struct JsonDecoder<'d> {
    data: &'d [u8],
    x: usize,
    depth: usize,
}

impl<'d> JsonDecoder<'d> {
    pub fn new(data: &'d [u8]) -> Self {
        Self {
            data,
            x: 0,
            depth: 0,
        }
    }

    /// Decodes exactly one value; anything but whitespace after it is an error.
    pub fn decode(&mut self) -> Result<Value, DecodeError> {
        let value = self.read_any()?;
        self.skip_whitespace();
        if self.x < self.data.len() {
            return Err(DecodeError::TrailingCharacters(self.x));
        }
        Ok(value)
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.x
    }

    fn peek(&self) -> Result<u8, DecodeError> {
        self.data
            .get(self.x)
            .copied()
            .ok_or(DecodeError::UnexpectedEnd)
    }

    pub fn read_any(&mut self) -> Result<Value, DecodeError> {
        self.skip_whitespace();
        match self.peek()? {
            b'"' => Ok(Value::Str(self.read_str()?)),
            b'[' => self.read_arr(),
            b'{' => self.read_obj(),
            b'n' => self.read_literal(b"null", Value::Null),
            b't' => self.read_literal(b"true", Value::Bool(true)),
            b'f' => self.read_literal(b"false", Value::Bool(false)),
            b'-' | b'0'..=b'9' => self.read_num(),
            _ => Err(DecodeError::Invalid(self.x)),
        }
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.data.get(self.x) {
            self.x += 1;
        }
    }

    fn read_literal(&mut self, literal: &[u8], value: Value) -> Result<Value, DecodeError> {
        let end = self.x + literal.len();
        if end > self.data.len() {
            return Err(DecodeError::UnexpectedEnd);
        }
        if &self.data[self.x..end] != literal {
            return Err(DecodeError::Invalid(self.x));
        }
        self.x = end;
        Ok(value)
    }

    pub fn read_num(&mut self) -> Result<Value, DecodeError> {
        let start = self.x;
        let data = self.data;
        let mut x = start;
        while x < data.len() && matches!(data[x], b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9') {
            x += 1;
        }
        self.x = x;
        // The scanned bytes are ASCII by construction.
        let literal = std::str::from_utf8(&data[start..x]).map_err(|_| DecodeError::InvalidNumber(start))?;
        Number::parse(literal)
            .map(Value::Number)
            .ok_or(DecodeError::InvalidNumber(start))
    }

    pub fn read_str(&mut self) -> Result<String, DecodeError> {
        if self.peek()? != b'"' {
            return Err(DecodeError::Invalid(self.x));
        }
        let x0 = self.x + 1;
        let x1 = find_ending_quote(self.data, x0)?;
        let s = decode_json_string(&self.data[x0..x1], x0)?;
        self.x = x1 + 1;
        Ok(s)
    }

    pub fn read_arr(&mut self) -> Result<Value, DecodeError> {
        self.enter()?;
        self.x += 1;
        let mut arr = Vec::new();
        let mut first = true;
        loop {
            self.skip_whitespace();
            let ch = self.peek()?;
            if ch == b']' && first {
                self.x += 1;
                break;
            }
            if !first {
                match ch {
                    b']' => {
                        self.x += 1;
                        break;
                    }
                    b',' => self.x += 1,
                    _ => return Err(DecodeError::Invalid(self.x)),
                }
            }
            arr.push(self.read_any()?);
            first = false;
        }
        self.depth -= 1;
        Ok(Value::Seq(arr))
    }

    pub fn read_obj(&mut self) -> Result<Value, DecodeError> {
        self.enter()?;
        self.x += 1;
        let mut obj = Mapping::new();
        let mut first = true;
        loop {
            self.skip_whitespace();
            let ch = self.peek()?;
            if ch == b'}' && first {
                self.x += 1;
                break;
            }
            if !first {
                match ch {
                    b'}' => {
                        self.x += 1;
                        break;
                    }
                    b',' => self.x += 1,
                    _ => return Err(DecodeError::Invalid(self.x)),
                }
                self.skip_whitespace();
            }
            let key = self.read_str()?;
            self.skip_whitespace();
            if self.peek()? != b':' {
                return Err(DecodeError::Invalid(self.x));
            }
            self.x += 1;
            let val = self.read_any()?;
            obj.insert(key, val);
            first = false;
        }
        self.depth -= 1;
        Ok(Value::Map(obj))
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(DecodeError::DepthLimit(MAX_DEPTH));
        }
        Ok(())
    }
}

fn find_ending_quote(data: &[u8], mut x: usize) -> Result<usize, DecodeError> {
    while x < data.len() {
        match data[x] {
            b'"' => return Ok(x),
            b'\\' => x += 2,
            _ => x += 1,
        }
    }
    Err(DecodeError::UnexpectedEnd)
}

/// Decodes a string body (between the quotes). Escapes are resolved by
/// serde_json.
fn decode_json_string(bytes: &[u8], offset: usize) -> Result<String, DecodeError> {
    if let Some(i) = bytes.iter().position(|&b| b < 0x20) {
        return Err(DecodeError::Invalid(offset + i));
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DecodeError::InvalidUtf8(offset + e.valid_up_to()))?;
    if !text.contains('\\') {
        return Ok(text.to_string());
    }
    let mut quoted = Vec::with_capacity(bytes.len() + 2);
    quoted.push(b'"');
    quoted.extend_from_slice(bytes);
    quoted.push(b'"');
    serde_json::from_slice(&quoted).map_err(|_| DecodeError::InvalidEscape(offset))
}
