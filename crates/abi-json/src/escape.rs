//! JSON string escaping.

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Appends `s` as a quoted JSON string.
///
/// Control characters use `\uXXXX` except for `\n`, `\r` and `\t`. With
/// `escape_html`, `<`, `>` and `&` are escaped too, so the output can be
/// embedded in HTML. U+2028 and U+2029 are always escaped.
pub fn write_escaped(out: &mut Vec<u8>, s: &str, escape_html: bool) {
    out.push(b'"');
    let bytes = s.as_bytes();
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        let short: &[u8] = match ch {
            '"' => b"\\\"",
            '\\' => b"\\\\",
            '\n' => b"\\n",
            '\r' => b"\\r",
            '\t' => b"\\t",
            '<' | '>' | '&' if escape_html => b"",
            '\u{2028}' | '\u{2029}' => b"",
            c if (c as u32) < 0x20 => b"",
            _ => continue,
        };
        out.extend_from_slice(&bytes[start..i]);
        if short.is_empty() {
            write_unicode_escape(out, ch as u32);
        } else {
            out.extend_from_slice(short);
        }
        start = i + ch.len_utf8();
    }
    out.extend_from_slice(&bytes[start..]);
    out.push(b'"');
}

fn write_unicode_escape(out: &mut Vec<u8>, code: u32) {
    out.extend_from_slice(b"\\u");
    for shift in [12, 8, 4, 0] {
        out.push(HEX[((code >> shift) & 0xf) as usize]);
    }
}
