//! Field tags and the naming policy that resolves them.
//!
//! A tag is either a bare JSON name (`"user_id,omitempty"`) or a struct-tag
//! string of `key:"value"` pairs (`name:"id" json:"user_id,omitempty"`).

/// Parsed key/value annotations of one record field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTag {
    entries: Vec<(String, String)>,
}

impl FieldTag {
    /// Parses either tag form. A bare string is taken as the `json` entry.
    /// Malformed struct-tag input stops parsing at the first bad byte and
    /// keeps the entries read so far.
    pub fn parse(tag: &str) -> FieldTag {
        let tag = tag.trim();
        if tag.is_empty() {
            return FieldTag::default();
        }
        if !tag.contains(":\"") {
            return FieldTag {
                entries: vec![("json".to_string(), tag.to_string())],
            };
        }
        let mut entries = Vec::new();
        let mut rest = tag;
        loop {
            rest = rest.trim_start();
            let Some(colon) = rest.find(':') else { break };
            let key = &rest[..colon];
            if key.is_empty() || key.bytes().any(|b| b <= b' ' || b == b'"') {
                break;
            }
            let Some(body) = rest[colon + 1..].strip_prefix('"') else {
                break;
            };
            let Some((value, tail)) = read_quoted(body) else { break };
            entries.push((key.to_string(), value));
            rest = tail;
        }
        FieldTag { entries }
    }

    /// Value of the first entry named `key`.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads up to the closing quote, unescaping `\"` and `\\`.
fn read_quoted(body: &str) -> Option<(String, &str)> {
    let mut value = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((value, &body[i + 1..])),
            '\\' => value.push(chars.next()?.1),
            c => value.push(c),
        }
    }
    None
}

/// Ordered list of tag keys consulted for a field's canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Naming<'a> {
    keys: &'a [&'a str],
}

/// Outcome of resolving a [`FieldTag`] under a [`Naming`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'t> {
    /// First non-empty name; empty when no consulted key names the field.
    pub name: &'t str,
    /// Set when any consulted entry carries the `omitempty` option.
    pub omitempty: bool,
}

impl Naming<'static> {
    /// `name`, then `json`.
    pub const DEFAULT: Naming<'static> = Naming {
        keys: &["name", "json"],
    };
}

impl<'a> Naming<'a> {
    pub const fn new(keys: &'a [&'a str]) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[&'a str] {
        self.keys
    }

    pub fn resolve<'t>(&self, tag: &'t FieldTag) -> Resolved<'t> {
        let mut resolved = Resolved {
            name: "",
            omitempty: false,
        };
        for key in self.keys {
            let Some(entry) = tag.lookup(key) else { continue };
            let mut parts = entry.split(',');
            let name = parts.next().unwrap_or_default().trim();
            if parts.any(|option| option.trim() == "omitempty") {
                resolved.omitempty = true;
            }
            if resolved.name.is_empty() {
                resolved.name = name;
            }
        }
        resolved
    }
}

impl Default for Naming<'static> {
    fn default() -> Self {
        Naming::DEFAULT
    }
}
