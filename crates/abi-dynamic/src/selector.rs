//! Sequence key selectors: `@length`, `@first`, `@last`, and decimal indexes.

pub const LENGTH: &str = "@length";
pub const FIRST: &str = "@first";
pub const LAST: &str = "@last";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Length,
    Index(usize),
}

/// Resolves `key` against a sequence of `len` elements.
///
/// `None` when the key is not a selector or the index falls outside the
/// sequence; `@first` and `@last` on an empty sequence are absent too.
pub fn resolve(key: &str, len: usize) -> Option<Selector> {
    match key {
        LENGTH => Some(Selector::Length),
        FIRST => (len > 0).then_some(Selector::Index(0)),
        LAST => len.checked_sub(1).map(Selector::Index),
        _ => key
            .parse::<usize>()
            .ok()
            .filter(|&i| i < len)
            .map(Selector::Index),
    }
}
