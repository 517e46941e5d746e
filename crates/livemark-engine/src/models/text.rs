//! Character-offset helpers.
//!
//! Cursor offsets count Unicode scalar values, never bytes, so every slice
//! of block text goes through these functions.

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the `offset`-th character, clamped to the end of `s`.
pub fn byte_index(s: &str, offset: usize) -> usize {
    s.char_indices().nth(offset).map_or(s.len(), |(i, _)| i)
}

/// Everything before character `offset`.
pub fn prefix(s: &str, offset: usize) -> &str {
    &s[..byte_index(s, offset)]
}

/// Everything from character `offset` on.
pub fn suffix(s: &str, offset: usize) -> &str {
    &s[byte_index(s, offset)..]
}

/// The character at `offset`, if any.
pub fn char_at(s: &str, offset: usize) -> Option<char> {
    s.chars().nth(offset)
}

/// Insert `ch` before character `offset`.
pub fn insert_char(s: &str, offset: usize, ch: char) -> String {
    let idx = byte_index(s, offset);
    let mut out = String::with_capacity(s.len() + ch.len_utf8());
    out.push_str(&s[..idx]);
    out.push(ch);
    out.push_str(&s[idx..]);
    out
}
