/// `[[target]]`; an alias after `|` stays inside the token.
pub struct WikiLink;

impl WikiLink {
    pub const OPEN: &'static [char] = &['[', '['];
    pub const CLOSE: &'static [char] = &[']', ']'];
}
