/// A cursor for character-by-character inline parsing.
///
/// Works over a pre-split character slice so every position it reports is a
/// character offset, the unit the editor cursor uses.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The characters being parsed.
    pub chars: &'a [char],
    /// Current index into `chars`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `chars`.
    pub fn new(chars: &'a [char]) -> Self {
        Self { chars, i: 0 }
    }

    /// Returns the current character offset.
    pub fn pos(&self) -> usize {
        self.i
    }

    /// Returns true if at end of input.
    pub fn eof(&self) -> bool {
        self.i >= self.chars.len()
    }

    /// Peeks at the current character without advancing.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.i).copied()
    }

    /// Peeks `n` characters ahead of the current one.
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.i + n).copied()
    }

    /// Checks if the remaining input starts with `pat`.
    pub fn starts_with(&self, pat: &[char]) -> bool {
        self.chars.get(self.i..).is_some_and(|rest| rest.starts_with(pat))
    }

    /// Advances by one character, returning the consumed character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.i).copied()?;
        self.i += 1;
        Some(c)
    }

    /// Advances by `n` characters.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Offset of the next occurrence of `pat` at or after `from`.
    pub fn find_from(&self, from: usize, pat: &[char]) -> Option<usize> {
        if pat.is_empty() || from > self.chars.len() {
            return None;
        }
        self.chars[from..]
            .windows(pat.len())
            .position(|w| w == pat)
            .map(|idx| from + idx)
    }
}
