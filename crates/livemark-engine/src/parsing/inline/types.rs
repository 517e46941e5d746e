use std::ops::Range;

use serde::Serialize;

/// Kind of an inline span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Plain text between constructs.
    Text,
    /// `` `code` `` - a raw zone.
    CodeSpan,
    /// `$math$` - a raw zone.
    InlineMath,
    /// `[[target]]` or `[[target|alias]]`.
    WikiLink,
    /// `![alt](src)`.
    Image,
    /// `[text](href)`.
    Link,
    /// `**strong**` or `__strong__`.
    Strong,
    /// `*em*` or `_em_`.
    Emphasis,
    /// `~~del~~`.
    Strikethrough,
}

/// A typed span `[start, end)` in character offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineToken {
    pub kind: TokenKind,
    pub range: Range<usize>,
}

impl InlineToken {
    pub fn new(kind: TokenKind, range: Range<usize>) -> Self {
        Self { kind, range }
    }

    pub fn is_text(&self) -> bool {
        self.kind == TokenKind::Text
    }
}

/// Segments one line of text into typed inline spans.
///
/// Implementations must be pure: the same text always yields the same tokens.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<InlineToken>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<InlineToken>,
{
    fn tokenize(&self, text: &str) -> Vec<InlineToken> {
        self(text)
    }
}
