use super::{
    cursor::Cursor,
    kinds::{CodeSpan, Emphasis, Image, InlineMath, Link, Strikethrough, Strong, WikiLink},
    types::{InlineToken, TokenKind, Tokenizer},
};

/// The bundled tokenizer used when the host does not supply its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineTokenizer;

impl Tokenizer for InlineTokenizer {
    fn tokenize(&self, text: &str) -> Vec<InlineToken> {
        parse_inline(text)
    }
}

/// Segments `s` into a flat sequence of [`InlineToken`]s.
///
/// # Precedence
/// Raw zones (code spans, inline math) are tried first and suppress all other
/// parsing inside them, then wikilinks, images, links, and finally the paired
/// emphasis delimiters. Only top-level constructs are reported.
///
/// # Returns
/// Tokens covering the entire input. Text between constructs is emitted as
/// [`TokenKind::Text`]. Unclosed openers are text.
pub fn parse_inline(s: &str) -> Vec<InlineToken> {
    let chars: Vec<char> = s.chars().collect();
    let mut cur = Cursor::new(&chars);
    let mut out = vec![];
    let mut text_start = cur.pos();

    // Helper to flush accumulated text as a Text token
    fn flush_text(out: &mut Vec<InlineToken>, start: usize, end: usize) {
        if end > start {
            out.push(InlineToken::new(TokenKind::Text, start..end));
        }
    }

    while !cur.eof() {
        if let Some(token) = try_parse_construct(&mut cur) {
            flush_text(&mut out, text_start, token.range.start);
            text_start = token.range.end;
            out.push(token);
            continue;
        }
        cur.bump();
    }

    flush_text(&mut out, text_start, cur.pos());
    out
}

fn try_parse_construct(cur: &mut Cursor<'_>) -> Option<InlineToken> {
    if let Some(token) = try_parse_raw_zone(cur, CodeSpan::TICK, TokenKind::CodeSpan) {
        return Some(token);
    }
    if let Some(token) = try_parse_raw_zone(cur, InlineMath::DOLLAR, TokenKind::InlineMath) {
        return Some(token);
    }
    if let Some(token) = try_parse_wikilink(cur) {
        return Some(token);
    }
    if let Some(token) = try_parse_link(cur) {
        return Some(token);
    }
    let delimited = [
        (Strong::STARS, TokenKind::Strong),
        (Strong::UNDERSCORES, TokenKind::Strong),
        (Strikethrough::TILDES, TokenKind::Strikethrough),
        (Emphasis::STAR, TokenKind::Emphasis),
        (Emphasis::UNDERSCORE, TokenKind::Emphasis),
    ];
    delimited
        .into_iter()
        .find_map(|(delim, kind)| try_parse_delimited(cur, delim, kind))
}

/// Code spans and inline math: everything up to the matching delimiter is opaque.
///
/// On failure, cursor position is restored.
fn try_parse_raw_zone(cur: &mut Cursor<'_>, delim: char, kind: TokenKind) -> Option<InlineToken> {
    if cur.peek() != Some(delim) {
        return None;
    }
    let start = cur.pos();
    let close = cur.find_from(start + 1, &[delim])?;
    if kind == TokenKind::InlineMath && close == start + 1 {
        return None;
    }
    cur.bump_n(close + 1 - start);
    Some(InlineToken::new(kind, start..cur.pos()))
}

/// Handles both `[[target]]` and `[[target|alias]]` forms.
fn try_parse_wikilink(cur: &mut Cursor<'_>) -> Option<InlineToken> {
    if !cur.starts_with(WikiLink::OPEN) {
        return None;
    }
    let start = cur.pos();
    let close = cur.find_from(start + WikiLink::OPEN.len(), WikiLink::CLOSE)?;
    if close == start + WikiLink::OPEN.len() {
        return None;
    }
    cur.bump_n(close + WikiLink::CLOSE.len() - start);
    Some(InlineToken::new(TokenKind::WikiLink, start..cur.pos()))
}

/// `[text](href)`, optionally prefixed with `!` for an image.
fn try_parse_link(cur: &mut Cursor<'_>) -> Option<InlineToken> {
    let (kind, open_len) = match (cur.peek(), cur.peek_at(1)) {
        (Some(Image::BANG), Some(Link::OPEN)) => (TokenKind::Image, 2),
        (Some(Link::OPEN), _) => (TokenKind::Link, 1),
        _ => return None,
    };
    let start = cur.pos();
    let middle = cur.find_from(start + open_len, Link::MIDDLE)?;
    let close = cur.find_from(middle + Link::MIDDLE.len(), &[Link::CLOSE])?;
    cur.bump_n(close + 1 - start);
    Some(InlineToken::new(kind, start..cur.pos()))
}

/// Paired emphasis delimiters.
///
/// The content must be non-empty and must not start or end with whitespace,
/// so `a * b * c` stays text.
fn try_parse_delimited(
    cur: &mut Cursor<'_>,
    delim: &[char],
    kind: TokenKind,
) -> Option<InlineToken> {
    if !cur.starts_with(delim) {
        return None;
    }
    let start = cur.pos();
    let inner_start = start + delim.len();
    if cur.chars.get(inner_start).is_none_or(|c| c.is_whitespace()) {
        return None;
    }

    let mut from = inner_start + 1;
    let close = loop {
        let candidate = cur.find_from(from, delim)?;
        if !cur.chars[candidate - 1].is_whitespace() {
            break candidate;
        }
        from = candidate + 1;
    };
    cur.bump_n(close + delim.len() - start);
    Some(InlineToken::new(kind, start..cur.pos()))
}
