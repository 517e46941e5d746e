//! # Markup Trigger Detection
//!
//! Decides which markdown line prefix a block's text now starts with.
//!
//! All prefixes are tried as one combined, case-insensitive alternation so the
//! leftmost-first match selects exactly one rule. `"* * *"` is therefore a
//! bullet marker followed by `* *`, while `"***"` is a thematic break.
//!
//! Context-dependent guards (a task marker only counts inside a bullet list
//! item) are applied by the caller; everything here is pure.

use std::sync::OnceLock;

use regex::Regex;

/// Outcome of classifying one line of block text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A run of one repeated `*`, `-` or `_` (three or more, spaces allowed).
    ThematicBreak { marker: String },
    /// `* `, `+ ` or `- `.
    Bullet { marker: String },
    /// `[ ] ` or `[x] ` (either case).
    Task { marker: String, checked: bool },
    /// `1. `, `42. `...
    Order { marker: String },
    /// ATX heading with up to three spaces of indent.
    Heading { level: u8 },
    /// `>` followed by at least one character.
    BlockQuote,
    /// Nothing matched, or a matched rule failed its guard.
    Plain,
}

impl Trigger {
    /// The literal prefix a structural transform strips, if any.
    pub fn marker(&self) -> Option<&str> {
        match self {
            Trigger::ThematicBreak { marker }
            | Trigger::Bullet { marker }
            | Trigger::Task { marker, .. }
            | Trigger::Order { marker } => Some(marker),
            Trigger::BlockQuote => Some(BLOCK_QUOTE_PREFIX),
            Trigger::Heading { .. } | Trigger::Plain => None,
        }
    }
}

pub const BLOCK_QUOTE_PREFIX: &str = ">";

const BULLET: &str = r"(?P<bullet>[*+-]\s)";
const TASK: &str = r"(?P<task>\[[x\s]\]\s)";
const ORDER: &str = r"(?P<order>[0-9]+\.\s)";
const HEADING: &str = r"\s{0,3}(?P<heading>#{1,6})[^#]+";
const BLOCK_QUOTE: &str = r"(?P<quote>>).+";
const THEMATIC_BREAK: &str =
    r"\s{0,3}(?P<hr>(?:\*\s*\*\s*\*|-\s*-\s*-|_\s*_\s*_)[\s*\-_]*)$";

fn trigger_regex() -> &'static Regex {
    static TRIGGER_REGEX: OnceLock<Regex> = OnceLock::new();
    TRIGGER_REGEX.get_or_init(|| {
        let pattern = format!(
            "(?i)^(?:{BULLET}|{TASK}|{ORDER}|{HEADING}|{BLOCK_QUOTE}|{THEMATIC_BREAK})"
        );
        Regex::new(&pattern).expect("Invalid trigger regex")
    })
}

/// Classify `text` against the block-level markdown prefixes.
pub fn classify(text: &str) -> Trigger {
    let Some(caps) = trigger_regex().captures(text) else {
        return Trigger::Plain;
    };
    let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

    if let Some(marker) = group("hr") {
        return if is_single_rule_char(&marker) {
            Trigger::ThematicBreak { marker }
        } else {
            Trigger::Plain
        };
    }
    if let Some(marker) = group("bullet") {
        return Trigger::Bullet { marker };
    }
    if let Some(marker) = group("task") {
        let checked = is_checked_task_marker(&marker);
        return Trigger::Task { marker, checked };
    }
    if let Some(marker) = group("order") {
        return Trigger::Order { marker };
    }
    if let Some(hashes) = caps.name("heading") {
        // `#{1,6}` bounds the length
        return Trigger::Heading {
            level: hashes.as_str().len() as u8,
        };
    }
    if caps.name("quote").is_some() {
        return Trigger::BlockQuote;
    }
    Trigger::Plain
}

/// A thematic break must repeat a single character; `*-*` is not one.
fn is_single_rule_char(run: &str) -> bool {
    let mut chars = run.chars().filter(|c| !c.is_whitespace());
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}

/// `[x] ` and `[X] ` mark a completed task.
fn is_checked_task_marker(marker: &str) -> bool {
    marker.to_ascii_lowercase().starts_with("[x]")
}
