//! # Inline Tokenizing
//!
//! Cursor-based inline segmentation with explicit raw zones.
//!
//! The engine only needs token *boundaries* (to decide whether the caret sits
//! next to markup), so this tokenizer reports top-level constructs without
//! nesting. Hosts with a richer tokenizer plug it in through [`Tokenizer`].
//!
//! ## Modules
//!
//! - **`types`**: `InlineToken`, `TokenKind`, and the `Tokenizer` trait
//! - **`kinds`**: Inline-specific types with owned delimiters
//! - **`cursor`**: `Cursor` for character-by-character parsing
//! - **`parser`**: `parse_inline()` entry point and `InlineTokenizer`
//!
//! ## Raw Zone Precedence
//!
//! Code spans and inline math take precedence: `` `[[not a link]]` `` is a
//! single code span, not text containing a wikilink.

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::{InlineTokenizer, parse_inline};
pub use types::{InlineToken, TokenKind, Tokenizer};
