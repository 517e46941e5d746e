//! Pure text analysis: block-prefix classification and inline tokenizing.

pub mod inline;
pub mod trigger;

pub use inline::{InlineToken, InlineTokenizer, TokenKind, Tokenizer};
pub use trigger::{Trigger, classify};
