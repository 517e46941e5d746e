//! # Inline Kinds
//!
//! Inline-specific types that own their syntax delimiters. The parser calls
//! these constants; it never hardcodes `[[` or `` ` ``.

pub mod code_span;
pub mod emphasis;
pub mod link;
pub mod wikilink;

pub use code_span::{CodeSpan, InlineMath};
pub use emphasis::{Emphasis, Strikethrough, Strong};
pub use link::{Image, Link};
pub use wikilink::WikiLink;
