//! Render-need detection.
//!
//! Inline markup renders differently depending on whether the caret touches
//! it, so moving the caret into or out of the one-character margin around a
//! span needs a render even though the tree did not change.

use log::trace;

use super::{EditError, EditorSession};
use crate::{
    models::{BlockKey, text::char_len},
    parsing::InlineToken,
};

impl EditorSession {
    /// Whether either cursor end sits within the halo of a markup span of `key`.
    pub fn check_need_render(&self, key: &BlockKey) -> Result<bool, EditError> {
        let text = &self.tree.block(key)?.text;
        let tokens = self.tokenizer.tokenize(text);
        let need = needs_render(
            &tokens,
            char_len(text),
            self.cursor.start.offset,
            self.cursor.end.offset,
        );
        trace!("render need for {key}: {need}");
        Ok(need)
    }
}

/// Halo test over already tokenized text.
///
/// Every non-text token `[s, e)` owns the inclusive halo
/// `[max(0, s - 1), min(len, e + 1)]`.
pub fn needs_render(tokens: &[InlineToken], text_len: usize, start: usize, end: usize) -> bool {
    tokens.iter().filter(|t| !t.is_text()).any(|t| {
        let halo = t.range.start.saturating_sub(1)..=(t.range.end + 1).min(text_len);
        halo.contains(&start) || halo.contains(&end)
    })
}
