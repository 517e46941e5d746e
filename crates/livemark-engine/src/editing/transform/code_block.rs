use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::{
    editing::{EditError, EditorSession},
    models::{BlockKey, BlockType, FunctionType},
};

fn fence_regex() -> &'static Regex {
    static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();
    // a backtick fence's info string cannot itself contain backticks
    FENCE_REGEX.get_or_init(|| Regex::new(r"^`{3,}([^`]*)$").expect("Invalid fence regex"))
}

impl EditorSession {
    /// Finalize a paragraph that opens a code fence when focus leaves it.
    ///
    /// ```` ```rust ```` becomes an empty fenced `pre` with `lang = "rust"`.
    /// Inline spans resolve to their enclosing block. Returns `true` when the
    /// block was converted.
    pub fn code_block_update(&mut self, key: &BlockKey) -> Result<bool, EditError> {
        let block = self.tree.block(key)?;
        let key = match block.ty {
            BlockType::Span => self
                .tree
                .parent_key(key)
                .cloned()
                .ok_or_else(|| EditError::MissingAncestor(key.clone(), "block"))?,
            _ => key.clone(),
        };

        let block = self.tree.block_mut(&key)?;
        if block.ty != BlockType::Paragraph {
            return Ok(false);
        }
        let Some(caps) = fence_regex().captures(&block.text) else {
            return Ok(false);
        };
        let lang = caps[1].trim().to_string();

        debug!("block {key} opened a fence with lang {lang:?}");
        block.ty = BlockType::Pre;
        block.function_type = Some(FunctionType::FenceCode);
        block.lang = (!lang.is_empty()).then_some(lang);
        block.text.clear();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::transform::test_support::*;
    use crate::models::{Block, BlockTree};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("```rust", Some("rust"))]
    #[case("````  js ", Some("js"))]
    #[case("```", None)]
    fn fence_opener_becomes_code_block(#[case] text: &str, #[case] lang: Option<&str>) {
        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, text))
            .unwrap();
        let mut session = session(tree, tight());

        assert!(session.code_block_update(&key).unwrap());

        let block = session.tree().get(&key).unwrap();
        assert_eq!(block.ty, BlockType::Pre);
        assert_eq!(block.function_type, Some(FunctionType::FenceCode));
        assert_eq!(block.lang.as_deref(), lang);
        assert_eq!(block.text, "");
    }

    #[rstest]
    #[case("``two ticks")]
    #[case("text ```")]
    #[case("```a```")]
    #[case("```rust `x`")]
    fn other_text_is_left_alone(#[case] text: &str) {
        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, text))
            .unwrap();
        let mut session = session(tree, tight());

        assert!(!session.code_block_update(&key).unwrap());
        assert_eq!(session.tree().get(&key).unwrap().text, text);
    }

    #[test]
    fn span_resolves_to_enclosing_paragraph() {
        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, "```toml"))
            .unwrap();
        let span = tree.push_child(&key, Block::new(BlockType::Span)).unwrap();
        let mut session = session(tree, tight());

        assert!(session.code_block_update(&span).unwrap());
        assert_eq!(session.tree().get(&key).unwrap().lang.as_deref(), Some("toml"));
    }
}
