use log::debug;

use crate::{
    editing::{EditError, EditorSession},
    models::{Block, BlockKey, BlockType},
    parsing::trigger::BLOCK_QUOTE_PREFIX,
};

impl EditorSession {
    /// Turn `key` into a blockquote wrapping a paragraph with the quoted text.
    ///
    /// The new paragraph's text is trimmed, so the caret is clamped into it.
    pub fn update_block_quote(&mut self, key: &BlockKey) -> Result<BlockKey, EditError> {
        let quoted = self.strip_marker(key, BLOCK_QUOTE_PREFIX)?.trim().to_string();
        let paragraph = self.tree.create(Block::with_text(BlockType::Paragraph, quoted))?;

        let block = self.tree.block_mut(key)?;
        block.ty = BlockType::BlockQuote;
        block.text.clear();
        self.tree.append_child(key, &paragraph)?;
        debug!("block {key} quoted into {paragraph}");

        self.rebase_cursor(&paragraph, 1)?;
        Ok(paragraph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::transform::test_support::*;
    use crate::models::{BlockTree, Cursor};
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_text_in_quoted_paragraph() {
        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, ">quote"))
            .unwrap();
        let mut session = session_at(tree, tight(), &key, 6);

        let paragraph = session.update_block_quote(&key).unwrap();

        assert_eq!(session.cursor(), &Cursor::caret(paragraph, 5));
        session.tree().check_invariants().unwrap();
        insta::assert_snapshot!(session.tree().outline(), @r#"
        blockquote
          p "quote"
        "#);
    }

    #[test]
    fn caret_is_clamped_after_trimming() {
        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, ">  hi  "))
            .unwrap();
        let mut session = session_at(tree, tight(), &key, 7);

        let paragraph = session.update_block_quote(&key).unwrap();

        assert_eq!(session.tree().get(&paragraph).unwrap().text, "hi");
        assert_eq!(session.cursor(), &Cursor::caret(paragraph, 2));
    }

    #[test]
    fn caret_before_marker_floors_at_zero() {
        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, "> a"))
            .unwrap();
        let mut session = session_at(tree, tight(), &key, 0);

        let paragraph = session.update_block_quote(&key).unwrap();

        assert_eq!(session.cursor(), &Cursor::caret(paragraph, 0));
    }
}
