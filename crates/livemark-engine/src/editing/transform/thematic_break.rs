use log::debug;

use crate::{
    editing::{EditError, EditorSession},
    models::{BlockKey, BlockType, text::char_len},
};

impl EditorSession {
    /// Turn `key` into a thematic break. The rule text is consumed entirely.
    pub fn update_hr(&mut self, key: &BlockKey, marker: &str) -> Result<(), EditError> {
        let block = self.tree.block_mut(key)?;
        if !block.text.trim_start().starts_with(marker) {
            return Err(EditError::MarkerMismatch {
                key: key.clone(),
                text: block.text.clone(),
                marker: marker.to_string(),
            });
        }
        block.ty = BlockType::ThematicBreak;
        block.text.clear();
        debug!("block {key} became a thematic break");

        self.rebase_cursor(key, char_len(marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::transform::test_support::*;
    use crate::models::{Block, BlockTree, Cursor};
    use crate::parsing::{Trigger, classify};
    use pretty_assertions::assert_eq;

    #[test]
    fn stars_become_a_rule() {
        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, "***"))
            .unwrap();
        let mut session = session_at(tree, tight(), &key, 3);

        assert!(session.check_inline_update(&key).unwrap());

        let block = session.tree().get(&key).unwrap();
        assert_eq!(block.ty, BlockType::ThematicBreak);
        assert_eq!(block.text, "");
        assert_eq!(session.cursor(), &Cursor::caret(key, 0));
    }

    #[test]
    fn mixed_rule_characters_stay_a_paragraph() {
        assert_eq!(classify("*-*"), Trigger::Plain);

        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, "*-*"))
            .unwrap();
        let mut session = session_at(tree, tight(), &key, 3);

        assert!(!session.check_inline_update(&key).unwrap());
        assert_eq!(session.tree().get(&key).unwrap().ty, BlockType::Paragraph);
    }

    #[test]
    fn indented_rule_is_accepted() {
        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, "  - - -"))
            .unwrap();
        let mut session = session(tree, tight());

        session.update_hr(&key, "- - -").unwrap();

        assert_eq!(session.tree().get(&key).unwrap().ty, BlockType::ThematicBreak);
    }

    #[test]
    fn wrong_marker_is_rejected() {
        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, "text"))
            .unwrap();
        let mut session = session(tree, tight());

        assert!(matches!(
            session.update_hr(&key, "***"),
            Err(EditError::MarkerMismatch { .. })
        ));
    }
}
