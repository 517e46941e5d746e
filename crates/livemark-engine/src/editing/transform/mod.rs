//! # Structural Transforms
//!
//! [`EditorSession::check_inline_update`] classifies a block's text and
//! dispatches to exactly one structural operation. Every operation that
//! consumes a marker rebases the cursor by the marker's length and points it
//! at the block that now holds the remaining text.
//!
//! Operations validate and build their replacement blocks before linking
//! anything, so an invariant violation is reported before the visible tree
//! changes.

mod block_quote;
mod code_block;
mod list;
mod task;
mod thematic_break;

use log::debug;

use super::{EditError, EditorSession};
use crate::{
    models::{BlockKey, BlockType, ListType},
    parsing::{Trigger, classify},
};

pub use list::{ListKind, ListMerge};
pub use task::TaskPlacement;

impl EditorSession {
    /// Re-derive the type of `key` from its text.
    ///
    /// Returns `true` when the tree was mutated and a render is owed. Table
    /// parts, figures, thematic breaks, code blocks and containers are never
    /// reclassified.
    pub fn check_inline_update(&mut self, key: &BlockKey) -> Result<bool, EditError> {
        let block = self.tree.block(key)?;
        if block.ty.is_table_or_figure()
            || matches!(
                block.ty,
                BlockType::ThematicBreak | BlockType::Pre | BlockType::Code | BlockType::Checkbox
            )
            || block.has_children()
        {
            return Ok(false);
        }

        let trigger = match classify(&block.text) {
            Trigger::Task { .. } if !self.parent_is_bullet_item(key) => Trigger::Plain,
            trigger => trigger,
        };
        debug!("block {key} classified as {trigger:?}");

        match trigger {
            Trigger::ThematicBreak { marker } => {
                self.update_hr(key, &marker)?;
                Ok(true)
            }
            Trigger::Bullet { marker } => {
                self.update_list(key, ListKind::Bullet, &marker)?;
                Ok(true)
            }
            Trigger::Task { marker, checked } => {
                self.update_task_list_item(key, &marker, checked)?;
                Ok(true)
            }
            Trigger::Order { marker } => {
                self.update_list(key, ListKind::Order, &marker)?;
                Ok(true)
            }
            Trigger::Heading { level } => self.retype(key, BlockType::Heading(level)),
            Trigger::BlockQuote => {
                self.update_block_quote(key)?;
                Ok(true)
            }
            Trigger::Plain => self.retype(key, BlockType::Paragraph),
        }
    }

    /// Only a bullet list item's text can become a task item.
    fn parent_is_bullet_item(&self, key: &BlockKey) -> bool {
        self.tree
            .parent(key)
            .is_some_and(|p| p.list_item_type == Some(ListType::Bullet))
    }

    fn retype(&mut self, key: &BlockKey, ty: BlockType) -> Result<bool, EditError> {
        let block = self.tree.block_mut(key)?;
        if block.ty == ty {
            return Ok(false);
        }
        debug!("block {key}: {} -> {ty}", block.ty);
        block.ty = ty;
        Ok(true)
    }

    /// The text of `key` with `marker` removed from the front.
    fn strip_marker(&self, key: &BlockKey, marker: &str) -> Result<String, EditError> {
        let text = &self.tree.block(key)?.text;
        text.strip_prefix(marker)
            .map(str::to_string)
            .ok_or_else(|| EditError::MarkerMismatch {
                key: key.clone(),
                text: text.clone(),
                marker: marker.to_string(),
            })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::editing::{EditorSession, Preferences};
    use crate::models::{Block, BlockKey, BlockTree, BlockType, Cursor, ListType};

    pub fn tight() -> Preferences {
        Preferences {
            prefer_loose_list_item: false,
            ..Preferences::default()
        }
    }

    pub fn session(tree: BlockTree, preferences: Preferences) -> EditorSession {
        EditorSession::new(tree, preferences).unwrap()
    }

    /// Session whose caret sits at `offset` in `key`.
    pub fn session_at(
        tree: BlockTree,
        preferences: Preferences,
        key: &BlockKey,
        offset: usize,
    ) -> EditorSession {
        let mut session = session(tree, preferences);
        session.set_cursor(Cursor::caret(key.clone(), offset)).unwrap();
        session
    }

    /// Root list container with one `li > p` per text.
    pub fn list(tree: &mut BlockTree, kind: ListType, loose: bool, items: &[&str]) -> BlockKey {
        let list = tree.push_root(Block::list(kind)).unwrap();
        for text in items {
            let item = tree.push_child(&list, Block::list_item(kind, loose)).unwrap();
            tree.push_child(&item, Block::with_text(BlockType::Paragraph, *text))
                .unwrap();
        }
        list
    }

    /// Key of the paragraph inside the `idx`-th item of `list`.
    pub fn item_text_key(tree: &BlockTree, list: &BlockKey, idx: usize) -> BlockKey {
        let item = &tree.get(list).unwrap().children()[idx];
        tree.get(item).unwrap().children()[0].clone()
    }
}
