use log::debug;

use crate::{
    editing::{EditError, EditorSession},
    models::{Block, BlockKey, BlockType, ListType, text::char_len},
};

/// How a task item was placed relative to its original bullet list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPlacement {
    /// The item was the only one: the whole list became a task list.
    ConvertList,
    /// First item: moved into a new task list before the original.
    Before,
    /// Last item: moved into a new task list after the original.
    After,
    /// Interior item: the list was split into a bullet list of the preceding
    /// items and a task list, both before the original, which keeps the rest.
    Split,
}

impl EditorSession {
    /// Turn the bullet item holding `key` into a task item.
    ///
    /// A checkbox, ticked when `checked`, is inserted before the text, the
    /// marker is stripped and the item is moved into a task list. Order of every other item is kept.
    pub fn update_task_list_item(
        &mut self,
        key: &BlockKey,
        marker: &str,
        checked: bool,
    ) -> Result<TaskPlacement, EditError> {
        let rest = self.strip_marker(key, marker)?;
        let item = self
            .tree
            .parent_key(key)
            .filter(|p| self.tree.get(p).is_some_and(|b| b.ty == BlockType::ListItem))
            .cloned()
            .ok_or_else(|| EditError::MissingAncestor(key.clone(), "list item"))?;
        let list = self
            .tree
            .parent_key(&item)
            .cloned()
            .ok_or_else(|| EditError::MissingAncestor(item.clone(), "list"))?;

        let placement = if self.tree.is_only_child(&item) {
            TaskPlacement::ConvertList
        } else if self.tree.is_first_child(&item) {
            TaskPlacement::Before
        } else if self.tree.is_last_child(&item) {
            TaskPlacement::After
        } else {
            TaskPlacement::Split
        };
        debug!("task marker {marker:?} on {key}: {placement:?}");

        let mut checkbox = Block::new(BlockType::Checkbox);
        checkbox.checked = checked;
        let checkbox = self.tree.create(checkbox)?;
        self.tree.insert_before(&checkbox, key)?;
        self.tree.block_mut(key)?.text = rest;

        let loose = self.preferences.prefer_loose_list_item;
        let li = self.tree.block_mut(&item)?;
        li.list_item_type = Some(ListType::Task);
        li.is_loose_list_item = loose;

        match placement {
            TaskPlacement::ConvertList => {
                self.tree.block_mut(&list)?.list_type = Some(ListType::Task);
            }
            TaskPlacement::Before => {
                let task_list = self.tree.create(Block::list(ListType::Task))?;
                self.tree.insert_before(&task_list, &list)?;
                self.tree.detach(&item)?;
                self.tree.append_child(&task_list, &item)?;
            }
            TaskPlacement::After => {
                let task_list = self.tree.create(Block::list(ListType::Task))?;
                self.tree.insert_after(&task_list, &list)?;
                self.tree.detach(&item)?;
                self.tree.append_child(&task_list, &item)?;
            }
            TaskPlacement::Split => {
                let preceding: Vec<BlockKey> = self
                    .tree
                    .block(&list)?
                    .children()
                    .iter()
                    .take_while(|k| **k != item)
                    .cloned()
                    .collect();
                let bullet_list = self.tree.create(Block::list(ListType::Bullet))?;
                let task_list = self.tree.create(Block::list(ListType::Task))?;
                self.tree.insert_before(&bullet_list, &list)?;
                self.tree.insert_before(&task_list, &list)?;
                for sibling in &preceding {
                    self.tree.detach(sibling)?;
                    self.tree.append_child(&bullet_list, sibling)?;
                }
                self.tree.detach(&item)?;
                self.tree.append_child(&task_list, &item)?;
            }
        }

        self.rebase_cursor(key, char_len(marker))?;
        Ok(placement)
    }
}
