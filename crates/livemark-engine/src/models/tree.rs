//! # Block Tree
//!
//! The persistent in-memory document: a forest of [`Block`]s owned by one
//! registry keyed by [`BlockKey`].
//!
//! ## Ownership model
//!
//! - The registry is the single source of truth for lookup.
//! - Children are ordered key lists; a block has at most one parent.
//! - The parent key stored on each block is updated in the same call as
//!   every link and unlink, so it can never drift from the children lists.
//! - Freshly created blocks are registered but detached. They must be linked
//!   before the operation that created them returns (see
//!   [`BlockTree::check_invariants`]).
//! - Moving a block is always `detach` followed by a link call. Linking a block
//!   that is still attached somewhere is rejected.

use std::collections::HashMap;
use std::fmt::Write as _;

use thiserror::Error;

use super::block::{Block, BlockKey};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("block {0} is not registered")]
    UnknownKey(BlockKey),
    #[error("block {0} is already registered")]
    DuplicateKey(BlockKey),
    #[error("block {0} is already attached to the tree")]
    AlreadyAttached(BlockKey),
    #[error("block {0} is not attached to the tree")]
    Detached(BlockKey),
    #[error("container {0} has no children")]
    EmptyContainer(BlockKey),
    #[error("block {0} cannot be linked inside its own subtree")]
    Cycle(BlockKey),
    #[error("block {0} is registered but unreachable from the roots")]
    Unreachable(BlockKey),
    #[error("block {child} records parent {recorded:?} but is linked under {actual:?}")]
    ParentMismatch {
        child: BlockKey,
        recorded: Option<BlockKey>,
        actual: Option<BlockKey>,
    },
}

/// Registry plus owning tree of blocks.
#[derive(Debug, Default, Clone)]
pub struct BlockTree {
    blocks: HashMap<BlockKey, Block>,
    roots: Vec<BlockKey>,
}

impl BlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a detached block and return its key.
    pub fn create(&mut self, mut block: Block) -> Result<BlockKey, TreeError> {
        let key = block.key.clone();
        if self.blocks.contains_key(&key) {
            return Err(TreeError::DuplicateKey(key));
        }
        block.parent = None;
        block.children.clear();
        self.blocks.insert(key.clone(), block);
        Ok(key)
    }

    /// Register a block and append it as the last top-level block.
    pub fn push_root(&mut self, block: Block) -> Result<BlockKey, TreeError> {
        let key = self.create(block)?;
        self.append_root(&key)?;
        Ok(key)
    }

    /// Register a block and append it as the last child of `parent`.
    pub fn push_child(&mut self, parent: &BlockKey, block: Block) -> Result<BlockKey, TreeError> {
        let key = self.create(block)?;
        self.append_child(parent, &key)?;
        Ok(key)
    }

    pub fn get(&self, key: &BlockKey) -> Option<&Block> {
        self.blocks.get(key)
    }

    pub fn get_mut(&mut self, key: &BlockKey) -> Option<&mut Block> {
        self.blocks.get_mut(key)
    }

    /// Lookup that treats a missing key as an invariant violation.
    pub fn block(&self, key: &BlockKey) -> Result<&Block, TreeError> {
        self.blocks
            .get(key)
            .ok_or_else(|| TreeError::UnknownKey(key.clone()))
    }

    pub fn block_mut(&mut self, key: &BlockKey) -> Result<&mut Block, TreeError> {
        self.blocks
            .get_mut(key)
            .ok_or_else(|| TreeError::UnknownKey(key.clone()))
    }

    pub fn contains(&self, key: &BlockKey) -> bool {
        self.blocks.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn roots(&self) -> &[BlockKey] {
        &self.roots
    }

    pub fn is_attached(&self, key: &BlockKey) -> bool {
        match self.blocks.get(key) {
            Some(block) => block.parent.is_some() || self.roots.contains(key),
            None => false,
        }
    }

    pub fn parent_key(&self, key: &BlockKey) -> Option<&BlockKey> {
        self.blocks.get(key)?.parent.as_ref()
    }

    pub fn parent(&self, key: &BlockKey) -> Option<&Block> {
        self.blocks.get(self.parent_key(key)?)
    }

    pub fn prev_sibling(&self, key: &BlockKey) -> Option<&Block> {
        let siblings = self.siblings(key).ok()?;
        let idx = siblings.iter().position(|k| k == key)?;
        let prev = siblings.get(idx.checked_sub(1)?)?;
        self.blocks.get(prev)
    }

    pub fn next_sibling(&self, key: &BlockKey) -> Option<&Block> {
        let siblings = self.siblings(key).ok()?;
        let idx = siblings.iter().position(|k| k == key)?;
        self.blocks.get(siblings.get(idx + 1)?)
    }

    pub fn first_child(&self, key: &BlockKey) -> Option<&Block> {
        self.blocks.get(self.blocks.get(key)?.children.first()?)
    }

    pub fn is_only_child(&self, key: &BlockKey) -> bool {
        self.siblings(key).is_ok_and(|s| s.len() == 1)
    }

    pub fn is_first_child(&self, key: &BlockKey) -> bool {
        self.siblings(key).is_ok_and(|s| s.first() == Some(key))
    }

    pub fn is_last_child(&self, key: &BlockKey) -> bool {
        self.siblings(key).is_ok_and(|s| s.last() == Some(key))
    }

    /// True when `ancestor` lies on the parent chain of `key`.
    pub fn is_ancestor(&self, ancestor: &BlockKey, key: &BlockKey) -> bool {
        let mut current = self.parent_key(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.parent_key(k);
        }
        false
    }

    pub fn append_root(&mut self, key: &BlockKey) -> Result<(), TreeError> {
        self.ensure_linkable(key, None)?;
        self.roots.push(key.clone());
        Ok(())
    }

    pub fn append_child(&mut self, parent: &BlockKey, child: &BlockKey) -> Result<(), TreeError> {
        self.ensure_linkable(child, Some(parent))?;
        self.block_mut(parent)?.children.push(child.clone());
        self.block_mut(child)?.parent = Some(parent.clone());
        Ok(())
    }

    /// Link `new` as the sibling immediately before `reference`.
    pub fn insert_before(&mut self, new: &BlockKey, reference: &BlockKey) -> Result<(), TreeError> {
        self.insert_beside(new, reference, 0)
    }

    /// Link `new` as the sibling immediately after `reference`.
    pub fn insert_after(&mut self, new: &BlockKey, reference: &BlockKey) -> Result<(), TreeError> {
        self.insert_beside(new, reference, 1)
    }

    /// Unlink a block from its parent (or the roots). It stays registered.
    pub fn detach(&mut self, key: &BlockKey) -> Result<(), TreeError> {
        let parent = self.block(key)?.parent.clone();
        match parent {
            Some(parent) => {
                self.block_mut(&parent)?.children.retain(|k| k != key);
                self.block_mut(key)?.parent = None;
            }
            None => {
                let idx = self
                    .roots
                    .iter()
                    .position(|k| k == key)
                    .ok_or_else(|| TreeError::Detached(key.clone()))?;
                self.roots.remove(idx);
            }
        }
        Ok(())
    }

    /// Unlink a block and deregister it together with its whole subtree.
    pub fn remove(&mut self, key: &BlockKey) -> Result<Block, TreeError> {
        if self.is_attached(key) {
            self.detach(key)?;
        }
        let mut stack = self.block(key)?.children.clone();
        while let Some(k) = stack.pop() {
            if let Some(child) = self.blocks.remove(&k) {
                stack.extend(child.children);
            }
        }
        self.blocks
            .remove(key)
            .ok_or_else(|| TreeError::UnknownKey(key.clone()))
    }

    /// All reachable keys in document (pre-)order.
    pub fn preorder(&self) -> Vec<BlockKey> {
        let mut out = Vec::with_capacity(self.blocks.len());
        let mut stack: Vec<&BlockKey> = self.roots.iter().rev().collect();
        while let Some(key) = stack.pop() {
            out.push(key.clone());
            if let Some(block) = self.blocks.get(key) {
                stack.extend(block.children.iter().rev());
            }
        }
        out
    }

    /// Verify that every registered block is reachable exactly once and that
    /// recorded parent keys agree with the children lists.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        let mut seen: HashMap<&BlockKey, Option<&BlockKey>> = HashMap::new();
        let mut stack: Vec<(&BlockKey, Option<&BlockKey>)> =
            self.roots.iter().map(|k| (k, None)).collect();
        while let Some((key, actual_parent)) = stack.pop() {
            let block = self.block(key)?;
            if seen.insert(key, actual_parent).is_some() {
                return Err(TreeError::Cycle(key.clone()));
            }
            if block.parent.as_ref() != actual_parent {
                return Err(TreeError::ParentMismatch {
                    child: key.clone(),
                    recorded: block.parent.clone(),
                    actual: actual_parent.cloned(),
                });
            }
            stack.extend(block.children.iter().map(|c| (c, Some(key))));
        }
        match self.blocks.keys().find(|k| !seen.contains_key(k)) {
            Some(orphan) => Err(TreeError::Unreachable(orphan.clone())),
            None => Ok(()),
        }
    }

    /// Deterministic indented dump of the reachable tree.
    ///
    /// One line per block: tag, list attributes, then the quoted text when non-empty.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for root in &self.roots {
            self.outline_into(&mut out, root, 0);
        }
        out
    }

    fn outline_into(&self, out: &mut String, key: &BlockKey, depth: usize) {
        let Some(block) = self.blocks.get(key) else {
            return;
        };
        let _ = write!(out, "{}{}", "  ".repeat(depth), block.ty);
        if let Some(list_type) = block.list_type {
            let _ = write!(out, " list={list_type}");
        }
        if let Some(item_type) = block.list_item_type {
            let _ = write!(out, " item={item_type}");
            if block.is_loose_list_item {
                out.push_str(" loose");
            }
        }
        if let Some(start) = block.start {
            let _ = write!(out, " start={start}");
        }
        if block.checked {
            out.push_str(" checked");
        }
        if block.temp {
            out.push_str(" temp");
        }
        if !block.text.is_empty() {
            let _ = write!(out, " {:?}", block.text);
        }
        out.push('\n');
        for child in &block.children {
            self.outline_into(out, child, depth + 1);
        }
    }

    fn siblings(&self, key: &BlockKey) -> Result<&Vec<BlockKey>, TreeError> {
        match &self.block(key)?.parent {
            Some(parent) => Ok(&self.block(parent)?.children),
            None if self.roots.contains(key) => Ok(&self.roots),
            None => Err(TreeError::Detached(key.clone())),
        }
    }

    fn ensure_linkable(&self, key: &BlockKey, parent: Option<&BlockKey>) -> Result<(), TreeError> {
        self.block(key)?;
        if self.is_attached(key) {
            return Err(TreeError::AlreadyAttached(key.clone()));
        }
        if let Some(parent) = parent {
            self.block(parent)?;
            if parent == key || self.is_ancestor(key, parent) {
                return Err(TreeError::Cycle(key.clone()));
            }
        }
        Ok(())
    }

    fn insert_beside(
        &mut self,
        new: &BlockKey,
        reference: &BlockKey,
        shift: usize,
    ) -> Result<(), TreeError> {
        let parent = self.block(reference)?.parent.clone();
        self.ensure_linkable(new, parent.as_ref())?;
        if new == reference {
            return Err(TreeError::Cycle(new.clone()));
        }
        let siblings = match &parent {
            Some(p) => &mut self.block_mut(p)?.children,
            None => &mut self.roots,
        };
        let idx = siblings
            .iter()
            .position(|k| k == reference)
            .ok_or_else(|| TreeError::Detached(reference.clone()))?;
        siblings.insert(idx + shift, new.clone());
        self.block_mut(new)?.parent = parent;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::{BlockType, ListType};
    use pretty_assertions::assert_eq;

    fn para(tree: &mut BlockTree, text: &str) -> BlockKey {
        tree.create(Block::with_text(BlockType::Paragraph, text))
            .unwrap()
    }

    fn texts(tree: &BlockTree, keys: &[BlockKey]) -> Vec<String> {
        keys.iter()
            .map(|k| tree.get(k).unwrap().text.clone())
            .collect()
    }

    #[test]
    fn append_and_navigate_siblings() {
        let mut tree = BlockTree::new();
        let a = tree.push_root(Block::with_text(BlockType::Paragraph, "a")).unwrap();
        let b = tree.push_root(Block::with_text(BlockType::Paragraph, "b")).unwrap();

        assert_eq!(tree.next_sibling(&a).unwrap().key(), &b);
        assert_eq!(tree.prev_sibling(&b).unwrap().key(), &a);
        assert!(tree.prev_sibling(&a).is_none());
        assert!(tree.is_first_child(&a));
        assert!(tree.is_last_child(&b));
        assert!(!tree.is_only_child(&a));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn insert_before_and_after_inside_container() {
        let mut tree = BlockTree::new();
        let list = tree.push_root(Block::list(ListType::Bullet)).unwrap();
        let b = tree
            .push_child(&list, Block::with_text(BlockType::ListItem, "b"))
            .unwrap();
        let a = para(&mut tree, "a");
        let c = para(&mut tree, "c");

        tree.insert_before(&a, &b).unwrap();
        tree.insert_after(&c, &b).unwrap();

        let children = tree.get(&list).unwrap().children().to_vec();
        assert_eq!(texts(&tree, &children), vec!["a", "b", "c"]);
        assert_eq!(tree.parent_key(&a), Some(&list));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn linking_an_attached_block_is_rejected() {
        let mut tree = BlockTree::new();
        let a = tree.push_root(Block::new(BlockType::Paragraph)).unwrap();
        let list = tree.push_root(Block::list(ListType::Bullet)).unwrap();

        assert_eq!(
            tree.append_child(&list, &a),
            Err(TreeError::AlreadyAttached(a.clone()))
        );

        tree.detach(&a).unwrap();
        tree.append_child(&list, &a).unwrap();
        tree.check_invariants().unwrap();
    }

    #[test]
    fn linking_into_own_subtree_is_rejected() {
        let mut tree = BlockTree::new();
        let outer = tree.push_root(Block::new(BlockType::BlockQuote)).unwrap();
        let inner = tree.push_child(&outer, Block::new(BlockType::BlockQuote)).unwrap();
        tree.detach(&outer).unwrap();

        assert_eq!(
            tree.append_child(&inner, &outer),
            Err(TreeError::Cycle(outer.clone()))
        );
    }

    #[test]
    fn remove_deregisters_whole_subtree() {
        let mut tree = BlockTree::new();
        let list = tree.push_root(Block::list(ListType::Bullet)).unwrap();
        let item = tree.push_child(&list, Block::new(BlockType::ListItem)).unwrap();
        let leaf = tree
            .push_child(&item, Block::with_text(BlockType::Paragraph, "x"))
            .unwrap();

        tree.remove(&list).unwrap();

        assert!(tree.is_empty());
        assert!(!tree.contains(&leaf));
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn detached_leftover_fails_invariants() {
        let mut tree = BlockTree::new();
        tree.push_root(Block::new(BlockType::Paragraph)).unwrap();
        let stray = para(&mut tree, "stray");

        assert_eq!(tree.check_invariants(), Err(TreeError::Unreachable(stray)));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut tree = BlockTree::new();
        tree.push_root(Block::with_key("B1".into(), BlockType::Paragraph))
            .unwrap();
        assert_eq!(
            tree.create(Block::with_key("B1".into(), BlockType::Paragraph)),
            Err(TreeError::DuplicateKey("B1".into()))
        );
    }

    #[test]
    fn preorder_follows_document_order() {
        let mut tree = BlockTree::new();
        let quote = tree.push_root(Block::new(BlockType::BlockQuote)).unwrap();
        tree.push_child(&quote, Block::with_text(BlockType::Paragraph, "inner"))
            .unwrap();
        tree.push_root(Block::with_text(BlockType::Paragraph, "after"))
            .unwrap();

        let order = tree.preorder();
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], quote);
        assert_eq!(texts(&tree, &order[1..]), vec!["inner", "after"]);
    }

    #[test]
    fn outline_lists_attributes() {
        let mut tree = BlockTree::new();
        let list = tree.push_root(Block::list(ListType::Order)).unwrap();
        tree.get_mut(&list).unwrap().start = Some(3);
        let item = tree
            .push_child(&list, Block::list_item(ListType::Order, true))
            .unwrap();
        tree.push_child(&item, Block::with_text(BlockType::Paragraph, "three"))
            .unwrap();

        insta::assert_snapshot!(tree.outline(), @r#"
        ol list=order start=3
          li item=order loose
            p "three"
        "#);
    }
}
