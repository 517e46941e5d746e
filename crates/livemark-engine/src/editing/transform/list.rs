use log::debug;

use crate::{
    editing::{EditError, EditorSession},
    models::{Block, BlockKey, BlockType, ListType, TreeError, text::char_len},
};

/// The list kinds a typed marker can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Order,
}

impl ListKind {
    pub fn list_type(self) -> ListType {
        match self {
            ListKind::Bullet => ListType::Bullet,
            ListKind::Order => ListType::Order,
        }
    }

    /// Container tag: `ul` or `ol`.
    pub fn wrapper(self) -> BlockType {
        match self {
            ListKind::Bullet => BlockType::BulletList,
            ListKind::Order => BlockType::OrderedList,
        }
    }
}

/// Where a freshly typed list item goes, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMerge {
    /// Previous and next siblings are matching lists: join all three.
    Splice { previous: BlockKey, next: BlockKey },
    /// Append to the matching previous sibling.
    AppendToPrevious(BlockKey),
    /// Prepend to the matching next sibling.
    PrependToNext(BlockKey),
    /// The parent already is a matching list: take the block's place in it.
    InsertInParent(BlockKey),
    /// Nothing to join: the block itself becomes a new list container.
    Wrap,
}

impl EditorSession {
    /// Convert `key` into a list item of `kind`, joining adjacent lists when
    /// they have the same kind and looseness.
    ///
    /// Returns the key of the new item's text block, which now holds the caret.
    pub fn update_list(
        &mut self,
        key: &BlockKey,
        kind: ListKind,
        marker: &str,
    ) -> Result<BlockKey, EditError> {
        let loose = self.preferences.prefer_loose_list_item;
        let rest = self.strip_marker(key, marker)?;
        let merge = self.plan_list_merge(key, kind)?;
        let text_type = self.tree.block(key)?.ty.clone();

        let item = self.tree.create(Block::list_item(kind.list_type(), loose))?;
        let leaf = self
            .tree
            .push_child(&item, Block::with_text(text_type, rest))?;
        debug!("list marker {marker:?} on {key}: {merge:?}");

        match merge {
            ListMerge::Splice { previous, next } => {
                self.tree.append_child(&previous, &item)?;
                let moved = self.tree.block(&next)?.children().to_vec();
                for child in &moved {
                    self.tree.detach(child)?;
                    self.tree.append_child(&previous, child)?;
                }
                self.tree.remove(&next)?;
                self.tree.remove(key)?;
            }
            ListMerge::AppendToPrevious(previous) => {
                self.tree.append_child(&previous, &item)?;
                self.tree.remove(key)?;
            }
            ListMerge::PrependToNext(next) => {
                let first = self
                    .tree
                    .first_child(&next)
                    .map(|b| b.key().clone())
                    .ok_or(TreeError::EmptyContainer(next))?;
                self.tree.insert_before(&item, &first)?;
                self.tree.remove(key)?;
            }
            ListMerge::InsertInParent(_) => {
                self.tree.insert_before(&item, key)?;
                self.tree.remove(key)?;
            }
            ListMerge::Wrap => {
                let block = self.tree.block_mut(key)?;
                block.ty = kind.wrapper();
                block.list_type = Some(kind.list_type());
                block.text.clear();
                if kind == ListKind::Order {
                    block.start = Some(ordered_start(marker));
                }
                self.tree.append_child(key, &item)?;
            }
        }

        self.rebase_cursor(&leaf, char_len(marker))?;
        Ok(leaf)
    }

    /// Decide how a new `kind` item typed into `key` joins its neighbourhood.
    ///
    /// Looseness is a strict gate: a container only qualifies when its first
    /// item has the looseness new items get.
    pub fn plan_list_merge(&self, key: &BlockKey, kind: ListKind) -> Result<ListMerge, EditError> {
        let list_type = Some(kind.list_type());
        let same_kind = |b: &Block| b.list_type == list_type;
        let same_tag = |b: &Block| b.ty == kind.wrapper();

        let previous = self.tree.prev_sibling(key);
        let next = self.tree.next_sibling(key);

        let prev_same_kind = self.joinable(previous, same_kind)?;
        let next_same_kind = self.joinable(next, same_kind)?;
        if let (Some(previous), Some(next)) = (&prev_same_kind, &next_same_kind) {
            return Ok(ListMerge::Splice {
                previous: previous.clone(),
                next: next.clone(),
            });
        }
        if let Some(previous) = self.joinable(previous, same_tag)? {
            return Ok(ListMerge::AppendToPrevious(previous));
        }
        if let Some(next) = next_same_kind {
            return Ok(ListMerge::PrependToNext(next));
        }
        if let Some(parent) = self.joinable(self.tree.parent(key), same_kind)? {
            return Ok(ListMerge::InsertInParent(parent));
        }
        Ok(ListMerge::Wrap)
    }

    /// Whether `container`'s items have the given looseness.
    ///
    /// Decided by the first item; an empty list container is a broken tree.
    pub fn same_loose_type(&self, container: &BlockKey, loose: bool) -> Result<bool, EditError> {
        let first = self
            .tree
            .first_child(container)
            .ok_or_else(|| TreeError::EmptyContainer(container.clone()))?;
        Ok(first.is_loose_list_item == loose)
    }

    fn joinable(
        &self,
        candidate: Option<&Block>,
        matches: impl Fn(&Block) -> bool,
    ) -> Result<Option<BlockKey>, EditError> {
        let Some(block) = candidate.filter(|b| matches(b)) else {
            return Ok(None);
        };
        let loose = self.preferences.prefer_loose_list_item;
        Ok(self
            .same_loose_type(block.key(), loose)?
            .then(|| block.key().clone()))
    }
}

/// Start number from an ordered marker such as `"3. "`; 1 when unparsable.
fn ordered_start(marker: &str) -> u64 {
    marker
        .split('.')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}
