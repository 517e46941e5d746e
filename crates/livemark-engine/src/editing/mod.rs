/*!
 * # Editing Core
 *
 * The live mutation engine: everything that happens between a UI event and
 * the decision to re-render.
 *
 * ## Flow per event
 *
 * 1. The coordinator reads the live selection and the live text of the
 *    focused block from the [`EditorHost`].
 * 2. The block's stored text is updated (with optional auto-pairing).
 * 3. The trigger detector classifies the text; a structural transform
 *    restructures the tree and rebases the cursor.
 * 4. Focus change, caret movement, tree mutation or an inline-markup boundary
 *    next to the caret decide whether [`EditorHost::render`] is called, at
 *    most once per event.
 *
 * ## Session context
 *
 * All state that must survive between events (tree, current cursor, last
 * observed cursor, a pending deferred retry) lives on [`EditorSession`].
 * Nothing is global, so independent documents can be edited side by side.
 *
 * ## Modules
 *
 * - **`transform`**: trigger dispatch and the structural operations
 * - **`render_need`**: caret-next-to-markup detection
 * - **`coordinator`**: `update_state` and multi-block deletion
 * - **`host`**: the `EditorHost` seam and the in-memory `MemoryHost`
 */

pub mod coordinator;
pub mod host;
pub mod render_need;
pub mod transform;

use log::debug;
use thiserror::Error;

use crate::{
    models::{Block, BlockKey, BlockTree, BlockType, Cursor, TreeError, text::char_len},
    parsing::{InlineTokenizer, Tokenizer},
};

pub use coordinator::{EditorEvent, EventOutcome, Key};
pub use host::{EditorHost, MATH_RENDER_REGION, MemoryHost};
pub use transform::{ListKind, ListMerge, TaskPlacement};

/// Editor-wide preferences consulted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    /// Looseness stamped on new list items; also the list merge key.
    pub prefer_loose_list_item: bool,
    /// Close `(`, `[` and `{` automatically.
    pub auto_pair_bracket: bool,
    /// Close `"` and `'` automatically.
    pub auto_pair_quote: bool,
    /// Close `*` and `_` automatically.
    pub auto_pair_markdown_syntax: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            prefer_loose_list_item: true,
            auto_pair_bracket: true,
            auto_pair_quote: true,
            auto_pair_markdown_syntax: true,
        }
    }
}

/// Invariant violations detected while editing.
///
/// None of these are caused by user text; each one means the tree, the cursor
/// or the host disagree about the document.
#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("text {text:?} of block {key} does not start with marker {marker:?}")]
    MarkerMismatch {
        key: BlockKey,
        text: String,
        marker: String,
    },
    #[error("block {0} has no enclosing {1}")]
    MissingAncestor(BlockKey, &'static str),
    #[error("table figure {0} has no header cell")]
    MissingHeaderCell(BlockKey),
    #[error("block {0} is not a task checkbox")]
    NotACheckbox(BlockKey),
    #[error("host has no live text for block {0}")]
    MissingLiveText(BlockKey),
    #[error("cursor offset {offset} is outside block {key} of length {len}")]
    CursorOutOfRange {
        key: BlockKey,
        offset: usize,
        len: usize,
    },
}

/// Per-document editing context.
pub struct EditorSession {
    pub(crate) tree: BlockTree,
    pub(crate) cursor: Cursor,
    pub(crate) last_cursor: Option<Cursor>,
    pub(crate) preferences: Preferences,
    pub(crate) tokenizer: Box<dyn Tokenizer>,
    pub(crate) deferred: Option<EditorEvent>,
}

impl EditorSession {
    /// Start a session with the caret at the beginning of the first leaf block.
    ///
    /// An empty tree gets a single empty paragraph.
    pub fn new(mut tree: BlockTree, preferences: Preferences) -> Result<Self, EditError> {
        if tree.roots().is_empty() {
            tree.push_root(Block::new(BlockType::Paragraph))?;
        }
        let first_leaf = tree
            .preorder()
            .into_iter()
            .find(|k| tree.get(k).is_some_and(|b| !b.has_children()))
            .ok_or_else(|| TreeError::EmptyContainer(tree.roots()[0].clone()))?;
        debug!("session opened with {} blocks", tree.len());

        Ok(Self {
            tree,
            cursor: Cursor::caret(first_leaf, 0),
            last_cursor: None,
            preferences,
            tokenizer: Box::new(InlineTokenizer),
            deferred: None,
        })
    }

    /// Replace the bundled inline tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut BlockTree {
        &mut self.tree
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Replace the cursor after checking both ends address real text positions.
    pub fn set_cursor(&mut self, cursor: Cursor) -> Result<(), EditError> {
        for pos in [&cursor.start, &cursor.end] {
            let len = char_len(&self.tree.block(&pos.key)?.text);
            if pos.offset > len {
                return Err(EditError::CursorOutOfRange {
                    key: pos.key.clone(),
                    offset: pos.offset,
                    len,
                });
            }
        }
        self.cursor = cursor;
        Ok(())
    }

    /// Snapshot retained from the previous event, used for focus-exit detection.
    pub fn last_cursor(&self) -> Option<&Cursor> {
        self.last_cursor.as_ref()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    /// True while a click retry is waiting for [`EditorSession::run_deferred`].
    pub fn has_deferred(&self) -> bool {
        self.deferred.is_some()
    }

    /// Point both cursor ends at `key`, shifted left by `consumed` characters.
    pub(crate) fn rebase_cursor(&mut self, key: &BlockKey, consumed: usize) -> Result<(), EditError> {
        let len = char_len(&self.tree.block(key)?.text);
        self.cursor = self.cursor.rebased(key, consumed, len);
        Ok(())
    }

    pub(crate) fn cursor_in_tree(&self) -> bool {
        [&self.cursor.start, &self.cursor.end].iter().all(|pos| {
            self.tree
                .get(&pos.key)
                .is_some_and(|b| pos.offset <= char_len(&b.text))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_gets_a_paragraph() {
        let session = EditorSession::new(BlockTree::new(), Preferences::default()).unwrap();
        let key = &session.cursor().start.key;
        assert_eq!(session.tree().get(key).unwrap().ty, BlockType::Paragraph);
        assert_eq!(session.cursor().start.offset, 0);
        assert!(session.last_cursor().is_none());
    }

    #[test]
    fn caret_starts_in_first_leaf() {
        let mut tree = BlockTree::new();
        let quote = tree.push_root(Block::new(BlockType::BlockQuote)).unwrap();
        let inner = tree
            .push_child(&quote, Block::with_text(BlockType::Paragraph, "q"))
            .unwrap();

        let session = EditorSession::new(tree, Preferences::default()).unwrap();
        assert_eq!(session.cursor(), &Cursor::caret(inner, 0));
    }

    #[test]
    fn set_cursor_rejects_offsets_past_the_text() {
        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, "abc"))
            .unwrap();
        let mut session = EditorSession::new(tree, Preferences::default()).unwrap();

        assert!(session.set_cursor(Cursor::caret(key.clone(), 3)).is_ok());
        assert!(matches!(
            session.set_cursor(Cursor::caret(key, 4)),
            Err(EditError::CursorOutOfRange { offset: 4, len: 3, .. })
        ));
        assert!(matches!(
            session.set_cursor(Cursor::caret("missing".into(), 0)),
            Err(EditError::Tree(TreeError::UnknownKey(_)))
        ));
    }
}
