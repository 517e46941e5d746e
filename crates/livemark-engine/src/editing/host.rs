//! The seam between the engine and whatever displays the document.

use std::collections::HashMap;

use super::coordinator::EditorEvent;
use crate::models::{
    BlockKey, BlockTree, Cursor,
    text::{byte_index, char_len, prefix, suffix},
};

/// Region id of rendered math overlays, excluded when reading live text.
pub const MATH_RENDER_REGION: &str = "ag-math-render";

/// Live surface the coordinator reads from and renders to.
pub trait EditorHost {
    /// Current live selection, if the surface has one.
    fn cursor_range(&self) -> Option<Cursor>;

    /// Displayed text of `key`, leaving out the named overlay regions.
    fn text_content(&self, key: &BlockKey, excluded: &[&str]) -> Option<String>;

    /// Whether a floating suggestion box currently owns vertical navigation.
    fn float_box_visible(&self) -> bool {
        false
    }

    /// Commit the tree and cursor to the visible surface.
    fn render(&mut self, tree: &BlockTree, cursor: &Cursor);
}

/// An [`EditorHost`] that keeps the live surface in memory.
///
/// Typing helpers edit the live text and selection the way a browser would
/// and return the event to hand to
/// [`EditorSession::update_state`](super::EditorSession::update_state).
/// Rendering copies the tree's texts and the cursor back onto the surface.
#[derive(Debug, Default)]
pub struct MemoryHost {
    selection: Option<Cursor>,
    texts: HashMap<BlockKey, String>,
    order: Vec<BlockKey>,
    math: HashMap<BlockKey, String>,
    pub float_box_visible: bool,
    render_count: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose surface already shows `tree` with `cursor`.
    pub fn mirroring(tree: &BlockTree, cursor: &Cursor) -> Self {
        let mut host = Self::new();
        host.sync(tree, cursor);
        host
    }

    /// Overwrite the surface with the tree's texts and the cursor.
    pub fn sync(&mut self, tree: &BlockTree, cursor: &Cursor) {
        self.order = tree.preorder();
        self.texts = self
            .order
            .iter()
            .filter_map(|k| tree.get(k).map(|b| (k.clone(), b.text.clone())))
            .collect();
        self.selection = Some(cursor.clone());
    }

    pub fn selection(&self) -> Option<&Cursor> {
        self.selection.as_ref()
    }

    pub fn text(&self, key: &BlockKey) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn set_caret(&mut self, key: BlockKey, offset: usize) {
        self.selection = Some(Cursor::caret(key, offset));
    }

    pub fn select(&mut self, cursor: Cursor) {
        self.selection = Some(cursor);
    }

    pub fn set_text(&mut self, key: BlockKey, text: impl Into<String>) {
        self.texts.insert(key, text.into());
    }

    /// Show a rendered math overlay after the text of `key`.
    pub fn set_math_overlay(&mut self, key: BlockKey, rendered: impl Into<String>) {
        self.math.insert(key, rendered.into());
    }

    /// Type `ch` over the selection. A selection spanning blocks is joined
    /// into whichever of its blocks comes first.
    pub fn insert_char(&mut self, ch: char) -> Option<EditorEvent> {
        let sel = self.forwards_selection()?;
        let mut text = self.replace_selection(&sel)?;
        let at = sel.start.offset.min(char_len(&text));
        text.insert(byte_index(&text, at), ch);
        self.texts.insert(sel.start.key.clone(), text);
        self.selection = Some(Cursor::caret(sel.start.key, at + 1));
        Some(EditorEvent::Input {
            data: Some(ch.to_string()),
        })
    }

    /// Backspace. `None` at the very start of a block.
    pub fn delete_backward(&mut self) -> Option<EditorEvent> {
        let sel = self.forwards_selection()?;
        if sel.is_collapsed() {
            if sel.start.offset == 0 {
                return None;
            }
            let text = self.texts.get(&sel.start.key)?;
            let at = sel.start.offset - 1;
            let joined = format!("{}{}", prefix(text, at), suffix(text, sel.start.offset));
            self.texts.insert(sel.start.key.clone(), joined);
            self.selection = Some(Cursor::caret(sel.start.key, at));
        } else {
            let text = self.replace_selection(&sel)?;
            self.texts.insert(sel.start.key.clone(), text);
            self.selection = Some(Cursor::caret(sel.start.key, sel.start.offset));
        }
        Some(EditorEvent::Input { data: None })
    }

    /// The selection with its earlier end first, in the order last synced.
    fn forwards_selection(&self) -> Option<Cursor> {
        let sel = self.selection.as_ref()?;
        Some(sel.ordered_by(|key| self.order.iter().position(|k| k == key)))
    }

    /// Start block text with the selected range cut out.
    fn replace_selection(&mut self, sel: &Cursor) -> Option<String> {
        let start = self.texts.get(&sel.start.key)?;
        let head = prefix(start, sel.start.offset).to_string();
        let tail = if sel.is_single_block() {
            suffix(start, sel.end.offset).to_string()
        } else {
            let tail = suffix(self.texts.get(&sel.end.key)?, sel.end.offset).to_string();
            self.texts.remove(&sel.end.key);
            tail
        };
        Some(head + &tail)
    }
}

impl EditorHost for MemoryHost {
    fn cursor_range(&self) -> Option<Cursor> {
        self.selection.clone()
    }

    fn text_content(&self, key: &BlockKey, excluded: &[&str]) -> Option<String> {
        let text = self.texts.get(key)?;
        match self.math.get(key) {
            Some(math) if !excluded.contains(&MATH_RENDER_REGION) => Some(format!("{text}{math}")),
            _ => Some(text.clone()),
        }
    }

    fn float_box_visible(&self) -> bool {
        self.float_box_visible
    }

    fn render(&mut self, tree: &BlockTree, cursor: &Cursor) {
        self.render_count += 1;
        self.sync(tree, cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, BlockType, CursorPosition};
    use pretty_assertions::assert_eq;

    fn host_with(texts: &[(&str, &str)]) -> MemoryHost {
        let mut host = MemoryHost::new();
        for (key, text) in texts {
            host.set_text((*key).into(), *text);
        }
        host
    }

    #[test]
    fn typing_moves_the_caret() {
        let mut host = host_with(&[("a", "héllo")]);
        host.set_caret("a".into(), 2);

        let event = host.insert_char('X').unwrap();

        assert_eq!(event, EditorEvent::Input { data: Some("X".into()) });
        assert_eq!(host.text(&"a".into()), Some("héXllo"));
        assert_eq!(host.selection(), Some(&Cursor::caret("a".into(), 3)));
    }

    #[test]
    fn typing_over_blocks_joins_them() {
        let mut host = host_with(&[("a", "first"), ("b", "second")]);
        host.select(Cursor::new(
            CursorPosition::new("a".into(), 2),
            CursorPosition::new("b".into(), 3),
        ));

        host.insert_char('-').unwrap();

        assert_eq!(host.text(&"a".into()), Some("fi-ond"));
        assert_eq!(host.text(&"b".into()), None);
    }

    #[test]
    fn typing_over_a_backwards_range_replaces_it() {
        let mut host = host_with(&[("a", "abcdef")]);
        host.select(Cursor::new(
            CursorPosition::new("a".into(), 4),
            CursorPosition::new("a".into(), 1),
        ));

        host.insert_char('X').unwrap();

        assert_eq!(host.text(&"a".into()), Some("aXef"));
        assert_eq!(host.selection(), Some(&Cursor::caret("a".into(), 2)));
    }

    #[test]
    fn backspace_at_block_start_is_ignored() {
        let mut host = host_with(&[("a", "x")]);
        host.set_caret("a".into(), 0);
        assert_eq!(host.delete_backward(), None);

        host.set_caret("a".into(), 1);
        assert_eq!(host.delete_backward(), Some(EditorEvent::Input { data: None }));
        assert_eq!(host.text(&"a".into()), Some(""));
    }

    #[test]
    fn math_overlay_is_excluded_on_request() {
        let mut host = host_with(&[("a", "$x$")]);
        host.set_math_overlay("a".into(), "x");

        assert_eq!(host.text_content(&"a".into(), &[]).as_deref(), Some("$x$x"));
        assert_eq!(
            host.text_content(&"a".into(), &[MATH_RENDER_REGION]).as_deref(),
            Some("$x$")
        );
    }

    #[test]
    fn render_mirrors_the_tree() {
        let mut tree = BlockTree::new();
        let key = tree
            .push_root(Block::with_text(BlockType::Paragraph, "stored"))
            .unwrap();
        let mut host = host_with(&[("stale", "gone")]);

        host.render(&tree, &Cursor::caret(key.clone(), 6));

        assert_eq!(host.render_count(), 1);
        assert_eq!(host.text(&key), Some("stored"));
        assert_eq!(host.text(&"stale".into()), None);
        assert_eq!(host.selection(), Some(&Cursor::caret(key, 6)));
    }
}
