use serde::Serialize;

use super::block::BlockKey;

/// One end of a selection: a block and a character offset into its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CursorPosition {
    pub key: BlockKey,
    pub offset: usize,
}

impl CursorPosition {
    pub fn new(key: BlockKey, offset: usize) -> Self {
        Self { key, offset }
    }
}

/// Selection anchor (`start`) and focus (`end`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Cursor {
    pub start: CursorPosition,
    pub end: CursorPosition,
}

impl Cursor {
    pub fn new(start: CursorPosition, end: CursorPosition) -> Self {
        Self { start, end }
    }

    /// Collapsed cursor at one position.
    pub fn caret(key: BlockKey, offset: usize) -> Self {
        let pos = CursorPosition::new(key, offset);
        Self {
            start: pos.clone(),
            end: pos,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Both ends sit in the same block.
    pub fn is_single_block(&self) -> bool {
        self.start.key == self.end.key
    }

    /// This cursor with `start` first, given each block's document position.
    ///
    /// A selection made backwards (focus before anchor) has its ends swapped.
    /// Blocks `position` does not know leave the cursor as it is.
    pub fn ordered_by(&self, position: impl Fn(&BlockKey) -> Option<usize>) -> Self {
        let backwards = if self.is_single_block() {
            self.end.offset < self.start.offset
        } else {
            match (position(&self.start.key), position(&self.end.key)) {
                (Some(start), Some(end)) => end < start,
                _ => false,
            }
        };
        if backwards {
            Self::new(self.end.clone(), self.start.clone())
        } else {
            self.clone()
        }
    }

    /// Move both ends to `key`, shifting offsets left by `consumed` characters.
    ///
    /// Offsets floor at 0 and are clamped to `text_len`.
    pub fn rebased(&self, key: &BlockKey, consumed: usize, text_len: usize) -> Self {
        let shift = |offset: usize| offset.saturating_sub(consumed).min(text_len);
        Self {
            start: CursorPosition::new(key.clone(), shift(self.start.offset)),
            end: CursorPosition::new(key.clone(), shift(self.end.offset)),
        }
    }
}
