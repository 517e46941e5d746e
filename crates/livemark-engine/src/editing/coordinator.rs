//! # Input Event Coordinator
//!
//! [`EditorSession::update_state`] runs once per `input`, `keyup` or `click`
//! event. It reconciles the session with the live surface, lets the trigger
//! detector restructure the focused block and decides whether to render.
//!
//! ## Per-event order
//!
//! 1. Icon leaves are not editable as text: the default action is suppressed.
//! 2. Vertical arrows belong to an open suggestion box.
//! 3. A click that produced a cross-block selection is retried once later
//!    through [`EditorSession::run_deferred`].
//! 4. Input over a previous cross-block cursor deletes the covered blocks.
//! 5. A live cross-block selection is adopted without rendering.
//! 6. Clicking a table figure puts the caret at the end of its first header cell.
//! 7. Leaving a block finalizes code fences and drops empty placeholders.
//! 8. Code blocks only track the cursor.
//! 9. Otherwise the live text is stored (with auto-pairing), classified and
//!    checked for markup next to the caret.
//!
//! `render` is called at most once per event.

use log::{debug, trace};

use super::{
    EditError, EditorSession,
    host::{EditorHost, MATH_RENDER_REGION},
};
use crate::models::{
    BlockKey, BlockType, Cursor, FunctionType, TreeError,
    text::{char_at, char_len, insert_char, prefix, suffix},
};

/// A UI event the coordinator reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Text changed. `data` is the inserted text, `None` for deletions.
    Input { data: Option<String> },
    KeyUp { key: Key },
    Click,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl EditorEvent {
    pub fn is_input(&self) -> bool {
        matches!(self, EditorEvent::Input { .. })
    }

    pub fn is_click(&self) -> bool {
        matches!(self, EditorEvent::Click)
    }

    pub fn is_vertical_arrow(&self) -> bool {
        matches!(
            self,
            EditorEvent::KeyUp {
                key: Key::ArrowUp | Key::ArrowDown
            }
        )
    }
}

/// What handling one event did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// [`EditorHost::render`] was called.
    pub rendered: bool,
    /// The host should suppress its default action for the event.
    pub prevent_default: bool,
}

impl EventOutcome {
    pub fn prevented() -> Self {
        Self {
            rendered: false,
            prevent_default: true,
        }
    }
}

impl EditorSession {
    /// Handle one UI event against the live surface of `host`.
    pub fn update_state(
        &mut self,
        host: &mut dyn EditorHost,
        event: EditorEvent,
    ) -> Result<EventOutcome, EditError> {
        self.process_event(host, &event, true)
    }

    /// Run the retry stored by a cross-block click, if any.
    ///
    /// Hosts call this on their next scheduling tick. The retry reads the
    /// selection as it is by then and never schedules another retry.
    pub fn run_deferred(
        &mut self,
        host: &mut dyn EditorHost,
    ) -> Result<Option<EventOutcome>, EditError> {
        match self.deferred.take() {
            Some(event) => self.process_event(host, &event, false).map(Some),
            None => Ok(None),
        }
    }

    /// Store a task checkbox's completion state and render.
    pub fn toggle_checkbox(
        &mut self,
        host: &mut dyn EditorHost,
        key: &BlockKey,
        checked: bool,
    ) -> Result<EventOutcome, EditError> {
        let block = self.tree.block_mut(key)?;
        if block.ty != BlockType::Checkbox {
            return Err(EditError::NotACheckbox(key.clone()));
        }
        block.checked = checked;
        debug!("checkbox {key} set to {checked}");
        host.render(&self.tree, &self.cursor);
        Ok(EventOutcome {
            rendered: true,
            prevent_default: false,
        })
    }

    fn process_event(
        &mut self,
        host: &mut dyn EditorHost,
        event: &EditorEvent,
        allow_retry: bool,
    ) -> Result<EventOutcome, EditError> {
        let Some(live) = host.cursor_range() else {
            return Ok(EventOutcome::default());
        };
        let key = live.start.key.clone();
        if self.tree.block(&key)?.icon {
            return Ok(EventOutcome::prevented());
        }
        if event.is_vertical_arrow() && host.float_box_visible() {
            return Ok(EventOutcome::default());
        }
        if event.is_click() && !live.is_single_block() && allow_retry {
            trace!("click selected across blocks, retrying later");
            self.deferred = Some(event.clone());
        }

        let old = self.cursor.clone();
        if event.is_input() && !old.is_single_block() && self.delete_selected_blocks(&old)? {
            host.render(&self.tree, &self.cursor);
            return Ok(EventOutcome {
                rendered: true,
                prevent_default: true,
            });
        }

        if !live.is_single_block() {
            self.tree.block(&live.end.key)?;
            if live != self.cursor {
                self.cursor = live;
            }
            return Ok(EventOutcome::default());
        }

        if event.is_click() {
            if let Some(cell) = self.table_header_cell(&key)? {
                let offset = char_len(&self.tree.block(&cell)?.text);
                self.cursor = Cursor::caret(cell, offset);
                self.last_cursor = Some(self.cursor.clone());
                host.render(&self.tree, &self.cursor);
                return Ok(EventOutcome {
                    rendered: true,
                    prevent_default: false,
                });
            }
        }

        let old_key = self.last_cursor.as_ref().map(|c| c.start.key.clone());
        let focus_moved = old_key.as_ref() != Some(&key);
        let mut need_render = false;
        if let Some(old_key) = old_key.filter(|_| focus_moved) {
            need_render |= self.leave_block(&old_key)?;
        }

        if self.tree.block(&key)?.ty == BlockType::Pre {
            // code block text is not stored here, so the live offset can run past it
            self.tree.block(&live.end.key)?;
            self.cursor = live;
            self.last_cursor = Some(self.cursor.clone());
            let rendered = focus_moved || need_render;
            if rendered {
                host.render(&self.tree, &self.cursor);
            }
            return Ok(EventOutcome {
                rendered,
                prevent_default: false,
            });
        }

        let text = host
            .text_content(&key, &[MATH_RENDER_REGION])
            .ok_or_else(|| EditError::MissingLiveText(key.clone()))?;
        if self.tree.block(&key)?.text != text {
            let paired = match event {
                EditorEvent::Input { data: Some(data) }
                    if old.is_collapsed() && live.is_collapsed() =>
                {
                    self.auto_pair(&text, data, live.start.offset)
                }
                _ => None,
            };
            if paired.is_some() {
                trace!("auto-paired {event:?} in {key}");
            }
            self.tree.block_mut(&key)?.text = paired.unwrap_or(text);
        }

        if focus_moved
            || old.start.offset != live.start.offset
            || old.end.offset != live.end.offset
        {
            need_render = true;
        }

        self.set_cursor(live)?;
        let marked = self.check_need_render(&key)?;
        let mutated = self.check_inline_update(&key)?;
        self.last_cursor = Some(self.cursor.clone());
        debug_assert!(self.cursor_in_tree(), "cursor left the tree: {:?}", self.cursor);

        let rendered = marked || mutated || need_render;
        if rendered {
            trace!("render after {event:?} (marked={marked} mutated={mutated})");
            host.render(&self.tree, &self.cursor);
        }
        Ok(EventOutcome {
            rendered,
            prevent_default: false,
        })
    }

    /// Delete what an input over the cross-block cursor `old` replaced.
    ///
    /// A backwards selection is handled from its earlier end. Returns `true`
    /// when that block was a code block; its text was then joined here and
    /// the event is fully handled.
    fn delete_selected_blocks(&mut self, old: &Cursor) -> Result<bool, EditError> {
        let order = self.tree.preorder();
        let old = old.ordered_by(|key| order.iter().position(|k| k == key));
        let (start, end) = (&old.start, &old.end);
        self.remove_blocks_between(&start.key, &end.key)?;

        if self.tree.block(&start.key)?.ty != BlockType::Pre {
            self.remove_with_empty_ancestors(&end.key)?;
            return Ok(false);
        }

        // each side drops the character next to the join
        let end_block = self.tree.block(&end.key)?;
        let end_cut = match end_block.ty {
            BlockType::Pre => end.offset.saturating_sub(1),
            _ => end.offset,
        };
        let tail = suffix(&end_block.text, end_cut).to_string();
        let start_block = self.tree.block_mut(&start.key)?;
        let joined = format!("{}{tail}", prefix(&start_block.text, start.offset.saturating_sub(1)));
        let offset = start.offset.min(char_len(&joined));
        start_block.text = joined;
        debug!("joined code block {} with {}", start.key, end.key);

        self.remove_with_empty_ancestors(&end.key)?;
        self.cursor = Cursor::caret(start.key.clone(), offset);
        self.last_cursor = Some(self.cursor.clone());
        Ok(true)
    }

    /// Remove every block strictly between `start` and `end` in document
    /// order, keeping the ancestors of `end` and the descendants of `start`.
    fn remove_blocks_between(&mut self, start: &BlockKey, end: &BlockKey) -> Result<(), EditError> {
        let order = self.tree.preorder();
        let position = |key: &BlockKey| {
            order
                .iter()
                .position(|k| k == key)
                .ok_or_else(|| TreeError::Detached(key.clone()))
        };
        let (from, to) = (position(start)?, position(end)?);
        if from >= to {
            return Ok(());
        }
        let doomed: Vec<&BlockKey> = order[from + 1..to]
            .iter()
            .filter(|k| !self.tree.is_ancestor(k, end) && !self.tree.is_ancestor(start, k))
            .collect();
        debug!("removing {} blocks between {start} and {end}", doomed.len());
        for key in doomed {
            // an ancestor removed earlier took this one with it
            if self.tree.contains(key) {
                self.tree.remove(key)?;
            }
        }
        Ok(())
    }

    /// Remove `key`, then every ancestor that was left without children.
    fn remove_with_empty_ancestors(&mut self, key: &BlockKey) -> Result<(), EditError> {
        let mut parent = self.tree.parent_key(key).cloned();
        self.tree.remove(key)?;
        while let Some(container) = parent {
            if self.tree.block(&container)?.has_children() {
                break;
            }
            parent = self.tree.parent_key(&container).cloned();
            self.tree.remove(&container)?;
        }
        Ok(())
    }

    /// First header cell of the table figure `key`, following
    /// figure > table > thead > tr > th.
    fn table_header_cell(&self, key: &BlockKey) -> Result<Option<BlockKey>, EditError> {
        let block = self.tree.block(key)?;
        if block.ty != BlockType::Figure || block.function_type != Some(FunctionType::Table) {
            return Ok(None);
        }
        let mut current = block;
        for idx in [1, 0, 0, 0] {
            current = current
                .children()
                .get(idx)
                .and_then(|k| self.tree.get(k))
                .ok_or_else(|| EditError::MissingHeaderCell(key.clone()))?;
        }
        Ok(Some(current.key().clone()))
    }

    /// Focus left `key`: finalize a code fence and settle a placeholder.
    ///
    /// Returns `true` when a render is owed.
    fn leave_block(&mut self, key: &BlockKey) -> Result<bool, EditError> {
        if !self.tree.contains(key) {
            return Ok(false);
        }
        let converted = self.code_block_update(key)?;
        let block = self.tree.block_mut(key)?;
        if !block.temp {
            return Ok(converted);
        }
        if !block.text.is_empty() || block.has_children() {
            block.temp = false;
            return Ok(converted);
        }
        debug!("dropping empty placeholder {key}");
        self.tree.remove(key)?;
        Ok(true)
    }

    /// Text with the closing partner of a just-typed opener inserted at `offset`.
    fn auto_pair(&self, text: &str, data: &str, offset: usize) -> Option<String> {
        let mut typed = data.chars();
        let (Some(first), None) = (typed.next(), typed.next()) else {
            return None;
        };
        closing_pair(first)?;
        let opener = char_at(text, offset.checked_sub(1)?)?;
        let closer = closing_pair(opener)?;
        let prefs = &self.preferences;
        let enabled = match opener {
            '"' | '\'' => prefs.auto_pair_quote,
            '(' | '[' | '{' => prefs.auto_pair_bracket,
            '*' | '_' => prefs.auto_pair_markdown_syntax,
            _ => false,
        };
        enabled.then(|| insert_char(text, offset, closer))
    }
}

fn closing_pair(c: char) -> Option<char> {
    match c {
        '{' => Some('}'),
        '[' => Some(']'),
        '(' => Some(')'),
        '*' | '_' | '"' | '\'' => Some(c),
        _ => None,
    }
}
