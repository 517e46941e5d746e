//! Keystroke scripts replayed against an in-memory editor.
//!
//! One command per line; blank lines and lines starting with `//` are skipped.
//!
//! ```text
//! type - milk
//! enter
//! type - eggs
//! caret 2
//! backspace
//! print
//! ```

use std::io::Write;

use anyhow::{Context, Result, bail};
use livemark_engine::{
    Block, BlockType, Cursor, EditorEvent, EditorHost, EditorSession, MemoryHost, Preferences,
};
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Type each character in turn.
    Type(String),
    /// Click at an offset in the block holding the caret.
    Caret(usize),
    Backspace,
    /// Start an empty paragraph at the end of the document.
    Enter,
    /// Write the block outline.
    Print,
}

pub fn parse_script(script: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (idx, line) in script.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() || line.trim_start().starts_with("//") {
            continue;
        }
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let command = match word {
            "type" => Command::Type(rest.to_string()),
            "caret" => Command::Caret(
                rest.trim()
                    .parse()
                    .with_context(|| format!("line {line_no}: bad caret offset {rest:?}"))?,
            ),
            "backspace" => Command::Backspace,
            "enter" => Command::Enter,
            "print" => Command::Print,
            other => bail!("line {line_no}: unknown command {other:?}"),
        };
        commands.push(command);
    }
    Ok(commands)
}

/// An editing session wired to a [`MemoryHost`].
pub struct Replay {
    session: EditorSession,
    host: MemoryHost,
}

impl Replay {
    pub fn new(preferences: Preferences) -> Result<Self> {
        let session = EditorSession::new(Default::default(), preferences)?;
        let host = MemoryHost::mirroring(session.tree(), session.cursor());
        Ok(Self { session, host })
    }

    pub fn run(&mut self, command: &Command, out: &mut impl Write) -> Result<()> {
        debug!("replaying {command:?}");
        match command {
            Command::Type(text) => {
                for ch in text.chars() {
                    if let Some(event) = self.host.insert_char(ch) {
                        self.session.update_state(&mut self.host, event)?;
                    }
                }
            }
            Command::Caret(offset) => {
                let key = self.session.cursor().start.key.clone();
                self.host.set_caret(key, *offset);
                self.session.update_state(&mut self.host, EditorEvent::Click)?;
            }
            Command::Backspace => {
                if let Some(event) = self.host.delete_backward() {
                    self.session.update_state(&mut self.host, event)?;
                }
            }
            Command::Enter => {
                let key = self
                    .session
                    .tree_mut()
                    .push_root(Block::new(BlockType::Paragraph))?;
                self.host.render(self.session.tree(), &Cursor::caret(key, 0));
            }
            Command::Print => write!(out, "{}", self.outline())?,
        }
        Ok(())
    }

    pub fn outline(&self) -> String {
        self.session.tree().outline()
    }

    pub fn render_count(&self) -> usize {
        self.host.render_count()
    }
}
