pub mod editing;
pub mod models;
pub mod parsing;

// Re-export key types for easier usage
pub use editing::{
    EditError, EditorEvent, EditorHost, EditorSession, EventOutcome, Key, ListKind, ListMerge,
    MATH_RENDER_REGION, MemoryHost, Preferences, TaskPlacement, render_need::needs_render,
};
pub use models::{
    Block, BlockKey, BlockTree, BlockType, Cursor, CursorPosition, FunctionType, ListType,
    TreeError,
};
pub use parsing::{InlineToken, InlineTokenizer, TokenKind, Tokenizer, Trigger, classify};
