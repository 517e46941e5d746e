pub mod block;
pub mod cursor;
pub mod text;
pub mod tree;

pub use block::{Block, BlockKey, BlockType, FunctionType, ListType};
pub use cursor::{Cursor, CursorPosition};
pub use tree::{BlockTree, TreeError};
