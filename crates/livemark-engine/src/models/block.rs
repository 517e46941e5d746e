use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Process-unique identifier of a block, stable for the block's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    /// Wrap an explicit key. Used by hosts that already own identifiers.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Allocate a fresh key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The closed set of block types the engine reasons about.
///
/// Anything else the host stores is carried through as [`BlockType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum BlockType {
    Paragraph,
    /// ATX heading, level 1..=6.
    Heading(u8),
    ListItem,
    BulletList,
    OrderedList,
    BlockQuote,
    ThematicBreak,
    Pre,
    Code,
    Figure,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableHeaderCell,
    TableCell,
    /// Task checkbox leaf.
    Checkbox,
    Span,
    Other(String),
}

impl BlockType {
    /// Markup tag name, e.g. `p`, `h2`, `ul`.
    pub fn tag(&self) -> String {
        match self {
            BlockType::Paragraph => "p".into(),
            BlockType::Heading(level) => format!("h{level}"),
            BlockType::ListItem => "li".into(),
            BlockType::BulletList => "ul".into(),
            BlockType::OrderedList => "ol".into(),
            BlockType::BlockQuote => "blockquote".into(),
            BlockType::ThematicBreak => "hr".into(),
            BlockType::Pre => "pre".into(),
            BlockType::Code => "code".into(),
            BlockType::Figure => "figure".into(),
            BlockType::Table => "table".into(),
            BlockType::TableHead => "thead".into(),
            BlockType::TableBody => "tbody".into(),
            BlockType::TableRow => "tr".into(),
            BlockType::TableHeaderCell => "th".into(),
            BlockType::TableCell => "td".into(),
            BlockType::Checkbox => "input".into(),
            BlockType::Span => "span".into(),
            BlockType::Other(tag) => tag.clone(),
        }
    }

    /// Parse a tag name back into a type. Unknown tags become [`BlockType::Other`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "p" => BlockType::Paragraph,
            "li" => BlockType::ListItem,
            "ul" => BlockType::BulletList,
            "ol" => BlockType::OrderedList,
            "blockquote" => BlockType::BlockQuote,
            "hr" => BlockType::ThematicBreak,
            "pre" => BlockType::Pre,
            "code" => BlockType::Code,
            "figure" => BlockType::Figure,
            "table" => BlockType::Table,
            "thead" => BlockType::TableHead,
            "tbody" => BlockType::TableBody,
            "tr" => BlockType::TableRow,
            "th" => BlockType::TableHeaderCell,
            "td" => BlockType::TableCell,
            "input" => BlockType::Checkbox,
            "span" => BlockType::Span,
            _ => match tag.strip_prefix('h').and_then(|n| n.parse::<u8>().ok()) {
                Some(level @ 1..=6) => BlockType::Heading(level),
                _ => BlockType::Other(tag.to_string()),
            },
        }
    }

    /// Table parts and figures are never reclassified from their text.
    pub fn is_table_or_figure(&self) -> bool {
        matches!(
            self,
            BlockType::Figure
                | BlockType::Table
                | BlockType::TableHead
                | BlockType::TableBody
                | BlockType::TableRow
                | BlockType::TableHeaderCell
                | BlockType::TableCell
        )
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl From<BlockType> for String {
    fn from(value: BlockType) -> Self {
        value.tag()
    }
}

/// Kind of a list container, mirrored onto its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Bullet,
    Order,
    Task,
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ListType::Bullet => "bullet",
            ListType::Order => "order",
            ListType::Task => "task",
        })
    }
}

/// Special-purpose flavour of a non-text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionType {
    Table,
    FenceCode,
    IndentCode,
    Html,
    MultipleMath,
}

/// A node of the document tree.
///
/// `key`, `parent` and `children` are owned by [`crate::BlockTree`] and are
/// only changed through its mutation API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub(crate) key: BlockKey,
    #[serde(rename = "type")]
    pub ty: BlockType,
    pub text: String,
    pub list_type: Option<ListType>,
    pub list_item_type: Option<ListType>,
    pub is_loose_list_item: bool,
    pub checked: bool,
    /// Start number of an ordered list container.
    pub start: Option<u64>,
    /// Placeholder created next to a code block; dropped on focus exit while empty.
    pub temp: bool,
    pub icon: bool,
    pub function_type: Option<FunctionType>,
    pub lang: Option<String>,
    #[serde(skip)]
    pub(crate) parent: Option<BlockKey>,
    pub(crate) children: Vec<BlockKey>,
}

impl Block {
    pub fn new(ty: BlockType) -> Self {
        Self::with_key(BlockKey::generate(), ty)
    }

    pub fn with_text(ty: BlockType, text: impl Into<String>) -> Self {
        let mut block = Self::new(ty);
        block.text = text.into();
        block
    }

    pub fn with_key(key: BlockKey, ty: BlockType) -> Self {
        Self {
            key,
            ty,
            text: String::new(),
            list_type: None,
            list_item_type: None,
            is_loose_list_item: false,
            checked: false,
            start: None,
            temp: false,
            icon: false,
            function_type: None,
            lang: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Empty list container (`ul` for bullet/task, `ol` for order).
    pub fn list(list_type: ListType) -> Self {
        let ty = match list_type {
            ListType::Order => BlockType::OrderedList,
            ListType::Bullet | ListType::Task => BlockType::BulletList,
        };
        let mut block = Self::new(ty);
        block.list_type = Some(list_type);
        block
    }

    /// Empty list item of the given kind and looseness.
    pub fn list_item(list_type: ListType, loose: bool) -> Self {
        let mut block = Self::new(BlockType::ListItem);
        block.list_item_type = Some(list_type);
        block.is_loose_list_item = loose;
        block
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn parent(&self) -> Option<&BlockKey> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &[BlockKey] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BlockType::Paragraph, "p")]
    #[case(BlockType::Heading(3), "h3")]
    #[case(BlockType::OrderedList, "ol")]
    #[case(BlockType::Checkbox, "input")]
    #[case(BlockType::Other("math".into()), "math")]
    fn tag_round_trips(#[case] ty: BlockType, #[case] tag: &str) {
        assert_eq!(ty.tag(), tag);
        assert_eq!(BlockType::from_tag(tag), ty);
    }

    #[test]
    fn out_of_range_heading_is_opaque() {
        assert_eq!(BlockType::from_tag("h7"), BlockType::Other("h7".into()));
    }

    #[test]
    fn generated_keys_are_unique() {
        assert_ne!(BlockKey::generate(), BlockKey::generate());
    }

    #[test]
    fn task_list_uses_bullet_tag() {
        let list = Block::list(ListType::Task);
        assert_eq!(list.ty, BlockType::BulletList);
        assert_eq!(list.list_type, Some(ListType::Task));
    }
}
