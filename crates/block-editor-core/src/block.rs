//! Block data model.
//!
//! A document is an ordered sequence of [`Block`]s. Each block has a stable [`BlockId`], a
//! [`BlockKind`] and a text run. Identity is carried by the id alone: two blocks compare equal
//! when their ids match, regardless of their current kind or text.

use crate::text;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Opaque identifier for a [`Block`].
///
/// Ids are random (v4 UUIDs) so blocks minted locally never collide with blocks minted by a
/// store or another peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    /// Mint a fresh, unique id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID (e.g. one received from a store).
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Block types supported by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// Plain body paragraph.
    #[default]
    Paragraph,
    /// Heading; `level` is always within `1..=3` when built through [`BlockKind::heading`].
    Heading {
        /// Heading level (1 is the largest).
        level: u8,
    },
    /// Bullet list item.
    Bullet,
    /// Ordered list item.
    Ordered,
    /// Checkbox item.
    Todo {
        /// Whether the box is ticked.
        checked: bool,
    },
}

impl BlockKind {
    /// Lowest heading level.
    pub const MIN_HEADING_LEVEL: u8 = 1;
    /// Highest heading level.
    pub const MAX_HEADING_LEVEL: u8 = 3;

    /// Create a heading kind, clamping `level` into `1..=3`.
    pub fn heading(level: u8) -> Self {
        Self::Heading {
            level: level.clamp(Self::MIN_HEADING_LEVEL, Self::MAX_HEADING_LEVEL),
        }
    }

    /// Create a checkbox kind.
    pub fn todo(checked: bool) -> Self {
        Self::Todo { checked }
    }

    /// Whether blocks of this kind draw a gutter marker (bullet, number, checkbox).
    pub fn uses_gutter(&self) -> bool {
        match self {
            Self::Bullet | Self::Ordered | Self::Todo { .. } => true,
            Self::Paragraph | Self::Heading { .. } => false,
        }
    }

    /// The kind a new sibling gets when Enter is pressed in a block of this kind.
    ///
    /// List-like kinds continue the list; a ticked checkbox continues as an unticked one;
    /// everything else falls back to a paragraph.
    pub fn continuation(&self) -> Self {
        match self {
            Self::Bullet | Self::Ordered | Self::Todo { checked: false } => *self,
            Self::Todo { checked: true } => Self::Todo { checked: false },
            Self::Paragraph | Self::Heading { .. } => Self::Paragraph,
        }
    }
}

/// A single addressable unit of document content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Stable identity of the block.
    pub id: BlockId,
    /// Current block type.
    pub kind: BlockKind,
    /// Text run of the block.
    pub text: String,
    /// Display number cache for [`BlockKind::Ordered`]; not authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_number: Option<u32>,
}

impl Block {
    /// Create a block with a fresh id.
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(),
            kind,
            text: text.into(),
            list_number: None,
        }
    }

    /// Create a paragraph block with a fresh id.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    /// Create an empty block of the given kind.
    pub fn empty(kind: BlockKind) -> Self {
        Self::new(kind, String::new())
    }

    /// Replace the id (useful when rebuilding a block received from elsewhere).
    pub fn with_id(mut self, id: BlockId) -> Self {
        self.id = id;
        self
    }

    /// Attach an ordered-list display number.
    pub fn with_list_number(mut self, number: u32) -> Self {
        self.list_number = Some(number);
        self
    }

    /// Copy the content fields (kind, text, list number) from `other`, keeping this id.
    pub fn copy_content_from(&mut self, other: &Block) {
        self.kind = other.kind;
        self.text.clone_from(&other.text);
        self.list_number = other.list_number;
    }

    /// Text length in UTF-16 code units.
    pub fn utf16_len(&self) -> usize {
        text::utf16_len(&self.text)
    }

    /// Text length in grapheme clusters.
    pub fn grapheme_len(&self) -> usize {
        text::grapheme_len(&self.text)
    }

    /// Whether the text spans more than one line.
    pub fn is_multiline(&self) -> bool {
        text::is_multiline(&self.text)
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::empty(BlockKind::Paragraph)
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Block {}

impl Hash for Block {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_is_clamped() {
        assert_eq!(BlockKind::heading(0), BlockKind::Heading { level: 1 });
        assert_eq!(BlockKind::heading(2), BlockKind::Heading { level: 2 });
        assert_eq!(BlockKind::heading(9), BlockKind::Heading { level: 3 });
    }

    #[test]
    fn test_uses_gutter() {
        assert!(BlockKind::Bullet.uses_gutter());
        assert!(BlockKind::Ordered.uses_gutter());
        assert!(BlockKind::todo(true).uses_gutter());
        assert!(!BlockKind::Paragraph.uses_gutter());
        assert!(!BlockKind::heading(1).uses_gutter());
    }

    #[test]
    fn test_continuation_kinds() {
        assert_eq!(BlockKind::Bullet.continuation(), BlockKind::Bullet);
        assert_eq!(BlockKind::Ordered.continuation(), BlockKind::Ordered);
        assert_eq!(BlockKind::todo(false).continuation(), BlockKind::todo(false));
        assert_eq!(BlockKind::todo(true).continuation(), BlockKind::todo(false));
        assert_eq!(BlockKind::heading(2).continuation(), BlockKind::Paragraph);
        assert_eq!(BlockKind::Paragraph.continuation(), BlockKind::Paragraph);
    }

    #[test]
    fn test_equality_is_identity() {
        let a = Block::paragraph("one");
        let mut same = a.clone();
        same.text = "changed".to_string();
        same.kind = BlockKind::Bullet;
        assert_eq!(a, same);
        assert_ne!(a, Block::paragraph("one"));
    }

    #[test]
    fn test_kind_serde_shape() {
        let json = serde_json::to_string(&BlockKind::heading(2)).unwrap();
        assert_eq!(json, r#"{"type":"heading","level":2}"#);
        let todo: BlockKind = serde_json::from_str(r#"{"type":"todo","checked":true}"#).unwrap();
        assert_eq!(todo, BlockKind::todo(true));
    }
}
