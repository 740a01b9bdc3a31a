//! Document and store events.
//!
//! - [`DocumentEvent`] is what observers drain from the controller's pending queue.
//! - [`StoreEvent`] is the wire model exchanged with an external store, in both directions.

use crate::block::{Block, BlockId};
use crate::command::FocusChange;
use serde::{Deserialize, Serialize};

/// A structural change (or focus change) observed in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A block was inserted at `index`.
    Insert {
        /// The inserted block.
        block: Block,
        /// Final (clamped) index.
        index: usize,
    },
    /// A block's content changed in place.
    Update {
        /// The block after the update.
        block: Block,
        /// Index of the block.
        index: usize,
    },
    /// A block was removed from `index`.
    Remove {
        /// The removed block.
        block: Block,
        /// Index the block occupied.
        index: usize,
    },
    /// The whole sequence was replaced.
    Reset {
        /// The new sequence.
        blocks: Vec<Block>,
    },
    /// Focus moved.
    Focus(FocusChange),
}

/// A document mutation as exchanged with an external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A block was inserted.
    Inserted {
        /// The inserted block.
        block: Block,
        /// Insertion index.
        index: usize,
    },
    /// A block was updated.
    Updated {
        /// The block after the update.
        block: Block,
        /// Index of the block.
        index: usize,
    },
    /// A block was removed.
    Removed {
        /// The removed block.
        block: Block,
        /// Index the block occupied.
        index: usize,
    },
    /// `source` was merged into `target` (source removed, target's text extended).
    Merged {
        /// The block that disappeared.
        source: Block,
        /// The block that absorbed it.
        target: Block,
    },
    /// The whole sequence was replaced (bootstrap or full resync).
    Replaced {
        /// The complete new sequence.
        blocks: Vec<Block>,
    },
}

impl StoreEvent {
    /// Short name of the event kind, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Inserted { .. } => "inserted",
            Self::Updated { .. } => "updated",
            Self::Removed { .. } => "removed",
            Self::Merged { .. } => "merged",
            Self::Replaced { .. } => "replaced",
        }
    }

    /// Apply this event to a plain block sequence (the way a store keeps its own snapshot).
    ///
    /// Indices are treated as hints: inserts are clamped, updates and removals fall back to an
    /// id lookup when the index does not point at the right block, and unknown ids are ignored.
    pub fn apply_to(&self, blocks: &mut Vec<Block>) {
        match self {
            Self::Inserted { block, index } => {
                if find_index(blocks, block.id, None).is_none() {
                    let at = (*index).min(blocks.len());
                    blocks.insert(at, block.clone());
                }
            }
            Self::Updated { block, index } => {
                if let Some(idx) = find_index(blocks, block.id, Some(*index)) {
                    blocks[idx].copy_content_from(block);
                }
            }
            Self::Removed { block, index } => {
                if let Some(idx) = find_index(blocks, block.id, Some(*index)) {
                    blocks.remove(idx);
                }
            }
            Self::Merged { source, target } => {
                if let Some(idx) = find_index(blocks, source.id, None) {
                    blocks.remove(idx);
                }
                if let Some(idx) = find_index(blocks, target.id, None) {
                    blocks[idx].copy_content_from(target);
                }
            }
            Self::Replaced { blocks: replacement } => {
                blocks.clone_from(replacement);
            }
        }
    }
}

/// Locate `id`, trusting `hint` only when it still points at that block.
pub(crate) fn find_index(blocks: &[Block], id: BlockId, hint: Option<usize>) -> Option<usize> {
    hint.filter(|&idx| blocks.get(idx).is_some_and(|b| b.id == id))
        .or_else(|| blocks.iter().position(|b| b.id == id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;

    #[test]
    fn test_apply_to_follows_ids_not_stale_indices() {
        let a = Block::paragraph("a");
        let b = Block::paragraph("b");
        let mut blocks = vec![a.clone(), b.clone()];

        let mut edited = b.clone();
        edited.text = "bee".to_string();
        StoreEvent::Updated {
            block: edited,
            index: 0,
        }
        .apply_to(&mut blocks);
        assert_eq!(blocks[0].text, "a");
        assert_eq!(blocks[1].text, "bee");

        StoreEvent::Removed { block: a, index: 7 }.apply_to(&mut blocks);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, b.id);
    }

    #[test]
    fn test_apply_to_clamps_inserts_and_merges() {
        let head = Block::paragraph("Hello");
        let tail = Block::paragraph("World");
        let mut blocks = vec![head.clone()];
        StoreEvent::Inserted {
            block: tail.clone(),
            index: 99,
        }
        .apply_to(&mut blocks);
        assert_eq!(blocks[1].id, tail.id);

        let mut merged = head.clone();
        merged.text = "HelloWorld".to_string();
        StoreEvent::Merged {
            source: tail,
            target: merged,
        }
        .apply_to(&mut blocks);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "HelloWorld");
    }

    #[test]
    fn test_store_event_json_shape() {
        let block = Block::new(BlockKind::Bullet, "item");
        let event = StoreEvent::Inserted {
            block: block.clone(),
            index: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "inserted");
        assert_eq!(json["index"], 2);
        assert_eq!(json["block"]["kind"]["type"], "bullet");
        assert_eq!(json["block"]["id"], block.id.to_string());
        let back: StoreEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
