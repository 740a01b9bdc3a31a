//! Key intents in, editor commands out.
//!
//! The widget layer classifies raw key presses into [`EditorKeyEvent`]s. The editing policy
//! answers with an optional [`EditorCommand`]: a bundle of independent text, caret and focus
//! effects for the widget to apply (see [`crate::row::BlockRow::apply`] for the order).

use crate::block::BlockId;
use crate::caret::{CaretInfo, Utf16Range};
use serde::{Deserialize, Serialize};

/// Keyboard intent inside one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorKeyEvent {
    /// Space pressed; the caret is measured before the space is inserted.
    Space(CaretInfo),
    /// Return pressed.
    Return {
        /// Caret snapshot.
        caret: CaretInfo,
        /// Whether the caret sits at the end of the block.
        is_at_tail: bool,
    },
    /// Shift+Return (soft line break inside the block).
    ShiftReturn(CaretInfo),
    /// Backspace with the caret at the absolute start and no selection.
    BackspaceAtStart,
    /// Arrow up.
    ArrowUp(CaretInfo),
    /// Arrow down.
    ArrowDown(CaretInfo),
    /// Arrow left.
    ArrowLeft(CaretInfo),
    /// Arrow right.
    ArrowRight(CaretInfo),
}

impl EditorKeyEvent {
    /// Build a Return event, deriving `is_at_tail` from the caret.
    pub fn return_key(caret: CaretInfo) -> Self {
        let is_at_tail = caret.is_at_tail();
        Self::Return { caret, is_at_tail }
    }
}

/// Focus movement requested by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FocusChange {
    /// Focus another block and put the caret at a UTF-16 offset.
    OtherBlock {
        /// Target block.
        id: BlockId,
        /// Caret offset in the target block.
        caret: usize,
    },
    /// Drop focus entirely.
    Clear,
}

impl FocusChange {
    /// Focus `id` with the caret at `caret`.
    pub fn other_block(id: BlockId, caret: usize) -> Self {
        Self::OtherBlock { id, caret }
    }

    /// Target block of the change, if any.
    pub fn target(&self) -> Option<BlockId> {
        match self {
            Self::OtherBlock { id, .. } => Some(*id),
            Self::Clear => None,
        }
    }
}

/// Effects the widget should apply after a policy decision.
///
/// All fields are independent; a command may combine several of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorCommand {
    /// Number of UTF-16 units to delete from the start of the text (e.g. `"# "` → 2).
    pub remove_prefix_utf16: Option<usize>,
    /// Caret position to set afterwards (UTF-16).
    pub set_caret_utf16: Option<usize>,
    /// Focus change to perform last.
    pub request_focus_change: Option<FocusChange>,
    /// Text to insert at the current selection.
    pub insert_text: Option<String>,
    /// Arbitrary range replacement, applied first.
    pub replace_range: Option<(Utf16Range, String)>,
}

impl EditorCommand {
    /// A command that only moves focus.
    pub fn focus(change: FocusChange) -> Self {
        Self {
            request_focus_change: Some(change),
            ..Self::default()
        }
    }

    /// A command that only moves the caret.
    pub fn caret(offset: usize) -> Self {
        Self {
            set_caret_utf16: Some(offset),
            ..Self::default()
        }
    }

    /// Remove a prefix, then place the caret.
    pub fn strip_prefix(remove_utf16: usize, caret: usize) -> Self {
        Self {
            remove_prefix_utf16: Some(remove_utf16),
            set_caret_utf16: Some(caret),
            ..Self::default()
        }
    }

    /// Attach text to insert.
    pub fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    /// Attach a range replacement.
    pub fn with_replace_range(mut self, range: Utf16Range, text: impl Into<String>) -> Self {
        self.replace_range = Some((range, text.into()));
        self
    }
}
