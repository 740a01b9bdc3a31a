//! Headless text row.
//!
//! [`BlockRow`] models the text widget that renders one block: a string addressed in UTF-16
//! code units plus a selection. It produces [`CaretInfo`] snapshots for the policy and applies
//! the [`EditorCommand`]s that come back.
//!
//! # Example
//!
//! ```rust
//! use block_editor_core::{BlockRow, BlockId, EditorCommand};
//!
//! let mut row = BlockRow::new(BlockId::new(), "# ");
//! let outcome = row.apply(&EditorCommand::strip_prefix(2, 0), || {});
//! assert!(outcome.text_changed);
//! assert_eq!(row.text(), "");
//! ```

use crate::block::{Block, BlockId};
use crate::caret::{CaretInfo, Utf16Range};
use crate::command::{EditorCommand, FocusChange};
use crate::text;

/// Result of [`BlockRow::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowOutcome {
    /// Whether the row's text changed.
    pub text_changed: bool,
    /// Focus change the caller must carry out.
    pub focus: Option<FocusChange>,
}

/// The editable text of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRow {
    id: BlockId,
    text: String,
    selection: Utf16Range,
}

impl BlockRow {
    /// Create a row with the caret at the end of `text`.
    pub fn new(id: BlockId, text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text::utf16_len(&text);
        Self {
            id,
            text,
            selection: Utf16Range::caret(end),
        }
    }

    /// Create a row mirroring `block`.
    pub fn from_block(block: &Block) -> Self {
        Self::new(block.id, block.text.clone())
    }

    /// Block this row renders.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current selection (UTF-16).
    pub fn selection(&self) -> Utf16Range {
        self.selection
    }

    /// Length in UTF-16 code units.
    pub fn utf16_len(&self) -> usize {
        text::utf16_len(&self.text)
    }

    /// Snapshot of the caret for the editing policy.
    pub fn caret_info(&self) -> CaretInfo {
        CaretInfo::measure(&self.text, self.selection)
    }

    /// Replace the whole text (e.g. after an external update); the selection is clamped.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selection = self.clamp_range(self.selection);
    }

    /// Set the selection, clamped to the text.
    pub fn select(&mut self, range: Utf16Range) {
        self.selection = self.clamp_range(range);
    }

    /// Collapse the selection to a caret at `offset` (clamped).
    pub fn move_caret(&mut self, offset: usize) {
        self.selection = Utf16Range::caret(offset.min(self.utf16_len()));
    }

    /// Replace `range` (or the selection when `None`) with `replacement`.
    ///
    /// The caret ends up right after the inserted text.
    pub fn edit(&mut self, range: Option<Utf16Range>, replacement: &str) {
        let range = self.clamp_range(range.unwrap_or(self.selection));
        let start = text::utf16_to_byte(&self.text, range.start);
        let end = text::utf16_to_byte(&self.text, range.end());
        self.text.replace_range(start..end, replacement);

        let caret = text::byte_to_utf16(&self.text, start + replacement.len());
        self.selection = Utf16Range::caret(caret);
    }

    /// Insert `text` at the selection.
    pub fn insert_text(&mut self, text: &str) {
        self.edit(None, text);
    }

    /// Delete up to `len` UTF-16 units from the start of the text.
    ///
    /// Returns `false` when nothing was removed.
    pub fn remove_prefix(&mut self, len: usize) -> bool {
        let len = len.min(self.utf16_len());
        if len == 0 {
            return false;
        }
        self.edit(Some(Utf16Range::new(0, len)), "");
        true
    }

    /// Apply a policy command.
    ///
    /// Effects run in a fixed order: range replacement, text insertion, prefix removal, caret
    /// placement. When the command requests a focus change, `before_focus_change` runs last,
    /// right before the change is handed back in the outcome.
    pub fn apply<F>(&mut self, command: &EditorCommand, before_focus_change: F) -> RowOutcome
    where
        F: FnOnce(),
    {
        let mut text_changed = false;

        if let Some((range, replacement)) = &command.replace_range {
            self.edit(Some(*range), replacement);
            text_changed = true;
        }
        if let Some(insertion) = &command.insert_text {
            let range = command.replace_range.as_ref().map(|(range, _)| *range);
            self.edit(range, insertion);
            text_changed = true;
        }
        if let Some(remove) = command.remove_prefix_utf16 {
            text_changed |= self.remove_prefix(remove);
        }
        if let Some(caret) = command.set_caret_utf16 {
            self.move_caret(caret);
        }

        let focus = command.request_focus_change;
        if focus.is_some() {
            before_focus_change();
        }

        RowOutcome {
            text_changed,
            focus,
        }
    }

    fn clamp_range(&self, range: Utf16Range) -> Utf16Range {
        let len = self.utf16_len();
        let start = range.start.min(len);
        let end = range.end().min(len);
        Utf16Range::new(start, end - start)
    }
}
