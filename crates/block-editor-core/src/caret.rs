//! Caret snapshots.
//!
//! A [`CaretInfo`] is recomputed by the text widget on every keystroke and handed to the
//! editing policy. It records the caret in both UTF-16 and grapheme coordinates, measured from
//! one string snapshot so the two never disagree.

use crate::text;
use serde::{Deserialize, Serialize};

/// A range in UTF-16 code units (`start` plus `len`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Utf16Range {
    /// Start offset (UTF-16 code units).
    pub start: usize,
    /// Length (UTF-16 code units).
    pub len: usize,
}

impl Utf16Range {
    /// Create a range.
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// An empty range at `offset` (a plain caret).
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, 0)
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    /// Returns `true` if the range selects nothing.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Snapshot of the caret and selection inside one block's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretInfo {
    /// Current selection (UTF-16).
    pub selection: Utf16Range,
    /// Caret offset in UTF-16 code units.
    pub caret_utf16: usize,
    /// Caret offset in grapheme clusters.
    pub caret_grapheme: usize,
    /// Total text length in grapheme clusters.
    pub total_graphemes: usize,
    /// Total text length in UTF-16 code units.
    pub total_utf16: usize,
    /// Zero-based index of the line holding the caret.
    pub current_line_index: usize,
    /// Number of lines in the block (at least 1).
    pub total_line_count: usize,
    /// UTF-16 range of the caret's line, excluding its terminator.
    pub current_line_range: Utf16Range,
    /// Caret column within its line (UTF-16).
    pub column_utf16: usize,
    /// Caret column within its line (graphemes).
    pub column_grapheme: usize,
}

impl CaretInfo {
    /// Measure a caret snapshot for `text` with the given selection.
    ///
    /// The caret sits at `selection.start`, clamped to the text length.
    pub fn measure(text: &str, selection: Utf16Range) -> Self {
        let total_utf16 = text::utf16_len(text);
        let caret_utf16 = selection.start.min(total_utf16);
        let caret_byte = text::utf16_to_byte(text, caret_utf16);

        let lines = text::line_ranges_utf16(text);
        let total_line_count = lines.len().max(1);
        let current_line_index = lines
            .iter()
            .position(|line| line.start <= caret_utf16 && caret_utf16 <= line.end)
            .unwrap_or(total_line_count - 1);
        let line = lines
            .get(current_line_index)
            .cloned()
            .unwrap_or(0..total_utf16);

        let column_utf16 = caret_utf16.saturating_sub(line.start);
        let line_start_byte = text::utf16_to_byte(text, line.start);
        let column_grapheme = text
            .get(line_start_byte..caret_byte)
            .map(text::grapheme_len)
            .unwrap_or(0);

        Self {
            selection,
            caret_utf16,
            caret_grapheme: text::byte_to_grapheme(text, caret_byte),
            total_graphemes: text::grapheme_len(text),
            total_utf16,
            current_line_index,
            total_line_count,
            current_line_range: Utf16Range::new(line.start, line.end - line.start),
            column_utf16,
            column_grapheme,
        }
    }

    /// Measure a snapshot for a plain caret (no selection) at `caret_utf16`.
    pub fn at(text: &str, caret_utf16: usize) -> Self {
        Self::measure(text, Utf16Range::caret(caret_utf16))
    }

    /// At least one character is selected.
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// The caret sits at the very start with nothing selected.
    pub fn is_at_start(&self) -> bool {
        !self.has_selection() && self.caret_utf16 == 0
    }

    /// The caret sits at the very end with nothing selected.
    pub fn is_at_tail(&self) -> bool {
        !self.has_selection() && self.caret_grapheme == self.total_graphemes
    }

    /// The caret is on the first line.
    pub fn is_at_first_line(&self) -> bool {
        self.current_line_index == 0
    }

    /// The caret is on the last line.
    pub fn is_at_last_line(&self) -> bool {
        self.current_line_index + 1 == self.total_line_count
    }

    /// The block spans more than one line.
    pub fn is_multiline(&self) -> bool {
        self.total_line_count > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_single_line() {
        let info = CaretInfo::at("Hello", 3);
        assert_eq!(info.caret_utf16, 3);
        assert_eq!(info.caret_grapheme, 3);
        assert_eq!(info.total_graphemes, 5);
        assert_eq!(info.total_line_count, 1);
        assert_eq!(info.column_utf16, 3);
        assert!(!info.is_at_start());
        assert!(!info.is_at_tail());
        assert!(info.is_at_first_line() && info.is_at_last_line());
    }

    #[test]
    fn test_measure_tail_with_emoji() {
        let text = "hi👍🏽";
        let info = CaretInfo::at(text, text::utf16_len(text));
        assert_eq!(info.caret_utf16, 6);
        assert_eq!(info.caret_grapheme, 3);
        assert!(info.is_at_tail());
    }

    #[test]
    fn test_measure_clamps_caret() {
        let info = CaretInfo::at("abc", 42);
        assert_eq!(info.caret_utf16, 3);
        assert!(info.is_at_tail());
    }

    #[test]
    fn test_measure_multiline_columns() {
        let text = "first\nsecond\nthird";
        let info = CaretInfo::at(text, 9);
        assert_eq!(info.current_line_index, 1);
        assert_eq!(info.total_line_count, 3);
        assert_eq!(info.current_line_range, Utf16Range::new(6, 6));
        assert_eq!(info.column_utf16, 3);
        assert_eq!(info.column_grapheme, 3);
        assert!(!info.is_at_first_line());
        assert!(!info.is_at_last_line());

        // End of the first line belongs to the first line.
        let end_of_first = CaretInfo::at(text, 5);
        assert_eq!(end_of_first.current_line_index, 0);
    }

    #[test]
    fn test_selection_disables_boundaries() {
        let info = CaretInfo::measure("abc", Utf16Range::new(0, 3));
        assert!(info.has_selection());
        assert!(!info.is_at_start());
        assert!(!info.is_at_tail());
    }

    #[test]
    fn test_empty_text_is_start_and_tail() {
        let info = CaretInfo::at("", 0);
        assert!(info.is_at_start());
        assert!(info.is_at_tail());
        assert_eq!(info.total_line_count, 1);
    }
}
