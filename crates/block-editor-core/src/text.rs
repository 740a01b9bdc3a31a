//! Text offset helpers.
//!
//! Block text is stored as UTF-8 `String`s, but the text widget addresses it in **UTF-16 code
//! units** while user-facing lengths and navigation count **extended grapheme clusters**. The
//! functions here convert between those spaces (and byte offsets) for a single string snapshot.
//!
//! All conversions clamp: an offset past the end maps to the end, and a UTF-16 offset that lands
//! inside a surrogate pair rounds down to the preceding character boundary.

use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Length of `text` in extended grapheme clusters.
pub fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Convert a UTF-16 code unit offset to a byte offset.
pub fn utf16_to_byte(text: &str, utf16_offset: usize) -> usize {
    let mut current_utf16 = 0;
    for (byte_idx, ch) in text.char_indices() {
        let next = current_utf16 + ch.len_utf16();
        if next > utf16_offset {
            return byte_idx;
        }
        current_utf16 = next;
    }
    text.len()
}

/// Convert a byte offset to a UTF-16 code unit offset.
///
/// Offsets inside a multi-byte character count the characters strictly before it.
pub fn byte_to_utf16(text: &str, byte_offset: usize) -> usize {
    text.char_indices()
        .take_while(|(idx, _)| *idx < byte_offset)
        .map(|(_, ch)| ch.len_utf16())
        .sum()
}

/// Convert a grapheme offset to a byte offset.
pub fn grapheme_to_byte(text: &str, grapheme_offset: usize) -> usize {
    text.grapheme_indices(true)
        .nth(grapheme_offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Number of grapheme clusters that end at or before `byte_offset`.
pub fn byte_to_grapheme(text: &str, byte_offset: usize) -> usize {
    text.grapheme_indices(true)
        .take_while(|(idx, g)| idx + g.len() <= byte_offset)
        .count()
}

/// Convert a UTF-16 code unit offset to a grapheme offset.
pub fn utf16_to_grapheme(text: &str, utf16_offset: usize) -> usize {
    byte_to_grapheme(text, utf16_to_byte(text, utf16_offset))
}

/// Convert a grapheme offset to a UTF-16 code unit offset.
pub fn grapheme_to_utf16(text: &str, grapheme_offset: usize) -> usize {
    byte_to_utf16(text, grapheme_to_byte(text, grapheme_offset))
}

/// Split `text` at a grapheme offset, keeping the head in place and returning the tail.
///
/// An offset at or past the end leaves `text` untouched and returns an empty string.
pub fn split_off_graphemes(text: &mut String, grapheme_offset: usize) -> String {
    let at = grapheme_to_byte(text, grapheme_offset);
    text.split_off(at)
}

/// UTF-16 ranges of each logical line, excluding line terminators.
///
/// Lines are separated by `\n`; a `\r` directly before it is part of the terminator. `N`
/// terminators yield `N + 1` lines, so the result is never empty.
pub fn line_ranges_utf16(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for line in text.split('\n') {
        let content = line.strip_suffix('\r').unwrap_or(line);
        let content_len = utf16_len(content);
        ranges.push(start..start + content_len);
        // Full line length plus the '\n' itself.
        start += utf16_len(line) + 1;
    }
    ranges
}

/// Returns `true` when `text` spans more than one logical line.
pub fn is_multiline(text: &str) -> bool {
    text.contains('\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_with_astral_and_combining() {
        // "👍🏽" is one grapheme made of two astral scalars (4 UTF-16 units).
        let text = "a👍🏽e\u{301}";
        assert_eq!(utf16_len(text), 1 + 4 + 2);
        assert_eq!(grapheme_len(text), 3);
    }

    #[test]
    fn test_utf16_to_byte_rounds_down_inside_surrogate_pair() {
        let text = "a😀b";
        assert_eq!(utf16_to_byte(text, 0), 0);
        assert_eq!(utf16_to_byte(text, 1), 1);
        assert_eq!(utf16_to_byte(text, 2), 1);
        assert_eq!(utf16_to_byte(text, 3), 5);
        assert_eq!(utf16_to_byte(text, 99), text.len());
    }

    #[test]
    fn test_grapheme_offsets() {
        let text = "e\u{301}xy";
        assert_eq!(grapheme_to_byte(text, 1), 3);
        assert_eq!(grapheme_to_utf16(text, 1), 2);
        assert_eq!(utf16_to_grapheme(text, 2), 1);
        // Inside the cluster: the cluster is not complete yet.
        assert_eq!(utf16_to_grapheme(text, 1), 0);
        assert_eq!(grapheme_to_byte(text, 10), text.len());
    }

    #[test]
    fn test_split_off_graphemes() {
        let mut text = "Hello👍🏽World".to_string();
        let tail = split_off_graphemes(&mut text, 6);
        assert_eq!(text, "Hello👍🏽");
        assert_eq!(tail, "World");

        let mut short = "abc".to_string();
        assert_eq!(split_off_graphemes(&mut short, 3), "");
        assert_eq!(short, "abc");
    }

    #[test]
    fn test_line_ranges() {
        assert_eq!(line_ranges_utf16(""), vec![0..0]);
        assert_eq!(line_ranges_utf16("ab\ncd"), vec![0..2, 3..5]);
        assert_eq!(line_ranges_utf16("ab\r\n"), vec![0..2, 4..4]);
        assert!(is_multiline("a\nb"));
        assert!(!is_multiline("ab"));
    }
}
