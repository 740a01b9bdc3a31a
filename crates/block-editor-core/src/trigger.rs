//! Leading-token triggers.
//!
//! Typing a space right after a short markdown-like token at the start of a block converts the
//! block's kind: `# ` becomes a heading, `- ` a bullet, `[ ] ` a checkbox and so on. Matching
//! looks at a fixed window of at most three UTF-16 code units before the caret.

use crate::block::BlockKind;

const SPACE: u16 = b' ' as u16;
const HASH: u16 = b'#' as u16;
const STAR: u16 = b'*' as u16;
const DASH: u16 = b'-' as u16;
const LBRACKET: u16 = b'[' as u16;
const RBRACKET: u16 = b']' as u16;
const LOWER_X: u16 = b'x' as u16;

/// Longest recognised token, in UTF-16 code units.
pub const MAX_TRIGGER_LEN: usize = 3;

/// A recognised trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerMatch {
    /// Kind the block converts to.
    pub kind: BlockKind,
    /// UTF-16 units to delete from the start of the block: the token plus the typed space.
    pub remove_utf16: usize,
}

/// Match the token in front of the caret when space is pressed.
///
/// `caret_utf16` is the caret offset at the moment the key went down, before the space is
/// inserted. Only offsets `1..=3` can match.
pub fn match_space_trigger(text: &str, caret_utf16: usize) -> Option<TriggerMatch> {
    if !(1..=MAX_TRIGGER_LEN).contains(&caret_utf16) {
        return None;
    }

    let mut window = [0u16; MAX_TRIGGER_LEN];
    let mut available = 0;
    for (slot, unit) in window.iter_mut().zip(text.encode_utf16()) {
        *slot = unit;
        available += 1;
    }
    if available < caret_utf16 {
        return None;
    }

    let kind = match window[..caret_utf16] {
        [HASH] => BlockKind::heading(1),
        [DASH] | [STAR] => BlockKind::Bullet,
        [HASH, HASH] => BlockKind::heading(2),
        [LBRACKET, RBRACKET] => BlockKind::todo(false),
        [HASH, HASH, HASH] => BlockKind::heading(3),
        [LBRACKET, SPACE, RBRACKET] => BlockKind::todo(false),
        [LBRACKET, LOWER_X, RBRACKET] => BlockKind::todo(true),
        _ => return None,
    };

    Some(TriggerMatch {
        kind,
        remove_utf16: caret_utf16 + 1,
    })
}
