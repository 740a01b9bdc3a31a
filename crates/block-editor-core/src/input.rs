//! Key routing: abstract key presses to row actions.

use crate::caret::CaretInfo;
use crate::command::EditorKeyEvent;

/// Keys the block editor reacts to. Everything else is left to the text widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Main Return key.
    Return,
    /// Enter on the numeric keypad.
    KeypadEnter,
    /// Space bar.
    Space,
    /// Backspace (delete backwards).
    Backspace,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
}

impl Key {
    /// Map a macOS virtual key code.
    pub fn from_key_code(code: u16) -> Option<Self> {
        match code {
            36 => Some(Self::Return),
            49 => Some(Self::Space),
            51 => Some(Self::Backspace),
            76 => Some(Self::KeypadEnter),
            123 => Some(Self::Left),
            124 => Some(Self::Right),
            125 => Some(Self::Down),
            126 => Some(Self::Up),
            _ => None,
        }
    }
}

/// What the row should do with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Ask the editing policy.
    Policy(EditorKeyEvent),
    /// Insert a space, then ask the policy with this pre-insertion caret.
    InsertSpace(CaretInfo),
    /// Insert a line break inside the block.
    SoftBreak,
}

/// Classify `key` given the current caret.
///
/// `None` means the widget keeps its default handling.
pub fn route_key(key: Key, shift: bool, caret: &CaretInfo) -> Option<RowAction> {
    match key {
        Key::Return | Key::KeypadEnter => {
            if shift {
                Some(RowAction::SoftBreak)
            } else {
                Some(RowAction::Policy(EditorKeyEvent::return_key(caret.clone())))
            }
        }
        Key::Space => Some(RowAction::InsertSpace(caret.clone())),
        Key::Backspace => caret
            .is_at_start()
            .then_some(RowAction::Policy(EditorKeyEvent::BackspaceAtStart)),
        Key::Up => {
            if caret.has_selection() || (caret.is_multiline() && !caret.is_at_first_line()) {
                return None;
            }
            Some(RowAction::Policy(EditorKeyEvent::ArrowUp(caret.clone())))
        }
        Key::Down => {
            if caret.has_selection() || (caret.is_multiline() && !caret.is_at_last_line()) {
                return None;
            }
            Some(RowAction::Policy(EditorKeyEvent::ArrowDown(caret.clone())))
        }
        Key::Left if caret.is_at_start() => {
            Some(RowAction::Policy(EditorKeyEvent::ArrowLeft(caret.clone())))
        }
        Key::Right if caret.is_at_tail() => {
            Some(RowAction::Policy(EditorKeyEvent::ArrowRight(caret.clone())))
        }
        Key::Left | Key::Right => None,
    }
}
