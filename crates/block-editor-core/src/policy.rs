//! Editing policy: key intent + caret snapshot → structural edit.
//!
//! # Overview
//!
//! The policy is stateless. Everything it needs is in the event, the block snapshot and the
//! [`BlockEditingContext`]; all mutations go through the context, so a policy decision is
//! deterministic for a given document.
//!
//! | Event | Effect |
//! |-------|--------|
//! | Space | leading token (`# `, `- `, `[ ] ` …) converts the block kind |
//! | Return | split at the caret (or append an empty sibling at the tail) |
//! | Backspace at start | demote to paragraph, or merge into the previous block |
//! | Arrows | move focus across block boundaries |
//!
//! When a precondition fails (no neighbour, no trigger, a selection is present) the policy
//! returns `None` and the widget keeps its default behaviour.

use crate::block::{Block, BlockKind};
use crate::caret::CaretInfo;
use crate::command::{EditorCommand, EditorKeyEvent, FocusChange};
use crate::context::BlockEditingContext;
use crate::text;
use crate::trigger::match_space_trigger;
use tracing::debug;

/// Decides what a key press does to the document.
pub trait EditingPolicy: Send {
    /// Interpret `event` for `block` (a snapshot of the focused block) and return the command
    /// for the widget, mutating the document through `context` as needed.
    fn decide(
        &self,
        event: &EditorKeyEvent,
        block: Block,
        context: &mut dyn BlockEditingContext,
    ) -> Option<EditorCommand>;
}

/// The standard block editing behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEditingPolicy;

impl EditingPolicy for DefaultEditingPolicy {
    fn decide(
        &self,
        event: &EditorKeyEvent,
        block: Block,
        context: &mut dyn BlockEditingContext,
    ) -> Option<EditorCommand> {
        match event {
            EditorKeyEvent::Space(caret) => handle_space(caret, block, context),
            EditorKeyEvent::Return { caret, is_at_tail } => {
                handle_return(caret, *is_at_tail, block, context)
            }
            // Soft breaks are a pure text-widget effect.
            EditorKeyEvent::ShiftReturn(_) => None,
            EditorKeyEvent::BackspaceAtStart => handle_backspace_at_start(block, context),
            EditorKeyEvent::ArrowUp(caret) => handle_arrow_up(caret, &block, context),
            EditorKeyEvent::ArrowDown(caret) => handle_arrow_down(caret, &block, context),
            EditorKeyEvent::ArrowLeft(caret) => handle_arrow_left(caret, &block, context),
            EditorKeyEvent::ArrowRight(caret) => handle_arrow_right(caret, &block, context),
        }
    }
}

fn handle_space(
    caret: &CaretInfo,
    mut block: Block,
    context: &mut dyn BlockEditingContext,
) -> Option<EditorCommand> {
    let matched = match_space_trigger(&block.text, caret.caret_utf16)?;
    debug!(block = %block.id, kind = ?matched.kind, "space trigger matched");

    block.kind = matched.kind;
    context.update(&block, None);

    Some(EditorCommand::strip_prefix(matched.remove_utf16, 0))
}

fn handle_return(
    caret: &CaretInfo,
    is_at_tail: bool,
    mut block: Block,
    context: &mut dyn BlockEditingContext,
) -> Option<EditorCommand> {
    let index = context.index_of(block.id)?;
    let next_kind = block.kind.continuation();

    let sibling = if is_at_tail {
        Block::empty(next_kind)
    } else {
        let tail = text::split_off_graphemes(&mut block.text, caret.caret_grapheme);
        context.update(&block, Some(index));
        Block::new(next_kind, tail)
    };

    let sibling_id = sibling.id;
    context.insert(sibling, index + 1)?;
    debug!(block = %block.id, new_block = %sibling_id, is_at_tail, "block split");

    Some(EditorCommand::focus(FocusChange::other_block(sibling_id, 0)))
}

fn handle_backspace_at_start(
    mut block: Block,
    context: &mut dyn BlockEditingContext,
) -> Option<EditorCommand> {
    if block.kind != BlockKind::Paragraph {
        block.kind = BlockKind::Paragraph;
        context.update(&block, None);
        return Some(EditorCommand::caret(0));
    }

    let mut previous = context.previous(block.id)?.clone();
    let caret = previous.grapheme_len();

    context.remove(block.id)?;
    previous.text.push_str(&block.text);
    context.update(&previous, None);
    context.notify_merge(&block, &previous);
    debug!(source = %block.id, target = %previous.id, caret, "blocks merged");

    Some(
        EditorCommand::focus(FocusChange::other_block(previous.id, caret))
            .with_insert_text(block.text),
    )
}

fn handle_arrow_up(
    caret: &CaretInfo,
    block: &Block,
    context: &mut dyn BlockEditingContext,
) -> Option<EditorCommand> {
    if caret.has_selection() || (caret.is_multiline() && !caret.is_at_first_line()) {
        return None;
    }

    let previous = context.previous(block.id)?;
    let previous_len = previous.utf16_len();
    // A multi-line neighbour ends on its last line; land there rather than on its first line.
    let target = if previous.is_multiline() {
        previous_len
    } else {
        caret.column_utf16.min(previous_len)
    };

    Some(EditorCommand::focus(FocusChange::other_block(
        previous.id,
        target,
    )))
}

fn handle_arrow_down(
    caret: &CaretInfo,
    block: &Block,
    context: &mut dyn BlockEditingContext,
) -> Option<EditorCommand> {
    if caret.has_selection() || (caret.is_multiline() && !caret.is_at_last_line()) {
        return None;
    }

    let next = context.next(block.id)?;
    let target = caret.column_utf16.min(next.utf16_len());

    Some(EditorCommand::focus(FocusChange::other_block(next.id, target)))
}

fn handle_arrow_left(
    caret: &CaretInfo,
    block: &Block,
    context: &mut dyn BlockEditingContext,
) -> Option<EditorCommand> {
    if !caret.is_at_start() {
        return None;
    }

    let previous = context.previous(block.id)?;
    Some(EditorCommand::focus(FocusChange::other_block(
        previous.id,
        previous.utf16_len(),
    )))
}

fn handle_arrow_right(
    caret: &CaretInfo,
    block: &Block,
    context: &mut dyn BlockEditingContext,
) -> Option<EditorCommand> {
    if !caret.is_at_tail() {
        return None;
    }

    let next = context.next(block.id)?;
    Some(EditorCommand::focus(FocusChange::other_block(next.id, 0)))
}
