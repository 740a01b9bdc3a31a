use block_editor_core::{
    Block, BlockKind, CaretInfo, DocumentController, DocumentEvent, EditorCommand, EditorKeyEvent,
    FocusChange, Utf16Range,
};
use pretty_assertions::assert_eq;

fn doc_of(blocks: &[Block]) -> DocumentController {
    DocumentController::with_blocks(blocks.to_vec())
}

fn texts(doc: &DocumentController) -> Vec<&str> {
    doc.blocks().iter().map(|b| b.text.as_str()).collect()
}

#[test]
fn test_space_after_hash_becomes_heading() {
    let block = Block::paragraph("#");
    let mut doc = doc_of(&[block.clone()]);

    let command = doc
        .command_for(&EditorKeyEvent::Space(CaretInfo::at("#", 1)), block.id)
        .unwrap();

    assert_eq!(command, EditorCommand::strip_prefix(2, 0));
    assert_eq!(doc.blocks()[0].kind, BlockKind::Heading { level: 1 });
    let events = doc.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], DocumentEvent::Update { index: 0, .. }));
}

#[test]
fn test_space_triggers_for_every_token() {
    let cases = [
        ("-", BlockKind::Bullet, 2),
        ("*", BlockKind::Bullet, 2),
        ("##", BlockKind::heading(2), 3),
        ("[]", BlockKind::todo(false), 3),
        ("###", BlockKind::heading(3), 4),
        ("[ ]", BlockKind::todo(false), 4),
        ("[x]", BlockKind::todo(true), 4),
    ];
    for (token, kind, remove) in cases {
        let block = Block::paragraph(token);
        let mut doc = doc_of(&[block.clone()]);
        let caret = CaretInfo::at(token, token.len());
        let command = doc
            .command_for(&EditorKeyEvent::Space(caret), block.id)
            .unwrap();
        assert_eq!(command.remove_prefix_utf16, Some(remove), "token {token:?}");
        assert_eq!(doc.blocks()[0].kind, kind, "token {token:?}");
    }
}

#[test]
fn test_space_without_trigger_is_noop() {
    let block = Block::paragraph("####");
    let mut doc = doc_of(&[block.clone()]);

    assert!(
        doc.command_for(&EditorKeyEvent::Space(CaretInfo::at("####", 4)), block.id)
            .is_none()
    );
    assert!(
        doc.command_for(&EditorKeyEvent::Space(CaretInfo::at("####", 0)), block.id)
            .is_none()
    );
    assert_eq!(doc.blocks()[0].kind, BlockKind::Paragraph);
    assert!(doc.drain_events().is_empty());
}

#[test]
fn test_return_at_tail_of_todo_appends_empty_todo() {
    let task = Block::new(BlockKind::todo(false), "Task");
    let mut doc = doc_of(&[task.clone()]);

    let command = doc
        .command_for(&EditorKeyEvent::return_key(CaretInfo::at("Task", 4)), task.id)
        .unwrap();

    assert_eq!(doc.len(), 2);
    let new_block = &doc.blocks()[1];
    assert_eq!(new_block.kind, BlockKind::todo(false));
    assert_eq!(new_block.text, "");
    assert_eq!(
        command.request_focus_change,
        Some(FocusChange::other_block(new_block.id, 0))
    );
    assert_eq!(doc.blocks()[0].text, "Task");
}

#[test]
fn test_return_on_checked_todo_continues_unchecked() {
    let done = Block::new(BlockKind::todo(true), "Done");
    let mut doc = doc_of(&[done.clone()]);

    doc.command_for(&EditorKeyEvent::return_key(CaretInfo::at("Done", 4)), done.id)
        .unwrap();

    assert_eq!(doc.blocks()[1].kind, BlockKind::todo(false));
}

#[test]
fn test_return_after_heading_starts_paragraph() {
    let title = Block::new(BlockKind::heading(2), "Title");
    let mut doc = doc_of(&[title.clone()]);

    doc.command_for(&EditorKeyEvent::return_key(CaretInfo::at("Title", 5)), title.id)
        .unwrap();

    assert_eq!(doc.blocks()[1].kind, BlockKind::Paragraph);
}

#[test]
fn test_return_inside_splits_at_grapheme_offset() {
    let text = "he👍🏽llo";
    let block = Block::new(BlockKind::Bullet, text);
    let after = Block::paragraph("after");
    let mut doc = doc_of(&[block.clone(), after.clone()]);

    // Caret right after the emoji (2 + 4 UTF-16 units).
    let caret = CaretInfo::at(text, 6);
    assert_eq!(caret.caret_grapheme, 3);
    let command = doc
        .command_for(&EditorKeyEvent::return_key(caret), block.id)
        .unwrap();

    assert_eq!(texts(&doc), vec!["he👍🏽", "llo", "after"]);
    assert_eq!(doc.blocks()[1].kind, BlockKind::Bullet);
    assert_eq!(
        command.request_focus_change,
        Some(FocusChange::other_block(doc.blocks()[1].id, 0))
    );

    let events = doc.drain_events();
    assert!(matches!(&events[0], DocumentEvent::Update { index: 0, .. }));
    assert!(matches!(&events[1], DocumentEvent::Insert { index: 1, .. }));
}

#[test]
fn test_split_reconstructs_text_at_every_offset() {
    let text = "añ😀b\u{301}c";
    let total = block_editor_core::text::grapheme_len(text);
    for k in 0..=total {
        let block = Block::paragraph(text);
        let mut doc = doc_of(&[block.clone()]);
        let utf16 = block_editor_core::text::grapheme_to_utf16(text, k);
        let caret = CaretInfo::at(text, utf16);
        let event = EditorKeyEvent::Return {
            caret,
            is_at_tail: false,
        };
        doc.command_for(&event, block.id).unwrap();

        let head = &doc.blocks()[0].text;
        let tail = &doc.blocks()[1].text;
        assert_eq!(format!("{head}{tail}"), text, "offset {k}");
        assert_eq!(block_editor_core::text::grapheme_len(head), k);
    }
}

#[test]
fn test_backspace_at_start_merges_into_previous() {
    let hello = Block::paragraph("Hello");
    let world = Block::paragraph("World");
    let mut doc = doc_of(&[hello.clone(), world.clone()]);

    let command = doc
        .command_for(&EditorKeyEvent::BackspaceAtStart, world.id)
        .unwrap();

    assert_eq!(texts(&doc), vec!["HelloWorld"]);
    assert_eq!(doc.blocks()[0].id, hello.id);
    assert_eq!(
        command.request_focus_change,
        Some(FocusChange::other_block(hello.id, 5))
    );
    assert_eq!(command.insert_text.as_deref(), Some("World"));
}

#[test]
fn test_merge_caret_counts_graphemes() {
    let prev = Block::paragraph("e\u{301}👍🏽");
    let cur = Block::paragraph("x");
    let mut doc = doc_of(&[prev.clone(), cur.clone()]);

    let command = doc
        .command_for(&EditorKeyEvent::BackspaceAtStart, cur.id)
        .unwrap();

    assert_eq!(
        command.request_focus_change,
        Some(FocusChange::other_block(prev.id, 2))
    );
}

#[test]
fn test_backspace_at_start_demotes_styled_block() {
    let prev = Block::paragraph("before");
    let bullet = Block::new(BlockKind::Bullet, "item");
    let mut doc = doc_of(&[prev, bullet.clone()]);

    let command = doc
        .command_for(&EditorKeyEvent::BackspaceAtStart, bullet.id)
        .unwrap();

    assert_eq!(command, EditorCommand::caret(0));
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.blocks()[1].kind, BlockKind::Paragraph);
    assert_eq!(doc.blocks()[1].text, "item");
}

#[test]
fn test_backspace_on_first_paragraph_is_noop() {
    let only = Block::paragraph("alone");
    let mut doc = doc_of(&[only.clone()]);

    assert!(
        doc.command_for(&EditorKeyEvent::BackspaceAtStart, only.id)
            .is_none()
    );
    assert!(doc.drain_events().is_empty());
}

#[test]
fn test_shift_return_is_never_handled() {
    let block = Block::paragraph("abc");
    let mut doc = doc_of(&[block.clone()]);
    assert!(
        doc.command_for(&EditorKeyEvent::ShiftReturn(CaretInfo::at("abc", 1)), block.id)
            .is_none()
    );
}

#[test]
fn test_arrow_up_matches_column_or_clamps() {
    let short = Block::paragraph("ab");
    let long = Block::paragraph("abcdef");
    let mut doc = doc_of(&[short.clone(), long.clone()]);

    let command = doc
        .command_for(&EditorKeyEvent::ArrowUp(CaretInfo::at("abcdef", 5)), long.id)
        .unwrap();
    assert_eq!(
        command.request_focus_change,
        Some(FocusChange::other_block(short.id, 2))
    );

    let command = doc
        .command_for(&EditorKeyEvent::ArrowUp(CaretInfo::at("abcdef", 1)), long.id)
        .unwrap();
    assert_eq!(
        command.request_focus_change,
        Some(FocusChange::other_block(short.id, 1))
    );
}

#[test]
fn test_arrow_up_into_multiline_block_lands_at_end() {
    let multi = Block::paragraph("first\nsecond");
    let below = Block::paragraph("xy");
    let mut doc = doc_of(&[multi.clone(), below.clone()]);

    let command = doc
        .command_for(&EditorKeyEvent::ArrowUp(CaretInfo::at("xy", 1)), below.id)
        .unwrap();

    assert_eq!(
        command.request_focus_change,
        Some(FocusChange::other_block(multi.id, 12))
    );
}

#[test]
fn test_arrow_up_inside_multiline_is_left_to_widget() {
    let above = Block::paragraph("above");
    let text = "one\ntwo";
    let multi = Block::paragraph(text);
    let mut doc = doc_of(&[above, multi.clone()]);

    // Second line: normal intra-block movement.
    assert!(
        doc.command_for(&EditorKeyEvent::ArrowUp(CaretInfo::at(text, 5)), multi.id)
            .is_none()
    );
    // First line: leaves the block.
    assert!(
        doc.command_for(&EditorKeyEvent::ArrowUp(CaretInfo::at(text, 1)), multi.id)
            .is_some()
    );
}

#[test]
fn test_arrow_down_uses_column_on_last_line() {
    let text = "one\ntwo";
    let multi = Block::paragraph(text);
    let below = Block::paragraph("x");
    let mut doc = doc_of(&[multi.clone(), below.clone()]);

    assert!(
        doc.command_for(&EditorKeyEvent::ArrowDown(CaretInfo::at(text, 2)), multi.id)
            .is_none()
    );
    let command = doc
        .command_for(&EditorKeyEvent::ArrowDown(CaretInfo::at(text, 6)), multi.id)
        .unwrap();
    assert_eq!(
        command.request_focus_change,
        Some(FocusChange::other_block(below.id, 1))
    );
}

#[test]
fn test_arrows_ignore_selection_and_missing_neighbours() {
    let a = Block::paragraph("abc");
    let b = Block::paragraph("def");
    let mut doc = doc_of(&[a.clone(), b.clone()]);

    let selected = CaretInfo::measure("def", Utf16Range::new(0, 2));
    assert!(
        doc.command_for(&EditorKeyEvent::ArrowUp(selected.clone()), b.id)
            .is_none()
    );
    assert!(
        doc.command_for(&EditorKeyEvent::ArrowLeft(selected), b.id)
            .is_none()
    );
    assert!(
        doc.command_for(&EditorKeyEvent::ArrowUp(CaretInfo::at("abc", 0)), a.id)
            .is_none()
    );
    assert!(
        doc.command_for(&EditorKeyEvent::ArrowDown(CaretInfo::at("def", 3)), b.id)
            .is_none()
    );
}

#[test]
fn test_arrow_left_and_right_cross_boundaries() {
    let a = Block::paragraph("a😀");
    let b = Block::paragraph("bc");
    let mut doc = doc_of(&[a.clone(), b.clone()]);

    let left = doc
        .command_for(&EditorKeyEvent::ArrowLeft(CaretInfo::at("bc", 0)), b.id)
        .unwrap();
    assert_eq!(
        left.request_focus_change,
        Some(FocusChange::other_block(a.id, 3))
    );

    let right = doc
        .command_for(&EditorKeyEvent::ArrowRight(CaretInfo::at("a😀", 3)), a.id)
        .unwrap();
    assert_eq!(
        right.request_focus_change,
        Some(FocusChange::other_block(b.id, 0))
    );

    assert!(
        doc.command_for(&EditorKeyEvent::ArrowRight(CaretInfo::at("a😀", 1)), a.id)
            .is_none()
    );
}

#[test]
fn test_unknown_block_is_noop() {
    let mut doc = DocumentController::new();
    let stranger = Block::paragraph("stranger");
    assert!(
        doc.command_for(&EditorKeyEvent::BackspaceAtStart, stranger.id)
            .is_none()
    );
}
