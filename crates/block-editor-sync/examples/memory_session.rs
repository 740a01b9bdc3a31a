//! Drive a document session against an in-memory store and dump what the store received.
//!
//! Run with `RUST_LOG=debug` to see the session and store writer logs.

use block_editor_core::{
    Block, BlockRow, DocumentController, EditorKeyEvent, Key, RowAction, route_key,
};
use block_editor_sync::{DocumentSession, MemoryStore, SyncOptions};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let first = Block::paragraph("");
    let store = Arc::new(MemoryStore::new());
    let session = DocumentSession::spawn(
        DocumentController::with_blocks(vec![first.clone()]),
        store.clone(),
        SyncOptions::default(),
    );

    // Type "#" then space: the block becomes a heading.
    let mut row = BlockRow::from_block(&first);
    row.insert_text("#");
    session.edit_text(first.id, row.text()).await?;
    if let Some(RowAction::InsertSpace(caret)) = route_key(Key::Space, false, &row.caret_info()) {
        row.insert_text(" ");
        session.edit_text(first.id, row.text()).await?;
        if let Some(command) = session
            .command_for(EditorKeyEvent::Space(caret), first.id)
            .await?
        {
            row.apply(&command, || {});
            session.edit_text(first.id, row.text()).await?;
        }
    }

    // Type a title and press Return at the end.
    row.insert_text("Groceries");
    session.edit_text(first.id, row.text()).await?;
    if let Some(RowAction::Policy(event)) = route_key(Key::Return, false, &row.caret_info())
        && let Some(command) = session.command_for(event, first.id).await?
    {
        let outcome = row.apply(&command, || {});
        if let Some(focus) = outcome.focus {
            session.apply_focus_change(focus).await?;
        }
    }

    let controller = session.shutdown().await?;
    for block in controller.blocks() {
        println!("{:?}: {:?}", block.kind, block.text);
    }

    for event in store.applied() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
