#![warn(missing_docs)]
//! Block Editor Core - Headless Block Editing Engine
//!
//! # Overview
//!
//! `block-editor-core` is the decision engine behind a block-structured text editor. A document
//! is an ordered sequence of typed [`Block`]s (paragraph, heading, bullet, ordered item, checkbox
//! item). Key presses inside a block can convert its kind (`"# "` → heading), split it (Return),
//! merge it into its predecessor (Backspace at start), or move focus across block boundaries.
//!
//! The crate does no rendering and owns no runtime. It turns a keyboard intent plus a caret
//! snapshot into an [`EditorCommand`] for the text widget, mutates the document, and records
//! what changed for observers and for an external store.
//!
//! # Core Features
//!
//! - **Typed blocks** with stable opaque ids ([`BlockId`])
//! - **Trigger matching**: fixed-window detection of leading markdown-like tokens
//! - **Editing policy**: split, merge, demote and cross-block caret navigation
//! - **Document controller**: pending-event queue, version counter, origin-tagged store output
//! - **Headless row**: UTF-16 addressed text + selection, applies commands in a fixed order
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  BlockRow + key router                      │  ← Widget side
//! ├─────────────────────────────────────────────┤
//! │  DocumentController                         │  ← Owner, events, store sink
//! ├─────────────────────────────────────────────┤
//! │  EditingPolicy / BlockEditingContext        │  ← Decisions
//! ├─────────────────────────────────────────────┤
//! │  Trigger matcher, CaretInfo                 │  ← Pure helpers
//! ├─────────────────────────────────────────────┤
//! │  Block model, text offsets                  │  ← Data
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use block_editor_core::{
//!     Block, BlockKind, BlockRow, DocumentController, Key, RowAction, route_key,
//! };
//!
//! let block = Block::paragraph("#");
//! let id = block.id;
//! let mut doc = DocumentController::with_blocks(vec![block.clone()]);
//! let mut row = BlockRow::from_block(&block);
//!
//! // Space: the row inserts the space, then asks the policy with the earlier caret.
//! let Some(RowAction::InsertSpace(caret)) = route_key(Key::Space, false, &row.caret_info()) else {
//!     unreachable!()
//! };
//! row.insert_text(" ");
//! let command = doc
//!     .command_for(&block_editor_core::EditorKeyEvent::Space(caret), id)
//!     .unwrap();
//! row.apply(&command, || {});
//!
//! assert_eq!(doc.blocks()[0].kind, BlockKind::Heading { level: 1 });
//! assert_eq!(row.text(), "");
//! ```
//!
//! # Module Description
//!
//! - [`block`] - Block model and ids
//! - [`text`] - UTF-16 / grapheme / byte offset conversions
//! - [`caret`] - Caret snapshots
//! - [`trigger`] - Leading-token matcher
//! - [`command`] - Key events, focus changes, editor commands
//! - [`context`] - Capability interface used by policies
//! - [`policy`] - Default editing policy
//! - [`event`] - Document and store events
//! - [`document`] - Document controller
//! - [`row`] - Headless text row
//! - [`input`] - Key routing

pub mod block;
pub mod caret;
pub mod command;
pub mod context;
pub mod document;
pub mod event;
pub mod input;
pub mod policy;
pub mod row;
pub mod text;
pub mod trigger;

pub use block::{Block, BlockId, BlockKind};
pub use caret::{CaretInfo, Utf16Range};
pub use command::{EditorCommand, EditorKeyEvent, FocusChange};
pub use context::BlockEditingContext;
pub use document::{DocumentController, StoreSink};
pub use event::{DocumentEvent, StoreEvent};
pub use input::{Key, RowAction, route_key};
pub use policy::{DefaultEditingPolicy, EditingPolicy};
pub use row::{BlockRow, RowOutcome};
pub use trigger::{TriggerMatch, match_space_trigger};
