#![warn(missing_docs)]
//! Block Editor Sync - Store Synchronization for `block-editor-core`
//!
//! # Overview
//!
//! This crate keeps a [`block_editor_core::DocumentController`] consistent with an external
//! store without feedback loops:
//!
//! - [`BlockStore`] is the store contract (`load`, `updates`, `apply`).
//! - [`DocumentSession`] runs the controller on a single-writer task, bootstraps it from the
//!   store, consumes the store's update stream and forwards local mutations.
//! - [`Coalescer`] batches rapid text edits per block until the typist pauses.
//! - [`MemoryStore`] is an in-memory store for tests and demos.
//!
//! # Module Description
//!
//! - [`store`] - Store trait
//! - [`memory`] - In-memory store
//! - [`session`] - Document session task and handle
//! - [`coalesce`] - Per-block deadline queue
//! - [`options`] - Session options

pub mod coalesce;
mod error;
pub mod memory;
pub mod options;
pub mod session;
pub mod store;

pub use coalesce::Coalescer;
pub use error::{StoreError, SyncError};
pub use memory::MemoryStore;
pub use options::SyncOptions;
pub use session::{DocumentSession, SessionHandle};
pub use store::BlockStore;
