//! The external store contract.

use crate::error::StoreError;
use async_trait::async_trait;
use block_editor_core::{Block, StoreEvent};
use futures::stream::BoxStream;

/// Persistence or transport behind a document.
///
/// A session calls [`load`](BlockStore::load) once, then subscribes to
/// [`updates`](BlockStore::updates) and sends every locally originated mutation through
/// [`apply`](BlockStore::apply). Apply failures are logged by the session and never reach the
/// editing path.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Load the stored snapshot. An empty vector means the store holds nothing yet.
    async fn load(&self) -> Result<Vec<Block>, StoreError>;

    /// Stream of changes made by other writers.
    ///
    /// The stream may end at any time (including immediately); the session then simply stops
    /// listening.
    fn updates(&self) -> BoxStream<'static, StoreEvent>;

    /// Persist one event.
    async fn apply(&self, event: StoreEvent) -> Result<(), StoreError>;
}
