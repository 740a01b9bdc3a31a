//! In-memory store.

use crate::error::StoreError;
use crate::store::BlockStore;
use async_trait::async_trait;
use block_editor_core::{Block, StoreEvent};
use futures::StreamExt;
use futures::stream::BoxStream;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// A [`BlockStore`] that keeps its snapshot in memory.
///
/// Events sent by a session are folded into the snapshot and recorded in an applied log.
/// [`push_external`](MemoryStore::push_external) simulates another writer.
pub struct MemoryStore {
    blocks: RwLock<Vec<Block>>,
    applied: Mutex<Vec<StoreEvent>>,
    updates: broadcast::Sender<StoreEvent>,
    reject_applies: AtomicBool,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::with_blocks(Vec::new())
    }

    /// A store pre-populated with `blocks`.
    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            blocks: RwLock::new(blocks),
            applied: Mutex::new(Vec::new()),
            updates,
            reject_applies: AtomicBool::new(false),
        }
    }

    /// Current stored snapshot.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.read().clone()
    }

    /// Every event accepted through [`BlockStore::apply`], in arrival order.
    pub fn applied(&self) -> Vec<StoreEvent> {
        self.applied.lock().clone()
    }

    /// Make subsequent applies fail (or succeed again).
    pub fn set_reject_applies(&self, reject: bool) {
        self.reject_applies.store(reject, Ordering::SeqCst);
    }

    /// Record a change made by another writer and broadcast it to subscribers.
    ///
    /// Returns the number of subscribers that received it.
    pub fn push_external(&self, event: StoreEvent) -> usize {
        event.apply_to(&mut self.blocks.write());
        self.updates.send(event).unwrap_or(0)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockStore for MemoryStore {
    async fn load(&self) -> Result<Vec<Block>, StoreError> {
        Ok(self.snapshot())
    }

    fn updates(&self) -> BoxStream<'static, StoreEvent> {
        BroadcastStream::new(self.updates.subscribe())
            .filter_map(|item| async move {
                match item {
                    Ok(event) => Some(event),
                    Err(err) => {
                        warn!(error = %err, "store update subscriber lagged");
                        None
                    }
                }
            })
            .boxed()
    }

    async fn apply(&self, event: StoreEvent) -> Result<(), StoreError> {
        if self.reject_applies.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected {
                kind: event.kind_name(),
                reason: "store is read-only".to_string(),
            });
        }
        event.apply_to(&mut self.blocks.write());
        self.applied.lock().push(event);
        Ok(())
    }
}
