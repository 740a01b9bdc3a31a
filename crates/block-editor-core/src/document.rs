//! Document controller
//!
//! Owns the ordered block sequence and is its only mutator.
//!
//! # Overview
//!
//! Every structural mutation goes through one internal path that:
//!
//! 1. applies the change to the in-memory sequence (indices clamped, stale hints re-resolved),
//! 2. enqueues a [`DocumentEvent`] and bumps the version counter,
//! 3. for locally originated changes, serializes a [`StoreEvent`] into the store sink.
//!
//! Changes received from the store ([`DocumentController::apply_external`]) take the same path
//! with the third step suppressed, so nothing echoes back to the store.
//!
//! # Example
//!
//! ```rust
//! use block_editor_core::{Block, DocumentController, EditorKeyEvent, FocusChange};
//!
//! let hello = Block::paragraph("Hello");
//! let world = Block::paragraph("World");
//! let (hello_id, world_id) = (hello.id, world.id);
//! let mut doc = DocumentController::with_blocks(vec![hello, world]);
//!
//! let command = doc
//!     .command_for(&EditorKeyEvent::BackspaceAtStart, world_id)
//!     .unwrap();
//! assert_eq!(
//!     command.request_focus_change,
//!     Some(FocusChange::other_block(hello_id, 5))
//! );
//! assert_eq!(doc.blocks()[0].text, "HelloWorld");
//! // Remove "World", then update "Hello".
//! assert_eq!(doc.drain_events().len(), 2);
//! assert!(doc.drain_events().is_empty());
//! ```

use crate::block::{Block, BlockId, BlockKind};
use crate::command::{EditorCommand, EditorKeyEvent, FocusChange};
use crate::context::BlockEditingContext;
use crate::event::{DocumentEvent, StoreEvent, find_index};
use crate::policy::{DefaultEditingPolicy, EditingPolicy};
use tracing::{debug, warn};

/// Receives locally originated store events.
///
/// The sink is fire-and-forget: it must not block, and failures stay on its side.
pub type StoreSink = Box<dyn FnMut(StoreEvent) + Send>;

/// Where a mutation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationOrigin {
    /// Produced by the editing policy or a local API call; forwarded to the store.
    Local,
    /// Received from the store; never forwarded back.
    External,
}

/// Owner of the block sequence.
pub struct DocumentController {
    blocks: Vec<Block>,
    policy: Box<dyn EditingPolicy>,
    store_sink: Option<StoreSink>,
    pending_events: Vec<DocumentEvent>,
    version: u64,
    focused: Option<BlockId>,
}

impl DocumentController {
    /// Create a controller holding a single empty paragraph, using the default policy.
    pub fn new() -> Self {
        Self::with_blocks(vec![Block::default()])
    }

    /// Create a controller over an initial sequence.
    ///
    /// Blocks whose id already appeared earlier in `blocks` are dropped.
    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks: dedup_ids(blocks),
            policy: Box::new(DefaultEditingPolicy),
            store_sink: None,
            pending_events: Vec::new(),
            version: 0,
            focused: None,
        }
    }

    /// Replace the editing policy.
    pub fn with_policy(mut self, policy: impl EditingPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Attach a store sink (builder form of [`set_store_sink`](Self::set_store_sink)).
    pub fn with_store_sink<F>(mut self, sink: F) -> Self
    where
        F: FnMut(StoreEvent) + Send + 'static,
    {
        self.set_store_sink(sink);
        self
    }

    /// Attach a store sink; locally originated mutations are sent to it from now on.
    pub fn set_store_sink<F>(&mut self, sink: F)
    where
        F: FnMut(StoreEvent) + Send + 'static,
    {
        self.store_sink = Some(Box::new(sink));
    }

    /// Detach the store sink. The controller keeps working purely in memory.
    pub fn clear_store_sink(&mut self) {
        self.store_sink = None;
    }

    /// The current block sequence.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Look up a block by id.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if the document holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Monotonic (wrapping) change counter, bumped once per enqueued event.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check whether anything was enqueued since `version` was observed.
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.version != version
    }

    /// The block holding focus, as last reported through
    /// [`apply_focus_change`](Self::apply_focus_change).
    pub fn focused_block(&self) -> Option<BlockId> {
        self.focused
    }

    /// Ask the policy what `event` does to the block `id`.
    ///
    /// Returns `None` for unknown ids and whenever the policy declines the event.
    pub fn command_for(&mut self, event: &EditorKeyEvent, id: BlockId) -> Option<EditorCommand> {
        let block = self.block(id)?.clone();
        // Temporarily take the policy so `self` can be lent out as the context.
        let policy = std::mem::replace(&mut self.policy, Box::new(DefaultEditingPolicy));
        let command = policy.decide(event, block, self);
        self.policy = policy;
        command
    }

    /// Record a focus change and enqueue it for observers.
    pub fn apply_focus_change(&mut self, change: FocusChange) {
        self.focused = change.target();
        self.enqueue(DocumentEvent::Focus(change));
    }

    /// Append a block at the end of the document.
    pub fn append(&mut self, block: Block) -> Option<usize> {
        let at = self.blocks.len();
        self.apply_insertion(block, at, MutationOrigin::Local)
    }

    /// Insert a block at `index` (clamped).
    pub fn insert(&mut self, block: Block, index: usize) -> Option<usize> {
        self.apply_insertion(block, index, MutationOrigin::Local)
    }

    /// Remove the block with `id`.
    pub fn remove(&mut self, id: BlockId) -> Option<(usize, Block)> {
        self.apply_removal(id, None, MutationOrigin::Local)
    }

    /// Update the live text of a block without notifying anyone.
    ///
    /// This mirrors what the text widget shows; pair it with a later
    /// [`notify_update`](Self::notify_update) (usually coalesced) to publish the change.
    /// Returns `false` for unknown ids.
    pub fn set_text(&mut self, id: BlockId, text: impl Into<String>) -> bool {
        match self.blocks.iter_mut().find(|b| b.id == id) {
            Some(block) => {
                block.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Publish the stored state of block `id` as an update.
    pub fn notify_update(&mut self, id: BlockId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let block = self.blocks[index].clone();
        self.apply_update(&block, Some(index), MutationOrigin::Local)
    }

    /// Tick or untick a checkbox block. Non-checkbox blocks are left alone.
    pub fn set_todo_checked(&mut self, id: BlockId, checked: bool) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if !matches!(self.blocks[index].kind, BlockKind::Todo { .. }) {
            return false;
        }
        let mut block = self.blocks[index].clone();
        block.kind = BlockKind::todo(checked);
        self.apply_update(&block, Some(index), MutationOrigin::Local)
    }

    /// Replace the whole sequence locally and publish it as a full snapshot.
    pub fn replace_all(&mut self, blocks: Vec<Block>) {
        self.apply_reset(blocks, MutationOrigin::Local);
    }

    /// Drain pending events in FIFO order. A second call without mutations returns nothing.
    pub fn drain_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Number of events waiting to be drained.
    pub fn pending_event_count(&self) -> usize {
        self.pending_events.len()
    }

    /// Apply an event received from the store. Nothing is sent back to the store.
    pub fn apply_external(&mut self, event: StoreEvent) {
        debug!(kind = event.kind_name(), "applying external store event");
        let origin = MutationOrigin::External;
        match event {
            StoreEvent::Inserted { block, index } => {
                self.apply_insertion(block, index, origin);
            }
            StoreEvent::Updated { block, index } => {
                self.apply_update(&block, Some(index), origin);
            }
            StoreEvent::Removed { block, index } => {
                self.apply_removal(block.id, Some(index), origin);
            }
            StoreEvent::Merged { source, target } => {
                self.apply_removal(source.id, None, origin);
                self.apply_update(&target, None, origin);
            }
            StoreEvent::Replaced { blocks } => {
                self.apply_reset(blocks, origin);
            }
        }
    }

    /// Reconcile with the store's initial snapshot.
    ///
    /// An empty snapshot means the store has nothing yet: it is seeded with the current
    /// document. Otherwise the snapshot replaces the in-memory sequence outright.
    pub fn bootstrap(&mut self, snapshot: Vec<Block>) {
        if snapshot.is_empty() {
            debug!(blocks = self.blocks.len(), "seeding empty store");
            let seed = StoreEvent::Replaced {
                blocks: self.blocks.clone(),
            };
            self.publish(seed, MutationOrigin::Local);
        } else {
            debug!(blocks = snapshot.len(), "loading store snapshot");
            self.apply_reset(snapshot, MutationOrigin::External);
        }
    }
}

impl Default for DocumentController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DocumentController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentController")
            .field("blocks", &self.blocks)
            .field("pending_events", &self.pending_events.len())
            .field("version", &self.version)
            .field("focused", &self.focused)
            .field("has_store_sink", &self.store_sink.is_some())
            .finish()
    }
}

impl DocumentController {
    fn enqueue(&mut self, event: DocumentEvent) {
        self.pending_events.push(event);
        self.version = self.version.wrapping_add(1);
    }

    fn publish(&mut self, event: StoreEvent, origin: MutationOrigin) {
        if origin != MutationOrigin::Local {
            return;
        }
        if let Some(sink) = self.store_sink.as_mut() {
            sink(event);
        }
    }

    fn apply_insertion(
        &mut self,
        block: Block,
        index: usize,
        origin: MutationOrigin,
    ) -> Option<usize> {
        if self.index_of(block.id).is_some() {
            warn!(block = %block.id, ?origin, "ignoring insert of a duplicate block id");
            return None;
        }

        let clamped = index.min(self.blocks.len());
        self.blocks.insert(clamped, block.clone());
        self.enqueue(DocumentEvent::Insert {
            block: block.clone(),
            index: clamped,
        });
        self.publish(
            StoreEvent::Inserted {
                block,
                index: clamped,
            },
            origin,
        );
        Some(clamped)
    }

    fn apply_update(
        &mut self,
        block: &Block,
        index_hint: Option<usize>,
        origin: MutationOrigin,
    ) -> bool {
        let Some(index) = find_index(&self.blocks, block.id, index_hint) else {
            debug!(block = %block.id, ?origin, "update for unknown block ignored");
            return false;
        };

        self.blocks[index].copy_content_from(block);
        let updated = self.blocks[index].clone();
        self.enqueue(DocumentEvent::Update {
            block: updated.clone(),
            index,
        });
        self.publish(
            StoreEvent::Updated {
                block: updated,
                index,
            },
            origin,
        );
        true
    }

    fn apply_removal(
        &mut self,
        id: BlockId,
        index_hint: Option<usize>,
        origin: MutationOrigin,
    ) -> Option<(usize, Block)> {
        let Some(index) = find_index(&self.blocks, id, index_hint) else {
            debug!(block = %id, ?origin, "removal of unknown block ignored");
            return None;
        };

        let removed = self.blocks.remove(index);
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.enqueue(DocumentEvent::Remove {
            block: removed.clone(),
            index,
        });
        self.publish(
            StoreEvent::Removed {
                block: removed.clone(),
                index,
            },
            origin,
        );
        Some((index, removed))
    }

    fn apply_reset(&mut self, blocks: Vec<Block>, origin: MutationOrigin) {
        self.blocks = dedup_ids(blocks);
        if self
            .focused
            .is_some_and(|id| !self.blocks.iter().any(|b| b.id == id))
        {
            self.focused = None;
        }
        self.enqueue(DocumentEvent::Reset {
            blocks: self.blocks.clone(),
        });
        self.publish(
            StoreEvent::Replaced {
                blocks: self.blocks.clone(),
            },
            origin,
        );
    }
}

impl BlockEditingContext for DocumentController {
    fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    fn previous(&self, id: BlockId) -> Option<&Block> {
        let index = self.index_of(id)?;
        index.checked_sub(1).and_then(|prev| self.blocks.get(prev))
    }

    fn next(&self, id: BlockId) -> Option<&Block> {
        let index = self.index_of(id)?;
        self.blocks.get(index + 1)
    }

    fn insert(&mut self, block: Block, index: usize) -> Option<usize> {
        self.apply_insertion(block, index, MutationOrigin::Local)
    }

    fn remove(&mut self, id: BlockId) -> Option<(usize, Block)> {
        self.apply_removal(id, None, MutationOrigin::Local)
    }

    fn update(&mut self, block: &Block, index_hint: Option<usize>) {
        self.apply_update(block, index_hint, MutationOrigin::Local);
    }

    fn notify_merge(&mut self, source: &Block, target: &Block) {
        self.publish(
            StoreEvent::Merged {
                source: source.clone(),
                target: target.clone(),
            },
            MutationOrigin::Local,
        );
    }
}

fn dedup_ids(blocks: Vec<Block>) -> Vec<Block> {
    let mut seen = std::collections::HashSet::with_capacity(blocks.len());
    blocks
        .into_iter()
        .filter(|block| {
            let fresh = seen.insert(block.id);
            if !fresh {
                warn!(block = %block.id, "dropping block with duplicate id");
            }
            fresh
        })
        .collect()
}
