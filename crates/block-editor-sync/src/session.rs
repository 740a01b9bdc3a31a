//! Single-writer document sessions.
//!
//! # Overview
//!
//! A [`DocumentSession`] moves a [`DocumentController`] onto its own task and becomes its only
//! writer. Everything that mutates the document reaches that task through one channel:
//!
//! - requests from [`SessionHandle`]s (key events, text edits, focus changes, ...),
//! - events from the store's update stream,
//! - coalescing deadlines for typed text.
//!
//! The task multiplexes these with a biased `select!` whose first branch is the shutdown
//! signal, so once shutdown is requested no further mutation is applied.
//!
//! Locally originated store events leave the controller through its store sink and are applied
//! by a separate forwarder task, one at a time and in order. Apply failures are logged and
//! otherwise ignored.
//!
//! # Example
//!
//! ```rust
//! use block_editor_core::{Block, DocumentController};
//! use block_editor_sync::{DocumentSession, MemoryStore, SyncOptions};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), block_editor_sync::SyncError> {
//! let store = Arc::new(MemoryStore::with_blocks(vec![Block::paragraph("stored")]));
//! let session = DocumentSession::spawn(
//!     DocumentController::new(),
//!     store.clone(),
//!     SyncOptions::default(),
//! );
//!
//! let blocks = session.snapshot().await?;
//! assert_eq!(blocks[0].text, "stored");
//!
//! session.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use crate::coalesce::Coalescer;
use crate::error::SyncError;
use crate::options::SyncOptions;
use crate::store::BlockStore;
use block_editor_core::{
    Block, BlockId, DocumentController, DocumentEvent, EditorCommand, EditorKeyEvent,
    FocusChange, StoreEvent,
};
use futures::StreamExt;
use futures::stream::BoxStream;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{Instrument, debug, info, info_span, warn};

type Reply<T> = oneshot::Sender<T>;

enum Request {
    CommandFor {
        event: EditorKeyEvent,
        id: BlockId,
        reply: Reply<Option<EditorCommand>>,
    },
    EditText {
        id: BlockId,
        text: String,
        reply: Reply<bool>,
    },
    Flush {
        id: Option<BlockId>,
        reply: Reply<usize>,
    },
    FocusChange {
        change: FocusChange,
        reply: Reply<()>,
    },
    Insert {
        block: Block,
        index: Option<usize>,
        reply: Reply<Option<usize>>,
    },
    Remove {
        id: BlockId,
        reply: Reply<Option<Block>>,
    },
    SetTodoChecked {
        id: BlockId,
        checked: bool,
        reply: Reply<bool>,
    },
    ReplaceAll {
        blocks: Vec<Block>,
        reply: Reply<()>,
    },
    DrainEvents {
        reply: Reply<Vec<DocumentEvent>>,
    },
    Snapshot {
        reply: Reply<Vec<Block>>,
    },
}

/// Spawns document sessions.
pub struct DocumentSession;

impl DocumentSession {
    /// Move `controller` onto a new task synchronized with `store`.
    ///
    /// The task first loads the store snapshot and bootstraps the controller from it, then
    /// starts serving requests. Requests sent in the meantime queue up.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(
        controller: DocumentController,
        store: Arc<dyn BlockStore>,
        options: SyncOptions,
    ) -> SessionHandle {
        let (request_tx, request_rx) = mpsc::channel(options.request_buffer());
        let (version_tx, version_rx) = watch::channel(controller.version());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let actor = SessionActor {
            controller,
            store,
            coalescer: Coalescer::new(options.coalesce_delay()),
            requests: request_rx,
            shutdown: shutdown_rx,
            version: version_tx,
        };
        let task = tokio::spawn(actor.run().instrument(info_span!("document_session")));

        SessionHandle {
            requests: request_tx,
            version: version_rx,
            shutdown: Arc::new(shutdown_tx),
            task: Arc::new(Mutex::new(Some(task))),
        }
    }
}

/// Cloneable handle to a running session.
///
/// Every method fails with [`SyncError::SessionClosed`] once the session has stopped.
#[derive(Clone)]
pub struct SessionHandle {
    requests: mpsc::Sender<Request>,
    version: watch::Receiver<u64>,
    shutdown: Arc<watch::Sender<bool>>,
    task: Arc<Mutex<Option<JoinHandle<DocumentController>>>>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("version", &*self.version.borrow())
            .field("closed", &self.requests.is_closed())
            .finish()
    }
}

impl SessionHandle {
    async fn call<T>(&self, build: impl FnOnce(Reply<T>) -> Request) -> Result<T, SyncError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(build(reply))
            .await
            .map_err(|_| SyncError::SessionClosed)?;
        response.await.map_err(|_| SyncError::SessionClosed)
    }

    /// Ask the editing policy what `event` does to block `id`.
    ///
    /// Any coalesced text edit for `id` is published first so the store sees the typed text
    /// before the structural change.
    pub async fn command_for(
        &self,
        event: EditorKeyEvent,
        id: BlockId,
    ) -> Result<Option<EditorCommand>, SyncError> {
        self.call(|reply| Request::CommandFor { event, id, reply })
            .await
    }

    /// Mirror the widget's text for block `id` and schedule a coalesced store update.
    ///
    /// Returns `false` for unknown blocks.
    pub async fn edit_text(&self, id: BlockId, text: impl Into<String>) -> Result<bool, SyncError> {
        let text = text.into();
        self.call(|reply| Request::EditText { id, text, reply }).await
    }

    /// Publish the pending text edit of `id` now. Returns the number of blocks published.
    pub async fn flush(&self, id: BlockId) -> Result<usize, SyncError> {
        self.call(|reply| Request::Flush { id: Some(id), reply })
            .await
    }

    /// Publish every pending text edit now.
    pub async fn flush_all(&self) -> Result<usize, SyncError> {
        self.call(|reply| Request::Flush { id: None, reply }).await
    }

    /// Move focus, publishing the pending edit of the block losing focus first.
    pub async fn apply_focus_change(&self, change: FocusChange) -> Result<(), SyncError> {
        self.call(|reply| Request::FocusChange { change, reply })
            .await
    }

    /// Insert `block` at `index` (clamped).
    pub async fn insert(&self, block: Block, index: usize) -> Result<Option<usize>, SyncError> {
        self.call(|reply| Request::Insert {
            block,
            index: Some(index),
            reply,
        })
        .await
    }

    /// Append `block` at the end.
    pub async fn append(&self, block: Block) -> Result<Option<usize>, SyncError> {
        self.call(|reply| Request::Insert {
            block,
            index: None,
            reply,
        })
        .await
    }

    /// Remove block `id`.
    pub async fn remove(&self, id: BlockId) -> Result<Option<Block>, SyncError> {
        self.call(|reply| Request::Remove { id, reply }).await
    }

    /// Tick or untick a checkbox block.
    pub async fn set_todo_checked(&self, id: BlockId, checked: bool) -> Result<bool, SyncError> {
        self.call(|reply| Request::SetTodoChecked { id, checked, reply })
            .await
    }

    /// Replace the whole document and publish it as a snapshot.
    pub async fn replace_all(&self, blocks: Vec<Block>) -> Result<(), SyncError> {
        self.call(|reply| Request::ReplaceAll { blocks, reply })
            .await
    }

    /// Drain pending document events.
    pub async fn drain_events(&self) -> Result<Vec<DocumentEvent>, SyncError> {
        self.call(|reply| Request::DrainEvents { reply }).await
    }

    /// Current block sequence.
    pub async fn snapshot(&self) -> Result<Vec<Block>, SyncError> {
        self.call(|reply| Request::Snapshot { reply }).await
    }

    /// Last published document version.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Watch the document version; it changes whenever new events are queued.
    pub fn subscribe_version(&self) -> watch::Receiver<u64> {
        self.version.clone()
    }

    /// Stop the session and return its controller.
    ///
    /// Pending text edits are published and every queued store write is applied before this
    /// returns. Only the first call gets the controller; later calls fail with
    /// [`SyncError::SessionClosed`].
    pub async fn shutdown(&self) -> Result<DocumentController, SyncError> {
        self.shutdown.send_replace(true);
        let task = self.task.lock().take().ok_or(SyncError::SessionClosed)?;
        task.await
            .map_err(|err| SyncError::SessionFailed(err.to_string()))
    }
}

struct SessionActor {
    controller: DocumentController,
    store: Arc<dyn BlockStore>,
    coalescer: Coalescer,
    requests: mpsc::Receiver<Request>,
    shutdown: watch::Receiver<bool>,
    version: watch::Sender<u64>,
}

impl SessionActor {
    async fn run(mut self) -> DocumentController {
        let (store_tx, store_rx) = mpsc::unbounded_channel();
        let forwarder = tokio::spawn(
            forward_store_events(self.store.clone(), store_rx)
                .instrument(info_span!("store_writer")),
        );
        self.controller.set_store_sink(move |event| {
            // The receiver only goes away after the sink is cleared below.
            let _ = store_tx.send(event);
        });

        if let Some(updates) = self.bootstrap().await {
            info!(blocks = self.controller.len(), "document session started");
            self.serve(updates).await;
        }

        let flushed = self.flush_all();
        self.publish_version();
        self.controller.clear_store_sink();
        if let Err(err) = forwarder.await {
            warn!(error = %err, "store writer task failed");
        }
        info!(flushed, "document session stopped");
        self.controller
    }

    /// Load the store snapshot, or `None` if shutdown was requested first.
    async fn bootstrap(&mut self) -> Option<BoxStream<'static, StoreEvent>> {
        let loaded = tokio::select! {
            biased;

            _ = self.shutdown.changed() => {
                debug!("shutdown requested before the store snapshot loaded");
                return None;
            }
            loaded = self.store.load() => loaded,
        };
        match loaded {
            Ok(snapshot) => self.controller.bootstrap(snapshot),
            Err(err) => warn!(error = %err, "store load failed; continuing in memory"),
        }
        self.publish_version();
        Some(self.store.updates())
    }

    async fn serve(&mut self, mut updates: BoxStream<'static, StoreEvent>) {
        let mut updates_open = true;
        loop {
            let deadline = self.coalescer.next_deadline();
            tokio::select! {
                biased;

                _ = self.shutdown.changed() => {
                    debug!("shutdown requested");
                    break;
                }
                request = self.requests.recv() => match request {
                    Some(request) => self.handle(request),
                    None => {
                        debug!("all session handles dropped");
                        break;
                    }
                },
                event = updates.next(), if updates_open => match event {
                    Some(event) => self.apply_store_update(event),
                    None => {
                        debug!("store update stream ended");
                        updates_open = false;
                    }
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    for id in self.coalescer.pop_due(Instant::now()) {
                        self.publish_text(id);
                    }
                }
            }
            self.publish_version();
        }
    }

    /// Apply a store update, publishing pending local edits of the blocks it touches first.
    ///
    /// A coalesced edit left pending would later re-serialize the store's own content as a
    /// local update.
    fn apply_store_update(&mut self, event: StoreEvent) {
        match &event {
            StoreEvent::Updated { block, .. } | StoreEvent::Removed { block, .. } => {
                self.flush_one(block.id);
            }
            StoreEvent::Merged { source, target } => {
                self.flush_one(source.id);
                self.flush_one(target.id);
            }
            StoreEvent::Replaced { .. } => {
                self.flush_all();
            }
            StoreEvent::Inserted { .. } => {}
        }
        self.controller.apply_external(event);
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::CommandFor { event, id, reply } => {
                self.flush_one(id);
                respond(reply, self.controller.command_for(&event, id));
            }
            Request::EditText { id, text, reply } => {
                let known = self.controller.set_text(id, text);
                if known {
                    self.coalescer.schedule(id, Instant::now());
                }
                respond(reply, known);
            }
            Request::Flush { id, reply } => {
                let flushed = match id {
                    Some(id) => usize::from(self.flush_one(id)),
                    None => self.flush_all(),
                };
                respond(reply, flushed);
            }
            Request::FocusChange { change, reply } => {
                if let Some(focused) = self.controller.focused_block() {
                    self.flush_one(focused);
                }
                self.controller.apply_focus_change(change);
                respond(reply, ());
            }
            Request::Insert {
                block,
                index,
                reply,
            } => {
                let result = match index {
                    Some(index) => self.controller.insert(block, index),
                    None => self.controller.append(block),
                };
                respond(reply, result);
            }
            Request::Remove { id, reply } => {
                self.coalescer.take(id);
                let removed = self.controller.remove(id).map(|(_, block)| block);
                respond(reply, removed);
            }
            Request::SetTodoChecked { id, checked, reply } => {
                self.flush_one(id);
                respond(reply, self.controller.set_todo_checked(id, checked));
            }
            Request::ReplaceAll { blocks, reply } => {
                self.coalescer.drain_all();
                self.controller.replace_all(blocks);
                respond(reply, ());
            }
            Request::DrainEvents { reply } => {
                respond(reply, self.controller.drain_events());
            }
            Request::Snapshot { reply } => {
                respond(reply, self.controller.blocks().to_vec());
            }
        }
    }

    fn flush_one(&mut self, id: BlockId) -> bool {
        self.coalescer.take(id) && self.publish_text(id)
    }

    fn flush_all(&mut self) -> usize {
        self.coalescer
            .drain_all()
            .into_iter()
            .filter(|id| self.publish_text(*id))
            .count()
    }

    fn publish_text(&mut self, id: BlockId) -> bool {
        let published = self.controller.notify_update(id);
        if !published {
            debug!(block = %id, "coalesced edit for a block that no longer exists");
        }
        published
    }

    fn publish_version(&self) {
        let current = self.controller.version();
        self.version.send_if_modified(|version| {
            if *version == current {
                false
            } else {
                *version = current;
                true
            }
        });
    }
}

fn respond<T>(reply: Reply<T>, value: T) {
    if reply.send(value).is_err() {
        debug!("requester went away before the reply");
    }
}

async fn forward_store_events(
    store: Arc<dyn BlockStore>,
    mut events: mpsc::UnboundedReceiver<StoreEvent>,
) {
    while let Some(event) = events.recv().await {
        let kind = event.kind_name();
        match store.apply(event).await {
            Ok(()) => debug!(kind, "store event applied"),
            Err(err) => warn!(kind, error = %err, "store rejected event"),
        }
    }
}
