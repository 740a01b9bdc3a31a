//! Notify-after-pause coalescing.
//!
//! Each keystroke reschedules its block's deadline; the block is published once the deadline
//! passes without further edits. Deadlines are tracked per block so typing in one block never
//! delays another.

use block_editor_core::BlockId;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Per-block restartable deadlines.
#[derive(Debug, Clone)]
pub struct Coalescer {
    delay: Duration,
    pending: HashMap<BlockId, (Instant, u64)>,
    sequence: u64,
}

impl Coalescer {
    /// Create a coalescer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
            sequence: 0,
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)start the deadline for `id`, counting from `now`.
    pub fn schedule(&mut self, id: BlockId, now: Instant) {
        self.sequence = self.sequence.wrapping_add(1);
        self.pending.insert(id, (now + self.delay, self.sequence));
    }

    /// Forget `id`. Returns `true` if it was pending.
    pub fn take(&mut self, id: BlockId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Whether `id` has an unpublished edit.
    pub fn is_pending(&self, id: BlockId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Number of pending blocks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|(deadline, _)| *deadline).min()
    }

    /// Remove and return every block whose deadline is at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: Instant) -> Vec<BlockId> {
        let mut due: Vec<_> = self
            .pending
            .iter()
            .filter(|(_, (deadline, _))| *deadline <= now)
            .map(|(id, key)| (*key, *id))
            .collect();
        due.sort_by_key(|(key, _)| *key);
        for (_, id) in &due {
            self.pending.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Remove and return every pending block, earliest deadline first.
    pub fn drain_all(&mut self) -> Vec<BlockId> {
        let mut all: Vec<_> = self.pending.drain().map(|(id, key)| (key, id)).collect();
        all.sort_by_key(|(key, _)| *key);
        all.into_iter().map(|(_, id)| id).collect()
    }
}
