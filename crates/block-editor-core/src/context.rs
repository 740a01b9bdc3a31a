//! The capability surface an editing policy may use.
//!
//! [`BlockEditingContext`] is intentionally small: neighbour queries plus the four mutations a
//! keystroke can cause. The [`crate::DocumentController`] implements it; tests and alternate
//! front ends may provide their own.

use crate::block::{Block, BlockId};

/// Query and mutation operations available to an [`crate::EditingPolicy`].
///
/// Every operation is total: an unknown id is simply a no-op or `None`.
pub trait BlockEditingContext {
    /// Current index of the block with `id`.
    fn index_of(&self, id: BlockId) -> Option<usize>;

    /// The block right before `id`.
    fn previous(&self, id: BlockId) -> Option<&Block>;

    /// The block right after `id`.
    fn next(&self, id: BlockId) -> Option<&Block>;

    /// Insert `block` at `index`, clamped into `[0, len]`.
    ///
    /// Returns the final index, or `None` if a block with the same id already exists.
    fn insert(&mut self, block: Block, index: usize) -> Option<usize>;

    /// Remove the block with `id`, returning it with its former index.
    fn remove(&mut self, id: BlockId) -> Option<(usize, Block)>;

    /// Copy `block`'s content into the stored block with the same id.
    ///
    /// `index_hint` skips the lookup when the caller already knows the index; a stale hint
    /// falls back to an id lookup.
    fn update(&mut self, block: &Block, index_hint: Option<usize>);

    /// Report that `source` was merged into `target`.
    fn notify_merge(&mut self, source: &Block, target: &Block);
}
