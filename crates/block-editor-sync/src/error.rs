use thiserror::Error;

#[derive(Debug, Error)]
/// Errors reported by a [`crate::BlockStore`].
pub enum StoreError {
    #[error("store unavailable: {0}")]
    /// The store could not be reached.
    Unavailable(String),

    #[error("store rejected {kind} event: {reason}")]
    /// The store refused an event.
    Rejected {
        /// Kind of the refused event (`inserted`, `updated`, ...).
        kind: &'static str,
        /// Reason given by the store.
        reason: String,
    },

    #[error("I/O error: {0}")]
    /// Transport I/O failed.
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
/// Errors produced by the synchronization layer.
pub enum SyncError {
    #[error("document session is closed")]
    /// The session task has stopped; no more requests are accepted.
    SessionClosed,

    #[error("document session task failed: {0}")]
    /// The session task panicked or was aborted.
    SessionFailed(String),

    #[error(transparent)]
    /// A store operation failed.
    Store(#[from] StoreError),

    #[error("invalid sync options: {0}")]
    /// Options could not be parsed.
    Options(#[from] serde_json::Error),
}
