//! Session configuration.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default pause after the last keystroke before a block's text is pushed to the store.
pub const DEFAULT_COALESCE_DELAY_MS: u64 = 1500;

/// Default capacity of the session's request queue.
pub const DEFAULT_REQUEST_BUFFER: usize = 64;

/// Tunables for a [`crate::DocumentSession`].
///
/// Every field has a default, so a partial JSON object is enough:
///
/// ```rust
/// use block_editor_sync::SyncOptions;
///
/// let options = SyncOptions::from_json(r#"{ "coalesce_delay_ms": 250 }"#).unwrap();
/// assert_eq!(options.coalesce_delay_ms, 250);
/// assert_eq!(options.request_buffer, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    /// Quiet period (milliseconds) before a text edit is published.
    pub coalesce_delay_ms: u64,
    /// Capacity of the bounded request channel.
    pub request_buffer: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            coalesce_delay_ms: DEFAULT_COALESCE_DELAY_MS,
            request_buffer: DEFAULT_REQUEST_BUFFER,
        }
    }
}

impl SyncOptions {
    /// Parse options from JSON.
    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the coalescing delay.
    pub fn with_coalesce_delay(mut self, delay: Duration) -> Self {
        self.coalesce_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Coalescing delay as a [`Duration`].
    pub fn coalesce_delay(&self) -> Duration {
        Duration::from_millis(self.coalesce_delay_ms)
    }

    /// Request buffer size, never zero (a zero-capacity channel cannot be created).
    pub fn request_buffer(&self) -> usize {
        self.request_buffer.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SyncOptions::default();
        assert_eq!(options.coalesce_delay(), Duration::from_millis(1500));
        assert_eq!(options.request_buffer(), 64);
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        assert!(matches!(
            SyncOptions::from_json(r#"{ "coalesce_delay_ms": "soon" }"#),
            Err(SyncError::Options(_))
        ));
    }

    #[test]
    fn test_zero_buffer_is_bumped() {
        let options = SyncOptions::from_json(r#"{ "request_buffer": 0 }"#).unwrap();
        assert_eq!(options.request_buffer(), 1);
    }
}
