//! Cooperative layout cancellation.
//!
//! A layout pass can take a while (it may fetch images synchronously), so
//! the embedder holds a [`CancelToken`] and trips it when a newer layout
//! supersedes the running one. The engine checks the token at every node
//! and unwinds; a cancelled layout produces no output, which is an
//! expected outcome rather than an error.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared one-shot cancellation flag.
///
/// Clones observe the same flag. Once cancelled, a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the flag. All clones observe the cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether the flag has been tripped.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
