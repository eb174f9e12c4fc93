//! Supersede-on-restart cancellation for interactive planning.
//!
//! A user may re-trigger planning before the previous solve finishes. Each
//! new solve takes a fresh token from [`SolveSupervisor::begin`], which
//! cancels the token of the solve it replaces.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Hands out one live cancellation token at a time.
///
/// Cheap to clone; clones share the same current token.
#[derive(Clone, Default)]
pub struct SolveSupervisor {
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl SolveSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new solve, cancelling the one in flight (if any).
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.current.lock().replace(token.clone()) {
            if !previous.is_cancelled() {
                debug!("superseding in-flight solve");
            }
            previous.cancel();
        }
        token
    }

    /// Cancels the current solve without starting another.
    pub fn cancel(&self) {
        if let Some(token) = self.current.lock().take() {
            token.cancel();
        }
    }

    /// Returns `true` while a solve started by [`begin`](Self::begin) is live.
    pub fn is_active(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|t| !t.is_cancelled())
    }
}
