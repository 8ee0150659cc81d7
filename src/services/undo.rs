// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Undo/compensation log for destructive operations.
//!
//! Each mutating operation that wants an undo affordance registers a
//! human-readable description and a compensating action. The log is
//! bounded, most-recent-first, session-scoped (cleared on reset, not
//! persisted), and entries expire after a time window.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures_util::future::BoxFuture;
use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::error::Result;

/// A deferred compensating action.
pub type Compensation = Box<dyn FnOnce() -> BoxFuture<'static, Result<()>> + Send>;

struct UndoEntry {
    description: String,
    compensate: Compensation,
    logged_at: DateTime<Utc>,
}

/// Bounded most-recent-first log of compensating actions.
pub struct UndoLog {
    entries: Mutex<VecDeque<UndoEntry>>,
    capacity: usize,
    expiry: Duration,
    clock: Arc<dyn Clock>,
}

impl UndoLog {
    pub fn new(capacity: usize, expiry: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity,
            expiry,
            clock,
        }
    }

    /// Run `action`, and on success register `compensate` as its undo.
    ///
    /// `action` may be a no-op when the side effect was already applied
    /// by the caller. If `action` fails, nothing is logged and the
    /// error propagates: a compensation is never registered for an
    /// action that did not complete.
    pub async fn with_undo<A, C>(&self, description: &str, action: A, compensate: C) -> Result<()>
    where
        A: Future<Output = Result<()>>,
        C: FnOnce() -> BoxFuture<'static, Result<()>> + Send + 'static,
    {
        action.await?;

        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        prune(&mut entries, now, self.expiry);
        entries.push_front(UndoEntry {
            description: description.to_string(),
            compensate: Box::new(compensate),
            logged_at: now,
        });
        while entries.len() > self.capacity {
            entries.pop_back();
        }
        tracing::debug!(description, depth = entries.len(), "Undo entry logged");
        Ok(())
    }

    /// Execute and drop the most recent compensation.
    ///
    /// Returns the undone entry's description, or `None` when the log
    /// is empty. Compensation is not itself undoable (no redo stack).
    pub async fn undo_last(&self) -> Result<Option<String>> {
        let entry = {
            let mut entries = self.entries.lock().await;
            prune(&mut entries, self.clock.now(), self.expiry);
            entries.pop_front()
        };

        let Some(entry) = entry else {
            return Ok(None);
        };

        tracing::info!(description = %entry.description, "Undoing");
        (entry.compensate)().await?;
        Ok(Some(entry.description))
    }

    /// Descriptions of pending entries, most recent first.
    pub async fn descriptions(&self) -> Vec<String> {
        let mut entries = self.entries.lock().await;
        prune(&mut entries, self.clock.now(), self.expiry);
        entries.iter().map(|e| e.description.clone()).collect()
    }

    /// Drop every entry without running compensations (logout/reset).
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

/// Drop expired entries without executing their compensations.
fn prune(entries: &mut VecDeque<UndoEntry>, now: DateTime<Utc>, expiry: Duration) {
    entries.retain(|e| now - e.logged_at <= expiry);
}
