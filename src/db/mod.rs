// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (local in-memory store).
//!
//! Entities are never hard-deleted: every row carries soft-delete
//! metadata and default reads filter deleted rows. Mutations publish a
//! table-change notification on the [`ChangeBus`], which feeds the
//! live-query layer.

pub mod memory;

pub use memory::{LocalStore, Repository};

use std::sync::Arc;

use dashmap::DashSet;
use tokio::sync::broadcast;

/// Collection names as constants.
pub mod collections {
    pub const SESSIONS: &str = "sessions";
    pub const WORKOUT_SERIES: &str = "workout_series";
    pub const PAIN_NOTES: &str = "pain_notes";
    pub const TRACKERS: &str = "recurring_trackers";
    pub const TRACKING_RESPONSES: &str = "tracking_responses";
    pub const STOCK_PRODUCTS: &str = "stock_products";
    pub const STOCK_ROUTINES: &str = "stock_routines";
    pub const STOCK_PURCHASES: &str = "stock_purchases";
}

/// Notification that a table was mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableChange {
    pub table: &'static str,
}

/// Process-wide write-notification bus.
///
/// Repositories publish after every successful mutation; live queries
/// subscribe and re-run when a change overlaps their read set.
#[derive(Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<TableChange>,
}

impl ChangeBus {
    pub fn new() -> Self {
        // Capacity only matters for bursty writers with slow
        // subscribers; a lagged subscriber re-runs conservatively.
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    pub fn publish(&self, table: &'static str) {
        // No subscribers is fine.
        let _ = self.tx.send(TableChange { table });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TableChange> {
        self.tx.subscribe()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

tokio::task_local! {
    /// Read set of the live query currently executing on this task.
    static READ_SCOPE: Arc<DashSet<&'static str>>;
}

/// Record that the current task read `table`, if a live query is
/// tracking reads on this task. A no-op everywhere else.
pub(crate) fn note_read(table: &'static str) {
    let _ = READ_SCOPE.try_with(|scope| {
        scope.insert(table);
    });
}

/// Run `fut` with reads recorded into `scope`.
pub(crate) async fn with_read_scope<F>(scope: Arc<DashSet<&'static str>>, fut: F) -> F::Output
where
    F: std::future::Future,
{
    READ_SCOPE.scope(scope, fut).await
}
