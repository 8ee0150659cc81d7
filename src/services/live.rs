// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Live-query layer: re-runs a query and pushes the new result to
//! subscribers whenever a table the query read gets mutated.
//!
//! Dependency tracking is explicit: each query records the tables its
//! last execution touched (repository reads note themselves into a
//! per-task read scope), and the store's change bus notifies on every
//! write. A burst of writes within one tick coalesces into a single
//! re-run, and a superseded run's late result is discarded by
//! generation check rather than completion order.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashSet;
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;

use crate::db::{with_read_scope, ChangeBus};
use crate::error::Result;

/// Registry spawning live queries against one change bus.
#[derive(Clone)]
pub struct LiveQueryRegistry {
    bus: ChangeBus,
}

struct Shared<T> {
    tx: watch::Sender<Option<T>>,
    generation: AtomicU64,
    key: std::sync::Mutex<Vec<String>>,
    rerun: Notify,
}

/// Handle to a running live query.
///
/// `None` means loading: either the first run has not resolved yet, or
/// the dependency key changed and the query restarted. Dropping the
/// handle stops the worker and unsubscribes from change notifications.
pub struct LiveQuery<T> {
    shared: Arc<Shared<T>>,
    rx: watch::Receiver<Option<T>>,
    worker: JoinHandle<()>,
}

impl LiveQueryRegistry {
    pub fn new(bus: ChangeBus) -> Self {
        Self { bus }
    }

    /// Start observing `query`.
    ///
    /// The query runs once immediately, then again whenever a write
    /// overlaps the tables its last run read. `key` identifies the
    /// parameterization; see [`LiveQuery::set_key`].
    pub fn observe<T, F, Fut>(&self, key: Vec<String>, query: F) -> LiveQuery<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let shared = Arc::new(Shared {
            tx,
            generation: AtomicU64::new(0),
            key: std::sync::Mutex::new(key),
            rerun: Notify::new(),
        });

        let worker = tokio::spawn(run_worker(
            Arc::clone(&shared),
            self.bus.subscribe(),
            query,
        ));

        LiveQuery { shared, rx, worker }
    }
}

async fn run_worker<T, F, Fut>(
    shared: Arc<Shared<T>>,
    mut changes: broadcast::Receiver<crate::db::TableChange>,
    query: F,
) where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let read_set: Arc<DashSet<&'static str>> = Arc::new(DashSet::new());

    loop {
        let generation = shared.generation.load(Ordering::Acquire);
        read_set.clear();

        let result = with_read_scope(Arc::clone(&read_set), query()).await;

        // Stale-run guard: if the key changed while this run was in
        // flight, its result no longer describes the current
        // parameterization. Discard and re-run immediately.
        if shared.generation.load(Ordering::Acquire) != generation {
            continue;
        }

        match result {
            Ok(value) => {
                let _ = shared.tx.send_replace(Some(value));
            }
            Err(err) => {
                tracing::warn!(error = %err, "Live query failed; keeping previous value");
            }
        }

        // Wait for a relevant table change or an explicit rerun.
        loop {
            tokio::select! {
                _ = shared.rerun.notified() => break,
                change = changes.recv() => match change {
                    Ok(change) if read_set.contains(change.table) => {
                        // Coalesce a burst of writes into one re-run:
                        // everything already queued is covered by the
                        // run we are about to do.
                        while changes.try_recv().is_ok() {}
                        break;
                    }
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(_)) => break,
                    Err(broadcast::error::RecvError::Closed) => return,
                },
            }
        }
    }
}

impl<T: Clone> LiveQuery<T> {
    /// Current value; `None` while loading.
    pub fn current(&self) -> Option<T> {
        self.rx.borrow().clone()
    }

    /// Wait until the value changes, then return it.
    pub async fn changed(&mut self) -> Option<T> {
        if self.rx.changed().await.is_err() {
            return None;
        }
        self.rx.borrow().clone()
    }

    /// An independent receiver for the query's value stream.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.rx.clone()
    }

    /// Re-parameterize the query.
    ///
    /// A changed key (shallow comparison) resets the value to loading
    /// and forces a fresh run; any in-flight run is discarded when it
    /// resolves late. An identical key is a no-op.
    pub fn set_key(&self, key: Vec<String>) {
        let mut current = self.shared.key.lock().expect("key lock poisoned");
        if *current == key {
            return;
        }
        *current = key;
        drop(current);

        self.shared.generation.fetch_add(1, Ordering::Release);
        let _ = self.shared.tx.send_replace(None);
        self.shared.rerun.notify_one();
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        // Stops the worker, which drops its broadcast receiver; a
        // leaked table-change subscription is a defect.
        self.worker.abort();
    }
}
