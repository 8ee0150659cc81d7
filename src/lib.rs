// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Lifetrack core: the offline-first data and aggregation layer behind
//! a personal life-tracking app (work sessions, workouts, recurring
//! check-ins, stock).
//!
//! The crate provides soft-deletable repositories over a local
//! reactive store, a compensating-action undo log, pure aggregation
//! functions with timezone-correct local-date bucketing, and a
//! live-query layer that recomputes results when underlying tables
//! change. UI, remote sync and auth are external collaborators.

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use config::Config;
use db::LocalStore;
use services::{
    DashboardService, LiveQueryRegistry, StockService, TimerCache, TrackerService, UndoLog,
};

/// Initialize structured JSON logging for embedders that want the
/// core's default setup. Filter via `RUST_LOG`.
pub fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(format)
        .init();
}

/// Shared application state: the store, services and session-scoped
/// undo log, wired to one clock and id source.
pub struct AppState {
    pub config: Config,
    pub store: LocalStore,
    pub undo: Arc<UndoLog>,
    pub live: LiveQueryRegistry,
    pub timers: TimerCache,
    pub trackers: TrackerService,
    pub stock: StockService,
    pub dashboard: DashboardService,
}

impl AppState {
    /// Production wiring: system clock, UUID ids.
    pub fn new(config: Config) -> Self {
        Self::with_collaborators(config, Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    /// Explicit collaborators, for tests and embedders that inject
    /// their own clock or identity source.
    pub fn with_collaborators(
        config: Config,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let store = LocalStore::new(Arc::clone(&clock), ids);
        let undo = Arc::new(UndoLog::new(
            config.undo_capacity,
            chrono::Duration::seconds(config.undo_expiry_secs as i64),
            Arc::clone(&clock),
        ));
        let live = LiveQueryRegistry::new(store.bus.clone());
        let trackers = TrackerService::new(store.trackers.clone(), store.responses.clone());
        let stock = StockService::new(
            store.products.clone(),
            store.routines.clone(),
            store.purchases.clone(),
            trackers.clone(),
            Arc::clone(&undo),
        );
        let dashboard = DashboardService::new(
            store.sessions.clone(),
            store.trackers.clone(),
            store.responses.clone(),
            config.local_offset(),
        );

        Self {
            config,
            store,
            undo,
            live,
            timers: TimerCache::new(),
            trackers,
            stock,
            dashboard,
        }
    }
}
