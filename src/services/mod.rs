// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod dashboard;
pub mod live;
pub mod stats;
pub mod stock;
pub mod timer;
pub mod trackers;
pub mod undo;

pub use dashboard::{DashboardService, DashboardSnapshot};
pub use live::{LiveQuery, LiveQueryRegistry};
pub use stock::{NewRoutine, StockProjection, StockService};
pub use timer::{TimerCache, TimerSnapshot};
pub use trackers::{NewTracker, TrackerService};
pub use undo::UndoLog;
