// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod record;
pub mod session;
pub mod stock;
pub mod tracker;

pub use record::{Patch, Record, RecordMeta};
pub use session::{
    ActivityKind, BodyZone, PainNote, SeriesPatch, SessionPatch, TimedActivitySession,
    WorkoutSeries,
};
pub use stock::{
    ProductPatch, RoutinePatch, StockProduct, StockPurchase, StockRoutine,
};
pub use tracker::{
    RecurrenceRule, RecurringTracker, ResponsePatch, ResponseType, ResponseValue, TrackerPatch,
    TrackingResponse,
};
