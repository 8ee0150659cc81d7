// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory table store with typed soft-delete repositories.
//!
//! Each repository owns exactly one entity type's persistence.
//! Cross-entity consistency (e.g. reverting a stock adjustment when a
//! purchase is undone) is orchestrated by services, never by reaching
//! into another repository's storage.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::clock::{Clock, IdGenerator};
use crate::db::{note_read, ChangeBus};
use crate::error::{AppError, Result};
use crate::models::record::{Patch, Record, RecordMeta};
use crate::models::{
    PainNote, RecurringTracker, StockProduct, StockPurchase, StockRoutine, TimedActivitySession,
    TrackingResponse, WorkoutSeries,
};

/// Typed repository over one table.
///
/// All writes go through here so timestamp/flag bookkeeping is never
/// bypassed; every successful mutation publishes on the change bus.
pub struct Repository<T: Record> {
    rows: Arc<RwLock<BTreeMap<String, T>>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    bus: ChangeBus,
}

impl<T: Record> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            clock: Arc::clone(&self.clock),
            ids: Arc::clone(&self.ids),
            bus: self.bus.clone(),
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>, bus: ChangeBus) -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            clock,
            ids,
            bus,
        }
    }

    // ─── Writes ──────────────────────────────────────────────────

    /// Create a row: assigns id and timestamps, persists, returns the
    /// stored entity. The builder receives the fresh metadata and may
    /// reject invalid field values.
    pub async fn create<F>(&self, user_id: &str, build: F) -> Result<T>
    where
        F: FnOnce(RecordMeta) -> Result<T>,
    {
        let meta = RecordMeta::new(
            self.ids.next_id(),
            user_id.to_string(),
            self.clock.now(),
        );
        let row = build(meta)?;
        let id = row.meta().id.clone();

        let mut rows = self.rows.write().await;
        rows.insert(id, row.clone());
        drop(rows);

        self.bus.publish(T::TABLE);
        Ok(row)
    }

    /// Merge a validated patch into a row and bump `updated_at`.
    /// Fails with `NotFound` when the id is absent.
    pub async fn update<P: Patch<T>>(&self, id: &str, patch: P) -> Result<T> {
        let mut rows = self.rows.write().await;
        let row = rows
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", T::TABLE, id)))?;

        patch.validate(row)?;
        patch.apply(row);
        row.meta_mut().updated_at = self.clock.now();
        let updated = row.clone();
        drop(rows);

        self.bus.publish(T::TABLE);
        Ok(updated)
    }

    /// Soft-delete a row. Idempotent: deleting an already-deleted or
    /// missing row is a no-op, not an error.
    pub async fn soft_delete(&self, id: &str) -> Result<()> {
        let mut rows = self.rows.write().await;
        let changed = match rows.get_mut(id) {
            Some(row) if !row.meta().is_deleted => {
                let now = self.clock.now();
                let meta = row.meta_mut();
                meta.is_deleted = true;
                meta.deleted_at = Some(now);
                meta.updated_at = now;
                true
            }
            _ => false,
        };
        drop(rows);

        if changed {
            self.bus.publish(T::TABLE);
        }
        Ok(())
    }

    /// Restore a soft-deleted row. A missing row is a tolerated no-op:
    /// undo compensations must not fail because a cascade already
    /// cleaned up independently.
    pub async fn restore(&self, id: &str) -> Result<()> {
        let mut rows = self.rows.write().await;
        let changed = match rows.get_mut(id) {
            Some(row) if row.meta().is_deleted => {
                let now = self.clock.now();
                let meta = row.meta_mut();
                meta.is_deleted = false;
                meta.deleted_at = None;
                meta.updated_at = now;
                true
            }
            _ => false,
        };
        drop(rows);

        if changed {
            self.bus.publish(T::TABLE);
        }
        Ok(())
    }

    // ─── Reads (default-excluding soft-deleted rows) ─────────────

    /// Get a row by id, excluding soft-deleted rows.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<T>> {
        note_read(T::TABLE);
        let rows = self.rows.read().await;
        Ok(rows.get(id).filter(|row| !row.meta().is_deleted).cloned())
    }

    /// Get a row by id including soft-deleted rows (history/restore
    /// flows only).
    pub async fn get_by_id_any(&self, id: &str) -> Result<Option<T>> {
        note_read(T::TABLE);
        let rows = self.rows.read().await;
        Ok(rows.get(id).cloned())
    }

    /// All live rows, most recent first by sort instant.
    pub async fn get_all_by_date_desc(&self) -> Result<Vec<T>> {
        note_read(T::TABLE);
        let rows = self.rows.read().await;
        let mut out: Vec<T> = rows
            .values()
            .filter(|row| !row.meta().is_deleted)
            .cloned()
            .collect();
        out.sort_by_key(|row| std::cmp::Reverse(row.sort_instant()));
        Ok(out)
    }

    /// Live rows matching a predicate.
    pub async fn filter<F>(&self, pred: F) -> Result<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        note_read(T::TABLE);
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|row| !row.meta().is_deleted && pred(row))
            .cloned()
            .collect())
    }

    /// All rows matching a predicate, deleted included.
    pub async fn filter_any<F>(&self, pred: F) -> Result<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        note_read(T::TABLE);
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|row| pred(row)).cloned().collect())
    }

    /// Live rows whose sort instant falls in `[start, end]`, ascending.
    pub async fn get_in_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<T>> {
        note_read(T::TABLE);
        let rows = self.rows.read().await;
        let mut out: Vec<T> = rows
            .values()
            .filter(|row| {
                !row.meta().is_deleted
                    && row.sort_instant() >= start
                    && row.sort_instant() <= end
            })
            .cloned()
            .collect();
        out.sort_by_key(|row| row.sort_instant());
        Ok(out)
    }
}

/// The local store: one repository per entity table plus the shared
/// change bus.
#[derive(Clone)]
pub struct LocalStore {
    pub bus: ChangeBus,
    pub sessions: Repository<TimedActivitySession>,
    pub series: Repository<WorkoutSeries>,
    pub pain_notes: Repository<PainNote>,
    pub trackers: Repository<RecurringTracker>,
    pub responses: Repository<TrackingResponse>,
    pub products: Repository<StockProduct>,
    pub routines: Repository<StockRoutine>,
    pub purchases: Repository<StockPurchase>,
}

impl LocalStore {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        let bus = ChangeBus::new();
        Self {
            sessions: Repository::new(Arc::clone(&clock), Arc::clone(&ids), bus.clone()),
            series: Repository::new(Arc::clone(&clock), Arc::clone(&ids), bus.clone()),
            pain_notes: Repository::new(Arc::clone(&clock), Arc::clone(&ids), bus.clone()),
            trackers: Repository::new(Arc::clone(&clock), Arc::clone(&ids), bus.clone()),
            responses: Repository::new(Arc::clone(&clock), Arc::clone(&ids), bus.clone()),
            products: Repository::new(Arc::clone(&clock), Arc::clone(&ids), bus.clone()),
            routines: Repository::new(Arc::clone(&clock), Arc::clone(&ids), bus.clone()),
            purchases: Repository::new(clock, ids, bus.clone()),
            bus,
        }
    }
}
