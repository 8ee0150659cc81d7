// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Base record shape shared by every persisted entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Lifecycle metadata carried by every stored row.
///
/// Identity (`id`) never changes after creation. Soft-delete flips
/// `is_deleted`/`deleted_at` but the row stays in storage and can be
/// restored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Opaque unique identifier (stable, immutable)
    pub id: String,
    /// Owner reference
    pub user_id: String,
    /// Creation instant (UTC)
    pub created_at: DateTime<Utc>,
    /// Last mutation instant (UTC), `>= created_at`
    pub updated_at: DateTime<Utc>,
    /// Soft-delete flag; default reads exclude deleted rows
    #[serde(default)]
    pub is_deleted: bool,
    /// Deletion instant, non-null iff `is_deleted`
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RecordMeta {
    pub fn new(id: String, user_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        }
    }
}

/// A persisted entity with base-record metadata.
pub trait Record: Clone + Send + Sync + 'static {
    /// Storage table this entity lives in.
    const TABLE: &'static str;

    fn meta(&self) -> &RecordMeta;
    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Instant used by date-ordered scans and date-range reads.
    /// Defaults to the creation instant.
    fn sort_instant(&self) -> DateTime<Utc> {
        self.meta().created_at
    }
}

/// An immutable partial update for an entity.
///
/// Patches are validated against the current row before being merged,
/// so an invalid field combination never reaches storage.
pub trait Patch<T>: Send {
    fn validate(&self, current: &T) -> Result<()> {
        let _ = current;
        Ok(())
    }

    fn apply(self, target: &mut T);
}
