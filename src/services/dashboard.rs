// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard snapshot assembly.
//!
//! Pulls live collections from the repositories and feeds them through
//! the pure aggregations. Meant to be wrapped in a live query so the
//! snapshot recomputes whenever sessions, trackers or responses
//! change.

use std::collections::HashSet;

use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;

use crate::db::Repository;
use crate::error::Result;
use crate::models::{RecurringTracker, TimedActivitySession, TrackingResponse};
use crate::services::stats::{
    calculate_streak, completion_rate, group_by_category, weekly_session_hours, Bucket,
    CategoryBucket,
};
use crate::time_utils::{to_local_date, week_range};

/// Computed dashboard view-model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Consecutive active days ending today
    pub streak_days: u32,
    /// Session hours per ISO week, ascending, sparse
    pub weekly_hours: Vec<Bucket>,
    /// Session hours per project
    pub by_project: Vec<CategoryBucket>,
    /// Tracker completion rate for the current week, 0-100
    pub completion_rate_pct: u8,
}

/// Assembles dashboard snapshots from the repositories.
#[derive(Clone)]
pub struct DashboardService {
    sessions: Repository<TimedActivitySession>,
    trackers: Repository<RecurringTracker>,
    responses: Repository<TrackingResponse>,
    offset: FixedOffset,
}

impl DashboardService {
    pub fn new(
        sessions: Repository<TimedActivitySession>,
        trackers: Repository<RecurringTracker>,
        responses: Repository<TrackingResponse>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            sessions,
            trackers,
            responses,
            offset,
        }
    }

    /// Compute the dashboard for a user as of `today` (local date).
    ///
    /// Project labels come from `resolve_project`; sessions without a
    /// project land in the fallback bucket.
    pub async fn snapshot(
        &self,
        user_id: &str,
        today: NaiveDate,
        resolve_project: impl Fn(&str) -> Option<(String, String)>,
    ) -> Result<DashboardSnapshot> {
        let sessions = self
            .sessions
            .filter(|s| s.meta.user_id == user_id)
            .await?;
        let trackers = self
            .trackers
            .filter(|t| t.meta.user_id == user_id && t.is_active)
            .await?;
        let responses = self
            .responses
            .filter(|r| r.meta.user_id == user_id)
            .await?;

        let active_dates: HashSet<NaiveDate> = sessions
            .iter()
            .map(|s| to_local_date(s.started_at, self.offset))
            .collect();

        let (week_start, week_end) = week_range(today);

        Ok(DashboardSnapshot {
            streak_days: calculate_streak(&active_dates, today),
            weekly_hours: weekly_session_hours(&sessions, self.offset),
            by_project: group_by_category(
                &sessions,
                |s| s.project_id.clone(),
                resolve_project,
                |s| f64::from(s.duration_secs) / 3600.0,
            ),
            completion_rate_pct: completion_rate(
                &trackers,
                &responses,
                week_start,
                week_end,
                self.offset,
            )?,
        })
    }
}
