// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pure aggregation functions producing dashboard view-models.
//!
//! Every function takes already-fetched, already-filtered (non-deleted)
//! collections and an explicit `today`/offset where time matters; no
//! hidden clock reads. Same inputs, same outputs.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;

use crate::error::Result;
use crate::models::{RecurringTracker, TimedActivitySession, TrackingResponse, WorkoutSeries};
use crate::recurrence::scheduled_dates;
use crate::time_utils::{month_key, to_local_date, week_range};

/// Fallback bucket for rows without a category key.
pub const UNASSIGNED_LABEL: &str = "Unassigned";
pub const UNASSIGNED_COLOR: &str = "#9ca3af";

// ─── Streaks ─────────────────────────────────────────────────────

/// Consecutive active days ending at `today`.
///
/// Walks backward one day at a time and stops at the first gap.
/// Returns 0 when `today` itself is absent: an in-progress day does
/// not retroactively count until it has activity.
pub fn calculate_streak(active_dates: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while active_dates.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

// ─── Period bucketing ────────────────────────────────────────────

/// Bucket granularity for time-series rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

/// One time-series bucket. Keys are "YYYY-MM-DD" for days, the week's
/// Monday for weeks, "YYYY-MM" for months.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub key: String,
    pub value: f64,
}

/// Group timestamped items into period buckets, summing a numeric
/// value per bucket. Ascending by bucket key; periods without items
/// produce no bucket (sparse series) and callers render the gaps as
/// zero.
pub fn bucket_by_period<T>(
    items: &[T],
    granularity: Granularity,
    date_of: impl Fn(&T) -> NaiveDate,
    value_of: impl Fn(&T) -> f64,
) -> Vec<Bucket> {
    let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
    for item in items {
        let date = date_of(item);
        let key = match granularity {
            Granularity::Day => date.to_string(),
            Granularity::Week => week_range(date).0.to_string(),
            Granularity::Month => month_key(date),
        };
        *buckets.entry(key).or_insert(0.0) += value_of(item);
    }
    buckets
        .into_iter()
        .map(|(key, value)| Bucket { key, value })
        .collect()
}

/// Weekly rollup of session durations in hours.
pub fn weekly_session_hours(
    sessions: &[TimedActivitySession],
    offset: FixedOffset,
) -> Vec<Bucket> {
    bucket_by_period(
        sessions,
        Granularity::Week,
        |s| to_local_date(s.started_at, offset),
        |s| f64::from(s.duration_secs) / 3600.0,
    )
}

// ─── Categorical grouping ────────────────────────────────────────

/// One named category bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBucket {
    /// Foreign key, `None` for the fallback bucket
    pub key: Option<String>,
    pub label: String,
    pub color: String,
    pub value: f64,
}

/// Group items by a nullable foreign key into named buckets.
///
/// `resolve` maps a key to its display label and color; unresolvable
/// and null keys land in the deterministic fallback bucket. Sorted by
/// value descending, ties by label.
pub fn group_by_category<T>(
    items: &[T],
    key_of: impl Fn(&T) -> Option<String>,
    resolve: impl Fn(&str) -> Option<(String, String)>,
    value_of: impl Fn(&T) -> f64,
) -> Vec<CategoryBucket> {
    let mut grouped: HashMap<Option<String>, f64> = HashMap::new();
    for item in items {
        *grouped.entry(key_of(item)).or_insert(0.0) += value_of(item);
    }

    let mut out: Vec<CategoryBucket> = grouped
        .into_iter()
        .map(|(key, value)| {
            let (label, color) = key
                .as_deref()
                .and_then(&resolve)
                .unwrap_or_else(|| (UNASSIGNED_LABEL.to_string(), UNASSIGNED_COLOR.to_string()));
            CategoryBucket {
                key,
                label,
                color,
                value,
            }
        })
        .collect();
    out.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.label.cmp(&b.label))
    });
    out
}

// ─── Completion rate ─────────────────────────────────────────────

/// Percentage of scheduled tracker occurrences answered in
/// `[from, to]`, rounded to the nearest integer.
///
/// Defined as 0 when nothing was scheduled; never NaN and never an
/// error for an empty schedule.
pub fn completion_rate(
    trackers: &[RecurringTracker],
    responses: &[TrackingResponse],
    from: NaiveDate,
    to: NaiveDate,
    offset: FixedOffset,
) -> Result<u8> {
    let answered_days: HashSet<(&str, NaiveDate)> = responses
        .iter()
        .map(|r| (r.recurring_id.as_str(), r.date))
        .collect();

    let mut scheduled = 0u32;
    let mut answered = 0u32;
    for tracker in trackers {
        let anchor = to_local_date(tracker.meta.created_at, offset);
        for date in scheduled_dates(&tracker.recurrence, from, to, anchor)? {
            scheduled += 1;
            if answered_days.contains(&(tracker.meta.id.as_str(), date)) {
                answered += 1;
            }
        }
    }

    if scheduled == 0 {
        return Ok(0);
    }
    Ok((f64::from(answered) * 100.0 / f64::from(scheduled)).round() as u8)
}

// ─── Progression curves ──────────────────────────────────────────

/// One point on a per-exercise progression curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Max weight lifted for an exercise per session date, one point per
/// date, ascending. Only completed series count.
pub fn weight_progression(
    exercise_id: &str,
    series: &[WorkoutSeries],
    sessions: &[TimedActivitySession],
    offset: FixedOffset,
) -> Vec<ProgressionPoint> {
    let session_dates: HashMap<&str, NaiveDate> = sessions
        .iter()
        .map(|s| (s.meta.id.as_str(), to_local_date(s.started_at, offset)))
        .collect();

    let mut best: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in series {
        if row.exercise_id != exercise_id || !row.completed {
            continue;
        }
        let Some(weight) = row.weight_kg else {
            continue;
        };
        let Some(date) = session_dates.get(row.session_id.as_str()) else {
            continue;
        };
        let entry = best.entry(*date).or_insert(weight);
        if weight > *entry {
            *entry = weight;
        }
    }

    best.into_iter()
        .map(|(date, value)| ProgressionPoint { date, value })
        .collect()
}
