// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use lifetrack_core::clock::{FixedClock, SequentialIds};
use lifetrack_core::config::Config;
use lifetrack_core::models::{ActivityKind, TimedActivitySession, WorkoutSeries};
use lifetrack_core::AppState;

pub const USER: &str = "user-1";

/// Fixed "now" used by tests: 2026-02-23 12:00 UTC (a Monday).
#[allow(dead_code)]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 23, 12, 0, 0).unwrap()
}

/// App state wired to a fixed clock and sequential ids.
pub fn test_state() -> (AppState, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(test_now()));
    let state = AppState::with_collaborators(
        Config::default(),
        clock.clone(),
        Arc::new(SequentialIds::default()),
    );
    (state, clock)
}

#[allow(dead_code)]
pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[allow(dead_code)]
pub fn instant(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

/// Create a work session starting at `started_at` with the given
/// duration.
#[allow(dead_code)]
pub async fn make_session(
    state: &AppState,
    started_at: DateTime<Utc>,
    duration_secs: u32,
) -> TimedActivitySession {
    state
        .store
        .sessions
        .create(USER, |meta| {
            let session = TimedActivitySession {
                meta,
                kind: ActivityKind::Work,
                started_at,
                duration_secs,
                project_id: None,
                productivity: None,
                concentration: None,
                distance_meters: None,
                elevation_meters: None,
                timer_paused: false,
                timer_elapsed_secs: 0,
                timer_started_at: None,
            };
            session.validate()?;
            Ok(session)
        })
        .await
        .expect("session creation should succeed")
}

/// Create a completed workout series row for an exercise.
#[allow(dead_code)]
pub async fn make_series(
    state: &AppState,
    session_id: &str,
    exercise_id: &str,
    order: u32,
    reps: u32,
    weight_kg: Option<f64>,
    completed: bool,
) -> WorkoutSeries {
    state
        .store
        .series
        .create(USER, |meta| {
            let series = WorkoutSeries {
                meta,
                session_id: session_id.to_string(),
                exercise_id: exercise_id.to_string(),
                order,
                reps,
                weight_kg,
                rest_secs: None,
                rpe: None,
                completed,
            };
            series.validate()?;
            Ok(series)
        })
        .await
        .expect("series creation should succeed")
}
