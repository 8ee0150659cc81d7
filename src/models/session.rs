// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timed activity sessions (work / workout / cardio) and their
//! child rows: workout series and pain notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::collections;
use crate::error::{AppError, Result};
use crate::models::record::{Patch, Record, RecordMeta};

pub const MIN_REPS: u32 = 1;
pub const MAX_REPS: u32 = 100;
pub const MAX_WEIGHT_KG: f64 = 500.0;
pub const MAX_REST_SECS: u32 = 3600;
pub const MAX_NOTE_CHARS: usize = 500;

/// Kind of timed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Work,
    Workout,
    Cardio,
}

/// A timed activity session.
///
/// Created on session start or retroactively; the `timer_*` fields
/// carry cross-device timer state (last write wins between devices).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedActivitySession {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub kind: ActivityKind,
    /// Session start instant
    pub started_at: DateTime<Utc>,
    /// Duration in seconds, positive
    pub duration_secs: u32,
    /// Optional project assignment (work sessions)
    pub project_id: Option<String>,
    /// Self-rated productivity 1-10
    pub productivity: Option<u8>,
    /// Self-rated concentration 1-10
    pub concentration: Option<u8>,
    /// Distance covered (cardio)
    pub distance_meters: Option<f64>,
    /// Elevation gained (cardio)
    pub elevation_meters: Option<f64>,
    // Cross-device timer state
    #[serde(default)]
    pub timer_paused: bool,
    #[serde(default)]
    pub timer_elapsed_secs: u32,
    #[serde(default)]
    pub timer_started_at: Option<DateTime<Utc>>,
}

impl TimedActivitySession {
    /// Validate invariants enforced at creation time.
    pub fn validate(&self) -> Result<()> {
        if self.duration_secs == 0 {
            return Err(AppError::Validation(
                "session duration must be positive".to_string(),
            ));
        }
        validate_rating("productivity", self.productivity)?;
        validate_rating("concentration", self.concentration)?;
        Ok(())
    }
}

impl Record for TimedActivitySession {
    const TABLE: &'static str = collections::SESSIONS;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn sort_instant(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Partial update for a session.
///
/// Optional session fields use the outer `Option` for "leave as is"
/// and the inner one for "set or clear".
#[derive(Debug, Default, Clone)]
pub struct SessionPatch {
    pub duration_secs: Option<u32>,
    pub project_id: Option<Option<String>>,
    pub productivity: Option<Option<u8>>,
    pub concentration: Option<Option<u8>>,
    pub distance_meters: Option<Option<f64>>,
    pub elevation_meters: Option<Option<f64>>,
    pub timer_paused: Option<bool>,
    pub timer_elapsed_secs: Option<u32>,
    pub timer_started_at: Option<Option<DateTime<Utc>>>,
}

impl Patch<TimedActivitySession> for SessionPatch {
    fn validate(&self, _current: &TimedActivitySession) -> Result<()> {
        if self.duration_secs == Some(0) {
            return Err(AppError::Validation(
                "session duration must be positive".to_string(),
            ));
        }
        validate_rating("productivity", self.productivity.flatten())?;
        validate_rating("concentration", self.concentration.flatten())?;
        Ok(())
    }

    fn apply(self, target: &mut TimedActivitySession) {
        if let Some(v) = self.duration_secs {
            target.duration_secs = v;
        }
        if let Some(v) = self.project_id {
            target.project_id = v;
        }
        if let Some(v) = self.productivity {
            target.productivity = v;
        }
        if let Some(v) = self.concentration {
            target.concentration = v;
        }
        if let Some(v) = self.distance_meters {
            target.distance_meters = v;
        }
        if let Some(v) = self.elevation_meters {
            target.elevation_meters = v;
        }
        if let Some(v) = self.timer_paused {
            target.timer_paused = v;
        }
        if let Some(v) = self.timer_elapsed_secs {
            target.timer_elapsed_secs = v;
        }
        if let Some(v) = self.timer_started_at {
            target.timer_started_at = v;
        }
    }
}

/// One logged set of an exercise within a workout session.
///
/// Mutable in place until `completed`; after that, edits are rejected
/// unless the patch explicitly unlocks the row first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSeries {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub session_id: String,
    pub exercise_id: String,
    /// Zero-based position within the session
    pub order: u32,
    /// Repetitions, 1-100
    pub reps: u32,
    /// Load in kilograms, 0-500
    pub weight_kg: Option<f64>,
    /// Rest before next set, 0-3600 seconds
    pub rest_secs: Option<u32>,
    /// Rate of perceived exertion, 1-10
    pub rpe: Option<u8>,
    #[serde(default)]
    pub completed: bool,
}

impl WorkoutSeries {
    pub fn validate(&self) -> Result<()> {
        validate_series_fields(Some(self.reps), self.weight_kg, self.rest_secs, self.rpe)
    }
}

impl Record for WorkoutSeries {
    const TABLE: &'static str = collections::WORKOUT_SERIES;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}

/// Partial update for a workout series.
#[derive(Debug, Default, Clone)]
pub struct SeriesPatch {
    pub reps: Option<u32>,
    pub weight_kg: Option<f64>,
    pub rest_secs: Option<u32>,
    pub rpe: Option<u8>,
    pub completed: Option<bool>,
}

impl Patch<WorkoutSeries> for SeriesPatch {
    fn validate(&self, current: &WorkoutSeries) -> Result<()> {
        // Completed rows are locked; the only edit allowed without an
        // explicit unlock is the unlock itself.
        let unlocking = self.completed == Some(false);
        let edits_fields = self.reps.is_some()
            || self.weight_kg.is_some()
            || self.rest_secs.is_some()
            || self.rpe.is_some();
        if current.completed && edits_fields && !unlocking {
            return Err(AppError::Validation(
                "completed series is locked; unlock it before editing".to_string(),
            ));
        }
        validate_series_fields(self.reps, self.weight_kg, self.rest_secs, self.rpe)
    }

    fn apply(self, target: &mut WorkoutSeries) {
        if let Some(v) = self.reps {
            target.reps = v;
        }
        if let Some(v) = self.weight_kg {
            target.weight_kg = Some(v);
        }
        if let Some(v) = self.rest_secs {
            target.rest_secs = Some(v);
        }
        if let Some(v) = self.rpe {
            target.rpe = Some(v);
        }
        if let Some(v) = self.completed {
            target.completed = v;
        }
    }
}

/// Body areas a pain note can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyZone {
    Neck,
    Shoulder,
    Elbow,
    Wrist,
    UpperBack,
    LowerBack,
    Hip,
    Knee,
    Ankle,
}

/// A pain note logged during a live session, tied to an exercise.
///
/// Soft-deletable independently of its parent series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainNote {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub session_id: String,
    pub exercise_id: String,
    pub zone: BodyZone,
    /// Pain intensity, 1-10
    pub intensity: u8,
    /// Free-text note, at most 500 characters
    pub note: Option<String>,
}

impl PainNote {
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.intensity) {
            return Err(AppError::Validation(format!(
                "pain intensity must be 1-10, got {}",
                self.intensity
            )));
        }
        if let Some(note) = &self.note {
            if note.chars().count() > MAX_NOTE_CHARS {
                return Err(AppError::Validation(format!(
                    "pain note exceeds {} characters",
                    MAX_NOTE_CHARS
                )));
            }
        }
        Ok(())
    }
}

impl Record for PainNote {
    const TABLE: &'static str = collections::PAIN_NOTES;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}

fn validate_rating(field: &str, value: Option<u8>) -> Result<()> {
    if let Some(v) = value {
        if !(1..=10).contains(&v) {
            return Err(AppError::Validation(format!(
                "{} must be 1-10, got {}",
                field, v
            )));
        }
    }
    Ok(())
}

fn validate_series_fields(
    reps: Option<u32>,
    weight_kg: Option<f64>,
    rest_secs: Option<u32>,
    rpe: Option<u8>,
) -> Result<()> {
    if let Some(reps) = reps {
        if !(MIN_REPS..=MAX_REPS).contains(&reps) {
            return Err(AppError::Validation(format!(
                "reps must be {}-{}, got {}",
                MIN_REPS, MAX_REPS, reps
            )));
        }
    }
    if let Some(w) = weight_kg {
        if !(0.0..=MAX_WEIGHT_KG).contains(&w) {
            return Err(AppError::Validation(format!(
                "weight must be 0-{} kg, got {}",
                MAX_WEIGHT_KG, w
            )));
        }
    }
    if let Some(rest) = rest_secs {
        if rest > MAX_REST_SECS {
            return Err(AppError::Validation(format!(
                "rest time must be 0-{} seconds, got {}",
                MAX_REST_SECS, rest
            )));
        }
    }
    validate_rating("rpe", rpe)
}
