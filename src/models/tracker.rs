// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recurring check-in trackers and their dated responses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::collections;
use crate::error::{AppError, Result};
use crate::models::record::{Patch, Record, RecordMeta};

/// Declarative schedule deciding on which calendar dates an
/// occurrence is due. Shared by trackers and stock routines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "recurrence_type", rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// Due every day
    Daily,
    /// Due on specific weekdays, 0 = Sunday .. 6 = Saturday
    Weekly { days_of_week: Vec<u8> },
    /// Due every N days counted from the rule's anchor date
    Custom { interval_days: u32 },
}

/// Kind of value a tracker expects per check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Number,
    Boolean,
    Choice,
    Slider,
}

/// A repeatable check-in definition ("did you stretch today?",
/// "hours slept", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTracker {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub response_type: ResponseType,
    #[serde(flatten)]
    pub recurrence: RecurrenceRule,
    /// Display unit for number responses
    pub unit: Option<String>,
    /// Options for choice responses; at least two when used
    #[serde(default)]
    pub choices: Vec<String>,
    pub slider_min: Option<f64>,
    pub slider_max: Option<f64>,
    pub slider_step: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl RecurringTracker {
    /// Validate the response-type configuration. The recurrence rule
    /// itself is validated by the recurrence evaluator.
    pub fn validate(&self) -> Result<()> {
        match self.response_type {
            ResponseType::Choice => {
                if self.choices.len() < 2 {
                    return Err(AppError::Validation(
                        "choice tracker needs at least two choices".to_string(),
                    ));
                }
            }
            ResponseType::Slider => {
                let (min, max) = match (self.slider_min, self.slider_max) {
                    (Some(min), Some(max)) => (min, max),
                    _ => {
                        return Err(AppError::Validation(
                            "slider tracker needs slider_min and slider_max".to_string(),
                        ))
                    }
                };
                if min >= max {
                    return Err(AppError::Validation(format!(
                        "slider range is empty: min {} >= max {}",
                        min, max
                    )));
                }
                if let Some(step) = self.slider_step {
                    if step <= 0.0 {
                        return Err(AppError::Validation(
                            "slider step must be positive".to_string(),
                        ));
                    }
                }
            }
            ResponseType::Number | ResponseType::Boolean => {}
        }
        Ok(())
    }
}

impl Record for RecurringTracker {
    const TABLE: &'static str = collections::TRACKERS;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}

/// Partial update for a tracker.
#[derive(Debug, Default, Clone)]
pub struct TrackerPatch {
    pub name: Option<String>,
    pub unit: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl Patch<RecurringTracker> for TrackerPatch {
    fn apply(self, target: &mut RecurringTracker) {
        if let Some(v) = self.name {
            target.name = v;
        }
        if let Some(v) = self.unit {
            target.unit = v;
        }
        if let Some(v) = self.is_active {
            target.is_active = v;
        }
    }
}

/// The value recorded for one check-in. Exactly one variant, matching
/// the parent tracker's `response_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResponseValue {
    Number(f64),
    Boolean(bool),
    Choice(String),
    Slider(f64),
}

impl ResponseValue {
    pub fn response_type(&self) -> ResponseType {
        match self {
            ResponseValue::Number(_) => ResponseType::Number,
            ResponseValue::Boolean(_) => ResponseType::Boolean,
            ResponseValue::Choice(_) => ResponseType::Choice,
            ResponseValue::Slider(_) => ResponseType::Slider,
        }
    }
}

/// One response per tracker per local calendar day.
///
/// Uniqueness of (`recurring_id`, `date`) is enforced at the
/// application level by the tracker service's upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingResponse {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub recurring_id: String,
    /// Local calendar date of the check-in
    pub date: NaiveDate,
    pub value: ResponseValue,
}

impl Record for TrackingResponse {
    const TABLE: &'static str = collections::TRACKING_RESPONSES;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn sort_instant(&self) -> DateTime<Utc> {
        self.date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or(self.meta.created_at)
    }
}

/// Partial update for a response (value replacement only; the day a
/// response belongs to never moves).
#[derive(Debug, Clone)]
pub struct ResponsePatch {
    pub value: ResponseValue,
}

impl Patch<TrackingResponse> for ResponsePatch {
    fn validate(&self, current: &TrackingResponse) -> Result<()> {
        if self.value.response_type() != current.value.response_type() {
            return Err(AppError::Validation(format!(
                "response value type {:?} does not match existing {:?}",
                self.value.response_type(),
                current.value.response_type()
            )));
        }
        Ok(())
    }

    fn apply(self, target: &mut TrackingResponse) {
        target.value = self.value;
    }
}
