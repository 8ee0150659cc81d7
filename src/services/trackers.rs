// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recurring tracker workflows: creating trackers and recording
//! dated responses.
//!
//! Responses are unique per (tracker, local day) at the application
//! level: recording twice on the same day updates the existing row
//! instead of creating a second one.

use chrono::NaiveDate;

use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::tracker::{
    RecurrenceRule, RecurringTracker, ResponsePatch, ResponseType, ResponseValue,
    TrackingResponse,
};
use crate::recurrence::validate_rule;

/// Fields for a new tracker.
#[derive(Debug, Clone)]
pub struct NewTracker {
    pub name: String,
    pub response_type: ResponseType,
    pub recurrence: RecurrenceRule,
    pub unit: Option<String>,
    pub choices: Vec<String>,
    pub slider_min: Option<f64>,
    pub slider_max: Option<f64>,
    pub slider_step: Option<f64>,
}

/// Tracker and response workflows over their repositories.
#[derive(Clone)]
pub struct TrackerService {
    trackers: Repository<RecurringTracker>,
    responses: Repository<TrackingResponse>,
}

impl TrackerService {
    pub fn new(
        trackers: Repository<RecurringTracker>,
        responses: Repository<TrackingResponse>,
    ) -> Self {
        Self {
            trackers,
            responses,
        }
    }

    /// Create a tracker after validating its recurrence rule and
    /// response-type configuration.
    pub async fn create_tracker(&self, user_id: &str, new: NewTracker) -> Result<RecurringTracker> {
        validate_rule(&new.recurrence)?;
        let tracker = self
            .trackers
            .create(user_id, |meta| {
                let tracker = RecurringTracker {
                    meta,
                    name: new.name,
                    response_type: new.response_type,
                    recurrence: new.recurrence,
                    unit: new.unit,
                    choices: new.choices,
                    slider_min: new.slider_min,
                    slider_max: new.slider_max,
                    slider_step: new.slider_step,
                    is_active: true,
                };
                tracker.validate()?;
                Ok(tracker)
            })
            .await?;

        tracing::info!(tracker_id = %tracker.meta.id, name = %tracker.name, "Tracker created");
        Ok(tracker)
    }

    /// Record a response for a tracker on a local calendar day.
    ///
    /// Upserts: at most one response per tracker per day. The value
    /// must match the tracker's declared response type and per-type
    /// constraints; mismatches surface as validation errors, never
    /// silent coercion.
    pub async fn record_response(
        &self,
        user_id: &str,
        tracker_id: &str,
        date: NaiveDate,
        value: ResponseValue,
    ) -> Result<TrackingResponse> {
        let tracker = self
            .trackers
            .get_by_id(tracker_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("tracker {}", tracker_id)))?;

        validate_value(&tracker, &value)?;

        let existing = self
            .responses
            .filter(|r| r.recurring_id == tracker_id && r.date == date)
            .await?;

        if let Some(existing) = existing.into_iter().next() {
            return self
                .responses
                .update(&existing.meta.id, ResponsePatch { value })
                .await;
        }

        self.responses
            .create(user_id, |meta| {
                Ok(TrackingResponse {
                    meta,
                    recurring_id: tracker_id.to_string(),
                    date,
                    value,
                })
            })
            .await
    }
}

/// Check a response value against the tracker's declared type.
fn validate_value(tracker: &RecurringTracker, value: &ResponseValue) -> Result<()> {
    if value.response_type() != tracker.response_type {
        return Err(AppError::Validation(format!(
            "tracker expects a {:?} response, got {:?}",
            tracker.response_type,
            value.response_type()
        )));
    }
    match value {
        ResponseValue::Choice(choice) => {
            if !tracker.choices.iter().any(|c| c == choice) {
                return Err(AppError::Validation(format!(
                    "'{}' is not one of the tracker's choices",
                    choice
                )));
            }
        }
        ResponseValue::Slider(v) => {
            let min = tracker.slider_min.unwrap_or(f64::NEG_INFINITY);
            let max = tracker.slider_max.unwrap_or(f64::INFINITY);
            if *v < min || *v > max {
                return Err(AppError::Validation(format!(
                    "slider value {} outside range {}..={}",
                    v, min, max
                )));
            }
        }
        ResponseValue::Number(_) | ResponseValue::Boolean(_) => {}
    }
    Ok(())
}
