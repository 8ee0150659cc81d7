// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recurrence evaluation: deciding whether a rule is due on a given
//! calendar date, and enumerating due dates in a range.
//!
//! Anchor policy for `Custom` rules: the anchor is the rule's creation
//! local date. Dates before the anchor are never due; from the anchor
//! on, every `interval_days`-th day is due.

use chrono::{Datelike, NaiveDate};

use crate::error::{AppError, Result};
use crate::models::tracker::RecurrenceRule;
use crate::time_utils::days_inclusive;

/// Check a rule's shape. Invalid rules fail fast instead of silently
/// defaulting.
pub fn validate_rule(rule: &RecurrenceRule) -> Result<()> {
    match rule {
        RecurrenceRule::Daily => Ok(()),
        RecurrenceRule::Weekly { days_of_week } => {
            if days_of_week.is_empty() {
                return Err(AppError::Validation(
                    "weekly recurrence needs at least one weekday".to_string(),
                ));
            }
            if let Some(bad) = days_of_week.iter().find(|d| **d > 6) {
                return Err(AppError::Validation(format!(
                    "weekday index must be 0-6 (0 = Sunday), got {}",
                    bad
                )));
            }
            Ok(())
        }
        RecurrenceRule::Custom { interval_days } => {
            if *interval_days == 0 {
                return Err(AppError::Validation(
                    "custom recurrence interval must be at least 1 day".to_string(),
                ));
            }
            Ok(())
        }
    }
}

/// Whether an occurrence of `rule` is due on `date`.
///
/// Pure function of `(rule, date, anchor)`; `anchor` is only consulted
/// for `Custom` rules.
pub fn is_due_on(rule: &RecurrenceRule, date: NaiveDate, anchor: NaiveDate) -> Result<bool> {
    validate_rule(rule)?;
    Ok(is_due_on_unchecked(rule, date, anchor))
}

fn is_due_on_unchecked(rule: &RecurrenceRule, date: NaiveDate, anchor: NaiveDate) -> bool {
    match rule {
        RecurrenceRule::Daily => true,
        RecurrenceRule::Weekly { days_of_week } => {
            let weekday = date.weekday().num_days_from_sunday() as u8;
            days_of_week.contains(&weekday)
        }
        RecurrenceRule::Custom { interval_days } => {
            let elapsed = (date - anchor).num_days();
            elapsed >= 0 && elapsed % i64::from(*interval_days) == 0
        }
    }
}

/// Every date in `[from, to]` inclusive on which `rule` is due,
/// ascending. Exactly the filter of the range by [`is_due_on`].
pub fn scheduled_dates(
    rule: &RecurrenceRule,
    from: NaiveDate,
    to: NaiveDate,
    anchor: NaiveDate,
) -> Result<Vec<NaiveDate>> {
    validate_rule(rule)?;
    Ok(days_inclusive(from, to)
        .filter(|date| is_due_on_unchecked(rule, *date, anchor))
        .collect())
}
