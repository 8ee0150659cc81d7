// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for local-date derivation and calendar bucketing.
//!
//! All day-bucketing in the core goes through [`to_local_date`]: the
//! calendar day is derived from the viewer's UTC offset, never by
//! slicing a UTC timestamp string.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};

/// Local calendar date of an instant under the given UTC offset.
///
/// Converts to the local timezone first and takes the date components
/// from there, so month/year boundaries and offset transitions come
/// out right.
pub fn to_local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Monday-start week containing `date`, as `(week_start, week_end)`.
///
/// `week_end` is always `week_start + 6` days; the range is stable
/// across month and year boundaries.
pub fn week_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

/// "YYYY-MM" key for calendar-month bucketing.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// All dates in `[from, to]` inclusive, ascending. Empty when `from > to`.
pub fn days_inclusive(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(from), |d| d.succ_opt()).take_while(move |d| *d <= to)
}
