// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Same-device timer cache.
//!
//! A small keyed blob recording an in-progress timer, used to
//! reconstruct a running timer's display across a reload on the same
//! device. Cross-device timer state lives on the session record itself
//! and is last-write-wins; this cache never wins over it.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Snapshot of an in-progress timer, keyed by user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub session_id: String,
    /// Seconds accumulated across completed run segments
    pub elapsed_secs: u32,
    /// When the timer was first started
    pub started_at: DateTime<Utc>,
    /// Start of the current run segment; `None` while paused
    pub active_started_at: Option<DateTime<Utc>>,
    pub is_paused: bool,
}

impl TimerSnapshot {
    /// Total elapsed seconds as of `now`, including the in-flight
    /// segment when running.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> u32 {
        let running = match (self.is_paused, self.active_started_at) {
            (false, Some(active_start)) => (now - active_start).num_seconds().max(0) as u32,
            _ => 0,
        };
        self.elapsed_secs + running
    }
}

/// In-memory per-user timer cache.
#[derive(Default)]
pub struct TimerCache {
    entries: DashMap<String, TimerSnapshot>,
}

impl TimerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, user_id: &str, snapshot: TimerSnapshot) {
        self.entries.insert(user_id.to_string(), snapshot);
    }

    pub fn load(&self, user_id: &str) -> Option<TimerSnapshot> {
        self.entries.get(user_id).map(|entry| entry.value().clone())
    }

    /// Drop the cached timer (session finished or discarded).
    pub fn clear(&self, user_id: &str) {
        self.entries.remove(user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_elapsed_includes_running_segment() {
        let start = Utc.with_ymd_and_hms(2026, 2, 23, 10, 0, 0).unwrap();
        let snapshot = TimerSnapshot {
            session_id: "s1".to_string(),
            elapsed_secs: 120,
            started_at: start,
            active_started_at: Some(start),
            is_paused: false,
        };
        let now = Utc.with_ymd_and_hms(2026, 2, 23, 10, 0, 30).unwrap();
        assert_eq!(snapshot.elapsed_at(now), 150);
    }

    #[test]
    fn test_elapsed_frozen_while_paused() {
        let start = Utc.with_ymd_and_hms(2026, 2, 23, 10, 0, 0).unwrap();
        let snapshot = TimerSnapshot {
            session_id: "s1".to_string(),
            elapsed_secs: 120,
            started_at: start,
            active_started_at: None,
            is_paused: true,
        };
        let now = Utc.with_ymd_and_hms(2026, 2, 23, 11, 0, 0).unwrap();
        assert_eq!(snapshot.elapsed_at(now), 120);
    }
}
