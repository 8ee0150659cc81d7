// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

use chrono::FixedOffset;

/// Core configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of undo entries kept in the session log
    pub undo_capacity: usize,
    /// Seconds before an undo entry expires
    pub undo_expiry_secs: u64,
    /// Viewer's UTC offset in minutes, used for local-date bucketing
    pub utc_offset_minutes: i32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            undo_capacity: 20,
            undo_expiry_secs: 300,
            utc_offset_minutes: 0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            undo_capacity: env::var("LIFETRACK_UNDO_CAPACITY")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("LIFETRACK_UNDO_CAPACITY"))?,
            undo_expiry_secs: env::var("LIFETRACK_UNDO_EXPIRY_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("LIFETRACK_UNDO_EXPIRY_SECS"))?,
            utc_offset_minutes: env::var("LIFETRACK_UTC_OFFSET_MINUTES")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("LIFETRACK_UTC_OFFSET_MINUTES"))?,
        })
    }

    /// The viewer's UTC offset. An out-of-range configured offset
    /// falls back to UTC.
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
