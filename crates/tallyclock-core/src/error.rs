//! Core error types for tallyclock-core.
//!
//! Gateway errors are policy or delivery outcomes that the scheduling engine
//! absorbs. Schedule errors are configuration defects that terminate the
//! operation that hit them.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Core error type for tallyclock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Notification gateway errors
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Scheduling configuration errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by a notification gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The fire date falls inside a quiet hour.
    #[error("Fire date {fire_date} falls in a forbidden hour")]
    ForbiddenHour { fire_date: DateTime<Utc> },

    /// The notification store rejected the request.
    #[error("Notification store failure: {0}")]
    System(String),

    /// The platform failed while asking for permission.
    #[error("Authorization request failed: {0}")]
    Authorization(String),
}

/// Errors that indicate a setup defect rather than a runtime condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The anchor time of day does not exist on the given local date.
    #[error("Cannot anchor {date} to {hour:02}:{minute:02} in the configured timezone")]
    AnchorUnrepresentable {
        date: chrono::NaiveDate,
        hour: u32,
        minute: u32,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Timezone name not found in the tz database
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Could not resolve the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
