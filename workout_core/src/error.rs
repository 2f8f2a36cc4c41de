//! Error types for the workout_core library.
//!
//! The plan parser itself never fails; these errors cover profile
//! validation, progress tracking, persistence and configuration.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workout_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// User profile failed validation
    #[error("Invalid profile: {0}")]
    Profile(String),

    /// Completion tracking addressed a day or exercise that does not exist
    #[error("Tracking error: {0}")]
    Tracking(String),

    /// User id cannot be used as a storage key
    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),

    /// No plan has been saved for this user
    #[error("No saved plan for user {0:?}")]
    NoSavedPlan(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
