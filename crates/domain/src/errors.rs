//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for GeoRemind
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum GeoRemindError {
    /// A required location or notification permission is not granted.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Reminder source unreachable or returned a non-success response.
    #[error("Network error: {0}")]
    Network(String),

    /// The notification service declined or failed to deliver.
    #[error("Notification error: {0}")]
    Notification(String),

    /// The location subscription could not be registered or removed.
    #[error("Registration error: {0}")]
    Registration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for GeoRemind operations
pub type Result<T> = std::result::Result<T, GeoRemindError>;
