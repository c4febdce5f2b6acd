//! Configuration structures
//!
//! Deserialized from JSON/TOML files or assembled from environment variables
//! by the infra config loader.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    COOLDOWN_SECS, MAX_COOLDOWN_SECS, REARM_RADIUS_M, SAMPLE_MIN_DISPLACEMENT_M,
    SAMPLE_MIN_INTERVAL_SECS, TRIGGER_RADIUS_M,
};
use crate::errors::{GeoRemindError, Result};
use crate::types::{ForegroundService, LocationAccuracy, SamplingOptions};

/// Root application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub reminders: ReminderSourceConfig,
    #[serde(default)]
    pub geofence: GeofenceConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub permissions: PermissionConfig,
}

impl Config {
    /// Configuration with defaults for everything but the reminder endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            reminders: ReminderSourceConfig::new(endpoint),
            geofence: GeofenceConfig::default(),
            sampling: SamplingConfig::default(),
            notifications: NotificationConfig::default(),
            permissions: PermissionConfig::default(),
        }
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    /// Returns `GeoRemindError::Config` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.reminders.endpoint.trim().is_empty() {
            return Err(GeoRemindError::Config("reminders.endpoint must not be empty".into()));
        }
        self.geofence.validate()?;
        self.sampling.validate()?;
        if self.notifications.sink == NotificationSinkKind::Webhook
            && self.notifications.webhook_url.as_deref().map_or(true, |u| u.trim().is_empty())
        {
            return Err(GeoRemindError::Config(
                "notifications.webhook_url is required for the webhook sink".into(),
            ));
        }
        Ok(())
    }
}

/// Where reminders are fetched from on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderSourceConfig {
    pub endpoint: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Total attempts per fetch (initial try + retries on 5xx/connect errors).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl ReminderSourceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_seconds: default_timeout_seconds(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_max_attempts() -> usize {
    2
}

/// Hysteresis thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeofenceConfig {
    pub trigger_radius_m: f64,
    pub rearm_radius_m: f64,
    pub cooldown_seconds: u64,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            trigger_radius_m: TRIGGER_RADIUS_M,
            rearm_radius_m: REARM_RADIUS_M,
            cooldown_seconds: COOLDOWN_SECS,
        }
    }
}

impl GeofenceConfig {
    /// Cooldown clamped to [`MAX_COOLDOWN_SECS`].
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_seconds.min(MAX_COOLDOWN_SECS))
    }

    /// # Errors
    /// Returns `GeoRemindError::Config` when the radii or cooldown are unusable.
    pub fn validate(&self) -> Result<()> {
        if !(self.trigger_radius_m.is_finite() && self.trigger_radius_m > 0.0) {
            return Err(GeoRemindError::Config(format!(
                "geofence.trigger_radius_m must be positive, got {}",
                self.trigger_radius_m
            )));
        }
        if !(self.rearm_radius_m.is_finite() && self.rearm_radius_m >= self.trigger_radius_m) {
            return Err(GeoRemindError::Config(format!(
                "geofence.rearm_radius_m ({}) must be >= trigger_radius_m ({})",
                self.rearm_radius_m, self.trigger_radius_m
            )));
        }
        if self.cooldown_seconds == 0 || self.cooldown_seconds > MAX_COOLDOWN_SECS {
            return Err(GeoRemindError::Config(format!(
                "geofence.cooldown_seconds must be between 1 and {MAX_COOLDOWN_SECS}, got {}",
                self.cooldown_seconds
            )));
        }
        Ok(())
    }
}

/// Location subscription settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub accuracy: LocationAccuracy,
    pub min_interval_seconds: u64,
    pub min_displacement_m: f64,
    /// Newline-delimited JSON samples replayed by the command-line runner.
    pub track_file: Option<String>,
    /// Sleep between replayed samples according to their timestamps.
    pub paced: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            accuracy: LocationAccuracy::Balanced,
            min_interval_seconds: SAMPLE_MIN_INTERVAL_SECS,
            min_displacement_m: SAMPLE_MIN_DISPLACEMENT_M,
            track_file: None,
            paced: false,
        }
    }
}

impl SamplingConfig {
    pub fn options(&self) -> SamplingOptions {
        SamplingOptions {
            accuracy: self.accuracy,
            min_interval: Duration::from_secs(self.min_interval_seconds),
            min_displacement_m: self.min_displacement_m,
            foreground_service: ForegroundService::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.min_interval_seconds == 0 {
            return Err(GeoRemindError::Config("sampling.min_interval_seconds must be > 0".into()));
        }
        if !(self.min_displacement_m.is_finite() && self.min_displacement_m >= 0.0) {
            return Err(GeoRemindError::Config(
                "sampling.min_displacement_m must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

/// Which notification sink delivers alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSinkKind {
    /// Emit notifications as structured log events.
    #[default]
    Log,
    /// POST notifications as JSON to `webhook_url`.
    Webhook,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub sink: NotificationSinkKind,
    pub webhook_url: Option<String>,
}

/// Permission grants reported by the static permission provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    pub foreground_location: bool,
    pub background_location: bool,
    pub notifications: bool,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self { foreground_location: true, background_location: true, notifications: true }
    }
}
