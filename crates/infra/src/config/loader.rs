//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `GEOREMIND_REMINDERS_URL` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. Validates the result either way
//!
//! ## Environment Variables
//! - `GEOREMIND_REMINDERS_URL`: Reminders endpoint (required)
//! - `GEOREMIND_REMINDERS_TIMEOUT`: Fetch timeout in seconds
//! - `GEOREMIND_TRIGGER_RADIUS_M`: Distance at or below which a reminder fires
//! - `GEOREMIND_REARM_RADIUS_M`: Distance beyond which a reminder re-arms
//! - `GEOREMIND_COOLDOWN_SECS`: Suppression window after a notification
//! - `GEOREMIND_SAMPLE_INTERVAL_SECS`: Minimum time between samples
//! - `GEOREMIND_SAMPLE_DISPLACEMENT_M`: Minimum movement between samples
//! - `GEOREMIND_TRACK_FILE`: NDJSON track replayed by the runner
//! - `GEOREMIND_TRACK_PACED`: Replay at recorded speed (true/false)
//! - `GEOREMIND_NOTIFICATION_SINK`: `log` or `webhook`
//! - `GEOREMIND_WEBHOOK_URL`: Target for the webhook sink
//! - `GEOREMIND_GRANT_FOREGROUND_LOCATION`, `GEOREMIND_GRANT_BACKGROUND_LOCATION`,
//!   `GEOREMIND_GRANT_NOTIFICATIONS`: Grants reported by the static
//!   permission provider (default true)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./georemind.json` or `./georemind.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use georemind_domain::{
    Config, GeoRemindError, GeofenceConfig, NotificationConfig, NotificationSinkKind,
    PermissionConfig, ReminderSourceConfig, Result, SamplingConfig,
};

const REMINDERS_URL: &str = "GEOREMIND_REMINDERS_URL";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the reminders URL
/// is not set there, falls back to loading from a config file. A variable
/// that is set but malformed is an error, not a reason to fall back.
///
/// # Errors
/// Returns `GeoRemindError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Validation fails
pub fn load() -> Result<Config> {
    let config = if std::env::var_os(REMINDERS_URL).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        config
    } else {
        tracing::debug!(variable = REMINDERS_URL, "Not set, trying config file");
        load_from_file(None)?
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// Only `GEOREMIND_REMINDERS_URL` is required; everything else falls back
/// to defaults.
///
/// # Errors
/// Returns `GeoRemindError::Config` if the URL is missing or any variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut reminders = ReminderSourceConfig::new(env_var(REMINDERS_URL)?);
    if let Some(timeout) = env_parse("GEOREMIND_REMINDERS_TIMEOUT")? {
        reminders.timeout_seconds = timeout;
    }

    let mut geofence = GeofenceConfig::default();
    if let Some(radius) = env_parse("GEOREMIND_TRIGGER_RADIUS_M")? {
        geofence.trigger_radius_m = radius;
    }
    if let Some(radius) = env_parse("GEOREMIND_REARM_RADIUS_M")? {
        geofence.rearm_radius_m = radius;
    }
    if let Some(cooldown) = env_parse("GEOREMIND_COOLDOWN_SECS")? {
        geofence.cooldown_seconds = cooldown;
    }

    let mut sampling = SamplingConfig::default();
    if let Some(interval) = env_parse("GEOREMIND_SAMPLE_INTERVAL_SECS")? {
        sampling.min_interval_seconds = interval;
    }
    if let Some(displacement) = env_parse("GEOREMIND_SAMPLE_DISPLACEMENT_M")? {
        sampling.min_displacement_m = displacement;
    }
    sampling.track_file = std::env::var("GEOREMIND_TRACK_FILE").ok().filter(|s| !s.is_empty());
    sampling.paced = env_bool("GEOREMIND_TRACK_PACED", false);

    let sink = match std::env::var("GEOREMIND_NOTIFICATION_SINK") {
        Ok(value) => parse_sink(&value)?,
        Err(_) => NotificationSinkKind::default(),
    };
    let notifications = NotificationConfig {
        sink,
        webhook_url: std::env::var("GEOREMIND_WEBHOOK_URL").ok().filter(|s| !s.is_empty()),
    };

    let permissions = PermissionConfig {
        foreground_location: env_bool("GEOREMIND_GRANT_FOREGROUND_LOCATION", true),
        background_location: env_bool("GEOREMIND_GRANT_BACKGROUND_LOCATION", true),
        notifications: env_bool("GEOREMIND_GRANT_NOTIFICATIONS", true),
    };

    Ok(Config { reminders, geofence, sampling, notifications, permissions })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `GeoRemindError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(GeoRemindError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            GeoRemindError::Config(format!(
                "{REMINDERS_URL} is not set and no config file was found in the standard locations"
            ))
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| GeoRemindError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| GeoRemindError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| GeoRemindError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(GeoRemindError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory (`config.*`, `georemind.*`), its
/// parents up to two levels, then the same names next to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("georemind.json"),
        dir.join("georemind.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `GeoRemindError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty()).ok_or_else(|| {
        GeoRemindError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| GeoRemindError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn parse_sink(value: &str) -> Result<NotificationSinkKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "log" | "" => Ok(NotificationSinkKind::Log),
        "webhook" => Ok(NotificationSinkKind::Webhook),
        other => Err(GeoRemindError::Config(format!("Unknown notification sink: {}", other))),
    }
}
