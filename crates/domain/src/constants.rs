//! Geofence constants
//!
//! Defaults for the hysteresis thresholds and the location subscription.
//! Every value can be overridden through [`crate::Config`].

/// Distance at or below which a reminder fires.
pub const TRIGGER_RADIUS_M: f64 = 100.0;

/// Distance beyond which a fired reminder re-arms.
pub const REARM_RADIUS_M: f64 = 200.0;

/// How long a fired reminder stays suppressed while the user remains nearby.
pub const COOLDOWN_SECS: u64 = 10 * 60;

/// Upper bound accepted for a configured cooldown (one week).
pub const MAX_COOLDOWN_SECS: u64 = 7 * 24 * 60 * 60;

/// Minimum time between delivered location samples.
pub const SAMPLE_MIN_INTERVAL_SECS: u64 = 30;

/// Minimum displacement between delivered location samples.
pub const SAMPLE_MIN_DISPLACEMENT_M: f64 = 50.0;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Payload `type` for geofence notifications.
pub const NOTIFICATION_TYPE_LOCATION: &str = "location";

/// Payload `type` for the diagnostic notification.
pub const NOTIFICATION_TYPE_TEST: &str = "test";

/// Foreground-service descriptor shown while sampling in the background.
pub const FOREGROUND_SERVICE_TITLE: &str = "Location reminders active";
pub const FOREGROUND_SERVICE_BODY: &str = "Watching for nearby reminders";
