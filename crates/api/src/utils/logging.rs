use std::time::Duration;

use georemind_domain::GeoRemindError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(
    command: &str,
    elapsed: Duration,
    success: bool,
    error_type: Option<&'static str>,
) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, error_type = error_type.unwrap_or("unknown"), "command_execution_failure");
    }
}

/// Convert a `GeoRemindError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &GeoRemindError) -> &'static str {
    match error {
        GeoRemindError::PermissionDenied(_) => "permission_denied",
        GeoRemindError::Network(_) => "network",
        GeoRemindError::Notification(_) => "notification",
        GeoRemindError::Registration(_) => "registration",
        GeoRemindError::Config(_) => "config",
        GeoRemindError::InvalidInput(_) => "invalid_input",
        GeoRemindError::Internal(_) => "internal",
    }
}
