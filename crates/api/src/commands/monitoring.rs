//! Geofence monitoring commands

use georemind_domain::{PermissionReport, Result};
use serde::Serialize;
use tracing::info;

use crate::utils::command_helpers::{execute_command, execute_infallible};
use crate::AppContext;

/// Snapshot shown on the settings screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringStatus {
    pub running: bool,
    pub permissions: PermissionReport,
    pub triggered_reminders: Vec<String>,
}

/// Start background monitoring.
///
/// # Errors
/// `PermissionDenied` naming the missing grants, or `Registration` when the
/// location subscription is refused.
pub async fn start_monitoring(ctx: &AppContext) -> Result<()> {
    execute_command("monitoring::start_monitoring", move || async move {
        info!(command = "monitoring::start_monitoring", "Starting geofence monitoring");
        ctx.monitor.try_start().await
    })
    .await
}

/// Stop background monitoring. Safe to call when already stopped.
pub async fn stop_monitoring(ctx: &AppContext) {
    execute_infallible("monitoring::stop_monitoring", move || async move {
        info!(command = "monitoring::stop_monitoring", "Stopping geofence monitoring");
        ctx.monitor.stop().await;
    })
    .await
}

pub async fn monitoring_status(ctx: &AppContext) -> MonitoringStatus {
    execute_infallible("monitoring::monitoring_status", move || async move {
        MonitoringStatus {
            running: ctx.monitor.is_running(),
            permissions: ctx.monitor.check_permissions().await,
            triggered_reminders: ctx.monitor.triggered_reminders(),
        }
    })
    .await
}

/// Fire the diagnostic notification.
pub async fn send_test_notification(ctx: &AppContext) -> Result<()> {
    execute_command("monitoring::send_test_notification", move || async move {
        ctx.monitor.send_test_notification().await
    })
    .await
}

/// Ask for foreground location, background location and notification
/// permission in that order.
pub async fn request_permissions(ctx: &AppContext) -> PermissionReport {
    execute_infallible("monitoring::request_permissions", move || async move {
        ctx.monitor.request_permissions().await
    })
    .await
}
