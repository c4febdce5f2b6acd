//! GeoRemind - geofenced reminder notifications
//!
//! Command-line runner: loads configuration, starts monitoring and runs
//! until Ctrl-C or, when replaying a track file, until the track ends.
//!
//! `georemind --test-notification` sends the diagnostic notification and
//! exits.

use anyhow::Context;
use georemind_lib::{
    monitoring_status, request_permissions, send_test_notification, start_monitoring, AppContext,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before logging so RUST_LOG from the file applies
    let dotenv = dotenvy::dotenv();
    init_tracing();

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
        Err(err) => tracing::debug!(error = %err, "No .env file loaded"),
    }

    let ctx = AppContext::new().await.context("failed to initialise application context")?;

    if std::env::args().any(|arg| arg == "--test-notification") {
        send_test_notification(&ctx).await.context("test notification failed")?;
        return Ok(());
    }

    let permissions = request_permissions(&ctx).await;
    if !permissions.all_granted() {
        tracing::warn!(missing = ?permissions.missing(), "Not all permissions granted");
    }

    start_monitoring(&ctx).await.context("failed to start geofence monitoring")?;
    tracing::info!("GeoRemind running; press Ctrl-C to stop");

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                tracing::warn!(error = %err, "Failed to listen for Ctrl-C");
            }
            tracing::info!("Interrupt received");
        }
        _ = ctx.wait_for_source_end() => {
            tracing::info!("Position source finished");
        }
    }

    let status = monitoring_status(&ctx).await;
    tracing::info!(triggered = ?status.triggered_reminders, "Final monitoring state");

    ctx.shutdown().await;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("GEOREMIND_LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
