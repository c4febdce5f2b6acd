//! Application context - dependency injection container

use std::sync::Arc;

use georemind_core::{GeofenceMonitor, NotificationSink, PermissionProvider, ReminderSource};
use georemind_domain::{Config, LocationSample, Result};
use georemind_infra::{
    build_notification_sink, ChannelPositionSource, HttpReminderSource, StaticPermissionProvider,
    StreamLocationProvider, TrackFileSource,
};
use tokio::sync::mpsc;

/// Buffered positions a host can push before the sampling task catches up.
const POSITION_FEED_CAPACITY: usize = 64;

/// Application context - holds the monitor and its adapters
pub struct AppContext {
    pub config: Config,
    pub monitor: Arc<GeofenceMonitor>,
    location: Arc<StreamLocationProvider>,
    position_feed: Option<mpsc::Sender<LocationSample>>,
}

impl AppContext {
    /// Create a context from configuration found in the environment or a
    /// config file.
    pub async fn new() -> Result<Self> {
        let config = georemind_infra::config::load()?;
        Self::new_with_config(config).await
    }

    /// Create a context with custom configuration.
    ///
    /// With `sampling.track_file` set, positions are replayed from that
    /// file; otherwise they are fed through [`AppContext::position_feed`].
    pub async fn new_with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let reminders = Arc::new(HttpReminderSource::from_config(&config.reminders)?);
        let notifier = build_notification_sink(&config.notifications)?;
        let permissions = Arc::new(StaticPermissionProvider::new(config.permissions));

        let (location, position_feed) = match config.sampling.track_file.as_deref() {
            Some(path) => {
                let source = TrackFileSource::open(path, config.sampling.paced).await?;
                tracing::info!(path, paced = config.sampling.paced, "Replaying positions from track file");
                (StreamLocationProvider::new(source), None)
            }
            None => {
                let (sender, source) = ChannelPositionSource::channel(POSITION_FEED_CAPACITY);
                (StreamLocationProvider::new(source), Some(sender))
            }
        };

        Ok(Self::from_parts(config, reminders, notifier, permissions, Arc::new(location), position_feed))
    }

    /// Assemble a context from ready-made adapters.
    pub fn from_parts(
        config: Config,
        reminders: Arc<dyn ReminderSource>,
        notifier: Arc<dyn NotificationSink>,
        permissions: Arc<dyn PermissionProvider>,
        location: Arc<StreamLocationProvider>,
        position_feed: Option<mpsc::Sender<LocationSample>>,
    ) -> Self {
        let monitor = GeofenceMonitor::new(reminders, notifier, permissions, location.clone())
            .with_settings(config.geofence)
            .with_sampling(config.sampling.options());

        tracing::debug!(
            trigger_radius_m = config.geofence.trigger_radius_m,
            rearm_radius_m = config.geofence.rearm_radius_m,
            cooldown_seconds = config.geofence.cooldown_seconds,
            "Application context assembled"
        );

        Self { config, monitor: Arc::new(monitor), location, position_feed }
    }

    /// Sender for pushing live positions, when not replaying a track.
    pub fn position_feed(&self) -> Option<mpsc::Sender<LocationSample>> {
        self.position_feed.clone()
    }

    /// Resolves once the position source has no more samples.
    pub async fn wait_for_source_end(&self) {
        self.location.source_exhausted().await;
    }

    /// Stop monitoring before the process exits.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down application context");
        self.monitor.stop().await;
    }
}
