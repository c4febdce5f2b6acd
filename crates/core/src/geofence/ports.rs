//! Port interfaces for geofence monitoring
//!
//! These traits define the boundaries between the monitor and the
//! platform/network implementations it depends on.

use std::sync::Arc;

use async_trait::async_trait;
use georemind_domain::{
    GeoReminder, LocationSample, NotificationRequest, Permission, PermissionStatus, Result,
    SamplingOptions,
};

/// Source of the current reminder set, queried once per tick.
#[async_trait]
pub trait ReminderSource: Send + Sync {
    /// Fetch all reminders. Errors mean "no data this tick".
    async fn fetch_reminders(&self) -> Result<Vec<GeoReminder>>;
}

/// Delivers immediate local notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, request: NotificationRequest) -> Result<()>;
}

/// Queries and requests platform permissions.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Current status without prompting the user.
    async fn check(&self, permission: Permission) -> Result<PermissionStatus>;

    /// Prompt for the permission if needed and return the resulting status.
    async fn request(&self, permission: Permission) -> Result<PermissionStatus>;
}

/// Receives location samples from a subscription.
#[async_trait]
pub trait LocationHandler: Send + Sync {
    async fn on_location(&self, sample: LocationSample);
}

/// Registers background location subscriptions.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Start delivering samples to `handler` according to `options`.
    async fn subscribe(
        &self,
        options: SamplingOptions,
        handler: Arc<dyn LocationHandler>,
    ) -> Result<Box<dyn LocationSubscription>>;
}

/// Handle to an active location subscription.
#[async_trait]
pub trait LocationSubscription: Send + Sync {
    /// Stop delivering samples. Calling twice is a no-op.
    async fn cancel(&mut self) -> Result<()>;
}
