//! Notification sinks.

pub mod log_sink;
pub mod webhook;

use std::sync::Arc;

use georemind_core::NotificationSink;
use georemind_domain::{GeoRemindError, NotificationConfig, NotificationSinkKind, Result};

pub use log_sink::LogNotificationSink;
pub use webhook::WebhookNotificationSink;

use crate::http::HttpClient;

/// Build the sink selected by configuration.
///
/// # Errors
/// Returns `GeoRemindError::Config` when the webhook sink has no usable URL.
pub fn build_notification_sink(config: &NotificationConfig) -> Result<Arc<dyn NotificationSink>> {
    match config.sink {
        NotificationSinkKind::Log => Ok(Arc::new(LogNotificationSink::new())),
        NotificationSinkKind::Webhook => {
            let url = config.webhook_url.as_deref().ok_or_else(|| {
                GeoRemindError::Config("notifications.webhook_url is required".into())
            })?;
            Ok(Arc::new(WebhookNotificationSink::new(HttpClient::new()?, url)?))
        }
    }
}
