use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use georemind_core::NotificationSink;
use georemind_domain::{NotificationRequest, Result};
use tracing::info;

/// Delivers notifications as structured `info` events on the
/// `georemind::notification` target.
#[derive(Debug, Default)]
pub struct LogNotificationSink {
    delivered: AtomicU64,
}

impl LogNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn notify(&self, request: NotificationRequest) -> Result<()> {
        let sequence = self.delivered.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            target: "georemind::notification",
            sequence,
            title = %request.title,
            body = %request.body,
            kind = request.data.kind.as_str(),
            reminder_id = request.data.reminder_id.as_deref().unwrap_or(""),
            category = request.data.category.as_deref().unwrap_or(""),
            "Notification delivered"
        );
        Ok(())
    }
}
