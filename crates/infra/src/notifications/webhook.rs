//! Webhook notification sink.

use async_trait::async_trait;
use georemind_core::NotificationSink;
use georemind_domain::{GeoRemindError, NotificationRequest, Result};
use tracing::{debug, instrument};
use url::Url;

use crate::http::HttpClient;

/// Posts each notification as JSON (`{title, body, data}`) to a URL.
pub struct WebhookNotificationSink {
    client: HttpClient,
    url: Url,
}

impl WebhookNotificationSink {
    /// # Errors
    /// Returns `GeoRemindError::Config` when `url` does not parse.
    pub fn new(client: HttpClient, url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| GeoRemindError::Config(format!("invalid webhook url '{url}': {err}")))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl NotificationSink for WebhookNotificationSink {
    #[instrument(skip(self, request), fields(url = %self.url, kind = request.data.kind.as_str()))]
    async fn notify(&self, request: NotificationRequest) -> Result<()> {
        let status = self
            .client
            .post_json(&self.url, &request)
            .await
            .map_err(|err| GeoRemindError::Notification(format!("webhook delivery failed: {err}")))?;

        debug!(%status, "Webhook accepted notification");
        Ok(())
    }
}
