//! HTTP reminder source.
//!
//! Fetches `GET <endpoint>` on every tick and decodes the JSON array
//! record by record, so one malformed reminder does not cost the whole tick.

use std::time::Duration;

use async_trait::async_trait;
use georemind_core::ReminderSource;
use georemind_domain::{Coordinates, GeoRemindError, GeoReminder, ReminderSourceConfig, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Reminder source backed by the reminders REST endpoint.
pub struct HttpReminderSource {
    client: HttpClient,
    endpoint: Url,
}

impl HttpReminderSource {
    /// # Errors
    /// Returns `GeoRemindError::Config` when the endpoint is not a valid URL.
    pub fn new(client: HttpClient, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|err| {
            GeoRemindError::Config(format!("invalid reminders endpoint '{endpoint}': {err}"))
        })?;
        Ok(Self { client, endpoint })
    }

    /// Build the source and its HTTP client from configuration.
    pub fn from_config(config: &ReminderSourceConfig) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .max_attempts(config.max_attempts)
            .build()?;
        Self::new(client, &config.endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ReminderSource for HttpReminderSource {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_reminders(&self) -> Result<Vec<GeoReminder>> {
        let body = self.client.get_text(&self.endpoint).await.map_err(|err| match err {
            // Any non-2xx answer means "no data this tick".
            GeoRemindError::InvalidInput(msg) => GeoRemindError::Network(msg),
            other => other,
        })?;
        let records: Vec<Value> = serde_json::from_str(&body).map_err(|err| {
            let mapped: GeoRemindError = InfraError::from(err).into();
            GeoRemindError::Network(format!("unexpected reminders payload: {mapped}"))
        })?;

        let total = records.len();
        let reminders: Vec<GeoReminder> =
            records.into_iter().enumerate().filter_map(|(index, record)| decode(index, record)).collect();

        debug!(total, decoded = reminders.len(), "Fetched reminders");
        Ok(reminders)
    }
}

fn decode(index: usize, record: Value) -> Option<GeoReminder> {
    match serde_json::from_value::<ReminderRecord>(record) {
        Ok(record) => Some(record.into()),
        Err(err) => {
            warn!(index, error = %err, "Skipping malformed reminder record");
            None
        }
    }
}

/// Wire shape of a reminder. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReminderRecord {
    id: RecordId,
    title: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(default)]
    location: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Text(text) => text,
            RecordId::Number(number) => number.to_string(),
        }
    }
}

impl From<ReminderRecord> for GeoReminder {
    fn from(record: ReminderRecord) -> Self {
        let location = record.location.as_ref().and_then(parse_location);
        GeoReminder {
            id: record.id.into(),
            title: record.title,
            category: record.category.unwrap_or_default(),
            is_active: record.is_active.unwrap_or(false),
            location,
        }
    }
}

/// Coordinates must be JSON numbers and in range; anything else leaves the
/// reminder without a location.
fn parse_location(value: &Value) -> Option<Coordinates> {
    let latitude = value.get("latitude")?.as_f64()?;
    let longitude = value.get("longitude")?.as_f64()?;
    Coordinates::checked(latitude, longitude)
}
