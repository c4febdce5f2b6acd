//! Location samples and subscription options

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    FOREGROUND_SERVICE_BODY, FOREGROUND_SERVICE_TITLE, SAMPLE_MIN_DISPLACEMENT_M,
    SAMPLE_MIN_INTERVAL_SECS,
};
use crate::types::reminder::Coordinates;

/// A single position reading delivered by the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self { latitude, longitude, timestamp }
    }

    /// Sample taken now.
    pub fn now(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, Utc::now())
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Accuracy tier requested from the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationAccuracy {
    Low,
    /// Network/Wi-Fi assisted; trades precision for battery.
    #[default]
    Balanced,
    High,
}

/// Notification shown by platforms that require a foreground service while
/// sampling in the background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForegroundService {
    pub title: String,
    pub body: String,
}

impl Default for ForegroundService {
    fn default() -> Self {
        Self { title: FOREGROUND_SERVICE_TITLE.into(), body: FOREGROUND_SERVICE_BODY.into() }
    }
}

/// Options passed to the location provider when subscribing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    pub accuracy: LocationAccuracy,
    #[serde(with = "duration_secs")]
    pub min_interval: Duration,
    pub min_displacement_m: f64,
    pub foreground_service: ForegroundService,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            accuracy: LocationAccuracy::Balanced,
            min_interval: Duration::from_secs(SAMPLE_MIN_INTERVAL_SECS),
            min_displacement_m: SAMPLE_MIN_DISPLACEMENT_M,
            foreground_service: ForegroundService::default(),
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
