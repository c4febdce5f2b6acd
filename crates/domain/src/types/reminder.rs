//! Location-tagged reminders

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build coordinates only if both values are finite and within range.
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let coords = Self::new(latitude, longitude);
        coords.is_valid().then_some(coords)
    }

    /// Finite latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A reminder eligible for proximity alerts.
///
/// Reminders are fetched fresh on every monitoring tick and never mutated by
/// the monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoReminder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub location: Option<Coordinates>,
}

impl GeoReminder {
    /// Location to monitor, if the reminder is active and carries valid
    /// coordinates.
    pub fn monitored_location(&self) -> Option<Coordinates> {
        if !self.is_active {
            return None;
        }
        self.location.filter(Coordinates::is_valid)
    }

    pub fn is_eligible(&self) -> bool {
        self.monitored_location().is_some()
    }
}
