//! Local notification requests

use serde::{Deserialize, Serialize};

use crate::constants::{NOTIFICATION_TYPE_LOCATION, NOTIFICATION_TYPE_TEST};
use crate::types::reminder::GeoReminder;

/// Kind of notification, carried as the payload `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Location,
    Test,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Location => NOTIFICATION_TYPE_LOCATION,
            NotificationKind::Test => NOTIFICATION_TYPE_TEST,
        }
    }
}

/// Opaque data attached to a notification for the app to route on tap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub reminder_id: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

/// An immediate local notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub data: NotificationPayload,
}

impl NotificationRequest {
    /// Proximity alert for a reminder the user has just arrived near.
    pub fn for_reminder(reminder: &GeoReminder, distance_m: f64) -> Self {
        Self {
            title: reminder.title.clone(),
            body: format!("You are {:.0} m away from this reminder", distance_m),
            data: NotificationPayload {
                reminder_id: Some(reminder.id.clone()),
                category: Some(reminder.category.clone()),
                kind: NotificationKind::Location,
            },
        }
    }

    /// Diagnostic notification that bypasses geofence logic.
    pub fn test() -> Self {
        Self {
            title: "Test notification".into(),
            body: "Location reminders can reach this device".into(),
            data: NotificationPayload { reminder_id: None, category: None, kind: NotificationKind::Test },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::reminder::Coordinates;

    #[test]
    fn reminder_notification_payload_shape() {
        let reminder = GeoReminder {
            id: "r-42".into(),
            title: "Return library book".into(),
            category: "errands".into(),
            is_active: true,
            location: Some(Coordinates::new(0.0, 0.0)),
        };

        let request = NotificationRequest::for_reminder(&reminder, 48.7);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["title"], "Return library book");
        assert_eq!(json["data"]["reminderId"], "r-42");
        assert_eq!(json["data"]["category"], "errands");
        assert_eq!(json["data"]["type"], "location");
        assert!(request.body.contains("49 m"));
    }

    #[test]
    fn test_notification_has_test_type() {
        let request = NotificationRequest::test();
        assert_eq!(request.data.kind.as_str(), "test");
        assert!(request.data.reminder_id.is_none());
    }
}
