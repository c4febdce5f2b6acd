//! Domain data types

pub mod location;
pub mod notification;
pub mod permission;
pub mod reminder;

pub use location::{ForegroundService, LocationAccuracy, LocationSample, SamplingOptions};
pub use notification::{NotificationKind, NotificationPayload, NotificationRequest};
pub use permission::{Permission, PermissionReport, PermissionStatus};
pub use reminder::{Coordinates, GeoReminder};
