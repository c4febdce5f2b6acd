//! Permissions required for background geofencing

use std::fmt;

use serde::{Deserialize, Serialize};

/// A platform permission the monitor depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ForegroundLocation,
    BackgroundLocation,
    Notifications,
}

impl Permission {
    /// All permissions, in the order they should be requested.
    pub const ALL: [Permission; 3] =
        [Permission::ForegroundLocation, Permission::BackgroundLocation, Permission::Notifications];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Permission::ForegroundLocation => "foreground location",
            Permission::BackgroundLocation => "background location",
            Permission::Notifications => "notifications",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Status of every permission after a query or request round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionReport {
    pub foreground_location: PermissionStatus,
    pub background_location: PermissionStatus,
    pub notifications: PermissionStatus,
}

impl PermissionReport {
    pub fn denied() -> Self {
        Self {
            foreground_location: PermissionStatus::Denied,
            background_location: PermissionStatus::Denied,
            notifications: PermissionStatus::Denied,
        }
    }

    pub fn set(&mut self, permission: Permission, status: PermissionStatus) {
        match permission {
            Permission::ForegroundLocation => self.foreground_location = status,
            Permission::BackgroundLocation => self.background_location = status,
            Permission::Notifications => self.notifications = status,
        }
    }

    pub fn status(&self, permission: Permission) -> PermissionStatus {
        match permission {
            Permission::ForegroundLocation => self.foreground_location,
            Permission::BackgroundLocation => self.background_location,
            Permission::Notifications => self.notifications,
        }
    }

    pub fn all_granted(&self) -> bool {
        self.missing().is_empty()
    }

    /// Permissions that are not granted.
    pub fn missing(&self) -> Vec<Permission> {
        Permission::ALL.into_iter().filter(|p| !self.status(*p).is_granted()).collect()
    }
}
