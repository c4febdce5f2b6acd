//! Permission providers.

use async_trait::async_trait;
use georemind_core::PermissionProvider;
use georemind_domain::{Permission, PermissionConfig, PermissionStatus, Result};
use tracing::debug;

/// Reports the grants fixed by configuration.
///
/// Used where there is no OS prompt to drive, such as the command-line
/// runner. Requests cannot change the outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPermissionProvider {
    grants: PermissionConfig,
}

impl StaticPermissionProvider {
    pub fn new(grants: PermissionConfig) -> Self {
        Self { grants }
    }

    fn status(&self, permission: Permission) -> PermissionStatus {
        let granted = match permission {
            Permission::ForegroundLocation => self.grants.foreground_location,
            Permission::BackgroundLocation => self.grants.background_location,
            Permission::Notifications => self.grants.notifications,
        };
        if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

#[async_trait]
impl PermissionProvider for StaticPermissionProvider {
    async fn check(&self, permission: Permission) -> Result<PermissionStatus> {
        Ok(self.status(permission))
    }

    async fn request(&self, permission: Permission) -> Result<PermissionStatus> {
        let status = self.status(permission);
        debug!(%permission, ?status, "Permission request answered from configuration");
        Ok(status)
    }
}
