//! Location provider error types

use georemind_domain::GeoRemindError;
use thiserror::Error;

use crate::errors::InfraError;

/// Provider-specific errors
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A subscription is already delivering samples
    #[error("Location subscription already active")]
    AlreadySubscribed,

    /// The position source was consumed or never attached
    #[error("No position source available")]
    SourceUnavailable,

    /// Operation timed out
    #[error("Operation timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// Sampling task join failed
    #[error("Sampling task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<ProviderError> for InfraError {
    fn from(err: ProviderError) -> Self {
        let mapped = match err {
            ProviderError::AlreadySubscribed | ProviderError::SourceUnavailable => {
                GeoRemindError::Registration(err.to_string())
            }
            ProviderError::Timeout { .. } | ProviderError::TaskJoinFailed(_) => {
                GeoRemindError::Internal(err.to_string())
            }
        };
        InfraError(mapped)
    }
}

impl From<ProviderError> for GeoRemindError {
    fn from(err: ProviderError) -> Self {
        InfraError::from(err).into()
    }
}
