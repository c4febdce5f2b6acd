//! Conversions from external infrastructure errors into domain errors.

use georemind_domain::GeoRemindError;
use reqwest::{Error as HttpError, StatusCode};
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub GeoRemindError);

impl From<InfraError> for GeoRemindError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<GeoRemindError> for InfraError {
    fn from(value: GeoRemindError) -> Self {
        InfraError(value)
    }
}

trait IntoGeoRemindError {
    fn into_georemind(self) -> GeoRemindError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → GeoRemindError */
/* -------------------------------------------------------------------------- */

impl IntoGeoRemindError for HttpError {
    fn into_georemind(self) -> GeoRemindError {
        if self.is_timeout() {
            return GeoRemindError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return GeoRemindError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return GeoRemindError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            return status_error(status);
        }

        if self.is_decode() {
            return GeoRemindError::Network(format!("malformed HTTP response body: {self}"));
        }

        GeoRemindError::Network(self.to_string())
    }
}

/// Map a non-2xx status: client errors are the caller's fault, except
/// 408 and 429 which are transient like 5xx.
pub(crate) fn status_error(status: StatusCode) -> GeoRemindError {
    let code = status.as_u16();
    let message = format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

    match code {
        400..=499 if code != 408 && code != 429 => GeoRemindError::InvalidInput(message),
        _ => GeoRemindError::Network(message),
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_georemind())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → GeoRemindError */
/* -------------------------------------------------------------------------- */

impl IntoGeoRemindError for JsonError {
    fn into_georemind(self) -> GeoRemindError {
        GeoRemindError::InvalidInput(format!(
            "invalid JSON at line {} column {}: {}",
            self.line(),
            self.column(),
            self
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_georemind())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → GeoRemindError */
/* -------------------------------------------------------------------------- */

impl IntoGeoRemindError for std::io::Error {
    fn into_georemind(self) -> GeoRemindError {
        match self.kind() {
            std::io::ErrorKind::NotFound => GeoRemindError::Config(format!("file not found: {self}")),
            _ => GeoRemindError::Internal(format!("I/O error: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_georemind())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
