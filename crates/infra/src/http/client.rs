//! Retrying HTTP transport shared by the reminder source and the webhook sink.
//!
//! Each call either yields a 2xx answer or a domain error. Timeouts,
//! connection failures, 408, 429 and 5xx answers are retried with
//! exponential backoff; every other status fails on the first attempt.

use std::time::Duration;

use georemind_domain::{GeoRemindError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::errors::conversions::status_error;
use crate::errors::InfraError;

const USER_AGENT: &str = concat!("georemind/", env!("CARGO_PKG_VERSION"));

/// Upper bound on the backoff doubling.
const MAX_BACKOFF_SHIFT: u32 = 6;

#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_attempts: usize,
    base_backoff: Duration,
}

impl RetryPolicy {
    /// Delay after the `attempt`-th failure (1-based).
    fn delay_after(&self, attempt: usize) -> Duration {
        let shift = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX).min(MAX_BACKOFF_SHIFT);
        self.base_backoff.saturating_mul(1 << shift)
    }
}

/// Why a single attempt did not produce a 2xx answer.
enum AttemptFailure {
    Status(StatusCode),
    Transport(reqwest::Error),
}

impl AttemptFailure {
    fn is_transient(&self) -> bool {
        match self {
            Self::Status(status) => {
                status.is_server_error()
                    || *status == StatusCode::REQUEST_TIMEOUT
                    || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Transport(err) => err.is_timeout() || err.is_connect(),
        }
    }

    fn into_error(self) -> GeoRemindError {
        match self {
            Self::Status(status) => status_error(status),
            Self::Transport(err) => InfraError::from(err).into(),
        }
    }
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(status) => write!(f, "status {status}"),
            Self::Transport(err) => write!(f, "{err}"),
        }
    }
}

/// Small JSON-over-HTTP client with retries.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// GET `url` and return the body of the 2xx answer.
    ///
    /// # Errors
    /// `InvalidInput` for non-transient 4xx answers, `Network` for everything
    /// that stayed unreachable or failing after the last attempt.
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        let response = self.execute(Method::GET, url, None).await?;
        response.text().await.map_err(|err| InfraError::from(err).into())
    }

    /// POST `body` as JSON and return the accepted status.
    ///
    /// # Errors
    /// Same classification as [`get_text`](Self::get_text); serialization
    /// failures are `InvalidInput`.
    pub async fn post_json<T>(&self, url: &Url, body: &T) -> Result<StatusCode>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body).map_err(|err| GeoRemindError::from(InfraError::from(err)))?;
        let response = self.execute(Method::POST, url, Some(payload)).await?;
        Ok(response.status())
    }

    async fn execute(&self, method: Method, url: &Url, body: Option<Vec<u8>>) -> Result<Response> {
        let mut attempt = 1;

        loop {
            let mut request = self.inner.request(method.clone(), url.clone());
            if let Some(payload) = &body {
                request = request.header(CONTENT_TYPE, "application/json").body(payload.clone());
            }

            let failure = match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(attempt, %method, %url, status = %response.status(), "HTTP request succeeded");
                    return Ok(response);
                }
                Ok(response) => AttemptFailure::Status(response.status()),
                Err(err) => AttemptFailure::Transport(err),
            };

            if !failure.is_transient() || attempt >= self.retry.max_attempts {
                warn!(attempt, %method, %url, error = %failure, "HTTP request failed");
                return Err(failure.into_error());
            }

            let delay = self.retry.delay_after(attempt);
            debug!(attempt, %method, %url, error = %failure, ?delay, "Retrying HTTP request");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryPolicy,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retry: RetryPolicy { max_attempts: 2, base_backoff: Duration::from_millis(250) },
        }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts including the first one.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry.base_backoff = backoff;
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(|err| GeoRemindError::from(InfraError::from(err)))?;

        Ok(HttpClient { inner, retry: self.retry })
    }
}
