use async_trait::async_trait;
use georemind_domain::LocationSample;

/// A stream of raw position readings.
///
/// `None` means the source is exhausted; the provider stops polling it.
#[async_trait]
pub trait PositionSource: Send {
    async fn next_position(&mut self) -> Option<LocationSample>;
}
