use async_trait::async_trait;
use georemind_domain::LocationSample;
use tokio::sync::mpsc;

use super::source::PositionSource;

/// Position source fed through an mpsc channel.
///
/// Lets a platform bridge (or a test) push readings as they arrive.
#[derive(Debug)]
pub struct ChannelPositionSource {
    receiver: mpsc::Receiver<LocationSample>,
}

impl ChannelPositionSource {
    /// Create a source and the sender that feeds it.
    pub fn channel(capacity: usize) -> (mpsc::Sender<LocationSample>, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (sender, Self { receiver })
    }
}

#[async_trait]
impl PositionSource for ChannelPositionSource {
    async fn next_position(&mut self) -> Option<LocationSample> {
        self.receiver.recv().await
    }
}
