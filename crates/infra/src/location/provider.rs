//! Stream-driven location provider.
//!
//! Follows the scheduler lifecycle rules: the sampling task's join handle is
//! tracked, cancellation is explicit through a `CancellationToken`, and
//! waiting for the task is bounded by a timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use georemind_core::{LocationHandler, LocationProvider, LocationSubscription};
use georemind_domain::{haversine_distance_m, LocationSample, Result, SamplingOptions};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

use super::error::ProviderError;
use super::source::PositionSource;

type SourceSlot = Arc<Mutex<Option<Box<dyn PositionSource>>>>;

/// Configuration for the stream provider.
#[derive(Debug, Clone)]
pub struct StreamProviderConfig {
    /// Timeout for awaiting the sampling task after cancellation.
    pub join_timeout: Duration,
}

impl Default for StreamProviderConfig {
    fn default() -> Self {
        Self { join_timeout: Duration::from_secs(5) }
    }
}

/// `LocationProvider` that pulls samples from a [`PositionSource`].
///
/// Only one subscription runs at a time. Cancelling it hands the source
/// back so a later `subscribe` can resume from where it stopped.
pub struct StreamLocationProvider {
    source: SourceSlot,
    active: Arc<AtomicBool>,
    exhausted: CancellationToken,
    config: StreamProviderConfig,
}

impl StreamLocationProvider {
    pub fn new(source: impl PositionSource + 'static) -> Self {
        Self::with_config(source, StreamProviderConfig::default())
    }

    pub fn with_config(source: impl PositionSource + 'static, config: StreamProviderConfig) -> Self {
        Self {
            source: Arc::new(Mutex::new(Some(Box::new(source)))),
            active: Arc::new(AtomicBool::new(false)),
            exhausted: CancellationToken::new(),
            config,
        }
    }

    /// True while a subscription's sampling task is alive.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Resolves once the source has reported its end.
    pub async fn source_exhausted(&self) {
        self.exhausted.cancelled().await;
    }

    async fn run(
        source: &mut dyn PositionSource,
        options: SamplingOptions,
        handler: Arc<dyn LocationHandler>,
        cancel: CancellationToken,
        exhausted: CancellationToken,
    ) {
        let mut filter = SampleFilter::new(&options);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Sampling task cancelled");
                    break;
                }
                next = source.next_position() => next,
            };

            let Some(sample) = next else {
                info!(delivered = filter.delivered, dropped = filter.dropped, "Position source exhausted");
                exhausted.cancel();
                break;
            };

            if !sample.coordinates().is_valid() {
                warn!(
                    latitude = sample.latitude,
                    longitude = sample.longitude,
                    "Dropping position with invalid coordinates"
                );
                continue;
            }

            if filter.admit(&sample) {
                handler.on_location(sample).await;
            }
        }
    }
}

#[async_trait]
impl LocationProvider for StreamLocationProvider {
    #[instrument(skip(self, handler))]
    async fn subscribe(
        &self,
        options: SamplingOptions,
        handler: Arc<dyn LocationHandler>,
    ) -> Result<Box<dyn LocationSubscription>> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(ProviderError::AlreadySubscribed.into());
        }

        let Some(source) = self.source.lock().take() else {
            self.active.store(false, Ordering::SeqCst);
            return Err(ProviderError::SourceUnavailable.into());
        };

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let exhausted = self.exhausted.clone();
        let slot = Arc::clone(&self.source);
        let active = Arc::clone(&self.active);

        let handle = tokio::spawn(async move {
            let mut lease = SourceLease { slot, active, source: Some(source) };
            if let Some(source) = lease.source.as_deref_mut() {
                Self::run(source, options, handler, task_cancel, exhausted).await;
            }
        });

        debug!("Sampling task spawned");
        Ok(Box::new(StreamSubscription {
            handle: Some(handle),
            cancel,
            join_timeout: self.config.join_timeout,
        }))
    }
}

/// Owns the source while a sampling task runs.
///
/// Dropping the lease returns the source to the provider and clears the
/// active flag, including when the task is aborted mid-delivery.
struct SourceLease {
    slot: SourceSlot,
    active: Arc<AtomicBool>,
    source: Option<Box<dyn PositionSource>>,
}

impl Drop for SourceLease {
    fn drop(&mut self) {
        if let Some(source) = self.source.take() {
            *self.slot.lock() = Some(source);
        }
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Handle for a running sampling task.
struct StreamSubscription {
    handle: Option<JoinHandle<()>>,
    cancel: CancellationToken,
    join_timeout: Duration,
}

#[async_trait]
impl LocationSubscription for StreamSubscription {
    async fn cancel(&mut self) -> Result<()> {
        self.cancel.cancel();

        let Some(mut handle) = self.handle.take() else {
            return Ok(());
        };

        match tokio::time::timeout(self.join_timeout, &mut handle).await {
            Ok(Ok(())) => {
                debug!("Sampling task stopped");
                Ok(())
            }
            Ok(Err(err)) => Err(ProviderError::TaskJoinFailed(err.to_string()).into()),
            Err(_) => {
                warn!(join_timeout = ?self.join_timeout, "Sampling task did not stop in time; aborting");
                handle.abort();
                // Resolves once the aborted task is dropped and its lease returned
                let _ = handle.await;
                Err(ProviderError::Timeout { millis: duration_millis(self.join_timeout) }.into())
            }
        }
    }
}

impl Drop for StreamSubscription {
    fn drop(&mut self) {
        if self.handle.is_some() {
            warn!("Location subscription dropped without cancel; stopping sampling task");
            self.cancel.cancel();
        }
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Interval/displacement gate.
///
/// A sample passes once `min_interval` has elapsed since the last delivered
/// sample, or earlier if it moved at least `min_displacement_m` from it.
struct SampleFilter {
    min_interval: Duration,
    min_displacement_m: f64,
    last: Option<LocationSample>,
    delivered: u64,
    dropped: u64,
}

impl SampleFilter {
    fn new(options: &SamplingOptions) -> Self {
        Self {
            min_interval: options.min_interval,
            min_displacement_m: options.min_displacement_m,
            last: None,
            delivered: 0,
            dropped: 0,
        }
    }

    fn admit(&mut self, sample: &LocationSample) -> bool {
        let admitted = match &self.last {
            None => true,
            Some(last) => {
                let elapsed =
                    (sample.timestamp - last.timestamp).to_std().unwrap_or(Duration::ZERO);
                let moved_m = haversine_distance_m(last.coordinates(), sample.coordinates());
                elapsed >= self.min_interval || moved_m >= self.min_displacement_m
            }
        };

        if admitted {
            self.last = Some(*sample);
            self.delivered += 1;
        } else {
            self.dropped += 1;
            trace!("Sample filtered by interval/displacement");
        }
        admitted
    }
}
