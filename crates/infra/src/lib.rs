//! # GeoRemind Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP client and the HTTP reminder source
//! - Notification sinks (structured log, webhook)
//! - Static permission provider
//! - Stream-driven location provider with track-file replay
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `georemind-core`
//! - Contains all "impure" code (I/O, timers, network)

pub mod config;
pub mod errors;
pub mod http;
pub mod location;
pub mod notifications;
pub mod permissions;
pub mod reminders;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use location::{
    ChannelPositionSource, PositionSource, ProviderError, StreamLocationProvider, TrackFileSource,
};
pub use notifications::{build_notification_sink, LogNotificationSink, WebhookNotificationSink};
pub use permissions::StaticPermissionProvider;
pub use reminders::HttpReminderSource;
