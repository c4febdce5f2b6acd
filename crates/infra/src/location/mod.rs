//! Location sampling.
//!
//! [`StreamLocationProvider`] turns any [`PositionSource`] into the core's
//! `LocationProvider` port: it runs the source on a background task,
//! applies the interval/displacement filter and hands surviving samples to
//! the subscribed handler.

pub mod channel;
pub mod error;
pub mod provider;
pub mod source;
pub mod track_file;

pub use channel::ChannelPositionSource;
pub use error::ProviderError;
pub use provider::{StreamLocationProvider, StreamProviderConfig};
pub use source::PositionSource;
pub use track_file::TrackFileSource;
