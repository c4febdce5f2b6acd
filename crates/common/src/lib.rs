//! Shared utilities for the GeoRemind crates.
//!
//! - [`time`]: clock abstraction so cooldown expiry can be driven by a mock
//!   clock in tests
//! - [`testing`]: assertion helpers and async polling macros (behind the
//!   `test-utils` feature)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod time;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use time::{Clock, MockClock, SystemClock};
