//! Time abstractions
//!
//! Geofence cooldowns are stored as monotonic deadlines and compared against
//! [`Clock::now`], so production code uses [`SystemClock`] while tests
//! advance a [`MockClock`] instead of sleeping.

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
