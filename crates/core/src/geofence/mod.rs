//! Geofenced reminder notifications

pub mod ports;
pub mod service;
pub mod trigger_state;

pub use service::{GeofenceMonitor, TickReport};
