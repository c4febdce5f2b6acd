//! # GeoRemind Domain
//!
//! Business domain types for geofenced reminder notifications.
//!
//! This crate contains:
//! - Domain data types (GeoReminder, LocationSample, NotificationRequest)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Geofence constants and the haversine distance utility
//!
//! ## Architecture
//! - No dependencies on other GeoRemind crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::geo::haversine_distance_m;
