//! # GeoRemind Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for reminders, notifications,
//!   permissions and location sampling
//! - The geofence monitor and its hysteresis state
//!
//! ## Architecture Principles
//! - Only depends on `georemind-common` and `georemind-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod geofence;

pub use geofence::ports::{
    LocationHandler, LocationProvider, LocationSubscription, NotificationSink, PermissionProvider,
    ReminderSource,
};
pub use geofence::trigger_state::{Transition, TriggerTracker};
pub use geofence::{GeofenceMonitor, TickReport};
