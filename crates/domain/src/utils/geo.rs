//! Great-circle distance on a spherical Earth.
//!
//! The spherical approximation is well inside GPS error at the sub-kilometer
//! radii used for geofencing.

use crate::constants::EARTH_RADIUS_M;
use crate::types::Coordinates;

/// Meters covered by one degree of latitude on the haversine sphere.
pub const METERS_PER_DEGREE_LATITUDE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Haversine distance between two points, in meters.
///
/// # Examples
///
/// ```
/// use georemind_domain::{haversine_distance_m, Coordinates};
///
/// let a = Coordinates::new(0.0, 0.0);
/// let b = Coordinates::new(0.1, 0.0);
/// let d = haversine_distance_m(a, b);
/// assert!((d - 11_119.5).abs() < 1.0);
/// ```
pub fn haversine_distance_m(from: Coordinates, to: Coordinates) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_phi = (to.latitude - from.latitude).to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Point `meters` due north of `origin` (negative moves south).
pub fn offset_north(origin: Coordinates, meters: f64) -> Coordinates {
    Coordinates::new(origin.latitude + meters / METERS_PER_DEGREE_LATITUDE, origin.longitude)
}
