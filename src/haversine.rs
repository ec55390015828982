//! Great-circle distance on a spherical Earth.
//!
//! Ignores roads entirely; used to size and price fallback paths.

use crate::types::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
///
/// `NaN` inputs propagate; validate coordinates first.
pub fn distance_meters(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Sum of segment distances along `points` in order.
pub fn path_length_meters(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_meters(pair[0], pair[1]))
        .sum()
}
