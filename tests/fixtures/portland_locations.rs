//! Real Portland, OR locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use route_engine::{Coordinate, RouteRequest};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

pub const PIONEER_SQUARE: Location = Location::new("Pioneer Courthouse Square", 45.5189, -122.6793);
pub const UNION_STATION: Location = Location::new("Portland Union Station", 45.5290, -122.6769);
pub const POWELLS: Location = Location::new("Powell's City of Books", 45.5231, -122.6814);
pub const OMSI: Location = Location::new("OMSI", 45.5084, -122.6655);
pub const ROSE_GARDEN: Location = Location::new("International Rose Test Garden", 45.5191, -122.7046);
pub const MT_TABOR: Location = Location::new("Mt. Tabor Park", 45.5119, -122.5942);

/// Stops for a typical multi-stop afternoon, in visiting order.
pub const AFTERNOON_STOPS: &[Location] = &[POWELLS, ROSE_GARDEN, OMSI];

/// Pioneer Square to Mt. Tabor with no stops.
pub fn crosstown() -> RouteRequest {
    RouteRequest::new(PIONEER_SQUARE.coordinate(), MT_TABOR.coordinate())
}

/// Union Station to Mt. Tabor through [`AFTERNOON_STOPS`].
pub fn afternoon() -> RouteRequest {
    RouteRequest::new(UNION_STATION.coordinate(), MT_TABOR.coordinate())
        .with_waypoints(AFTERNOON_STOPS.iter().map(Location::coordinate).collect())
}
