//! Plain value types shared by every stage of route computation.

use serde::{Deserialize, Serialize};

/// Decimal places kept when fingerprinting a request.
const IDENTITY_SCALE: f64 = 1e6;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate from a `[lon, lat]` pair as used on the wire.
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    /// Returns `[lon, lat]`, the axis order the directions service expects.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// True when both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Forces the coordinate into range. Non-finite components become 0.
    pub fn sanitized(self) -> Self {
        fn clamp(value: f64, limit: f64) -> f64 {
            if value.is_finite() {
                value.clamp(-limit, limit)
            } else {
                0.0
            }
        }

        Self::new(clamp(self.latitude, 90.0), clamp(self.longitude, 180.0))
    }

    pub fn approx_eq(&self, other: &Coordinate, tolerance: f64) -> bool {
        (self.latitude - other.latitude).abs() <= tolerance
            && (self.longitude - other.longitude).abs() <= tolerance
    }
}

/// A start, an end and the ordered stops in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: Coordinate,
    pub end: Coordinate,
    #[serde(default)]
    pub waypoints: Vec<Coordinate>,
}

impl RouteRequest {
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            start,
            end,
            waypoints: Vec::new(),
        }
    }

    pub fn with_waypoints(mut self, waypoints: Vec<Coordinate>) -> Self {
        self.waypoints = waypoints;
        self
    }

    /// Returns `None` unless both start and end are set.
    pub fn from_parts(
        start: Option<Coordinate>,
        end: Option<Coordinate>,
        waypoints: Vec<Coordinate>,
    ) -> Option<Self> {
        Some(Self::new(start?, end?).with_waypoints(waypoints))
    }

    /// All points in travel order: start, waypoints, end.
    pub fn points(&self) -> Vec<Coordinate> {
        let mut points = Vec::with_capacity(self.waypoints.len() + 2);
        points.push(self.start);
        points.extend_from_slice(&self.waypoints);
        points.push(self.end);
        points
    }

    /// First coordinate that fails range validation, if any.
    pub fn first_invalid(&self) -> Option<Coordinate> {
        self.points().into_iter().find(|point| !point.is_valid())
    }

    pub fn identity(&self) -> RouteIdentity {
        RouteIdentity::of(self)
    }
}

/// Where a computed route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Returned by the external directions service.
    Service,
    /// Synthesized locally; approximate, render it distinctly.
    Fallback,
}

impl Provenance {
    pub fn is_fallback(self) -> bool {
        matches!(self, Provenance::Fallback)
    }
}

/// A renderable path with distance and duration estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedRoute {
    pub path: Vec<Coordinate>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub provenance: Provenance,
}

/// Rounded fingerprint of a [`RouteRequest`] used for change detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteIdentity {
    points: Vec<(i64, i64)>,
    waypoint_count: usize,
}

impl RouteIdentity {
    pub fn of(request: &RouteRequest) -> Self {
        let points = request
            .points()
            .into_iter()
            .map(|point| (fixed(point.latitude), fixed(point.longitude)))
            .collect();

        Self {
            points,
            waypoint_count: request.waypoints.len(),
        }
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoint_count
    }
}

fn fixed(value: f64) -> i64 {
    if value.is_nan() {
        i64::MIN
    } else {
        (value * IDENTITY_SCALE).round() as i64
    }
}
