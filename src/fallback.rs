//! Locally synthesized routes for when the directions service is unavailable.
//!
//! The path is a gently curved interpolation between the requested points.
//! Distance comes from great-circle segments between the unperturbed points
//! and duration from an assumed average speed. Less accurate than a real
//! route (ignores roads) but always available.

use std::f64::consts::PI;

use crate::haversine::distance_meters;
use crate::traits::DirectionsProvider;
use crate::types::{ComputedRoute, Coordinate, Provenance, RouteRequest};

/// Tuning for the fallback path shape and its time estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackOptions {
    /// Peak of the cosmetic bow added to each segment, in degrees.
    pub curve_amplitude_deg: f64,
    /// Roughly one generated point per this many meters.
    pub meters_per_step: f64,
    /// Minimum points generated per segment.
    pub min_steps: usize,
    /// Assumed average speed in km/h.
    pub speed_kmh: f64,
}

impl Default for FallbackOptions {
    fn default() -> Self {
        Self {
            curve_amplitude_deg: 0.001,
            meters_per_step: 100.0,
            min_steps: 10,
            speed_kmh: 60.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FallbackInterpolator {
    options: FallbackOptions,
}

impl FallbackInterpolator {
    pub fn new(options: FallbackOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FallbackOptions {
        &self.options
    }

    /// Builds a route visiting `points` in order.
    ///
    /// `points` is `[start, ...waypoints, end]`. Out-of-range coordinates are
    /// pulled into range first so the output is always drawable. A single
    /// point yields a two-point path on that spot.
    pub fn interpolate(&self, points: &[Coordinate]) -> ComputedRoute {
        let points: Vec<Coordinate> = points.iter().map(|point| point.sanitized()).collect();
        let mut distance = 0.0;

        let path = match points.as_slice() {
            [] => Vec::new(),
            [only] => vec![*only, *only],
            [first, ..] => {
                let mut path = vec![*first];
                for pair in points.windows(2) {
                    let (from, to) = (pair[0], pair[1]);
                    let segment = distance_meters(from, to);
                    distance += segment;
                    self.push_segment(&mut path, from, to, self.steps_for(segment));
                }
                path
            }
        };

        ComputedRoute {
            path,
            distance_meters: distance,
            duration_seconds: self.duration_for(distance),
            provenance: Provenance::Fallback,
        }
    }

    /// Points generated for a segment of `segment_meters`.
    pub fn steps_for(&self, segment_meters: f64) -> usize {
        let per_distance = (segment_meters / self.options.meters_per_step).floor();
        let per_distance = if per_distance.is_finite() && per_distance > 0.0 {
            per_distance as usize
        } else {
            0
        };
        per_distance.max(self.options.min_steps).max(1)
    }

    /// Estimated travel time for `distance_meters` at the assumed speed.
    pub fn duration_for(&self, distance_meters: f64) -> f64 {
        (distance_meters / 1000.0) * (3600.0 / self.options.speed_kmh)
    }

    // Appends `steps` points after `from`, the last one exactly `to`.
    fn push_segment(&self, path: &mut Vec<Coordinate>, from: Coordinate, to: Coordinate, steps: usize) {
        let bend = if from == to {
            0.0
        } else {
            self.options.curve_amplitude_deg
        };

        for step in 1..steps {
            let ratio = step as f64 / steps as f64;
            let offset = (ratio * PI).sin() * bend;
            let point = Coordinate::new(
                from.latitude + (to.latitude - from.latitude) * ratio + offset,
                from.longitude + (to.longitude - from.longitude) * ratio + offset,
            );
            path.push(point.sanitized());
        }
        path.push(to);
    }
}

/// Builds a fallback route with default options.
pub fn interpolate(points: &[Coordinate]) -> ComputedRoute {
    FallbackInterpolator::default().interpolate(points)
}

/// Offline provider that always synthesizes the route locally.
#[derive(Debug, Clone, Default)]
pub struct FallbackDirections {
    interpolator: FallbackInterpolator,
}

impl FallbackDirections {
    pub fn new(options: FallbackOptions) -> Self {
        Self {
            interpolator: FallbackInterpolator::new(options),
        }
    }
}

impl DirectionsProvider for FallbackDirections {
    fn fetch_route(&self, request: &RouteRequest) -> ComputedRoute {
        self.interpolator.interpolate(&request.points())
    }
}
