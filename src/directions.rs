//! HTTP adapter for the external directions service.
//!
//! One POST per computation carrying `[start, ...waypoints, end]` in
//! longitude-first order. The reply's first route is decoded and validated;
//! anything short of a usable path degrades to the fallback interpolator.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DirectionsError;
use crate::fallback::{FallbackInterpolator, FallbackOptions};
use crate::polyline;
use crate::traits::{DirectionsProvider, DirectionsTransport};
use crate::types::{ComputedRoute, Coordinate, Provenance, RouteRequest};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub profile: String,
    /// Sent verbatim in the `Authorization` header when set.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            profile: "driving-car".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl DirectionsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn directions_url(&self) -> String {
        format!(
            "{}/v2/directions/{}",
            self.base_url.trim_end_matches('/'),
            self.profile
        )
    }
}

/// Request body: geometry only, no turn instructions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsQuery {
    /// `[lon, lat]` pairs in travel order.
    pub coordinates: Vec<[f64; 2]>,
    pub instructions: bool,
    pub geometry: bool,
}

impl DirectionsQuery {
    pub fn for_request(request: &RouteRequest) -> Self {
        Self {
            coordinates: request
                .points()
                .into_iter()
                .map(Coordinate::to_lon_lat)
                .collect(),
            instructions: false,
            geometry: true,
        }
    }
}

/// Blocking reqwest transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &DirectionsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }
}

impl DirectionsTransport for HttpTransport {
    fn post_json(
        &self,
        url: &str,
        query: &DirectionsQuery,
        timeout: Duration,
    ) -> Result<String, DirectionsError> {
        let mut builder = self.client.post(url).timeout(timeout).json(query);
        if let Some(key) = &self.api_key {
            builder = builder.header(reqwest::header::AUTHORIZATION, key);
        }

        let body = builder
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())?;

        Ok(body)
    }
}

/// Route geometry as the service may return it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RouteGeometry {
    /// Encoded polyline string.
    Encoded(String),
    /// GeoJSON-style object with `[lon, lat(, elevation)]` positions.
    LineString { coordinates: Vec<Vec<f64>> },
    /// Bare array of `[lon, lat(, elevation)]` positions.
    Positions(Vec<Vec<f64>>),
}

impl RouteGeometry {
    pub fn into_points(self) -> Result<Vec<Coordinate>, DirectionsError> {
        match self {
            RouteGeometry::Encoded(encoded) => Ok(polyline::decode(&encoded)?),
            RouteGeometry::LineString { coordinates } | RouteGeometry::Positions(coordinates) => {
                coordinates
                    .into_iter()
                    .map(|position| match position.as_slice() {
                        [lon, lat, ..] => Ok(Coordinate::new(*lat, *lon)),
                        _ => Err(DirectionsError::MalformedGeometry(format!(
                            "position with {} component(s)",
                            position.len()
                        ))),
                    })
                    .collect()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<ServiceRoute>,
}

#[derive(Debug, Deserialize)]
struct ServiceRoute {
    #[serde(default)]
    summary: RouteSummary,
    geometry: Option<RouteGeometry>,
}

// Zero-length routes come back without distance/duration.
#[derive(Debug, Default, Deserialize)]
struct RouteSummary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

/// Parses a directions reply into a validated service route.
pub fn parse_directions(body: &str) -> Result<ComputedRoute, DirectionsError> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| DirectionsError::MalformedGeometry("no routes in response".into()))?;

    let geometry = route
        .geometry
        .ok_or_else(|| DirectionsError::MalformedGeometry("route has no geometry".into()))?;
    let path = geometry.into_points()?;

    if path.len() < 2 {
        return Err(DirectionsError::MalformedGeometry(format!(
            "geometry has {} point(s)",
            path.len()
        )));
    }
    if let Some(point) = path.iter().find(|point| !point.is_valid()) {
        return Err(DirectionsError::MalformedGeometry(format!(
            "geometry contains out-of-range point ({}, {})",
            point.latitude, point.longitude
        )));
    }

    let RouteSummary { distance, duration } = route.summary;
    if !(distance.is_finite() && distance >= 0.0 && duration.is_finite() && duration >= 0.0) {
        return Err(DirectionsError::MalformedGeometry(format!(
            "summary distance {} / duration {} out of range",
            distance, duration
        )));
    }

    Ok(ComputedRoute {
        path,
        distance_meters: distance,
        duration_seconds: duration,
        provenance: Provenance::Service,
    })
}

#[derive(Debug, Clone)]
pub struct DirectionsClient<T = HttpTransport> {
    config: DirectionsConfig,
    transport: T,
    fallback: FallbackInterpolator,
}

impl DirectionsClient<HttpTransport> {
    pub fn new(config: DirectionsConfig) -> Result<Self, reqwest::Error> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: DirectionsTransport> DirectionsClient<T> {
    pub fn with_transport(config: DirectionsConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            fallback: FallbackInterpolator::default(),
        }
    }

    pub fn with_fallback(mut self, options: FallbackOptions) -> Self {
        self.fallback = FallbackInterpolator::new(options);
        self
    }

    pub fn config(&self) -> &DirectionsConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Asks the service for a route, reporting why it could not be used.
    ///
    /// Invalid coordinates fail before any request is made.
    pub fn try_fetch(
        &self,
        request: &RouteRequest,
        timeout: Duration,
    ) -> Result<ComputedRoute, DirectionsError> {
        if let Some(point) = request.first_invalid() {
            return Err(DirectionsError::InvalidCoordinate {
                latitude: point.latitude,
                longitude: point.longitude,
            });
        }

        let query = DirectionsQuery::for_request(request);
        let body = self
            .transport
            .post_json(&self.config.directions_url(), &query, timeout)?;

        parse_directions(&body)
    }

    /// Always returns a drawable route; service failures fall back.
    pub fn fetch_route_with_timeout(&self, request: &RouteRequest, timeout: Duration) -> ComputedRoute {
        match self.try_fetch(request, timeout) {
            Ok(route) => {
                debug!(
                    points = route.path.len(),
                    distance_meters = route.distance_meters,
                    "directions service returned a route"
                );
                route
            }
            Err(err) => {
                warn!(
                    kind = ?err.kind(),
                    error = %err,
                    "directions unavailable, using fallback route"
                );
                self.fallback.interpolate(&request.points())
            }
        }
    }
}

impl<T: DirectionsTransport> DirectionsProvider for DirectionsClient<T> {
    fn fetch_route(&self, request: &RouteRequest) -> ComputedRoute {
        self.fetch_route_with_timeout(request, self.config.timeout())
    }
}
