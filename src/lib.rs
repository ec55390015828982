//! route-engine: turns a start, an end and ordered waypoints into a drawable
//! route with distance and duration estimates.
//!
//! Routes come from an external directions service when it is reachable and
//! returns usable geometry, and are synthesized locally otherwise. Callers
//! always get a route; [`types::Provenance`] tells them which kind.

pub mod bounds;
pub mod directions;
pub mod error;
pub mod fallback;
pub mod haversine;
pub mod polyline;
pub mod session;
pub mod traits;
pub mod types;

pub use bounds::{BoundingRegion, CameraFraming};
pub use directions::{DirectionsClient, DirectionsConfig};
pub use session::{RouteSession, Submission};
pub use types::{ComputedRoute, Coordinate, Provenance, RouteRequest};
