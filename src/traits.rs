//! Seams between the route session, the directions source and the UI layer.
//!
//! Concrete apps plug their own implementations in here: a fake transport in
//! tests, a closure that redraws the map, an offline provider.

use std::sync::Arc;
use std::time::Duration;

use crate::bounds::BoundingRegion;
use crate::directions::DirectionsQuery;
use crate::error::DirectionsError;
use crate::types::{ComputedRoute, RouteRequest};

/// Produces a route for a request. Implementations are total: failures are
/// expressed through [`crate::types::Provenance::Fallback`], never as errors.
pub trait DirectionsProvider {
    fn fetch_route(&self, request: &RouteRequest) -> ComputedRoute;
}

impl<P: DirectionsProvider + ?Sized> DirectionsProvider for Arc<P> {
    fn fetch_route(&self, request: &RouteRequest) -> ComputedRoute {
        (**self).fetch_route(request)
    }
}

/// Carries one JSON request to the directions service and returns the raw
/// response body of a successful (2xx) reply.
pub trait DirectionsTransport {
    fn post_json(
        &self,
        url: &str,
        query: &DirectionsQuery,
        timeout: Duration,
    ) -> Result<String, DirectionsError>;
}

/// Notification emitted by a route session.
#[derive(Debug, Clone, Copy)]
pub enum RouteEvent<'a> {
    /// The busy flag flipped.
    Calculating(bool),
    /// The previously displayed route is gone and should be removed.
    Cleared,
    /// A new route is available.
    Ready {
        route: &'a ComputedRoute,
        bounds: Option<&'a BoundingRegion>,
    },
}

/// Receives session notifications, typically to redraw a map.
pub trait RouteObserver {
    fn on_event(&mut self, event: RouteEvent<'_>);
}

impl<F> RouteObserver for F
where
    F: FnMut(RouteEvent<'_>),
{
    fn on_event(&mut self, event: RouteEvent<'_>) {
        self(event)
    }
}
