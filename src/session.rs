//! Route session: the stateful layer between a map view and the directions
//! provider.
//!
//! A session remembers the identity of the last request so repeated
//! submissions of the same locations cost nothing, keeps a busy flag for
//! progress UI, and owns the currently displayed route and its bounds.
//!
//! Work can be driven synchronously with [`RouteSession::submit`], or split
//! with [`RouteSession::begin`] / [`RouteSession::complete`] when the fetch
//! runs elsewhere. In the split form a result is committed only if its
//! ticket still matches the newest request, so a slow earlier reply can never
//! overwrite a newer route.

use tracing::debug;

use crate::bounds::{BoundingRegion, CameraFraming, bounds};
use crate::traits::{DirectionsProvider, RouteEvent, RouteObserver};
use crate::types::{ComputedRoute, Coordinate, Provenance, RouteIdentity, RouteRequest};

/// Transient per-view state. Lives as long as the session.
#[derive(Debug, Clone, Default)]
pub struct EngineSession {
    last_identity: Option<RouteIdentity>,
    pending_identity: Option<RouteIdentity>,
    calculating: bool,
    current_route: Option<ComputedRoute>,
    bounds: Option<BoundingRegion>,
}

impl EngineSession {
    /// Identity of the route currently committed.
    pub fn last_identity(&self) -> Option<&RouteIdentity> {
        self.last_identity.as_ref()
    }

    /// Identity of the newest request still awaiting its route.
    pub fn pending_identity(&self) -> Option<&RouteIdentity> {
        self.pending_identity.as_ref()
    }

    pub fn calculating(&self) -> bool {
        self.calculating
    }

    pub fn current_route(&self) -> Option<&ComputedRoute> {
        self.current_route.as_ref()
    }

    pub fn bounds(&self) -> Option<&BoundingRegion> {
        self.bounds.as_ref()
    }

    // The newest identity the caller asked for.
    fn target_identity(&self) -> Option<&RouteIdentity> {
        self.pending_identity.as_ref().or(self.last_identity.as_ref())
    }
}

/// A route computation handed out by [`RouteSession::begin`].
#[derive(Debug, Clone)]
pub struct RouteTicket {
    identity: RouteIdentity,
    request: RouteRequest,
}

impl RouteTicket {
    pub fn identity(&self) -> &RouteIdentity {
        &self.identity
    }

    pub fn request(&self) -> &RouteRequest {
        &self.request
    }
}

/// What a submission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Same identity as the current request; nothing happened.
    Unchanged,
    /// A route was computed and committed.
    Computed(Provenance),
    /// Start or end was missing; the session was reset.
    Cleared,
}

pub struct RouteSession<D> {
    directions: D,
    state: EngineSession,
    observer: Option<Box<dyn RouteObserver + Send>>,
}

impl<D> RouteSession<D> {
    pub fn new(directions: D) -> Self {
        Self {
            directions,
            state: EngineSession::default(),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl RouteObserver + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn directions(&self) -> &D {
        &self.directions
    }

    pub fn state(&self) -> &EngineSession {
        &self.state
    }

    pub fn calculating(&self) -> bool {
        self.state.calculating
    }

    pub fn current_route(&self) -> Option<&ComputedRoute> {
        self.state.current_route.as_ref()
    }

    pub fn bounds(&self) -> Option<&BoundingRegion> {
        self.state.bounds.as_ref()
    }

    pub fn framing(&self) -> Option<CameraFraming> {
        self.state.bounds.map(|region| region.framing())
    }

    /// Starts work for `request` unless its identity matches the newest one
    /// already requested.
    ///
    /// On a change the previous route is dropped (observers see
    /// [`RouteEvent::Cleared`]) and the session turns busy.
    pub fn begin(&mut self, request: &RouteRequest) -> Option<RouteTicket> {
        let identity = request.identity();
        if self.state.target_identity() == Some(&identity) {
            debug!(
                waypoints = identity.waypoint_count(),
                "route request unchanged, skipping"
            );
            return None;
        }

        self.clear_route();
        self.state.pending_identity = Some(identity.clone());
        self.set_calculating(true);

        Some(RouteTicket {
            identity,
            request: request.clone(),
        })
    }

    /// Commits `route` for `ticket`. Returns false, leaving the session
    /// untouched, when a newer request or a reset superseded the ticket.
    pub fn complete(&mut self, ticket: RouteTicket, route: ComputedRoute) -> bool {
        if self.state.pending_identity.as_ref() != Some(&ticket.identity) {
            debug!(
                provenance = ?route.provenance,
                "discarding route for superseded request"
            );
            return false;
        }

        self.state.pending_identity = None;
        self.state.bounds = bounds(&route.path);
        self.state.current_route = Some(route);
        self.set_calculating(false);
        self.state.last_identity = Some(ticket.identity);

        if let (Some(observer), Some(route)) =
            (self.observer.as_mut(), self.state.current_route.as_ref())
        {
            observer.on_event(RouteEvent::Ready {
                route,
                bounds: self.state.bounds.as_ref(),
            });
        }

        true
    }

    /// Forgets everything: route, identities and busy flag. In-flight
    /// tickets become stale.
    pub fn reset(&mut self) {
        self.clear_route();
        self.state.last_identity = None;
        self.state.pending_identity = None;
        self.set_calculating(false);
    }

    fn clear_route(&mut self) {
        self.state.bounds = None;
        if self.state.current_route.take().is_some() {
            self.notify(RouteEvent::Cleared);
        }
    }

    fn set_calculating(&mut self, calculating: bool) {
        if self.state.calculating != calculating {
            self.state.calculating = calculating;
            self.notify(RouteEvent::Calculating(calculating));
        }
    }

    fn notify(&mut self, event: RouteEvent<'_>) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(event);
        }
    }
}

impl<D: DirectionsProvider> RouteSession<D> {
    /// Computes and commits a route for `request` unless nothing changed.
    pub fn submit(&mut self, request: &RouteRequest) -> Submission {
        let Some(ticket) = self.begin(request) else {
            return Submission::Unchanged;
        };

        let route = self.directions.fetch_route(ticket.request());
        let provenance = route.provenance;
        self.complete(ticket, route);

        Submission::Computed(provenance)
    }

    /// Submits when both ends are set, otherwise resets the session.
    pub fn update(
        &mut self,
        start: Option<Coordinate>,
        end: Option<Coordinate>,
        waypoints: Vec<Coordinate>,
    ) -> Submission {
        match RouteRequest::from_parts(start, end, waypoints) {
            Some(request) => self.submit(&request),
            None => {
                self.reset();
                Submission::Cleared
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::fallback::interpolate;

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl DirectionsProvider for CountingProvider {
        fn fetch_route(&self, request: &RouteRequest) -> ComputedRoute {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ComputedRoute {
                path: request.points(),
                distance_meters: 1_000.0,
                duration_seconds: 60.0,
                provenance: Provenance::Service,
            }
        }
    }

    fn request(end_lat: f64) -> RouteRequest {
        RouteRequest::new(Coordinate::new(36.1, -115.1), Coordinate::new(end_lat, -115.2))
    }

    fn calls(session: &RouteSession<CountingProvider>) -> usize {
        session.directions().calls.load(Ordering::SeqCst)
    }

    #[test]
    fn test_identical_submissions_fetch_once() {
        let mut session = RouteSession::new(CountingProvider::default());
        assert_eq!(
            session.submit(&request(36.2)),
            Submission::Computed(Provenance::Service)
        );
        assert_eq!(session.submit(&request(36.2)), Submission::Unchanged);
        assert_eq!(calls(&session), 1);
        assert!(!session.calculating());
    }

    #[test]
    fn test_changed_request_recomputes() {
        let mut session = RouteSession::new(CountingProvider::default());
        session.submit(&request(36.2));
        session.submit(&request(36.3));
        assert_eq!(calls(&session), 2);
        assert_eq!(session.current_route().unwrap().path.last().unwrap().latitude, 36.3);
    }

    #[test]
    fn test_bounds_follow_route() {
        let mut session = RouteSession::new(CountingProvider::default());
        session.submit(&request(36.2));
        let region = session.bounds().unwrap();
        assert_eq!(region.min, Coordinate::new(36.1, -115.2));
        assert_eq!(region.max, Coordinate::new(36.2, -115.1));
        assert!(matches!(session.framing(), Some(CameraFraming::Fit(_))));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = RouteSession::new(CountingProvider::default());
        session.submit(&request(36.2));
        session.reset();
        assert!(session.current_route().is_none());
        assert!(session.bounds().is_none());
        assert!(session.state().last_identity().is_none());
        assert!(!session.calculating());

        // Same request after a reset is new work again.
        session.submit(&request(36.2));
        assert_eq!(calls(&session), 2);
    }

    #[test]
    fn test_update_without_end_resets() {
        let mut session = RouteSession::new(CountingProvider::default());
        let start = Some(Coordinate::new(36.1, -115.1));
        let end = Some(Coordinate::new(36.2, -115.2));

        assert_eq!(
            session.update(start, end, Vec::new()),
            Submission::Computed(Provenance::Service)
        );
        assert_eq!(session.update(start, None, Vec::new()), Submission::Cleared);
        assert!(session.current_route().is_none());
        assert_eq!(calls(&session), 1);
    }

    #[test]
    fn test_begin_marks_calculating_until_complete() {
        let mut session = RouteSession::new(CountingProvider::default());
        let ticket = session.begin(&request(36.2)).unwrap();
        assert!(session.calculating());
        assert_eq!(session.state().pending_identity(), Some(ticket.identity()));

        // Still in flight: the same request is not started twice.
        assert!(session.begin(&request(36.2)).is_none());

        let route = interpolate(&ticket.request().points());
        assert!(session.complete(ticket, route));
        assert!(!session.calculating());
        assert_eq!(
            session.current_route().unwrap().provenance,
            Provenance::Fallback
        );
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut session = RouteSession::new(CountingProvider::default());
        let older = session.begin(&request(36.2)).unwrap();
        let newer = session.begin(&request(36.3)).unwrap();

        let newer_route = interpolate(&newer.request().points());
        assert!(session.complete(newer, newer_route.clone()));

        let older_route = interpolate(&older.request().points());
        assert!(!session.complete(older, older_route));
        assert_eq!(session.current_route(), Some(&newer_route));
    }

    #[test]
    fn test_stale_completion_keeps_session_busy() {
        let mut session = RouteSession::new(CountingProvider::default());
        let older = session.begin(&request(36.2)).unwrap();
        let _newer = session.begin(&request(36.3)).unwrap();

        let route = interpolate(&older.request().points());
        assert!(!session.complete(older, route));
        assert!(session.calculating());
        assert!(session.current_route().is_none());
    }

    #[test]
    fn test_returning_to_committed_request_while_another_is_pending() {
        let mut session = RouteSession::new(CountingProvider::default());
        session.submit(&request(36.2));
        let _detour = session.begin(&request(36.3)).unwrap();

        // The newest request differs from the committed one, so going back
        // must start fresh work instead of being swallowed.
        assert!(session.begin(&request(36.2)).is_some());
    }

    #[test]
    fn test_ticket_after_reset_is_stale() {
        let mut session = RouteSession::new(CountingProvider::default());
        let ticket = session.begin(&request(36.2)).unwrap();
        session.reset();
        let route = interpolate(&ticket.request().points());
        assert!(!session.complete(ticket, route));
        assert!(session.current_route().is_none());
    }

    #[test]
    fn test_observer_sees_lifecycle() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut session = RouteSession::new(CountingProvider::default()).with_observer(
            move |event: RouteEvent<'_>| {
                let label = match event {
                    RouteEvent::Calculating(true) => "busy".to_string(),
                    RouteEvent::Calculating(false) => "idle".to_string(),
                    RouteEvent::Cleared => "cleared".to_string(),
                    RouteEvent::Ready { route, bounds } => {
                        format!("ready:{}:{}", route.path.len(), bounds.is_some())
                    }
                };
                sink.lock().unwrap().push(label);
            },
        );

        session.submit(&request(36.2));
        session.submit(&request(36.2));
        session.submit(&request(36.3));
        session.reset();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "busy", "idle", "ready:2:true", "cleared", "busy", "idle", "ready:2:true",
                "cleared",
            ]
        );
    }
}
