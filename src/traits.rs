//! Collaborator interfaces of the route editor.
//!
//! The engine owns ordering and segment bookkeeping; everything that talks
//! to the outside world (order service, directions service, map overlays)
//! sits behind one of these traits.

use crate::config::SessionConfig;
use crate::error::{ProviderError, ServiceError};
use crate::polyline::{LatLng, Polyline};
use crate::segment::{FinalizedRoute, PathSegment};
use crate::stop::{RouteStops, StopId};

/// Road geometry between two points as resolved by a directions service.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    pub geometry: Polyline,
    pub distance_meters: f64,
    pub duration_secs: f64,
    /// Duration without traffic.
    pub static_duration_secs: f64,
}

/// Resolves the road path between two points through optional waypoints.
///
/// Called once per adjacent stop pair that needs a path. Requests of one
/// batch are issued concurrently, hence `Sync`.
pub trait DirectionsProvider: Sync {
    fn resolve_path(
        &self,
        from: LatLng,
        to: LatLng,
        waypoints: &[LatLng],
    ) -> Result<ResolvedPath, ProviderError>;
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for &T {
    fn resolve_path(
        &self,
        from: LatLng,
        to: LatLng,
        waypoints: &[LatLng],
    ) -> Result<ResolvedPath, ProviderError> {
        (**self).resolve_path(from, to, waypoints)
    }
}

/// Provides the optimized stop order for an order.
pub trait OrderLookup {
    fn route_stops(&self, session: &SessionConfig) -> Result<RouteStops, ServiceError>;
}

/// Stores a finalized route.
pub trait RoutePersistence {
    fn save_route(&self, session: &SessionConfig, route: &FinalizedRoute) -> Result<(), ServiceError>;
}

/// Presentation resources tied to path segments, keyed by the stop the
/// segment ends at.
///
/// Every `show` is matched by exactly one `release`, either when the
/// segment is replaced or discarded or when the engine is dropped.
pub trait SegmentRenderer {
    fn show(&mut self, stop: StopId, segment: &PathSegment);
    fn release(&mut self, stop: StopId);
}

impl<T: SegmentRenderer + ?Sized> SegmentRenderer for &mut T {
    fn show(&mut self, stop: StopId, segment: &PathSegment) {
        (**self).show(stop, segment);
    }

    fn release(&mut self, stop: StopId) {
        (**self).release(stop);
    }
}

impl SegmentRenderer for () {
    fn show(&mut self, _stop: StopId, _segment: &PathSegment) {}
    fn release(&mut self, _stop: StopId) {}
}
