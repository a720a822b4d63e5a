//! In-memory collaborators for engine and session tests.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use route_editor::config::SessionConfig;
use route_editor::error::{ProviderError, ServiceError};
use route_editor::polyline::{LatLng, Polyline};
use route_editor::segment::{FinalizedRoute, PathSegment};
use route_editor::stop::{RouteStops, StopId};
use route_editor::traits::{
    DirectionsProvider, OrderLookup, ResolvedPath, RoutePersistence, SegmentRenderer,
};

/// Interior points added on every straight leg.
pub const DENSIFY: usize = 3;

/// Straight-line geometry, densified so simplification has work to do.
#[derive(Default)]
pub struct MockDirections {
    calls: AtomicUsize,
    failing_targets: Mutex<Vec<LatLng>>,
}

impl MockDirections {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every request ending at `to` fail.
    pub fn fail_towards(&self, to: LatLng) {
        self.failing_targets.lock().unwrap().push(to);
    }

    pub fn heal(&self) {
        self.failing_targets.lock().unwrap().clear();
    }
}

impl DirectionsProvider for MockDirections {
    fn resolve_path(
        &self,
        from: LatLng,
        to: LatLng,
        waypoints: &[LatLng],
    ) -> Result<ResolvedPath, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_targets.lock().unwrap().contains(&to) {
            return Err(ProviderError::NoRoute);
        }

        let mut corners = vec![from];
        corners.extend_from_slice(waypoints);
        corners.push(to);

        let mut points = vec![from];
        for leg in corners.windows(2) {
            for step in 1..=DENSIFY {
                let t = step as f64 / (DENSIFY + 1) as f64;
                points.push(LatLng::new(
                    leg[0].lat + (leg[1].lat - leg[0].lat) * t,
                    leg[0].lng + (leg[1].lng - leg[0].lng) * t,
                ));
            }
            points.push(leg[1]);
        }
        let legs = (corners.len() - 1) as f64;

        Ok(ResolvedPath {
            geometry: Polyline::new(points),
            distance_meters: 1000.0 * legs,
            duration_secs: 60.0 * legs,
            static_duration_secs: 50.0 * legs,
        })
    }
}

#[derive(Debug, Default)]
pub struct RendererLog {
    pub live: BTreeSet<StopId>,
    pub shows: usize,
    pub releases: usize,
    /// Shows without a prior release, or releases of nothing.
    pub unbalanced: usize,
}

/// Renderer whose log outlives the engine holding it.
#[derive(Clone, Default)]
pub struct SharedRenderer(Arc<Mutex<RendererLog>>);

impl SharedRenderer {
    pub fn live(&self) -> BTreeSet<StopId> {
        self.0.lock().unwrap().live.clone()
    }

    pub fn counts(&self) -> (usize, usize) {
        let log = self.0.lock().unwrap();
        (log.shows, log.releases)
    }

    pub fn unbalanced(&self) -> usize {
        self.0.lock().unwrap().unbalanced
    }
}

impl SegmentRenderer for SharedRenderer {
    fn show(&mut self, stop: StopId, segment: &PathSegment) {
        assert_eq!(segment.key.to, stop);
        let mut log = self.0.lock().unwrap();
        log.shows += 1;
        if !log.live.insert(stop) {
            log.unbalanced += 1;
        }
    }

    fn release(&mut self, stop: StopId) {
        let mut log = self.0.lock().unwrap();
        log.releases += 1;
        if !log.live.remove(&stop) {
            log.unbalanced += 1;
        }
    }
}

pub struct MockLookup {
    pub response: Mutex<Option<RouteStops>>,
    pub calls: AtomicUsize,
}

impl MockLookup {
    pub fn returning(stops: RouteStops) -> Self {
        Self {
            response: Mutex::new(Some(stops)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn not_found() -> Self {
        Self {
            response: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }
}

impl OrderLookup for MockLookup {
    fn route_stops(&self, _session: &SessionConfig) -> Result<RouteStops, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ServiceError::Status {
                status: 404,
                message: "Ordem não encontrada".to_string(),
            })
    }
}

#[derive(Default)]
pub struct MockPersistence {
    pub saved: Mutex<Vec<(SessionConfig, FinalizedRoute)>>,
}

impl RoutePersistence for MockPersistence {
    fn save_route(&self, session: &SessionConfig, route: &FinalizedRoute) -> Result<(), ServiceError> {
        self.saved
            .lock()
            .unwrap()
            .push((session.clone(), route.clone()));
        Ok(())
    }
}
