//! Route session tests
//!
//! Loading through the order lookup, saving through persistence, and
//! resetting a session to the service's default order.

mod fixtures;

use std::sync::atomic::Ordering;

use fixtures::*;
use route_editor::config::{EngineOptions, SessionConfig};
use route_editor::error::{RouteError, ServiceError};
use route_editor::polyline::Polyline;
use route_editor::session::RouteSession;

fn config() -> SessionConfig {
    SessionConfig::new("empresa-123", 7).unwrap()
}

fn open(lookup: &MockLookup, renderer: SharedRenderer) -> RouteSession<MockDirections, SharedRenderer> {
    RouteSession::open(
        config(),
        lookup,
        MockDirections::default(),
        renderer,
        EngineOptions::default(),
    )
    .expect("session opens")
}

#[test]
fn open_loads_route_from_lookup() {
    let lookup = MockLookup::returning(sample_route());
    let session = open(&lookup, SharedRenderer::default());

    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.config().company_key(), "empresa-123");
    assert_eq!(session.engine().chain().len(), 7);
    assert_eq!(session.engine().segment_count(), 6);
}

#[test]
fn open_maps_lookup_failure() {
    let lookup = MockLookup::not_found();

    let result = RouteSession::open(
        config(),
        &lookup,
        MockDirections::default(),
        (),
        EngineOptions::default(),
    );
    assert!(matches!(
        result,
        Err(RouteError::Service(ServiceError::Status { status: 404, .. }))
    ));
}

#[test]
fn open_rejects_inconsistent_route() {
    let mut route = single_pair_route();
    route.ordered_points.reverse();
    let lookup = MockLookup::returning(route);

    let result = RouteSession::open(
        config(),
        &lookup,
        MockDirections::default(),
        (),
        EngineOptions::default(),
    );
    assert!(matches!(result, Err(RouteError::Configuration(_))));
}

#[test]
fn save_persists_finalized_route() {
    let lookup = MockLookup::returning(sample_route());
    let mut session = open(&lookup, SharedRenderer::default());
    session.engine_mut().propose_reorder(DROPOFF_C, 4).unwrap();
    session.engine_mut().commit_reorder().unwrap();

    let persistence = MockPersistence::default();
    let route = session.save(&persistence).unwrap();

    let saved = persistence.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, config());
    assert_eq!(saved[0].1, route);

    let decoded = Polyline::decode(&route.encoded_path).unwrap();
    assert_eq!(decoded.len(), route.path.len());
    assert_eq!(route.stop_locations.last(), Some(&MGM_GRAND.coords()));
}

#[test]
fn save_refuses_uncommitted_reorder() {
    let lookup = MockLookup::returning(sample_route());
    let mut session = open(&lookup, SharedRenderer::default());
    session.engine_mut().propose_reorder(DROPOFF_C, 4).unwrap();

    let persistence = MockPersistence::default();
    assert!(matches!(
        session.save(&persistence),
        Err(RouteError::IncompletePath { .. })
    ));
    assert!(persistence.saved.lock().unwrap().is_empty());
}

#[test]
fn reset_to_default_reloads_original_order() {
    let lookup = MockLookup::returning(sample_route());
    let renderer = SharedRenderer::default();
    let mut session = open(&lookup, renderer.clone());
    let original = session.engine().sequence().to_vec();

    session.engine_mut().propose_reorder(DROPOFF_C, 4).unwrap();
    session.engine_mut().commit_reorder().unwrap();
    session.engine_mut().begin_edit(DROPOFF_A).unwrap();
    session
        .engine_mut()
        .end_edit(DROPOFF_A, vec![WYNN.coords()])
        .unwrap();
    assert_ne!(session.engine().sequence(), original.as_slice());

    let session = session
        .reset_to_default(&lookup, MockDirections::default(), renderer.clone())
        .unwrap();

    assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
    assert_eq!(session.engine().sequence(), original.as_slice());
    assert!(session.engine().segment(PICKUP_B, DROPOFF_A).unwrap().waypoints.is_empty());
    assert_eq!(renderer.live().len(), 6);
    assert_eq!(renderer.unbalanced(), 0);
}
