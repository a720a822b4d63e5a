//! Real Las Vegas locations for realistic test routes.
//!
//! Coordinates sourced from OpenStreetMap via Overpass API.
//! These are real, routable locations that work with OSRM Nevada data.

use route_editor::polyline::LatLng;
use route_editor::stop::{RouteStops, Stop, StopId};

/// A named location with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

pub const WYNN: Location = Location::new("Wynn Las Vegas", 36.1263781, -115.1658180);
pub const MGM_GRAND: Location = Location::new("MGM Grand", 36.1023654, -115.1688720);
pub const HARD_ROCK_CAFE: Location = Location::new("Hard Rock Cafe", 36.1041592, -115.1722166);
pub const SW_STEAKHOUSE: Location = Location::new("SW Steakhouse", 36.1262145, -115.1669146);
pub const SPAGO: Location = Location::new("Spago by Wolfgang Puck", 36.1139368, -115.1741462);
pub const LE_CIRQUE: Location = Location::new("Le Cirque", 36.1135689, -115.1749763);
pub const BLT_STEAKHOUSE: Location = Location::new("BLT Steakhouse", 36.1135528, -115.1690095);
pub const CHARLIE_PALMER: Location = Location::new("Charlie Palmer Steak", 36.0910624, -115.1743364);

// Stop ids of `sample_route`.
pub const DEPOT: StopId = 1;
pub const PICKUP_A: StopId = 2;
pub const PICKUP_B: StopId = 3;
pub const DROPOFF_A: StopId = 20;
pub const DROPOFF_B: StopId = 30;
pub const DROPOFF_C: StopId = 40;
pub const FINAL: StopId = 99;

fn pickup(id: StopId, at: Location, drops_off_in: &[StopId]) -> Stop {
    Stop::pickup(id, at.name, at.coords(), drops_off_in.iter().copied())
        .with_address(format!("{}, Las Vegas, NV", at.name))
}

fn dropoff(id: StopId, at: Location, picked_up_in: &[StopId]) -> Stop {
    Stop::dropoff(id, at.name, at.coords(), picked_up_in.iter().copied())
        .with_address(format!("{}, Las Vegas, NV", at.name))
}

/// Depot, two pickup/drop-off pairs, a free drop-off and a final destination.
///
/// Chain: `DEPOT, PICKUP_A, PICKUP_B, DROPOFF_A, DROPOFF_C, DROPOFF_B, FINAL`.
pub fn sample_route() -> RouteStops {
    RouteStops {
        order_id: 7,
        origin: Some(pickup(DEPOT, WYNN, &[])),
        destination: Some(dropoff(FINAL, MGM_GRAND, &[])),
        ordered_points: vec![
            pickup(PICKUP_A, HARD_ROCK_CAFE, &[DROPOFF_A]),
            pickup(PICKUP_B, SW_STEAKHOUSE, &[DROPOFF_B]),
            dropoff(DROPOFF_A, SPAGO, &[PICKUP_A]),
            dropoff(DROPOFF_C, CHARLIE_PALMER, &[]),
            dropoff(DROPOFF_B, LE_CIRQUE, &[PICKUP_B]),
        ],
    }
}

/// Origin followed by one pickup and its drop-off, no final destination.
pub fn single_pair_route() -> RouteStops {
    RouteStops {
        order_id: 8,
        origin: Some(pickup(100, WYNN, &[])),
        destination: None,
        ordered_points: vec![
            pickup(1, BLT_STEAKHOUSE, &[10]),
            dropoff(10, SPAGO, &[1]),
        ],
    }
}

pub fn location_of(id: StopId) -> LatLng {
    let route = sample_route();
    route
        .origin
        .into_iter()
        .chain(route.destination)
        .chain(route.ordered_points)
        .find(|stop| stop.id == id)
        .map(|stop| stop.location)
        .expect("stop is part of the sample route")
}
