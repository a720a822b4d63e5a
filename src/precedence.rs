//! Pickup-before-delivery ordering rules.

use std::collections::{BTreeSet, HashMap};

use crate::error::{PrecedenceViolation, RouteError};
use crate::stop::{Stop, StopId, StopRole};

/// The partial order linking pickups to their drop-offs.
///
/// Built from both sides of the relation: a pair counts whether it is
/// declared by the pickup (`drops_off_in`), by the drop-off (`picked_up_in`),
/// or by both.
#[derive(Debug, Clone, Default)]
pub struct PrecedenceRules {
    /// `(pickup, dropoff)` pairs.
    edges: BTreeSet<(StopId, StopId)>,
}

impl PrecedenceRules {
    pub fn from_stops<'a>(stops: impl IntoIterator<Item = &'a Stop>) -> Result<Self, RouteError> {
        let stops: HashMap<StopId, &Stop> = stops.into_iter().map(|stop| (stop.id, stop)).collect();
        let mut edges = BTreeSet::new();

        for stop in stops.values() {
            for dependency in stop.dependencies() {
                let other = stops.get(dependency).ok_or_else(|| {
                    RouteError::Configuration(format!(
                        "stop {} depends on stop {} which is not part of the route",
                        stop.id, dependency
                    ))
                })?;

                match (&stop.role, &other.role) {
                    (StopRole::Pickup { .. }, StopRole::Dropoff { .. }) => {
                        edges.insert((stop.id, other.id));
                    }
                    (StopRole::Dropoff { .. }, StopRole::Pickup { .. }) => {
                        edges.insert((other.id, stop.id));
                    }
                    _ => {
                        return Err(RouteError::Configuration(format!(
                            "stop {} depends on stop {} of the same role",
                            stop.id, other.id
                        )));
                    }
                }
            }
        }

        Ok(Self { edges })
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Checks the pairs involving `moved` against `chain`.
    ///
    /// Moving one stop leaves the relative order of all others intact, so
    /// only those pairs can have flipped.
    pub fn check_move(&self, chain: &[StopId], moved: StopId) -> Result<(), PrecedenceViolation> {
        let positions = positions(chain);

        for &(pickup, dropoff) in &self.edges {
            if pickup != moved && dropoff != moved {
                continue;
            }
            let (Some(p), Some(d)) = (positions.get(&pickup), positions.get(&dropoff)) else {
                continue;
            };
            if p < d {
                continue;
            }

            return Err(if dropoff == moved {
                PrecedenceViolation::DeliveryBeforePickup { dropoff, pickup }
            } else {
                PrecedenceViolation::PickupAfterDelivery { pickup, dropoff }
            });
        }

        Ok(())
    }

    /// Checks every pair against `chain`.
    pub fn check_sequence(&self, chain: &[StopId]) -> Result<(), PrecedenceViolation> {
        let positions = positions(chain);

        for &(pickup, dropoff) in &self.edges {
            if let (Some(p), Some(d)) = (positions.get(&pickup), positions.get(&dropoff)) {
                if p >= d {
                    return Err(PrecedenceViolation::DeliveryBeforePickup { dropoff, pickup });
                }
            }
        }

        Ok(())
    }
}

fn positions(chain: &[StopId]) -> HashMap<StopId, usize> {
    chain.iter().enumerate().map(|(i, id)| (*id, i)).collect()
}
