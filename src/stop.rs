//! Stops as delivered by the order lookup service.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::polyline::LatLng;

pub type StopId = u64;

/// A pickup or drop-off location of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub address: String,
    pub location: LatLng,
    #[serde(flatten)]
    pub role: StopRole,
}

/// What a stop does, together with the stops it is ordered against.
///
/// The wire tags are the order service's own (`coleta` / `entrega`); the
/// English names are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StopRole {
    /// Must precede every drop-off in `drops_off_in`.
    #[serde(rename = "coleta", alias = "pickup")]
    Pickup {
        #[serde(rename = "dropsOffIn", default)]
        drops_off_in: BTreeSet<StopId>,
    },
    /// Must follow every pickup in `picked_up_in`.
    #[serde(rename = "entrega", alias = "dropoff")]
    Dropoff {
        #[serde(rename = "pickedUpIn", default)]
        picked_up_in: BTreeSet<StopId>,
    },
}

impl Stop {
    pub fn pickup(
        id: StopId,
        name: impl Into<String>,
        location: LatLng,
        drops_off_in: impl IntoIterator<Item = StopId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: String::new(),
            location,
            role: StopRole::Pickup {
                drops_off_in: drops_off_in.into_iter().collect(),
            },
        }
    }

    pub fn dropoff(
        id: StopId,
        name: impl Into<String>,
        location: LatLng,
        picked_up_in: impl IntoIterator<Item = StopId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: String::new(),
            location,
            role: StopRole::Dropoff {
                picked_up_in: picked_up_in.into_iter().collect(),
            },
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn is_pickup(&self) -> bool {
        matches!(self.role, StopRole::Pickup { .. })
    }

    pub fn is_dropoff(&self) -> bool {
        matches!(self.role, StopRole::Dropoff { .. })
    }

    /// Ids of the stops this one is ordered against, whichever the role.
    pub fn dependencies(&self) -> &BTreeSet<StopId> {
        match &self.role {
            StopRole::Pickup { drops_off_in } => drops_off_in,
            StopRole::Dropoff { picked_up_in } => picked_up_in,
        }
    }
}

/// Result of an order lookup: the optimized stop order for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStops {
    pub order_id: u64,
    pub origin: Option<Stop>,
    #[serde(default)]
    pub destination: Option<Stop>,
    pub ordered_points: Vec<Stop>,
}
