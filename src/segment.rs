//! Path segments between consecutive stops.

use std::fmt;

use serde::Serialize;

use crate::polyline::{LatLng, Polyline};
use crate::stop::StopId;
use crate::traits::ResolvedPath;

/// Directed stop pair identifying a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SegmentKey {
    pub from: StopId,
    pub to: StopId,
}

impl SegmentKey {
    pub const fn new(from: StopId, to: StopId) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Committed road geometry for one adjacent stop pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub key: SegmentKey,
    /// Waypoints the dispatcher forced the path through. Empty unless edited.
    pub waypoints: Vec<LatLng>,
    pub path: ResolvedPath,
}

impl PathSegment {
    pub fn geometry(&self) -> &Polyline {
        &self.path.geometry
    }
}

/// A route ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedRoute {
    /// Every segment's geometry, in sequence order.
    pub path: Polyline,
    /// `path` in encoded polyline form.
    pub encoded_path: String,
    /// Stop locations from origin to final destination.
    pub stop_locations: Vec<LatLng>,
    pub distance_meters: f64,
    pub duration_secs: f64,
}
