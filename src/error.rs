use thiserror::Error;

use crate::polyline::PolylineError;
use crate::segment::SegmentKey;
use crate::stop::StopId;

/// Errors of the route editing core.
///
/// Every variant is returned with the engine left in its last consistent
/// state.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("precedence violation: {0}")]
    PrecedenceViolation(#[from] PrecedenceViolation),

    #[error("could not resolve path from stop {from} to stop {to}: {source}")]
    PathResolution {
        from: StopId,
        to: StopId,
        #[source]
        source: ProviderError,
    },

    #[error("route has unresolved segments: {missing:?}")]
    IncompletePath { missing: Vec<SegmentKey> },

    #[error("unknown stop {0}")]
    UnknownStop(StopId),

    #[error("stop {0} is the origin or final destination and cannot be moved")]
    ImmovableStop(StopId),

    #[error("stop {0} has no movable neighbour in that direction")]
    BoundaryMove(StopId),

    #[error("index {index} is outside the movable range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// A reorder rejected because it breaks pickup-before-delivery ordering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrecedenceViolation {
    #[error("delivery scheduled before its pickup (dropoff {dropoff}, pickup {pickup})")]
    DeliveryBeforePickup { dropoff: StopId, pickup: StopId },

    #[error("pickup scheduled after its delivery (pickup {pickup}, dropoff {dropoff})")]
    PickupAfterDelivery { pickup: StopId, dropoff: StopId },
}

/// Failure of a directions provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("directions service returned {code}: {message}")]
    Rejected { code: String, message: String },

    #[error("no route found")]
    NoRoute,

    #[error("invalid geometry: {0}")]
    Geometry(#[from] PolylineError),

    #[error("{0}")]
    Other(String),
}

/// Failure of the order lookup or persistence service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("order service returned {status}: {message}")]
    Status { status: u16, message: String },
}
