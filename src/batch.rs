//! Segment resolution batches.
//!
//! A commit produces one [`PendingBatch`] holding a request per newly
//! adjacent stop pair. The batch carries the ticket it was issued under; the
//! engine only applies a [`BatchResult`] whose ticket is still current, so a
//! batch overtaken by a newer reorder is discarded as a whole.

use rayon::prelude::*;

use crate::error::RouteError;
use crate::polyline::LatLng;
use crate::segment::SegmentKey;
use crate::traits::{DirectionsProvider, ResolvedPath};

/// Generation number of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchTicket(pub(crate) u64);

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRequest {
    pub key: SegmentKey,
    pub from: LatLng,
    pub to: LatLng,
    pub waypoints: Vec<LatLng>,
}

#[derive(Debug, Clone)]
pub struct PendingBatch {
    ticket: BatchTicket,
    requests: Vec<SegmentRequest>,
}

impl PendingBatch {
    pub(crate) fn new(ticket: BatchTicket, requests: Vec<SegmentRequest>) -> Self {
        Self { ticket, requests }
    }

    pub fn ticket(&self) -> BatchTicket {
        self.ticket
    }

    pub fn requests(&self) -> &[SegmentRequest] {
        &self.requests
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Issues every request of the batch, concurrently.
    ///
    /// The result is all-or-nothing: the first failing request (in request
    /// order) fails the batch.
    pub fn resolve<D>(&self, provider: &D) -> BatchResult
    where
        D: DirectionsProvider + ?Sized,
    {
        let resolved = self
            .requests
            .par_iter()
            .map(|request| {
                provider
                    .resolve_path(request.from, request.to, &request.waypoints)
                    .map(|path| (request.key, path))
                    .map_err(|source| RouteError::PathResolution {
                        from: request.key.from,
                        to: request.key.to,
                        source,
                    })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<Vec<_>, _>>();

        BatchResult {
            ticket: self.ticket,
            resolved,
        }
    }
}

/// Outcome of resolving a [`PendingBatch`].
#[derive(Debug)]
pub struct BatchResult {
    pub(crate) ticket: BatchTicket,
    pub(crate) resolved: Result<Vec<(SegmentKey, ResolvedPath)>, RouteError>,
}

impl BatchResult {
    pub fn ticket(&self) -> BatchTicket {
        self.ticket
    }

    pub fn is_ok(&self) -> bool {
        self.resolved.is_ok()
    }
}
