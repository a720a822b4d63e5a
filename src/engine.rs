//! Route ordering engine.
//!
//! Owns the stop sequence of one route session and the path segments between
//! adjacent stops. The origin and final destination are fixed at the ends of
//! the route; everything in between ("movable" stops) can be reordered as
//! long as the pickup-before-delivery rules hold.
//!
//! Segments are keyed by their stop pair and only re-resolved when that pair
//! becomes adjacent. A commit is either applied as a whole or rolled back to
//! the last committed order.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::batch::{BatchResult, BatchTicket, PendingBatch, SegmentRequest};
use crate::config::{CommitMode, EngineOptions};
use crate::error::RouteError;
use crate::polyline::{LatLng, Polyline};
use crate::precedence::PrecedenceRules;
use crate::segment::{FinalizedRoute, PathSegment, SegmentKey};
use crate::stop::{RouteStops, Stop, StopId};
use crate::traits::{DirectionsProvider, ResolvedPath, SegmentRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Ready,
    /// The segment ending at this stop is being edited.
    Editing(StopId),
    /// A commit batch is in flight.
    Reconciling(BatchTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Pairs resolved by this commit.
    pub resolved: Vec<SegmentKey>,
    /// Pairs that stopped being adjacent.
    pub discarded: Vec<SegmentKey>,
    /// Segments kept untouched.
    pub reused: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied(CommitReport),
    /// A newer reorder or commit overtook this batch; nothing was applied.
    Superseded,
}

pub struct RouteEngine<D: DirectionsProvider, R: SegmentRenderer = ()> {
    directions: D,
    renderer: R,
    options: EngineOptions,
    stops: HashMap<StopId, Stop>,
    origin: Option<StopId>,
    destination: Option<StopId>,
    /// Movable stops in their current order.
    sequence: Vec<StopId>,
    /// Movable stops as of the last applied commit.
    committed: Vec<StopId>,
    segments: HashMap<SegmentKey, Arc<PathSegment>>,
    rules: PrecedenceRules,
    dirty: BTreeSet<StopId>,
    state: EngineState,
    last_ticket: u64,
}

impl<D: DirectionsProvider, R: SegmentRenderer> RouteEngine<D, R> {
    /// Builds the route in the order given by the lookup and resolves a
    /// segment for every adjacent pair.
    pub fn initialize(
        route: RouteStops,
        directions: D,
        renderer: R,
        options: EngineOptions,
    ) -> Result<Self, RouteError> {
        let RouteStops {
            origin,
            destination,
            ordered_points,
            ..
        } = route;

        if ordered_points.is_empty() && destination.is_some() && origin.is_none() {
            return Err(RouteError::Configuration(
                "a final destination needs an origin or at least one stop".to_string(),
            ));
        }
        if let Some(destination) = &destination {
            if !destination.is_dropoff() {
                return Err(RouteError::Configuration(format!(
                    "final destination {} is not a drop-off",
                    destination.id
                )));
            }
        }

        let origin_id = origin.as_ref().map(|stop| stop.id);
        let destination_id = destination.as_ref().map(|stop| stop.id);
        if origin_id.is_some() && origin_id == destination_id {
            return Err(RouteError::Configuration(
                "origin and final destination are the same stop".to_string(),
            ));
        }

        let mut stops: HashMap<StopId, Stop> = origin
            .into_iter()
            .chain(destination)
            .map(|stop| (stop.id, stop))
            .collect();
        let mut sequence = Vec::with_capacity(ordered_points.len());
        for stop in ordered_points {
            // The lookup may repeat the fixed ends inside the ordered list.
            if Some(stop.id) == origin_id || Some(stop.id) == destination_id {
                continue;
            }
            let id = stop.id;
            if stops.insert(id, stop).is_some() {
                return Err(RouteError::Configuration(format!("stop {id} appears twice")));
            }
            sequence.push(id);
        }

        let rules = PrecedenceRules::from_stops(stops.values())?;

        let mut engine = Self {
            directions,
            renderer,
            options,
            stops,
            origin: origin_id,
            destination: destination_id,
            committed: sequence.clone(),
            sequence,
            segments: HashMap::new(),
            rules,
            dirty: BTreeSet::new(),
            state: EngineState::Ready,
            last_ticket: 0,
        };

        let chain = engine.chain();
        if chain.len() < 2 {
            return Err(RouteError::Configuration(
                "a route needs at least two stops".to_string(),
            ));
        }
        engine.rules.check_sequence(&chain).map_err(|violation| {
            RouteError::Configuration(format!("initial stop order is inconsistent: {violation}"))
        })?;

        let requests = pairs(&chain)
            .into_iter()
            .map(|key| engine.request(key, Vec::new()))
            .collect::<Result<Vec<_>, _>>()?;
        let ticket = engine.next_ticket();
        let batch = PendingBatch::new(ticket, requests);
        for (key, path) in batch.resolve(&engine.directions).resolved? {
            engine.store(key, Vec::new(), path);
        }

        info!(
            stops = chain.len(),
            segments = engine.segments.len(),
            rules = engine.rules.len(),
            "route initialized"
        );
        Ok(engine)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn directions(&self) -> &D {
        &self.directions
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn origin(&self) -> Option<&Stop> {
        self.origin.and_then(|id| self.stops.get(&id))
    }

    pub fn destination(&self) -> Option<&Stop> {
        self.destination.and_then(|id| self.stops.get(&id))
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(&id)
    }

    /// Movable stops in their current order.
    pub fn sequence(&self) -> &[StopId] {
        &self.sequence
    }

    /// Every stop from origin to final destination.
    pub fn chain(&self) -> Vec<StopId> {
        self.chain_of(&self.sequence)
    }

    /// Stops moved since the last commit.
    pub fn dirty(&self) -> &BTreeSet<StopId> {
        &self.dirty
    }

    pub fn segment(&self, from: StopId, to: StopId) -> Option<Arc<PathSegment>> {
        self.segments.get(&SegmentKey::new(from, to)).cloned()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Moves `stop_id` to `new_index` among the movable stops, all others
    /// keeping their relative order.
    ///
    /// Returns the stops marked dirty by this call; empty when the stop is
    /// already at `new_index`. A rejected move leaves the sequence untouched.
    /// An accepted move cancels any commit batch still in flight.
    pub fn propose_reorder(
        &mut self,
        stop_id: StopId,
        new_index: usize,
    ) -> Result<Vec<StopId>, RouteError> {
        if let EngineState::Editing(_) = self.state {
            return Err(RouteError::InvalidState("a path edit is in progress"));
        }

        let old_index = self.movable_index(stop_id)?;
        if new_index >= self.sequence.len() {
            return Err(RouteError::IndexOutOfRange {
                index: new_index,
                len: self.sequence.len(),
            });
        }
        if new_index == old_index {
            return Ok(Vec::new());
        }

        let mut candidate = self.sequence.clone();
        let moved = candidate.remove(old_index);
        candidate.insert(new_index, moved);

        if let Err(violation) = self.rules.check_move(&self.chain_of(&candidate), stop_id) {
            debug!(stop = stop_id, new_index, %violation, "reorder rejected");
            return Err(violation.into());
        }

        self.cancel_reconciling();
        self.sequence = candidate;
        self.dirty.insert(stop_id);
        debug!(stop = stop_id, from = old_index, to = new_index, "reorder accepted");

        Ok(vec![stop_id])
    }

    /// Swaps `stop_id` with its movable neighbour. Commits right away in
    /// [`CommitMode::Immediate`].
    pub fn move_point(
        &mut self,
        direction: Direction,
        stop_id: StopId,
    ) -> Result<Option<CommitReport>, RouteError> {
        let index = self.movable_index(stop_id)?;
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|next| *next < self.sequence.len()),
        }
        .ok_or(RouteError::BoundaryMove(stop_id))?;

        let dirty = self.propose_reorder(stop_id, target)?;
        if self.options.commit_mode == CommitMode::Immediate && !dirty.is_empty() {
            return self.commit_reorder().map(Some);
        }

        Ok(None)
    }

    /// Resolves every newly adjacent pair with the engine's own provider and
    /// applies the result.
    pub fn commit_reorder(&mut self) -> Result<CommitReport, RouteError> {
        let batch = self.begin_commit()?;
        let result = batch.resolve(&self.directions);
        match self.complete_commit(result)? {
            CommitOutcome::Applied(report) => Ok(report),
            CommitOutcome::Superseded => Err(RouteError::InvalidState("commit was superseded")),
        }
    }

    /// Starts a commit: one request per adjacent pair that was not adjacent in
    /// the committed order. Supersedes any batch still in flight.
    pub fn begin_commit(&mut self) -> Result<PendingBatch, RouteError> {
        if let EngineState::Editing(_) = self.state {
            return Err(RouteError::InvalidState("a path edit is in progress"));
        }
        self.cancel_reconciling();

        let committed: HashSet<SegmentKey> = pairs(&self.chain_of(&self.committed))
            .into_iter()
            .collect();
        let requests = pairs(&self.chain())
            .into_iter()
            .filter(|key| !committed.contains(key))
            .map(|key| self.request(key, Vec::new()))
            .collect::<Result<Vec<_>, _>>()?;

        let ticket = self.next_ticket();
        self.state = EngineState::Reconciling(ticket);
        debug!(ticket = ticket.0, requests = requests.len(), "commit batch issued");

        Ok(PendingBatch::new(ticket, requests))
    }

    /// Applies a resolved batch if it is still the current one.
    ///
    /// A failed batch rolls the sequence back to the committed order and
    /// leaves every segment as it was.
    pub fn complete_commit(&mut self, result: BatchResult) -> Result<CommitOutcome, RouteError> {
        if self.state != EngineState::Reconciling(result.ticket) {
            debug!(ticket = result.ticket.0, "discarding superseded commit batch");
            return Ok(CommitOutcome::Superseded);
        }
        self.state = EngineState::Ready;

        let resolved = match result.resolved {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(error = %err, "commit batch failed, rolling back");
                self.sequence = self.committed.clone();
                self.dirty.clear();
                return Err(err);
            }
        };

        let adjacent: HashSet<SegmentKey> = pairs(&self.chain()).into_iter().collect();
        let mut discarded: Vec<SegmentKey> = self
            .segments
            .keys()
            .filter(|key| !adjacent.contains(*key))
            .copied()
            .collect();
        discarded.sort();
        for key in &discarded {
            self.discard(*key);
        }

        let mut report = CommitReport {
            resolved: Vec::with_capacity(resolved.len()),
            discarded,
            reused: self.segments.len(),
        };
        for (key, path) in resolved {
            self.store(key, Vec::new(), path);
            report.resolved.push(key);
        }

        self.committed = self.sequence.clone();
        self.dirty.clear();
        info!(
            resolved = report.resolved.len(),
            reused = report.reused,
            discarded = report.discarded.len(),
            "commit applied"
        );

        Ok(CommitOutcome::Applied(report))
    }

    /// Puts the segment ending at `stop_id` into edit mode.
    pub fn begin_edit(&mut self, stop_id: StopId) -> Result<Arc<PathSegment>, RouteError> {
        match self.state {
            EngineState::Ready => {}
            EngineState::Editing(_) => {
                return Err(RouteError::InvalidState("another path edit is in progress"));
            }
            EngineState::Reconciling(_) => {
                return Err(RouteError::InvalidState("a commit is still being reconciled"));
            }
        }

        let key = self.incoming_key(stop_id)?;
        let segment = self
            .segments
            .get(&key)
            .cloned()
            .ok_or(RouteError::IncompletePath { missing: vec![key] })?;

        self.state = EngineState::Editing(stop_id);
        debug!(segment = %key, "path edit started");
        Ok(segment)
    }

    /// Re-resolves the edited segment through `waypoints` and commits it.
    ///
    /// On failure the committed segment is kept and the edit stays open, so
    /// the caller can retry or cancel.
    pub fn end_edit(
        &mut self,
        stop_id: StopId,
        waypoints: Vec<LatLng>,
    ) -> Result<Arc<PathSegment>, RouteError> {
        self.ensure_editing(stop_id)?;

        let key = self.incoming_key(stop_id)?;
        let request = self.request(key, waypoints)?;
        let path = self
            .directions
            .resolve_path(request.from, request.to, &request.waypoints)
            .map_err(|source| RouteError::PathResolution {
                from: key.from,
                to: key.to,
                source,
            })?;

        let segment = self.store(key, request.waypoints, path);
        self.state = EngineState::Ready;
        info!(segment = %key, waypoints = segment.waypoints.len(), "path edit committed");

        Ok(segment)
    }

    /// Leaves edit mode; the segment keeps its last committed waypoints.
    pub fn cancel_edit(&mut self, stop_id: StopId) -> Result<Arc<PathSegment>, RouteError> {
        self.ensure_editing(stop_id)?;

        let key = self.incoming_key(stop_id)?;
        self.state = EngineState::Ready;
        debug!(segment = %key, "path edit cancelled");

        self.segments
            .get(&key)
            .cloned()
            .ok_or(RouteError::IncompletePath { missing: vec![key] })
    }

    /// Stitches every segment, in order, into the route to persist.
    pub fn finalize(&self) -> Result<FinalizedRoute, RouteError> {
        if let EngineState::Editing(_) = self.state {
            return Err(RouteError::InvalidState("a path edit is in progress"));
        }

        let chain = self.chain();
        let keys = pairs(&chain);
        let missing: Vec<SegmentKey> = keys
            .iter()
            .filter(|key| !self.segments.contains_key(*key))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(RouteError::IncompletePath { missing });
        }

        let mut path = Polyline::default();
        let mut distance_meters = 0.0;
        let mut duration_secs = 0.0;
        for key in &keys {
            let segment = &self.segments[key];
            path.extend_from(segment.geometry());
            distance_meters += segment.path.distance_meters;
            duration_secs += segment.path.duration_secs;
        }

        let stop_locations = chain.iter().map(|id| self.stops[id].location).collect();
        let encoded_path = path.encode();
        debug!(points = path.len(), segments = keys.len(), "route finalized");

        Ok(FinalizedRoute {
            path,
            encoded_path,
            stop_locations,
            distance_meters,
            duration_secs,
        })
    }

    fn chain_of(&self, sequence: &[StopId]) -> Vec<StopId> {
        self.origin
            .into_iter()
            .chain(sequence.iter().copied())
            .chain(self.destination)
            .collect()
    }

    fn movable_index(&self, stop_id: StopId) -> Result<usize, RouteError> {
        if Some(stop_id) == self.origin || Some(stop_id) == self.destination {
            return Err(RouteError::ImmovableStop(stop_id));
        }
        self.sequence
            .iter()
            .position(|id| *id == stop_id)
            .ok_or(RouteError::UnknownStop(stop_id))
    }

    fn incoming_key(&self, stop_id: StopId) -> Result<SegmentKey, RouteError> {
        let chain = self.chain();
        match chain.iter().position(|id| *id == stop_id) {
            None => Err(RouteError::UnknownStop(stop_id)),
            Some(0) => Err(RouteError::InvalidState("the first stop has no incoming path")),
            Some(index) => Ok(SegmentKey::new(chain[index - 1], stop_id)),
        }
    }

    fn ensure_editing(&self, stop_id: StopId) -> Result<(), RouteError> {
        if self.state == EngineState::Editing(stop_id) {
            Ok(())
        } else {
            Err(RouteError::InvalidState("that segment is not being edited"))
        }
    }

    fn request(&self, key: SegmentKey, waypoints: Vec<LatLng>) -> Result<SegmentRequest, RouteError> {
        let location = |id: StopId| {
            self.stops
                .get(&id)
                .map(|stop| stop.location)
                .ok_or(RouteError::UnknownStop(id))
        };

        Ok(SegmentRequest {
            key,
            from: location(key.from)?,
            to: location(key.to)?,
            waypoints,
        })
    }

    fn next_ticket(&mut self) -> BatchTicket {
        self.last_ticket += 1;
        BatchTicket(self.last_ticket)
    }

    fn cancel_reconciling(&mut self) {
        if let EngineState::Reconciling(ticket) = self.state {
            debug!(ticket = ticket.0, "in-flight commit superseded");
            self.state = EngineState::Ready;
        }
    }

    fn store(&mut self, key: SegmentKey, waypoints: Vec<LatLng>, mut path: ResolvedPath) -> Arc<PathSegment> {
        if let Some(tolerance) = self.options.simplify_tolerance {
            path.geometry = path.geometry.simplified(tolerance);
        }

        let segment = Arc::new(PathSegment {
            key,
            waypoints,
            path,
        });
        if self.segments.insert(key, Arc::clone(&segment)).is_some() {
            self.renderer.release(key.to);
        }
        self.renderer.show(key.to, &segment);

        segment
    }

    fn discard(&mut self, key: SegmentKey) {
        if self.segments.remove(&key).is_some() {
            self.renderer.release(key.to);
        }
    }
}

impl<D: DirectionsProvider, R: SegmentRenderer> Drop for RouteEngine<D, R> {
    fn drop(&mut self) {
        for key in self.segments.keys() {
            self.renderer.release(key.to);
        }
    }
}

fn pairs(chain: &[StopId]) -> Vec<SegmentKey> {
    chain
        .windows(2)
        .map(|pair| SegmentKey::new(pair[0], pair[1]))
        .collect()
}
