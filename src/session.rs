//! A route editing session for one order.
//!
//! Opening a session is the loading phase: the stop order is fetched from the
//! order service and every segment resolved. Once open, the engine handles
//! reorders and path edits; `save` finalizes and persists the route.

use tracing::{info, warn};

use crate::config::{EngineOptions, SessionConfig};
use crate::engine::RouteEngine;
use crate::error::RouteError;
use crate::segment::FinalizedRoute;
use crate::traits::{DirectionsProvider, OrderLookup, RoutePersistence, SegmentRenderer};

pub struct RouteSession<D: DirectionsProvider, R: SegmentRenderer = ()> {
    config: SessionConfig,
    engine: RouteEngine<D, R>,
}

impl<D: DirectionsProvider, R: SegmentRenderer> RouteSession<D, R> {
    pub fn open<L>(
        config: SessionConfig,
        lookup: &L,
        directions: D,
        renderer: R,
        options: EngineOptions,
    ) -> Result<Self, RouteError>
    where
        L: OrderLookup + ?Sized,
    {
        let stops = lookup.route_stops(&config)?;
        if stops.order_id != config.order_id() {
            warn!(
                requested = config.order_id(),
                returned = stops.order_id,
                "order service answered for a different order"
            );
        }

        let engine = RouteEngine::initialize(stops, directions, renderer, options)?;
        info!(
            company = config.company_key(),
            order_id = config.order_id(),
            stops = engine.chain().len(),
            "route session opened"
        );

        Ok(Self { config, engine })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn engine(&self) -> &RouteEngine<D, R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut RouteEngine<D, R> {
        &mut self.engine
    }

    /// Finalizes the route and hands it to `persistence`.
    pub fn save<P>(&self, persistence: &P) -> Result<FinalizedRoute, RouteError>
    where
        P: RoutePersistence + ?Sized,
    {
        let route = self.engine.finalize()?;
        persistence.save_route(&self.config, &route)?;
        Ok(route)
    }

    /// Throws away every reorder and path edit and reloads the order.
    ///
    /// The current engine, and with it every rendering resource, is released
    /// before the reload starts.
    pub fn reset_to_default<L>(self, lookup: &L, directions: D, renderer: R) -> Result<Self, RouteError>
    where
        L: OrderLookup + ?Sized,
    {
        let Self { config, engine } = self;
        let options = engine.options().clone();
        drop(engine);

        info!(order_id = config.order_id(), "resetting route to default");
        Self::open(config, lookup, directions, renderer, options)
    }
}
