//! HTTP adapter for the delivery-route order service (lookup and save).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::ServiceError;
use crate::polyline::LatLng;
use crate::segment::FinalizedRoute;
use crate::stop::RouteStops;
use crate::traits::{OrderLookup, RoutePersistence};

#[derive(Debug, Clone)]
pub struct OrderServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OrderServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderServiceClient {
    config: OrderServiceConfig,
    client: reqwest::blocking::Client,
}

impl OrderServiceClient {
    pub fn new(config: OrderServiceConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn lookup_url(&self, session: &SessionConfig) -> String {
        format!(
            "{}/v2/rota-de-entrega/{}/melhor-rota",
            self.base_url(),
            session.company_key()
        )
    }

    fn save_url(&self, session: &SessionConfig) -> String {
        format!(
            "{}/rota-de-entrega/{}/salvar-rota",
            self.base_url(),
            session.company_key()
        )
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

impl OrderLookup for OrderServiceClient {
    fn route_stops(&self, session: &SessionConfig) -> Result<RouteStops, ServiceError> {
        let url = self.lookup_url(session);
        debug!(%url, order_id = session.order_id(), "fetching route stops");

        let response = self
            .client
            .get(url)
            .query(&[("idOrdem", session.order_id())])
            .send()?;

        Ok(check_status(response)?.json::<RouteStops>()?)
    }
}

impl RoutePersistence for OrderServiceClient {
    fn save_route(&self, session: &SessionConfig, route: &FinalizedRoute) -> Result<(), ServiceError> {
        let url = self.save_url(session);
        let body = SaveRouteBody {
            id_ordem: session.order_id(),
            encoded_polyline: &route.encoded_path,
            ordered_points: &route.stop_locations,
        };

        let response = self.client.post(url).json(&body).send()?;
        check_status(response)?;

        info!(order_id = session.order_id(), points = route.path.len(), "route saved");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveRouteBody<'a> {
    id_ordem: u64,
    encoded_polyline: &'a str,
    ordered_points: &'a [LatLng],
}

/// Error payload of the order service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    message: String,
}

fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorResponse>()
        .map(|body| body.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    Err(ServiceError::Status {
        status: status.as_u16(),
        message,
    })
}
