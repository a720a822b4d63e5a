//! OSRM HTTP adapter for path resolution.

use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use crate::polyline::{LatLng, Polyline};
use crate::traits::{DirectionsProvider, ResolvedPath};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, points: &[LatLng]) -> String {
        let coords = points
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.lng, point.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl DirectionsProvider for OsrmClient {
    fn resolve_path(
        &self,
        from: LatLng,
        to: LatLng,
        waypoints: &[LatLng],
    ) -> Result<ResolvedPath, ProviderError> {
        let mut points = Vec::with_capacity(waypoints.len() + 2);
        points.push(from);
        points.extend_from_slice(waypoints);
        points.push(to);

        let url = self.route_url(&points);
        debug!(%url, "requesting OSRM route");

        // OSRM reports routing failures as JSON bodies with a non-2xx status,
        // so the body is parsed before looking at the status.
        let body = self.client.get(url).send()?.json::<OsrmRouteResponse>()?;
        into_resolved_path(body)
    }
}

fn into_resolved_path(body: OsrmRouteResponse) -> Result<ResolvedPath, ProviderError> {
    if body.code == "NoRoute" {
        return Err(ProviderError::NoRoute);
    }
    if body.code != "Ok" {
        return Err(ProviderError::Rejected {
            code: body.code,
            message: body.message.unwrap_or_default(),
        });
    }

    let route = body
        .routes
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(ProviderError::NoRoute)?;

    Ok(ResolvedPath {
        geometry: Polyline::decode(&route.geometry)?,
        distance_meters: route.distance,
        duration_secs: route.duration,
        // OSRM has no traffic model.
        static_duration_secs: route.duration,
    })
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    distance: f64,
    duration: f64,
}
