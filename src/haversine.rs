//! Straight-line directions provider (fallback when OSRM is unavailable).
//!
//! Connects the endpoints and waypoints with straight legs and estimates
//! travel time from great-circle distance at an assumed speed. Ignores roads
//! but is always available.

use crate::error::ProviderError;
use crate::polyline::{LatLng, Polyline};
use crate::traits::{DirectionsProvider, ResolvedPath};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone)]
pub struct StraightLineDirections {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for StraightLineDirections {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl StraightLineDirections {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two points in kilometers.
    pub fn haversine_km(from: LatLng, to: LatLng) -> f64 {
        let lat1_rad = from.lat.to_radians();
        let lat2_rad = to.lat.to_radians();
        let delta_lat = (to.lat - from.lat).to_radians();
        let delta_lng = (to.lng - from.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    fn km_to_seconds(&self, km: f64) -> f64 {
        (km / self.speed_kmh * 3600.0).round()
    }
}

impl DirectionsProvider for StraightLineDirections {
    fn resolve_path(
        &self,
        from: LatLng,
        to: LatLng,
        waypoints: &[LatLng],
    ) -> Result<ResolvedPath, ProviderError> {
        if !(self.speed_kmh > 0.0) {
            return Err(ProviderError::Other(format!(
                "speed must be positive, got {} km/h",
                self.speed_kmh
            )));
        }

        let mut points = Vec::with_capacity(waypoints.len() + 2);
        points.push(from);
        points.extend_from_slice(waypoints);
        points.push(to);

        let km: f64 = points
            .windows(2)
            .map(|leg| Self::haversine_km(leg[0], leg[1]))
            .sum();
        let duration_secs = self.km_to_seconds(km);

        Ok(ResolvedPath {
            geometry: Polyline::new(points),
            distance_meters: (km * 1000.0).round(),
            duration_secs,
            static_duration_secs: duration_secs,
        })
    }
}
