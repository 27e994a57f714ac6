//! Great-circle distance between latitude/longitude pairs.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Range is not validated: origins come from configuration and resolved
/// points from the geocoder, which is trusted. Finiteness is checked by the
/// geocoder adapter before a coordinate ever reaches the distance math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a coordinate only when both components are finite numbers.
    #[must_use]
    pub fn finite(lat: f64, lon: f64) -> Option<Self> {
        (lat.is_finite() && lon.is_finite()).then_some(Self { lat, lon })
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Haversine distance to `other` in kilometres.
    #[must_use]
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_km(*self, *other)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// Great-circle distance between two coordinates using the haversine formula.
///
/// `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)`
/// `d = 2·R·atan2(√a, √(1−a))`
#[must_use]
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Returns the point `distance_km` due north of `from` along its meridian.
///
/// Moving along a meridian changes only the latitude, so the haversine
/// distance back to `from` matches `distance_km` to within float rounding
/// (a few ULPs either side). Callers testing inclusive band edges must
/// compare against the measured distance, not the requested one.
#[must_use]
pub fn offset_north(from: Coordinate, distance_km: f64) -> Coordinate {
    let d_lat = (distance_km / EARTH_RADIUS_KM).to_degrees();
    Coordinate::new(from.lat + d_lat, from.lon)
}
