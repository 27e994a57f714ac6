//! Address-to-coordinate lookup seam.
//!
//! The pricing engine only needs "where is this address, if anywhere". The
//! HTTP adapter lives in `auraverde-geocoder`; tests plug in fakes.

use std::future::Future;

use serde::Serialize;

use crate::geo::Coordinate;

/// Why a lookup produced no usable coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    /// The service answered with an empty result list.
    NoMatch,
    /// Network failure, timeout, or TLS error.
    Transport(String),
    /// Non-2xx HTTP status.
    Status(u16),
    /// Body was not the expected JSON shape.
    MalformedResponse(String),
    /// Latitude or longitude did not parse to a finite number.
    InvalidCoordinate { lat: String, lon: String },
}

impl std::fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotFoundReason::NoMatch => write!(f, "no match"),
            NotFoundReason::Transport(e) => write!(f, "transport error: {e}"),
            NotFoundReason::Status(code) => write!(f, "unexpected HTTP status {code}"),
            NotFoundReason::MalformedResponse(e) => write!(f, "malformed response: {e}"),
            NotFoundReason::InvalidCoordinate { lat, lon } => {
                write!(f, "invalid coordinate lat={lat:?} lon={lon:?}")
            }
        }
    }
}

/// Result of a single geocoder lookup. Failures are values, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found(Coordinate),
    NotFound(NotFoundReason),
}

/// Resolves free-text addresses to coordinates.
///
/// Implementations make at most one outbound request per call and must map
/// every failure to [`GeocodeOutcome::NotFound`].
pub trait Geocoder: Send + Sync {
    fn lookup(&self, address: &str) -> impl Future<Output = GeocodeOutcome> + Send;
}

impl<G: Geocoder> Geocoder for std::sync::Arc<G> {
    fn lookup(&self, address: &str) -> impl Future<Output = GeocodeOutcome> + Send {
        (**self).lookup(address)
    }
}
