use thiserror::Error;

/// Errors raised while constructing a geocoder client.
///
/// Lookup failures never appear here: they are folded into
/// [`auraverde_core::GeocodeOutcome::NotFound`] so pricing can fall back.
#[derive(Debug, Error)]
pub enum GeocoderError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid geocoder base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("geocoder User-Agent must not be empty")]
    MissingUserAgent,
}
