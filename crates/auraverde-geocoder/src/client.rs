//! HTTP client for the Nominatim (`OpenStreetMap`) address search API.
//!
//! Each lookup is exactly one `GET /search` request. Nothing is retried: the
//! shipping engine has a fallback price for unresolved addresses, so a slow
//! second attempt is worse than an immediate "not found".

use std::time::Duration;

use auraverde_core::{AppConfig, Coordinate, GeocodeOutcome, Geocoder, NotFoundReason};
use reqwest::{Client, Url};

use crate::error::GeocoderError;
use crate::types::NominatimPlace;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Client for Nominatim's `/search` endpoint.
///
/// Use [`NominatimClient::new`] for the public service or
/// [`NominatimClient::with_base_url`] to point at a mock server in tests.
pub struct NominatimClient {
    client: Client,
    search_endpoint: Url,
}

impl NominatimClient {
    /// Creates a client for the public Nominatim service.
    ///
    /// # Errors
    ///
    /// Returns [`GeocoderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocoderError::MissingUserAgent`] for a
    /// blank agent.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, GeocoderError> {
        Self::with_base_url(user_agent, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`NominatimClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GeocoderError> {
        Self::with_base_url(
            &config.geocoder_user_agent,
            config.geocoder_timeout_secs,
            &config.geocoder_base_url,
        )
    }

    /// Creates a client with a custom base URL.
    ///
    /// `user_agent` is sent on every request; Nominatim's usage policy
    /// rejects anonymous clients.
    ///
    /// # Errors
    ///
    /// Returns [`GeocoderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, [`GeocoderError::InvalidBaseUrl`] if `base_url`
    /// does not parse, or [`GeocoderError::MissingUserAgent`] for a blank
    /// agent.
    pub fn with_base_url(
        user_agent: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocoderError> {
        if user_agent.trim().is_empty() {
            return Err(GeocoderError::MissingUserAgent);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        // A trailing slash makes `join("search")` append rather than replace
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let search_endpoint = Url::parse(&normalised)
            .and_then(|base| base.join("search"))
            .map_err(|e| GeocoderError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            search_endpoint,
        })
    }

    /// Builds the `/search` URL for a single-result JSON lookup.
    fn search_url(&self, address: &str) -> Url {
        let mut url = self.search_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        url
    }

    /// Resolves `address` to the first match's coordinate.
    ///
    /// # Errors
    ///
    /// Returns the [`NotFoundReason`] describing why no coordinate is
    /// available: transport failure, non-2xx status, malformed body, empty
    /// result list, or non-numeric coordinates.
    pub async fn search(&self, address: &str) -> Result<Coordinate, NotFoundReason> {
        let url = self.search_url(address);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| NotFoundReason::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotFoundReason::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NotFoundReason::Transport(e.to_string()))?;

        parse_search_response(&body)
    }
}

impl Geocoder for NominatimClient {
    async fn lookup(&self, address: &str) -> GeocodeOutcome {
        match self.search(address).await {
            Ok(coordinate) => {
                tracing::debug!(address, %coordinate, "geocoded address");
                GeocodeOutcome::Found(coordinate)
            }
            Err(reason) => {
                tracing::debug!(address, reason = %reason, "geocoding lookup found nothing");
                GeocodeOutcome::NotFound(reason)
            }
        }
    }
}

/// Parses a Nominatim JSON result list and returns the first match.
///
/// Coordinates must parse to finite numbers; `"NaN"` or `"inf"` are
/// rejected rather than fed into the distance formula.
pub(crate) fn parse_search_response(body: &str) -> Result<Coordinate, NotFoundReason> {
    let places: Vec<NominatimPlace> = serde_json::from_str(body)
        .map_err(|e| NotFoundReason::MalformedResponse(e.to_string()))?;

    let place = places.into_iter().next().ok_or(NotFoundReason::NoMatch)?;

    let lat = place.lat.trim().parse::<f64>().ok();
    let lon = place.lon.trim().parse::<f64>().ok();

    lat.zip(lon)
        .and_then(|(lat, lon)| Coordinate::finite(lat, lon))
        .ok_or_else(|| NotFoundReason::InvalidCoordinate {
            lat: place.lat,
            lon: place.lon,
        })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
