// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Forward and reverse geocoding via the external search service
//!
//! Search degrades to "no suggestions" and reverse lookup to a bare
//! coordinate label; neither ever surfaces an error to the caller. Queries
//! under three characters are rejected locally to avoid flooding the
//! external service with noise.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use shared_types::{AddressSearchResult, LatLon};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_LANGUAGE: &str = "vi";
const DEFAULT_COUNTRY_CODES: &str = "vn";
const DEFAULT_RESULT_LIMIT: u32 = 5;
const DEFAULT_TIMEOUT_SECONDS: u64 = 4;
const MIN_QUERY_CHARS: usize = 3;
const USER_AGENT: &str = "heritage-atlas/0.1.0";
const FALLBACK_PLACE_NAME: &str = "Vị trí đã chọn";

/// Configuration for the geocoding service client
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    /// Base URL of the geocoding service
    pub base_url: String,
    /// Language sent as `Accept-Language`
    pub language: String,
    /// Country restriction for forward search
    pub country_codes: String,
    /// Maximum number of forward-search results
    pub result_limit: u32,
    /// Request deadline in seconds
    pub timeout_seconds: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            country_codes: DEFAULT_COUNTRY_CODES.to_string(),
            result_limit: DEFAULT_RESULT_LIMIT,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Errors internal to the geocoding adapter
///
/// These never escape the public lookups; they select the degraded outputs.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded its deadline
    #[error("request timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    /// Geocoding service answered with a non-success status
    #[error("geocoding service returned status {status}")]
    Status { status: u16 },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// One forward-search hit from the geocoding service.
#[derive(Debug, Deserialize)]
struct GeocoderPlace {
    display_name: String,
    // The service renders coordinates as strings.
    lat: String,
    lon: String,
}

/// Reverse-lookup response shape.
#[derive(Debug, Deserialize)]
struct GeocoderReverse {
    #[serde(default)]
    display_name: Option<String>,
}

/// Client for the external geocoding service.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    config: GeocodingConfig,
}

impl GeocodingClient {
    /// Create a geocoding client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot
    /// be constructed.
    pub fn new(config: GeocodingConfig) -> Result<Self, GeocodingError> {
        if config.base_url.trim().is_empty() {
            return Err(GeocodingError::Config(
                "base URL cannot be empty".to_string(),
            ));
        }

        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client, config })
    }

    /// Forward-search addresses matching a free-text query.
    ///
    /// Queries under three characters return empty without any network call;
    /// any service failure also yields an empty list.
    pub async fn search_address(&self, query: &str) -> Vec<AddressSearchResult> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        match self.request_search(query).await {
            Ok(results) => results,
            Err(error) => {
                warn!(%error, query, "address search unavailable, degrading to no suggestions");
                Vec::new()
            }
        }
    }

    /// Resolve a human-readable label for a coordinate.
    ///
    /// Any failure yields the coordinates formatted to four decimals.
    pub async fn reverse_geocode(&self, coords: LatLon) -> String {
        match self.request_reverse(coords).await {
            Ok(label) => label,
            Err(error) => {
                warn!(%error, "reverse geocoding unavailable, using coordinate label");
                coords.to_string()
            }
        }
    }

    async fn request_search(
        &self,
        query: &str,
    ) -> Result<Vec<AddressSearchResult>, GeocodingError> {
        let url = format!("{}/search", self.config.base_url);
        let limit = self.config.result_limit.to_string();
        debug!(url, query, "forward geocoding");

        let request = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("limit", limit.as_str()),
                ("countrycodes", self.config.country_codes.as_str()),
            ])
            .header("Accept-Language", &self.config.language);

        let response = self.send_with_deadline(request).await?;
        let places: Vec<GeocoderPlace> = response.json().await?;

        Ok(places
            .into_iter()
            .map(|place| {
                let name = place
                    .display_name
                    .split(',')
                    .next()
                    .unwrap_or_default()
                    .to_string();
                AddressSearchResult {
                    name,
                    coordinates: LatLon::new(
                        place.lat.parse().unwrap_or(0.0),
                        place.lon.parse().unwrap_or(0.0),
                    ),
                    address: place.display_name,
                }
            })
            .collect())
    }

    async fn request_reverse(&self, coords: LatLon) -> Result<String, GeocodingError> {
        let url = format!("{}/reverse", self.config.base_url);
        let lat = coords.lat.to_string();
        let lon = coords.lon.to_string();
        debug!(url, %coords, "reverse geocoding");

        let request = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("zoom", "18"),
                ("addressdetails", "1"),
            ])
            .header("Accept-Language", &self.config.language);

        let response = self.send_with_deadline(request).await?;
        let place: GeocoderReverse = response.json().await?;

        Ok(place
            .display_name
            .filter(|name| !name.is_empty())
            .and_then(|name| name.split(',').next().map(str::to_string))
            .unwrap_or_else(|| FALLBACK_PLACE_NAME.to_string()))
    }

    async fn send_with_deadline(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, GeocodingError> {
        let deadline = Duration::from_secs(self.config.timeout_seconds);
        let response = timeout(deadline, request.send())
            .await
            .map_err(|_| GeocodingError::Timeout {
                timeout_seconds: deadline.as_secs(),
            })??;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}
