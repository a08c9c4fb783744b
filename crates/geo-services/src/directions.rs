// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Turn-by-turn directions via the external routing service
//!
//! Translates the service's (lon, lat) GeoJSON and maneuver vocabulary into
//! (lat, lon) geometry and localized instruction phrases. When the service
//! is unreachable the adapter synthesizes a great-circle straight-line
//! estimate instead of failing.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use shared_types::{LatLon, RouteData, RouteStep, RouteSummary};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";
const DEFAULT_TIMEOUT_SECONDS: u64 = 8;
const USER_AGENT: &str = "heritage-atlas/0.1.0";
const EARTH_RADIUS_KM: f64 = 6371.0;

// Localized maneuver phrase table.
const PHRASE_DEPART: &str = "Khởi hành";
const PHRASE_ARRIVE: &str = "Bạn đã đến đích";
const PHRASE_TURN_LEFT: &str = "Rẽ trái";
const PHRASE_TURN_RIGHT: &str = "Rẽ phải";
const PHRASE_TURN: &str = "Rẽ";
const PHRASE_CONTINUE: &str = "Đi tiếp";
const PHRASE_STREET_CONNECTIVE: &str = "vào";
const PHRASE_DURATION_UNIT: &str = "phút";
/// Sentinel duration label marking a straight-line estimate.
pub const OFFLINE_DURATION_LABEL: &str = "Đường chim bay";
const OFFLINE_STEP_INSTRUCTION: &str = "Chế độ offline: Đi thẳng đến đích";

/// Configuration for the routing service client
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// Base URL of the routing service
    pub base_url: String,
    /// Request deadline in seconds
    pub timeout_seconds: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Errors internal to the directions adapter
///
/// These never escape [`DirectionsClient::fetch_directions`]; they select
/// the straight-line fallback.
#[derive(Debug, Error)]
pub enum DirectionsError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded its deadline
    #[error("request timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    /// Routing service answered with a non-success status
    #[error("routing service returned status {status}")]
    Status { status: u16 },

    /// Service answered but produced no usable route
    #[error("no route found")]
    NoRoute,

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Routing service response envelope.
#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    name: String,
    distance: f64,
    maneuver: OsrmManeuver,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    modifier: Option<String>,
    #[serde(default)]
    exit: Option<u32>,
}

/// Client for the external routing service.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    client: Client,
    config: DirectionsConfig,
}

impl DirectionsClient {
    /// Create a routing client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot
    /// be constructed.
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        if config.base_url.trim().is_empty() {
            return Err(DirectionsError::Config(
                "base URL cannot be empty".to_string(),
            ));
        }

        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client, config })
    }

    /// Resolve driving directions between two points.
    ///
    /// Total: any service failure (timeout, bad status, empty route list)
    /// falls back to a straight-line estimate with the offline sentinel
    /// duration and a two-point geometry.
    pub async fn fetch_directions(&self, start: LatLon, end: LatLon) -> RouteData {
        match self.request_route(start, end).await {
            Ok(route) => route,
            Err(error) => {
                warn!(%error, "routing service unavailable, falling back to straight line");
                straight_line_route(start, end)
            }
        }
    }

    async fn request_route(
        &self,
        start: LatLon,
        end: LatLon,
    ) -> Result<RouteData, DirectionsError> {
        // The routing service keys path segments as lon,lat.
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?steps=true&geometries=geojson&overview=full",
            self.config.base_url, start.lon, start.lat, end.lon, end.lat
        );
        debug!(url, "requesting route");

        let deadline = Duration::from_secs(self.config.timeout_seconds);
        let response = timeout(deadline, self.client.get(&url).send())
            .await
            .map_err(|_| DirectionsError::Timeout {
                timeout_seconds: deadline.as_secs(),
            })??;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectionsError::Status {
                status: status.as_u16(),
            });
        }

        let payload: OsrmResponse = response.json().await?;
        if payload.code != "Ok" {
            return Err(DirectionsError::NoRoute);
        }

        let OsrmRoute {
            distance,
            duration,
            geometry,
            legs,
        } = payload
            .routes
            .into_iter()
            .next()
            .ok_or(DirectionsError::NoRoute)?;
        let leg = legs.into_iter().next().ok_or(DirectionsError::NoRoute)?;

        let steps = leg
            .steps
            .iter()
            .map(|step| RouteStep {
                instruction: instruction_text(&step.maneuver, &step.name),
                distance: format_distance(step.distance),
            })
            .collect();

        // Swap the service's (lon, lat) into domain (lat, lon).
        let route_geometry = geometry
            .coordinates
            .iter()
            .map(|pair| LatLon::new(pair[1], pair[0]))
            .collect();

        Ok(RouteData {
            summary: RouteSummary {
                total_distance: format_distance(distance),
                total_duration: format_duration(duration),
            },
            steps,
            route_geometry,
        })
    }
}

/// Translate a maneuver into a localized instruction.
fn instruction_text(maneuver: &OsrmManeuver, street: &str) -> String {
    let action = match maneuver.kind.as_str() {
        "depart" => PHRASE_DEPART.to_string(),
        "arrive" => return PHRASE_ARRIVE.to_string(),
        "turn" | "fork" | "end of road" => match maneuver.modifier.as_deref() {
            Some(modifier) if modifier.contains("left") => PHRASE_TURN_LEFT.to_string(),
            Some(modifier) if modifier.contains("right") => PHRASE_TURN_RIGHT.to_string(),
            _ => PHRASE_TURN.to_string(),
        },
        "roundabout" => format!(
            "Đi vào vòng xuyến (lối ra {})",
            maneuver.exit.unwrap_or(1)
        ),
        _ => PHRASE_CONTINUE.to_string(),
    };

    if street.is_empty() {
        action
    } else {
        format!("{action} {PHRASE_STREET_CONNECTIVE} {street}")
    }
}

/// Format a distance in meters: empty under 1 m, meters under 1 km,
/// kilometers with one decimal at or above.
fn format_distance(meters: f64) -> String {
    if meters < 1.0 {
        return String::new();
    }
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round() as i64)
    }
}

fn format_duration(seconds: f64) -> String {
    format!("{} {PHRASE_DURATION_UNIT}", (seconds / 60.0).round() as i64)
}

/// Great-circle distance between two coordinates.
fn haversine_km(a: LatLon, b: LatLon) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// The terminal fallback: a synthesized straight-line route.
fn straight_line_route(start: LatLon, end: LatLon) -> RouteData {
    RouteData {
        summary: RouteSummary {
            total_distance: format_distance(haversine_km(start, end) * 1000.0),
            total_duration: OFFLINE_DURATION_LABEL.to_string(),
        },
        steps: vec![RouteStep {
            instruction: OFFLINE_STEP_INSTRUCTION.to_string(),
            distance: String::new(),
        }],
        route_geometry: vec![start, end],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maneuver(kind: &str, modifier: Option<&str>, exit: Option<u32>) -> OsrmManeuver {
        OsrmManeuver {
            kind: kind.to_string(),
            modifier: modifier.map(str::to_string),
            exit,
        }
    }

    #[test]
    fn distance_formatting_boundaries() {
        assert_eq!(format_distance(0.4), "");
        assert_eq!(format_distance(850.4), "850 m");
        assert_eq!(format_distance(999.9), "1000 m");
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(1234.5), "1.2 km");
    }

    #[test]
    fn duration_rounds_to_whole_minutes() {
        assert_eq!(format_duration(300.0), "5 phút");
        assert_eq!(format_duration(89.0), "1 phút");
    }

    #[test]
    fn instruction_phrases() {
        assert_eq!(
            instruction_text(&maneuver("depart", None, None), "Lê Duẩn"),
            "Khởi hành vào Lê Duẩn"
        );
        // Arrival ignores the street name.
        assert_eq!(
            instruction_text(&maneuver("arrive", None, None), "Lê Duẩn"),
            "Bạn đã đến đích"
        );
        assert_eq!(
            instruction_text(&maneuver("turn", Some("sharp left"), None), ""),
            "Rẽ trái"
        );
        assert_eq!(
            instruction_text(&maneuver("fork", Some("slight right"), None), ""),
            "Rẽ phải"
        );
        assert_eq!(
            instruction_text(&maneuver("end of road", Some("straight"), None), ""),
            "Rẽ"
        );
        assert_eq!(
            instruction_text(&maneuver("roundabout", None, Some(2)), ""),
            "Đi vào vòng xuyến (lối ra 2)"
        );
        assert_eq!(
            instruction_text(&maneuver("roundabout", None, None), ""),
            "Đi vào vòng xuyến (lối ra 1)"
        );
        assert_eq!(
            instruction_text(&maneuver("merge", None, None), ""),
            "Đi tiếp"
        );
    }

    #[test]
    fn haversine_matches_known_separation() {
        // One degree of latitude is roughly 111.2 km.
        let a = LatLon::new(16.0, 108.0);
        let b = LatLon::new(17.0, 108.0);
        let km = haversine_km(a, b);
        assert!((km - 111.2).abs() < 0.5, "got {km}");
    }

    #[test]
    fn straight_line_route_shape() {
        let start = LatLon::new(16.0613, 108.2274);
        let end = LatLon::new(16.0544, 108.2488);
        let route = straight_line_route(start, end);

        assert_eq!(route.summary.total_duration, OFFLINE_DURATION_LABEL);
        assert_eq!(route.route_geometry, vec![start, end]);
        assert_eq!(route.steps.len(), 1);
        assert_eq!(route.steps[0].instruction, "Chế độ offline: Đi thẳng đến đích");
        assert_eq!(route.steps[0].distance, "");
    }
}
