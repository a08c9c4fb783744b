// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Output types of the routing and geocoding adapters

use std::fmt;

use serde::{Deserialize, Serialize};

/// A geographic coordinate in (latitude, longitude) order.
///
/// The routing service speaks (lon, lat); adapters swap into this shape so
/// everything downstream agrees on one order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl LatLon {
    /// Create a coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// One turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Localized human instruction
    pub instruction: String,
    /// Formatted step distance; empty when negligible
    pub distance: String,
}

/// Formatted totals for a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Formatted total distance (`"850 m"` / `"3.2 km"`)
    pub total_distance: String,
    /// Formatted total duration in whole minutes, or the offline sentinel
    pub total_duration: String,
}

/// A resolved route: summary, steps and display geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteData {
    /// Route totals
    pub summary: RouteSummary,
    /// Turn-by-turn steps
    pub steps: Vec<RouteStep>,
    /// Polyline in (lat, lon) order; exactly two points for the offline
    /// straight-line fallback
    pub route_geometry: Vec<LatLon>,
}

/// One forward-geocoding suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressSearchResult {
    /// Short display name (first segment of the full address)
    pub name: String,
    /// Full formatted address
    pub address: String,
    /// Resolved coordinates
    pub coordinates: LatLon,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lat_lon_display_uses_four_decimals() {
        let coords = LatLon::new(16.05443321, 108.24879);
        assert_eq!(coords.to_string(), "16.0544, 108.2488");
    }
}
