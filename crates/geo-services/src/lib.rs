// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! External geo-service adapters
//!
//! Clients for the turn-by-turn routing service and the forward/reverse
//! geocoder. Both adapters are terminal error boundaries: every failure mode
//! maps to a defined degraded output, so callers see reduced functionality
//! instead of errors.

pub mod directions;
pub mod geocoding;

pub use directions::{DirectionsClient, DirectionsConfig, DirectionsError};
pub use geocoding::{GeocodingClient, GeocodingConfig, GeocodingError};
