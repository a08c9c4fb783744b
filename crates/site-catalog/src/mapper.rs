// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Pure mappers from raw rows into the domain model
//!
//! Total functions, no I/O. Coordinate coercion bottoms out at `0.0`, which
//! the domain model reads as "missing"; year coercion bottoms out at `None`,
//! never zero.

use std::collections::HashMap;

use serde_json::Value;
use shared_types::{EntityId, Person, Site};

use crate::raw::{RawCity, RawLocation, RawPerson, SiteRow};

const FALLBACK_SITE_NAME: &str = "Không tên";
const FALLBACK_SITE_TYPE: &str = "Di tích";
const CITY_SITE_TYPE: &str = "Thành phố";

/// Map either raw site shape into a [`Site`].
pub fn map_site(row: &SiteRow) -> Site {
    match row {
        SiteRow::City(city) => map_city(city),
        SiteRow::Location(location) => map_location(location),
    }
}

fn map_city(city: &RawCity) -> Site {
    let mut additional_info = HashMap::new();
    additional_info.insert("City ID".to_string(), city.city_id.normalized());

    Site {
        site_id: city.city_id.to_entity_id(),
        site_name: city.city_name.clone(),
        site_type: CITY_SITE_TYPE.to_string(),
        latitude: coerce_coordinate(city.lat.as_ref()),
        longitude: coerce_coordinate(city.lng.as_ref()),
        address: None,
        established_year: None,
        status: None,
        description: None,
        additional_info,
    }
}

fn map_location(location: &RawLocation) -> Site {
    let mut additional_info = HashMap::new();
    additional_info.insert("Key".to_string(), location.location_key.normalized());
    additional_info.insert(
        "City ID".to_string(),
        location
            .city_id
            .as_ref()
            .map(|key| key.normalized())
            .unwrap_or_default(),
    );

    Site {
        site_id: non_empty(&location.location_id)
            .map(EntityId::Text)
            .unwrap_or_else(|| EntityId::Text(location.location_key.normalized())),
        site_name: non_empty(&location.location_name)
            .unwrap_or_else(|| FALLBACK_SITE_NAME.to_string()),
        site_type: non_empty(&location.location_type)
            .unwrap_or_else(|| FALLBACK_SITE_TYPE.to_string()),
        latitude: coerce_coordinate(location.latitude.as_ref()),
        longitude: coerce_coordinate(location.longitude.as_ref()),
        address: non_empty(&location.address),
        established_year: None,
        status: None,
        description: non_empty(&location.location_description),
        additional_info,
    }
}

/// Map a raw person row into a [`Person`].
pub fn map_person(raw: &RawPerson) -> Person {
    Person {
        person_id: non_empty(&raw.person_id)
            .map(EntityId::Text)
            .unwrap_or_else(|| raw.person_key.to_entity_id()),
        full_name: non_empty(&raw.person_name).unwrap_or_else(|| FALLBACK_SITE_NAME.to_string()),
        birth_year: parse_year(raw.birth_year.as_ref()),
        death_year: parse_year(raw.death_year.as_ref()),
    }
}

/// Coerce a raw coordinate value; non-numeric input means "missing" (0.0).
pub(crate) fn coerce_coordinate(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Parse a raw year value.
///
/// Non-numeric input and the year zero (including the literal string `"0"`)
/// both resolve to absent. Excluding year zero mirrors the upstream
/// behavior; see the mapper tests.
pub(crate) fn parse_year(value: Option<&Value>) -> Option<i32> {
    let year = match value {
        Some(Value::Number(n)) => i32::try_from(n.as_i64()?).ok()?,
        Some(Value::String(s)) => s.trim().parse().ok()?,
        _ => return None,
    };
    (year != 0).then_some(year)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}
