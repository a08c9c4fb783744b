// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Raw upstream row shapes
//!
//! Field names here are fixed by the upstream schema and must not be
//! renamed at the source; translation into the domain model happens in
//! [`crate::mapper`]. Keys arrive as numbers or strings depending on which
//! export produced the row, so every key field is a [`RawKey`] and every
//! join compares [`RawKey::normalized`] forms.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::EntityId;

/// An upstream foreign key, number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawKey {
    /// Numeric key
    Int(i64),
    /// String key
    Text(String),
}

impl RawKey {
    /// Trim-normalized string form; the comparison form for all joins.
    pub fn normalized(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }

    /// Convert into a domain identity, preserving the raw form.
    pub fn to_entity_id(&self) -> EntityId {
        match self {
            Self::Int(n) => EntityId::Int(*n),
            Self::Text(s) => EntityId::Text(s.clone()),
        }
    }
}

impl fmt::Display for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A location dimension row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    /// Surrogate key
    pub location_key: RawKey,
    /// Business identifier
    #[serde(default)]
    pub location_id: Option<String>,
    /// Display name
    #[serde(default)]
    pub location_name: Option<String>,
    /// Long-form description
    #[serde(default)]
    pub location_description: Option<String>,
    /// Street address
    #[serde(default)]
    pub address: Option<String>,
    /// Free-form category
    #[serde(default)]
    pub location_type: Option<String>,
    /// Latitude, number or numeric string
    #[serde(default)]
    pub latitude: Option<Value>,
    /// Longitude, number or numeric string
    #[serde(default)]
    pub longitude: Option<Value>,
    /// Owning city, when assigned
    #[serde(default)]
    pub city_id: Option<RawKey>,
}

/// A city row; a coarser kind of site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCity {
    /// City identifier
    pub city_id: RawKey,
    /// City name; the discriminating field against [`RawLocation`]
    pub city_name: String,
    /// Latitude, number or numeric string
    #[serde(default)]
    pub lat: Option<Value>,
    /// Longitude, number or numeric string
    #[serde(default)]
    pub lng: Option<Value>,
}

/// Either raw shape a site can arrive as.
///
/// Discriminated by the presence of `city_name`: rows carrying it decode as
/// cities, everything else must carry a `location_key` to decode at all.
/// Malformed rows fail decoding here, before any mapping logic runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiteRow {
    /// City shape
    City(RawCity),
    /// Location shape
    Location(RawLocation),
}

/// An event fact row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Surrogate key
    pub event_key: RawKey,
    /// Business identifier
    #[serde(default)]
    pub event_id: Option<String>,
    /// Display name
    #[serde(default)]
    pub event_name: Option<String>,
    /// Free-form date string
    #[serde(default)]
    pub event_date: Option<String>,
    /// Long-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Location the event took place at
    #[serde(default)]
    pub location_key: Option<RawKey>,
    /// Principal person, when designated
    #[serde(default)]
    pub main_person_key: Option<RawKey>,
}

/// A media dimension row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMedia {
    /// Surrogate key
    pub media_key: RawKey,
    /// Business identifier
    #[serde(default)]
    pub media_id: Option<String>,
    /// Media URL
    #[serde(default)]
    pub media: Option<String>,
    /// Free-text media type (`"image"`, `"video"`, `"youtube"`, ...)
    #[serde(default)]
    pub media_type: Option<String>,
}

/// An event-media relation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEventMedia {
    /// Media side of the relation
    pub media_key: RawKey,
    /// Event side of the relation
    pub event_key: RawKey,
}

/// A person-event relation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPersonEvent {
    /// Person side of the relation
    pub person_key: RawKey,
    /// Event side of the relation
    pub event_key: RawKey,
    /// Role the person played, when recorded
    #[serde(default)]
    pub role: Option<String>,
}

/// A person dimension row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPerson {
    /// Surrogate key
    pub person_key: RawKey,
    /// Business identifier
    #[serde(default)]
    pub person_id: Option<String>,
    /// Full name
    #[serde(default)]
    pub person_name: Option<String>,
    /// Birth year, number or string
    #[serde(default)]
    pub birth_year: Option<Value>,
    /// Death year, number or string
    #[serde(default)]
    pub death_year: Option<Value>,
    /// Birthplace, when recorded
    #[serde(default)]
    pub birthplace: Option<String>,
    /// Long-form biography
    #[serde(default)]
    pub biography: Option<String>,
}
