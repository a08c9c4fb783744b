// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Core entity model: sites, persons, media and events
//!
//! These are the denormalized, display-ready shapes reconstructed from the
//! upstream fact/dimension tables. Identity is source-system dependent and
//! may arrive as either a number or a string; [`EntityId`] preserves the
//! original form while [`EntityId::as_key`] gives the normalized comparison
//! form used for every join and de-duplication decision.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an upstream entity, number or string depending on the
/// source system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Numeric identity (e.g. a surrogate key)
    Int(i64),
    /// String identity (e.g. a business key like `"LOC-017"`)
    Text(String),
}

impl EntityId {
    /// Normalized string form used for identity comparison.
    ///
    /// Numeric and string renderings of the same id compare equal
    /// (`Int(7)` and `Text("7")` both normalize to `"7"`); surrounding
    /// whitespace in string ids is ignored.
    pub fn as_key(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A displayable place on the map: a historical location or a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Site identity
    pub site_id: EntityId,
    /// Display name
    pub site_name: String,
    /// Free-form category (not a closed enum)
    pub site_type: String,
    /// Latitude; `0.0` means "missing" and excludes the site from listings
    pub latitude: f64,
    /// Longitude; `0.0` means "missing" and excludes the site from listings
    pub longitude: f64,
    /// Street address, when known
    pub address: Option<String>,
    /// Year the site was established, when known
    pub established_year: Option<i32>,
    /// Operational / heritage status label
    pub status: Option<String>,
    /// Long-form description
    pub description: Option<String>,
    /// Supplementary labeled facts, open string-keyed
    #[serde(default)]
    pub additional_info: HashMap<String, String>,
}

impl Site {
    /// Whether the site carries displayable coordinates.
    ///
    /// Zero is treated as "missing"; coordinates on the equator or prime
    /// meridian are out of this domain.
    pub fn has_coordinates(&self) -> bool {
        self.latitude != 0.0 && self.longitude != 0.0
    }
}

/// A historical person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Person identity
    pub person_id: EntityId,
    /// Full display name
    pub full_name: String,
    /// Birth year; absent when unknown or unparseable
    pub birth_year: Option<i32>,
    /// Death year; absent when unknown or unparseable
    pub death_year: Option<i32>,
}

/// Kind of media attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image
    #[default]
    Image,
    /// Video (raw `"youtube"` normalizes here)
    Video,
}

impl MediaKind {
    /// Normalize the upstream free-text media type.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("video") | Some("youtube") => Self::Video,
            _ => Self::Image,
        }
    }
}

/// A media attachment on an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Media identity
    pub media_id: EntityId,
    /// URL of the image or video
    pub media_url: String,
    /// Normalized media kind
    pub media_type: MediaKind,
    /// Caption; empty when the source carries none
    pub caption: String,
    /// Preview image URL, when available
    pub thumbnail_url: Option<String>,
}

/// A historical event with its hydrated person and media relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event identity
    pub event_id: EntityId,
    /// Display name
    pub event_name: String,
    /// Free-form start date string (not necessarily a valid calendar date)
    pub start_date: Option<String>,
    /// Free-form end date string
    pub end_date: Option<String>,
    /// Long-form description
    pub description: String,
    /// Persons attached via person-event relations
    pub persons: Vec<Person>,
    /// Media attached via event-media relations
    pub media: Vec<Media>,
    /// Back-reference to the related site, when the event is site-scoped
    pub related_site_id: Option<EntityId>,
    /// Name of the related site, when resolved
    pub related_site_name: Option<String>,
}

/// A site together with its hydrated events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDetail {
    /// The base site
    #[serde(flatten)]
    pub site: Site,
    /// Events that took place at this site
    pub events: Vec<Event>,
}

/// A person together with biography, events and aggregated media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDetail {
    /// The base person
    #[serde(flatten)]
    pub person: Person,
    /// Long-form biography; empty when the source carries none
    pub biography: String,
    /// All media across the person's events (duplicates retained)
    pub media: Vec<Media>,
    /// Events this person is linked to
    pub events: Vec<Event>,
}
