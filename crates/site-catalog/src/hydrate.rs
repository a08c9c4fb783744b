// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Event hydration: joining raw events against the reference tables
//!
//! Pure over its inputs. A relation whose dimension row is missing is
//! dropped silently; completeness gaps are expected in this dataset and
//! degrade to a thinner event rather than an error.

use shared_types::{EntityId, Event, Media, MediaKind};

use crate::mapper::map_person;
use crate::raw::{RawEvent, RawMedia};
use crate::reference::ReferenceStore;

/// Hydrate raw events with their media and person dimensions.
pub fn hydrate_events(reference: &ReferenceStore, raw_events: &[RawEvent]) -> Vec<Event> {
    raw_events
        .iter()
        .map(|event| hydrate_event(reference, event))
        .collect()
}

fn hydrate_event(reference: &ReferenceStore, event: &RawEvent) -> Event {
    let event_key = event.event_key.normalized();

    let media = reference
        .media_keys_for_event(&event_key)
        .iter()
        .filter_map(|key| reference.media(key))
        .map(map_media)
        .collect();

    let persons = reference
        .person_keys_for_event(&event_key)
        .iter()
        .filter_map(|key| reference.person(key))
        .map(map_person)
        .collect();

    Event {
        event_id: event
            .event_id
            .clone()
            .filter(|id| !id.is_empty())
            .map(EntityId::Text)
            .unwrap_or_else(|| EntityId::Text(event_key)),
        event_name: event.event_name.clone().unwrap_or_default(),
        start_date: event.event_date.clone(),
        end_date: None,
        description: event.description.clone().unwrap_or_default(),
        persons,
        media,
        related_site_id: event
            .location_key
            .as_ref()
            .map(|key| key.to_entity_id()),
        related_site_name: None,
    }
}

fn map_media(raw: &RawMedia) -> Media {
    Media {
        media_id: raw
            .media_id
            .clone()
            .filter(|id| !id.is_empty())
            .map(EntityId::Text)
            .unwrap_or_else(|| raw.media_key.to_entity_id()),
        media_url: raw.media.clone().unwrap_or_default(),
        media_type: MediaKind::from_raw(raw.media_type.as_deref()),
        // The relation rows carry no per-attachment caption.
        caption: String::new(),
        thumbnail_url: None,
    }
}
