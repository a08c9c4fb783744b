// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! The Reference Data Store: join tables for hydration
//!
//! Immutable once built; [`crate::service::CatalogService`] owns the single
//! load per session. All lookups go through trim-normalized string keys
//! because upstream mixes numeric and string renderings of the same key.

use std::collections::{HashMap, HashSet};

use crate::raw::{RawEventMedia, RawMedia, RawPerson, RawPersonEvent};

/// Immutable snapshot of the reference join tables.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    media_by_key: HashMap<String, RawMedia>,
    event_media: Vec<RawEventMedia>,
    person_events: Vec<RawPersonEvent>,
    persons_by_key: HashMap<String, RawPerson>,
}

impl ReferenceStore {
    /// Build the store from freshly fetched rows.
    pub fn new(
        media: Vec<RawMedia>,
        event_media: Vec<RawEventMedia>,
        person_events: Vec<RawPersonEvent>,
        persons: Vec<RawPerson>,
    ) -> Self {
        let media_by_key = media
            .into_iter()
            .map(|m| (m.media_key.normalized(), m))
            .collect();
        let persons_by_key = persons
            .into_iter()
            .map(|p| (p.person_key.normalized(), p))
            .collect();

        Self {
            media_by_key,
            event_media,
            person_events,
            persons_by_key,
        }
    }

    /// Look up a media dimension row by normalized key.
    pub fn media(&self, key: &str) -> Option<&RawMedia> {
        self.media_by_key.get(key)
    }

    /// Look up a person dimension row by normalized key.
    pub fn person(&self, key: &str) -> Option<&RawPerson> {
        self.persons_by_key.get(key)
    }

    /// Media keys related to an event, in relation order.
    pub fn media_keys_for_event(&self, event_key: &str) -> Vec<String> {
        self.event_media
            .iter()
            .filter(|relation| relation.event_key.normalized() == event_key)
            .map(|relation| relation.media_key.normalized())
            .collect()
    }

    /// Person keys related to an event, in relation order.
    pub fn person_keys_for_event(&self, event_key: &str) -> Vec<String> {
        self.person_events
            .iter()
            .filter(|relation| relation.event_key.normalized() == event_key)
            .map(|relation| relation.person_key.normalized())
            .collect()
    }

    /// The set of event keys a person is linked to.
    pub fn event_keys_for_person(&self, person_key: &str) -> HashSet<String> {
        self.person_events
            .iter()
            .filter(|relation| relation.person_key.normalized() == person_key)
            .map(|relation| relation.event_key.normalized())
            .collect()
    }

    /// Table sizes, for load-time logging.
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.media_by_key.len(),
            self.event_media.len(),
            self.person_events.len(),
            self.persons_by_key.len(),
        )
    }
}
