// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! The catalog service: fetch, cache, load and join
//!
//! One `CatalogService` per process is the intended shape. It owns the
//! fetcher, the list cache and the reference store, and is passed to
//! whatever drives the UI instead of living behind module globals. Every
//! public method returns a defined value; unknown ids resolve to `None`
//! and network trouble degrades to empty collections.

use std::collections::HashSet;

use data_transport::{ApiConfig, ApiFetcher, TransportError, extract_rows};
use shared_types::{EntityId, Person, PersonDetail, Site, SiteDetail};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::cache::{CacheConfig, EntityCache};
use crate::hydrate::hydrate_events;
use crate::mapper::{map_person, map_site};
use crate::raw::{RawEvent, RawPerson, SiteRow};
use crate::reference::ReferenceStore;

const SITES_CACHE_KEY: &str = "sites";
const PERSONS_CACHE_KEY: &str = "persons";

/// Configuration for the catalog service
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// Upstream transport configuration
    pub api: ApiConfig,
    /// List cache configuration
    pub cache: CacheConfig,
}

/// The data reconciliation context object.
#[derive(Debug)]
pub struct CatalogService {
    fetcher: ApiFetcher,
    cache: EntityCache,
    reference: OnceCell<ReferenceStore>,
}

impl CatalogService {
    /// Create a catalog service.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport configuration is invalid.
    pub fn new(config: CatalogConfig) -> Result<Self, TransportError> {
        Ok(Self {
            fetcher: ApiFetcher::new(config.api)?,
            cache: EntityCache::new(config.cache),
            reference: OnceCell::new(),
        })
    }

    /// Fetch the displayable site list.
    ///
    /// Locations and cities are fetched concurrently and merged: sites
    /// without both coordinates are excluded, and where a city and a
    /// location share an external id the location wins.
    pub async fn fetch_sites(&self) -> Vec<Site> {
        if let Some(sites) = self.cache.get::<Vec<Site>>(SITES_CACHE_KEY) {
            debug!(count = sites.len(), "serving site list from cache");
            return sites;
        }

        let (locations, cities) = tokio::join!(
            self.fetcher.fetch("/locations"),
            self.fetcher.fetch("/cities"),
        );

        let mut sites = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for row in extract_rows::<SiteRow>(&locations) {
            let site = map_site(&row);
            if site.has_coordinates() {
                seen.insert(site.site_id.as_key());
                sites.push(site);
            }
        }
        for row in extract_rows::<SiteRow>(&cities) {
            let site = map_site(&row);
            if seen.contains(&site.site_id.as_key()) {
                // A location already claimed this id; the finer record wins.
                continue;
            }
            if site.has_coordinates() {
                sites.push(site);
            }
        }

        info!(count = sites.len(), "site list assembled");
        self.cache.set(SITES_CACHE_KEY, &sites);
        sites
    }

    /// Fetch the person list.
    pub async fn fetch_persons(&self) -> Vec<Person> {
        if let Some(persons) = self.cache.get::<Vec<Person>>(PERSONS_CACHE_KEY) {
            debug!(count = persons.len(), "serving person list from cache");
            return persons;
        }

        let response = self.fetcher.fetch("/persons").await;
        let persons: Vec<Person> = extract_rows::<RawPerson>(&response)
            .iter()
            .map(map_person)
            .collect();

        info!(count = persons.len(), "person list assembled");
        self.cache.set(PERSONS_CACHE_KEY, &persons);
        persons
    }

    /// Resolve a site with its hydrated events.
    ///
    /// The base site comes from the cached list when possible, else from the
    /// single-location endpoint; `None` means the id is unknown. A failing
    /// events fetch degrades to an empty event list and never hides the
    /// base entity.
    pub async fn site_detail(&self, site_id: &EntityId) -> Option<SiteDetail> {
        let wanted = site_id.as_key();

        let mut site = self
            .cache
            .get::<Vec<Site>>(SITES_CACHE_KEY)
            .and_then(|sites| sites.into_iter().find(|s| s.site_id.as_key() == wanted));

        if site.is_none() {
            let response = self.fetcher.fetch(&format!("/locations/{site_id}")).await;
            site = extract_rows::<SiteRow>(&response).first().map(map_site);
        }
        let site = site?;

        let events_path = format!("/events/location/{site_id}");
        let (events_response, reference) = tokio::join!(
            self.fetcher.fetch_silent(&events_path),
            self.ensure_reference_loaded(),
        );

        let raw_events: Vec<RawEvent> = extract_rows(&events_response);
        let events = hydrate_events(reference, &raw_events);
        debug!(site = %wanted, events = events.len(), "site detail resolved");

        Some(SiteDetail { site, events })
    }

    /// Resolve a person with biography, events and aggregated media.
    ///
    /// There is no person-scoped event endpoint upstream; when the person
    /// has linked events the full catalog is fetched and filtered here. With
    /// zero linked events that scan is skipped entirely.
    pub async fn person_detail(&self, person_id: &EntityId) -> Option<PersonDetail> {
        let response = self.fetcher.fetch(&format!("/persons/{person_id}")).await;
        let raw = extract_rows::<RawPerson>(&response).into_iter().next()?;

        let person = map_person(&raw);
        let biography = raw.biography.clone().unwrap_or_default();
        let person_key = raw.person_key.normalized();

        let reference = self.ensure_reference_loaded().await;
        let linked = reference.event_keys_for_person(&person_key);
        if linked.is_empty() {
            debug!(person = %person_key, "no linked events, skipping event catalog scan");
            return Some(PersonDetail {
                person,
                biography,
                media: Vec::new(),
                events: Vec::new(),
            });
        }

        let events_response = self.fetcher.fetch("/events").await;
        let raw_events: Vec<RawEvent> = extract_rows::<RawEvent>(&events_response)
            .into_iter()
            .filter(|event| linked.contains(&event.event_key.normalized()))
            .collect();

        let events = hydrate_events(reference, &raw_events);
        // Duplicates across events are retained; the gallery view wants them.
        let media = events
            .iter()
            .flat_map(|event| event.media.iter().cloned())
            .collect();
        debug!(person = %person_key, events = events.len(), "person detail resolved");

        Some(PersonDetail {
            person,
            biography,
            media,
            events,
        })
    }

    /// Load the reference join tables, at most once per session.
    ///
    /// Concurrent callers share one in-flight load. The store is marked
    /// loaded after that single attempt even if portions of it failed; a
    /// failed portion joins as empty for the rest of the session.
    pub async fn ensure_reference_loaded(&self) -> &ReferenceStore {
        self.reference
            .get_or_init(|| load_reference(&self.fetcher))
            .await
    }
}

async fn load_reference(fetcher: &ApiFetcher) -> ReferenceStore {
    debug!("loading reference data");

    let (media_res, event_media_res, person_events_res, persons_res) = tokio::join!(
        fetcher.fetch("/media"),
        fetcher.fetch("/event-media"),
        fetcher.fetch("/person-events"),
        fetcher.fetch("/persons"),
    );

    let store = ReferenceStore::new(
        extract_rows(&media_res),
        extract_rows(&event_media_res),
        extract_rows(&person_events_res),
        extract_rows(&persons_res),
    );

    let (media, event_media, person_events, persons) = store.counts();
    info!(media, event_media, person_events, persons, "reference data loaded");
    store
}
