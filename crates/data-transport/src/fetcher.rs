// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! The multi-strategy fetcher
//!
//! One logical fetch fans out into a direct request plus one request per
//! configured relay, all launched concurrently. First success wins and the
//! remaining strategies are aborted; there is no completion-order guarantee.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_retry::Retry;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::TransportError;
use crate::proxy::RelayMode;
use crate::response::{decode_payload, empty_result};

const USER_AGENT: &str = "heritage-atlas/0.1.0";

/// One entrant in the fetch race.
#[derive(Debug, Clone)]
struct Strategy {
    label: String,
    url: String,
    mode: RelayMode,
    deadline: Duration,
}

/// Fetcher racing a direct request against the configured relays.
#[derive(Debug, Clone)]
pub struct ApiFetcher {
    client: Client,
    config: ApiConfig,
}

impl ApiFetcher {
    /// Create a fetcher for the given upstream configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot
    /// be constructed.
    pub fn new(config: ApiConfig) -> Result<Self, TransportError> {
        if config.base_url.trim().is_empty() {
            return Err(TransportError::Config(
                "base URL cannot be empty".to_string(),
            ));
        }

        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client, config })
    }

    /// Fetch an endpoint, logging strategy failures at warn level.
    ///
    /// Always resolves: if every strategy fails the empty-result sentinel is
    /// returned, never an error.
    pub async fn fetch(&self, endpoint: &str) -> Value {
        self.fetch_value(endpoint, false).await
    }

    /// Fetch an endpoint without failure logging.
    ///
    /// For callers that expect the endpoint to be flaky or empty and handle
    /// the sentinel themselves.
    pub async fn fetch_silent(&self, endpoint: &str) -> Value {
        self.fetch_value(endpoint, true).await
    }

    async fn fetch_value(&self, endpoint: &str, silent: bool) -> Value {
        let mut race: JoinSet<(String, Result<Value, TransportError>)> = JoinSet::new();

        for strategy in self.strategies(endpoint) {
            let client = self.client.clone();
            let retries = self.config.max_retries;
            let backoff = Duration::from_millis(self.config.retry_backoff_ms);
            race.spawn(async move {
                let outcome = fetch_strategy(&client, &strategy, retries, backoff).await;
                (strategy.label, outcome)
            });
        }

        while let Some(joined) = race.join_next().await {
            let Ok((label, outcome)) = joined else {
                continue;
            };
            match outcome {
                Ok(value) => {
                    debug!(endpoint, strategy = %label, "fetch strategy won the race");
                    return value;
                }
                Err(error) if silent => {
                    debug!(endpoint, strategy = %label, %error, "fetch strategy failed");
                }
                Err(error) => {
                    warn!(endpoint, strategy = %label, %error, "fetch strategy failed");
                }
            }
        }

        if !silent {
            warn!(endpoint, "all fetch strategies failed, degrading to empty result");
        }
        empty_result()
    }

    fn strategies(&self, endpoint: &str) -> Vec<Strategy> {
        let direct_url = format!("{}{}", self.config.base_url, endpoint);

        let mut strategies = vec![Strategy {
            label: "direct".to_string(),
            url: direct_url.clone(),
            mode: RelayMode::Raw,
            deadline: Duration::from_secs(self.config.direct_timeout_seconds),
        }];

        for relay in &self.config.relays {
            strategies.push(Strategy {
                label: format!("relay:{}", relay.base_url),
                url: cache_busted(&relay.rewrite(&direct_url)),
                mode: relay.mode,
                deadline: Duration::from_secs(self.config.proxy_timeout_seconds),
            });
        }

        strategies
    }
}

/// Run one strategy with its bounded retry schedule.
async fn fetch_strategy(
    client: &Client,
    strategy: &Strategy,
    retries: u32,
    backoff: Duration,
) -> Result<Value, TransportError> {
    // Linear backoff: the nth retry waits n x base.
    let delays = (1..=retries).map(move |attempt| backoff * attempt);
    Retry::spawn(delays, || {
        attempt(client, &strategy.url, strategy.mode, strategy.deadline)
    })
    .await
}

/// A single GET attempt against one strategy URL.
async fn attempt(
    client: &Client,
    url: &str,
    mode: RelayMode,
    deadline: Duration,
) -> Result<Value, TransportError> {
    let request = client.get(url).header("accept", "application/json");

    let response = timeout(deadline, request.send())
        .await
        .map_err(|_| TransportError::Timeout {
            timeout_seconds: deadline.as_secs(),
        })??;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        // Upstream answers 404 for empty filtered collections.
        return Ok(empty_result());
    }
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    decode_payload(&body, mode)
}

/// Relays cache aggressively; a timestamp parameter defeats that.
fn cache_busted(url: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{url}{separator}t={}",
        chrono::Utc::now().timestamp_millis()
    )
}

#[cfg(test)]
mod tests {
    use crate::proxy::ProxyRelay;

    use super::*;

    fn test_config() -> ApiConfig {
        ApiConfig {
            base_url: "https://api.example".to_string(),
            relays: vec![ProxyRelay::new(
                "https://relay.example/raw?url=",
                RelayMode::Raw,
            )],
            ..ApiConfig::default()
        }
    }

    #[test]
    fn fetcher_rejects_empty_base_url() {
        let config = ApiConfig {
            base_url: "  ".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            ApiFetcher::new(config),
            Err(TransportError::Config(_))
        ));
    }

    #[test]
    fn strategies_pair_direct_with_relays() {
        let fetcher = ApiFetcher::new(test_config()).expect("fetcher");
        let strategies = fetcher.strategies("/locations");

        assert_eq!(strategies.len(), 2);
        assert_eq!(strategies[0].label, "direct");
        assert_eq!(strategies[0].url, "https://api.example/locations");
        assert!(strategies[1].url.starts_with("https://relay.example/raw?url="));
        assert!(strategies[1].url.contains("&t="));
        assert!(strategies[1].deadline > strategies[0].deadline);
    }

    #[test]
    fn cache_bust_respects_existing_query() {
        assert!(cache_busted("https://relay.example/?x").starts_with("https://relay.example/?x&t="));
        assert!(cache_busted("https://relay.example/raw").starts_with("https://relay.example/raw?t="));
    }
}
