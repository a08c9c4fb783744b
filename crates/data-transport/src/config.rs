// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the multi-strategy fetcher

use crate::proxy::{ProxyRelay, default_relays};

const DEFAULT_BASE_URL: &str = "https://web-production-c3ccb.up.railway.app";
const DEFAULT_DIRECT_TIMEOUT_SECONDS: u64 = 8;
const DEFAULT_PROXY_TIMEOUT_SECONDS: u64 = 20;
const DEFAULT_MAX_RETRIES: u32 = 1;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;

/// Configuration for the upstream data API transport
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the upstream data API
    pub base_url: String,
    /// Relays raced against the direct request, in no particular order
    pub relays: Vec<ProxyRelay>,
    /// Deadline for the direct strategy, in seconds
    pub direct_timeout_seconds: u64,
    /// Deadline for relayed strategies, in seconds (relay latency is higher)
    pub proxy_timeout_seconds: u64,
    /// Retries per individual strategy after the first attempt
    pub max_retries: u32,
    /// Base delay for the linear retry backoff (attempt x base)
    pub retry_backoff_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            relays: default_relays(),
            direct_timeout_seconds: DEFAULT_DIRECT_TIMEOUT_SECONDS,
            proxy_timeout_seconds: DEFAULT_PROXY_TIMEOUT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_production_relays() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.relays.len(), 3);
        assert_eq!(config.max_retries, 1);
        assert!(config.proxy_timeout_seconds > config.direct_timeout_seconds);
    }
}
