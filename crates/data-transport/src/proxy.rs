// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Public CORS-relay URL rewriting
//!
//! Relays are generic "fetch this URL for me" services. They differ in how
//! they hand the payload back: most return the target's body verbatim, one
//! family wraps it in a JSON envelope whose `contents` field holds the body
//! as a string and needs a second parse.

use url::form_urlencoded;

/// How a relay encodes the target payload in its response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    /// Relay returns the target's JSON body verbatim
    Raw,
    /// Relay wraps the body as `{contents: "<json-string>", status: {...}}`
    Enveloped,
}

/// A single relay endpoint and its payload mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRelay {
    /// Relay URL prefix; the percent-encoded target URL is appended
    pub base_url: String,
    /// Payload mode of this relay
    pub mode: RelayMode,
}

impl ProxyRelay {
    /// Create a relay from its URL prefix and payload mode.
    pub fn new(base_url: impl Into<String>, mode: RelayMode) -> Self {
        Self {
            base_url: base_url.into(),
            mode,
        }
    }

    /// Rewrite a target URL through this relay.
    pub fn rewrite(&self, target: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
        format!("{}{}", self.base_url, encoded)
    }
}

/// The production relay set raced against direct fetches.
pub fn default_relays() -> Vec<ProxyRelay> {
    vec![
        ProxyRelay::new("https://api.allorigins.win/raw?url=", RelayMode::Raw),
        ProxyRelay::new("https://api.allorigins.win/get?url=", RelayMode::Enveloped),
        ProxyRelay::new("https://corsproxy.io/?", RelayMode::Raw),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_percent_encodes_target() {
        let relay = ProxyRelay::new("https://relay.example/raw?url=", RelayMode::Raw);
        let rewritten = relay.rewrite("https://api.example/locations?page=2");
        assert_eq!(
            rewritten,
            "https://relay.example/raw?url=https%3A%2F%2Fapi.example%2Flocations%3Fpage%3D2"
        );
    }

    #[test]
    fn default_relays_include_one_enveloped() {
        let relays = default_relays();
        assert_eq!(
            relays
                .iter()
                .filter(|r| r.mode == RelayMode::Enveloped)
                .count(),
            1
        );
    }
}
