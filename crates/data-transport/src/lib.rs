// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Multi-strategy HTTP transport for the upstream data API
//!
//! The upstream API is frequently reachable only through public CORS relays.
//! [`ApiFetcher`] races one direct request against every configured relay and
//! resolves with the first strategy to succeed. One relay family wraps the
//! payload in an envelope that needs a second parse; see [`proxy::RelayMode`].
//! When every strategy fails the fetcher returns the empty-result sentinel
//! instead of an error, so callers treat "no data" and "network down" the
//! same way.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod proxy;
pub mod response;

pub use config::ApiConfig;
pub use error::TransportError;
pub use fetcher::ApiFetcher;
pub use proxy::{ProxyRelay, RelayMode, default_relays};
pub use response::{empty_result, extract_rows};
