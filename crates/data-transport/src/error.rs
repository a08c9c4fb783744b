// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the transport layer
//!
//! These surface from constructors only. A failing strategy is logged and
//! out-raced by its siblings, and a fully failed fetch degrades to the
//! empty-result sentinel.

use thiserror::Error;

/// Errors produced by individual fetch strategies and client construction
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded its deadline
    #[error("request timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    /// Upstream answered with a non-success status
    #[error("upstream returned status {status}")]
    Status { status: u16 },

    /// Response body was not the expected JSON
    #[error("invalid response payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Relay envelope arrived without its wrapped payload
    #[error("relay envelope missing contents")]
    EmptyEnvelope,

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}
