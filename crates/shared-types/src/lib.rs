// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared domain types for the heritage atlas data layer
//!
//! This crate defines the stable entity model consumed by presentation code,
//! plus the output types of the routing and geocoding adapters. Raw upstream
//! row shapes live in the crate that decodes them, not here; everything in
//! this crate is already normalized.

pub mod entities;
pub mod route;

pub use entities::*;
pub use route::*;
