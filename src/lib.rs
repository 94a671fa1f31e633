// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EAGL Web App - SAML2 Federated Login and Wallet Token Service
//!
//! Authenticates end users through several SAML2 identity providers, maps
//! their federated attributes to application semantics, and serves the
//! wallet token image.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `config` - Environment-driven configuration
//! - `saml` - Relying-party trust configuration and attribute mapping
//! - `wallet` - Wallet service client

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod saml;
pub mod state;
pub mod wallet;
