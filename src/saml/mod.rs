// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # SAML2 Federation
//!
//! Relying-party trust configuration and federated attribute mapping.
//!
//! ## Startup
//!
//! 1. The service provider's RSA key and its signing/decryption certificates
//!    are loaded ([`credentials`])
//! 2. For every configured identity provider, metadata is fetched from a URL
//!    or file ([`metadata`])
//! 3. Each provider becomes a [`RelyingPartyRegistration`] in the immutable
//!    [`RelyingPartyRegistry`]
//!
//! Any failure aborts startup. An incomplete trust configuration is never
//! served.
//!
//! ## Runtime
//!
//! Assertion validation, signature checks and decryption belong to the SAML
//! protocol layer. This module only resolves attributes of the resulting
//! [`AuthenticatedPrincipal`] through [`AttributeResolver`].

pub mod attributes;
pub mod credentials;
pub mod error;
pub mod metadata;
pub mod principal;
pub mod registry;
pub mod resource;

pub use attributes::{AttributePathConfig, AttributeResolver};
pub use credentials::{Certificate, Credential, CredentialLoader};
pub use error::{CredentialError, RegistryError};
pub use principal::AuthenticatedPrincipal;
pub use registry::{RelyingPartyRegistration, RelyingPartyRegistry};
