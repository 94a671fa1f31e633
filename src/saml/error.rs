// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Trust configuration errors.
//!
//! Every variant here is fatal at startup: the service refuses to run with a
//! partially built relying-party registry.

use std::{fmt, io, path::PathBuf};

/// Which kind of trust material a resource was expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Certificate,
    PrivateKey,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Certificate => write!(f, "certificate"),
            ResourceKind::PrivateKey => write!(f, "private key"),
        }
    }
}

/// Where the private key material came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Inline PEM from configuration.
    Inline,
    /// Key file on disk.
    File(PathBuf),
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Inline => write!(f, "inline configuration value"),
            KeySource::File(path) => write!(f, "'{}'", path.display()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("invalid {kind} configuration: cannot read '{}': {source}", .path.display())]
    ResourceUnreadable {
        kind: ResourceKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid certificate configuration: '{}' is not a valid X.509 certificate: {reason}", .path.display())]
    CertificateParse { path: PathBuf, reason: String },

    #[error("invalid private key configuration: {origin} is not a PKCS#8 RSA key: {reason}")]
    KeyParse { origin: KeySource, reason: String },

    #[error("invalid private key configuration: neither an inline key nor a key location is set")]
    MissingKeySource,
}

impl CredentialError {
    /// The resource could not be read at all.
    pub fn is_io(&self) -> bool {
        matches!(self, CredentialError::ResourceUnreadable { .. })
    }

    /// The resource was read but its content is malformed.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            CredentialError::CertificateParse { .. } | CredentialError::KeyParse { .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to fetch IdP metadata from {location}: {reason}")]
    MetadataFetch { location: String, reason: String },

    #[error("malformed IdP metadata at {location}: {reason}")]
    MetadataParse { location: String, reason: String },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("relying party registration '{0}' is configured more than once")]
    DuplicateRegistration(String),

    #[error("no identity providers configured")]
    NoProviders,
}
