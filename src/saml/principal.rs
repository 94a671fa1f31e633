// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authenticated principal produced by a federated login.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A user authenticated by one of the registered identity providers.
///
/// Attributes are multi-valued, keyed by the claim name the IdP published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedPrincipal {
    name: String,
    registration_id: String,
    #[serde(default)]
    attributes: BTreeMap<String, Vec<String>>,
}

impl AuthenticatedPrincipal {
    pub fn new(name: impl Into<String>, registration_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registration_id: registration_id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style helper replacing the values of one attribute.
    pub fn with_attribute<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Return a copy of this principal carrying `attributes` instead.
    pub fn with_attributes(&self, attributes: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            name: self.name.clone(),
            registration_id: self.registration_id.clone(),
            attributes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registration id of the relying party the login came through.
    pub fn registration_id(&self) -> &str {
        &self.registration_id
    }

    pub fn attributes(&self) -> &BTreeMap<String, Vec<String>> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    pub fn first_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
