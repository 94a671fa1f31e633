// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Link between a principal and an account at the wallet service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(default)]
    pub relationship_id: String,
}

impl Relationship {
    pub fn new(relationship_id: impl Into<String>) -> Self {
        Self {
            relationship_id: relationship_id.into(),
        }
    }

    /// The relationship id, or `None` when it is empty.
    pub fn id(&self) -> Option<&str> {
        Some(self.relationship_id.as_str()).filter(|id| !id.is_empty())
    }
}

/// Summary of one relying-party registration.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSummary {
    pub registration_id: String,
    pub entity_id: String,
    pub assertion_consumer_service_location: String,
    pub idp_entity_id: String,
    pub single_sign_on_services: Vec<SsoServiceSummary>,
    pub want_authn_requests_signed: bool,
    pub signing_credentials: usize,
    pub decryption_credentials: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SsoServiceSummary {
    pub binding: String,
    pub location: String,
}
