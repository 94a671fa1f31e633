// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mapping of federated claims to application attributes.
//!
//! Identity providers publish the same information under different claim
//! names (Okta sends `mail`, another IdP sends a URN). Business code asks for
//! a logical name such as `email`; [`AttributePathConfig`] says which claim
//! carries it for the provider the principal logged in through.

use std::collections::HashMap;

use tracing::debug;

use super::principal::AuthenticatedPrincipal;
use crate::models::Relationship;

pub const EMAIL: &str = "email";
pub const UID: &str = "uid";
pub const FIRST_NAME: &str = "firstname";
pub const LAST_NAME: &str = "lastname";

/// Locally assigned attribute, not a federated claim.
pub const WALLET_ID: &str = "walletId";

/// Claim names keyed by registration id and logical attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributePathConfig {
    paths: HashMap<String, HashMap<String, String>>,
}

impl AttributePathConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for a single mapping.
    pub fn with_path(
        mut self,
        registration_id: impl Into<String>,
        logical_name: impl Into<String>,
        claim_name: impl Into<String>,
    ) -> Self {
        self.insert(registration_id, logical_name, claim_name);
        self
    }

    pub fn insert(
        &mut self,
        registration_id: impl Into<String>,
        logical_name: impl Into<String>,
        claim_name: impl Into<String>,
    ) {
        self.paths
            .entry(registration_id.into())
            .or_default()
            .insert(logical_name.into(), claim_name.into());
    }

    /// Claim name for `logical_name` at `registration_id`; blank mappings count as unset.
    pub fn claim_name(&self, registration_id: &str, logical_name: &str) -> Option<&str> {
        self.paths
            .get(registration_id)?
            .get(logical_name)
            .map(String::as_str)
            .filter(|claim| !claim.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.paths.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves logical attribute names against an authenticated principal.
#[derive(Debug, Clone, Default)]
pub struct AttributeResolver {
    paths: AttributePathConfig,
}

impl AttributeResolver {
    pub fn new(paths: AttributePathConfig) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &AttributePathConfig {
        &self.paths
    }

    /// First value of the claim configured for `logical_name`.
    ///
    /// Absent when no claim is configured for the principal's provider, even
    /// if the principal carries an attribute literally named `logical_name`.
    pub fn get_attribute<'p>(
        &self,
        principal: &'p AuthenticatedPrincipal,
        logical_name: &str,
    ) -> Option<&'p str> {
        let Some(claim) = self
            .paths
            .claim_name(principal.registration_id(), logical_name)
        else {
            debug!(
                registration_id = %principal.registration_id(),
                attribute = %logical_name,
                "No claim path configured"
            );
            return None;
        };
        principal.first_attribute(claim)
    }

    pub fn get_email<'p>(&self, principal: &'p AuthenticatedPrincipal) -> Option<&'p str> {
        self.get_attribute(principal, EMAIL)
    }

    pub fn get_uid<'p>(&self, principal: &'p AuthenticatedPrincipal) -> Option<&'p str> {
        self.get_attribute(principal, UID)
    }

    pub fn get_first_name<'p>(&self, principal: &'p AuthenticatedPrincipal) -> Option<&'p str> {
        self.get_attribute(principal, FIRST_NAME)
    }

    pub fn get_last_name<'p>(&self, principal: &'p AuthenticatedPrincipal) -> Option<&'p str> {
        self.get_attribute(principal, LAST_NAME)
    }

    /// Return a copy of `principal` with the relationship id appended to its
    /// `walletId` attribute. The caller replaces the session's principal with
    /// the result; `principal` itself is left untouched.
    ///
    /// An empty relationship id yields an unchanged copy.
    pub fn set_wallet_id(
        &self,
        principal: &AuthenticatedPrincipal,
        relationship: &Relationship,
    ) -> AuthenticatedPrincipal {
        let Some(wallet_id) = relationship.id() else {
            return principal.clone();
        };

        let mut attributes = principal.attributes().clone();
        attributes
            .entry(WALLET_ID.to_string())
            .or_default()
            .push(wallet_id.to_string());
        principal.with_attributes(attributes)
    }

    /// First `walletId` value, read directly without claim-path mapping.
    pub fn get_wallet_id<'p>(&self, principal: &'p AuthenticatedPrincipal) -> Option<&'p str> {
        principal.first_attribute(WALLET_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> AttributeResolver {
        AttributeResolver::new(
            AttributePathConfig::new()
                .with_path("okta", EMAIL, "mail")
                .with_path("okta", UID, "uid")
                .with_path("okta", FIRST_NAME, "givenName")
                .with_path("okta", LAST_NAME, "sn")
                .with_path("daad", EMAIL, "urn:oid:0.9.2342.19200300.100.1.3")
                .with_path("daad", FIRST_NAME, "urn:oid:2.5.4.42"),
        )
    }

    fn okta_principal() -> AuthenticatedPrincipal {
        AuthenticatedPrincipal::new("alice", "okta")
            .with_attribute("mail", ["a@example.com", "alias@example.com"])
            .with_attribute("uid", ["u-1"])
            .with_attribute("givenName", ["Alice"])
            .with_attribute("sn", ["Example"])
    }

    #[test]
    fn resolves_email_through_configured_claim() {
        let principal = okta_principal();
        assert_eq!(resolver().get_email(&principal), Some("a@example.com"));
    }

    #[test]
    fn convenience_accessors_use_fixed_logical_names() {
        let resolver = resolver();
        let principal = okta_principal();
        assert_eq!(resolver.get_uid(&principal), Some("u-1"));
        assert_eq!(resolver.get_first_name(&principal), Some("Alice"));
        assert_eq!(resolver.get_last_name(&principal), Some("Example"));
    }

    #[test]
    fn same_logical_name_maps_per_provider() {
        let principal = AuthenticatedPrincipal::new("bob", "daad")
            .with_attribute("urn:oid:0.9.2342.19200300.100.1.3", ["b@daad.example"])
            .with_attribute("mail", ["wrong@example.com"]);
        assert_eq!(resolver().get_email(&principal), Some("b@daad.example"));
    }

    #[test]
    fn unconfigured_path_is_absent_even_with_literal_attribute() {
        let principal = AuthenticatedPrincipal::new("bob", "daad")
            .with_attribute("lastname", ["Literal"])
            .with_attribute(LAST_NAME, ["Literal"]);
        assert_eq!(resolver().get_last_name(&principal), None);
    }

    #[test]
    fn unknown_provider_resolves_nothing() {
        let principal =
            AuthenticatedPrincipal::new("eve", "unknown").with_attribute("mail", ["e@example.com"]);
        assert_eq!(resolver().get_email(&principal), None);
    }

    #[test]
    fn configured_claim_missing_on_principal_is_absent() {
        let principal = AuthenticatedPrincipal::new("carol", "okta");
        assert_eq!(resolver().get_email(&principal), None);
    }

    #[test]
    fn blank_claim_path_counts_as_unconfigured() {
        let resolver = AttributeResolver::new(AttributePathConfig::new().with_path("okta", EMAIL, " "));
        let principal = AuthenticatedPrincipal::new("alice", "okta").with_attribute("", ["x"]);
        assert_eq!(resolver.get_email(&principal), None);
    }

    #[test]
    fn repeated_lookups_agree() {
        let resolver = resolver();
        let principal = okta_principal();
        assert_eq!(
            resolver.get_attribute(&principal, EMAIL),
            resolver.get_attribute(&principal, EMAIL)
        );
    }

    #[test]
    fn set_wallet_id_then_get_wallet_id() {
        let resolver = resolver();
        let principal = okta_principal();

        let updated = resolver.set_wallet_id(&principal, &Relationship::new("W123"));

        assert_eq!(resolver.get_wallet_id(&updated), Some("W123"));
        assert_eq!(resolver.get_wallet_id(&principal), None);
        assert_eq!(resolver.get_email(&updated), Some("a@example.com"));
    }

    #[test]
    fn set_wallet_id_appends_to_existing_values() {
        let resolver = resolver();
        let principal = okta_principal().with_attribute(WALLET_ID, ["W1"]);

        let updated = resolver.set_wallet_id(&principal, &Relationship::new("W2"));

        assert_eq!(
            updated.attribute(WALLET_ID),
            Some(&["W1".to_string(), "W2".to_string()][..])
        );
        assert_eq!(resolver.get_wallet_id(&updated), Some("W1"));
    }

    #[test]
    fn empty_relationship_id_is_a_no_op() {
        let resolver = resolver();
        let principal = okta_principal();

        let updated = resolver.set_wallet_id(&principal, &Relationship::default());

        assert_eq!(updated, principal);
        assert_eq!(resolver.get_wallet_id(&updated), None);
    }

    #[test]
    fn wallet_id_ignores_claim_paths() {
        let resolver = AttributeResolver::new(AttributePathConfig::new());
        let principal = AuthenticatedPrincipal::new("zoe", "unmapped").with_attribute(WALLET_ID, ["W9"]);
        assert_eq!(resolver.get_wallet_id(&principal), Some("W9"));
    }

    #[test]
    fn path_config_counts_mappings() {
        let paths = resolver().paths().clone();
        assert_eq!(paths.len(), 6);
        assert!(!paths.is_empty());
        assert!(AttributePathConfig::new().is_empty());
    }
}
