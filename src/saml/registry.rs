// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relying-party registrations, one per trusted identity provider.
//!
//! The registry is built once at startup and is read-only afterwards, so it
//! is shared across requests behind an `Arc` without locking.

use std::collections::HashMap;

use tracing::info;

use super::{
    credentials::{Credential, CredentialLoader, ServiceProviderCredentials},
    error::RegistryError,
    metadata::{self, IdpMetadata},
    resource::ResourceLocation,
};
use crate::config::{ProviderSettings, SamlSettings};

/// Trust configuration for one identity provider.
#[derive(Debug, Clone)]
pub struct RelyingPartyRegistration {
    registration_id: String,
    entity_id: String,
    assertion_consumer_service_location: String,
    metadata_location: String,
    asserting_party: IdpMetadata,
    signing_credentials: Vec<Credential>,
    decryption_credentials: Vec<Credential>,
}

impl RelyingPartyRegistration {
    /// Assemble a registration from fetched metadata and the service
    /// provider's credentials.
    pub fn new(
        provider: &ProviderSettings,
        base_url: &str,
        asserting_party: IdpMetadata,
        credentials: &ServiceProviderCredentials,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let registration_id = provider.registration_id.clone();

        Self {
            entity_id: format!("{base_url}/saml2/service-provider-metadata/{registration_id}"),
            assertion_consumer_service_location: format!(
                "{base_url}/login/saml2/sso/{registration_id}"
            ),
            registration_id,
            metadata_location: provider.metadata_location.clone(),
            asserting_party,
            signing_credentials: vec![credentials.signing.clone()],
            decryption_credentials: vec![credentials.decryption.clone()],
        }
    }

    pub fn registration_id(&self) -> &str {
        &self.registration_id
    }

    /// Service provider entity id presented to this IdP.
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn assertion_consumer_service_location(&self) -> &str {
        &self.assertion_consumer_service_location
    }

    pub fn metadata_location(&self) -> &str {
        &self.metadata_location
    }

    pub fn asserting_party(&self) -> &IdpMetadata {
        &self.asserting_party
    }

    pub fn signing_credentials(&self) -> &[Credential] {
        &self.signing_credentials
    }

    pub fn decryption_credentials(&self) -> &[Credential] {
        &self.decryption_credentials
    }
}

/// Immutable lookup of registrations by registration id.
#[derive(Debug, Clone, Default)]
pub struct RelyingPartyRegistry {
    registrations: Vec<RelyingPartyRegistration>,
    index: HashMap<String, usize>,
}

impl RelyingPartyRegistry {
    /// Rejects duplicate registration ids. Iteration keeps the given order.
    pub fn new(registrations: Vec<RelyingPartyRegistration>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(registrations.len());
        for (position, registration) in registrations.iter().enumerate() {
            if index
                .insert(registration.registration_id.clone(), position)
                .is_some()
            {
                return Err(RegistryError::DuplicateRegistration(
                    registration.registration_id.clone(),
                ));
            }
        }
        Ok(Self {
            registrations,
            index,
        })
    }

    /// `None` means the provider is not trusted and the request must be rejected.
    pub fn find_by_registration_id(&self, registration_id: &str) -> Option<&RelyingPartyRegistration> {
        self.index
            .get(registration_id)
            .map(|&position| &self.registrations[position])
    }

    pub fn registration_ids(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().map(|r| r.registration_id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RelyingPartyRegistration> {
        self.registrations.iter()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

/// Build the registry for every configured provider.
///
/// Any failure aborts the whole build; no partial registry is returned.
pub async fn build(
    settings: &SamlSettings,
    http: &reqwest::Client,
) -> Result<RelyingPartyRegistry, RegistryError> {
    if settings.providers.is_empty() {
        return Err(RegistryError::NoProviders);
    }

    let mut seen = std::collections::HashSet::new();
    for provider in &settings.providers {
        if !seen.insert(provider.registration_id.as_str()) {
            return Err(RegistryError::DuplicateRegistration(
                provider.registration_id.clone(),
            ));
        }
    }

    let loader = CredentialLoader::new(settings.credentials.clone());
    let credentials = loader.load_credentials()?;

    let mut registrations = Vec::with_capacity(settings.providers.len());
    for provider in &settings.providers {
        let location =
            ResourceLocation::resolve(&provider.metadata_location, &settings.credentials.resource_dir);
        let asserting_party = metadata::load(&location, http).await?;

        info!(
            registration_id = %provider.registration_id,
            idp_entity_id = %asserting_party.entity_id,
            sso_endpoints = asserting_party.single_sign_on_services.len(),
            "Registered identity provider"
        );

        registrations.push(RelyingPartyRegistration::new(
            provider,
            &settings.base_url,
            asserting_party,
            &credentials,
        ));
    }

    RelyingPartyRegistry::new(registrations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::CredentialSettings, saml::attributes::AttributePathConfig};
    use std::path::Path;

    fn settings(providers: &[(&str, &str)]) -> SamlSettings {
        SamlSettings {
            base_url: "https://app.example.com/".into(),
            providers: providers
                .iter()
                .map(|(id, location)| ProviderSettings {
                    registration_id: (*id).into(),
                    metadata_location: (*location).into(),
                })
                .collect(),
            credentials: CredentialSettings {
                resource_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"),
                signing_certificate: "signing.crt".into(),
                decryption_certificate: "decryption.crt".into(),
                key_location: Some("sp-key.pem".into()),
                inline_key: None,
            },
            attribute_paths: AttributePathConfig::new(),
        }
    }

    #[tokio::test]
    async fn builds_one_registration_per_provider() {
        let settings = settings(&[
            ("okta", "okta-metadata.xml"),
            ("daad", "classpath:daad-metadata.xml"),
        ]);
        let registry = build(&settings, &reqwest::Client::new())
            .await
            .expect("registry builds");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.registration_ids().collect::<Vec<_>>(), ["okta", "daad"]);

        let okta = registry.find_by_registration_id("okta").expect("okta registered");
        assert_eq!(
            okta.asserting_party().entity_id,
            "https://idp.okta.example.com/metadata"
        );
        assert_eq!(
            okta.entity_id(),
            "https://app.example.com/saml2/service-provider-metadata/okta"
        );
        assert_eq!(
            okta.assertion_consumer_service_location(),
            "https://app.example.com/login/saml2/sso/okta"
        );
        assert_eq!(okta.signing_credentials().len(), 1);
        assert_eq!(okta.decryption_credentials().len(), 1);
        assert_eq!(okta.metadata_location(), "okta-metadata.xml");
    }

    #[tokio::test]
    async fn unknown_registration_is_not_found() {
        let settings = settings(&[("okta", "okta-metadata.xml")]);
        let registry = build(&settings, &reqwest::Client::new()).await.unwrap();
        assert!(registry.find_by_registration_id("partner").is_none());
    }

    #[tokio::test]
    async fn duplicate_provider_ids_are_rejected() {
        let settings = settings(&[
            ("okta", "okta-metadata.xml"),
            ("okta", "daad-metadata.xml"),
        ]);
        let err = build(&settings, &reqwest::Client::new()).await.unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRegistration(id) if id == "okta"));
    }

    #[tokio::test]
    async fn empty_provider_list_is_rejected() {
        let err = build(&settings(&[]), &reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NoProviders));
    }

    #[tokio::test]
    async fn one_bad_provider_fails_the_whole_build() {
        let settings = settings(&[
            ("okta", "okta-metadata.xml"),
            ("daad", "no-idp-metadata.xml"),
        ]);
        let err = build(&settings, &reqwest::Client::new()).await.unwrap_err();
        assert!(matches!(err, RegistryError::MetadataParse { .. }));
    }

    #[tokio::test]
    async fn credential_failure_is_fatal() {
        let mut settings = settings(&[("okta", "okta-metadata.xml")]);
        settings.credentials.signing_certificate = "invalid.crt".into();

        let err = build(&settings, &reqwest::Client::new()).await.unwrap_err();
        match err {
            RegistryError::Credential(inner) => assert!(inner.is_parse()),
            other => panic!("expected credential error, got {other:?}"),
        }
    }
}
