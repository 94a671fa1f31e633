// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! IdP metadata retrieval and parsing.
//!
//! Only the parts of a SAML2 `EntityDescriptor` needed to register an
//! asserting party are read: the entity id, the `SingleSignOnService`
//! endpoints and the certificates from the IdP's `KeyDescriptor` elements.
//!
//! The document root may be the IdP's own `EntityDescriptor` or an
//! `EntitiesDescriptor` group (as federation feeds publish it) that holds
//! exactly one entity with an `IDPSSODescriptor`.

use base64ct::{Base64, Encoding};
use serde::Deserialize;
use tracing::{debug, error};

use super::{credentials::Certificate, error::RegistryError, resource::ResourceLocation};

/// A single sign-on endpoint published by the IdP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsoEndpoint {
    pub binding: String,
    pub location: String,
}

/// Asserting-party details taken from IdP metadata.
#[derive(Debug, Clone)]
pub struct IdpMetadata {
    pub entity_id: String,
    pub single_sign_on_services: Vec<SsoEndpoint>,
    /// Keys with `use="signing"` or no `use`.
    pub verification_certificates: Vec<Certificate>,
    /// Keys with `use="encryption"` or no `use`.
    pub encryption_certificates: Vec<Certificate>,
    pub want_authn_requests_signed: bool,
}

/// Either an `EntityDescriptor` or an `EntitiesDescriptor`; quick-xml matches
/// children by local name, so one shape covers both roots.
#[derive(Debug, Deserialize)]
struct DescriptorXml {
    #[serde(rename = "@entityID")]
    entity_id: Option<String>,
    #[serde(rename = "IDPSSODescriptor", default)]
    idp_sso_descriptors: Vec<IdpSsoDescriptorXml>,
    #[serde(rename = "EntityDescriptor", default)]
    entities: Vec<DescriptorXml>,
    #[serde(rename = "EntitiesDescriptor", default)]
    groups: Vec<DescriptorXml>,
}

impl DescriptorXml {
    fn is_entity(&self) -> bool {
        self.entity_id.is_some() || !self.idp_sso_descriptors.is_empty()
    }

    fn collect_idp_entities(self, found: &mut Vec<DescriptorXml>) {
        found.extend(
            self.entities
                .into_iter()
                .filter(|entity| !entity.idp_sso_descriptors.is_empty()),
        );
        for group in self.groups {
            group.collect_idp_entities(found);
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdpSsoDescriptorXml {
    #[serde(rename = "@WantAuthnRequestsSigned", default)]
    want_authn_requests_signed: Option<bool>,
    #[serde(rename = "KeyDescriptor", default)]
    key_descriptors: Vec<KeyDescriptorXml>,
    #[serde(rename = "SingleSignOnService", default)]
    single_sign_on_services: Vec<EndpointXml>,
}

#[derive(Debug, Deserialize)]
struct KeyDescriptorXml {
    #[serde(rename = "@use")]
    key_use: Option<String>,
    #[serde(rename = "KeyInfo")]
    key_info: Option<KeyInfoXml>,
}

#[derive(Debug, Deserialize)]
struct KeyInfoXml {
    #[serde(rename = "X509Data", default)]
    x509_data: Vec<X509DataXml>,
}

#[derive(Debug, Deserialize)]
struct X509DataXml {
    #[serde(rename = "X509Certificate", default)]
    certificates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EndpointXml {
    #[serde(rename = "@Binding")]
    binding: String,
    #[serde(rename = "@Location")]
    location: String,
}

/// Fetch and parse IdP metadata from a URL or a local file.
pub async fn load(
    location: &ResourceLocation,
    http: &reqwest::Client,
) -> Result<IdpMetadata, RegistryError> {
    let xml = fetch(location, http).await?;
    parse(&location.to_string(), &xml)
}

/// Retrieve the raw metadata document.
pub async fn fetch(
    location: &ResourceLocation,
    http: &reqwest::Client,
) -> Result<String, RegistryError> {
    let fetch_error = |reason: String| {
        error!(location = %location, reason = %reason, "Failed to fetch IdP metadata");
        RegistryError::MetadataFetch {
            location: location.to_string(),
            reason,
        }
    };

    match location {
        ResourceLocation::Url(url) => {
            debug!(url = %url, "Fetching IdP metadata");
            let response = http
                .get(url.clone())
                .send()
                .await
                .map_err(|e| fetch_error(e.to_string()))?;

            if !response.status().is_success() {
                return Err(fetch_error(format!(
                    "HTTP {} from metadata endpoint",
                    response.status()
                )));
            }

            response.text().await.map_err(|e| fetch_error(e.to_string()))
        }
        ResourceLocation::File(path) => {
            debug!(path = %path.display(), "Reading IdP metadata");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| fetch_error(e.to_string()))
        }
    }
}

/// Parse a SAML2 metadata document describing a single IdP.
pub fn parse(location: &str, xml: &str) -> Result<IdpMetadata, RegistryError> {
    let parse_error = |reason: String| RegistryError::MetadataParse {
        location: location.to_string(),
        reason,
    };

    let root: DescriptorXml =
        quick_xml::de::from_str(xml).map_err(|e| parse_error(e.to_string()))?;

    let descriptor = if root.is_entity() {
        root
    } else {
        let mut idps = Vec::new();
        root.collect_idp_entities(&mut idps);
        match idps.len() {
            0 => return Err(parse_error("no entity with an IDPSSODescriptor element".into())),
            1 => idps.remove(0),
            n => {
                return Err(parse_error(format!(
                    "EntitiesDescriptor holds {n} IdP entities, expected one"
                )))
            }
        }
    };

    let entity_id = descriptor
        .entity_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| parse_error("EntityDescriptor has no entityID".into()))?;

    let idp = descriptor
        .idp_sso_descriptors
        .into_iter()
        .next()
        .ok_or_else(|| parse_error("no IDPSSODescriptor element".into()))?;

    if idp.single_sign_on_services.is_empty() {
        return Err(parse_error("IDPSSODescriptor has no SingleSignOnService".into()));
    }

    let mut verification_certificates = Vec::new();
    let mut encryption_certificates = Vec::new();
    for key in idp.key_descriptors {
        // Keys without a `use` attribute are valid for both signing and encryption.
        let (signing, encryption) = match key.key_use.as_deref() {
            None => (true, true),
            Some("signing") => (true, false),
            Some("encryption") => (false, true),
            Some(other) => {
                debug!(location, key_use = other, "Skipping KeyDescriptor with unknown use");
                continue;
            }
        };
        let encoded = key
            .key_info
            .into_iter()
            .flat_map(|info| info.x509_data)
            .flat_map(|data| data.certificates);
        for value in encoded {
            let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
            let der = Base64::decode_vec(&compact)
                .map_err(|e| parse_error(format!("X509Certificate is not base64: {e}")))?;
            let certificate = Certificate::from_der(der)
                .map_err(|e| parse_error(format!("invalid IdP certificate: {e}")))?;
            if encryption {
                encryption_certificates.push(certificate.clone());
            }
            if signing {
                verification_certificates.push(certificate);
            }
        }
    }

    Ok(IdpMetadata {
        entity_id,
        single_sign_on_services: idp
            .single_sign_on_services
            .into_iter()
            .map(|endpoint| SsoEndpoint {
                binding: endpoint.binding,
                location: endpoint.location,
            })
            .collect(),
        verification_certificates,
        encryption_certificates,
        want_authn_requests_signed: idp.want_authn_requests_signed.unwrap_or(false),
    })
}
