// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from environment variables at startup. Parsing goes
//! through [`AppConfig::from_vars`] so tests can pass an explicit map instead
//! of touching the process environment. Blank values count as unset.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `BASE_URL` | Externally visible base URL | `http://localhost:8080` |
//! | `RESOURCE_DIR` | Base directory for relative and `classpath:` locations | `.` |
//! | `SAML_PROVIDERS` | Comma-separated registration ids | `okta,daad` |
//! | `SAML_<ID>_METADATA_LOCATION` | IdP metadata URL or file | Required (built-in for `daad`) |
//! | `SAML_<ID>_ATTRIBUTE_<NAME>` | Claim carrying logical attribute `<name>` | None |
//! | `SAML_SIGNING_CERT_LOCATION` | Signing certificate | Required |
//! | `SAML_DECRYPTION_CERT_LOCATION` | Decryption certificate | Required |
//! | `SAML_KEY_LOCATION` | PKCS#8 private key file | Required unless `SAML_KEY` |
//! | `SAML_KEY` | Inline PKCS#8 PEM, wins over the file when non-empty | None |
//! | `WALLET_TOKEN_IMAGE_URL` | Wallet service token image endpoint | Required |
//! | `WALLET_TIMEOUT_SECS` | Outbound HTTP timeout | `10` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | Serve HTTPS with this PEM pair | Plain HTTP |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! `<ID>` and `<NAME>` are upper-cased with `-` replaced by `_`.

use std::{collections::HashMap, path::PathBuf, time::Duration};

use url::Url;

use crate::saml::attributes::AttributePathConfig;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const BASE_URL_ENV: &str = "BASE_URL";
pub const RESOURCE_DIR_ENV: &str = "RESOURCE_DIR";
pub const SAML_PROVIDERS_ENV: &str = "SAML_PROVIDERS";
pub const SAML_SIGNING_CERT_ENV: &str = "SAML_SIGNING_CERT_LOCATION";
pub const SAML_DECRYPTION_CERT_ENV: &str = "SAML_DECRYPTION_CERT_LOCATION";
pub const SAML_KEY_LOCATION_ENV: &str = "SAML_KEY_LOCATION";
pub const SAML_KEY_ENV: &str = "SAML_KEY";
pub const WALLET_TOKEN_IMAGE_URL_ENV: &str = "WALLET_TOKEN_IMAGE_URL";
pub const WALLET_TIMEOUT_ENV: &str = "WALLET_TIMEOUT_SECS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_PROVIDERS: &str = "okta,daad";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Metadata locations for providers that publish at a fixed address.
const BUILTIN_METADATA_LOCATIONS: &[(&str, &str)] = &[(
    "daad",
    "https://saml-bird.daad.com/saml2/idp/metadata.php",
)];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration missing: {0}")]
    Missing(String),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// One identity provider to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub registration_id: String,
    pub metadata_location: String,
}

/// Where the service provider's own key and certificates live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSettings {
    pub resource_dir: PathBuf,
    pub signing_certificate: String,
    pub decryption_certificate: String,
    pub key_location: Option<String>,
    pub inline_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamlSettings {
    pub base_url: String,
    pub providers: Vec<ProviderSettings>,
    pub credentials: CredentialSettings,
    pub attribute_paths: AttributePathConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSettings {
    pub token_image_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsSettings>,
    pub saml: SamlSettings,
    pub wallet: WalletSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = Vars::new(vars);

        let port = match vars.optional(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| invalid(PORT_ENV, e))?,
            None => DEFAULT_PORT,
        };

        let tls = match (vars.optional(TLS_CERT_PATH_ENV), vars.optional(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsSettings {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV.into())),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV.into())),
        };

        Ok(Self {
            host: vars.or_default(HOST_ENV, DEFAULT_HOST),
            port,
            tls,
            saml: saml_settings(&vars)?,
            wallet: wallet_settings(&vars)?,
        })
    }
}

fn saml_settings(vars: &Vars) -> Result<SamlSettings, ConfigError> {
    let registration_ids: Vec<String> = vars
        .or_default(SAML_PROVIDERS_ENV, DEFAULT_PROVIDERS)
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    let mut providers = Vec::with_capacity(registration_ids.len());
    let mut attribute_paths = AttributePathConfig::new();
    for registration_id in registration_ids {
        let key = env_key(&registration_id);
        let metadata_name = format!("SAML_{key}_METADATA_LOCATION");
        let metadata_location = vars
            .optional(&metadata_name)
            .or_else(|| builtin_metadata_location(&registration_id))
            .ok_or_else(|| ConfigError::Missing(metadata_name))?;

        let attribute_prefix = format!("SAML_{key}_ATTRIBUTE_");
        for (name, claim) in vars.with_prefix(&attribute_prefix) {
            attribute_paths.insert(registration_id.as_str(), name.to_ascii_lowercase(), claim);
        }

        providers.push(ProviderSettings {
            registration_id,
            metadata_location,
        });
    }

    let credentials = CredentialSettings {
        resource_dir: PathBuf::from(vars.or_default(RESOURCE_DIR_ENV, ".")),
        signing_certificate: vars.required(SAML_SIGNING_CERT_ENV)?,
        decryption_certificate: vars.required(SAML_DECRYPTION_CERT_ENV)?,
        key_location: vars.optional(SAML_KEY_LOCATION_ENV),
        inline_key: vars.optional(SAML_KEY_ENV),
    };
    if credentials.key_location.is_none() && credentials.inline_key.is_none() {
        return Err(ConfigError::Missing(format!(
            "{SAML_KEY_ENV} or {SAML_KEY_LOCATION_ENV}"
        )));
    }

    Ok(SamlSettings {
        base_url: vars.or_default(BASE_URL_ENV, DEFAULT_BASE_URL),
        providers,
        credentials,
        attribute_paths,
    })
}

fn wallet_settings(vars: &Vars) -> Result<WalletSettings, ConfigError> {
    let raw_url = vars.required(WALLET_TOKEN_IMAGE_URL_ENV)?;
    let token_image_url =
        Url::parse(&raw_url).map_err(|e| invalid(WALLET_TOKEN_IMAGE_URL_ENV, e))?;

    let timeout_secs = match vars.optional(WALLET_TIMEOUT_ENV) {
        Some(raw) => raw.parse::<u64>().map_err(|e| invalid(WALLET_TIMEOUT_ENV, e))?,
        None => DEFAULT_TIMEOUT_SECS,
    };

    Ok(WalletSettings {
        token_image_url,
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn builtin_metadata_location(registration_id: &str) -> Option<String> {
    BUILTIN_METADATA_LOCATIONS
        .iter()
        .find(|(id, _)| *id == registration_id)
        .map(|(_, location)| (*location).to_string())
}

/// Upper-case a registration id or attribute name for use in a variable name.
pub fn env_key(value: &str) -> String {
    value.to_ascii_uppercase().replace('-', "_")
}

fn invalid(name: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Non-blank variables, trimmed.
struct Vars(HashMap<String, String>);

impl Vars {
    fn new<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into().trim().to_string()))
                .filter(|(_, v)| !v.is_empty())
                .collect(),
        )
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.optional(name)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.0.iter().filter_map(move |(name, value)| {
            name.strip_prefix(prefix)
                .filter(|rest| !rest.is_empty())
                .map(|rest| (rest, value.as_str()))
        })
    }
}
