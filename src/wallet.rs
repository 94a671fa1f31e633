// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client for the external wallet service.

use std::{future::Future, pin::Pin};

use reqwest::{header::CONTENT_TYPE, Client};
use tracing::debug;
use url::Url;

use crate::config::WalletSettings;

#[derive(Debug, thiserror::Error)]
pub enum WalletClientError {
    #[error("wallet client configuration failed: {0}")]
    Configuration(String),

    #[error("wallet request failed: {0}")]
    Request(String),

    #[error("wallet service returned HTTP {0}")]
    Status(u16),
}

/// Token image bytes as returned by the wallet service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

pub type WalletFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TokenImage, WalletClientError>> + Send + 'a>>;

/// The wallet operations handlers depend on.
pub trait WalletApi: Send + Sync {
    fn token_image(&self) -> WalletFuture<'_>;
}

#[derive(Debug, Clone)]
pub struct WalletClient {
    token_image_url: Url,
    http: Client,
}

impl WalletClient {
    pub fn new(settings: &WalletSettings) -> Result<Self, WalletClientError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| WalletClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            token_image_url: settings.token_image_url.clone(),
            http,
        })
    }

    async fn fetch_token_image(&self) -> Result<TokenImage, WalletClientError> {
        debug!(url = %self.token_image_url, "Fetching token image");
        let response = self
            .http
            .get(self.token_image_url.clone())
            .send()
            .await
            .map_err(|e| WalletClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletClientError::Status(response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| WalletClientError::Request(e.to_string()))?;

        Ok(TokenImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

impl WalletApi for WalletClient {
    fn token_image(&self) -> WalletFuture<'_> {
        Box::pin(self.fetch_token_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::header, routing::get, Router};
    use std::time::Duration;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(url: &str) -> WalletClient {
        WalletClient::new(&WalletSettings {
            token_image_url: Url::parse(url).unwrap(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetches_image_bytes_and_content_type() {
        let base = serve(Router::new().route(
            "/token/image",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], PNG_MAGIC.to_vec()) }),
        ))
        .await;

        let image = client(&format!("{base}/token/image"))
            .token_image()
            .await
            .expect("image fetched");

        assert_eq!(image.bytes, PNG_MAGIC);
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn upstream_error_status_is_reported() {
        let base = serve(Router::new()).await;

        let err = client(&format!("{base}/token/image"))
            .token_image()
            .await
            .unwrap_err();
        assert!(matches!(err, WalletClientError::Status(404)));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_request_error() {
        // Port 9 (discard) is not served on loopback in test environments.
        let err = client("http://127.0.0.1:9/token/image")
            .token_image()
            .await
            .unwrap_err();
        assert!(matches!(err, WalletClientError::Request(_)));
    }
}
