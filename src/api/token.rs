// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{error::ApiError, state::AppState};

const DEFAULT_IMAGE_TYPE: &str = "image/png";

/// Return the wallet token image unchanged.
#[utoipa::path(
    get,
    path = "/api/token",
    tag = "Token",
    responses(
        (status = 200, description = "Token image (PNG)"),
        (status = 502, description = "Wallet service failed")
    )
)]
pub async fn token_image(State(state): State<AppState>) -> Result<Response, ApiError> {
    let image = state.wallet.token_image().await.map_err(|e| {
        error!(error = %e, "Failed to fetch token image from wallet service");
        ApiError::bad_gateway(format!("wallet service unavailable: {e}"))
    })?;

    let content_type = image
        .content_type
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_string());

    Ok(([(header::CONTENT_TYPE, content_type)], image.bytes).into_response())
}
