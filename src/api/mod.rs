// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{RegistrationSummary, SsoServiceSummary},
    state::AppState,
};

pub mod health;
pub mod registrations;
pub mod token;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/token", get(token::token_image))
        .route("/registrations", get(registrations::list_registrations))
        .route(
            "/registrations/{registration_id}",
            get(registrations::get_registration),
        );

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        token::token_image,
        registrations::list_registrations,
        registrations::get_registration,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RegistrationSummary,
            SsoServiceSummary,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Token", description = "Wallet token image"),
        (name = "Registrations", description = "Trusted identity providers"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
