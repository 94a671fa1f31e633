// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ApiError,
    models::{RegistrationSummary, SsoServiceSummary},
    saml::RelyingPartyRegistration,
    state::AppState,
};

impl From<&RelyingPartyRegistration> for RegistrationSummary {
    fn from(registration: &RelyingPartyRegistration) -> Self {
        let idp = registration.asserting_party();
        Self {
            registration_id: registration.registration_id().to_string(),
            entity_id: registration.entity_id().to_string(),
            assertion_consumer_service_location: registration
                .assertion_consumer_service_location()
                .to_string(),
            idp_entity_id: idp.entity_id.clone(),
            single_sign_on_services: idp
                .single_sign_on_services
                .iter()
                .map(|endpoint| SsoServiceSummary {
                    binding: endpoint.binding.clone(),
                    location: endpoint.location.clone(),
                })
                .collect(),
            want_authn_requests_signed: idp.want_authn_requests_signed,
            signing_credentials: registration.signing_credentials().len(),
            decryption_credentials: registration.decryption_credentials().len(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/registrations",
    tag = "Registrations",
    responses((status = 200, body = [RegistrationSummary]))
)]
pub async fn list_registrations(State(state): State<AppState>) -> Json<Vec<RegistrationSummary>> {
    Json(state.registry.iter().map(RegistrationSummary::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/registrations/{registration_id}",
    tag = "Registrations",
    params(("registration_id" = String, Path, description = "Relying party registration id")),
    responses(
        (status = 200, body = RegistrationSummary),
        (status = 404, description = "Unknown registration id")
    )
)]
pub async fn get_registration(
    State(state): State<AppState>,
    Path(registration_id): Path<String>,
) -> Result<Json<RegistrationSummary>, ApiError> {
    state
        .registry
        .find_by_registration_id(&registration_id)
        .map(|registration| Json(RegistrationSummary::from(registration)))
        .ok_or_else(|| ApiError::not_found(format!("unknown registration '{registration_id}'")))
}
