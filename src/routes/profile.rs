use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use tracing::info;

use crate::browser::Browser;
use crate::domain::patient::PatientUpdate;
use crate::domain::provider::ProviderUpdate;
use crate::domain::FieldErrors;
use crate::pages::Notice;
use crate::services;
use crate::state::AppState;
use crate::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView<T> {
    profile: T,
    notice: Option<Notice>,
}

#[derive(Serialize)]
struct InvalidProfile {
    errors: FieldErrors,
}

fn invalid(errors: FieldErrors) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(InvalidProfile { errors })).into_response()
}

pub async fn patient_show(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
) -> Result<Response, ApiError> {
    let profile = services::patient::me(&state.api(&browser)).await?;
    Ok(Json(ProfileView {
        profile,
        notice: None,
    })
    .into_response())
}

/// Saves, then shows the profile as the API now has it.
pub async fn patient_update(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
    Json(update): Json<PatientUpdate>,
) -> Result<Response, ApiError> {
    let errors = update.validate();
    if !errors.is_empty() {
        return Ok(invalid(errors));
    }
    let api = state.api(&browser);
    services::patient::update_me(&api, &update).await?;
    let profile = services::patient::me(&api).await?;
    info!(patient_id = profile.id, "patient profile updated");
    Ok(Json(ProfileView {
        profile,
        notice: Some(Notice::success("Profile updated")),
    })
    .into_response())
}

pub async fn provider_show(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
) -> Result<Response, ApiError> {
    let profile = services::provider::me(&state.api(&browser)).await?;
    Ok(Json(ProfileView {
        profile,
        notice: None,
    })
    .into_response())
}

pub async fn provider_update(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
    Json(update): Json<ProviderUpdate>,
) -> Result<Response, ApiError> {
    let errors = update.validate();
    if !errors.is_empty() {
        return Ok(invalid(errors));
    }
    let api = state.api(&browser);
    services::provider::update_me(&api, &update).await?;
    let profile = services::provider::me(&api).await?;
    info!(provider_id = profile.id, "provider profile updated");
    Ok(Json(ProfileView {
        profile,
        notice: Some(Notice::success("Profile updated")),
    })
    .into_response())
}
