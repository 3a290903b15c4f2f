use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::browser::Browser;
use crate::domain::{AuthUser, Patient, Provider};
use crate::pages::Notice;
use crate::routes::{or_empty, signed_in};
use crate::services::{self, availability::AvailabilityQuery};
use crate::state::AppState;
use crate::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDashboard {
    user: AuthUser,
    profile: Patient,
    provider: Option<Provider>,
    notices: Vec<Notice>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDashboard {
    user: AuthUser,
    profile: Provider,
    availability_count: usize,
    active_availability_count: usize,
    location_count: usize,
    notices: Vec<Notice>,
}

pub async fn patient(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
) -> Result<Json<PatientDashboard>, ApiError> {
    let user = signed_in(&browser)?;
    let api = state.api(&browser);
    let profile = services::patient::me(&api).await?;

    let mut notices = Vec::new();
    let provider = match profile.provider_id {
        Some(id) => or_empty(
            services::provider::get(&api, id).await.map(Some),
            "assigned provider",
            &mut notices,
        )?,
        None => None,
    };

    Ok(Json(PatientDashboard {
        user,
        profile,
        provider,
        notices,
    }))
}

pub async fn provider(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
) -> Result<Json<ProviderDashboard>, ApiError> {
    let user = signed_in(&browser)?;
    let api = state.api(&browser);
    let profile = services::provider::me(&api).await?;

    let mut notices = Vec::new();
    let slots = or_empty(
        services::availability::list(&api, AvailabilityQuery::for_provider(user.id)).await,
        "availability",
        &mut notices,
    )?;
    let locations = or_empty(
        services::location::list(&api, Some(user.id)).await,
        "locations",
        &mut notices,
    )?;

    Ok(Json(ProviderDashboard {
        availability_count: slots.len(),
        active_availability_count: slots.iter().filter(|s| s.is_active).count(),
        location_count: locations.iter().filter(|l| !l.is_archived).count(),
        user,
        profile,
        notices,
    }))
}
