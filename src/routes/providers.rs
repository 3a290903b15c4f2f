use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::browser::Browser;
use crate::domain::{AvailabilitySlot, Location, Provider};
use crate::infra::envelope::PageMeta;
use crate::pages::Notice;
use crate::routes::or_empty;
use crate::services::{self, availability::AvailabilityQuery, PageQuery};
use crate::state::AppState;
use crate::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patient/providers", get(directory))
        .route("/patient/providers/:id", get(detail))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DirectoryParams {
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Serialize)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    provider: Provider,
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(Serialize)]
pub struct DirectoryView {
    providers: Vec<DirectoryEntry>,
    meta: PageMeta,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDetail {
    provider: Provider,
    display_name: String,
    locations: Vec<Location>,
    availability: Vec<AvailabilitySlot>,
    notices: Vec<Notice>,
}

async fn directory(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
    Query(params): Query<DirectoryParams>,
) -> Result<Json<DirectoryView>, ApiError> {
    let query = PageQuery {
        page: params.page,
        limit: params.limit,
    };
    let page = services::provider::list(&state.api(&browser), query).await?;
    let providers = page
        .items
        .into_iter()
        .map(|provider| DirectoryEntry {
            display_name: provider.display_name(),
            provider,
        })
        .collect();
    Ok(Json(DirectoryView {
        providers,
        meta: page.meta,
    }))
}

/// A provider with where and when they can be booked. Locations or
/// availability that fail to load show as empty lists with a notice.
async fn detail(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
) -> Result<Json<ProviderDetail>, ApiError> {
    let api = state.api(&browser);
    let provider = services::provider::get(&api, id).await?;

    let mut notices = Vec::new();
    let locations: Vec<Location> = or_empty(
        services::location::list(&api, Some(id)).await,
        "locations",
        &mut notices,
    )?;
    let slots = or_empty(
        services::availability::list(&api, AvailabilityQuery::for_provider(id)).await,
        "availability",
        &mut notices,
    )?;

    Ok(Json(ProviderDetail {
        display_name: provider.display_name(),
        provider,
        locations: locations.into_iter().filter(|l| !l.is_archived).collect(),
        availability: slots.into_iter().filter(|s| s.is_active).collect(),
        notices,
    }))
}
