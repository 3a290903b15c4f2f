use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::browser::Browser;
use crate::domain::Patient;
use crate::infra::envelope::PageMeta;
use crate::infra::http::ApiClient;
use crate::pages::Notice;
use crate::routes::or_empty;
use crate::services::{self, PageQuery};
use crate::state::AppState;
use crate::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/provider/patients", get(list))
        .route("/provider/patients/:id", get(show))
        .route("/provider/patients/:id/delete", post(delete))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PatientsParams {
    search: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

impl PatientsParams {
    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientsView {
    patients: Vec<Patient>,
    meta: PageMeta,
    search: Option<String>,
    notices: Vec<Notice>,
}

#[derive(Serialize)]
pub struct PatientView {
    patient: Patient,
}

/// One API page, narrowed locally by `search`.
async fn fetch(api: &ApiClient, params: &PatientsParams) -> Result<PatientsView, ApiError> {
    let page = services::patient::list(api, params.page_query()).await?;
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let patients = match &search {
        Some(term) => page.items.into_iter().filter(|p| p.matches(term)).collect(),
        None => page.items,
    };
    Ok(PatientsView {
        patients,
        meta: page.meta,
        search,
        notices: Vec::new(),
    })
}

async fn list(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
    Query(params): Query<PatientsParams>,
) -> Result<Json<PatientsView>, ApiError> {
    let view = fetch(&state.api(&browser), &params).await?;
    Ok(Json(view))
}

async fn show(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
) -> Result<Json<PatientView>, ApiError> {
    let patient = services::patient::get(&state.api(&browser), id).await?;
    Ok(Json(PatientView { patient }))
}

async fn delete(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
    Query(params): Query<PatientsParams>,
) -> Result<Response, ApiError> {
    let api = state.api(&browser);
    let notice = match services::patient::delete(&api, id).await {
        Ok(()) => {
            info!(patient_id = id, "patient deleted");
            Notice::success("Patient deleted")
        }
        Err(err) if err.is_unauthorized() => return Err(err),
        Err(err) => {
            warn!(patient_id = id, error = %err, "deleting patient failed");
            let mut notices = vec![Notice::error(err.to_string())];
            let mut view = or_empty(fetch(&api, &params).await, "patients", &mut notices)?;
            view.notices = notices;
            return Ok((err.status(), Json(view)).into_response());
        }
    };
    let mut view = fetch(&api, &params).await?;
    view.notices.push(notice);
    Ok((StatusCode::OK, Json(view)).into_response())
}
