use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::{info, warn};

use crate::browser::Browser;
use crate::domain::AvailabilityForm;
use crate::infra::http::ApiClient;
use crate::pages::availability::{Dialog, DialogError, DialogMode};
use crate::pages::Notice;
use crate::routes::signed_in;
use crate::services::{self, availability::AvailabilityQuery};
use crate::state::AppState;
use crate::ApiError;

const INTERRUPTED: &str = "The request was interrupted before it finished";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/provider/availability", get(show))
        .route("/provider/availability/new", post(open_create))
        .route("/provider/availability/dialog", post(submit).delete(cancel))
        .route("/provider/availability/:id/edit", post(open_edit))
        .route("/provider/availability/:id/delete", post(delete))
}

fn render(browser: &Browser, status: StatusCode) -> Response {
    let view = browser.availability().view();
    (status, Json(view)).into_response()
}

fn reject(browser: &Browser, err: DialogError) -> Response {
    match err {
        // field errors already sit on the open dialog
        DialogError::Invalid(_) => render(browser, StatusCode::UNPROCESSABLE_ENTITY),
        other => {
            browser.availability().notify(Notice::error(other.to_string()));
            render(browser, StatusCode::CONFLICT)
        }
    }
}

/// An expired session takes the screen state with it.
fn expired(browser: &Browser, err: ApiError) -> ApiError {
    if err.is_unauthorized() {
        browser.reset_pages();
    }
    err
}

enum Pending {
    Submit,
    Delete(i64),
}

/// A request the page shows as in flight. Dropping it unsettled (the client
/// went away mid-request) reports the request as failed so the page never
/// stays busy.
struct InFlight<'a> {
    browser: &'a Browser,
    pending: Pending,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(browser: &'a Browser, pending: Pending) -> Self {
        Self {
            browser,
            pending,
            settled: false,
        }
    }

    fn settle(mut self, outcome: &Result<(), ApiError>) {
        self.report(outcome);
        self.settled = true;
    }

    fn report(&self, outcome: &Result<(), ApiError>) {
        let mut page = self.browser.availability();
        match self.pending {
            Pending::Submit => page.finish_submit(outcome),
            Pending::Delete(id) => page.finish_delete(id, outcome),
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(browser = %self.browser.id(), "availability request dropped before it finished");
            self.report(&Err(ApiError::Transport(INTERRUPTED.into())));
        }
    }
}

/// Replaces the whole list with a fresh fetch. A failed fetch shows an empty
/// list plus an error notice.
async fn refresh_slots(api: &ApiClient, browser: &Browser, provider_id: i64) -> Result<(), ApiError> {
    let slots = match services::availability::list(api, AvailabilityQuery::for_provider(provider_id)).await {
        Ok(slots) => slots,
        Err(err) if err.is_unauthorized() => return Err(expired(browser, err)),
        Err(err) => {
            warn!(provider_id, error = %err, "availability fetch failed; showing an empty list");
            browser.availability().notify(Notice::error(err.to_string()));
            Vec::new()
        }
    };
    browser.availability().replace_slots(slots);
    Ok(())
}

async fn refresh_locations(api: &ApiClient, browser: &Browser, provider_id: i64) -> Result<(), ApiError> {
    let locations = match services::location::list(api, Some(provider_id)).await {
        Ok(locations) => locations,
        Err(err) if err.is_unauthorized() => return Err(expired(browser, err)),
        Err(err) => {
            warn!(provider_id, error = %err, "location fetch failed; no locations to pick");
            browser.availability().notify(Notice::error(err.to_string()));
            Vec::new()
        }
    };
    browser.availability().replace_locations(locations);
    Ok(())
}

async fn show(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
) -> Result<Response, ApiError> {
    let user = signed_in(&browser)?;
    let api = state.api(&browser);
    refresh_locations(&api, &browser, user.id).await?;
    refresh_slots(&api, &browser, user.id).await?;
    Ok(render(&browser, StatusCode::OK))
}

async fn open_create(Extension(browser): Extension<Arc<Browser>>) -> Response {
    let opened = browser.availability().open_create();
    match opened {
        Ok(()) => render(&browser, StatusCode::OK),
        Err(err) => reject(&browser, err),
    }
}

async fn open_edit(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
) -> Result<Response, ApiError> {
    let user = signed_in(&browser)?;
    let closed = matches!(browser.availability().dialog(), Dialog::Closed);
    if !closed {
        return Ok(reject(&browser, DialogError::AlreadyOpen));
    }

    let api = state.api(&browser);
    let slot = services::availability::get(&api, id)
        .await
        .map_err(|err| expired(&browser, err))?;
    if slot.provider_id != user.id {
        return Err(ApiError::NotFound("Availability not found".into()));
    }
    let opened = browser.availability().open_edit(&slot);
    Ok(match opened {
        Ok(()) => render(&browser, StatusCode::OK),
        Err(err) => reject(&browser, err),
    })
}

async fn cancel(Extension(browser): Extension<Arc<Browser>>) -> Response {
    let cancelled = browser.availability().cancel();
    match cancelled {
        Ok(()) => render(&browser, StatusCode::OK),
        Err(err) => reject(&browser, err),
    }
}

async fn submit(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
    Json(form): Json<AvailabilityForm>,
) -> Result<Response, ApiError> {
    let user = signed_in(&browser)?;
    let ticket = browser.availability().begin_submit(form, user.id);
    let ticket = match ticket {
        Ok(ticket) => ticket,
        Err(err) => return Ok(reject(&browser, err)),
    };
    let in_flight = InFlight::new(&browser, Pending::Submit);

    let api = state.api(&browser);
    let outcome = match ticket.mode {
        DialogMode::Create => services::availability::create(&api, &ticket.input)
            .await
            .map(|_| ()),
        DialogMode::Edit { id } => services::availability::update(&api, id, &ticket.input)
            .await
            .map(|_| ()),
    };
    in_flight.settle(&outcome);

    match outcome {
        Ok(()) => {
            info!(provider_id = user.id, mode = ?ticket.mode, "availability saved");
            refresh_slots(&api, &browser, user.id).await?;
            Ok(render(&browser, StatusCode::OK))
        }
        Err(err) if err.is_unauthorized() => Err(expired(&browser, err)),
        Err(err) => {
            warn!(provider_id = user.id, error = %err, "saving availability failed");
            Ok(render(&browser, err.status()))
        }
    }
}

/// Only row `id` is marked busy while its delete is in flight.
async fn delete(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
) -> Result<Response, ApiError> {
    let user = signed_in(&browser)?;
    let started = browser.availability().begin_delete(id);
    if !started {
        browser
            .availability()
            .notify(Notice::error("This availability is already being deleted"));
        return Ok(render(&browser, StatusCode::CONFLICT));
    }
    let in_flight = InFlight::new(&browser, Pending::Delete(id));

    let api = state.api(&browser);
    let outcome = services::availability::delete(&api, id).await;
    in_flight.settle(&outcome);

    match outcome {
        Ok(()) => {
            info!(provider_id = user.id, slot_id = id, "availability deleted");
            refresh_slots(&api, &browser, user.id).await?;
            Ok(render(&browser, StatusCode::OK))
        }
        Err(err) if err.is_unauthorized() => Err(expired(&browser, err)),
        Err(err) => {
            warn!(slot_id = id, error = %err, "deleting availability failed");
            Ok(render(&browser, err.status()))
        }
    }
}
