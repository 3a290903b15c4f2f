use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use tracing::warn;

use crate::browser::Browser;
use crate::domain::user::HOME_ROUTE;
use crate::domain::{AuthUser, Role};
use crate::middleware::{browser::attach_browser, guard};
use crate::pages::Notice;
use crate::state::AppState;
use crate::ApiError;

mod auth;
mod availability;
mod dashboard;
mod patients;
mod profile;
mod providers;
mod registration;

pub fn router(state: AppState) -> Router {
    let patient = Router::new()
        .route("/patient/dashboard", get(dashboard::patient))
        .route(
            "/patient/profile",
            get(profile::patient_show).patch(profile::patient_update),
        )
        .merge(providers::router())
        .route_layer(from_fn(guard::patient_only));

    let provider = Router::new()
        .route("/provider/dashboard", get(dashboard::provider))
        .route(
            "/provider/profile",
            get(profile::provider_show).patch(profile::provider_update),
        )
        .merge(availability::router())
        .merge(patients::router())
        .route_layer(from_fn(guard::provider_only));

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .merge(auth::router())
        .merge(registration::router())
        .merge(patient)
        .merge(provider)
        .layer(from_fn_with_state(state.clone(), attach_browser))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct Link {
    label: &'static str,
    href: &'static str,
}

#[derive(Serialize)]
struct HomeView {
    user: Option<AuthUser>,
    links: Vec<Link>,
}

async fn home(Extension(browser): Extension<Arc<Browser>>) -> Json<HomeView> {
    let user = browser.session().user();
    let links = match user.as_ref().map(|u| u.role) {
        Some(role) => vec![Link {
            label: "Dashboard",
            href: role.dashboard_route(),
        }],
        None => [Role::Patient, Role::Provider]
            .into_iter()
            .flat_map(|role| {
                let (login, register) = match role {
                    Role::Patient => ("Patient login", "Register as a patient"),
                    Role::Provider => ("Provider login", "Register as a provider"),
                };
                [
                    Link {
                        label: login,
                        href: role.login_route(),
                    },
                    Link {
                        label: register,
                        href: role.register_route(),
                    },
                ]
            })
            .collect(),
    };
    Json(HomeView { user, links })
}

/// The signed-in user. Guarded routes only see this fail when the session
/// ended between the guard and the handler.
fn signed_in(browser: &Browser) -> Result<AuthUser, ApiError> {
    browser.session().user().ok_or(ApiError::Unauthorized {
        login_route: HOME_ROUTE,
    })
}

/// Secondary data for a screen: anything but an expired session degrades
/// to an empty value, and the failure goes into `notices` for the view.
fn or_empty<T: Default>(
    result: Result<T, ApiError>,
    what: &str,
    notices: &mut Vec<Notice>,
) -> Result<T, ApiError> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_unauthorized() => Err(err),
        Err(err) => {
            warn!(error = %err, "{what} unavailable; showing none");
            notices.push(Notice::error(err.to_string()));
            Ok(T::default())
        }
    }
}

/// Re-renders a form view with the error's status, or redirects when the
/// session is gone.
fn form_failure<V: Serialize>(err: ApiError, view: V) -> Response {
    if err.is_unauthorized() {
        return err.into_response();
    }
    (err.status(), Json(view)).into_response()
}
