use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::browser::Browser;
use crate::domain::user::HOME_ROUTE;
use crate::domain::{Credentials, FieldErrors, Role};
use crate::routes::form_failure;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patient/login", get(patient_form).post(patient_login))
        .route("/provider/login", get(provider_form).post(provider_login))
        .route("/logout", post(logout))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginView {
    role: Role,
    register_route: &'static str,
    error: Option<String>,
    errors: FieldErrors,
}

impl LoginView {
    fn new(role: Role) -> Self {
        Self {
            role,
            register_route: role.register_route(),
            error: None,
            errors: FieldErrors::default(),
        }
    }
}

async fn patient_form(Extension(browser): Extension<Arc<Browser>>) -> Response {
    login_form(Role::Patient, &browser)
}

async fn provider_form(Extension(browser): Extension<Arc<Browser>>) -> Response {
    login_form(Role::Provider, &browser)
}

fn login_form(role: Role, browser: &Browser) -> Response {
    match browser.session().user() {
        Some(user) => Redirect::to(user.role.dashboard_route()).into_response(),
        None => Json(LoginView::new(role)).into_response(),
    }
}

async fn patient_login(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
    Json(credentials): Json<Credentials>,
) -> Response {
    submit_login(Role::Patient, &state, &browser, credentials).await
}

async fn provider_login(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
    Json(credentials): Json<Credentials>,
) -> Response {
    submit_login(Role::Provider, &state, &browser, credentials).await
}

async fn submit_login(
    role: Role,
    state: &AppState,
    browser: &Browser,
    credentials: Credentials,
) -> Response {
    let errors = credentials.validate();
    if !errors.is_empty() {
        let view = LoginView {
            errors,
            ..LoginView::new(role)
        };
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response();
    }

    let api = state.api(browser);
    let response = match services::auth::login(&api, role, &credentials).await {
        Ok(response) => response,
        Err(err) => {
            warn!(%role, error = %err, "sign-in failed");
            let view = LoginView {
                error: Some(err.to_string()),
                ..LoginView::new(role)
            };
            return form_failure(err, view);
        }
    };

    match browser.session().login(response.token, response.user) {
        Ok(auth) => {
            browser.reset_pages();
            let target = auth.role().unwrap_or(role).dashboard_route();
            Redirect::to(target).into_response()
        }
        Err(err) => {
            error!(error = %err, "could not persist sign-in");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Sign-out always completes locally, whatever the API says.
async fn logout(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
) -> Redirect {
    if browser.session().token().is_some() {
        let api = state.api(&browser);
        if let Err(err) = services::auth::logout(&api).await {
            warn!(error = %err, "logout request failed; signing out locally");
        }
    }
    browser.session().logout();
    browser.reset_pages();
    Redirect::to(HOME_ROUTE)
}
