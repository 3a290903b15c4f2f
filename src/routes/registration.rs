use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, info, warn};

use crate::browser::Browser;
use crate::domain::patient::{OnboardedPatient, PatientOnboard};
use crate::domain::provider::{OnboardedProvider, ProviderOnboard};
use crate::domain::{FieldErrors, Role};
use crate::infra::storage::Storage;
use crate::routes::form_failure;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patient/register", get(patient_form).post(register_patient))
        .route("/provider/register", get(provider_form).post(register_provider))
        .route("/patient/welcome", get(patient_welcome))
        .route("/provider/welcome", get(provider_welcome))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationView {
    role: Role,
    login_route: &'static str,
    error: Option<String>,
    errors: FieldErrors,
}

impl RegistrationView {
    fn new(role: Role) -> Self {
        Self {
            role,
            login_route: role.login_route(),
            error: None,
            errors: FieldErrors::default(),
        }
    }

    fn invalid(role: Role, errors: FieldErrors) -> Response {
        let view = Self {
            errors,
            ..Self::new(role)
        };
        (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WelcomeView<T> {
    role: Role,
    account: T,
    login_route: &'static str,
}

async fn patient_form() -> Json<RegistrationView> {
    Json(RegistrationView::new(Role::Patient))
}

async fn provider_form() -> Json<RegistrationView> {
    Json(RegistrationView::new(Role::Provider))
}

async fn register_patient(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
    Json(form): Json<PatientOnboard>,
) -> Response {
    let role = Role::Patient;
    let errors = form.validate();
    if !errors.is_empty() {
        return RegistrationView::invalid(role, errors);
    }
    let api = state.api(&browser);
    match services::patient::onboard(&api, &form).await {
        Ok(res) => {
            info!(patient_id = res.patient.id, "patient registered");
            remember_and_welcome(&browser, role, &OnboardedPatient::from(&res.patient))
        }
        Err(err) => {
            warn!(error = %err, "patient registration failed");
            let view = RegistrationView {
                error: Some(err.to_string()),
                ..RegistrationView::new(role)
            };
            form_failure(err, view)
        }
    }
}

async fn register_provider(
    State(state): State<AppState>,
    Extension(browser): Extension<Arc<Browser>>,
    Json(form): Json<ProviderOnboard>,
) -> Response {
    let role = Role::Provider;
    let errors = form.validate();
    if !errors.is_empty() {
        return RegistrationView::invalid(role, errors);
    }
    let api = state.api(&browser);
    match services::provider::onboard(&api, &form).await {
        Ok(res) => {
            info!(provider_id = res.provider.id, "provider registered");
            remember_and_welcome(&browser, role, &OnboardedProvider::from(&res.provider))
        }
        Err(err) => {
            warn!(error = %err, "provider registration failed");
            let view = RegistrationView {
                error: Some(err.to_string()),
                ..RegistrationView::new(role)
            };
            form_failure(err, view)
        }
    }
}

/// Parks the new account under the role's onboarding key for the welcome
/// screen and sends the browser there.
fn remember_and_welcome<T: Serialize>(browser: &Browser, role: Role, account: &T) -> Response {
    match serde_json::to_string(account) {
        Ok(raw) => {
            browser.storage().set(role.onboarded_key(), raw);
            Redirect::to(role.welcome_route()).into_response()
        }
        Err(err) => {
            error!(error = %err, "could not store the onboarded account");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn patient_welcome(Extension(browser): Extension<Arc<Browser>>) -> Response {
    welcome::<OnboardedPatient>(&browser, Role::Patient)
}

async fn provider_welcome(Extension(browser): Extension<Arc<Browser>>) -> Response {
    welcome::<OnboardedProvider>(&browser, Role::Provider)
}

/// Shown once: the onboarding record is consumed on read. Without one the
/// browser goes back to registration.
fn welcome<T: DeserializeOwned + Serialize>(browser: &Browser, role: Role) -> Response {
    let account = browser
        .storage()
        .take(role.onboarded_key())
        .and_then(|raw| serde_json::from_str::<T>(&raw).ok());
    match account {
        Some(account) => Json(WelcomeView {
            role,
            account,
            login_route: role.login_route(),
        })
        .into_response(),
        None => Redirect::to(role.register_route()).into_response(),
    }
}
