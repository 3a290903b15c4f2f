use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header::RETRY_AFTER, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

use crate::browser::Browser;
use crate::domain::Role;
use crate::guard::{decide, GuardDecision};

pub async fn patient_only(req: Request, next: Next) -> Response {
    enforce(&[Role::Patient], req, next).await
}

pub async fn provider_only(req: Request, next: Next) -> Response {
    enforce(&[Role::Provider], req, next).await
}

async fn enforce(allowed: &'static [Role], req: Request, next: Next) -> Response {
    let Some(browser) = req.extensions().get::<Arc<Browser>>().cloned() else {
        error!("role guard ran before the browser layer");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    match decide(&browser.session().state(), allowed) {
        GuardDecision::Render => next.run(req).await,
        GuardDecision::Redirect(to) => Redirect::to(to).into_response(),
        GuardDecision::Pending => {
            (StatusCode::SERVICE_UNAVAILABLE, [(RETRY_AFTER, "1")]).into_response()
        }
    }
}
