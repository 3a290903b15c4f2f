#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use clinic_portal::browser::Browser;
use clinic_portal::domain::{AuthUser, Role};
use clinic_portal::infra::config::PortalConfig;
use clinic_portal::infra::http::{build_http_client, ApiClient};
use clinic_portal::infra::storage::MemoryStorage;
use clinic_portal::session::Session;
use clinic_portal::state::AppState;
use serde_json::Value;
use tokio::net::TcpListener;

/// Serves `api` on an ephemeral port and returns its base URL.
pub async fn spawn_api(api: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake api");
    let addr = listener.local_addr().expect("fake api addr");
    tokio::spawn(async move {
        axum::serve(listener, api).await.expect("fake api");
    });
    format!("http://{addr}")
}

pub fn user(id: i64, role: Role) -> AuthUser {
    AuthUser {
        id,
        email: format!("{}{id}@clinic.test", role.as_str()),
        first_name: Some("Sam".into()),
        last_name: Some("Lee".into()),
        role,
    }
}

/// A stand-alone session plus the client that acts for it.
pub fn client(base_url: &str) -> (ApiClient, Arc<Session>, MemoryStorage) {
    let storage = MemoryStorage::new();
    let session = Arc::new(Session::new(Arc::new(storage.clone())));
    session.init();
    let http = build_http_client(Duration::from_secs(5)).expect("http client");
    (ApiClient::new(http, base_url, session.clone()), session, storage)
}

pub fn signed_in_client(base_url: &str, role: Role) -> (ApiClient, Arc<Session>, MemoryStorage) {
    let (api, session, storage) = client(base_url);
    session
        .login("token-abc".into(), user(7, role))
        .expect("login");
    (api, session, storage)
}

pub fn portal(base_url: &str) -> AppState {
    AppState::new(PortalConfig::new(base_url)).expect("portal state")
}

/// A browser already known to the portal, signed in as `role`.
pub fn signed_in_browser(state: &AppState, role: Role, id: i64) -> Arc<Browser> {
    let (browser, _) = state.browsers.resolve(None);
    browser
        .session()
        .login("token-abc".into(), user(id, role))
        .expect("login");
    browser
}

pub fn request(method: &str, uri: &str, browser: &Browser, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, format!("portal_sid={}", browser.id()));
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub fn location(res: &Response) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn json_body(res: Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn assert_redirect(res: &Response, to: &str) {
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(res), Some(to));
}
