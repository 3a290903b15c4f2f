use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use cookie::Cookie;
use tracing::error;
use uuid::Uuid;

use crate::state::AppState;

/// Resolves the browser behind the request cookie (creating one when it is
/// missing or unknown) and puts it in the request extensions.
pub async fn attach_browser(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let cfg = state.config.clone();
    let known = cookie_value(req.headers(), &cfg.session_cookie_name)
        .and_then(|raw| Uuid::parse_str(&raw).ok());
    let (browser, created) = state.browsers.resolve(known);
    browser.touch();
    req.extensions_mut().insert(browser.clone());

    let mut res = next.run(req).await;

    if created {
        let cookie = Cookie::build((cfg.session_cookie_name.clone(), browser.id().to_string()))
            .http_only(true)
            .secure(cfg.secure_cookies)
            .same_site(cfg.same_site)
            .path("/")
            .build()
            .to_string();
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                res.headers_mut().append(SET_COOKIE, value);
            }
            Err(err) => error!(error = %err, "could not encode browser cookie"),
        }
    }
    res
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|part| Cookie::parse(part.trim().to_string()).ok())
        .find(|parsed| parsed.name() == name)
        .map(|parsed| parsed.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; portal_sid=abc-123"));
        assert_eq!(cookie_value(&headers, "portal_sid").as_deref(), Some("abc-123"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
