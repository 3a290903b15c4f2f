use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::infra::envelope::Envelope;
use crate::session::Session;
use crate::ApiError;

pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("clinic-portal/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
}

/// One outgoing API call plus what to say when it fails.
#[derive(Debug, Clone)]
pub struct Call {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
    resource: &'static str,
    action: &'static str,
    session_bound: bool,
}

impl Call {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            resource: "Record",
            action: "complete the request",
            session_bound: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn query_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Shape(format!("Could not encode request: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Names the resource for "not found" and the action for generic failures.
    pub fn describe(mut self, resource: &'static str, action: &'static str) -> Self {
        self.resource = resource;
        self.action = action;
        self
    }

    /// A 401 on this call means bad credentials, not an expired session.
    pub fn credentials_check(mut self) -> Self {
        self.session_bound = false;
        self
    }

    fn failure_message(&self) -> String {
        format!("Failed to {}", self.action)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<Value>,
}

/// Request client for one browser. Attaches its bearer token and ends its
/// session when the API answers 401.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(http: Client, base_url: impl Into<String>, session: Arc<Session>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn send(&self, call: Call) -> Result<Envelope, ApiError> {
        let url = format!("{}{}", self.base_url, call.path);
        let mut req = self.http.request(call.method.clone(), &url);
        if !call.query.is_empty() {
            req = req.query(&call.query);
        }
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &call.body {
            req = req.json(body);
        }

        debug!(method = %call.method, path = %call.path, "api request");
        let res = req.send().await.map_err(|err| {
            warn!(method = %call.method, path = %call.path, error = %err, "api request failed");
            ApiError::Transport(call.failure_message())
        })?;
        let status = res.status();
        let bytes = res.bytes().await.map_err(|err| {
            warn!(path = %call.path, error = %err, "reading api response failed");
            ApiError::Transport(call.failure_message())
        })?;

        if !status.is_success() {
            return Err(self.error_for(status, &bytes, &call));
        }

        let envelope = if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            Envelope::empty()
        } else {
            Envelope::parse(&bytes)?
        };
        if !envelope.success {
            return Err(ApiError::Failed(
                envelope.message.unwrap_or_else(|| call.failure_message()),
            ));
        }
        Ok(envelope)
    }

    fn error_for(&self, status: StatusCode, bytes: &[u8], call: &Call) -> ApiError {
        let body: ErrorBody = serde_json::from_slice(bytes).unwrap_or_default();
        let server_message = body.message.or(body.error).filter(|m| !m.trim().is_empty());

        match status {
            StatusCode::UNAUTHORIZED if call.session_bound => {
                let login_route = self.session.expire();
                warn!(path = %call.path, login_route, "api rejected the session token; signed out");
                ApiError::Unauthorized { login_route }
            }
            StatusCode::UNAUTHORIZED => ApiError::BadCredentials(
                server_message.unwrap_or_else(|| "Invalid email or password".into()),
            ),
            StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation(
                server_message
                    .or_else(|| body.errors.as_ref().and_then(first_error_message))
                    .unwrap_or_else(|| "Validation failed".into()),
            ),
            StatusCode::NOT_FOUND => ApiError::NotFound(format!("{} not found", call.resource)),
            _ => {
                warn!(path = %call.path, %status, "api call failed");
                ApiError::Failed(server_message.unwrap_or_else(|| call.failure_message()))
            }
        }
    }
}

/// Validation bodies come as `["msg"]`, `[{"message": "msg"}]` or
/// `{"field": ["msg"]}`.
fn first_error_message(errors: &Value) -> Option<String> {
    match errors {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_error_message),
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| map.values().find_map(first_error_message)),
        _ => None,
    }
}
