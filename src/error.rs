use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of a single API call, already translated into a message that can
/// be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Your session has expired, please log in again")]
    Unauthorized { login_route: &'static str },
    /// A sign-in the API refused. The session is untouched.
    #[error("{0}")]
    BadCredentials(String),
    #[error("{0}")]
    Failed(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Shape(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized { .. } | ApiError::BadCredentials(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Failed(_) | ApiError::Transport(_) | ApiError::Shape(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized { login_route } => Redirect::to(login_route).into_response(),
            other => (other.status(), Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_becomes_a_redirect() {
        let res = ApiError::Unauthorized {
            login_route: "/provider/login",
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()["location"], "/provider/login");
    }

    #[test]
    fn other_errors_keep_their_message() {
        let err = ApiError::NotFound("Availability not found".into());
        assert_eq!(err.to_string(), "Availability not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn refused_sign_in_is_not_an_expired_session() {
        let err = ApiError::BadCredentials("Invalid email or password".into());
        assert!(!err.is_unauthorized());
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
