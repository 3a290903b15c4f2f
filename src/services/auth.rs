use serde::Deserialize;

use crate::domain::{AuthUser, Credentials, Role};
use crate::infra::http::{ApiClient, Call};
use crate::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLogin {
    token: String,
    user: WireUser,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    id: i64,
    email: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    role: Option<Role>,
}

/// `POST /auth/{role}/login`. A user record without a role gets the role of
/// the endpoint it signed in through.
pub async fn login(
    api: &ApiClient,
    role: Role,
    credentials: &Credentials,
) -> Result<LoginResponse, ApiError> {
    let call = Call::post(role.login_endpoint())
        .json(credentials)?
        .describe("Account", "sign in")
        .credentials_check();
    let wire: WireLogin = api.send(call).await?.data()?;
    if wire.token.trim().is_empty() {
        return Err(ApiError::Shape("Sign-in response did not include a token".into()));
    }
    Ok(LoginResponse {
        token: wire.token,
        user: AuthUser {
            id: wire.user.id,
            email: wire.user.email,
            first_name: wire.user.first_name,
            last_name: wire.user.last_name,
            role: wire.user.role.unwrap_or(role),
        },
    })
}

pub async fn logout(api: &ApiClient) -> Result<(), ApiError> {
    api.send(Call::post("/auth/logout").describe("Session", "sign out"))
        .await
        .map(|_| ())
}
