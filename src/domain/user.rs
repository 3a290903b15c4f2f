use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::forms::{check_email, FieldErrors};
use crate::infra::storage::{ONBOARDED_PATIENT_KEY, ONBOARDED_PROVIDER_KEY};

pub const HOME_ROUTE: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Provider,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Provider => "provider",
        }
    }

    pub fn login_route(self) -> &'static str {
        match self {
            Role::Patient => "/patient/login",
            Role::Provider => "/provider/login",
        }
    }

    pub fn dashboard_route(self) -> &'static str {
        match self {
            Role::Patient => "/patient/dashboard",
            Role::Provider => "/provider/dashboard",
        }
    }

    pub fn register_route(self) -> &'static str {
        match self {
            Role::Patient => "/patient/register",
            Role::Provider => "/provider/register",
        }
    }

    pub fn welcome_route(self) -> &'static str {
        match self {
            Role::Patient => "/patient/welcome",
            Role::Provider => "/provider/welcome",
        }
    }

    pub fn login_endpoint(self) -> &'static str {
        match self {
            Role::Patient => "/auth/patient/login",
            Role::Provider => "/auth/provider/login",
        }
    }

    /// Storage key that carries a fresh registration to the welcome screen.
    pub fn onboarded_key(self) -> &'static str {
        match self {
            Role::Patient => ONBOARDED_PATIENT_KEY,
            Role::Provider => ONBOARDED_PROVIDER_KEY,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in user as persisted under the `user` storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: Role,
}

impl AuthUser {
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_follow_role() {
        assert_eq!(Role::Provider.login_route(), "/provider/login");
        assert_eq!(Role::Patient.dashboard_route(), "/patient/dashboard");
        assert_eq!(Role::Provider.login_endpoint(), "/auth/provider/login");
        assert_eq!(Role::Patient.onboarded_key(), "onboardedPatient");
    }

    #[test]
    fn role_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Provider).unwrap(), "\"provider\"");
        assert_eq!(serde_json::from_str::<Role>("\"patient\"").unwrap(), Role::Patient);
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut user = AuthUser {
            id: 1,
            email: "ana@example.com".into(),
            first_name: Some("Ana".into()),
            last_name: Some("Silva".into()),
            role: Role::Patient,
        };
        assert_eq!(user.display_name(), "Ana Silva");
        user.first_name = None;
        user.last_name = Some(" ".into());
        assert_eq!(user.display_name(), "ana@example.com");
    }

    #[test]
    fn credentials_need_email_and_password() {
        let errors = Credentials::default().validate();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }
}
