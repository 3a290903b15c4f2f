use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{AuthUser, Role};
use crate::infra::storage::{Storage, TOKEN_KEY, USER_KEY};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<AuthUser>,
    #[serde(skip)]
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl AuthState {
    fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    fn signed_in(user: AuthUser, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
            loading: false,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

#[derive(Deserialize)]
struct StoredRole {
    role: Role,
}

/// Auth state of one browser, backed by its persisted storage.
pub struct Session {
    storage: Arc<dyn Storage>,
    state: RwLock<AuthState>,
}

impl Session {
    /// Not usable for routing until [`Session::init`] has run.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            state: RwLock::new(AuthState::loading()),
        }
    }

    /// Reads `token` and `user` once. An unreadable `user` record signs the
    /// browser out.
    pub fn init(&self) -> AuthState {
        let token = self.storage.get(TOKEN_KEY);
        let raw_user = self.storage.get(USER_KEY);
        let state = match (token, raw_user) {
            (Some(token), Some(raw)) => match serde_json::from_str::<AuthUser>(&raw) {
                Ok(user) => AuthState::signed_in(user, token),
                Err(err) => {
                    warn!(error = %err, "stored user is unreadable; clearing auth storage");
                    self.clear_storage();
                    AuthState::default()
                }
            },
            _ => AuthState::default(),
        };
        *self.write() = state.clone();
        state
    }

    pub fn state(&self) -> AuthState {
        self.read().clone()
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.read().user.clone()
    }

    /// Token as currently persisted, which is what goes on the wire.
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn login(&self, token: String, user: AuthUser) -> Result<AuthState, serde_json::Error> {
        let raw = serde_json::to_string(&user)?;
        self.storage.set(TOKEN_KEY, token.clone());
        self.storage.set(USER_KEY, raw);
        info!(user_id = user.id, role = %user.role, "signed in");
        let state = AuthState::signed_in(user, token);
        *self.write() = state.clone();
        Ok(state)
    }

    pub fn logout(&self) {
        self.clear_storage();
        *self.write() = AuthState::default();
    }

    /// The API rejected our token. Signs out and returns the login screen
    /// for whoever was signed in, patient login when that is unknown.
    pub fn expire(&self) -> &'static str {
        let role = self
            .storage
            .get(USER_KEY)
            .and_then(|raw| serde_json::from_str::<StoredRole>(&raw).ok())
            .map(|stored| stored.role)
            .unwrap_or(Role::Patient);
        self.logout();
        role.login_route()
    }

    fn clear_storage(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::storage::MemoryStorage;

    fn provider() -> AuthUser {
        AuthUser {
            id: 11,
            email: "doc@clinic.org".into(),
            first_name: Some("Ada".into()),
            last_name: None,
            role: Role::Provider,
        }
    }

    fn session_with(storage: &MemoryStorage) -> Session {
        Session::new(Arc::new(storage.clone()))
    }

    #[test]
    fn starts_loading_until_init() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);
        assert!(session.state().loading);
        let state = session.init();
        assert!(!state.loading);
        assert!(!state.is_authenticated);
    }

    #[test]
    fn init_restores_persisted_login() {
        let storage = MemoryStorage::new();
        session_with(&storage).login("tok".into(), provider()).unwrap();

        let session = session_with(&storage);
        let state = session.init();
        assert!(state.is_authenticated);
        assert_eq!(state.role(), Some(Role::Provider));
        assert_eq!(session.token().as_deref(), Some("tok"));
    }

    #[test]
    fn corrupted_user_signs_out() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok".into());
        storage.set(USER_KEY, "{not json".into());
        let state = session_with(&storage).init();
        assert!(!state.is_authenticated);
        assert!(storage.get(TOKEN_KEY).is_none());
        assert!(storage.get(USER_KEY).is_none());
    }

    #[test]
    fn expire_routes_by_last_role() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);
        session.login("tok".into(), provider()).unwrap();
        assert_eq!(session.expire(), "/provider/login");
        assert!(storage.get(TOKEN_KEY).is_none());
        assert!(storage.get(USER_KEY).is_none());
        assert!(!session.state().is_authenticated);
    }

    #[test]
    fn expire_defaults_to_patient_login() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);
        assert_eq!(session.expire(), "/patient/login");

        storage.set(USER_KEY, r#"{"role":"admin"}"#.into());
        assert_eq!(session.expire(), "/patient/login");

        storage.set(USER_KEY, "garbage".into());
        assert_eq!(session.expire(), "/patient/login");
    }

    #[test]
    fn logout_clears_only_auth_keys() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);
        session.login("tok".into(), provider()).unwrap();
        storage.set("onboardedProvider", "{}".into());
        session.logout();
        assert!(session.token().is_none());
        assert!(storage.get("onboardedProvider").is_some());
    }
}
