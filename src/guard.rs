//! Which screens a browser may see, decided from its auth state alone.

use crate::domain::user::{Role, HOME_ROUTE};
use crate::session::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(&'static str),
    /// Auth state has not been read from storage yet.
    Pending,
}

pub fn decide(auth: &AuthState, allowed: &[Role]) -> GuardDecision {
    if auth.loading {
        return GuardDecision::Pending;
    }
    let user = match (&auth.user, auth.is_authenticated) {
        (Some(user), true) => user,
        _ => return GuardDecision::Redirect(HOME_ROUTE),
    };
    if allowed.contains(&user.role) {
        GuardDecision::Render
    } else {
        GuardDecision::Redirect(user.role.dashboard_route())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AuthUser;

    fn signed_in(role: Role) -> AuthState {
        AuthState {
            user: Some(AuthUser {
                id: 1,
                email: "someone@example.com".into(),
                first_name: None,
                last_name: None,
                role,
            }),
            token: Some("tok".into()),
            is_authenticated: true,
            loading: false,
        }
    }

    #[test]
    fn anonymous_goes_home() {
        assert_eq!(
            decide(&AuthState::default(), &[Role::Provider]),
            GuardDecision::Redirect("/")
        );
    }

    #[test]
    fn wrong_role_goes_to_own_dashboard() {
        assert_eq!(
            decide(&signed_in(Role::Patient), &[Role::Provider]),
            GuardDecision::Redirect("/patient/dashboard")
        );
        assert_eq!(
            decide(&signed_in(Role::Provider), &[Role::Patient]),
            GuardDecision::Redirect("/provider/dashboard")
        );
    }

    #[test]
    fn allowed_role_renders() {
        assert_eq!(
            decide(&signed_in(Role::Provider), &[Role::Patient, Role::Provider]),
            GuardDecision::Render
        );
    }

    #[test]
    fn loading_waits() {
        let state = AuthState {
            loading: true,
            ..AuthState::default()
        };
        assert_eq!(decide(&state, &[Role::Patient]), GuardDecision::Pending);
    }
}
