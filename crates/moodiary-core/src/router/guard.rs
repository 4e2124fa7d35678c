//! Pre-transition hooks.

use crate::auth::SessionData;

use super::{RouteMatch, LOGIN_PATH};

/// Outcome of a guard for one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Hook evaluated before every route transition.
pub trait NavigationGuard: Send + Sync {
    fn before_each(&self, to: &RouteMatch, session: &SessionData) -> GuardDecision;
}

/// Keeps signed-out users away from routes marked `requires_auth`.
///
/// Only the presence of a token is checked, not its validity: an expired
/// token passes until the server rejects a request or the reconciler runs.
#[derive(Debug, Clone)]
pub struct RequireAuth {
    login_path: String,
}

impl RequireAuth {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }
}

impl Default for RequireAuth {
    fn default() -> Self {
        Self::new(LOGIN_PATH)
    }
}

impl NavigationGuard for RequireAuth {
    fn before_each(&self, to: &RouteMatch, session: &SessionData) -> GuardDecision {
        if to.meta.requires_auth && !session.has_token() {
            GuardDecision::Redirect(self.login_path.clone())
        } else {
            GuardDecision::Allow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use crate::router::{diary_routes, resolve};

    fn route(path: &str) -> RouteMatch {
        resolve(&diary_routes(), path).expect("route should resolve")
    }

    #[test]
    fn test_denies_protected_route_without_token() {
        let guard = RequireAuth::default();
        let decision = guard.before_each(&route("/diaries"), &SessionData::default());
        assert_eq!(decision, GuardDecision::Redirect("/login".to_string()));
    }

    #[test]
    fn test_allows_any_present_token() {
        let guard = RequireAuth::default();
        // Stale session: token present, validity unknown
        let stale = SessionData {
            user: None,
            token: Some("maybe-expired".to_string()),
        };
        assert_eq!(guard.before_each(&route("/diaries/3"), &stale), GuardDecision::Allow);

        let authed = SessionData {
            user: Some(UserProfile {
                id: 7,
                email: "u@x.com".to_string(),
            }),
            token: Some("tok".to_string()),
        };
        assert_eq!(guard.before_each(&route("/stats"), &authed), GuardDecision::Allow);
    }

    #[test]
    fn test_public_routes_always_allowed() {
        let guard = RequireAuth::default();
        let anonymous = SessionData::default();
        assert_eq!(guard.before_each(&route("/login"), &anonymous), GuardDecision::Allow);
        assert_eq!(guard.before_each(&route("/register"), &anonymous), GuardDecision::Allow);
    }
}
