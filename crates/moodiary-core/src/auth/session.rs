//! The client-side session: who is signed in, and with which token.
//!
//! `Session` owns the volatile `{ user, token }` pair and keeps the token in
//! lockstep with a durable `TokenStore`. It moves between three states:
//!
//! - **Anonymous**: no token, no user
//! - **Stale**: token restored from storage, profile not yet confirmed
//! - **Authenticated**: token and user both present
//!
//! `login` goes Anonymous/Stale/Authenticated -> Authenticated, `logout` and a
//! failed `check_auth` go to Anonymous, a successful `check_auth` turns Stale
//! into Authenticated. The session is shared by `Arc` between the router and
//! the UI; observers subscribe to changes through a `watch` channel.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::models::UserProfile;

use super::{AuthService, CredentialError, TokenStore};

/// Where a session currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Stale,
    Authenticated,
}

/// Snapshot of the session fields.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
}

impl SessionData {
    pub fn status(&self) -> SessionStatus {
        match (&self.token, &self.user) {
            (None, _) => SessionStatus::Anonymous,
            (Some(_), None) => SessionStatus::Stale,
            (Some(_), Some(_)) => SessionStatus::Authenticated,
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for SessionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionData")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Why a login attempt did not produce a session.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Service(#[from] ApiError),

    #[error("Could not persist session token: {0}")]
    Storage(#[from] CredentialError),
}

impl AuthError {
    /// Message for the login form.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Service(e) => e.user_message(),
            AuthError::Storage(_) => "Signed in, but the session could not be saved".to_string(),
        }
    }
}

pub struct Session {
    auth: Arc<dyn AuthService>,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionData>,
}

impl Session {
    /// Build a session from whatever token the store holds.
    ///
    /// A stored token yields a Stale session; call `check_auth` to confirm it.
    /// A store that cannot be read is treated as empty.
    pub fn restore(auth: Arc<dyn AuthService>, store: Arc<dyn TokenStore>) -> Self {
        let token = match store.get() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session token, starting signed out");
                None
            }
        };
        debug!(has_token = token.is_some(), "Session restored");

        let (state, _) = watch::channel(SessionData { user: None, token });
        Self { auth, store, state }
    }

    pub fn snapshot(&self) -> SessionData {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    pub fn has_token(&self) -> bool {
        self.state.borrow().has_token()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    /// Receive every change to `{ user, token }`.
    pub fn subscribe(&self) -> watch::Receiver<SessionData> {
        self.state.subscribe()
    }

    /// Sign in and resolve the profile.
    ///
    /// Nothing is written until both network calls succeed. The durable store
    /// is written before memory, so a storage failure leaves the session
    /// exactly as it was.
    pub async fn try_login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let issued = self.auth.sign_in(email, password).await?;
        let user = self.auth.get_profile(&issued.access_token).await?;

        self.store.set(&issued.access_token)?;
        self.state.send_replace(SessionData {
            user: Some(user.clone()),
            token: Some(issued.access_token),
        });

        info!(user_id = user.id, "Login successful");
        Ok(user)
    }

    /// Sign in. Every failure is logged and reported as `false`.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        match self.try_login(email, password).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Login failed");
                false
            }
        }
    }

    /// Forget the user and token, in memory and on disk. Safe to call repeatedly.
    pub fn logout(&self) {
        let changed = self.state.send_if_modified(|data| {
            let was_signed_in = data.token.is_some() || data.user.is_some();
            data.user = None;
            data.token = None;
            was_signed_in
        });

        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to remove persisted session token");
        }

        if changed {
            info!("Logged out");
        }
    }

    /// Confirm the held token with the server and refresh the profile.
    ///
    /// Without a token this returns `false` and makes no request. A rejected
    /// token, or any other failure, logs the session out. If the token was
    /// replaced or cleared while the request was in flight, the answer is
    /// about a token the session no longer holds and is discarded.
    pub async fn check_auth(&self) -> bool {
        let Some(token) = self.token() else {
            return false;
        };

        let result = self.auth.get_profile(&token).await;
        if self.token().as_deref() != Some(token.as_str()) {
            debug!("Session token changed during check, ignoring result");
            return self.has_token();
        }

        match result {
            Ok(user) => {
                debug!(user_id = user.id, "Session token confirmed");
                self.state.send_if_modified(|data| {
                    // Checked again under the lock
                    if data.token.as_deref() != Some(token.as_str()) {
                        return false;
                    }
                    let changed = data.user.as_ref() != Some(&user);
                    data.user = Some(user);
                    changed
                });
                true
            }
            Err(e) => {
                warn!(error = %e, "Session token rejected, logging out");
                self.logout();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::*;
    use crate::auth::testing::{FailingStore, MockAuth};
    use crate::auth::MemoryTokenStore;

    fn profile(id: i64, email: &str) -> UserProfile {
        UserProfile {
            id,
            email: email.to_string(),
        }
    }

    fn session(auth: &Arc<MockAuth>, store: &MemoryTokenStore) -> Session {
        Session::restore(auth.clone(), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_login_scenario() {
        let auth = Arc::new(MockAuth::new().sign_in_ok("tok123").profile_ok(7, "u@x.com"));
        let store = MemoryTokenStore::new();
        let session = session(&auth, &store);

        assert!(session.login("u@x.com", "secret").await);

        assert_eq!(session.token().as_deref(), Some("tok123"));
        assert_eq!(session.user(), Some(profile(7, "u@x.com")));
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(store.get().expect("get").as_deref(), Some("tok123"));
        assert_eq!(auth.profile_tokens(), vec!["tok123".to_string()]);
    }

    #[tokio::test]
    async fn test_login_persists_exact_token() {
        let auth = Arc::new(MockAuth::new().sign_in_ok("opaque.tok/en==").profile_ok(1, "a@b.com"));
        let store = MemoryTokenStore::new();
        let session = session(&auth, &store);

        assert!(session.login("a@b.com", "pw").await);
        assert_eq!(store.get().expect("get").as_deref(), Some("opaque.tok/en=="));
    }

    #[tokio::test]
    async fn test_rejected_sign_in_leaves_state_untouched() {
        let auth = Arc::new(MockAuth::new().sign_in_err(ApiError::Unauthorized));
        let store = MemoryTokenStore::new();
        let session = session(&auth, &store);

        assert!(!session.login("u@x.com", "wrong").await);

        assert_eq!(session.snapshot(), SessionData::default());
        assert_eq!(store.get().expect("get"), None);
        assert_eq!(auth.profile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_login_keeps_previous_session() {
        let auth = Arc::new(
            MockAuth::new()
                .sign_in_ok("tok1")
                .profile_ok(7, "u@x.com")
                .sign_in_ok("tok2")
                .profile_err(ApiError::ServerError("boom".into())),
        );
        let store = MemoryTokenStore::new();
        let session = session(&auth, &store);

        assert!(session.login("u@x.com", "pw").await);
        let before = session.snapshot();

        assert!(!session.login("u@x.com", "pw").await);
        assert_eq!(session.snapshot(), before);
        assert_eq!(store.get().expect("get").as_deref(), Some("tok1"));
    }

    #[tokio::test]
    async fn test_login_storage_failure_leaves_state_untouched() {
        let auth = Arc::new(MockAuth::new().sign_in_ok("tok").profile_ok(7, "u@x.com"));
        let session = Session::restore(auth.clone(), Arc::new(FailingStore));

        let result = session.try_login("u@x.com", "pw").await;
        assert!(matches!(result, Err(AuthError::Storage(_))));
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert_eq!(session.user(), None);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let auth = Arc::new(MockAuth::new().sign_in_ok("tok").profile_ok(7, "u@x.com"));
        let store = MemoryTokenStore::new();
        let session = session(&auth, &store);
        assert!(session.login("u@x.com", "pw").await);

        session.logout();
        let once = session.snapshot();
        assert_eq!(store.get().expect("get"), None);

        session.logout();
        assert_eq!(session.snapshot(), once);
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert_eq!(store.get().expect("get"), None);
    }

    #[tokio::test]
    async fn test_logout_with_failing_store_still_clears_memory() {
        let auth = Arc::new(MockAuth::new());
        let session = Session::restore(auth, Arc::new(FailingStore));
        session.logout();
        assert_eq!(session.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_check_auth_without_token_makes_no_request() {
        let auth = Arc::new(MockAuth::new().profile_ok(7, "u@x.com"));
        let store = MemoryTokenStore::new();
        let session = session(&auth, &store);

        assert!(!session.check_auth().await);
        assert_eq!(auth.profile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reload_restores_session() {
        let auth = Arc::new(
            MockAuth::new()
                .sign_in_ok("tok123")
                .profile_ok(7, "u@x.com")
                .profile_ok(7, "u@x.com"),
        );
        let store = MemoryTokenStore::new();
        {
            let session = session(&auth, &store);
            assert!(session.login("u@x.com", "secret").await);
        }

        // Fresh process: memory is gone, durable storage is not
        let session = session(&auth, &store);
        assert_eq!(session.token().as_deref(), Some("tok123"));
        assert_eq!(session.status(), SessionStatus::Stale);

        assert!(session.check_auth().await);
        assert_eq!(session.user(), Some(profile(7, "u@x.com")));
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(auth.profile_tokens().last().map(String::as_str), Some("tok123"));
    }

    #[tokio::test]
    async fn test_check_auth_rejected_token_logs_out() {
        let auth = Arc::new(MockAuth::new().profile_err(ApiError::Unauthorized));
        let store = MemoryTokenStore::with_token("expired");
        let session = session(&auth, &store);
        assert_eq!(session.status(), SessionStatus::Stale);

        assert!(!session.check_auth().await);
        assert_eq!(session.snapshot(), SessionData::default());
        assert_eq!(store.get().expect("get"), None);
    }

    #[tokio::test]
    async fn test_check_auth_replaces_profile() {
        let auth = Arc::new(
            MockAuth::new()
                .sign_in_ok("tok")
                .profile_ok(7, "old@x.com")
                .profile_ok(7, "new@x.com"),
        );
        let store = MemoryTokenStore::new();
        let session = session(&auth, &store);
        assert!(session.login("old@x.com", "pw").await);

        assert!(session.check_auth().await);
        assert_eq!(session.user(), Some(profile(7, "new@x.com")));
    }

    #[tokio::test]
    async fn test_restore_with_unreadable_store_is_anonymous() {
        let auth = Arc::new(MockAuth::new());
        let session = Session::restore(auth, Arc::new(FailingStore));
        assert_eq!(session.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let auth = Arc::new(MockAuth::new().sign_in_ok("tok").profile_ok(7, "u@x.com"));
        let store = MemoryTokenStore::new();
        let session = session(&auth, &store);
        let mut rx = session.subscribe();

        assert!(session.login("u@x.com", "pw").await);
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(rx.borrow_and_update().status(), SessionStatus::Authenticated);

        session.logout();
        assert!(rx.has_changed().expect("sender alive"));
        assert!(!rx.borrow_and_update().has_token());

        // Already signed out: nothing to announce
        session.logout();
        assert!(!rx.has_changed().expect("sender alive"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_auth_for_replaced_token_is_discarded() {
        let auth = Arc::new(
            MockAuth::new()
                .profile_ok_after(1, "a@x.com", Duration::from_millis(50))
                .sign_in_ok("tokB")
                .profile_ok(2, "b@x.com"),
        );
        let store = MemoryTokenStore::with_token("tokA");
        let session = session(&auth, &store);

        let (checked, logged_in) = tokio::join!(session.check_auth(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            session.login("b@x.com", "pw").await
        });

        assert!(logged_in);
        assert!(checked);
        assert_eq!(session.token().as_deref(), Some("tokB"));
        assert_eq!(session.user(), Some(profile(2, "b@x.com")));
        assert_eq!(store.get().expect("get").as_deref(), Some("tokB"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_of_replaced_token_keeps_new_session() {
        let auth = Arc::new(
            MockAuth::new()
                .profile_err_after(ApiError::Unauthorized, Duration::from_millis(50))
                .sign_in_ok("tokB")
                .profile_ok(2, "b@x.com"),
        );
        let store = MemoryTokenStore::with_token("expired");
        let session = session(&auth, &store);

        let (_, logged_in) = tokio::join!(session.check_auth(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            session.login("b@x.com", "pw").await
        });

        assert!(logged_in);
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(store.get().expect("get").as_deref(), Some("tokB"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_during_login_is_overtaken() {
        let auth = Arc::new(
            MockAuth::new()
                .sign_in_ok("tokA")
                .profile_ok_after(1, "a@x.com", Duration::from_millis(50)),
        );
        let store = MemoryTokenStore::new();
        let session = session(&auth, &store);

        let (logged_in, ()) = tokio::join!(session.login("a@x.com", "pw"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            session.logout();
        });

        // Last writer wins: the login completes after the logout
        assert!(logged_in);
        assert_eq!(session.token().as_deref(), Some("tokA"));
        assert_eq!(session.user(), Some(profile(1, "a@x.com")));
        assert_eq!(store.get().expect("get").as_deref(), Some("tokA"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_logins_last_writer_wins() {
        let auth = Arc::new(
            MockAuth::new()
                .sign_in_ok("tokA")
                .sign_in_ok("tokB")
                .profile_ok_after(1, "a@x.com", Duration::from_millis(50))
                .profile_ok_after(2, "b@x.com", Duration::from_millis(10)),
        );
        let store = MemoryTokenStore::new();
        let session = session(&auth, &store);

        let (first, second) = tokio::join!(
            session.login("a@x.com", "pw"),
            session.login("b@x.com", "pw"),
        );
        assert!(first && second);

        // The first login finishes last, so its token is what both layers hold
        assert_eq!(session.token().as_deref(), Some("tokA"));
        assert_eq!(session.user(), Some(profile(1, "a@x.com")));
        assert_eq!(store.get().expect("get").as_deref(), Some("tokA"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let data = SessionData {
            user: None,
            token: Some("supersecret".to_string()),
        };
        let rendered = format!("{:?}", data);
        assert!(!rendered.contains("supersecret"));
        assert!(rendered.contains("<redacted>"));
    }
}
