//! Scripted collaborators for session, guard and reconciler tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::{SignInResponse, UserProfile};

use super::{AuthService, CredentialError, TokenStore};

type Scripted<T> = Mutex<VecDeque<(Duration, Result<T, ApiError>)>>;

/// Auth service that replays queued responses in order, each after its
/// scripted delay. An unscripted call fails with a server error.
#[derive(Default)]
pub(crate) struct MockAuth {
    sign_in: Scripted<SignInResponse>,
    profile: Scripted<UserProfile>,
    seen_tokens: Mutex<Vec<String>>,
    pub sign_in_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
}

impl MockAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in_ok(self, token: &str) -> Self {
        self.sign_in_ok_after(token, Duration::ZERO)
    }

    pub fn sign_in_ok_after(self, token: &str, delay: Duration) -> Self {
        let issued = SignInResponse {
            access_token: token.to_string(),
        };
        self.sign_in.lock().unwrap().push_back((delay, Ok(issued)));
        self
    }

    pub fn sign_in_err(self, error: ApiError) -> Self {
        self.sign_in.lock().unwrap().push_back((Duration::ZERO, Err(error)));
        self
    }

    pub fn profile_ok(self, id: i64, email: &str) -> Self {
        self.profile_ok_after(id, email, Duration::ZERO)
    }

    pub fn profile_ok_after(self, id: i64, email: &str, delay: Duration) -> Self {
        let user = UserProfile {
            id,
            email: email.to_string(),
        };
        self.profile.lock().unwrap().push_back((delay, Ok(user)));
        self
    }

    pub fn profile_err(self, error: ApiError) -> Self {
        self.profile_err_after(error, Duration::ZERO)
    }

    pub fn profile_err_after(self, error: ApiError, delay: Duration) -> Self {
        self.profile.lock().unwrap().push_back((delay, Err(error)));
        self
    }

    /// Tokens passed to `get_profile`, oldest first
    pub fn profile_tokens(&self) -> Vec<String> {
        self.seen_tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthService for MockAuth {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<SignInResponse, ApiError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.sign_in.lock().unwrap().pop_front();
        replay(next, "unscripted sign_in").await
    }

    async fn get_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens.lock().unwrap().push(token.to_string());
        let next = self.profile.lock().unwrap().pop_front();
        replay(next, "unscripted get_profile").await
    }
}

async fn replay<T>(
    next: Option<(Duration, Result<T, ApiError>)>,
    unscripted: &str,
) -> Result<T, ApiError> {
    let Some((delay, result)) = next else {
        return Err(ApiError::ServerError(unscripted.into()));
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    result
}

/// Store whose every operation fails.
pub(crate) struct FailingStore;

impl FailingStore {
    fn error() -> CredentialError {
        CredentialError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "storage unavailable",
        ))
    }
}

impl TokenStore for FailingStore {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        Err(Self::error())
    }

    fn set(&self, _token: &str) -> Result<(), CredentialError> {
        Err(Self::error())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        Err(Self::error())
    }
}
