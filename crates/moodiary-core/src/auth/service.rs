use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::{SignInResponse, UserProfile};

/// The two backend calls the session depends on.
///
/// `ApiClient` is the production implementation; tests script their own.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for an access token
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, ApiError>;

    /// Fetch the profile `token` belongs to. Fails when the token is expired or invalid.
    async fn get_profile(&self, token: &str) -> Result<UserProfile, ApiError>;
}
