//! API client for communicating with the diary REST API.
//!
//! This module provides the `ApiClient` struct for signing in, fetching the
//! current profile, and managing diary entries on behalf of the user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::AuthService;
use crate::models::{
    Diary, DiaryUpdate, Emotion, NewDiary, ProfileResponse, SignInResponse, UserProfile,
    WeatherReport,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// The session core enforces no timeout of its own; this is the only one.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// API client for the diary backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments. Each segment is percent-encoded,
    /// so values such as emotion tags can be passed as-is.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(response: Response) -> Result<Option<Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request, backing off exponentially while the server rate limits us.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let attempt = builder
                .try_clone()
                .ok_or_else(|| ApiError::InvalidResponse("request cannot be retried".into()))?;
            let response = attempt.send().await?;
            let url = response.url().path().to_string();

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(url = %url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let path = response.url().path().to_string();
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{path}: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, url)).await?;
        Self::json(response).await
    }

    async fn send_body<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.request(method, url).json(body)).await?;
        Self::json(response).await
    }

    // ===== Authentication =====

    /// Exchange email and password for an access token
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, ApiError> {
        let url = self.endpoint(&["auth", "signin"])?;
        debug!(url = %url, "Signing in");
        let builder = self
            .client
            .post(url)
            .json(&Credentials { email, password });
        let response = self.send(builder).await?;
        Self::json(response).await
    }

    /// Fetch the profile that `token` belongs to
    pub async fn get_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        let url = self.endpoint(&["auth", "profile"])?;
        let response = self.send(self.client.get(url).bearer_auth(token)).await?;
        let profile: ProfileResponse = Self::json(response).await?;
        Ok(profile.user)
    }

    /// Create a new account. The server's response body is not used.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", "register"])?;
        let builder = self
            .client
            .post(url)
            .json(&Credentials { email, password });
        self.send(builder).await?;
        Ok(())
    }

    // ===== Diaries =====

    pub async fn create_diary(&self, entry: &NewDiary) -> Result<Diary, ApiError> {
        let url = self.endpoint(&["diaries"])?;
        self.send_body(Method::POST, url, entry).await
    }

    pub async fn fetch_diaries(&self) -> Result<Vec<Diary>, ApiError> {
        self.get(self.endpoint(&["diaries"])?).await
    }

    pub async fn fetch_diary(&self, id: i64) -> Result<Diary, ApiError> {
        let id = id.to_string();
        self.get(self.endpoint(&["diaries", &id])?).await
    }

    pub async fn update_diary(&self, id: i64, update: &DiaryUpdate) -> Result<Diary, ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&["diaries", &id])?;
        self.send_body(Method::PATCH, url, update).await
    }

    pub async fn delete_diary(&self, id: i64) -> Result<(), ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&["diaries", &id])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    pub async fn search_diaries(&self, keyword: &str) -> Result<Vec<Diary>, ApiError> {
        let mut url = self.endpoint(&["diaries", "search"])?;
        url.query_pairs_mut().append_pair("keyword", keyword);
        self.get(url).await
    }

    pub async fn filter_by_emotion(&self, emotion: Emotion) -> Result<Vec<Diary>, ApiError> {
        let url = self.endpoint(&["diaries", "emotion", emotion.value()])?;
        self.get(url).await
    }

    // ===== Weather =====

    /// Ask the server for a weather suggestion at the given coordinates
    pub async fn fetch_weather(&self, lat: f64, lon: f64) -> Result<WeatherReport, ApiError> {
        let mut url = self.endpoint(&["weather"])?;
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string());
        self.get(url).await
    }
}

#[async_trait]
impl AuthService for ApiClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, ApiError> {
        ApiClient::sign_in(self, email, password).await
    }

    async fn get_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        ApiClient::get_profile(self, token).await
    }
}
