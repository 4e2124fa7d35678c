use serde::{Deserialize, Serialize};

/// The authenticated account as reported by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
}

impl UserProfile {
    /// Local part of the email, used as a greeting name.
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

/// Body of `POST /auth/signin`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Body of `GET /auth/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}
