//! moodiary core - everything a diary client needs apart from rendering.
//!
//! - `auth`: the session (`{ user, token }`), its durable token store and reconciliation
//! - `router`: route table, path resolution and the auth navigation guard
//! - `api`: REST client for sign-in, profile, diaries and weather
//! - `models`: diary entries, emotions, weather, user profile
//! - `cache`: per-user offline copy of the diary list
//! - `stats`: emotion statistics

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod router;
pub mod stats;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthService, Session, SessionData, SessionStatus, TokenStore};
pub use config::Config;
pub use router::{Navigation, NavigationError, Router, View};
