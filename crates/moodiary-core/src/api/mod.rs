//! REST API client module for the diary backend.
//!
//! This module provides the `ApiClient` for signing in, fetching the
//! profile, registering, managing diary entries and asking for a weather
//! suggestion. Authenticated calls carry the session token as a bearer
//! header.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
