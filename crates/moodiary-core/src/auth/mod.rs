//! Authentication module for managing the user session and its token.
//!
//! This module provides:
//! - `Session`: reactive `{ user, token }` state with login, logout and reconciliation
//! - `TokenStore`: durable storage for the token (file, OS keychain, or memory)
//! - `AuthService`: the sign-in and profile calls the session depends on
//! - `spawn_reconciler`: optional periodic re-validation of the token

pub mod credentials;
pub mod reconcile;
pub mod service;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use credentials::{
    CredentialError, FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore,
    SESSION_TOKEN_KEY,
};
pub use reconcile::spawn_reconciler;
pub use service::AuthService;
pub use session::{AuthError, Session, SessionData, SessionStatus};
