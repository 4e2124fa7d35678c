//! Periodic background `check_auth`.
//!
//! The route guard only checks that a token is present. Running the
//! reconciler bounds how long an expired token can keep passing it: once the
//! server rejects the token, the session logs out and the next guarded
//! navigation redirects to login.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::Session;

/// Smallest accepted interval between checks.
pub const MIN_RECONCILE_INTERVAL: Duration = Duration::from_secs(10);

/// Spawn a task that re-validates the session token every `every`.
///
/// The first check runs one full interval after spawning. Sessions without a
/// token are skipped. Abort the returned handle to stop.
pub fn spawn_reconciler(session: Arc<Session>, every: Duration) -> JoinHandle<()> {
    let every = every.max(MIN_RECONCILE_INTERVAL);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !session.has_token() {
                continue;
            }
            let valid = session.check_auth().await;
            debug!(valid, "Background session check finished");
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::api::ApiError;
    use crate::auth::testing::MockAuth;
    use crate::auth::{MemoryTokenStore, SessionStatus, TokenStore};

    #[tokio::test(start_paused = true)]
    async fn test_reconciler_logs_out_rejected_token() {
        let auth = Arc::new(
            MockAuth::new()
                .profile_ok(7, "u@x.com")
                .profile_err(ApiError::Unauthorized),
        );
        let store = MemoryTokenStore::with_token("tok");
        let session = Arc::new(Session::restore(auth.clone(), Arc::new(store.clone())));

        let handle = spawn_reconciler(session.clone(), Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(session.status(), SessionStatus::Authenticated);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert_eq!(store.get().expect("get"), None);

        // No token left: further ticks make no requests
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(auth.profile_calls.load(Ordering::SeqCst), 2);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconciler_clamps_interval() {
        let auth = Arc::new(MockAuth::new().profile_ok(7, "u@x.com"));
        let store = MemoryTokenStore::with_token("tok");
        let session = Arc::new(Session::restore(auth.clone(), Arc::new(store)));

        let handle = spawn_reconciler(session.clone(), Duration::from_millis(1));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(auth.profile_calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(auth.profile_calls.load(Ordering::SeqCst), 1);

        handle.abort();
    }
}
