//! Which user's cache belongs to the live session.
//!
//! A session can end without the UI asking for it: a 401, the background
//! reconciler, or a restored token that fails its first check. `CacheOwner`
//! watches session snapshots and says whose cache to drop when the token
//! goes away.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::auth::SessionData;

/// Cache to remove after a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eviction {
    /// The signed-in user was known
    User(i64),
    /// The session ended before its user was confirmed
    All,
}

#[derive(Debug, Default)]
pub struct CacheOwner {
    user_id: Option<i64>,
    had_token: bool,
}

impl CacheOwner {
    /// Start from the session as it is now.
    pub fn new(initial: &SessionData) -> Self {
        let mut owner = Self::default();
        owner.observe(initial);
        owner
    }

    /// Record a session snapshot. Returns what to evict when this snapshot
    /// ends a session.
    pub fn observe(&mut self, data: &SessionData) -> Option<Eviction> {
        if let Some(user) = &data.user {
            self.user_id = Some(user.id);
        }
        let ended = self.had_token && !data.has_token();
        self.had_token = data.has_token();
        if !ended {
            return None;
        }
        Some(match self.user_id.take() {
            Some(id) => Eviction::User(id),
            None => Eviction::All,
        })
    }
}

/// Remove a cache directory if it exists.
pub fn evict(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to clear {}", dir.display()))?;
        debug!(dir = %dir.display(), "Cache evicted");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheManager;
    use crate::models::UserProfile;

    fn signed_in(id: i64) -> SessionData {
        SessionData {
            user: Some(UserProfile {
                id,
                email: "u@x.com".to_string(),
            }),
            token: Some("tok".to_string()),
        }
    }

    fn restored() -> SessionData {
        SessionData {
            user: None,
            token: Some("tok".to_string()),
        }
    }

    #[test]
    fn test_forced_logout_evicts_known_user() {
        let mut owner = CacheOwner::new(&SessionData::default());
        assert_eq!(owner.observe(&signed_in(7)), None);
        assert_eq!(owner.observe(&SessionData::default()), Some(Eviction::User(7)));
        // Already anonymous
        assert_eq!(owner.observe(&SessionData::default()), None);
    }

    #[test]
    fn test_rejected_restored_token_evicts_all() {
        let mut owner = CacheOwner::new(&restored());
        assert_eq!(owner.observe(&SessionData::default()), Some(Eviction::All));
    }

    #[test]
    fn test_user_is_forgotten_after_eviction() {
        let mut owner = CacheOwner::new(&signed_in(7));
        assert_eq!(owner.observe(&SessionData::default()), Some(Eviction::User(7)));

        // Next session never confirms a profile
        assert_eq!(owner.observe(&restored()), None);
        assert_eq!(owner.observe(&SessionData::default()), Some(Eviction::All));
    }

    #[test]
    fn test_switching_accounts_keeps_latest_user() {
        let mut owner = CacheOwner::new(&signed_in(7));
        assert_eq!(owner.observe(&signed_in(9)), None);
        assert_eq!(owner.observe(&SessionData::default()), Some(Eviction::User(9)));
    }

    #[test]
    fn test_evict_removes_cached_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let user_dir = dir.path().join("user-7");
        let cache = CacheManager::new(user_dir.clone()).expect("cache");
        cache.save_diaries(&[]).expect("save");

        evict(&user_dir).expect("evict");
        assert!(!user_dir.exists());
        // Nothing left to remove
        evict(&user_dir).expect("evict again");
    }
}
