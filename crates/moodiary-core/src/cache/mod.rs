//! Local caching module for offline viewing.
//!
//! This module provides the `CacheManager` for storing the last fetched
//! diary list per user. Data is cached in JSON format and considered stale
//! after 60 minutes. The cache is cleared whenever the session ends, whether
//! the user logged out or the token was rejected.

pub mod manager;
pub mod owner;

pub use manager::{CacheManager, CachedData};
pub use owner::{evict, CacheOwner, Eviction};
