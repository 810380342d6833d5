//! Cache configuration

use std::time::Duration;

/// Configuration for cache TTL (time-to-live) settings.
///
/// Controls how long the two classes of fetched data are kept before a
/// refetch is issued. A zero TTL disables caching for that class.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use daleel_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default()
///     .with_list_ttl(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for list responses (sections, chapters, lessons).
    ///
    /// Default: 5 minutes
    pub list_ttl: Duration,

    /// TTL for lesson content (HTML body, file references).
    ///
    /// Default: 10 minutes
    pub content_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl: Duration::from_secs(300),
            content_ttl: Duration::from_secs(600),
        }
    }
}

impl CacheConfig {
    /// Creates a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the list TTL.
    pub fn with_list_ttl(mut self, ttl: Duration) -> Self {
        self.list_ttl = ttl;
        self
    }

    /// Sets the lesson content TTL.
    pub fn with_content_ttl(mut self, ttl: Duration) -> Self {
        self.content_ttl = ttl;
        self
    }

    /// Creates a config with no caching (zero TTLs).
    pub fn no_cache() -> Self {
        Self {
            list_ttl: Duration::ZERO,
            content_ttl: Duration::ZERO,
        }
    }
}
