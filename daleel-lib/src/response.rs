//! Response wrapper with cache status

use chrono::DateTime;
use chrono::Utc;

/// A response from the client that carries cache status alongside the data.
///
/// Every fetch (section/chapter/lesson lists, lesson content) returns this
/// wrapper so callers can tell whether the data was served from the
/// in-memory cache or freshly fetched.
#[derive(Debug, Clone)]
pub struct Response<T> {
    data: T,
    /// Whether this response came from cache.
    pub cache: CacheStatus,
}

impl<T> Response<T> {
    /// Creates a new response with no cache involvement.
    pub fn new(data: T) -> Self {
        Self {
            data,
            cache: CacheStatus::None,
        }
    }

    /// Creates a response for a cache miss (fresh fetch, now cached).
    pub fn cache_miss(data: T, cached_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            data,
            cache: CacheStatus::Miss {
                cached_at,
                expires_at,
            },
        }
    }

    /// Creates a response for a cache hit.
    pub fn cache_hit(data: T, cached_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            data,
            cache: CacheStatus::Hit {
                cached_at,
                expires_at,
            },
        }
    }

    /// Returns `true` if this response came from the cache.
    pub fn is_cached(&self) -> bool {
        matches!(self.cache, CacheStatus::Hit { .. })
    }

    /// Returns when the data was cached, if caching was involved.
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        match &self.cache {
            CacheStatus::None => None,
            CacheStatus::Miss { cached_at, .. } | CacheStatus::Hit { cached_at, .. } => {
                Some(*cached_at)
            }
        }
    }

    /// Returns a reference to the inner data.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the response and returns the inner data.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Maps the inner data, preserving the cache status.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Response<U> {
        Response {
            data: f(self.data),
            cache: self.cache,
        }
    }
}

/// Cache status for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Caching was disabled or bypassed for this request.
    None,
    /// Cache miss: data was freshly fetched and is now cached.
    Miss {
        cached_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },
    /// Cache hit: data was returned from cache.
    Hit {
        cached_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },
}

impl CacheStatus {
    /// Returns `true` if this is a cache hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Returns `true` if this is a cache miss.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss { .. })
    }
}
