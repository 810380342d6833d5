//! Main DaleelClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::cache::CacheConfig;
use crate::cache::CacheProvider;
use crate::cache::CachedValue;
use crate::cache::InMemoryCache;
use crate::error::ApiError;
use crate::error::Error;
use crate::rate_limit::ConcurrencyLimiter;
use crate::rate_limit::RetryConfig;
use crate::response::Response;

/// Fallback used only to label timeout errors when no timeout is configured.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The client for the DaleelFM content API.
///
/// Cheap to clone (uses `Arc` internally) and safe to share across tasks.
/// All list and content fetches go through an in-memory TTL cache, and every
/// request is retried with backoff on transient failures per [`RetryConfig`].
///
/// # Example
///
/// ```ignore
/// use daleel_lib::DaleelClient;
///
/// let client = DaleelClient::builder()
///     .url("https://api.daleelfm.com")
///     .build();
///
/// let sections = client.list_roots(ContentArea::Handbook).await?;
/// ```
#[derive(Clone)]
pub struct DaleelClient {
    inner: Arc<DaleelClientInner>,
}

struct DaleelClientInner {
    base_url: String,
    api_version: String,
    http_client: Client,
    timeout: Option<Duration>,
    retry_config: RetryConfig,
    concurrency_limiter: ConcurrencyLimiter,
    cache: Arc<dyn CacheProvider>,
    cache_config: CacheConfig,
    cancel: CancellationToken,
}

impl DaleelClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> DaleelClientBuilder<Missing> {
        DaleelClientBuilder::new()
    }

    /// Validates connectivity to the API.
    ///
    /// Hits the ping endpoint to verify the base URL is reachable.
    pub async fn connect(&self) -> Result<PingResponse, Error> {
        self.get_json("/ping").await
    }

    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the API version being used.
    pub fn api_version(&self) -> &str {
        &self.inner.api_version
    }

    /// Returns the cancellation token shared by all requests.
    ///
    /// Cancelling it aborts in-flight requests with [`Error::Cancelled`].
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    pub(crate) fn list_ttl(&self) -> Duration {
        self.inner.cache_config.list_ttl
    }

    pub(crate) fn content_ttl(&self) -> Duration {
        self.inner.cache_config.content_ttl
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/{}{}",
            self.inner.base_url.trim_end_matches('/'),
            self.inner.api_version,
            path
        )
    }

    /// Fetches a JSON document.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path);
        let response = self.request(Method::GET, &url, None).await?;
        let body = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body).into())
    }

    /// Fetches a JSON document through the in-memory cache.
    ///
    /// The request path doubles as the cache key. A zero TTL bypasses the
    /// cache entirely.
    pub(crate) async fn get_cached<T>(&self, path: &str, ttl: Duration) -> Result<Response<T>, Error>
    where
        T: Serialize + DeserializeOwned,
    {
        if ttl.is_zero() {
            return Ok(Response::new(self.get_json(path).await?));
        }

        if let Some(cached) = self.inner.cache.get(path).await {
            match serde_json::from_slice(&cached.data) {
                Ok(data) => {
                    return Ok(Response::cache_hit(data, cached.created_at, cached.expires_at));
                }
                Err(_) => {
                    // undecodable entry (schema drift): drop it and refetch
                    self.inner.cache.remove(path).await;
                }
            }
        }

        let data: T = self.get_json(path).await?;
        let bytes = serde_json::to_vec(&data).map_err(|e| ApiError::parse(e.to_string()))?;
        let value = CachedValue::with_ttl(bytes, ttl);
        let cached_at = value.created_at;
        let expires_at = value.expires_at;
        self.inner.cache.set(path, value).await;
        Ok(Response::cache_miss(data, cached_at, expires_at))
    }

    /// Posts a JSON body and parses the JSON response.
    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path);
        let payload = serde_json::to_string(body).map_err(|e| ApiError::parse(e.to_string()))?;
        let response = self.request(Method::POST, &url, Some(payload)).await?;
        let body = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body).into())
    }

    /// Makes an HTTP request with concurrency limiting and retry logic.
    ///
    /// This is the low-level request method used by all API operations.
    pub(crate) async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<reqwest::Response, Error> {
        Url::parse(url).map_err(|e| ApiError::InvalidUrl(format!("{url}: {e}")))?;

        // permit held for the entire request lifecycle including retries
        let _permit = self.inner.concurrency_limiter.acquire().await;

        let retry_config = &self.inner.retry_config;
        let mut attempts = 0;
        let mut delay = retry_config.initial_delay;

        loop {
            let result = tokio::select! {
                biased;
                _ = self.inner.cancel.cancelled() => return Err(Error::Cancelled),
                result = self.send_request_inner(method.clone(), url, body.clone()) => result,
            };

            match result {
                Ok(response) => {
                    let status = response.status();

                    // 429 Too Many Requests
                    if status.as_u16() == 429 {
                        if !retry_config.retry_on_429 || attempts >= retry_config.max_retries {
                            let retry_after = parse_retry_after(&response);
                            return Err(Error::RateLimit { retry_after });
                        }

                        let wait = parse_retry_after(&response).unwrap_or(delay);
                        tokio::time::sleep(wait).await;
                        attempts += 1;
                        continue;
                    }

                    // 5xx server errors
                    if status.is_server_error() {
                        if !retry_config.retry_on_5xx || attempts >= retry_config.max_retries {
                            let status_code = status.as_u16();
                            let body = response.text().await.unwrap_or_default();
                            return Err(ApiError::http(status_code, body).into());
                        }

                        tokio::time::sleep(delay).await;
                        delay = (delay * 2).min(retry_config.max_delay);
                        attempts += 1;
                        continue;
                    }

                    // success or client error (4xx except 429)
                    if status.is_success() {
                        return Ok(response);
                    } else {
                        let status_code = status.as_u16();
                        let body = response.text().await.unwrap_or_default();
                        return Err(ApiError::http(status_code, body).into());
                    }
                }
                Err(e) => {
                    let is_network = matches!(&e, Error::Api(ApiError::Network(_)));

                    if is_network
                        && retry_config.retry_on_network
                        && attempts < retry_config.max_retries
                    {
                        tokio::time::sleep(delay).await;
                        delay = (delay * 2).min(retry_config.max_delay);
                        attempts += 1;
                        continue;
                    }

                    return Err(e);
                }
            }
        }
    }

    /// Inner request method without retry logic.
    async fn send_request_inner(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<reqwest::Response, Error> {
        let mut request = self
            .inner
            .http_client
            .request(method, url)
            .header("Accept", "application/json");

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.inner.timeout.unwrap_or(DEFAULT_TIMEOUT)).into()
            } else {
                Error::Api(ApiError::from(e))
            }
        })
    }
}

/// Parses the Retry-After header value (seconds).
fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("Retry-After")?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Response from the ping endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    /// Server-reported status, normally `"ok"`.
    pub status: String,
    /// Deployed backend version, if reported.
    #[serde(default)]
    pub version: Option<String>,
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`DaleelClient`].
///
/// Uses the typestate pattern so the required `url` is enforced at compile
/// time.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use daleel_lib::DaleelClient;
/// use daleel_lib::cache::CacheConfig;
///
/// let client = DaleelClient::builder()
///     .url("https://api.daleelfm.com")
///     .timeout(Duration::from_secs(10))
///     .cache_config(CacheConfig::no_cache())
///     .build();
/// ```
pub struct DaleelClientBuilder<U> {
    url: U,
    api_version: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    retry_config: RetryConfig,
    concurrency_limit: Option<usize>,
    cache: Option<Arc<dyn CacheProvider>>,
    cache_config: CacheConfig,
    cancel: Option<CancellationToken>,
}

impl DaleelClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            api_version: "v1".to_string(),
            timeout: None,
            connect_timeout: None,
            http_client: None,
            retry_config: RetryConfig::default(),
            concurrency_limit: None,
            cache: None,
            cache_config: CacheConfig::default(),
            cancel: None,
        }
    }

    /// Sets the API base URL.
    ///
    /// # Example
    ///
    /// ```ignore
    /// .url("https://api.daleelfm.com")
    /// ```
    pub fn url(self, url: impl Into<String>) -> DaleelClientBuilder<Set<String>> {
        DaleelClientBuilder {
            url: Set(url.into()),
            api_version: self.api_version,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            retry_config: self.retry_config,
            concurrency_limit: self.concurrency_limit,
            cache: self.cache,
            cache_config: self.cache_config,
            cancel: self.cancel,
        }
    }
}

impl Default for DaleelClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> DaleelClientBuilder<U> {
    /// Sets the API version to use.
    ///
    /// Defaults to `v1`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// Applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Sets the maximum number of concurrent requests.
    pub fn concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = Some(limit);
        self
    }

    /// Sets a custom cache provider.
    ///
    /// Defaults to [`InMemoryCache`].
    pub fn cache_provider(mut self, cache: Arc<dyn CacheProvider>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the cache TTL configuration.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Sets the cancellation token shared by all requests.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl DaleelClientBuilder<Set<String>> {
    /// Builds the [`DaleelClient`].
    ///
    /// Only available once `url` has been set.
    pub fn build(self) -> DaleelClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().expect("Failed to build HTTP client")
        });

        let concurrency_limiter = self
            .concurrency_limit
            .map(ConcurrencyLimiter::new)
            .unwrap_or_default();

        DaleelClient {
            inner: Arc::new(DaleelClientInner {
                base_url: self.url.0,
                api_version: self.api_version,
                http_client,
                timeout: self.timeout,
                retry_config: self.retry_config,
                concurrency_limiter,
                cache: self
                    .cache
                    .unwrap_or_else(|| Arc::new(InMemoryCache::new())),
                cache_config: self.cache_config,
                cancel: self.cancel.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_version_and_path() {
        let client = DaleelClient::builder()
            .url("https://api.daleelfm.com/")
            .build();
        assert_eq!(
            client.endpoint("/handbook/sections"),
            "https://api.daleelfm.com/api/v1/handbook/sections"
        );
    }

    #[test]
    fn test_builder_overrides() {
        let client = DaleelClient::builder()
            .url("https://staging.daleelfm.com")
            .api_version("v2")
            .build();
        assert_eq!(client.api_version(), "v2");
        assert_eq!(client.base_url(), "https://staging.daleelfm.com");
    }
}
