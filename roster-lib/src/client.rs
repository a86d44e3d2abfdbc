//! RosterClient

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use log::warn;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::COLUMN_INFO_PATH;
use crate::api::ErrorBody;
use crate::api::LOGIN_PATH;
use crate::api::Listing;
use crate::api::LoginRequest;
use crate::api::LoginResponse;
use crate::api::TABLE_DATA_PATH;
use crate::auth::CookieOptions;
use crate::auth::RevokeReason;
use crate::auth::SessionContext;
use crate::cache::CacheConfig;
use crate::cache::CacheProvider;
use crate::cache::CachedValue;
use crate::cache::InMemoryCache;
use crate::error::ApiError;
use crate::error::AuthError;
use crate::error::Error;
use crate::filter::FilterState;
use crate::model::ColumnDescriptor;
use crate::response::Response;

/// Async client for the Roster HTTP API.
///
/// Cheap to clone. Every listing and column request carries the session's
/// bearer token; a 401 revokes the session and clears the response cache.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use roster_lib::RosterClient;
/// use roster_lib::auth::{MemoryTokenStore, SessionContext};
/// use roster_lib::filter::FilterState;
///
/// let session = Arc::new(SessionContext::new(Arc::new(MemoryTokenStore::new())));
/// let client = RosterClient::builder()
///     .url("http://localhost:3000")
///     .session(session)
///     .build()?;
///
/// client.login("test", "test123").await?;
/// let listing = client.table_data(&FilterState::new()).await?.into_inner();
/// ```
#[derive(Clone)]
pub struct RosterClient {
    inner: Arc<RosterClientInner>,
}

struct RosterClientInner {
    base_url: Url,
    session: Arc<SessionContext>,
    http_client: Client,
    timeout: Option<Duration>,
    cookie: CookieOptions,
    cache: Option<Arc<dyn CacheProvider>>,
    cache_config: CacheConfig,
}

impl RosterClient {
    pub fn builder() -> RosterClientBuilder<Missing, Missing> {
        RosterClientBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.inner.session
    }

    /// Exchanges credentials for a token and installs it in the session.
    ///
    /// A 401 is reported as [`AuthError::InvalidCredentials`] carrying the
    /// server's message.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, Error> {
        let url = self.endpoint(LOGIN_PATH)?;
        let mut request = self
            .inner
            .http_client
            .post(url)
            .json(&LoginRequest::new(username, password));
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.network_error(e))?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let message = error_message(status, response.text().await.unwrap_or_default());
            return Err(AuthError::invalid_credentials(message).into());
        }
        if !status.is_success() {
            let message = error_message(status, response.text().await.unwrap_or_default());
            return Err(ApiError::http(status.as_u16(), message).into());
        }

        let body = response.text().await.map_err(|e| self.network_error(e))?;
        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Parse(e.to_string()))?;

        self.clear_cache().await;
        self.inner
            .session
            .issue(self.inner.cookie.stamp(login.access_token.clone()))
            .await?;
        debug!("Logged in as {}", username);
        Ok(login)
    }

    /// Fetches the rows matching the active entries of `filters`.
    pub async fn table_data(&self, filters: &FilterState) -> Result<Response<Listing>, Error> {
        let pairs = filters.to_query_pairs();
        let key = format!("{}?{}", TABLE_DATA_PATH, filters.to_query_string());
        self.get_cached(TABLE_DATA_PATH, &pairs, &key, self.inner.cache_config.query_ttl)
            .await
    }

    /// Fetches the ordered column descriptors.
    pub async fn column_info(&self) -> Result<Response<Vec<ColumnDescriptor>>, Error> {
        self.get_cached(
            COLUMN_INFO_PATH,
            &[],
            COLUMN_INFO_PATH,
            self.inner.cache_config.metadata_ttl,
        )
        .await
    }

    /// Ends the session and drops cached responses.
    pub async fn logout(&self) {
        self.inner.session.revoke(RevokeReason::Logout).await;
        self.clear_cache().await;
    }

    /// Drops every cached response.
    pub async fn clear_cache(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.clear().await;
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    fn network_error(&self, e: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if e.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(e),
        }
    }

    async fn get_cached<T>(
        &self,
        path: &str,
        pairs: &[(String, String)],
        cache_key: &str,
        ttl: Duration,
    ) -> Result<Response<T>, Error>
    where
        T: Serialize + DeserializeOwned,
    {
        let cache = self.inner.cache.as_ref().filter(|_| !ttl.is_zero());

        if let Some(cache) = cache
            && let Some(entry) = cache.get(cache_key).await
        {
            match serde_json::from_slice::<T>(&entry.data) {
                Ok(data) => {
                    debug!("Cache hit for {}", cache_key);
                    return Ok(Response::cache_hit(data, &entry));
                }
                Err(e) => {
                    warn!("Dropping unreadable cache entry {}: {}", cache_key, e);
                    cache.remove(cache_key).await;
                }
            }
        }

        let data: T = self.get_json(path, pairs).await?;

        match cache {
            Some(cache) => {
                let bytes = serde_json::to_vec(&data)
                    .map_err(|e| ApiError::parse(format!("cannot cache response: {}", e)))?;
                let entry = CachedValue::with_ttl(bytes, ttl);
                cache.set(cache_key, entry.clone()).await;
                Ok(Response::cache_miss(data, &entry))
            }
            None => Ok(Response::new(data)),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        pairs: &[(String, String)],
    ) -> Result<T, Error> {
        let mut url = self.endpoint(path)?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let bearer = match self.inner.session.bearer().await {
            Ok(bearer) => bearer,
            Err(e) => {
                self.clear_cache().await;
                return Err(e.into());
            }
        };

        let mut request = self
            .inner
            .http_client
            .get(url.clone())
            .header(reqwest::header::AUTHORIZATION, bearer);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        debug!("GET {}", url);
        let response = request.send().await.map_err(|e| self.network_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.network_error(e))?;

        if status == StatusCode::UNAUTHORIZED {
            warn!("Session rejected by {}", path);
            self.inner.session.revoke(RevokeReason::Unauthorized).await;
            self.clear_cache().await;
            return Err(AuthError::unauthorized(error_message(status, body)).into());
        }
        if !status.is_success() {
            return Err(ApiError::http(status.as_u16(), error_message(status, body)).into());
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body).into())
    }
}

/// Message of an error response: the `message` of an [`ErrorBody`], else
/// the raw body, else the status reason.
fn error_message(status: StatusCode, body: String) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
        return parsed.message;
    }
    if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_string()
    } else {
        body
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for [`RosterClient`].
///
/// `url` and `session` are required; [`build`](RosterClientBuilder::build)
/// only exists once both are set.
pub struct RosterClientBuilder<U, S> {
    url: U,
    session: S,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    cookie: CookieOptions,
    cache: Option<Arc<dyn CacheProvider>>,
    cache_config: CacheConfig,
}

impl RosterClientBuilder<Missing, Missing> {
    /// Creates a builder with an in-memory response cache.
    pub fn new() -> Self {
        Self {
            url: Missing,
            session: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
            cookie: CookieOptions::default(),
            cache: Some(Arc::new(InMemoryCache::new())),
            cache_config: CacheConfig::default(),
        }
    }
}

impl Default for RosterClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> RosterClientBuilder<Missing, S> {
    /// Sets the service base URL, e.g. `http://localhost:3000`.
    pub fn url(self, url: impl Into<String>) -> RosterClientBuilder<Set<String>, S> {
        RosterClientBuilder {
            url: Set(url.into()),
            session: self.session,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            cookie: self.cookie,
            cache: self.cache,
            cache_config: self.cache_config,
        }
    }
}

impl<U> RosterClientBuilder<U, Missing> {
    /// Sets the session that holds the bearer token.
    pub fn session(
        self,
        session: Arc<SessionContext>,
    ) -> RosterClientBuilder<U, Set<Arc<SessionContext>>> {
        RosterClientBuilder {
            url: self.url,
            session: Set(session),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            cookie: self.cookie,
            cache: self.cache,
            cache_config: self.cache_config,
        }
    }
}

impl<U, S> RosterClientBuilder<U, S> {
    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout of the default HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Uses a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the attributes applied to issued tokens.
    pub fn cookie(mut self, cookie: CookieOptions) -> Self {
        self.cookie = cookie;
        self
    }

    /// Uses a custom cache provider.
    pub fn cache<C: CacheProvider + 'static>(mut self, cache: C) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    /// Disables response caching.
    pub fn no_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }
}

impl RosterClientBuilder<Set<String>, Set<Arc<SessionContext>>> {
    /// Builds the client, validating the base URL.
    pub fn build(self) -> Result<RosterClient, ApiError> {
        let mut base_url =
            Url::parse(&self.url.0).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(RosterClient {
            inner: Arc::new(RosterClientInner {
                base_url,
                session: self.session.0,
                http_client,
                timeout: self.timeout,
                cookie: self.cookie,
                cache: self.cache,
                cache_config: self.cache_config,
            }),
        })
    }
}
