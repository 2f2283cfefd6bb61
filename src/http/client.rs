//! HTTP transport with rate limiting and proxy support
//!
//! Provides the reqwest-backed [`Transport`] that handles:
//! - Request spacing through the shared rate limiter
//! - Default headers and user agent
//! - Atomic proxy reconfiguration
//! - Response classification into not-found and status errors

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::request::RequestDescriptor;
use crate::types::{EntityKind, StringMap};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

/// Browser-like agent; the marketplace serves reduced pages to unknown agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// ============================================================================
// Transport Boundary
// ============================================================================

/// Raw response of one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub text: String,
}

impl FetchResponse {
    /// Create a response
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations report connection failures and timeouts as
/// [`Error::Network`]; any HTTP status is returned as a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<FetchResponse>;
}

/// Turn a response into its body, or a not-found / status error
pub fn classify(response: FetchResponse, kind: EntityKind, identifier: &str) -> Result<String> {
    if response.is_success() {
        return Ok(response.text);
    }

    if response.status == 404 || response.text.to_ascii_lowercase().contains("not found") {
        return Err(Error::not_found(kind, identifier));
    }

    Err(Error::http_status(response.status, response.text))
}

// ============================================================================
// Configuration
// ============================================================================

/// Outbound proxy per scheme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy for plain HTTP requests
    #[serde(default)]
    pub http: Option<String>,
    /// Proxy for HTTPS requests
    #[serde(default)]
    pub https: Option<String>,
}

impl ProxyConfig {
    /// Same proxy for both schemes
    pub fn all(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            http: Some(url.clone()),
            https: Some(url),
        }
    }

    /// No proxy for either scheme
    pub fn is_empty(&self) -> bool {
        self.http.is_none() && self.https.is_none()
    }
}

/// Configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration, `None` to disable
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
    /// Initial proxy
    pub proxy: Option<ProxyConfig>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: StringMap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Space requests `delay` apart; zero disables limiting
    pub fn rate_limit_delay(mut self, delay: Duration) -> Self {
        self.config.rate_limit = RateLimiterConfig::from_delay(delay);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the initial proxy
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Client and the proxy it was built with, swapped together
#[derive(Debug, Clone)]
struct ClientSlot {
    client: Client,
    proxy: Option<ProxyConfig>,
}

/// reqwest-backed transport
pub struct HttpTransport {
    slot: RwLock<ClientSlot>,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpTransport {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = build_client(&config, config.proxy.as_ref())?;
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            slot: RwLock::new(ClientSlot {
                client,
                proxy: config.proxy.clone(),
            }),
            config,
            rate_limiter,
        })
    }

    /// Replace the proxy; requests already in flight keep their client.
    ///
    /// `None` removes the proxy.
    pub fn set_proxy(&self, proxy: Option<ProxyConfig>) -> Result<()> {
        let proxy = proxy.filter(|p| !p.is_empty());
        let client = build_client(&self.config, proxy.as_ref())?;

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = ClientSlot { client, proxy };
        debug!("Proxy updated: {:?}", slot.proxy);
        Ok(())
    }

    /// Currently configured proxy
    pub fn proxy(&self) -> Option<ProxyConfig> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .proxy
            .clone()
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    fn client(&self) -> Client {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .client
            .clone()
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<FetchResponse> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self
            .client()
            .request(request.method.into(), &request.url)
            .timeout(self.config.timeout);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(ref body) = request.body {
            req = req.body(body.clone());
        }

        debug!("{} {}", request.method, request.url);
        let response = req.send().await.map_err(|e| transport_error(&request.url, &e))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(&request.url, &e))?;

        debug!("{} {} -> {} ({} bytes)", request.method, request.url, status, text.len());
        Ok(FetchResponse { status, text })
    }
}

fn build_client(config: &HttpClientConfig, proxy: Option<&ProxyConfig>) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(config.timeout)
        .user_agent(&config.user_agent)
        .gzip(true);

    if let Some(proxy) = proxy {
        match (&proxy.http, &proxy.https) {
            (Some(http), Some(https)) if http == https => {
                builder = builder.proxy(reqwest::Proxy::all(http.as_str())?);
            }
            (http, https) => {
                if let Some(http) = http {
                    builder = builder.proxy(reqwest::Proxy::http(http.as_str())?);
                }
                if let Some(https) = https {
                    builder = builder.proxy(reqwest::Proxy::https(https.as_str())?);
                }
            }
        }
    }

    Ok(builder.build()?)
}

fn transport_error(url: &str, e: &reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::network(format!("Request to {url} timed out"))
    } else {
        Error::network(format!("Request to {url} failed: {e}"))
    }
}
