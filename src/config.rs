//! Scraper configuration
//!
//! One `ScraperConfig` holds everything a [`Scraper`](crate::engine::Scraper)
//! needs: endpoint, HTTP behavior, locale and default counts. It can be
//! built in code or loaded from YAML.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, ProxyConfig, RateLimiterConfig, DEFAULT_USER_AGENT};
use crate::request::DEFAULT_BASE_URL;
use crate::types::{Collection, ImageSize, Locale, SortOrder, StringMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete scraper configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Marketplace host
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Minimum seconds between outbound requests; 0 disables limiting
    #[serde(default = "default_rate_limit_delay")]
    pub rate_limit_delay: f64,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Headers sent with every request
    #[serde(default)]
    pub default_headers: StringMap,

    /// Locale used when a call does not name one
    #[serde(default)]
    pub locale: Locale,

    /// Outbound proxy
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,

    /// Log filter for the binary (e.g. "info", "gplay_scraper=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Image rendition appended to image URLs
    #[serde(default)]
    pub image_size: Option<ImageSize>,

    /// Reviews requested per batch
    #[serde(default = "default_reviews_batch_size")]
    pub reviews_batch_size: usize,

    /// Default counts and options per operation
    #[serde(default)]
    pub defaults: OperationDefaults,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_rate_limit_delay() -> f64 {
    1.0
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_reviews_batch_size() -> usize {
    100
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            rate_limit_delay: default_rate_limit_delay(),
            user_agent: default_user_agent(),
            default_headers: StringMap::new(),
            locale: Locale::default(),
            proxy: None,
            log_level: default_log_level(),
            image_size: None,
            reviews_batch_size: default_reviews_batch_size(),
            defaults: OperationDefaults::default(),
        }
    }
}

// ============================================================================
// Operation Defaults
// ============================================================================

/// Counts and options used when a caller does not specify them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationDefaults {
    pub search_count: usize,
    pub reviews_count: usize,
    pub reviews_sort: SortOrder,
    pub developer_count: usize,
    pub similar_count: usize,
    pub list_count: usize,
    pub list_collection: Collection,
    pub list_category: String,
    pub suggest_count: usize,
}

impl Default for OperationDefaults {
    fn default() -> Self {
        Self {
            search_count: 100,
            reviews_count: 100,
            reviews_sort: SortOrder::Newest,
            developer_count: 100,
            similar_count: 100,
            list_count: 100,
            list_collection: Collection::TopFree,
            list_category: "APPLICATION".to_string(),
            suggest_count: 5,
        }
    }
}

// ============================================================================
// Loading and Validation
// ============================================================================

impl ScraperConfig {
    /// Create a new config builder
    pub fn builder() -> ScraperConfigBuilder {
        ScraperConfigBuilder::default()
    }

    /// Load a config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values a transport cannot be built from
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base_url '{}': {e}", self.base_url)))?;

        if self.timeout_seconds == 0 {
            return Err(Error::config("timeout_seconds must be positive"));
        }
        if !self.rate_limit_delay.is_finite() || self.rate_limit_delay < 0.0 {
            return Err(Error::config(
                "rate_limit_delay must be a non-negative number of seconds",
            ));
        }
        if self.reviews_batch_size == 0 {
            return Err(Error::config("reviews_batch_size must be positive"));
        }
        if self.locale.lang.trim().is_empty() {
            return Err(Error::config("locale.lang cannot be empty"));
        }
        if let Some(proxy) = &self.proxy {
            for url in proxy.http.iter().chain(proxy.https.iter()) {
                url::Url::parse(url)
                    .map_err(|e| Error::config(format!("Invalid proxy URL '{url}': {e}")))?;
            }
        }
        Ok(())
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Spacing between outbound requests
    pub fn rate_limit_delay(&self) -> Duration {
        if self.rate_limit_delay.is_finite() && self.rate_limit_delay > 0.0 {
            Duration::from_secs_f64(self.rate_limit_delay)
        } else {
            Duration::ZERO
        }
    }

    /// Transport settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: self.timeout(),
            rate_limit: RateLimiterConfig::from_delay(self.rate_limit_delay()),
            default_headers: self.default_headers.clone(),
            user_agent: self.user_agent.clone(),
            proxy: self.proxy.clone(),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for scraper config
#[derive(Default)]
pub struct ScraperConfigBuilder {
    config: ScraperConfig,
}

impl ScraperConfigBuilder {
    /// Set the marketplace host
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_seconds = timeout.as_secs().max(1);
        self
    }

    /// Set the spacing between requests; zero disables limiting
    pub fn rate_limit_delay(mut self, delay: Duration) -> Self {
        self.config.rate_limit_delay = delay.as_secs_f64();
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the default locale
    pub fn locale(mut self, locale: Locale) -> Self {
        self.config.locale = locale;
        self
    }

    /// Set the proxy
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Set the log filter
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    /// Set the image rendition
    pub fn image_size(mut self, size: ImageSize) -> Self {
        self.config.image_size = Some(size);
        self
    }

    /// Set the reviews batch size
    pub fn reviews_batch_size(mut self, size: usize) -> Self {
        self.config.reviews_batch_size = size;
        self
    }

    /// Set per-operation defaults
    pub fn defaults(mut self, defaults: OperationDefaults) -> Self {
        self.config.defaults = defaults;
        self
    }

    /// Build the config
    pub fn build(self) -> ScraperConfig {
        self.config
    }
}
