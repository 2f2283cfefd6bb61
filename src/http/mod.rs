//! HTTP transport module
//!
//! Provides the transport boundary and its reqwest implementation.
//!
//! # Features
//!
//! - **Transport trait**: one async `fetch` per request, stubbed in tests
//! - **Rate Limiting**: request spacing using governor
//! - **Proxy**: per-scheme proxy, swappable at runtime
//! - **Classification**: 404 and "not found" bodies become `NotFound`

mod client;
mod rate_limit;

pub use client::{
    classify, FetchResponse, HttpClientConfig, HttpClientConfigBuilder, HttpTransport,
    ProxyConfig, Transport, DEFAULT_USER_AGENT,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig, DEFAULT_DELAY};

#[cfg(test)]
mod tests;
