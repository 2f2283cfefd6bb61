//! Tests for the HTTP transport module

use super::*;
use crate::request::RequestDescriptor;
use crate::types::EntityKind;
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn unlimited() -> HttpTransport {
    HttpTransport::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::default()));
    assert!(config.user_agent.starts_with("Mozilla/5.0"));
    assert!(config.proxy.is_none());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(5))
        .rate_limit_delay(Duration::from_millis(250))
        .header("Accept-Language", "en")
        .user_agent("test-agent/1.0")
        .proxy(ProxyConfig::all("http://127.0.0.1:3128"))
        .build();

    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(
        config.rate_limit.map(|r| r.delay),
        Some(Duration::from_millis(250))
    );
    assert_eq!(
        config.default_headers.get("Accept-Language"),
        Some(&"en".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert_eq!(
        config.proxy.and_then(|p| p.https),
        Some("http://127.0.0.1:3128".to_string())
    );
}

#[test]
fn test_zero_delay_builds_without_limiter() {
    let transport = HttpTransport::with_config(
        HttpClientConfig::builder()
            .rate_limit_delay(Duration::ZERO)
            .build(),
    )
    .unwrap();
    assert!(!transport.has_rate_limiter());
}

#[test]
fn test_classify_success_returns_body() {
    let body = classify(FetchResponse::new(200, "<html>"), EntityKind::App, "x").unwrap();
    assert_eq!(body, "<html>");
}

#[test]
fn test_classify_not_found() {
    let err = classify(FetchResponse::new(404, ""), EntityKind::App, "com.gone").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "app not found: com.gone");

    let err = classify(
        FetchResponse::new(400, "Requested entity was Not Found."),
        EntityKind::DeveloperApp,
        "dev",
    )
    .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_classify_other_status() {
    let err = classify(FetchResponse::new(503, "busy"), EntityKind::Review, "a").unwrap_err();
    assert!(!err.is_not_found());
    assert!(err.is_network());
}

#[tokio::test]
async fn test_fetch_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/apps/details"))
        .and(query_param("id", "com.example.app"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&mock_server)
        .await;

    let transport = unlimited();
    let url = format!("{}/store/apps/details?id=com.example.app", mock_server.uri());
    let response = transport.fetch(&RequestDescriptor::get(url)).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.text, "<html>ok</html>");
}

#[tokio::test]
async fn test_fetch_post_form_body_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_/PlayStoreUi/data/batchexecute"))
        .and(header(
            "content-type",
            "application/x-www-form-urlencoded;charset=UTF-8",
        ))
        .and(header("x-client", "gplay"))
        .and(body_string("f.req=%5B%5D"))
        .respond_with(ResponseTemplate::new(200).set_body_string(")]}'\n[]"))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::with_config(
        HttpClientConfig::builder()
            .no_rate_limit()
            .header("X-Client", "gplay")
            .build(),
    )
    .unwrap();
    let request = RequestDescriptor::post(
        format!("{}/_/PlayStoreUi/data/batchexecute", mock_server.uri()),
        "f.req=%5B%5D",
    )
    .header(
        "Content-Type",
        "application/x-www-form-urlencoded;charset=UTF-8",
    );

    let response = transport.fetch(&request).await.unwrap();
    assert_eq!(response.status, 200);
    assert!(response.text.starts_with(")]}'"));
}

#[tokio::test]
async fn test_fetch_returns_error_status_as_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let transport = unlimited();
    let response = transport
        .fetch(&RequestDescriptor::get(mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_fetch_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::with_config(
        HttpClientConfig::builder()
            .no_rate_limit()
            .timeout(Duration::from_millis(100))
            .build(),
    )
    .unwrap();
    let err = transport
        .fetch(&RequestDescriptor::get(mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, crate::Error::Network { .. }));
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_fetch_connection_refused_is_network_error() {
    let transport = unlimited();
    let err = transport
        .fetch(&RequestDescriptor::get("http://127.0.0.1:1/"))
        .await
        .unwrap_err();
    assert!(matches!(err, crate::Error::Network { .. }));
}

#[tokio::test]
async fn test_rate_limited_fetches_are_spaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&mock_server)
        .await;

    let delay = Duration::from_millis(100);
    let transport =
        HttpTransport::with_config(HttpClientConfig::builder().rate_limit_delay(delay).build())
            .unwrap();
    let request = RequestDescriptor::get(mock_server.uri());

    let start = std::time::Instant::now();
    for _ in 0..3 {
        transport.fetch(&request).await.unwrap();
    }
    assert!(start.elapsed() >= delay * 2 - Duration::from_millis(10));
}

#[test]
fn test_set_proxy_swaps_and_clears() {
    let transport = unlimited();
    assert!(transport.proxy().is_none());

    transport
        .set_proxy(Some(ProxyConfig::all("http://127.0.0.1:3128")))
        .unwrap();
    assert_eq!(
        transport.proxy().and_then(|p| p.http),
        Some("http://127.0.0.1:3128".to_string())
    );

    transport.set_proxy(Some(ProxyConfig::default())).unwrap();
    assert!(transport.proxy().is_none());
}

#[test]
fn test_set_proxy_invalid_url_keeps_previous() {
    let transport = unlimited();
    transport
        .set_proxy(Some(ProxyConfig::all("http://127.0.0.1:3128")))
        .unwrap();

    let result = transport.set_proxy(Some(ProxyConfig {
        http: Some("http://[invalid".to_string()),
        https: None,
    }));
    assert!(result.is_err());
    assert!(transport.proxy().is_some());
}
