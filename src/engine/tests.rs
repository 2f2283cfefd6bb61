//! Tests for engine module

use super::*;
use crate::http::FetchResponse;
use crate::request::RequestDescriptor;
use crate::schema::schema_for;
use crate::test_support::{
    app_dataset, batch_body, cluster_dataset, cluster_item, html_page, search_continuation,
    search_dataset, similar_link_dataset, tree,
};
use crate::types::Method;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;

type Handler = Box<dyn Fn(&RequestDescriptor) -> Result<FetchResponse> + Send + Sync>;

/// Transport answering from a closure and recording every request
struct StubTransport {
    handler: Handler,
    calls: Mutex<Vec<RequestDescriptor>>,
}

impl StubTransport {
    fn new(
        handler: impl Fn(&RequestDescriptor) -> Result<FetchResponse> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<RequestDescriptor> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<FetchResponse> {
        self.calls.lock().unwrap().push(request.clone());
        (self.handler)(request)
    }
}

fn test_config() -> ScraperConfig {
    ScraperConfig::builder()
        .rate_limit_delay(Duration::ZERO)
        .build()
}

fn scraper(stub: &Arc<StubTransport>) -> Scraper {
    Scraper::with_transport(stub.clone(), test_config())
}

fn ok(body: impl Into<String>) -> Result<FetchResponse> {
    Ok(FetchResponse::new(200, body))
}

fn not_found() -> Result<FetchResponse> {
    Ok(FetchResponse::new(404, "Not Found"))
}

fn en_us() -> Locale {
    Locale::new("en", "us")
}

fn app_page() -> String {
    let ds5 = app_dataset(&[
        (&[0, 0], json!("Example App")),
        (&[77, 0], json!("com.example.app")),
        (&[13, 0], json!("10,000+")),
    ]);
    html_page(&[("ds:5", &ds5)])
}

fn review(id: &str) -> Value {
    json!([id, ["Reviewer"], 5, null, format!("Review {id}")])
}

fn reviews_payload(items: Vec<Value>, token: Option<&str>) -> Value {
    match token {
        Some(token) => json!([items, [null, token], null]),
        None => json!([items, null, null]),
    }
}

fn app_ids(records: &[Record]) -> Vec<&str> {
    records.iter().filter_map(|r| r.get_str("appId")).collect()
}

// ============================================================================
// App Tests
// ============================================================================

#[tokio::test]
async fn test_app_decodes_title_and_full_schema() {
    let stub = StubTransport::new(|_| ok(app_page()));
    let scraper = scraper(&stub);

    let record = scraper.app("com.example.app", &en_us(), None).await.unwrap();

    assert_eq!(record.get_str("title"), Some("Example App"));
    assert_eq!(record.get("installsCount"), Some(&json!(10000)));
    let expected: Vec<&str> = schema_for(EntityKind::App).field_names().collect();
    assert_eq!(record.field_names().collect::<Vec<_>>(), expected);

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].url.contains("/store/apps/details?id=com.example.app&hl=en&gl=us"));
}

#[tokio::test]
async fn test_app_locale_fallback_matches_direct_fetch() {
    let stub = StubTransport::new(|req| {
        if req.url.contains("gl=") {
            not_found()
        } else {
            ok(app_page())
        }
    });
    let scraper = scraper(&stub);

    let via_fallback = scraper.app("com.example.app", &en_us(), None).await.unwrap();
    let direct = scraper
        .app("com.example.app", &en_us().without_country(), None)
        .await
        .unwrap();

    assert_eq!(via_fallback, direct);
    assert_eq!(via_fallback.get_str("title"), Some("Example App"));

    let calls = stub.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].url.contains("gl=us"));
    assert!(!calls[1].url.contains("gl="));
    assert_eq!(scraper.stats().fallbacks, 1);
}

#[tokio::test]
async fn test_app_fallback_outcome_is_final() {
    let stub = StubTransport::new(|_| not_found());
    let scraper = scraper(&stub);

    let err = scraper
        .app("com.example.missing", &en_us(), None)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(stub.calls().len(), 2);
    assert_eq!(scraper.stats().failures, 2);
}

#[tokio::test]
async fn test_app_network_failure_triggers_fallback() {
    let stub = StubTransport::new(|req| {
        if req.url.contains("gl=") {
            Err(Error::network("connection reset"))
        } else {
            ok(app_page())
        }
    });
    let scraper = scraper(&stub);

    let record = scraper.app("com.example.app", &en_us(), None).await.unwrap();
    assert_eq!(record.get_str("appId"), Some("com.example.app"));
    assert_eq!(stub.calls().len(), 2);
}

#[tokio::test]
async fn test_app_without_country_makes_single_attempt() {
    let stub = StubTransport::new(|_| not_found());
    let scraper = scraper(&stub);

    let locale = en_us().without_country();
    assert!(scraper.app("com.example.app", &locale, None).await.is_err());
    assert_eq!(stub.calls().len(), 1);
}

#[tokio::test]
async fn test_app_image_size_from_call_overrides_config() {
    let ds5 = app_dataset(&[(&[95, 0, 3, 2], json!("https://play-lh.example/icon"))]);
    let page = html_page(&[("ds:5", &ds5)]);
    let stub = StubTransport::new(move |_| ok(page.clone()));
    let scraper = scraper(&stub);

    let record = scraper
        .app("com.example.app", &en_us(), Some(ImageSize::Small))
        .await
        .unwrap();
    assert_eq!(
        record.get_str("icon"),
        Some("https://play-lh.example/icon=w512")
    );
}

#[tokio::test]
async fn test_app_fields_projection() {
    let stub = StubTransport::new(|_| ok(app_page()));
    let scraper = scraper(&stub);

    let title = scraper
        .app_field("com.example.app", "title", &en_us())
        .await
        .unwrap();
    assert_eq!(title, json!("Example App"));

    let fields = scraper
        .app_fields("com.example.app", &["appId", "nope"], &en_us())
        .await
        .unwrap();
    assert_eq!(fields["appId"], json!("com.example.app"));
    assert_eq!(fields["nope"], Value::Null);
}

#[tokio::test]
async fn test_apps_keeps_input_order() {
    let stub = StubTransport::new(|_| ok(app_page()));
    let scraper = scraper(&stub);

    let results = scraper
        .apps(&["com.example.a", "", "com.example.c"], &en_us(), 2)
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].as_ref().unwrap_err().is_invalid_input());
    assert!(results[2].is_ok());
    assert_eq!(stub.calls().len(), 2);
}

// ============================================================================
// Input Checks
// ============================================================================

#[tokio::test]
async fn test_zero_count_makes_no_requests() {
    let stub = StubTransport::new(|_| ok(""));
    let scraper = scraper(&stub);
    let locale = en_us();

    assert!(scraper.search("maps", 0, &locale).await.unwrap().is_empty());
    assert!(scraper
        .reviews("com.example.app", 0, &locale, SortOrder::Newest)
        .await
        .unwrap()
        .is_empty());
    assert!(scraper
        .developer("Example Studio", 0, &locale)
        .await
        .unwrap()
        .is_empty());
    assert!(scraper
        .similar("com.example.app", 0, &locale)
        .await
        .unwrap()
        .is_empty());
    assert!(scraper
        .top_chart(Collection::TopPaid, "GAME", 0, &locale)
        .await
        .unwrap()
        .is_empty());
    assert!(scraper.suggest("ma", 0, &locale).await.unwrap().is_empty());
    assert!(scraper
        .retrieve(
            EntityKind::App,
            &Query::new("com.example.app").with_count(0)
        )
        .await
        .unwrap()
        .is_empty());

    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn test_empty_identifier_rejected_without_requests() {
    let stub = StubTransport::new(|_| ok(""));
    let scraper = scraper(&stub);
    let locale = en_us();

    let errors = [
        scraper.app("", &locale, None).await.unwrap_err(),
        scraper.search("  ", 10, &locale).await.unwrap_err(),
        scraper
            .reviews("", 10, &locale, SortOrder::Newest)
            .await
            .unwrap_err(),
        scraper.developer("", 10, &locale).await.unwrap_err(),
        scraper.similar("", 10, &locale).await.unwrap_err(),
        scraper
            .top_chart(Collection::TopFree, "", 10, &locale)
            .await
            .unwrap_err(),
        scraper.suggest("", 5, &locale).await.unwrap_err(),
    ];

    for err in &errors {
        assert!(err.is_invalid_input(), "unexpected error: {err}");
    }
    assert!(stub.calls().is_empty());
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
async fn test_search_paginates_from_html_to_rpc() {
    let stub = StubTransport::new(|req| match req.method {
        Method::GET => {
            let items = vec![cluster_item("com.a", "A"), cluster_item("com.b", "B")];
            ok(html_page(&[("ds:4", &search_dataset(items, Some("tok1")))]))
        }
        Method::POST => {
            let items = vec![
                cluster_item("com.c", "C"),
                cluster_item("com.d", "D"),
                cluster_item("com.e", "E"),
            ];
            ok(batch_body("qnKhOb", &search_continuation(items, None)))
        }
    });
    let scraper = scraper(&stub);

    let records = scraper.search("maps", 4, &en_us()).await.unwrap();

    assert_eq!(app_ids(&records), vec!["com.a", "com.b", "com.c", "com.d"]);
    assert!(records.iter().all(|r| r.kind() == EntityKind::SearchResult));

    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].url.contains("/work/search?q=maps"));
    assert!(calls[1].url.contains("rpcids=qnKhOb"));
    assert!(calls[1].url.contains("gl=us"));
    assert!(calls[1].body.as_deref().unwrap_or_default().contains("tok1"));
}

#[tokio::test]
async fn test_search_continuation_keeps_relaxed_locale() {
    let stub = StubTransport::new(|req| match req.method {
        Method::GET if req.url.contains("gl=") => not_found(),
        Method::GET => {
            let items = vec![cluster_item("com.a", "A")];
            ok(html_page(&[("ds:4", &search_dataset(items, Some("tok1")))]))
        }
        Method::POST => {
            let items = vec![cluster_item("com.b", "B")];
            ok(batch_body("qnKhOb", &search_continuation(items, None)))
        }
    });
    let scraper = scraper(&stub);

    let records = scraper.search("maps", 10, &en_us()).await.unwrap();

    assert_eq!(app_ids(&records), vec!["com.a", "com.b"]);
    let calls = stub.calls();
    assert_eq!(calls.len(), 3);
    assert!(!calls[2].url.contains("gl="));
}

#[tokio::test]
async fn test_search_stops_on_repeated_token() {
    let stub = StubTransport::new(|req| match req.method {
        Method::GET => {
            let items = vec![cluster_item("com.a", "A")];
            ok(html_page(&[("ds:4", &search_dataset(items, Some("loop")))]))
        }
        Method::POST => {
            let items = vec![cluster_item("com.b", "B")];
            ok(batch_body("qnKhOb", &search_continuation(items, Some("loop"))))
        }
    });
    let scraper = scraper(&stub);

    let records = scraper.search("maps", 50, &en_us()).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(stub.calls().len(), 2);
}

#[tokio::test]
async fn test_search_field_values() {
    let stub = StubTransport::new(|_| {
        let items = vec![cluster_item("com.a", "A"), cluster_item("com.b", "B")];
        ok(html_page(&[("ds:4", &search_dataset(items, None))]))
    });
    let scraper = scraper(&stub);

    let titles = scraper
        .search_field("maps", "title", 10, &en_us())
        .await
        .unwrap();
    assert_eq!(titles, vec![json!("A"), json!("B")]);
}

// ============================================================================
// Reviews Tests
// ============================================================================

#[tokio::test]
async fn test_reviews_batches_are_capped() {
    let stub = StubTransport::new(|req| {
        let body = req.body.as_deref().unwrap_or_default();
        if body.contains("r1") {
            ok(batch_body("oCPfdb", &reviews_payload(vec![review("c")], None)))
        } else {
            let items = vec![review("a"), review("b")];
            ok(batch_body("oCPfdb", &reviews_payload(items, Some("r1"))))
        }
    });
    let config = ScraperConfig::builder()
        .rate_limit_delay(Duration::ZERO)
        .reviews_batch_size(2)
        .build();
    let scraper = Scraper::with_transport(stub.clone(), config);

    let records = scraper
        .reviews("com.example.app", 3, &en_us(), SortOrder::Newest)
        .await
        .unwrap();

    let ids: Vec<&str> = records.iter().filter_map(|r| r.get_str("reviewId")).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    let first = calls[0].body.as_deref().unwrap_or_default();
    let second = calls[1].body.as_deref().unwrap_or_default();
    assert!(first.contains("%5B2%5D"));
    assert!(second.contains("%5B1%2Cnull%2C%5C%22r1%5C%22%5D"));
}

#[tokio::test]
async fn test_reviews_null_payload_returns_empty() {
    let stub = StubTransport::new(|_| ok(")]}'\n[[\"wrb.fr\",\"oCPfdb\",null]]"));
    let scraper = scraper(&stub);

    let records = scraper
        .reviews("com.example.app", 10, &en_us(), SortOrder::Rating)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_reviews_do_not_fall_back() {
    let stub = StubTransport::new(|_| Ok(FetchResponse::new(500, "Server Error")));
    let scraper = scraper(&stub);

    let err = scraper
        .reviews("com.example.app", 10, &en_us(), SortOrder::Newest)
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert_eq!(stub.calls().len(), 1);
}

// ============================================================================
// Developer / Similar / Chart / Suggest Tests
// ============================================================================

#[tokio::test]
async fn test_developer_numeric_and_named_pages() {
    let stub = StubTransport::new(|req| {
        let slot = if req.url.contains("/store/apps/dev?") { 22 } else { 21 };
        let items = vec![
            cluster_item("com.a", "A"),
            cluster_item("com.b", "B"),
            cluster_item("com.c", "C"),
        ];
        ok(html_page(&[("ds:3", &cluster_dataset(slot, items))]))
    });
    let scraper = scraper(&stub);

    let numeric = scraper
        .developer("5700313618786177705", 2, &en_us())
        .await
        .unwrap();
    assert_eq!(app_ids(&numeric), vec!["com.a", "com.b"]);
    assert!(numeric.iter().all(|r| r.kind() == EntityKind::DeveloperApp));

    let named = scraper
        .developer("Example Studio", 10, &en_us())
        .await
        .unwrap();
    assert_eq!(named.len(), 3);

    let calls = stub.calls();
    assert!(calls[0].url.contains("/store/apps/dev?id=5700313618786177705"));
    assert!(calls[1].url.contains("/store/apps/developer?id=Example%20Studio"));
}

#[tokio::test]
async fn test_similar_follows_cluster_link() {
    let stub = StubTransport::new(|req| {
        if req.url.contains("/store/apps/details") {
            let ds7 = similar_link_dataset("/store/apps/collection/cluster?clp=abc");
            ok(html_page(&[("ds:7", &ds7)]))
        } else {
            let items = vec![cluster_item("com.x", "X"), cluster_item("com.y", "Y")];
            ok(html_page(&[("ds:3", &cluster_dataset(21, items))]))
        }
    });
    let scraper = scraper(&stub);

    let records = scraper.similar("com.example.app", 5, &en_us()).await.unwrap();

    assert_eq!(app_ids(&records), vec!["com.x", "com.y"]);
    assert!(records.iter().all(|r| r.kind() == EntityKind::SimilarApp));
    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1]
        .url
        .ends_with("/store/apps/collection/cluster?clp=abc&gl=us&hl=en"));
}

#[tokio::test]
async fn test_similar_without_link_is_empty() {
    let stub = StubTransport::new(|_| ok(html_page(&[("ds:7", &json!([]))])));
    let scraper = scraper(&stub);

    let records = scraper.similar("com.example.app", 5, &en_us()).await.unwrap();
    assert!(records.is_empty());
    assert_eq!(stub.calls().len(), 1);
}

#[tokio::test]
async fn test_top_chart_records() {
    let stub = StubTransport::new(|_| {
        let items = vec![cluster_item("com.top", "Top"), cluster_item("com.next", "Next")];
        let payload = tree(&[(&[0, 1, 0, 28, 0], Value::Array(items))]);
        ok(batch_body("vyAe2", &payload))
    });
    let scraper = scraper(&stub);

    let records = scraper
        .top_chart(Collection::TopGrossing, "GAME", 1, &en_us())
        .await
        .unwrap();

    assert_eq!(app_ids(&records), vec!["com.top"]);
    assert_eq!(records[0].kind(), EntityKind::ListItem);
    let body = stub.calls()[0].body.clone().unwrap_or_default();
    assert!(body.contains("topgrossing"));
    assert!(body.contains("GAME"));
}

fn suggest_stub() -> Arc<StubTransport> {
    StubTransport::new(|req| {
        let body = req.body.as_deref().unwrap_or_default();
        let payload = if body.contains("%5C%22maps%5C%22") {
            json!([[[["maps"], ["maps go"], ["maps offline"]]]])
        } else {
            json!([[[["more"]]]])
        };
        ok(batch_body("IJ4APc", &payload))
    })
}

#[tokio::test]
async fn test_suggest_terms_truncated() {
    let stub = suggest_stub();
    let scraper = scraper(&stub);

    let terms = scraper.suggest_terms("maps", 2, &en_us()).await.unwrap();
    assert_eq!(terms, vec!["maps", "maps go"]);
}

#[tokio::test]
async fn test_suggest_nested() {
    let stub = suggest_stub();
    let scraper = scraper(&stub);

    let nested = scraper.suggest_nested("maps", 2, &en_us()).await.unwrap();

    assert_eq!(
        nested,
        vec![
            NestedSuggestion {
                term: "maps".to_string(),
                suggestions: vec!["maps".to_string(), "maps go".to_string()],
            },
            NestedSuggestion {
                term: "maps go".to_string(),
                suggestions: vec!["more".to_string()],
            },
        ]
    );
    assert_eq!(stub.calls().len(), 3);
}

// ============================================================================
// Generic Retrieval
// ============================================================================

#[tokio::test]
async fn test_retrieve_list_uses_configured_defaults() {
    let stub = StubTransport::new(|_| ok(batch_body("vyAe2", &json!([]))));
    let scraper = scraper(&stub);

    let records = scraper
        .retrieve(EntityKind::ListItem, &Query::new(""))
        .await
        .unwrap();

    assert!(records.is_empty());
    let body = stub.calls()[0].body.clone().unwrap_or_default();
    assert!(body.contains("topselling_free"));
    assert!(body.contains("APPLICATION"));
}

#[tokio::test]
async fn test_retrieve_app_yields_one_record() {
    let stub = StubTransport::new(|_| ok(app_page()));
    let scraper = scraper(&stub);

    let query = Query::new("com.example.app").with_locale(Locale::new("de", "de"));
    let records = scraper.retrieve(EntityKind::App, &query).await.unwrap();

    assert_eq!(records.len(), 1);
    assert!(stub.calls()[0].url.contains("hl=de&gl=de"));
}

#[tokio::test]
async fn test_set_proxy_requires_http_transport() {
    let stub = StubTransport::new(|_| ok(""));
    let scraper = scraper(&stub);
    assert!(scraper.set_proxy(None).is_err());
}

#[test]
fn test_scraper_from_config_owns_proxy_capable_transport() {
    let config = ScraperConfig::builder()
        .rate_limit_delay(Duration::ZERO)
        .build();
    let scraper = Scraper::from_config(config).unwrap();

    scraper
        .set_proxy(Some(ProxyConfig::all("http://127.0.0.1:3128")))
        .unwrap();
    scraper.set_proxy(None).unwrap();
    assert_eq!(scraper.stats(), FetchStats::default());
}
