//! Retrieval engine module
//!
//! The per-entity retrieval surface over the request builder, transport,
//! decoder, formatter and pagination controller.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Scraper` - one method family per entity kind (`app`, `search`,
//!   `reviews`, `developer`, `similar`, `top_chart`, `suggest`), each with
//!   `_field` / `_fields` projections
//! - `Query` - parameters of the generic `retrieve`
//! - `FetchStats` - request counters
//!
//! Input is checked before any request: an empty identifier fails with
//! `InvalidIdentifier`, a count of zero returns nothing.

mod sources;
mod types;

pub use types::{FetchStats, NestedSuggestion, Query};

use crate::config::ScraperConfig;
use crate::decode::{walk_str, DecodedPage, LayoutDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::format::{format, format_all, FormatContext, Record};
use crate::http::{classify, HttpTransport, ProxyConfig, Transport};
use crate::pagination::paginate;
use crate::request::{is_numeric_developer, Operation, RequestBuilder};
use crate::schema::{tables, PageLayout};
use crate::types::{Collection, EntityKind, ImageSize, JsonObject, JsonValue, Locale, SortOrder};
use futures::stream::{self, StreamExt};
use sources::{ReviewPages, SearchPages};
use std::sync::Arc;
use tracing::{debug, info, warn};
use types::StatsCounters;

/// Client for every marketplace retrieval.
///
/// `Scraper` is `Send + Sync`; share it behind an `Arc` or by reference.
/// All requests pass through the transport's rate limiter.
pub struct Scraper {
    transport: Arc<dyn Transport>,
    http: Option<Arc<HttpTransport>>,
    builder: RequestBuilder,
    config: ScraperConfig,
    stats: StatsCounters,
}

impl Scraper {
    /// Create a scraper with default configuration
    pub fn new() -> Result<Self> {
        Self::from_config(ScraperConfig::default())
    }

    /// Create a scraper backed by an HTTP transport
    pub fn from_config(config: ScraperConfig) -> Result<Self> {
        config.validate()?;
        let http = Arc::new(HttpTransport::with_config(config.http_config())?);
        let transport: Arc<dyn Transport> = http.clone();
        Ok(Self {
            transport,
            http: Some(http),
            builder: RequestBuilder::new(config.base_url.clone()),
            config,
            stats: StatsCounters::default(),
        })
    }

    /// Create a scraper over any transport
    pub fn with_transport(transport: Arc<dyn Transport>, config: ScraperConfig) -> Self {
        Self {
            transport,
            http: None,
            builder: RequestBuilder::new(config.base_url.clone()),
            config,
            stats: StatsCounters::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Request counters so far
    pub fn stats(&self) -> FetchStats {
        self.stats.snapshot()
    }

    /// Replace or clear the proxy for subsequent requests.
    ///
    /// Only scrapers built with [`Scraper::from_config`] own a proxy-capable
    /// transport.
    pub fn set_proxy(&self, proxy: Option<ProxyConfig>) -> Result<()> {
        match &self.http {
            Some(http) => http.set_proxy(proxy),
            None => Err(Error::config("transport does not support proxies")),
        }
    }

    fn format_context(&self, image_size: Option<ImageSize>) -> FormatContext {
        FormatContext {
            image_size: image_size.or(self.config.image_size),
            base_url: self.config.base_url.clone(),
        }
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    async fn fetch(&self, op: &Operation, locale: &Locale) -> Result<String> {
        let request = self.builder.build(op, locale);
        debug!("{} {}", request.method, request.url);

        self.stats.add_request();
        let result = match self.transport.fetch(&request).await {
            Ok(response) => classify(response, op.kind(), &op.identifier()),
            Err(e) => Err(e),
        };
        if result.is_err() {
            self.stats.add_failure();
        }
        result
    }

    /// Fetch `op`, retrying once without the country when allowed.
    ///
    /// Returns the body together with the locale that produced it. The
    /// retry's outcome is final.
    async fn fetch_localized(&self, op: &Operation, locale: &Locale) -> Result<(String, Locale)> {
        match self.fetch(op, locale).await {
            Ok(body) => Ok((body, locale.clone())),
            Err(e) if op.supports_locale_fallback() && locale.has_country() => {
                let relaxed = locale.without_country();
                warn!(
                    "{} request for '{}' failed ({e}), retrying without country",
                    op.kind(),
                    op.identifier()
                );
                self.stats.add_fallback();
                let body = self.fetch(op, &relaxed).await?;
                Ok((body, relaxed))
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch `op` and split the response by `layout`
    pub(crate) async fn fetch_page(
        &self,
        op: &Operation,
        locale: &Locale,
        layout: &'static PageLayout,
    ) -> Result<(DecodedPage, Locale)> {
        let (body, locale) = self.fetch_localized(op, locale).await?;
        let page = LayoutDecoder::new(layout).decode(&body)?;
        Ok((page, locale))
    }

    /// Single-request listings, truncated to `count`
    async fn fetch_listing(
        &self,
        op: Operation,
        locale: &Locale,
        layout: &'static PageLayout,
        count: usize,
    ) -> Result<Vec<Record>> {
        let (mut page, _) = self.fetch_page(&op, locale, layout).await?;
        page.items.truncate(count);

        let records = format_all(op.kind(), &page.items, &self.format_context(None));
        info!(
            "Retrieved {} {} records for '{}'",
            records.len(),
            op.kind(),
            op.identifier()
        );
        Ok(records)
    }

    // ========================================================================
    // App
    // ========================================================================

    /// Full detail record of one app
    pub async fn app(
        &self,
        app_id: &str,
        locale: &Locale,
        image_size: Option<ImageSize>,
    ) -> Result<Record> {
        let app_id = required(EntityKind::App, app_id, "app id")?;
        let op = Operation::AppDetails {
            app_id: app_id.to_string(),
        };

        let (body, _) = self.fetch_localized(&op, locale).await?;
        let root = LayoutDecoder::new(&tables::APP_PAGE).decode_raw(&body)?;
        let record = format(EntityKind::App, &root, &self.format_context(image_size));
        info!("Retrieved app '{app_id}'");
        Ok(record)
    }

    /// One field of an app record
    pub async fn app_field(&self, app_id: &str, field: &str, locale: &Locale) -> Result<JsonValue> {
        let record = self.app(app_id, locale, None).await?;
        Ok(record.get(field).cloned().unwrap_or(JsonValue::Null))
    }

    /// Selected fields of an app record
    pub async fn app_fields<S: AsRef<str>>(
        &self,
        app_id: &str,
        fields: &[S],
        locale: &Locale,
    ) -> Result<JsonObject> {
        Ok(self.app(app_id, locale, None).await?.project(fields))
    }

    /// Detail records of many apps, at most `concurrency` in flight.
    ///
    /// Results keep the order of `app_ids`; each app succeeds or fails on
    /// its own.
    pub async fn apps<S: AsRef<str>>(
        &self,
        app_ids: &[S],
        locale: &Locale,
        concurrency: usize,
    ) -> Vec<Result<Record>> {
        stream::iter(app_ids)
            .map(|id| self.app(id.as_ref(), locale, None))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Search results for `query`, paginated until `count` are collected
    pub async fn search(&self, query: &str, count: usize, locale: &Locale) -> Result<Vec<Record>> {
        let query = required(EntityKind::SearchResult, query, "query")?;
        let mut source = SearchPages {
            scraper: self,
            query: query.to_string(),
            locale: locale.clone(),
            ctx: self.format_context(None),
        };

        let state = paginate(&mut source, count).await?;
        info!(
            "Retrieved {} search results for '{query}' in {} rounds",
            state.collected.len(),
            state.rounds
        );
        Ok(state.into_items())
    }

    /// One field of every search result
    pub async fn search_field(
        &self,
        query: &str,
        field: &str,
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<JsonValue>> {
        Ok(field_values(&self.search(query, count, locale).await?, field))
    }

    /// Selected fields of every search result
    pub async fn search_fields<S: AsRef<str>>(
        &self,
        query: &str,
        fields: &[S],
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<JsonObject>> {
        Ok(projections(&self.search(query, count, locale).await?, fields))
    }

    // ========================================================================
    // Reviews
    // ========================================================================

    /// Reviews of an app, fetched in batches until `count` are collected
    pub async fn reviews(
        &self,
        app_id: &str,
        count: usize,
        locale: &Locale,
        sort: SortOrder,
    ) -> Result<Vec<Record>> {
        let app_id = required(EntityKind::Review, app_id, "app id")?;
        let mut source = ReviewPages {
            scraper: self,
            app_id: app_id.to_string(),
            sort,
            locale: locale.clone(),
            batch_size: self.config.reviews_batch_size.max(1),
            ctx: self.format_context(None),
        };

        let state = paginate(&mut source, count).await?;
        info!(
            "Retrieved {} reviews for '{app_id}' in {} rounds",
            state.collected.len(),
            state.rounds
        );
        Ok(state.into_items())
    }

    /// One field of every review
    pub async fn reviews_field(
        &self,
        app_id: &str,
        field: &str,
        count: usize,
        locale: &Locale,
        sort: SortOrder,
    ) -> Result<Vec<JsonValue>> {
        Ok(field_values(
            &self.reviews(app_id, count, locale, sort).await?,
            field,
        ))
    }

    /// Selected fields of every review
    pub async fn reviews_fields<S: AsRef<str>>(
        &self,
        app_id: &str,
        fields: &[S],
        count: usize,
        locale: &Locale,
        sort: SortOrder,
    ) -> Result<Vec<JsonObject>> {
        Ok(projections(
            &self.reviews(app_id, count, locale, sort).await?,
            fields,
        ))
    }

    // ========================================================================
    // Developer
    // ========================================================================

    /// Apps of a developer, by numeric id or developer name
    pub async fn developer(
        &self,
        dev_id: &str,
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<Record>> {
        let dev_id = required(EntityKind::DeveloperApp, dev_id, "developer id")?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let layout = if is_numeric_developer(dev_id) {
            &tables::DEVELOPER_NUMERIC
        } else {
            &tables::DEVELOPER_NAMED
        };
        let op = Operation::DeveloperPage {
            dev_id: dev_id.to_string(),
        };
        self.fetch_listing(op, locale, layout, count).await
    }

    /// One field of every developer app
    pub async fn developer_field(
        &self,
        dev_id: &str,
        field: &str,
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<JsonValue>> {
        Ok(field_values(
            &self.developer(dev_id, count, locale).await?,
            field,
        ))
    }

    /// Selected fields of every developer app
    pub async fn developer_fields<S: AsRef<str>>(
        &self,
        dev_id: &str,
        fields: &[S],
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<JsonObject>> {
        Ok(projections(
            &self.developer(dev_id, count, locale).await?,
            fields,
        ))
    }

    // ========================================================================
    // Similar Apps
    // ========================================================================

    /// Apps of the similar-apps cluster linked from an app page.
    ///
    /// An app page without the cluster link yields no records.
    pub async fn similar(&self, app_id: &str, count: usize, locale: &Locale) -> Result<Vec<Record>> {
        let app_id = required(EntityKind::SimilarApp, app_id, "app id")?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let op = Operation::AppDetails {
            app_id: app_id.to_string(),
        };
        let (body, locale) = self.fetch_localized(&op, locale).await?;
        let link_layout = &tables::SIMILAR_LINK;
        let root = LayoutDecoder::new(link_layout).decode_raw(&body)?;

        let Some(path) = walk_str(&root, link_layout.items) else {
            debug!("No similar-apps cluster on the page of '{app_id}'");
            return Ok(Vec::new());
        };

        let op = Operation::ClusterPage {
            path: path.to_string(),
        };
        self.fetch_listing(op, &locale, &tables::CLUSTER, count).await
    }

    /// One field of every similar app
    pub async fn similar_field(
        &self,
        app_id: &str,
        field: &str,
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<JsonValue>> {
        Ok(field_values(
            &self.similar(app_id, count, locale).await?,
            field,
        ))
    }

    /// Selected fields of every similar app
    pub async fn similar_fields<S: AsRef<str>>(
        &self,
        app_id: &str,
        fields: &[S],
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<JsonObject>> {
        Ok(projections(
            &self.similar(app_id, count, locale).await?,
            fields,
        ))
    }

    // ========================================================================
    // Top Charts
    // ========================================================================

    /// Entries of a top chart
    pub async fn top_chart(
        &self,
        collection: Collection,
        category: &str,
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<Record>> {
        let category = required(EntityKind::ListItem, category, "category")?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let op = Operation::TopChart {
            collection,
            category: category.to_string(),
            count,
        };
        self.fetch_listing(op, locale, &tables::TOP_CHART, count).await
    }

    /// One field of every chart entry
    pub async fn top_chart_field(
        &self,
        collection: Collection,
        category: &str,
        field: &str,
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<JsonValue>> {
        Ok(field_values(
            &self.top_chart(collection, category, count, locale).await?,
            field,
        ))
    }

    /// Selected fields of every chart entry
    pub async fn top_chart_fields<S: AsRef<str>>(
        &self,
        collection: Collection,
        category: &str,
        fields: &[S],
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<JsonObject>> {
        Ok(projections(
            &self.top_chart(collection, category, count, locale).await?,
            fields,
        ))
    }

    // ========================================================================
    // Suggestions
    // ========================================================================

    /// Autocomplete suggestions for `term`
    pub async fn suggest(&self, term: &str, count: usize, locale: &Locale) -> Result<Vec<Record>> {
        let term = required(EntityKind::Suggestion, term, "term")?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let op = Operation::Suggest {
            term: term.to_string(),
        };
        self.fetch_listing(op, locale, &tables::SUGGEST, count).await
    }

    /// Autocomplete suggestions as plain strings
    pub async fn suggest_terms(
        &self,
        term: &str,
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<String>> {
        let records = self.suggest(term, count, locale).await?;
        Ok(records
            .iter()
            .filter_map(|r| r.get_str("term"))
            .map(str::to_string)
            .collect())
    }

    /// Suggestions for `term`, each with its own suggestions
    pub async fn suggest_nested(
        &self,
        term: &str,
        count: usize,
        locale: &Locale,
    ) -> Result<Vec<NestedSuggestion>> {
        let first_level = self.suggest_terms(term, count, locale).await?;

        let mut nested = Vec::with_capacity(first_level.len());
        for suggestion in first_level {
            let suggestions = self.suggest_terms(&suggestion, count, locale).await?;
            nested.push(NestedSuggestion {
                term: suggestion,
                suggestions,
            });
        }
        Ok(nested)
    }

    // ========================================================================
    // Generic Retrieval
    // ========================================================================

    /// Retrieve records of any kind.
    ///
    /// Unset query options take the configured defaults. An app retrieval
    /// yields one record, or none for a count of zero.
    pub async fn retrieve(&self, kind: EntityKind, query: &Query) -> Result<Vec<Record>> {
        let defaults = &self.config.defaults;
        let locale = query.locale.as_ref().unwrap_or(&self.config.locale);
        let target = query.target.as_str();

        match kind {
            EntityKind::App => {
                let app_id = required(EntityKind::App, target, "app id")?;
                if query.count == Some(0) {
                    return Ok(Vec::new());
                }
                let record = self.app(app_id, locale, query.image_size).await?;
                Ok(vec![record])
            }
            EntityKind::SearchResult => {
                let count = query.count.unwrap_or(defaults.search_count);
                self.search(target, count, locale).await
            }
            EntityKind::Review => {
                let count = query.count.unwrap_or(defaults.reviews_count);
                let sort = query.sort.unwrap_or(defaults.reviews_sort);
                self.reviews(target, count, locale, sort).await
            }
            EntityKind::DeveloperApp => {
                let count = query.count.unwrap_or(defaults.developer_count);
                self.developer(target, count, locale).await
            }
            EntityKind::SimilarApp => {
                let count = query.count.unwrap_or(defaults.similar_count);
                self.similar(target, count, locale).await
            }
            EntityKind::ListItem => {
                let count = query.count.unwrap_or(defaults.list_count);
                let collection = query.collection.unwrap_or(defaults.list_collection);
                let category = if target.trim().is_empty() {
                    defaults.list_category.as_str()
                } else {
                    target
                };
                self.top_chart(collection, category, count, locale).await
            }
            EntityKind::Suggestion => {
                let count = query.count.unwrap_or(defaults.suggest_count);
                self.suggest(target, count, locale).await
            }
        }
    }
}

/// Trimmed identifier, or `InvalidIdentifier` when it is empty
fn required<'a>(kind: EntityKind, value: &'a str, what: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid_identifier(
            kind,
            format!("{what} must not be empty"),
        ));
    }
    Ok(value)
}

fn field_values(records: &[Record], field: &str) -> Vec<JsonValue> {
    records
        .iter()
        .map(|r| r.get(field).cloned().unwrap_or(JsonValue::Null))
        .collect()
}

fn projections<S: AsRef<str>>(records: &[Record], fields: &[S]) -> Vec<JsonObject> {
    records.iter().map(|r| r.project(fields)).collect()
}

#[cfg(test)]
mod tests;
