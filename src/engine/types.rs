//! Engine types
//!
//! Query parameters for generic retrieval, nested suggestions and request
//! statistics.

use crate::types::{Collection, ImageSize, Locale, SortOrder};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Parameters of one generic retrieval.
///
/// `target` is the app id, search query, developer id, chart category or
/// suggestion term depending on the entity kind. Unset options fall back to
/// the scraper's configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub target: String,
    pub count: Option<usize>,
    pub locale: Option<Locale>,
    pub sort: Option<SortOrder>,
    pub collection: Option<Collection>,
    pub image_size: Option<ImageSize>,
}

impl Query {
    /// Create a query for a target
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Set the number of records wanted
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Set the locale
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Set the review sort order
    #[must_use]
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the top chart collection
    #[must_use]
    pub fn with_collection(mut self, collection: Collection) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Set the image rendition
    #[must_use]
    pub fn with_image_size(mut self, size: ImageSize) -> Self {
        self.image_size = Some(size);
        self
    }
}

/// A suggestion together with the suggestions for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedSuggestion {
    pub term: String,
    pub suggestions: Vec<String>,
}

/// Counters shared by every retrieval of one scraper
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    requests: AtomicU64,
    fallbacks: AtomicU64,
    failures: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn add_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> FetchStats {
        FetchStats {
            requests: self.requests.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Request statistics of a scraper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchStats {
    /// Requests handed to the transport
    pub requests: u64,
    /// Country-relaxed retries made
    pub fallbacks: u64,
    /// Requests that ended in an error
    pub failures: u64,
}
