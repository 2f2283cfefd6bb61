//! Request types
//!
//! Operations the builder understands and the transport-ready descriptor
//! it produces.

use crate::types::{Collection, EntityKind, Method, SortOrder, StringMap};

/// One marketplace request, before locale and endpoint are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// App detail page (HTML)
    AppDetails { app_id: String },
    /// First search page (HTML form)
    SearchPage { query: String },
    /// Subsequent search pages (batch-execute `qnKhOb`)
    SearchContinuation { token: String, needed: usize },
    /// One batch of reviews (batch-execute `oCPfdb`)
    Reviews {
        app_id: String,
        sort: SortOrder,
        count: usize,
        token: Option<String>,
    },
    /// Developer portfolio page (HTML)
    DeveloperPage { dev_id: String },
    /// Cluster page linked from an app page (HTML)
    ClusterPage { path: String },
    /// Top chart (batch-execute `vyAe2`)
    TopChart {
        collection: Collection,
        category: String,
        count: usize,
    },
    /// Autocomplete (batch-execute `IJ4APc`)
    Suggest { term: String },
}

impl Operation {
    /// Entity kind this operation retrieves
    pub fn kind(&self) -> EntityKind {
        match self {
            Operation::AppDetails { .. } => EntityKind::App,
            Operation::SearchPage { .. } | Operation::SearchContinuation { .. } => {
                EntityKind::SearchResult
            }
            Operation::Reviews { .. } => EntityKind::Review,
            Operation::DeveloperPage { .. } => EntityKind::DeveloperApp,
            Operation::ClusterPage { .. } => EntityKind::SimilarApp,
            Operation::TopChart { .. } => EntityKind::ListItem,
            Operation::Suggest { .. } => EntityKind::Suggestion,
        }
    }

    /// Identifier reported in not-found errors
    pub fn identifier(&self) -> String {
        match self {
            Operation::AppDetails { app_id } | Operation::Reviews { app_id, .. } => app_id.clone(),
            Operation::SearchPage { query } => query.clone(),
            Operation::SearchContinuation { token, .. } => token.clone(),
            Operation::DeveloperPage { dev_id } => dev_id.clone(),
            Operation::ClusterPage { path } => path.clone(),
            Operation::TopChart {
                collection,
                category,
                ..
            } => format!("{}/{category}", collection.cluster()),
            Operation::Suggest { term } => term.clone(),
        }
    }

    /// Whether a failed request is retried once without the country
    pub fn supports_locale_fallback(&self) -> bool {
        matches!(
            self,
            Operation::AppDetails { .. }
                | Operation::SearchPage { .. }
                | Operation::DeveloperPage { .. }
        )
    }
}

/// Complete request handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub headers: StringMap,
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// GET request without body
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: StringMap::new(),
            body: None,
        }
    }

    /// POST request with a body
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: StringMap::new(),
            body: Some(body.into()),
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}
