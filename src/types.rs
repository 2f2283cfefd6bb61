//! Common types used throughout gplay-scraper
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::GET => f.write_str("GET"),
            Method::POST => f.write_str("POST"),
        }
    }
}

// ============================================================================
// Entity Kind
// ============================================================================

/// Kind of entity a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Full app detail page
    App,
    /// One hit of a keyword search
    SearchResult,
    /// One user review
    Review,
    /// One app of a developer portfolio
    DeveloperApp,
    /// One app of the similar-apps cluster
    SimilarApp,
    /// One entry of a top chart
    ListItem,
    /// One autocomplete suggestion
    Suggestion,
}

impl EntityKind {
    /// All kinds, in declaration order
    pub const ALL: [EntityKind; 7] = [
        EntityKind::App,
        EntityKind::SearchResult,
        EntityKind::Review,
        EntityKind::DeveloperApp,
        EntityKind::SimilarApp,
        EntityKind::ListItem,
        EntityKind::Suggestion,
    ];
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::App => "app",
            EntityKind::SearchResult => "search",
            EntityKind::Review => "review",
            EntityKind::DeveloperApp => "developer",
            EntityKind::SimilarApp => "similar apps",
            EntityKind::ListItem => "top chart",
            EntityKind::Suggestion => "suggestion",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Review Sort Order
// ============================================================================

/// Sort order accepted by the reviews endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Relevant,
    #[default]
    Newest,
    Rating,
}

impl SortOrder {
    /// Protocol value embedded in the request envelope
    pub fn code(self) -> u8 {
        match self {
            SortOrder::Relevant => 1,
            SortOrder::Newest => 2,
            SortOrder::Rating => 3,
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RELEVANT" => Ok(SortOrder::Relevant),
            "NEWEST" => Ok(SortOrder::Newest),
            "RATING" => Ok(SortOrder::Rating),
            other => Err(Error::invalid_identifier(
                EntityKind::Review,
                format!("unknown sort order '{other}' (expected NEWEST, RELEVANT or RATING)"),
            )),
        }
    }
}

// ============================================================================
// Top Chart Collection
// ============================================================================

/// Top chart collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Collection {
    #[default]
    TopFree,
    TopPaid,
    TopGrossing,
}

impl Collection {
    /// Cluster name used by the chart RPC
    pub fn cluster(self) -> &'static str {
        match self {
            Collection::TopFree => "topselling_free",
            Collection::TopPaid => "topselling_paid",
            Collection::TopGrossing => "topgrossing",
        }
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOP_FREE" | "TOPSELLING_FREE" => Ok(Collection::TopFree),
            "TOP_PAID" | "TOPSELLING_PAID" => Ok(Collection::TopPaid),
            "TOP_GROSSING" | "TOPGROSSING" => Ok(Collection::TopGrossing),
            other => Err(Error::invalid_identifier(
                EntityKind::ListItem,
                format!("unknown collection '{other}'"),
            )),
        }
    }
}

// ============================================================================
// Image Size
// ============================================================================

/// Requested rendition width for image URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageSize {
    Small,
    Medium,
    Large,
    Original,
}

impl ImageSize {
    /// URL suffix selecting the rendition
    pub fn suffix(self) -> &'static str {
        match self {
            ImageSize::Small => "=w512",
            ImageSize::Medium => "=w1024",
            ImageSize::Large => "=w2048",
            ImageSize::Original => "=w9999",
        }
    }
}

impl FromStr for ImageSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SMALL" => Ok(ImageSize::Small),
            "MEDIUM" => Ok(ImageSize::Medium),
            "LARGE" => Ok(ImageSize::Large),
            "ORIGINAL" => Ok(ImageSize::Original),
            other => Err(Error::config(format!("unknown image size '{other}'"))),
        }
    }
}

// ============================================================================
// Locale
// ============================================================================

/// Language and optional country sent as `hl` / `gl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Language code (e.g. "en")
    pub lang: String,
    /// Country code (e.g. "us"); absent in the relaxed fallback form
    #[serde(default)]
    pub country: Option<String>,
}

impl Locale {
    /// Create a locale with both language and country
    pub fn new(lang: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            country: Some(country.into()),
        }
    }

    /// Same language, no country
    #[must_use]
    pub fn without_country(&self) -> Self {
        Self {
            lang: self.lang.clone(),
            country: None,
        }
    }

    /// Whether a country-relaxed retry is possible
    pub fn has_country(&self) -> bool {
        self.country.as_deref().is_some_and(|c| !c.is_empty())
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en", "us")
    }
}
