//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::Result;
use serde_json::Value;

/// Untyped response tree: nested sequences of scalars
pub type RawNode = Value;

/// Item nodes and continuation token decoded from one response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedPage {
    /// Item nodes, in response order
    pub items: Vec<RawNode>,
    /// Token for the next page, if the source has more
    pub token: Option<String>,
}

impl DecodedPage {
    /// Page with no items and no token
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of item nodes
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page carried no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Trait for decoding response bodies into item nodes
pub trait RecordDecoder: Send + Sync {
    /// Decode the response body into item nodes and a continuation token
    fn decode(&self, body: &str) -> Result<DecodedPage>;

    /// Decode the response body into its payload tree (full response)
    fn decode_raw(&self, body: &str) -> Result<RawNode>;
}
