//! Decoder implementations
//!
//! Path walking over raw trees, embedded-data extraction for HTML pages and
//! envelope unwrapping for batch-execute responses.

use super::types::{DecodedPage, RawNode, RecordDecoder};
use crate::error::{Error, Result};
use crate::schema::{PageLayout, PayloadSource, Segment, Shape};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Anti-JSON prefix of batch-execute bodies
const XSSI_PREFIX: &str = ")]}'";

static DATA_CALLBACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)AF_initDataCallback\(\{\s*key:\s*['"](ds:\d+)['"].*?data:(.*?),\s*sideChannel:\s*\{\}\s*\}\);"#,
    )
    .expect("embedded data pattern is valid")
});

// ============================================================================
// Path Walking
// ============================================================================

/// Descend `root` along `path`.
///
/// Returns `None` when an index is out of range, a non-sequence node is met
/// before the path ends, no child matches a shape, or the final node is null.
pub fn walk<'a>(root: &'a RawNode, path: &[Segment]) -> Option<&'a RawNode> {
    let mut current = root;
    for segment in path {
        let children = current.as_array()?;
        current = match *segment {
            Segment::Index(i) => children.get(i)?,
            Segment::FromEnd(n) => {
                let i = children.len().checked_sub(n)?;
                children.get(i)?
            }
            Segment::FirstMatching(shape) => children.iter().find(|c| matches_shape(c, shape))?,
        };
    }

    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Check whether a node has the given shape
pub fn matches_shape(node: &RawNode, shape: Shape) -> bool {
    match shape {
        Shape::NonEmptyArrayAt(i) => node
            .as_array()
            .and_then(|children| children.get(i))
            .and_then(Value::as_array)
            .is_some_and(|inner| !inner.is_empty()),
        Shape::StringAt(path) => walk(node, path).is_some_and(Value::is_string),
    }
}

/// Child nodes of the sequence at `path`, empty when absent
pub fn walk_items<'a>(root: &'a RawNode, path: &[Segment]) -> &'a [RawNode] {
    walk(root, path)
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}

/// Non-empty string at `path`
pub fn walk_str<'a>(root: &'a RawNode, path: &[Segment]) -> Option<&'a str> {
    walk(root, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

// ============================================================================
// Array Literals
// ============================================================================

/// Parse a nested array literal as emitted by the marketplace.
///
/// Accepts strict JSON, and falls back to a normalized form with trailing
/// commas dropped and elided sequence slots (`[1,,2]`) filled with null.
pub fn parse_array_literal(text: &str) -> Result<RawNode> {
    let text = text.trim();
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    serde_json::from_str(&normalize_literal(text))
        .map_err(|e| Error::decode(format!("Failed to parse array literal: {e}")))
}

fn normalize_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    // Last significant character emitted outside a string
    let mut last = '\0';
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
                last = '"';
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                if last == '[' || last == ',' {
                    out.push_str("null");
                }
                let next = next_significant(&mut chars);
                if !matches!(next, Some(']' | '}')) {
                    out.push(c);
                    last = ',';
                }
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                out.push(c);
                last = c;
            }
        }
    }

    out
}

fn next_significant(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<char> {
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else {
            return Some(c);
        }
    }
    None
}

// ============================================================================
// HTML Embedded Data
// ============================================================================

/// Extract every embedded data block of an HTML page, keyed by `ds:N`.
///
/// Blocks whose literal fails to parse are skipped.
pub fn extract_datasets(html: &str) -> HashMap<String, RawNode> {
    let mut datasets = HashMap::new();

    for caps in DATA_CALLBACK.captures_iter(html) {
        let key = &caps[1];
        match parse_array_literal(&caps[2]) {
            Ok(value) => {
                datasets.insert(key.to_string(), value);
            }
            Err(e) => debug!("Skipping embedded block {key}: {e}"),
        }
    }

    datasets
}

/// Extract one embedded data block by key
pub fn extract_dataset(html: &str, key: &str) -> Result<RawNode> {
    extract_datasets(html)
        .remove(key)
        .ok_or_else(|| Error::decode(format!("Embedded data block '{key}' not found")))
}

// ============================================================================
// Batch-Execute Responses
// ============================================================================

/// Unwrap the payload of `rpc_id` from a batch-execute response body.
///
/// The body is `)]}'` followed by either one JSON document or length-prefixed
/// chunks, each a sequence of `["wrb.fr", rpc_id, "<payload>", ...]` entries.
/// A null payload decodes to `Value::Null`.
pub fn parse_batch_response(body: &str, rpc_id: &str) -> Result<RawNode> {
    let body = body.trim_start();
    let body = body.strip_prefix(XSSI_PREFIX).unwrap_or(body);

    for chunk in batch_chunks(body) {
        let Some(entries) = chunk.as_array() else {
            continue;
        };
        for entry in entries {
            let Some(fields) = entry.as_array() else {
                continue;
            };
            let tag = fields.first().and_then(Value::as_str);
            let id = fields.get(1).and_then(Value::as_str);
            if tag != Some("wrb.fr") || id != Some(rpc_id) {
                continue;
            }

            return match fields.get(2) {
                Some(Value::String(payload)) => parse_array_literal(payload),
                _ => Ok(Value::Null),
            };
        }
    }

    Err(Error::decode(format!(
        "No '{rpc_id}' payload in batch response"
    )))
}

fn batch_chunks(body: &str) -> Vec<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(body.trim()) {
        return vec![value];
    }

    body.lines()
        .map(str::trim)
        .filter(|line| line.starts_with('['))
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

// ============================================================================
// Layout Decoder
// ============================================================================

/// Decoder driven by a static page layout
#[derive(Debug, Clone, Copy)]
pub struct LayoutDecoder {
    layout: &'static PageLayout,
}

impl LayoutDecoder {
    /// Create a decoder for a layout
    pub fn new(layout: &'static PageLayout) -> Self {
        Self { layout }
    }

    /// The layout this decoder applies
    pub fn layout(&self) -> &'static PageLayout {
        self.layout
    }

    /// Split an already decoded payload into items and token
    pub fn page_from_root(&self, root: &RawNode) -> DecodedPage {
        let items = walk_items(root, self.layout.items).to_vec();
        let token = self
            .layout
            .token
            .and_then(|path| walk_str(root, path))
            .filter(|token| !token.trim().is_empty())
            .map(str::to_string);
        DecodedPage { items, token }
    }
}

impl RecordDecoder for LayoutDecoder {
    fn decode(&self, body: &str) -> Result<DecodedPage> {
        let root = self.decode_raw(body)?;
        let page = self.page_from_root(&root);
        debug!(
            "Decoded {} items (token: {}) from {:?}",
            page.items.len(),
            page.token.is_some(),
            self.layout.source
        );
        Ok(page)
    }

    fn decode_raw(&self, body: &str) -> Result<RawNode> {
        match self.layout.source {
            PayloadSource::Dataset(key) => extract_dataset(body, key),
            PayloadSource::Rpc(rpc_id) => parse_batch_response(body, rpc_id),
        }
    }
}
