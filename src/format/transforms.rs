//! Value transforms
//!
//! Each transform takes the decoded node at a field's path and returns the
//! canonical value, or `None` when the node cannot be converted (the field
//! then takes its default).

use super::types::FormatContext;
use crate::decode::{walk_str, RawNode};
use crate::schema::{IndexPath, Transform};
use crate::types::{ImageSize, JsonValue};
use chrono::{DateTime, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use url::Url;

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern is valid"));

/// Apply `transform` to a present node
pub fn apply(transform: Transform, node: &RawNode, ctx: &FormatContext) -> Option<JsonValue> {
    match transform {
        Transform::Raw => Some(node.clone()),
        Transform::Text => text(node).map(JsonValue::String),
        Transform::HtmlText => node.as_str().map(|s| JsonValue::String(html_text(s))),
        Transform::Integer => integer(node).map(JsonValue::from),
        Transform::Float => float(node).map(JsonValue::from),
        Transform::Flag => Some(JsonValue::Bool(flag(node))),
        Transform::InstallCount => match node {
            JsonValue::String(s) => parse_install_count(s).map(JsonValue::from),
            other => integer(other).map(JsonValue::from),
        },
        Transform::Micros => float(node).map(|m| json!(micros_to_amount(m))),
        Transform::Timestamp => integer(node).and_then(timestamp).map(JsonValue::String),
        Transform::ImageUrl => node
            .as_str()
            .map(|url| JsonValue::String(sized_image(url, ctx.image_size))),
        Transform::ImageList(inner) => Some(image_list(node, inner, ctx.image_size)),
        Transform::JoinStrings(sep) => join_strings(node, sep).map(JsonValue::String),
        Transform::QueryParam(name) => node
            .as_str()
            .and_then(|link| query_param(link, name, &ctx.base_url))
            .map(JsonValue::String),
        Transform::Histogram => histogram(node),
    }
}

fn text(node: &RawNode) -> Option<String> {
    match node {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn integer(node: &RawNode) -> Option<i64> {
    match node {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        JsonValue::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn float(node: &RawNode) -> Option<f64> {
    match node {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(node: &RawNode) -> bool {
    !matches!(node, JsonValue::Null | JsonValue::Bool(false))
}

/// Marketplace HTML fragment to plain text.
///
/// Line breaks become newlines, tags are dropped and entities decoded.
pub fn html_text(html: &str) -> String {
    let with_newlines = LINE_BREAK.replace_all(html, "\n");
    let fragment = scraper::Html::parse_fragment(&with_newlines);
    let text: String = fragment.root_element().text().collect();
    text.trim().to_string()
}

/// Localized install count ("10,000,000+", "1.000+") to an integer
pub fn parse_install_count(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Price in micros to currency units
pub fn micros_to_amount(micros: f64) -> f64 {
    micros / 1_000_000.0
}

/// Unix seconds to RFC 3339 UTC
pub fn timestamp(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Append the rendition suffix, replacing any suffix the URL already has
pub fn sized_image(url: &str, size: Option<ImageSize>) -> String {
    let Some(size) = size else {
        return url.to_string();
    };

    let last_slash = url.rfind('/').unwrap_or(0);
    let base = match url.rfind('=') {
        Some(i) if i > last_slash => &url[..i],
        _ => url,
    };
    format!("{base}{}", size.suffix())
}

fn image_list(node: &RawNode, inner: IndexPath, size: Option<ImageSize>) -> JsonValue {
    let urls = node
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| walk_str(item, inner))
                .map(|url| JsonValue::String(sized_image(url, size)))
                .collect()
        })
        .unwrap_or_default();
    JsonValue::Array(urls)
}

fn join_strings(node: &RawNode, sep: &str) -> Option<String> {
    fn collect<'a>(node: &'a RawNode, out: &mut Vec<&'a str>) {
        match node {
            JsonValue::String(s) if !s.is_empty() => out.push(s),
            JsonValue::Array(items) => items.iter().for_each(|item| collect(item, out)),
            _ => {}
        }
    }

    let mut parts = Vec::new();
    collect(node, &mut parts);
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(sep))
    }
}

/// Query parameter of an absolute or host-relative link
pub fn query_param(link: &str, name: &str, base_url: &str) -> Option<String> {
    let url = Url::parse(link)
        .or_else(|_| Url::parse(base_url).and_then(|base| base.join(link)))
        .ok()?;
    url.query_pairs()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.into_owned())
}

/// Five star buckets, one to five stars; each bucket holds `[_, count]`
fn histogram(node: &RawNode) -> Option<JsonValue> {
    let buckets = node.as_array()?;
    let counts: Vec<i64> = (1..=5)
        .map(|star| {
            buckets
                .get(star)
                .and_then(|bucket| bucket.get(1))
                .and_then(integer)
                .unwrap_or(0)
        })
        .collect();
    Some(json!(counts))
}
