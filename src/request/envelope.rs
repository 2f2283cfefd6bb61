//! Batch-execute request envelopes
//!
//! Each RPC takes a nested array serialized to a string, wrapped in an outer
//! array naming the RPC, form-encoded as `f.req`. The inner shapes are fixed
//! by the endpoint; any deviation is rejected upstream.

use crate::types::{Collection, SortOrder};
use serde_json::{json, Value};

pub const SEARCH_RPC: &str = "qnKhOb";
pub const REVIEWS_RPC: &str = "oCPfdb";
pub const TOP_CHART_RPC: &str = "vyAe2";
pub const SUGGEST_RPC: &str = "IJ4APc";

/// Session parameter the chart endpoint expects after `f.req`
const TOP_CHART_AT: &str = "AFSRYlx8XZfN8-O-IKASbNBDkB6T%3A1655531200971";

/// Wrap an inner request into a form-encoded `f.req` body
pub fn rpc_body(rpc_id: &str, inner: &Value) -> String {
    let outer = json!([[[rpc_id, inner.to_string(), null, "generic"]]]);
    form_body(&outer)
}

fn form_body(outer: &Value) -> String {
    format!("f.req={}", urlencoding::encode(&outer.to_string()))
}

/// Continuation of a search: `needed` more results after `token`
pub fn search_continuation(token: &str, needed: usize) -> String {
    let inner = json!([[
        null,
        [
            [10, [10, needed]],
            true,
            null,
            [96, 27, 4, 8, 57, 30, 110, 79, 11, 16, 49, 1, 3, 9, 12, 104, 55, 56, 51, 10, 34, 77]
        ],
        null,
        token
    ]]);
    rpc_body(SEARCH_RPC, &inner)
}

/// One batch of reviews, continuing after `token` when given
pub fn reviews(app_id: &str, sort: SortOrder, count: usize, token: Option<&str>) -> String {
    let page = match token {
        Some(token) => json!([count, null, token]),
        None => json!([count]),
    };
    let inner = json!([
        null,
        [
            2,
            sort.code(),
            page,
            null,
            [null, null, null, null, null, null, null, null, null]
        ],
        [app_id, 7]
    ]);
    rpc_body(REVIEWS_RPC, &inner)
}

/// Top chart of a collection within a category
pub fn top_chart(collection: Collection, category: &str, count: usize) -> String {
    let inner = json!([[
        null,
        [
            [8, [20, count]],
            true,
            null,
            [
                64, 1, 195, 71, 8, 72, 9, 10, 11, 139, 12, 16, 145, 148, 150, 151, 152, 27, 30,
                31, 96, 32, 34, 163, 100, 165, 104, 169, 108, 110, 113, 55, 56, 57, 122
            ],
            [
                null,
                null,
                [
                    [
                        [true], null, [[null, []]], null, null, null, null, [null, 2], null,
                        null, null, null, null, null, [1], null, null, null, null, null, null,
                        null, [1]
                    ],
                    [null, [[null, []]]],
                    [null, [[null, []]], null, [true]],
                    [null, [[null, []]]],
                    null,
                    null,
                    null,
                    null,
                    [[[null, []]]],
                    [[[null, []]]]
                ],
                [[[
                    [7, 1],
                    [[
                        1, 73, 96, 103, 97, 58, 50, 92, 52, 112, 69, 19, 31, 101, 123, 74, 49,
                        80, 38, 20, 10, 14, 79, 43, 42, 139
                    ]]
                ]]]
            ],
            null,
            null,
            [[[1, 2], [10, 8, 9], [], []]]
        ],
        [2, collection.cluster(), category]
    ]]);
    format!("{}&at={TOP_CHART_AT}&", rpc_body(TOP_CHART_RPC, &inner))
}

/// Autocomplete for `term`
pub fn suggest(term: &str) -> String {
    let inner = json!([[null, [term], [10], [2], 4]]);
    form_body(&json!([[[SUGGEST_RPC, inner.to_string()]]]))
}
