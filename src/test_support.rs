//! Builders for synthetic marketplace payloads used across unit tests

use serde_json::{json, Value};

/// Set `value` at `path`, growing sequences with nulls as needed
pub(crate) fn set_at(root: &mut Value, path: &[usize], value: Value) {
    let mut current = root;
    for &i in path {
        if !current.is_array() {
            *current = json!([]);
        }
        let Value::Array(children) = current else {
            unreachable!("node was just made a sequence");
        };
        if children.len() <= i {
            children.resize(i + 1, Value::Null);
        }
        current = &mut children[i];
    }
    *current = value;
}

/// Tree with each value placed at its path
pub(crate) fn tree(entries: &[(&[usize], Value)]) -> Value {
    let mut root = json!([]);
    for (path, value) in entries {
        set_at(&mut root, path, value.clone());
    }
    root
}

/// HTML page embedding each dataset under its key
pub(crate) fn html_page(datasets: &[(&str, &Value)]) -> String {
    let mut html = String::from("<!doctype html><html><body>");
    for (key, data) in datasets {
        html.push_str(&format!(
            "<script nonce=\"n\">AF_initDataCallback({{key: '{key}', hash: '1', data:{data}, sideChannel: {{}}}});</script>"
        ));
    }
    html.push_str("</body></html>");
    html
}

/// Batch-execute body carrying `payload` for `rpc_id`
pub(crate) fn batch_body(rpc_id: &str, payload: &Value) -> String {
    let envelope = json!([
        ["wrb.fr", rpc_id, payload.to_string(), null, null, null, "generic"],
        ["di", 42],
        ["af.httprm", 41, "-1", 7]
    ]);
    format!(")]}}'\n\n{envelope}")
}

/// App detail dataset (`ds:5`) with the given fields under the app root
pub(crate) fn app_dataset(fields: &[(&[usize], Value)]) -> Value {
    let mut root = json!([]);
    for (path, value) in fields {
        let mut full = vec![1, 2];
        full.extend_from_slice(path);
        set_at(&mut root, &full, value.clone());
    }
    root
}

/// Cluster item as found in search, developer, similar and chart pages
pub(crate) fn cluster_item(app_id: &str, title: &str) -> Value {
    tree(&[
        (&[0, 0, 0], json!(app_id)),
        (&[0, 3], json!(title)),
        (&[0, 1, 3, 2], json!(format!("https://img.example/{app_id}"))),
        (&[0, 14], json!("Example Studio")),
        (&[0, 4, 0], json!("4.5")),
        (&[0, 4, 1], json!(4.5)),
        (&[0, 8, 1, 0, 0], json!(0)),
        (&[0, 15], json!("1,000+")),
    ])
}

/// First search page dataset (`ds:4`): a decoy section, then the results
pub(crate) fn search_dataset(items: Vec<Value>, token: Option<&str>) -> Value {
    let mut root = tree(&[(&[0, 1, 0, 0], json!("header"))]);
    set_at(&mut root, &[0, 1, 1, 22, 0], Value::Array(items));
    if let Some(token) = token {
        set_at(&mut root, &[0, 1, 1, 22, 1, 3, 1], json!(token));
    }
    root
}

/// Search continuation payload (`qnKhOb`)
pub(crate) fn search_continuation(items: Vec<Value>, token: Option<&str>) -> Value {
    let mut root = tree(&[(&[0, 0, 0], Value::Array(items))]);
    if let Some(token) = token {
        set_at(&mut root, &[0, 0, 7, 1], json!(token));
    }
    root
}

/// Cluster page dataset (`ds:3`) with items in the given slot
pub(crate) fn cluster_dataset(slot: usize, items: Vec<Value>) -> Value {
    tree(&[(&[0, 1, 0, slot, 0], Value::Array(items))])
}

/// App page dataset (`ds:7`) linking to the similar-apps cluster
pub(crate) fn similar_link_dataset(link: &str) -> Value {
    tree(&[(&[1, 1, 0, 21, 1, 2, 4, 2], json!(link))])
}
