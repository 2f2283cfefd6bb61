//! Record formatter
//!
//! Applies an entity schema to a raw node. Path fields are decoded and
//! transformed first; derived fields are computed from the result.

use super::transforms;
use super::types::{FormatContext, Record};
use crate::decode::{walk, RawNode};
use crate::schema::{Derived, FieldDefault, FieldSource, Transform};
use crate::types::{EntityKind, JsonObject, JsonValue};
use serde_json::json;

/// Build the canonical record of `kind` from `node`.
///
/// Never fails: absent or unconvertible fields take their default, so the
/// key set always equals the schema's field names.
pub fn format(kind: EntityKind, node: &RawNode, ctx: &FormatContext) -> Record {
    let schema = kind.schema();
    let mut fields = JsonObject::new();

    for spec in schema.fields {
        let value = match spec.source {
            FieldSource::Path(path) => {
                walk(node, path).and_then(|found| transforms::apply(spec.transform, found, ctx))
            }
            FieldSource::Derived(_) => None,
        };
        fields.insert(
            spec.name.to_string(),
            value.unwrap_or_else(|| default_value(spec.default)),
        );
    }

    for spec in schema.fields {
        if let FieldSource::Derived(derived) = spec.source {
            if let Some(value) = derive(derived, &fields, ctx) {
                fields.insert(spec.name.to_string(), value);
            }
        }
    }

    Record::new(kind, fields)
}

/// Format every item of a page
pub fn format_all(kind: EntityKind, items: &[RawNode], ctx: &FormatContext) -> Vec<Record> {
    items.iter().map(|item| format(kind, item, ctx)).collect()
}

fn default_value(default: FieldDefault) -> JsonValue {
    match default {
        FieldDefault::Null => JsonValue::Null,
        FieldDefault::Zero => json!(0),
        FieldDefault::ZeroFloat => json!(0.0),
        FieldDefault::False => JsonValue::Bool(false),
        FieldDefault::True => JsonValue::Bool(true),
        FieldDefault::EmptyText => JsonValue::String(String::new()),
        FieldDefault::EmptyList => JsonValue::Array(Vec::new()),
    }
}

fn derive(derived: Derived, fields: &JsonObject, ctx: &FormatContext) -> Option<JsonValue> {
    match derived {
        Derived::FreeFromPrice => fields
            .get("price")
            .and_then(JsonValue::as_f64)
            .map(|price| JsonValue::Bool(price == 0.0)),
        Derived::StoreUrl => fields
            .get("appId")
            .and_then(JsonValue::as_str)
            .map(|id| {
                json!(format!(
                    "{}/store/apps/details?id={}",
                    ctx.base_url.trim_end_matches('/'),
                    urlencoding::encode(id)
                ))
            }),
        Derived::InstallsCount => fields
            .get("installs")
            .and_then(|installs| transforms::apply(Transform::InstallCount, installs, ctx)),
    }
}
