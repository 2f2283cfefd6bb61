//! Record and formatting context types

use crate::request::DEFAULT_BASE_URL;
use crate::types::{EntityKind, ImageSize, JsonObject, JsonValue};
use serde::ser::{Serialize, Serializer};

/// Options applied while formatting records
#[derive(Debug, Clone)]
pub struct FormatContext {
    /// Rendition appended to image URLs; `None` keeps them as served
    pub image_size: Option<ImageSize>,
    /// Host used for derived store URLs and relative links
    pub base_url: String,
}

impl Default for FormatContext {
    fn default() -> Self {
        Self {
            image_size: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl FormatContext {
    /// Context with a specific image size
    #[must_use]
    pub fn with_image_size(mut self, size: Option<ImageSize>) -> Self {
        self.image_size = size;
        self
    }
}

/// One canonical entity: every schema field of its kind, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: EntityKind,
    fields: JsonObject,
}

impl Record {
    pub(crate) fn new(kind: EntityKind, fields: JsonObject) -> Self {
        Self { kind, fields }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Value of one field; `None` only for names outside the schema
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    /// String value of a field
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(JsonValue::as_str)
    }

    /// Subset of fields in the requested order; unknown names map to null
    pub fn project<S: AsRef<str>>(&self, fields: &[S]) -> JsonObject {
        fields
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let value = self.fields.get(name).cloned().unwrap_or(JsonValue::Null);
                (name.to_string(), value)
            })
            .collect()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &JsonObject {
        &self.fields
    }

    pub fn into_fields(self) -> JsonObject {
        self.fields
    }

    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.fields)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
