//! Index-path schema module
//!
//! Static description of where each canonical field lives inside a decoded
//! response tree, per entity kind, plus the page layouts locating item lists
//! and continuation tokens.
//!
//! # Overview
//!
//! - `Segment` / `IndexPath` - how to descend a raw node
//! - `FieldSpec` / `FieldSchema` - canonical field name to path, transform and default
//! - `PageLayout` - where a response's item list and token live

pub mod tables;
mod types;

pub use types::{
    Derived, FieldDefault, FieldSchema, FieldSource, FieldSpec, IndexPath, PageLayout,
    PayloadSource, Segment, Shape, Transform,
};

use crate::types::EntityKind;

/// Field table of an entity kind
pub fn schema_for(kind: EntityKind) -> &'static FieldSchema {
    match kind {
        EntityKind::App => &tables::APP,
        EntityKind::SearchResult => &tables::SEARCH_RESULT,
        EntityKind::Review => &tables::REVIEW,
        EntityKind::DeveloperApp => &tables::DEVELOPER_APP,
        EntityKind::SimilarApp => &tables::SIMILAR_APP,
        EntityKind::ListItem => &tables::LIST_ITEM,
        EntityKind::Suggestion => &tables::SUGGESTION,
    }
}

impl EntityKind {
    /// Field table of this kind
    pub fn schema(self) -> &'static FieldSchema {
        schema_for(self)
    }
}
