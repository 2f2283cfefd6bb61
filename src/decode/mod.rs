//! Response decoder module
//!
//! Supports: HTML pages with embedded data blocks, batch-execute RPC bodies
//!
//! # Overview
//!
//! The decode module walks generic nested array trees by index path,
//! tolerating absent branches. HTML pages are decoded in two stages: the
//! embedded `ds:N` block is located and parsed as an array literal, then the
//! same indexing applies.

mod decoders;
mod types;

pub use decoders::{
    extract_dataset, extract_datasets, matches_shape, parse_array_literal, parse_batch_response,
    walk, walk_items, walk_str, LayoutDecoder,
};
pub use types::{DecodedPage, RawNode, RecordDecoder};
