//! Field formatter module
//!
//! Turns raw nodes into canonical records using the per-kind schemas, and
//! offers field projection over the result.

mod formatter;
mod transforms;
mod types;

pub use formatter::{format, format_all};
pub use transforms::{html_text, micros_to_amount, parse_install_count, sized_image, timestamp};
pub use types::{FormatContext, Record};
