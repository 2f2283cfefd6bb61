// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # gplay-scraper
//!
//! Protocol decoding and pagination engine for the Google Play Store's
//! internal endpoints.
//!
//! ## Features
//!
//! - **Request Building**: Positional-array batch-execute envelopes and HTML page URLs
//! - **Response Decoding**: Embedded `ds:N` data blocks and `wrb.fr` RPC payloads
//! - **Static Schemas**: One index-path table per entity kind
//! - **Pagination**: Token-driven rounds until a requested count is reached
//! - **Locale Fallback**: One retry without the country when a page fails
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gplay_scraper::{Locale, Result, Scraper, SortOrder};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = Scraper::new()?;
//!     let locale = Locale::new("en", "us");
//!
//!     let app = scraper.app("com.whatsapp", &locale, None).await?;
//!     println!("{}", app.get_str("title").unwrap_or_default());
//!
//!     let reviews = scraper
//!         .reviews("com.whatsapp", 250, &locale, SortOrder::Newest)
//!         .await?;
//!     println!("{} reviews", reviews.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    Scraper (retrieval surface)                   │
//! │  app  search  reviews  developer  similar  top_chart  suggest    │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌──────────┬───────────┬────────┴───────┬────────────┬────────────┐
//! │ Request  │ Transport │    Decode      │   Format   │  Paginate  │
//! ├──────────┼───────────┼────────────────┼────────────┼────────────┤
//! │ Envelope │ reqwest   │ ds:N blocks    │ Schemas    │ Tokens     │
//! │ Locale   │ Rate Limit│ wrb.fr payload │ Transforms │ Cycle guard│
//! │ Endpoints│ Proxy     │ Index paths    │ Projection │            │
//! └──────────┴───────────┴────────────────┴────────────┴────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

/// Build an index path of plain positions
macro_rules! path {
    ($($i:expr),* $(,)?) => {
        &[$($crate::schema::Segment::Index($i)),*]
    };
}

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Index-path schemas per entity kind
pub mod schema;

/// Response decoders (HTML data blocks, batch-execute)
pub mod decode;

/// Request payloads and endpoints
pub mod request;

/// HTTP transport with rate limiting and proxy support
pub mod http;

/// Canonical record formatting
pub mod format;

/// Token pagination
pub mod pagination;

/// Per-entity retrieval
pub mod engine;

/// Scraper configuration
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ScraperConfig;
pub use engine::{NestedSuggestion, Query, Scraper};
pub use error::{Error, Result};
pub use format::{FormatContext, Record};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
