//! CLI module
//!
//! Command-line interface over the scraper.
//!
//! # Commands
//!
//! - `app` - App details
//! - `search` - Keyword search
//! - `reviews` - App reviews
//! - `developer` - Developer portfolio
//! - `similar` - Similar apps
//! - `list` - Top charts
//! - `suggest` - Autocomplete suggestions

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
