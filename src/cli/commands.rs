//! CLI commands and argument parsing

use crate::types::{Collection, ImageSize, SortOrder};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Google Play scraper CLI
#[derive(Parser, Debug)]
#[command(name = "gplay-scraper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Language code (overrides the config)
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Country code (overrides the config; empty to omit)
    #[arg(long, global = true)]
    pub country: Option<String>,

    /// Proxy URL for both HTTP and HTTPS
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Only print these fields (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Details of one or more apps
    App {
        /// App ids (e.g. com.whatsapp)
        #[arg(required = true)]
        app_ids: Vec<String>,

        /// Image rendition (SMALL, MEDIUM, LARGE, ORIGINAL)
        #[arg(long)]
        image_size: Option<ImageSize>,

        /// Apps fetched concurrently
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },

    /// Search apps by keyword
    Search {
        /// Search query
        query: String,

        /// Number of results
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Reviews of an app
    Reviews {
        /// App id
        app_id: String,

        /// Number of reviews
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Sort order (RELEVANT, NEWEST, RATING)
        #[arg(long)]
        sort: Option<SortOrder>,
    },

    /// Apps of a developer
    Developer {
        /// Numeric developer id or developer name
        dev_id: String,

        /// Number of apps
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Apps similar to an app
    Similar {
        /// App id
        app_id: String,

        /// Number of apps
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Top chart entries
    List {
        /// Collection (TOP_FREE, TOP_PAID, TOP_GROSSING)
        #[arg(long)]
        collection: Option<Collection>,

        /// Category (e.g. GAME, APPLICATION)
        #[arg(long)]
        category: Option<String>,

        /// Number of entries
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Autocomplete suggestions
    Suggest {
        /// Partial search term
        term: String,

        /// Number of suggestions
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Also fetch suggestions for each suggestion
        #[arg(long)]
        nested: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable output
    Pretty,
}
