//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ScraperConfig;
use crate::engine::Scraper;
use crate::error::Result;
use crate::format::Record;
use crate::http::ProxyConfig;
use crate::types::Locale;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// CLI runner
pub struct Runner {
    cli: Cli,
    config: ScraperConfig,
}

impl Runner {
    /// Create a runner, loading the config file and applying flag overrides
    pub fn new(cli: Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => ScraperConfig::from_yaml_file(path)?,
            None => ScraperConfig::default(),
        };

        if let Some(lang) = &cli.lang {
            config.locale.lang.clone_from(lang);
        }
        if let Some(country) = &cli.country {
            config.locale.country = Some(country.clone()).filter(|c| !c.is_empty());
        }
        if let Some(proxy) = &cli.proxy {
            config.proxy = Some(ProxyConfig::all(proxy.clone()));
        }
        if cli.verbose {
            config.log_level = "debug".to_string();
        }
        config.validate()?;

        Ok(Self { cli, config })
    }

    /// Log filter for the subscriber
    pub fn log_level(&self) -> &str {
        &self.config.log_level
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let scraper = Scraper::from_config(self.config.clone())?;
        let defaults = &self.config.defaults;
        let locale = &self.config.locale;

        match &self.cli.command {
            Commands::App {
                app_ids,
                image_size,
                concurrency,
            } => {
                if let [app_id] = app_ids.as_slice() {
                    let record = scraper.app(app_id, locale, *image_size).await?;
                    return self.output_record(&record);
                }
                for (app_id, result) in app_ids
                    .iter()
                    .zip(scraper.apps(app_ids, locale, *concurrency).await)
                {
                    match result {
                        Ok(record) => self.output_record(&record)?,
                        Err(e) => warn!("Skipping '{app_id}': {e}"),
                    }
                }
            }
            Commands::Search { query, count } => {
                let count = count.unwrap_or(defaults.search_count);
                self.output_records(&scraper.search(query, count, locale).await?)?;
            }
            Commands::Reviews {
                app_id,
                count,
                sort,
            } => {
                let count = count.unwrap_or(defaults.reviews_count);
                let sort = sort.unwrap_or(defaults.reviews_sort);
                self.output_records(&scraper.reviews(app_id, count, locale, sort).await?)?;
            }
            Commands::Developer { dev_id, count } => {
                let count = count.unwrap_or(defaults.developer_count);
                self.output_records(&scraper.developer(dev_id, count, locale).await?)?;
            }
            Commands::Similar { app_id, count } => {
                let count = count.unwrap_or(defaults.similar_count);
                self.output_records(&scraper.similar(app_id, count, locale).await?)?;
            }
            Commands::List {
                collection,
                category,
                count,
            } => {
                let collection = collection.unwrap_or(defaults.list_collection);
                let category = category.as_deref().unwrap_or(defaults.list_category.as_str());
                let count = count.unwrap_or(defaults.list_count);
                self.output_records(
                    &scraper
                        .top_chart(collection, category, count, locale)
                        .await?,
                )?;
            }
            Commands::Suggest {
                term,
                count,
                nested,
            } => {
                let count = count.unwrap_or(defaults.suggest_count);
                if *nested {
                    for entry in scraper.suggest_nested(term, count, locale).await? {
                        self.output(&entry)?;
                    }
                } else {
                    self.output_records(&scraper.suggest(term, count, locale).await?)?;
                }
            }
        }

        Ok(())
    }

    /// Locale requests are sent with
    pub fn locale(&self) -> &Locale {
        &self.config.locale
    }

    fn output_records(&self, records: &[Record]) -> Result<()> {
        for record in records {
            self.output_record(record)?;
        }
        Ok(())
    }

    fn output_record(&self, record: &Record) -> Result<()> {
        if self.cli.fields.is_empty() {
            self.output(record)
        } else {
            self.output(&Value::Object(record.project(&self.cli.fields)))
        }
    }

    /// Output one value
    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", self.render(value)?);
        Ok(())
    }

    /// Serialize one value in the selected format
    fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        Ok(line)
    }
}
