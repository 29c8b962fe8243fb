use crate::config::toml_config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::domain::model::{CountryFilter, Query, SchemaMode, YearFilter};
use crate::utils::error::Result;
use clap::Parser;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "alumni-map")]
#[command(about = "Maps alumni from a published spreadsheet, with search and filters")]
pub struct CliConfig {
    /// TOML configuration file (defaults to ./alumni-map.toml when present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Published CSV URL or local CSV file
    #[arg(long)]
    pub source: Option<String>,

    /// Seconds between refreshes
    #[arg(long)]
    pub refresh_interval: Option<u64>,

    /// Sheet layout: auto, english or localized
    #[arg(long)]
    pub schema: Option<SchemaMode>,

    /// Initial search text
    #[arg(long, default_value = "")]
    pub search: String,

    /// Initial year filter
    #[arg(long, default_value = "all")]
    pub year: YearFilter,

    /// Initial country filter
    #[arg(long, default_value = "all")]
    pub country: CountryFilter,

    /// Write the marker layer as GeoJSON after every update
    #[arg(long)]
    pub export: Option<String>,

    /// Write the side panel as static HTML after every update
    #[arg(long)]
    pub html: Option<String>,

    /// Load once, print the result and exit
    #[arg(long)]
    pub once: bool,

    /// Fetch and normalize only, report what would be shown
    #[arg(long)]
    pub dry_run: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// File settings with command-line overrides applied.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                AppConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => AppConfig::default(),
        };

        if let Some(source) = &self.source {
            config.source.url = source.clone();
        }
        if let Some(interval) = self.refresh_interval {
            config.source.refresh_interval_secs = interval;
        }
        if let Some(schema) = self.schema {
            config.source.schema = schema;
        }

        Ok(config)
    }

    pub fn initial_query(&self) -> Query {
        Query::new(self.search.clone(), self.year, self.country.clone())
    }
}
