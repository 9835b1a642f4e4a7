// src/config.rs
use crate::constants::{DEFAULT_PAGE_CONCURRENCY, DEFAULT_TAGS_PROPERTY, RETRY_MAX_ATTEMPTS};
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::export::ExportOptions;
use crate::output::{PathBuilder, PathLayout};
use crate::types::{ApiKey, Concurrency, DatabaseId};
use clap::Parser;
use std::path::PathBuf;

/// Parsed and validated command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Notion database URL or ID (e.g., "https://www.notion.so/...")
    pub database: String,

    /// Directory the database folder is written into
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// File layout: 'flat' (<page>.md) or 'nested' (<page>/index.md)
    #[arg(long, default_value_t = PathLayout::Flat)]
    pub layout: PathLayout,

    /// Number of pages exported at once (1-32)
    #[arg(long, default_value_t = DEFAULT_PAGE_CONCURRENCY)]
    pub concurrency: usize,

    /// Multi-select property read as the page tags
    #[arg(long, default_value = DEFAULT_TAGS_PROPERTY)]
    pub tags_property: String,

    /// Attempts per Notion request before giving up (minimum 1)
    #[arg(long, default_value_t = RETRY_MAX_ATTEMPTS)]
    pub max_retries: u32,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved export configuration, validated and ready to build an `Exporter`.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub database_id: DatabaseId,
    pub api_key: ApiKey,
    pub out_dir: PathBuf,
    pub layout: PathLayout,
    pub concurrency: Concurrency,
    pub tags_property: String,
    pub retry: RetryPolicy,
    pub verbose: bool,
}

impl ExportConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let api_key_str = std::env::var("NOTION_API_KEY").map_err(|_| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;

        Self::from_parts(cli, &api_key_str)
    }

    fn from_parts(cli: CommandLineInput, api_key: &str) -> Result<Self, AppError> {
        let api_key = ApiKey::new(api_key)?;
        let database_id = DatabaseId::parse(&cli.database)?;

        let concurrency = Concurrency::clamped(cli.concurrency);
        if concurrency.get() != cli.concurrency {
            log::warn!(
                "Concurrency {} is outside {}..={}; using {}",
                cli.concurrency,
                Concurrency::MIN,
                Concurrency::MAX,
                concurrency.get()
            );
        }

        if cli.tags_property.trim().is_empty() {
            return Err(crate::types::ValidationError::EmptyField("tags property").into());
        }

        Ok(ExportConfig {
            database_id,
            api_key,
            out_dir: cli.out_dir,
            layout: cli.layout,
            concurrency,
            tags_property: cli.tags_property,
            retry: RetryPolicy {
                max_attempts: cli.max_retries.max(1),
                ..RetryPolicy::default()
            },
            verbose: cli.verbose,
        })
    }

    /// Exporter options derived from this configuration.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            concurrency: self.concurrency,
            retry: self.retry,
            tags_property: self.tags_property.clone(),
            paths: PathBuilder::new(self.out_dir.clone(), self.layout),
            cancel: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            database_id: Self::example_database_id(),
            api_key: ApiKey::new("secret_default_key_for_testing_only")
                .expect("Default API key should be valid"),
            out_dir: PathBuf::from("."),
            layout: PathLayout::default(),
            concurrency: Concurrency::default(),
            tags_property: DEFAULT_TAGS_PROPERTY.to_string(),
            retry: RetryPolicy::default(),
            verbose: false,
        }
    }
}

impl ExportConfig {
    /// Returns a valid example DatabaseId for use in tests and defaults.
    fn example_database_id() -> DatabaseId {
        DatabaseId::parse("12345678123456781234567812345678")
            .expect("Example DatabaseId should always be valid")
    }
}
