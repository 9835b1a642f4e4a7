// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2markdown::{
    BlockMarkdownRenderer, CommandLineInput, ExportConfig, ExportReport, Exporter, FileSink,
    NotionHttpClient, NotionRepository, RunOutcome,
};
use std::fs;
use std::sync::Arc;
use tokio::sync::watch;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion2markdown.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // stdout carries the summary; diagnostics go to stderr
    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {T} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("stderr", Box::new(stderr_appender)),
        )
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Stops new pages from starting once Ctrl+C is pressed.
fn cancel_on_ctrl_c() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted; finishing pages already in progress");
            let _ = tx.send(true);
        }
    });
    rx
}

/// Builds the exporter from its real collaborators and runs it.
async fn run_export(config: &ExportConfig) -> anyhow::Result<ExportReport> {
    let client = NotionHttpClient::new(&config.api_key).context("could not create Notion client")?;
    let repo: Arc<dyn NotionRepository> = Arc::new(client);
    let renderer = Arc::new(BlockMarkdownRenderer::new(repo.clone(), config.retry));

    let mut options = config.export_options();
    options.cancel = Some(cancel_on_ctrl_c());

    let exporter = Exporter::new(repo, renderer, Arc::new(FileSink::new()), options);
    let report = exporter
        .export(&config.database_id)
        .await
        .with_context(|| format!("export of database {} failed", config.database_id))?;
    Ok(report)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("could not set up logging: {}", e))?;

    let config = ExportConfig::resolve(cli)?;
    log::debug!("Resolved configuration: {:?}", config);

    let report = run_export(&config).await?;
    print!("{}", report);

    if report.outcome() == RunOutcome::CompletedWithSkips {
        eprintln!(
            "⚠️  {} pages skipped, {} not started. See the log for details.",
            report.skipped.len(),
            report.cancelled.len()
        );
    }

    Ok(())
}
