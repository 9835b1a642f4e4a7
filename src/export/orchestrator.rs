// src/export/orchestrator.rs
//! Runs an export: lists a database, then processes every page in a
//! bounded pool of tasks.
//!
//! A page task resolves metadata and renders the body concurrently, then
//! writes the combined document. Failures stay inside the task that hit
//! them and end up in the report.

use super::listing::{list_pages, DatabaseHandle};
use super::metadata::MetadataResolver;
use super::report::{ExportReport, SkippedPage, WrittenPage};
use crate::api::NotionRepository;
use crate::constants::DEFAULT_TAGS_PROPERTY;
use crate::error::{AppError, PageFailure};
use crate::error_recovery::RetryPolicy;
use crate::formatting::format_front_matter;
use crate::output::PathBuilder;
use crate::pipeline::{MarkdownRenderer, PageSink, RenderedPage};
use crate::types::{Concurrency, DatabaseId, PageId};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;

/// Tuning knobs of an export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub concurrency: Concurrency,
    pub retry: RetryPolicy,
    pub tags_property: String,
    pub paths: PathBuilder,
    /// Flipping this to `true` stops new pages from starting.
    pub cancel: Option<watch::Receiver<bool>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            concurrency: Concurrency::default(),
            retry: RetryPolicy::default(),
            tags_property: DEFAULT_TAGS_PROPERTY.to_string(),
            paths: PathBuilder::default(),
            cancel: None,
        }
    }
}

/// Exports Notion databases to Markdown files.
pub struct Exporter {
    repo: Arc<dyn NotionRepository>,
    renderer: Arc<dyn MarkdownRenderer>,
    sink: Arc<dyn PageSink>,
    options: ExportOptions,
}

type PageResult = Result<WrittenPage, PageFailure>;

impl Exporter {
    pub fn new(
        repo: Arc<dyn NotionRepository>,
        renderer: Arc<dyn MarkdownRenderer>,
        sink: Arc<dyn PageSink>,
        options: ExportOptions,
    ) -> Self {
        Self {
            repo,
            renderer,
            sink,
            options,
        }
    }

    /// Exports every page of a database.
    ///
    /// Only a database that cannot be listed at all fails the run; page
    /// failures are collected into the report.
    pub async fn export(&self, database_id: &DatabaseId) -> Result<ExportReport, AppError> {
        let start = Instant::now();
        let listing = list_pages(self.repo.as_ref(), database_id, &self.options.retry).await?;
        let total = listing.pages.len();

        let job = Arc::new(PageJob {
            resolver: MetadataResolver::new(self.repo.clone(), self.options.retry)
                .with_tags_property(self.options.tags_property.clone()),
            renderer: self.renderer.clone(),
            sink: self.sink.clone(),
            paths: self.options.paths.clone(),
            database: listing.handle.clone(),
        });

        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.get()));
        let mut tasks: JoinSet<(usize, PageResult)> = JoinSet::new();
        let mut results: Vec<Option<PageResult>> = (0..total).map(|_| None).collect();
        let mut cancelled = Vec::new();

        log::info!(
            "Exporting {} pages with up to {} at a time",
            total,
            self.options.concurrency.get()
        );

        for (index, page) in listing.pages.iter().enumerate() {
            // Waiting here keeps at most `concurrency` page tasks alive
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| AppError::InternalError {
                    message: "page task semaphore closed".to_string(),
                    source: Some(Box::new(e)),
                })?;

            if self.is_cancelled() {
                cancelled.extend(listing.pages[index..].iter().map(|p| p.id.clone()));
                log::warn!(
                    "Export cancelled; {} pages will not be started",
                    cancelled.len()
                );
                break;
            }

            let job = job.clone();
            let page_id = page.id.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let result = AssertUnwindSafe(job.process(&page_id))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| {
                        Err(PageFailure::RenderFailure {
                            cause: format!("page task panicked: {}", panic_message(&*panic)),
                        })
                    });
                (index, result)
            });
        }

        let mut finished = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    finished += 1;
                    log::info!("[{}/{}] page {} done", finished, total, listing.pages[index].id);
                    results[index] = Some(result);
                }
                Err(e) => log::error!("Page task could not be joined: {}", e),
            }
        }

        let started = total - cancelled.len();
        let mut written = Vec::new();
        let mut skipped = Vec::new();
        for (page, result) in listing.pages.iter().zip(results).take(started) {
            let result = result.unwrap_or_else(|| {
                Err(PageFailure::RenderFailure {
                    cause: "page task did not complete".to_string(),
                })
            });
            match result {
                Ok(page) => written.push(page),
                Err(failure) => {
                    log::error!("Skipped page {}: {}", page.id, failure);
                    skipped.push(SkippedPage {
                        page_id: page.id.clone(),
                        failure,
                    });
                }
            }
        }

        let report = ExportReport {
            database: listing.handle,
            listed: total,
            written,
            skipped,
            gap: listing.gap,
            cancelled,
            duration: start.elapsed(),
        };
        log::info!("{}", report.to_string().trim_end());
        Ok(report)
    }

    fn is_cancelled(&self) -> bool {
        self.options
            .cancel
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }
}

/// What every page task shares.
struct PageJob {
    resolver: MetadataResolver,
    renderer: Arc<dyn MarkdownRenderer>,
    sink: Arc<dyn PageSink>,
    paths: PathBuilder,
    database: DatabaseHandle,
}

impl PageJob {
    async fn process(&self, page_id: &PageId) -> PageResult {
        let (metadata, body) = tokio::join!(
            self.resolver.resolve(page_id, &self.database.title),
            self.renderer.render_body(page_id)
        );
        let metadata = metadata?;
        let body = body.map_err(|e| PageFailure::render(&e))?;

        let page = RenderedPage {
            path: self.paths.build_path(&self.database.id, page_id),
            content: format!("{}{}", format_front_matter(&metadata), body),
        };
        let bytes = self.sink.write(&page).await?;

        log::debug!("Wrote page {} ({} bytes) to {}", page_id, bytes, page.path.display());
        Ok(WrittenPage {
            page_id: page_id.clone(),
            path: page.path,
            bytes,
        })
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
