//! Capability traits an export is composed from.
//!
//! Each trait describes a single capability, so every stage can be swapped
//! for a fake in tests: rendering a page body and persisting a finished page.

use crate::error::{AppError, PageFailure};
use crate::types::PageId;
use std::path::PathBuf;

/// Converts a page's block tree into Markdown text.
///
/// Implementations are shared read-only across all page tasks of a run.
#[async_trait::async_trait]
pub trait MarkdownRenderer: Send + Sync {
    async fn render_body(&self, page_id: &PageId) -> Result<String, AppError>;
}

/// A finished page: front matter plus body, and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub path: PathBuf,
    pub content: String,
}

/// Persists rendered pages.
#[async_trait::async_trait]
pub trait PageSink: Send + Sync {
    /// Writes the page, replacing any previous version; returns bytes written.
    async fn write(&self, page: &RenderedPage) -> Result<u64, PageFailure>;
}
