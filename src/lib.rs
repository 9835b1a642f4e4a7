// src/lib.rs
//! notion2markdown library: exports a Notion database into Markdown files
//! with front matter, one file per page.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Export**: `Exporter`, `ExportOptions`, `ExportReport`
//! - **Collaborators**: `NotionRepository`, `MarkdownRenderer`, `PageSink`
//!   and their default implementations
//! - **Error handling**: `AppError`, `PageFailure`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `ExportConfig`
//! - **Domain model**: `Page`, `Database`, `Block`, etc.
//! - **Domain types**: `DatabaseId`, `PageId`, `ApiKey`, etc.

pub mod api;
mod config;
mod constants;
mod error;
mod error_recovery;
mod export;
mod formatting;
mod model;
mod output;
mod pipeline;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, DatabaseFetchFailure, NotionErrorCode, PageFailure};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ExportConfig};
pub use crate::error_recovery::{retry_with_backoff, RetryPolicy};

// --- Domain Model ---
pub use crate::model::{
    plain_text, Annotations, Block, BlockContent, Database, Page, PageRef, PartialUser,
    PropertyValue, RichTextItem, RichTextKind, SelectOption, User,
};

// --- Domain Types ---
pub use crate::types::{
    ApiKey, BlockId, BlockMarker, Concurrency, DatabaseId, DatabaseMarker, Id, PageId,
    PageMarker, UserId, UserMarker,
};

// --- API Client ---
pub use crate::api::pagination::{fetch_all_pages, PaginationResult};
pub use crate::api::types::PaginatedResponse;
pub use crate::api::{NotionHttpClient, NotionRepository};

// --- Pipeline ---
pub use crate::export::{
    format_timestamp, list_pages, DatabaseHandle, DatabaseListing, ExportOptions, ExportReport,
    Exporter, ListingGap, MetadataResolver, PageMetadata, RunOutcome, SkippedPage, WrittenPage,
};
pub use crate::formatting::{
    format_front_matter, render_blocks, rich_text_to_markdown, BlockMarkdownRenderer,
};
pub use crate::output::{FileSink, PathBuilder, PathLayout};
pub use crate::pipeline::{MarkdownRenderer, PageSink, RenderedPage};
