// src/export/mod.rs
//! The export pipeline: list a database, resolve and render every page,
//! write one Markdown file per page.

mod listing;
mod metadata;
mod orchestrator;
mod report;

pub use listing::{list_pages, DatabaseHandle, DatabaseListing, ListingGap};
pub use metadata::{format_timestamp, MetadataResolver, PageMetadata};
pub use orchestrator::{ExportOptions, Exporter};
pub use report::{ExportReport, RunOutcome, SkippedPage, WrittenPage};
