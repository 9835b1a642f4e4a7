//! Notion API interaction: the ability to retrieve content from a workspace.
//!
//! This module provides a data-oriented interface to the Notion API,
//! with clear separation between I/O operations, parsing, and business logic.

pub mod client;
pub mod pagination;
pub mod parser;
pub mod types;

use crate::error::AppError;
use crate::model::{Block, Database, Page, PageRef, User};
use crate::types::{BlockId, DatabaseId, PageId, UserId};
use types::PaginatedResponse;

/// The ability to retrieve content from a Notion workspace.
///
/// This is the fundamental algebra for API interaction. The exporter and
/// the renderer depend on this trait, never on HTTP details, so a run can
/// be driven by an in-memory fake just as well as by the real API.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    async fn retrieve_database(&self, id: &DatabaseId) -> Result<Database, AppError>;

    /// Fetches one page of a database query, starting at `cursor`.
    async fn query_database(
        &self,
        id: &DatabaseId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<PageRef>, AppError>;

    async fn retrieve_page(&self, id: &PageId) -> Result<Page, AppError>;

    async fn retrieve_user(&self, id: &UserId) -> Result<User, AppError>;

    /// Fetches one page of a block's direct children, starting at `cursor`.
    async fn retrieve_block_children(
        &self,
        id: &BlockId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Block>, AppError>;
}

// Re-export the public interface
pub use client::NotionHttpClient;
