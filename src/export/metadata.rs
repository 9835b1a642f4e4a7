// src/export/metadata.rs
//! Resolves the front-matter fields of a page.
//!
//! The page itself is the only lookup that can fail a page. Everything
//! derived from it (title, author, tags) degrades to an empty value.

use crate::api::NotionRepository;
use crate::constants::{DEFAULT_TAGS_PROPERTY, PUBLISHED_AT_FORMAT};
use crate::error::PageFailure;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::Page;
use crate::types::{PageId, UserId};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// The metadata written into a page's front matter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageMetadata {
    pub title: String,
    pub published_at: String,
    /// Display name of the page's creator; empty when it couldn't be resolved.
    pub author: String,
    pub tags: Vec<String>,
    /// Always the owning database's title.
    pub category: String,
}

/// Builds [`PageMetadata`] from a page and its creator.
pub struct MetadataResolver {
    repo: Arc<dyn NotionRepository>,
    retry: RetryPolicy,
    tags_property: String,
}

impl MetadataResolver {
    pub fn new(repo: Arc<dyn NotionRepository>, retry: RetryPolicy) -> Self {
        Self {
            repo,
            retry,
            tags_property: DEFAULT_TAGS_PROPERTY.to_string(),
        }
    }

    /// Reads tags from another multi-select property.
    pub fn with_tags_property(mut self, name: impl Into<String>) -> Self {
        self.tags_property = name.into();
        self
    }

    pub async fn resolve(
        &self,
        page_id: &PageId,
        category: &str,
    ) -> Result<PageMetadata, PageFailure> {
        let page = retry_with_backoff(&self.retry, "retrieve page", || {
            self.repo.retrieve_page(page_id)
        })
        .await
        .map_err(|e| PageFailure::unavailable(&e))?;

        let author = self.resolve_author(&page).await;

        Ok(PageMetadata {
            title: page.title(),
            published_at: format_timestamp(&page.last_edited_time),
            author,
            tags: page.multi_select(&self.tags_property).unwrap_or_default(),
            category: category.to_string(),
        })
    }

    async fn resolve_author(&self, page: &Page) -> String {
        let Some(creator) = &page.created_by else {
            log::warn!("Page {} has no creator; author left empty", page.id);
            return String::new();
        };
        let user_id: &UserId = &creator.id;
        match retry_with_backoff(&self.retry, "retrieve user", || {
            self.repo.retrieve_user(user_id)
        })
        .await
        {
            Ok(user) => user.name.unwrap_or_else(|| {
                log::warn!("User {} has no name; page {} gets an empty author", user_id, page.id);
                String::new()
            }),
            Err(e) => {
                log::warn!(
                    "Could not resolve author {} of page {}: {}",
                    user_id,
                    page.id,
                    e
                );
                String::new()
            }
        }
    }
}

/// `2023-03-04T05:06:07.891Z` -> `2023-03-04 05:06:07`
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(PUBLISHED_AT_FORMAT).to_string()
}
