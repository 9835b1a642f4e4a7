// src/export/listing.rs
//! Lists the pages of a database.

use crate::api::pagination::fetch_all_pages;
use crate::api::NotionRepository;
use crate::error::{classify_database_fetch_failure, AppError};
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::PageRef;
use crate::types::DatabaseId;
use std::collections::HashSet;
use std::fmt;

/// A database resolved at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHandle {
    pub id: DatabaseId,
    /// Plain-text title, used as the category of every page.
    pub title: String,
}

/// Pagination stopped before the last page of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingGap {
    pub pages_gathered: usize,
    /// Cursor of the result page that could not be fetched.
    pub cursor: Option<String>,
    pub cause: String,
}

impl fmt::Display for ListingGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "listing stopped after {} pages",
            self.pages_gathered
        )?;
        if let Some(cursor) = &self.cursor {
            write!(f, " at cursor {}", cursor)?;
        }
        write!(f, ": {}", self.cause)
    }
}

/// Everything known about a database's pages after listing it.
#[derive(Debug, Clone)]
pub struct DatabaseListing {
    pub handle: DatabaseHandle,
    /// Pages in the order the API returned them.
    pub pages: Vec<PageRef>,
    pub gap: Option<ListingGap>,
}

/// Resolves a database title and pages through its query results.
///
/// Fails only when nothing usable was obtained: the database itself or
/// the first result page. A failure further in is reported as a gap and
/// the pages gathered so far are kept.
pub async fn list_pages(
    repo: &dyn NotionRepository,
    database_id: &DatabaseId,
    retry: &RetryPolicy,
) -> Result<DatabaseListing, AppError> {
    let database = retry_with_backoff(retry, "retrieve database", || {
        repo.retrieve_database(database_id)
    })
    .await
    .map_err(|e| source_unavailable(database_id, &e))?;

    let handle = DatabaseHandle {
        id: database_id.clone(),
        title: database.display_title(),
    };
    log::debug!("Resolved database {} as '{}'", database_id, handle.title);

    let result = fetch_all_pages(move |cursor| async move {
        retry_with_backoff(retry, "query database", || {
            repo.query_database(database_id, cursor.clone())
        })
        .await
    })
    .await;

    let gap = match result.interrupted {
        None => None,
        Some(interruption) if result.pages_fetched == 0 => {
            return Err(source_unavailable(database_id, &interruption.error));
        }
        Some(interruption) => {
            let gap = ListingGap {
                pages_gathered: result.items.len(),
                cursor: interruption.cursor,
                cause: interruption.error.to_string(),
            };
            log::warn!("Database '{}': {}", handle.title, gap);
            Some(gap)
        }
    };

    let pages = dedupe(result.items);
    log::info!(
        "Listed {} pages in database '{}'{}",
        pages.len(),
        handle.title,
        if gap.is_some() { " (incomplete)" } else { "" }
    );

    Ok(DatabaseListing { handle, pages, gap })
}

/// A row edited while paginating can show up on two result pages.
fn dedupe(pages: Vec<PageRef>) -> Vec<PageRef> {
    let mut seen = HashSet::with_capacity(pages.len());
    pages
        .into_iter()
        .filter(|page| {
            let first = seen.insert(page.id.clone());
            if !first {
                log::debug!("Page {} listed twice; keeping the first", page.id);
            }
            first
        })
        .collect()
}

fn source_unavailable(database_id: &DatabaseId, error: &AppError) -> AppError {
    AppError::SourceUnavailable {
        database_id: database_id.to_string(),
        reason: classify_database_fetch_failure(error),
    }
}
