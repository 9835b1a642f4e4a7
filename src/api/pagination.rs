//! Cursor pagination that keeps whatever was gathered before a failure.

use super::types::PaginatedResponse;
use crate::error::AppError;
use std::collections::HashSet;

/// Items gathered by walking a cursor-paginated endpoint.
#[derive(Debug)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
    /// Set when a page could not be fetched; `items` holds everything before it.
    pub interrupted: Option<Interruption>,
}

/// Where and why a pagination walk stopped early.
#[derive(Debug)]
pub struct Interruption {
    /// Cursor of the page that failed (`None` for the first page).
    pub cursor: Option<String>,
    pub error: AppError,
}

impl<T> PaginationResult<T> {
    /// Converts into the full item list, failing if the walk was cut short.
    pub fn into_complete(self) -> Result<Vec<T>, AppError> {
        match self.interrupted {
            None => Ok(self.items),
            Some(interruption) => Err(interruption.error),
        }
    }
}

/// Fetches result pages until the source reports no continuation cursor.
///
/// Items are concatenated in the order received. A failed page ends the
/// walk; the caller decides whether a partial result is acceptable.
pub async fn fetch_all_pages<T, F, Fut>(mut fetch_fn: F) -> PaginationResult<T>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages_fetched = 0u32;
    let mut seen_cursors: HashSet<String> = HashSet::new();

    loop {
        let response = match fetch_fn(cursor.clone()).await {
            Ok(response) => response,
            Err(error) => {
                return PaginationResult {
                    items,
                    pages_fetched,
                    interrupted: Some(Interruption { cursor, error }),
                };
            }
        };

        items.extend(response.results);
        pages_fetched += 1;

        match response.next_cursor {
            Some(next) if response.has_more => {
                if !seen_cursors.insert(next.clone()) {
                    log::warn!("Pagination cursor {} came back; stopping", next);
                    break;
                }
                cursor = Some(next);
            }
            _ => break,
        }
    }

    PaginationResult {
        items,
        pages_fetched,
        interrupted: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn concatenates_pages_in_order() {
        let result = fetch_all_pages(|cursor| async move {
            Ok(match cursor.as_deref() {
                None => PaginatedResponse::with_more(vec![1, 2], "c1"),
                Some("c1") => PaginatedResponse::with_more(vec![3], "c2"),
                _ => PaginatedResponse::last(vec![4, 5]),
            })
        })
        .await;

        assert!(result.interrupted.is_none());
        assert_eq!(result.pages_fetched, 3);
        assert_eq!(result.items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn keeps_items_gathered_before_a_failure() {
        let result = fetch_all_pages(|cursor| async move {
            match cursor.as_deref() {
                None => Ok(PaginatedResponse::with_more(vec!["a", "b"], "c1")),
                _ => Err(AppError::MalformedResponse("boom".to_string())),
            }
        })
        .await;

        assert_eq!(result.items, vec!["a", "b"]);
        let interruption = result.interrupted.expect("walk should be interrupted");
        assert_eq!(interruption.cursor.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn cycling_cursors_stop_the_walk() {
        let result = fetch_all_pages(|cursor| async move {
            Ok(match cursor.as_deref() {
                None => PaginatedResponse::with_more(vec![1], "a"),
                Some("a") => PaginatedResponse::with_more(vec![2], "b"),
                _ => PaginatedResponse::with_more(vec![3], "a"),
            })
        })
        .await;

        assert!(result.interrupted.is_none());
        assert_eq!(result.pages_fetched, 3);
        assert_eq!(result.items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn has_more_without_cursor_stops() {
        let result = fetch_all_pages(|_| async move {
            Ok(PaginatedResponse {
                object: "list".to_string(),
                results: vec![1],
                next_cursor: None,
                has_more: true,
            })
        })
        .await;

        assert_eq!(result.into_complete().unwrap(), vec![1]);
    }
}
