// tests/common/mod.rs
//! In-memory collaborators for driving an export without the network.

#![allow(dead_code)]

use notion2markdown::{
    AppError, Block, BlockId, Database, DatabaseId, MarkdownRenderer, NotionErrorCode,
    NotionRepository, Page, PageId, PageRef, PaginatedResponse, User, UserId,
};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const EDITED_AT: &str = "2023-03-04T05:06:07.891Z";

pub fn not_found(what: &str) -> AppError {
    AppError::NotionService {
        code: NotionErrorCode::ObjectNotFound,
        message: format!("Could not find {}", what),
        status: reqwest::StatusCode::NOT_FOUND,
    }
}

pub fn unavailable() -> AppError {
    AppError::NotionService {
        code: NotionErrorCode::ServiceUnavailable,
        message: "Notion is unavailable".to_string(),
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Builds a page the way the API would return it.
pub fn page(id: &PageId, title: Option<&str>, tags: Option<&[&str]>, author: &UserId) -> Page {
    let mut properties = serde_json::Map::new();
    if let Some(title) = title {
        properties.insert(
            "Name".to_string(),
            json!({"id": "title", "type": "title", "title": [
                {"type": "text", "text": {"content": title}, "plain_text": title}
            ]}),
        );
    }
    if let Some(tags) = tags {
        let options: Vec<_> = tags.iter().map(|name| json!({"name": name})).collect();
        properties.insert(
            "Tags".to_string(),
            json!({"id": "tags", "type": "multi_select", "multi_select": options}),
        );
    }

    serde_json::from_value(json!({
        "object": "page",
        "id": id.to_dashed(),
        "last_edited_time": EDITED_AT,
        "created_by": {"object": "user", "id": author.to_dashed()},
        "properties": properties,
    }))
    .expect("fixture page should decode")
}

pub fn user(id: &UserId, name: &str) -> User {
    serde_json::from_value(json!({"object": "user", "id": id.to_dashed(), "name": name}))
        .expect("fixture user should decode")
}

/// A user whose profile carries no display name.
pub fn nameless_user(id: &UserId) -> User {
    serde_json::from_value(json!({"object": "user", "id": id.to_dashed(), "name": null}))
        .expect("fixture user should decode")
}

/// A Notion workspace held in memory.
#[derive(Default)]
pub struct FakeNotion {
    pub database: Option<Database>,
    /// Query results, one entry per result page.
    pub query_chunks: Vec<Vec<PageRef>>,
    /// Result page index that always fails with a transient error.
    pub failing_chunk: Option<usize>,
    pub pages: HashMap<PageId, Page>,
    pub users: HashMap<UserId, User>,
    pub blocks: HashMap<String, Vec<Block>>,
    pub query_calls: AtomicUsize,
    pub page_calls: AtomicUsize,
}

impl FakeNotion {
    pub fn with_database(id: &DatabaseId, title: &str) -> Self {
        let database = serde_json::from_value(json!({
            "object": "database",
            "id": id.to_dashed(),
            "title": [{"type": "text", "plain_text": title}],
        }))
        .expect("fixture database should decode");
        Self {
            database: Some(database),
            ..Self::default()
        }
    }

    /// Adds a page listed in the last query chunk (creating it if needed).
    pub fn add_page(&mut self, page: Page) {
        if self.query_chunks.is_empty() {
            self.query_chunks.push(Vec::new());
        }
        if let Some(chunk) = self.query_chunks.last_mut() {
            chunk.push(PageRef::new(page.id.clone()));
        }
        self.pages.insert(page.id.clone(), page);
    }

    pub fn add_user(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn listed(&self) -> Vec<PageId> {
        self.query_chunks
            .iter()
            .flatten()
            .map(|page| page.id.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl NotionRepository for FakeNotion {
    async fn retrieve_database(&self, id: &DatabaseId) -> Result<Database, AppError> {
        match &self.database {
            Some(db) if &db.id == id => Ok(db.clone()),
            _ => Err(not_found("database")),
        }
    }

    async fn query_database(
        &self,
        _id: &DatabaseId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<PageRef>, AppError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        let index: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        if self.failing_chunk == Some(index) {
            return Err(unavailable());
        }

        let results = self.query_chunks.get(index).cloned().unwrap_or_default();
        if index + 1 < self.query_chunks.len() {
            Ok(PaginatedResponse::with_more(results, (index + 1).to_string()))
        } else {
            Ok(PaginatedResponse::last(results))
        }
    }

    async fn retrieve_page(&self, id: &PageId) -> Result<Page, AppError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(id).cloned().ok_or_else(|| not_found("page"))
    }

    async fn retrieve_user(&self, id: &UserId) -> Result<User, AppError> {
        self.users.get(id).cloned().ok_or_else(|| not_found("user"))
    }

    async fn retrieve_block_children(
        &self,
        id: &BlockId,
        _cursor: Option<String>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        Ok(PaginatedResponse::last(
            self.blocks.get(id.as_str()).cloned().unwrap_or_default(),
        ))
    }
}

/// Renders canned bodies and records how many renders overlap.
#[derive(Default)]
pub struct FakeRenderer {
    pub bodies: HashMap<PageId, String>,
    pub failing: HashSet<PageId>,
    pub panicking: HashSet<PageId>,
    pub delays: HashMap<PageId, Duration>,
    pub default_delay: Duration,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub calls: Mutex<Vec<PageId>>,
}

impl FakeRenderer {
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl MarkdownRenderer for FakeRenderer {
    async fn render_body(&self, page_id: &PageId) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(page_id.clone());
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .get(page_id)
            .copied()
            .unwrap_or(self.default_delay);
        tokio::time::sleep(delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.panicking.contains(page_id) {
            panic!("renderer blew up on {}", page_id);
        }
        if self.failing.contains(page_id) {
            return Err(AppError::MalformedResponse("unrenderable block".to_string()));
        }
        Ok(self.bodies.get(page_id).cloned().unwrap_or_default())
    }
}

/// Relative paths of every file under `root`, sorted.
pub fn files_under(root: &std::path::Path) -> Vec<std::path::PathBuf> {
    fn walk(dir: &std::path::Path, root: &std::path::Path, out: &mut Vec<std::path::PathBuf>) {
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    walk(&path, root, out);
                } else {
                    out.push(path.strip_prefix(root).unwrap().to_path_buf());
                }
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
