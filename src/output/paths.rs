//! Pure functions for output path calculation.
//!
//! This module decides where each exported page lands without
//! performing any I/O operations.

use crate::types::{DatabaseId, PageId};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How a page file is laid out under its database directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathLayout {
    /// `<databaseId>/<pageId>.md`
    #[default]
    Flat,
    /// `<databaseId>/<pageId>/index.md`
    Nested,
}

impl FromStr for PathLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(PathLayout::Flat),
            "nested" => Ok(PathLayout::Nested),
            other => Err(format!(
                "unknown layout '{}' (expected 'flat' or 'nested')",
                other
            )),
        }
    }
}

impl fmt::Display for PathLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathLayout::Flat => write!(f, "flat"),
            PathLayout::Nested => write!(f, "nested"),
        }
    }
}

/// Derives the on-disk location of each exported page.
///
/// The path is a pure function of the database and page IDs: it does not
/// depend on titles, listing order, or what other pages produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBuilder {
    root: PathBuf,
    layout: PathLayout,
}

impl PathBuilder {
    pub fn new(root: impl Into<PathBuf>, layout: PathLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> PathLayout {
        self.layout
    }

    /// Directory that holds every page of a database.
    pub fn database_dir(&self, database_id: &DatabaseId) -> PathBuf {
        self.root
            .join(sanitize_component(&database_id.to_dashed()))
    }

    /// Output file for a page.
    pub fn build_path(&self, database_id: &DatabaseId, page_id: &PageId) -> PathBuf {
        let page = sanitize_component(&page_id.to_dashed());
        let dir = self.database_dir(database_id);
        match self.layout {
            PathLayout::Flat => dir.join(format!("{}.md", page)),
            PathLayout::Nested => dir.join(page).join("index.md"),
        }
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new(".", PathLayout::default())
    }
}

/// Makes an ID safe to use as a single path component.
///
/// Notion IDs are hex and pass through unchanged; anything else has
/// separators and reserved characters replaced so it can't escape the
/// output root.
pub fn sanitize_component(name: &str) -> String {
    let safe_name = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>();

    // Trim whitespace and dots so "." and ".." can't survive
    let safe_name = safe_name.trim().trim_matches('.');

    if safe_name.is_empty() {
        "unnamed".to_string()
    } else {
        safe_name.to_string()
    }
}
