//! Domain model for the slice of the Notion API an export touches.
//!
//! Only the fields the exporter reads are modelled; everything else in the
//! API payloads is ignored during deserialization.

mod block;
pub mod properties;
mod rich_text;

pub use block::{Block, BlockContent};
pub use properties::{PropertyValue, SelectOption};
pub use rich_text::{plain_text, Annotations, RichTextItem, RichTextKind};

use crate::types::{DatabaseId, PageId, UserId};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

/// A Notion database as returned by `GET databases/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Database {
    pub id: DatabaseId,
    #[serde(default)]
    pub title: Vec<RichTextItem>,
}

impl Database {
    /// The database title as plain text; used as the category of its pages.
    pub fn display_title(&self) -> String {
        plain_text(&self.title)
    }
}

/// One row of a database query; only its identity matters to the lister.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct PageRef {
    pub id: PageId,
}

impl PageRef {
    pub fn new(id: PageId) -> Self {
        Self { id }
    }
}

/// A Notion page as returned by `GET pages/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub last_edited_time: DateTime<Utc>,
    /// Absent on some payloads; the page then gets an empty author.
    #[serde(default)]
    pub created_by: Option<PartialUser>,
    #[serde(default, deserialize_with = "properties::lenient_properties")]
    pub properties: IndexMap<String, PropertyValue>,
}

impl Page {
    /// Plain text of the page's title property, empty if there is none.
    pub fn title(&self) -> String {
        self.properties
            .values()
            .find_map(|value| match value {
                PropertyValue::Title { title } => Some(plain_text(title)),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Option names of the named multi-select property, in declaration order.
    ///
    /// Returns `None` when the property is missing or is not a multi-select.
    pub fn multi_select(&self, name: &str) -> Option<Vec<String>> {
        match self.properties.get(name)? {
            PropertyValue::MultiSelect { multi_select } => Some(
                multi_select
                    .iter()
                    .map(|option| option.name.clone())
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// A user reference embedded in other objects (`created_by`, `last_edited_by`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PartialUser {
    pub id: UserId,
}

/// A user as returned by `GET users/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE_JSON: &str = r#"{
        "object": "page",
        "id": "216cd412-8533-8087-a989-cf37889137c3",
        "created_time": "2023-01-01T00:00:00.000Z",
        "last_edited_time": "2023-03-04T05:06:07.891Z",
        "created_by": {"object": "user", "id": "5f0d9c1a-0000-4000-8000-000000000001"},
        "last_edited_by": {"object": "user", "id": "5f0d9c1a-0000-4000-8000-000000000001"},
        "parent": {"type": "database_id", "database_id": "a1b2c3d4-e5f6-7890-abcd-ef1234567890"},
        "archived": false,
        "url": "https://www.notion.so/Intro-216cd41285338087a989cf37889137c3",
        "properties": {
            "Tags": {
                "id": "tags",
                "type": "multi_select",
                "multi_select": [
                    {"id": "1", "name": "go", "color": "blue"},
                    {"id": "2", "name": "rust", "color": "orange"}
                ]
            },
            "Score": {"id": "s", "type": "formula", "formula": {"type": "number", "number": 3}},
            "Name": {
                "id": "title",
                "type": "title",
                "title": [
                    {"type": "text", "text": {"content": "In", "link": null}, "plain_text": "In", "href": null,
                     "annotations": {"bold": false, "italic": false, "strikethrough": false, "underline": false, "code": false, "color": "default"}},
                    {"type": "text", "text": {"content": "tro", "link": null}, "plain_text": "tro", "href": null}
                ]
            }
        }
    }"#;

    #[test]
    fn parses_page_fields() {
        let page: Page = serde_json::from_str(PAGE_JSON).unwrap();

        assert_eq!(page.id.as_str(), "216cd41285338087a989cf37889137c3");
        assert_eq!(page.title(), "Intro");
        assert_eq!(
            page.multi_select("Tags"),
            Some(vec!["go".to_string(), "rust".to_string()])
        );
        assert_eq!(page.multi_select("Name"), None);
        assert_eq!(page.multi_select("Missing"), None);
        assert_eq!(page.properties.get("Score"), Some(&PropertyValue::Unsupported));
        assert_eq!(
            page.last_edited_time.to_rfc3339(),
            "2023-03-04T05:06:07.891+00:00"
        );
    }

    #[test]
    fn page_without_title_property_has_empty_title() {
        let page: Page = serde_json::from_str(
            r#"{
                "id": "216cd412-8533-8087-a989-cf37889137c3",
                "last_edited_time": "2023-01-01T00:00:00.000Z",
                "created_by": {"object": "user", "id": "u"},
                "properties": {}
            }"#,
        )
        .unwrap();

        assert_eq!(page.title(), "");
        assert!(page.multi_select("Tags").is_none());
    }

    #[test]
    fn page_without_creator_still_decodes() {
        let page: Page = serde_json::from_str(
            r#"{
                "id": "216cd412-8533-8087-a989-cf37889137c3",
                "last_edited_time": "2023-01-01T00:00:00.000Z",
                "properties": {
                    "Name": {"id": "title", "type": "title", "title": [{"type": "text", "plain_text": "Intro"}]}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(page.created_by, None);
        assert_eq!(page.title(), "Intro");
    }

    #[test]
    fn database_title_is_plain_text() {
        let db: Database = serde_json::from_str(
            r#"{
                "object": "database",
                "id": "a1b2c3d4-e5f6-7890-abcd-ef1234567890",
                "title": [{"type": "text", "plain_text": "Engi"}, {"type": "text", "plain_text": "neering"}]
            }"#,
        )
        .unwrap();

        assert_eq!(db.display_title(), "Engineering");
    }
}
