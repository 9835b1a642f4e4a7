// src/formatting/front_matter.rs
//! Serializes page metadata into the YAML-style header of an exported page.

use crate::export::PageMetadata;
use std::fmt::Write;

/// Formats the front-matter block, including both `---` fences.
///
/// Values are written verbatim. A quote or newline inside a title breaks
/// the YAML; callers get exactly what Notion returned.
pub fn format_front_matter(metadata: &PageMetadata) -> String {
    let mut out = String::with_capacity(128);
    // Writing into a String cannot fail
    let _ = writeln!(out, "---");
    let _ = writeln!(out, "title: '{}'", metadata.title);
    let _ = writeln!(out, "date: '{}'", metadata.published_at);
    let _ = writeln!(out, "author: '{}'", metadata.author);
    let _ = writeln!(out, "tags: {}", metadata.tags.join(" "));
    let _ = writeln!(out, "categories: '{}'", metadata.category);
    let _ = writeln!(out, "---");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_metadata() {
        let metadata = PageMetadata {
            title: "Intro".to_string(),
            published_at: "2023-03-04 05:06:07".to_string(),
            author: "Alice".to_string(),
            tags: vec!["go".to_string(), "rust".to_string()],
            category: "Engineering".to_string(),
        };
        insta::assert_snapshot!(format_front_matter(&metadata), @r"
        ---
        title: 'Intro'
        date: '2023-03-04 05:06:07'
        author: 'Alice'
        tags: go rust
        categories: 'Engineering'
        ---
        ");
    }

    #[test]
    fn empty_fields_keep_every_line() {
        let metadata = PageMetadata {
            published_at: "2023-01-01 00:00:00".to_string(),
            category: "Engineering".to_string(),
            ..PageMetadata::default()
        };
        assert_eq!(
            format_front_matter(&metadata),
            "---\ntitle: ''\ndate: '2023-01-01 00:00:00'\nauthor: ''\ntags: \ncategories: 'Engineering'\n---\n"
        );
    }

    #[test]
    fn is_deterministic() {
        let metadata = PageMetadata {
            title: "Same".to_string(),
            tags: vec!["a".to_string()],
            ..PageMetadata::default()
        };
        assert_eq!(format_front_matter(&metadata), format_front_matter(&metadata));
    }
}
