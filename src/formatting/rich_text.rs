// src/formatting/rich_text.rs
//! Formats Notion rich text runs into inline Markdown.

use crate::model::{Annotations, RichTextItem, RichTextKind};

/// Formats a sequence of rich text runs into Markdown.
pub fn rich_text_to_markdown(items: &[RichTextItem]) -> String {
    items.iter().map(format_item).collect()
}

fn format_item(item: &RichTextItem) -> String {
    if item.plain_text.is_empty() {
        return String::new();
    }

    let styled = match item.kind {
        // Inline equations carry their TeX source as plain text
        RichTextKind::Equation => format!("${}$", item.plain_text),
        _ => apply_styles(&item.plain_text, &item.annotations),
    };

    match &item.href {
        Some(href) if !href.is_empty() => format!("[{}]({})", styled, href),
        _ => styled,
    }
}

/// Applies annotations to a text run.
///
/// Emphasis markers must hug non-whitespace, so leading and trailing
/// whitespace is kept outside the markers.
fn apply_styles(content: &str, annotations: &Annotations) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() || !has_markdown_style(annotations) {
        return content.to_string();
    }

    let start = content.len() - content.trim_start().len();
    let end = start + trimmed.len();
    let (leading, trailing) = (&content[..start], &content[end..]);

    let mut result = trimmed.to_string();
    if annotations.code {
        result = format!("`{}`", result);
    }
    if annotations.strikethrough {
        result = format!("~~{}~~", result);
    }
    if annotations.bold {
        result = format!("**{}**", result);
    }
    if annotations.italic {
        result = format!("_{}_", result);
    }

    format!("{}{}{}", leading, result, trailing)
}

// Underline has no Markdown form and is dropped.
fn has_markdown_style(annotations: &Annotations) -> bool {
    annotations.code || annotations.strikethrough || annotations.bold || annotations.italic
}
