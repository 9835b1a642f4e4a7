// src/formatting/block_renderer.rs
//! Block rendering engine: converts Notion blocks to markdown.
//!
//! Rendering is split in two: `BlockMarkdownRenderer` walks the block tree
//! of a page through the repository, and `render_blocks` turns the fetched
//! tree into text without any I/O.

use super::rich_text::rich_text_to_markdown;
use crate::api::pagination::fetch_all_pages;
use crate::api::NotionRepository;
use crate::constants::{BLOCK_MAX_RENDER_DEPTH, CHARS_PER_BLOCK_ESTIMATE, INDENT_SPACES};
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::{plain_text, Block, BlockContent, RichTextItem};
use crate::pipeline::MarkdownRenderer;
use crate::types::{BlockId, PageId};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

// --- Fetching ---

/// Renders a page body by fetching its block tree from Notion.
///
/// One instance is shared read-only by every page task of a run.
pub struct BlockMarkdownRenderer {
    repo: Arc<dyn NotionRepository>,
    retry: RetryPolicy,
    max_depth: usize,
}

impl BlockMarkdownRenderer {
    pub fn new(repo: Arc<dyn NotionRepository>, retry: RetryPolicy) -> Self {
        Self {
            repo,
            retry,
            max_depth: BLOCK_MAX_RENDER_DEPTH,
        }
    }

    /// Limits how many levels of children are fetched below the page.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Fetches all children of `parent`, recursing into nested blocks.
    fn fetch_tree(&self, parent: BlockId, depth: usize) -> BoxFuture<'_, Result<Vec<Block>, AppError>> {
        async move {
            let parent_id = &parent;
            let listing = fetch_all_pages(move |cursor| async move {
                retry_with_backoff(&self.retry, "fetch block children", || {
                    self.repo.retrieve_block_children(parent_id, cursor.clone())
                })
                .await
            })
            .await;
            let mut blocks = listing.into_complete()?;

            for block in blocks.iter_mut() {
                if !block.has_children {
                    continue;
                }
                if depth + 1 >= self.max_depth {
                    log::warn!(
                        "Block {} nests deeper than {} levels; its children are left out",
                        block.id,
                        self.max_depth
                    );
                    continue;
                }
                block.children = self.fetch_tree(block.id.clone(), depth + 1).await?;
            }

            Ok(blocks)
        }
        .boxed()
    }
}

#[async_trait::async_trait]
impl MarkdownRenderer for BlockMarkdownRenderer {
    async fn render_body(&self, page_id: &PageId) -> Result<String, AppError> {
        let blocks = self.fetch_tree(page_id.cast(), 0).await?;
        let markdown = render_blocks(&blocks);
        log::debug!(
            "Rendered page {}: {} top-level blocks, {} bytes",
            page_id,
            blocks.len(),
            markdown.len()
        );
        Ok(markdown)
    }
}

// --- Rendering ---

/// Renders a block tree into Markdown.
///
/// The result ends with exactly one newline, or is empty when no block
/// produced any text.
pub fn render_blocks(blocks: &[Block]) -> String {
    let body = render_sequence(blocks);
    if body.is_empty() {
        body
    } else {
        format!("{}\n", body)
    }
}

/// Renders sibling blocks. List items stick together; everything else is
/// separated by a blank line.
fn render_sequence(blocks: &[Block]) -> String {
    let mut output = String::with_capacity(blocks.len() * CHARS_PER_BLOCK_ESTIMATE);
    let mut previous_was_list = false;
    let mut number = 0usize;

    for block in visible_blocks(blocks) {
        number = match block.content {
            BlockContent::NumberedListItem(_) => number + 1,
            _ => 0,
        };

        let rendered = render_block(block, number);
        if rendered.is_empty() {
            continue;
        }

        let is_list_item = block.is_list_item();
        if !output.is_empty() {
            output.push_str(if previous_was_list && is_list_item {
                "\n"
            } else {
                "\n\n"
            });
        }
        output.push_str(&rendered);
        previous_was_list = is_list_item;
    }

    output
}

/// Unsupported blocks (columns, synced blocks, ...) are transparent:
/// their children take their place.
fn visible_blocks(blocks: &[Block]) -> Vec<&Block> {
    let mut visible = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block.content {
            BlockContent::Unsupported { .. } => visible.extend(visible_blocks(&block.children)),
            _ => visible.push(block),
        }
    }
    visible
}

fn render_block(block: &Block, number: usize) -> String {
    let head = render_content(&block.content, number);
    if block.children.is_empty() {
        return head;
    }

    let children = render_sequence(&block.children);
    match (head.is_empty(), children.is_empty()) {
        (_, true) => head,
        (true, false) => indent(&children),
        (false, false) => format!("{}\n{}", head, indent(&children)),
    }
}

fn render_content(content: &BlockContent, number: usize) -> String {
    match content {
        BlockContent::Paragraph(text) | BlockContent::Toggle(text) => rich_text_to_markdown(text),
        BlockContent::Heading1(text) => heading(1, text),
        BlockContent::Heading2(text) => heading(2, text),
        BlockContent::Heading3(text) => heading(3, text),
        BlockContent::BulletedListItem(text) => format!("- {}", rich_text_to_markdown(text)),
        BlockContent::NumberedListItem(text) => {
            format!("{}. {}", number, rich_text_to_markdown(text))
        }
        BlockContent::ToDo { text, checked } => format!(
            "- [{}] {}",
            if *checked { "x" } else { " " },
            rich_text_to_markdown(text)
        ),
        BlockContent::Quote(text) => quote(&rich_text_to_markdown(text)),
        BlockContent::Callout { text, icon } => {
            let text = rich_text_to_markdown(text);
            match icon {
                Some(icon) => quote(&format!("{} {}", icon, text)),
                None => quote(&text),
            }
        }
        BlockContent::Code { text, language } => {
            // Notion's name for "no highlighting"
            let language = if language == "plain text" {
                ""
            } else {
                language.as_str()
            };
            format!("```{}\n{}\n```", language, plain_text(text))
        }
        BlockContent::Equation { expression } => format!("$$\n{}\n$$", expression),
        BlockContent::Divider => "---".to_string(),
        BlockContent::Image { url, caption } => format!("![{}]({})", plain_text(caption), url),
        BlockContent::Bookmark { url, caption } => {
            if url.is_empty() {
                return String::new();
            }
            let label = plain_text(caption);
            let label = if label.is_empty() { url.as_str() } else { label.as_str() };
            format!("[{}]({})", label, url)
        }
        BlockContent::ChildPage { title } => format!("**{}**", title),
        BlockContent::Unsupported { .. } => String::new(),
    }
}

fn heading(level: usize, text: &[RichTextItem]) -> String {
    let text = rich_text_to_markdown(text);
    if text.is_empty() {
        return String::new();
    }
    format!("{} {}", "#".repeat(level), text)
}

fn quote(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent(text: &str) -> String {
    let pad = " ".repeat(INDENT_SPACES);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
