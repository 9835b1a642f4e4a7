// src/formatting/mod.rs
//! Renders Notion data structures into Markdown: page bodies from block
//! trees, and front matter from page metadata.

pub mod block_renderer;
mod front_matter;
mod rich_text;

pub use block_renderer::{render_blocks, BlockMarkdownRenderer};
pub use front_matter::format_front_matter;
pub use rich_text::rich_text_to_markdown;
