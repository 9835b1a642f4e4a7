use super::RichTextItem;
use crate::types::BlockId;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A content block of a page, with its children once they have been fetched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    pub has_children: bool,
    pub children: Vec<Block>,
    pub content: BlockContent,
}

impl Block {
    /// Creates a childless block, mostly useful when building fixtures.
    pub fn new(content: BlockContent) -> Self {
        Self {
            id: BlockId::new_v4(),
            has_children: false,
            children: Vec::new(),
            content,
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }

    pub fn is_list_item(&self) -> bool {
        matches!(
            self.content,
            BlockContent::BulletedListItem(_)
                | BlockContent::NumberedListItem(_)
                | BlockContent::ToDo { .. }
        )
    }
}

/// Typed payload of a block. Block types the renderer has no Markdown
/// equivalent for decode as `Unsupported`.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Paragraph(Vec<RichTextItem>),
    Heading1(Vec<RichTextItem>),
    Heading2(Vec<RichTextItem>),
    Heading3(Vec<RichTextItem>),
    BulletedListItem(Vec<RichTextItem>),
    NumberedListItem(Vec<RichTextItem>),
    ToDo {
        text: Vec<RichTextItem>,
        checked: bool,
    },
    Toggle(Vec<RichTextItem>),
    Quote(Vec<RichTextItem>),
    Callout {
        text: Vec<RichTextItem>,
        icon: Option<String>,
    },
    Code {
        text: Vec<RichTextItem>,
        language: String,
    },
    Equation {
        expression: String,
    },
    Divider,
    Image {
        url: String,
        caption: Vec<RichTextItem>,
    },
    Bookmark {
        url: String,
        caption: Vec<RichTextItem>,
    },
    ChildPage {
        title: String,
    },
    Unsupported {
        block_type: String,
    },
}

// --- Wire format ---

/// A block exactly as the API sends it: the payload lives under a key
/// named after the block type.
#[derive(Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

#[derive(Deserialize)]
struct TextPayload {
    #[serde(default)]
    rich_text: Vec<RichTextItem>,
}

#[derive(Deserialize)]
struct ToDoPayload {
    #[serde(default)]
    rich_text: Vec<RichTextItem>,
    #[serde(default)]
    checked: bool,
}

#[derive(Deserialize)]
struct CalloutPayload {
    #[serde(default)]
    rich_text: Vec<RichTextItem>,
    #[serde(default)]
    icon: Option<IconPayload>,
}

#[derive(Deserialize)]
struct IconPayload {
    #[serde(default)]
    emoji: Option<String>,
}

#[derive(Deserialize)]
struct CodePayload {
    #[serde(default)]
    rich_text: Vec<RichTextItem>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Deserialize)]
struct EquationPayload {
    expression: String,
}

#[derive(Deserialize)]
struct FilePayload {
    #[serde(default)]
    external: Option<UrlPayload>,
    #[serde(default)]
    file: Option<UrlPayload>,
    #[serde(default)]
    caption: Vec<RichTextItem>,
}

#[derive(Deserialize)]
struct UrlPayload {
    url: String,
}

#[derive(Deserialize)]
struct BookmarkPayload {
    #[serde(default)]
    url: String,
    #[serde(default)]
    caption: Vec<RichTextItem>,
}

#[derive(Deserialize)]
struct ChildPagePayload {
    #[serde(default)]
    title: String,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        let content = decode_content(&raw.block_type, raw.payload.get(&raw.block_type))
            .unwrap_or_else(|| {
                log::debug!(
                    "Block {} of type '{}' has no Markdown form; skipping its content",
                    raw.id,
                    raw.block_type
                );
                BlockContent::Unsupported {
                    block_type: raw.block_type.clone(),
                }
            });

        Block {
            id: raw.id,
            has_children: raw.has_children,
            children: Vec::new(),
            content,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: Option<&Value>) -> Option<T> {
    payload.and_then(|value| serde_json::from_value(value.clone()).ok())
}

fn text(payload: Option<&Value>) -> Option<Vec<RichTextItem>> {
    decode::<TextPayload>(payload).map(|p| p.rich_text)
}

fn decode_content(block_type: &str, payload: Option<&Value>) -> Option<BlockContent> {
    let content = match block_type {
        "paragraph" => BlockContent::Paragraph(text(payload)?),
        "heading_1" => BlockContent::Heading1(text(payload)?),
        "heading_2" => BlockContent::Heading2(text(payload)?),
        "heading_3" => BlockContent::Heading3(text(payload)?),
        "bulleted_list_item" => BlockContent::BulletedListItem(text(payload)?),
        "numbered_list_item" => BlockContent::NumberedListItem(text(payload)?),
        "toggle" => BlockContent::Toggle(text(payload)?),
        "quote" => BlockContent::Quote(text(payload)?),
        "to_do" => {
            let p: ToDoPayload = decode(payload)?;
            BlockContent::ToDo {
                text: p.rich_text,
                checked: p.checked,
            }
        }
        "callout" => {
            let p: CalloutPayload = decode(payload)?;
            BlockContent::Callout {
                text: p.rich_text,
                icon: p.icon.and_then(|icon| icon.emoji),
            }
        }
        "code" => {
            let p: CodePayload = decode(payload)?;
            BlockContent::Code {
                text: p.rich_text,
                language: p.language.unwrap_or_default(),
            }
        }
        "equation" => {
            let p: EquationPayload = decode(payload)?;
            BlockContent::Equation {
                expression: p.expression,
            }
        }
        "divider" => BlockContent::Divider,
        "image" => {
            let p: FilePayload = decode(payload)?;
            BlockContent::Image {
                url: p.external.or(p.file)?.url,
                caption: p.caption,
            }
        }
        "bookmark" | "embed" | "link_preview" => {
            let p: BookmarkPayload = decode(payload)?;
            BlockContent::Bookmark {
                url: p.url,
                caption: p.caption,
            }
        }
        "child_page" => {
            let p: ChildPagePayload = decode(payload)?;
            BlockContent::ChildPage { title: p.title }
        }
        _ => return None,
    };

    Some(content)
}
