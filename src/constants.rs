//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you the story
//! of how an export runs: how hard it leans on the API, how often it
//! retries, how deep it renders.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips while listing a database.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// The Notion API version sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Base URL of the public Notion API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1/";

/// Per-request timeout for API calls.
pub const NOTION_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Export fan-out
// ---------------------------------------------------------------------------

/// Page tasks allowed to run at once.
///
/// Notion rate-limits integrations to roughly three requests per second on
/// average. Each page task issues at least three requests (page, user,
/// block children), so a small pool keeps bursts short.
pub const DEFAULT_PAGE_CONCURRENCY: usize = 4;

/// Name of the multi-select property read as tags.
pub const DEFAULT_TAGS_PROPERTY: &str = "Tags";

/// Timestamp format written into the `date:` front-matter field.
pub const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Attempts per remote call, including the first one.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubled on every further attempt.
pub const RETRY_INITIAL_DELAY: Duration = Duration::from_millis(500);

/// Upper bound for a single backoff delay.
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(8);

// ---------------------------------------------------------------------------
// Rendering boundaries
// ---------------------------------------------------------------------------

/// Maximum nesting depth when fetching and rendering child blocks.
///
/// Deeply nested toggles and lists beyond this depth are dropped rather
/// than fetched.
pub const BLOCK_MAX_RENDER_DEPTH: usize = 16;

/// Number of spaces per indentation level for nested blocks.
pub const INDENT_SPACES: usize = 4;

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
