//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! `AppError` covers everything that can go wrong talking to Notion or
//! the filesystem; `PageFailure` is the narrower vocabulary for why a
//! single page was skipped during an export.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`,
/// the domain vocabulary is encoded in the type system so retry and
/// classification logic can pattern-match on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded; back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError => true,
            Self::HttpStatus(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound | Self::HttpStatus(404))
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Database {database_id} is unavailable: {reason}")]
    SourceUnavailable {
        database_id: String,
        reason: DatabaseFetchFailure,
    },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Whether the failed call is worth repeating.
    ///
    /// Transport failures and throttling are transient; anything Notion
    /// rejected on its merits (not found, unauthorized, bad request) is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkFailure(e) => !e.is_builder() && !e.is_decode(),
            AppError::NotionService { code, status, .. } => {
                code.is_retryable()
                    || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || status.is_server_error()
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::MissingConfiguration(format!("Invalid API base URL: {}", err))
    }
}

/// Domain vocabulary for why a database could not be resolved.
///
/// This is not an error type; it's a classification of the failure reason,
/// so the user gets a clear message for linked databases or missing
/// permissions instead of a raw API error.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseFetchFailure {
    /// The database is a linked database (Notion API limitation).
    LinkedDatabase,
    /// The integration lacks permission to access this database.
    PermissionDenied { reason: String },
    /// The database was not found (or is not shared with the integration).
    NotFound,
    /// Some other failure occurred.
    Other { cause: String },
}

impl fmt::Display for DatabaseFetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkedDatabase => write!(
                f,
                "linked database (Notion API does not support retrieving linked databases)"
            ),
            Self::PermissionDenied { reason } => write!(f, "permission denied: {}", reason),
            Self::NotFound => write!(
                f,
                "database not found (is it shared with the integration?)"
            ),
            Self::Other { cause } => write!(f, "{}", cause),
        }
    }
}

/// Classifies a database fetch error into a domain-specific failure reason.
pub fn classify_database_fetch_failure(error: &AppError) -> DatabaseFetchFailure {
    match error {
        AppError::NotionService { code, message, .. } => {
            if message.contains("linked database") {
                DatabaseFetchFailure::LinkedDatabase
            } else if code.is_not_found() {
                DatabaseFetchFailure::NotFound
            } else if matches!(
                code,
                NotionErrorCode::RestrictedResource | NotionErrorCode::Unauthorized
            ) {
                DatabaseFetchFailure::PermissionDenied {
                    reason: message.clone(),
                }
            } else {
                DatabaseFetchFailure::Other {
                    cause: error.to_string(),
                }
            }
        }
        _ => DatabaseFetchFailure::Other {
            cause: error.to_string(),
        },
    }
}

/// Why a single page was skipped during an export.
///
/// Page failures never escape the page's task; they are collected into
/// the export report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageFailure {
    #[error("page unavailable: {cause}")]
    PageUnavailable { cause: String },

    #[error("rendering failed: {cause}")]
    RenderFailure { cause: String },

    #[error("could not write {}: {cause}", path.display())]
    WriteFailure { path: PathBuf, cause: String },
}

impl PageFailure {
    /// Short, stable name of the failure kind for summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            PageFailure::PageUnavailable { .. } => "PageUnavailable",
            PageFailure::RenderFailure { .. } => "RenderFailure",
            PageFailure::WriteFailure { .. } => "WriteFailure",
        }
    }

    pub fn unavailable(error: &AppError) -> Self {
        PageFailure::PageUnavailable {
            cause: error.to_string(),
        }
    }

    pub fn render(error: &AppError) -> Self {
        PageFailure::RenderFailure {
            cause: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_error(code: &str, status: u16, message: &str) -> AppError {
        AppError::NotionService {
            code: NotionErrorCode::from_api_response(code),
            message: message.to_string(),
            status: reqwest::StatusCode::from_u16(status).unwrap(),
        }
    }

    #[test]
    fn retryable_classification() {
        assert!(service_error("rate_limited", 429, "slow down").is_retryable());
        assert!(service_error("service_unavailable", 503, "down").is_retryable());
        assert!(service_error("something_new", 502, "bad gateway").is_retryable());
        assert!(!service_error("object_not_found", 404, "missing").is_retryable());
        assert!(!service_error("unauthorized", 401, "bad token").is_retryable());
        assert!(!AppError::MalformedResponse("oops".into()).is_retryable());
    }

    #[test]
    fn classifies_database_failures() {
        let linked = service_error(
            "validation_error",
            400,
            "Database with ID x is a linked database.",
        );
        assert_eq!(
            classify_database_fetch_failure(&linked),
            DatabaseFetchFailure::LinkedDatabase
        );

        let missing = service_error("object_not_found", 404, "Could not find database");
        assert_eq!(
            classify_database_fetch_failure(&missing),
            DatabaseFetchFailure::NotFound
        );

        let denied = service_error("restricted_resource", 403, "no access");
        assert_eq!(
            classify_database_fetch_failure(&denied),
            DatabaseFetchFailure::PermissionDenied {
                reason: "no access".to_string()
            }
        );
    }

    #[test]
    fn page_failure_kinds() {
        let failure = PageFailure::WriteFailure {
            path: PathBuf::from("out/a.md"),
            cause: "disk full".to_string(),
        };
        assert_eq!(failure.kind(), "WriteFailure");
        assert_eq!(failure.to_string(), "could not write out/a.md: disk full");
    }
}
