//! HTTP client for the Notion API.
//!
//! A thin wrapper around reqwest that handles authentication and the
//! request/response round-trip, then hands bodies to the parser. It is
//! built once per run and shared by every page task.

use super::parser::parse_api_response;
use super::types::{ApiResponse, PaginatedResponse};
use crate::constants::{
    NOTION_API_BASE_URL, NOTION_API_PAGE_SIZE, NOTION_API_VERSION, NOTION_REQUEST_TIMEOUT,
};
use crate::error::AppError;
use crate::model::{Block, Database, Page, PageRef, User};
use crate::types::{ApiKey, BlockId, DatabaseId, PageId, UserId};
use reqwest::{header, Client, Response};
use serde::Serialize;
use url::Url;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: Url,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL)
    }

    /// Creates a client against another API root, e.g. a local mock server.
    pub fn with_base_url(api_key: &ApiKey, base_url: &str) -> Result<Self, AppError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .timeout(NOTION_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        let mut auth_value = header::HeaderValue::from_str(&auth_header).map_err(|e| {
            AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
        })?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn url(&self, endpoint: &str) -> Result<Url, AppError> {
        Ok(self.base_url.join(endpoint)?)
    }

    /// Makes a GET request to the specified endpoint (path relative to the API root).
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = self.url(endpoint)?;
        log::debug!("GET {}", url);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = self.url(endpoint)?;
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }
}

#[async_trait::async_trait]
impl super::NotionRepository for NotionHttpClient {
    async fn retrieve_database(&self, id: &DatabaseId) -> Result<Database, AppError> {
        let endpoint = format!("databases/{}", id.to_dashed());
        let response = self.get(&endpoint, &[]).await?;
        parse_api_response(extract_response_text(response).await?)
    }

    async fn query_database(
        &self,
        id: &DatabaseId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<PageRef>, AppError> {
        let endpoint = format!("databases/{}/query", id.to_dashed());
        let mut query = serde_json::json!({ "page_size": NOTION_API_PAGE_SIZE });
        if let Some(cursor) = cursor {
            query["start_cursor"] = serde_json::json!(cursor);
        }
        let response = self.post(&endpoint, &query).await?;
        parse_api_response(extract_response_text(response).await?)
    }

    async fn retrieve_page(&self, id: &PageId) -> Result<Page, AppError> {
        let endpoint = format!("pages/{}", id.to_dashed());
        let response = self.get(&endpoint, &[]).await?;
        parse_api_response(extract_response_text(response).await?)
    }

    async fn retrieve_user(&self, id: &UserId) -> Result<User, AppError> {
        let endpoint = format!("users/{}", id.to_dashed());
        let response = self.get(&endpoint, &[]).await?;
        parse_api_response(extract_response_text(response).await?)
    }

    async fn retrieve_block_children(
        &self,
        id: &BlockId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", id.to_dashed());
        let mut query = vec![("page_size", NOTION_API_PAGE_SIZE.to_string())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor));
        }
        let response = self.get(&endpoint, &query).await?;
        parse_api_response(extract_response_text(response).await?)
    }
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
