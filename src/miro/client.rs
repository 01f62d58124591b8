//! Miro REST v2 client.
//!
//! Thin HTTP wrapper over the board endpoints the pipeline needs. No retries:
//! callers decide based on `MiroError::retryable`. Response handling lives in
//! pure functions (`check_status`, `parse_json`) for testability.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::config::MiroConfig;
use super::types::{ConnectorRequest, Created, MiroError, Page, StickyNoteRequest, WireItem};
use crate::graph::{Position, RawBoardItem, RawConnector};

const PAGE_LIMIT: &str = "50";
const TOKEN_INFO_PATH: &str = "/v1/oauth-token";

// =============================================================================
// CLIENT
// =============================================================================

pub struct MiroClient {
    http: reqwest::Client,
    api_url: String,
    token_info_url: String,
}

impl MiroClient {
    /// Build a client with bearer-token default headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &MiroConfig) -> Result<Self, MiroError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| MiroError::HttpClientBuild(e.to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| MiroError::HttpClientBuild(e.to_string()))?;

        Ok(Self { http, api_url: config.api_url.clone(), token_info_url: token_info_url(&config.api_url) })
    }

    /// Fetch token metadata; a cheap way to confirm the token works.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    pub async fn check_token(&self) -> Result<serde_json::Value, MiroError> {
        let response = self.http.get(&self.token_info_url).send().await;
        let text = read_body(TOKEN_INFO_PATH, response).await?;
        parse_json(&text)
    }

    /// All connectors on a board, following pagination to the end.
    ///
    /// # Errors
    ///
    /// Returns the first failed page request.
    pub async fn list_connectors(&self, board_id: &str) -> Result<Vec<RawConnector>, MiroError> {
        self.get_all(&format!("/boards/{board_id}/connectors")).await
    }

    /// All items on a board, following pagination to the end.
    ///
    /// # Errors
    ///
    /// Returns the first failed page request.
    pub async fn list_items(&self, board_id: &str) -> Result<Vec<RawBoardItem>, MiroError> {
        let items: Vec<WireItem> = self.get_all(&format!("/boards/{board_id}/items")).await?;
        Ok(items.into_iter().map(RawBoardItem::from).collect())
    }

    /// A single item by id.
    ///
    /// # Errors
    ///
    /// Returns `MiroError::NotFound` when the item does not exist.
    pub async fn get_item(&self, board_id: &str, item_id: &str) -> Result<RawBoardItem, MiroError> {
        let path = format!("/boards/{board_id}/items/{item_id}");
        let response = self.http.get(self.url(&path)).send().await;
        let text = read_body(&path, response).await?;
        let item: WireItem = parse_json(&text)?;
        Ok(item.into())
    }

    /// Create a rectangle sticky note; returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no id.
    pub async fn create_sticky(&self, board_id: &str, caption: &str, position: Position) -> Result<String, MiroError> {
        let path = format!("/boards/{board_id}/sticky_notes");
        let created: Created = self.post(&path, &StickyNoteRequest::new(caption, position)).await?;
        Ok(created.id)
    }

    /// Create an elbowed, captioned connector between two items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_connector(&self, board_id: &str, from_id: &str, to_id: &str, caption: &str) -> Result<String, MiroError> {
        let path = format!("/boards/{board_id}/connectors");
        let created: Created = self.post(&path, &ConnectorRequest::new(from_id, to_id, caption)).await?;
        Ok(created.id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, MiroError> {
        let mut all = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut request = self.http.get(self.url(path)).query(&[("limit", PAGE_LIMIT)]);
            if let Some(c) = cursor.as_deref() {
                request = request.query(&[("cursor", c)]);
            }
            let text = read_body(path, request.send().await).await?;
            let page: Page<T> = parse_json(&text)?;
            debug!(%path, fetched = page.data.len(), "fetched page");
            all.extend(page.data);

            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }
        Ok(all)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, MiroError> {
        let response = self.http.post(self.url(path)).json(body).send().await;
        let text = read_body(path, response).await?;
        parse_json(&text)
    }
}

// =============================================================================
// RESPONSE HANDLING
// =============================================================================

async fn read_body(path: &str, response: Result<reqwest::Response, reqwest::Error>) -> Result<String, MiroError> {
    let response = response.map_err(|e| MiroError::ApiRequest(e.to_string()))?;
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| MiroError::ApiRequest(e.to_string()))?;
    debug!(%path, status, bytes = text.len(), "miro response");
    check_status(path, status, text)
}

/// Map a non-success status to the matching `MiroError`.
///
/// # Errors
///
/// `NotFound` for 404, `ApiResponse` for any other non-2xx status.
pub fn check_status(path: &str, status: u16, body: String) -> Result<String, MiroError> {
    match status {
        200..=299 => Ok(body),
        404 => Err(MiroError::NotFound { path: path.to_owned() }),
        _ => Err(MiroError::ApiResponse { status, body }),
    }
}

/// Deserialize a response body.
///
/// # Errors
///
/// Returns `MiroError::ApiParse` on malformed JSON or an unexpected shape.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, MiroError> {
    serde_json::from_str(text).map_err(|e| MiroError::ApiParse(e.to_string()))
}

/// Token info lives under `/v1` on the same origin as the v2 API.
fn token_info_url(api_url: &str) -> String {
    let origin = api_url.strip_suffix("/v2").unwrap_or(api_url);
    format!("{origin}{TOKEN_INFO_PATH}")
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
