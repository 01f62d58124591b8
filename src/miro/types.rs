//! Miro wire types and transport errors.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{BoardError, ResolveError};
use crate::graph::{Position, RawBoardItem};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by the Miro REST client.
#[derive(Debug, thiserror::Error)]
pub enum MiroError {
    /// The access token environment variable is not set.
    #[error("missing access token: env var {var} not set")]
    MissingToken { var: String },

    /// No board id was configured or passed.
    #[error("missing board id; pass --board-id or set MIRO_BOARD_ID")]
    MissingBoardId,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The HTTP request itself failed (connect, timeout, body read).
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The API answered 404 for this path.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// The API returned a non-success status.
    #[error("API response error: status {status}: {body}")]
    ApiResponse { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),
}

impl MiroError {
    /// Whether a caller may reasonably retry the failed call.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

impl From<MiroError> for BoardError {
    fn from(error: MiroError) -> Self {
        Self(error.to_string())
    }
}

impl From<MiroError> for ResolveError {
    fn from(error: MiroError) -> Self {
        match error {
            MiroError::NotFound { .. } => Self::NotFound,
            other => Self::Failed(other.to_string()),
        }
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// One page of a cursor-paginated collection.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// A generic board item; only the text content matters here.
#[derive(Debug, Deserialize)]
pub struct WireItem {
    pub id: String,
    #[serde(default)]
    pub data: Option<WireItemData>,
}

#[derive(Debug, Deserialize)]
pub struct WireItemData {
    #[serde(default)]
    pub content: Option<String>,
}

impl From<WireItem> for RawBoardItem {
    fn from(item: WireItem) -> Self {
        let Some(content) = item.data.and_then(|d| d.content) else {
            debug!(item_id = %item.id, "board item has no text content");
            return Self { id: item.id, content: String::new() };
        };
        Self { id: item.id, content }
    }
}

/// Response to a create call; only the new id is kept.
#[derive(Debug, Deserialize)]
pub struct Created {
    pub id: String,
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct StickyNoteRequest<'a> {
    pub data: StickyNoteData<'a>,
    pub style: StickyNoteStyle,
    pub position: Position,
}

#[derive(Debug, Serialize)]
pub struct StickyNoteData<'a> {
    pub shape: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyNoteStyle {
    pub text_align: &'static str,
    pub text_align_vertical: &'static str,
}

impl<'a> StickyNoteRequest<'a> {
    /// Rectangle sticky with top-left aligned text.
    #[must_use]
    pub fn new(caption: &'a str, position: Position) -> Self {
        Self {
            data: StickyNoteData { shape: "rectangle", content: caption },
            style: StickyNoteStyle { text_align: "left", text_align_vertical: "top" },
            position,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorRequest<'a> {
    pub start_item: ConnectorEnd<'a>,
    pub end_item: ConnectorEnd<'a>,
    pub captions: Vec<ConnectorCaption<'a>>,
    pub style: ConnectorStyle,
    pub shape: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorEnd<'a> {
    pub snap_to: &'static str,
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorCaption<'a> {
    pub content: &'a str,
    pub text_align_vertical: &'static str,
}

/// Miro takes connector style numbers as strings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorStyle {
    pub font_size: String,
    pub text_orientation: &'static str,
    pub stroke_width: String,
}

pub const CONNECTOR_FONT_SIZE: u32 = 25;
pub const CONNECTOR_STROKE_WIDTH: u32 = 5;

impl<'a> ConnectorRequest<'a> {
    /// Elbowed connector with one centered caption.
    #[must_use]
    pub fn new(from_id: &'a str, to_id: &'a str, caption: &'a str) -> Self {
        Self {
            start_item: ConnectorEnd { snap_to: "auto", id: from_id },
            end_item: ConnectorEnd { snap_to: "auto", id: to_id },
            captions: vec![ConnectorCaption { content: caption, text_align_vertical: "middle" }],
            style: ConnectorStyle {
                font_size: CONNECTOR_FONT_SIZE.to_string(),
                text_orientation: "horizontal",
                stroke_width: CONNECTOR_STROKE_WIDTH.to_string(),
            },
            shape: "elbowed",
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
