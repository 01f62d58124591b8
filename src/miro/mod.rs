//! Miro — REST transport for the board collaborator traits.
//!
//! DESIGN
//! ======
//! `MiroClient` wraps the v2 REST API with bearer-token auth and cursor
//! pagination. `MiroBoard` binds a client to one board id and implements
//! `ItemResolver`, `BoardReader` and `BoardWriter`, so the core pipeline can
//! run against a live board without knowing about HTTP.

pub mod client;
pub mod config;
pub mod types;

use async_trait::async_trait;
use tracing::debug;

pub use client::MiroClient;
pub use config::MiroConfig;
pub use types::MiroError;

use crate::board::{BoardError, BoardReader, BoardWriter, ItemResolver, ResolveError};
use crate::graph::{Position, RawBoardItem, RawConnector};

/// A `MiroClient` scoped to a single board.
pub struct MiroBoard<'a> {
    client: &'a MiroClient,
    board_id: String,
}

impl<'a> MiroBoard<'a> {
    #[must_use]
    pub fn new(client: &'a MiroClient, board_id: impl Into<String>) -> Self {
        Self { client, board_id: board_id.into() }
    }

    #[must_use]
    pub fn board_id(&self) -> &str {
        &self.board_id
    }
}

#[async_trait]
impl ItemResolver for MiroBoard<'_> {
    async fn resolve_item_content(&self, item_id: &str) -> Result<String, ResolveError> {
        debug!(board_id = %self.board_id, %item_id, "resolving item");
        let item = self.client.get_item(&self.board_id, item_id).await?;
        Ok(item.content)
    }
}

#[async_trait]
impl BoardReader for MiroBoard<'_> {
    async fn list_connectors(&self) -> Result<Vec<RawConnector>, BoardError> {
        Ok(self.client.list_connectors(&self.board_id).await?)
    }

    async fn list_items(&self) -> Result<Vec<RawBoardItem>, BoardError> {
        Ok(self.client.list_items(&self.board_id).await?)
    }
}

#[async_trait]
impl BoardWriter for MiroBoard<'_> {
    async fn create_node(&self, caption: &str, position: Position) -> Result<String, BoardError> {
        Ok(self.client.create_sticky(&self.board_id, caption, position).await?)
    }

    async fn create_connector(&self, from_id: &str, to_id: &str, caption: &str) -> Result<(), BoardError> {
        self.client
            .create_connector(&self.board_id, from_id, to_id, caption)
            .await?;
        Ok(())
    }
}
