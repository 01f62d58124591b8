//! Board collaborator seams.
//!
//! DESIGN
//! ======
//! The core reads and writes the board only through these traits. The REST
//! transport in `miro` implements them against a live board; tests implement
//! them with in-memory fakes. Retries and timeouts live behind the trait,
//! never in the core.

use async_trait::async_trait;

use crate::graph::{Position, RawBoardItem, RawConnector};

// =============================================================================
// ERRORS
// =============================================================================

/// Why an item's content could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The item does not exist (deleted or never created).
    #[error("item not found")]
    NotFound,

    /// The lookup failed for any other reason.
    #[error("{0}")]
    Failed(String),
}

/// A board read or write failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("board request failed: {0}")]
pub struct BoardError(pub String);

// =============================================================================
// TRAITS
// =============================================================================

/// Looks up a board item's raw content by id.
#[async_trait]
pub trait ItemResolver: Send + Sync {
    async fn resolve_item_content(&self, item_id: &str) -> Result<String, ResolveError>;
}

#[async_trait]
impl<R: ItemResolver + ?Sized> ItemResolver for &R {
    async fn resolve_item_content(&self, item_id: &str) -> Result<String, ResolveError> {
        (**self).resolve_item_content(item_id).await
    }
}

/// Reads whole collections off a board. Pagination is the implementor's job.
#[async_trait]
pub trait BoardReader: Send + Sync {
    async fn list_connectors(&self) -> Result<Vec<RawConnector>, BoardError>;

    async fn list_items(&self) -> Result<Vec<RawBoardItem>, BoardError>;
}

/// Creates visual entities on a board.
#[async_trait]
pub trait BoardWriter: Send + Sync {
    /// Create a node showing `caption` at `position`; returns the board id.
    async fn create_node(&self, caption: &str, position: Position) -> Result<String, BoardError>;

    /// Create a directed, labeled connector between two existing nodes.
    async fn create_connector(&self, from_id: &str, to_id: &str, caption: &str) -> Result<(), BoardError>;
}
