//! Board synchronizer — draws a canonical graph onto a board.
//!
//! DESIGN
//! ======
//! Two passes. First every distinct endpoint caption gets exactly one node
//! (created through the `BoardWriter`, or reused from a seeded registry),
//! then every edge gets exactly one connector, in input order. Nodes are
//! always finished before the first connector is attempted.
//!
//! The board offers no multi-object transaction. A failed create aborts the
//! run and leaves whatever was already created in place; the error reports
//! how far the run got.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::board::{BoardError, BoardWriter};
use crate::graph::{CanonicalGraph, Position, RawBoardItem};
use crate::sanitize::sanitize;

/// Label used for connectors whose edge caption is empty.
pub const PLACEHOLDER_CAPTION: &str = "TBD";

// =============================================================================
// ERROR
// =============================================================================

/// A create call failed part-way through a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("creating node {caption:?} failed after {created_nodes} nodes: {source}")]
    NodeCreation { caption: String, created_nodes: usize, source: BoardError },

    #[error("creating connector #{index} ({from:?} -> {to:?}) failed after {created_connectors} connectors: {source}")]
    ConnectorCreation {
        index: usize,
        from: String,
        to: String,
        caption: String,
        created_connectors: usize,
        source: BoardError,
    },

    /// An edge endpoint had no node id when connectors were wired.
    #[error("edge #{index} endpoint {caption:?} has no node")]
    UnregisteredEndpoint { index: usize, caption: String },
}

// =============================================================================
// NODE REGISTRY
// =============================================================================

/// Caption to board node id, scoped to one synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeRegistry {
    ids: HashMap<String, String>,
    order: Vec<String>,
}

impl NodeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registry from items already on the board, keyed by sanitized
    /// content. The first item wins when several share a caption. Items with
    /// no text (images, frames, empty stickies) are never reused.
    #[must_use]
    pub fn from_items(items: &[RawBoardItem]) -> Self {
        let mut registry = Self::new();
        for item in items {
            let caption = sanitize(&item.content);
            if caption.is_empty() {
                debug!(item_id = %item.id, "not reusing item without text");
                continue;
            }
            registry.insert(caption, item.id.clone());
        }
        registry
    }

    #[must_use]
    pub fn get(&self, caption: &str) -> Option<&str> {
        self.ids.get(caption).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, caption: &str) -> bool {
        self.ids.contains_key(caption)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|caption| self.ids.get(caption).map(|id| (caption.as_str(), id.as_str())))
    }

    /// Register a caption. Returns `false` and keeps the existing id if the
    /// caption is already present.
    pub fn insert(&mut self, caption: String, id: String) -> bool {
        if self.ids.contains_key(&caption) {
            return false;
        }
        self.order.push(caption.clone());
        self.ids.insert(caption, id);
        true
    }
}

// =============================================================================
// SYNCHRONIZE
// =============================================================================

/// Outcome of a completed synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub registry: NodeRegistry,
    pub nodes_created: usize,
    pub nodes_reused: usize,
    pub connectors_created: usize,
}

/// Draw `graph` onto a board with no pre-existing nodes.
///
/// Captions missing from `positions` are placed at the origin.
///
/// # Errors
///
/// Returns `SyncError` for the first failed create call; earlier creations
/// stay on the board.
pub async fn synchronize<W: BoardWriter + ?Sized>(
    graph: &CanonicalGraph,
    positions: &HashMap<String, Position>,
    writer: &W,
) -> Result<SyncReport, SyncError> {
    synchronize_with_registry(graph, positions, writer, NodeRegistry::new()).await
}

/// Draw `graph` onto a board, reusing node ids already in `registry`.
///
/// # Errors
///
/// Same as `synchronize`.
pub async fn synchronize_with_registry<W: BoardWriter + ?Sized>(
    graph: &CanonicalGraph,
    positions: &HashMap<String, Position>,
    writer: &W,
    registry: NodeRegistry,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport { registry, ..SyncReport::default() };

    for caption in graph.node_captions() {
        if report.registry.contains(caption) {
            debug!(%caption, "reusing existing node");
            report.nodes_reused += 1;
            continue;
        }

        let position = positions.get(caption).copied().unwrap_or_default();
        let id = writer
            .create_node(caption, position)
            .await
            .map_err(|source| SyncError::NodeCreation {
                caption: caption.to_owned(),
                created_nodes: report.nodes_created,
                source,
            })?;
        debug!(%caption, %id, x = position.x, y = position.y, "created node");
        report.registry.insert(caption.to_owned(), id);
        report.nodes_created += 1;
    }

    for (index, edge) in graph.iter().enumerate() {
        let from_id = node_id(&report.registry, index, &edge.from)?;
        let to_id = node_id(&report.registry, index, &edge.to)?;
        let label = if edge.caption.is_empty() { PLACEHOLDER_CAPTION } else { edge.caption.as_str() };

        writer
            .create_connector(from_id, to_id, label)
            .await
            .map_err(|source| SyncError::ConnectorCreation {
                index,
                from: edge.from.clone(),
                to: edge.to.clone(),
                caption: label.to_owned(),
                created_connectors: report.connectors_created,
                source,
            })?;
        debug!(index, from = %edge.from, to = %edge.to, %label, "created connector");
        report.connectors_created += 1;
    }

    info!(
        nodes_created = report.nodes_created,
        nodes_reused = report.nodes_reused,
        connectors = report.connectors_created,
        "synchronized graph"
    );
    Ok(report)
}

fn node_id<'a>(registry: &'a NodeRegistry, index: usize, caption: &str) -> Result<&'a str, SyncError> {
    registry
        .get(caption)
        .ok_or_else(|| SyncError::UnregisteredEndpoint { index, caption: caption.to_owned() })
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
