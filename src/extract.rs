//! Graph extraction — board connectors to a caption-keyed edge list.
//!
//! DESIGN
//! ======
//! Each connector becomes one `CanonicalEdge`, in input order. Endpoint item
//! ids are resolved to content through an injected `ItemResolver`, wrapped in
//! a `CachedResolver` so an item shared by many connectors is fetched once per
//! run. A missing item is an error for that connector; `extract` stops there,
//! `extract_lenient` records it and moves on.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::board::{ItemResolver, ResolveError};
use crate::graph::{CanonicalEdge, CanonicalGraph, ItemRef, RawCaption, RawConnector};
use crate::sanitize::sanitize;

/// Separator placed between multiple connector captions.
pub const CAPTION_SEPARATOR: &str = ", ";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while extracting a single connector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// The connector points at an item that no longer exists.
    #[error("connector {connector_id} references missing item {item_id}")]
    MissingReference { connector_id: String, item_id: String },

    /// The connector lacks a usable endpoint id.
    #[error("connector {connector_id} has no {field} id")]
    InvalidConnector { connector_id: String, field: &'static str },

    /// The resolver failed for a reason other than not-found.
    #[error("connector {connector_id}: resolving item {item_id} failed: {message}")]
    Resolve { connector_id: String, item_id: String, message: String },
}

// =============================================================================
// CACHED RESOLVER
// =============================================================================

/// Memoizes an `ItemResolver` for the lifetime of one extraction run.
///
/// Successful lookups and not-found outcomes are both cached. Other failures
/// are not, so a transient error can be retried by the next connector.
pub struct CachedResolver<R> {
    inner: R,
    cache: Mutex<HashMap<String, Result<String, ResolveError>>>,
}

impl<R: ItemResolver> CachedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, cache: Mutex::new(HashMap::new()) }
    }

    fn cached(&self, item_id: &str) -> Option<Result<String, ResolveError>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(item_id)
            .cloned()
    }
}

#[async_trait]
impl<R: ItemResolver> ItemResolver for CachedResolver<R> {
    async fn resolve_item_content(&self, item_id: &str) -> Result<String, ResolveError> {
        if let Some(hit) = self.cached(item_id) {
            return hit;
        }

        let result = self.inner.resolve_item_content(item_id).await;
        if !matches!(result, Err(ResolveError::Failed(_))) {
            self.cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(item_id.to_owned(), result.clone());
        }
        result
    }
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Result of a lenient extraction: the edges that succeeded plus one error
/// per skipped connector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub graph: CanonicalGraph,
    pub skipped: Vec<ExtractError>,
}

/// Extract every connector, stopping at the first failure.
///
/// # Errors
///
/// Returns the first connector's `ExtractError`.
pub async fn extract<R: ItemResolver>(connectors: &[RawConnector], resolver: R) -> Result<CanonicalGraph, ExtractError> {
    let resolver = CachedResolver::new(resolver);
    let mut graph = CanonicalGraph::new();
    for connector in connectors {
        graph.push(extract_edge(connector, &resolver).await?);
    }
    info!(connectors = connectors.len(), edges = graph.len(), "extracted graph");
    Ok(graph)
}

/// Extract every connector, skipping those that fail.
pub async fn extract_lenient<R: ItemResolver>(connectors: &[RawConnector], resolver: R) -> Extraction {
    let resolver = CachedResolver::new(resolver);
    let mut extraction = Extraction::default();
    for connector in connectors {
        match extract_edge(connector, &resolver).await {
            Ok(edge) => extraction.graph.push(edge),
            Err(e) => {
                warn!(error = %e, connector_id = %connector.id, "skipping connector");
                extraction.skipped.push(e);
            }
        }
    }
    info!(
        connectors = connectors.len(),
        edges = extraction.graph.len(),
        skipped = extraction.skipped.len(),
        "extracted graph"
    );
    extraction
}

/// Extract a single connector into a `CanonicalEdge`.
///
/// # Errors
///
/// Fails when an endpoint id is absent or empty, or when either endpoint
/// cannot be resolved.
pub async fn extract_edge<R: ItemResolver>(connector: &RawConnector, resolver: &R) -> Result<CanonicalEdge, ExtractError> {
    let start_id = endpoint_id(connector, connector.start_item.as_ref(), "startItem")?;
    let end_id = endpoint_id(connector, connector.end_item.as_ref(), "endItem")?;

    let from = resolve(connector, start_id, resolver).await?;
    let to = resolve(connector, end_id, resolver).await?;
    let caption = merge_captions(&connector.captions);

    debug!(connector_id = %connector.id, %from, %caption, %to, "extracted edge");
    Ok(CanonicalEdge::new(from, caption, to))
}

/// Join sanitized caption contents with `", "`; no captions yields `""`.
#[must_use]
pub fn merge_captions(captions: &[RawCaption]) -> String {
    captions
        .iter()
        .map(|c| sanitize(&c.content))
        .collect::<Vec<_>>()
        .join(CAPTION_SEPARATOR)
}

fn endpoint_id<'a>(
    connector: &RawConnector,
    item: Option<&'a ItemRef>,
    field: &'static str,
) -> Result<&'a str, ExtractError> {
    match item {
        Some(item) if !item.id.is_empty() => Ok(&item.id),
        _ => Err(ExtractError::InvalidConnector { connector_id: connector.id.clone(), field }),
    }
}

async fn resolve<R: ItemResolver>(connector: &RawConnector, item_id: &str, resolver: &R) -> Result<String, ExtractError> {
    match resolver.resolve_item_content(item_id).await {
        Ok(content) => Ok(sanitize(&content)),
        Err(ResolveError::NotFound) => Err(ExtractError::MissingReference {
            connector_id: connector.id.clone(),
            item_id: item_id.to_owned(),
        }),
        Err(ResolveError::Failed(message)) => Err(ExtractError::Resolve {
            connector_id: connector.id.clone(),
            item_id: item_id.to_owned(),
            message,
        }),
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
