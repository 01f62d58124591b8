//! Graph model shared by extraction, layout and synchronization.
//!
//! DESIGN
//! ======
//! A node has no identity beyond its caption: two edges naming the same
//! caption string touch the same node. Comparison is exact, so case and
//! whitespace matter. Edge order is insertion order and is preserved end to
//! end because it decides the order of board side effects.
//!
//! `RawBoardItem` and `RawConnector` mirror what the board hands back.
//! Connector endpoints stay optional here; the extractor validates them.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::sanitize::sanitize;

// =============================================================================
// CANONICAL EDGE
// =============================================================================

/// A captioned, directed edge between two node captions.
///
/// Serializes as a `[from, caption, to]` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String, String)", into = "(String, String, String)")]
pub struct CanonicalEdge {
    pub from: String,
    pub caption: String,
    pub to: String,
}

impl CanonicalEdge {
    #[must_use]
    pub fn new(from: impl Into<String>, caption: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), caption: caption.into(), to: to.into() }
    }
}

impl From<(String, String, String)> for CanonicalEdge {
    fn from((from, caption, to): (String, String, String)) -> Self {
        Self { from, caption, to }
    }
}

impl From<CanonicalEdge> for (String, String, String) {
    fn from(edge: CanonicalEdge) -> Self {
        (edge.from, edge.caption, edge.to)
    }
}

// =============================================================================
// CANONICAL GRAPH
// =============================================================================

/// Ordered edge list keyed by captions rather than board ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalGraph {
    edges: Vec<CanonicalEdge>,
}

impl CanonicalGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_edges(edges: Vec<CanonicalEdge>) -> Self {
        Self { edges }
    }

    /// Parse a JSON array of `[from, caption, to]` triples.
    ///
    /// Every caption is sanitized on the way in, so hand-written files may
    /// carry board markup without creating distinct nodes for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not an array of string triples.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        let raw: Vec<CanonicalEdge> = serde_json::from_str(input)?;
        Ok(raw
            .into_iter()
            .map(|edge| CanonicalEdge::new(sanitize(&edge.from), sanitize(&edge.caption), sanitize(&edge.to)))
            .collect())
    }

    pub fn push(&mut self, edge: CanonicalEdge) {
        self.edges.push(edge);
    }

    #[must_use]
    pub fn edges(&self) -> &[CanonicalEdge] {
        &self.edges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalEdge> {
        self.edges.iter()
    }

    /// Distinct endpoint captions in first-seen order (`from` before `to`
    /// within each edge).
    #[must_use]
    pub fn node_captions(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut captions = Vec::new();
        for edge in &self.edges {
            for caption in [edge.from.as_str(), edge.to.as_str()] {
                if seen.insert(caption) {
                    captions.push(caption);
                }
            }
        }
        captions
    }

    /// Render the graph in Trivial Graph Format.
    ///
    /// Nodes get 1-based indices in first-seen order; edge lines omit the
    /// label when the caption is empty.
    #[must_use]
    pub fn to_tgf(&self) -> String {
        let captions = self.node_captions();
        let index: HashMap<&str, usize> = captions.iter().enumerate().map(|(i, c)| (*c, i + 1)).collect();

        let mut out = String::new();
        for (i, caption) in captions.iter().enumerate() {
            out.push_str(&format!("{} {caption}\n", i + 1));
        }
        out.push_str("#\n");
        for edge in &self.edges {
            let from = index.get(edge.from.as_str()).copied().unwrap_or_default();
            let to = index.get(edge.to.as_str()).copied().unwrap_or_default();
            if edge.caption.is_empty() {
                out.push_str(&format!("{from} {to}\n"));
            } else {
                out.push_str(&format!("{from} {to} {}\n", edge.caption));
            }
        }
        out
    }
}

impl FromIterator<CanonicalEdge> for CanonicalGraph {
    fn from_iter<I: IntoIterator<Item = CanonicalEdge>>(iter: I) -> Self {
        Self { edges: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a CanonicalGraph {
    type Item = &'a CanonicalEdge;
    type IntoIter = std::slice::Iter<'a, CanonicalEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

// =============================================================================
// POSITION
// =============================================================================

/// Board coordinate. The default is the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// =============================================================================
// RAW BOARD ENTITIES
// =============================================================================

/// A board item as read back from the board, reduced to its text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBoardItem {
    pub id: String,
    pub content: String,
}

/// Reference to a board item by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    #[serde(default)]
    pub id: String,
}

/// One caption attached to a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCaption {
    #[serde(default)]
    pub content: String,
}

/// A connector as read back from the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConnector {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub start_item: Option<ItemRef>,
    #[serde(default)]
    pub end_item: Option<ItemRef>,
    #[serde(default)]
    pub captions: Vec<RawCaption>,
}

impl RawConnector {
    /// Build a connector between two item ids with the given caption texts.
    #[must_use]
    pub fn new(id: impl Into<String>, start_id: impl Into<String>, end_id: impl Into<String>, captions: &[&str]) -> Self {
        Self {
            id: id.into(),
            start_item: Some(ItemRef { id: start_id.into() }),
            end_item: Some(ItemRef { id: end_id.into() }),
            captions: captions.iter().map(|c| RawCaption { content: (*c).to_owned() }).collect(),
        }
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
