//! Layered layout engine: topological generations to board coordinates.
//!
//! DESIGN
//! ======
//! Nodes are peeled in generations (Kahn rounds): every node with no
//! remaining incoming edge forms the current generation, then it and its
//! outgoing edges are removed. Within a generation nodes keep the order in
//! which they first appear in the edge list, so identical input always yields
//! identical output. If nodes remain but none is free, the graph has a cycle.
//!
//! Generations run left to right along x, from `-scale` to `+scale`. Each
//! generation is centered on y independently and spread evenly, so every
//! coordinate stays inside `[-scale, scale]`.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::graph::{CanonicalGraph, Position};

/// Errors produced by `layout`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Peeling stalled: these nodes sit on or behind a cycle.
    #[error("graph has a cycle; unplaceable nodes: {}", remaining.join(", "))]
    Cycle { remaining: Vec<String> },

    /// Scale must be finite and positive.
    #[error("invalid layout scale: {0}")]
    InvalidScale(f64),
}

/// A node with its generation and board position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode {
    pub caption: String,
    pub generation: usize,
    pub position: Position,
}

/// Layout result, ordered by generation and then first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    nodes: Vec<PlacedNode>,
    layer_count: usize,
}

impl Layout {
    #[must_use]
    pub fn nodes(&self) -> &[PlacedNode] {
        &self.nodes
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    #[must_use]
    pub fn generation(&self, caption: &str) -> Option<usize> {
        self.find(caption).map(|n| n.generation)
    }

    #[must_use]
    pub fn position(&self, caption: &str) -> Option<Position> {
        self.find(caption).map(|n| n.position)
    }

    /// Captions grouped by generation.
    #[must_use]
    pub fn layers(&self) -> Vec<Vec<&str>> {
        let mut layers = vec![Vec::new(); self.layer_count];
        for node in &self.nodes {
            layers[node.generation].push(node.caption.as_str());
        }
        layers
    }

    /// Caption to position map, as consumed by the synchronizer.
    #[must_use]
    pub fn positions(&self) -> HashMap<String, Position> {
        self.nodes
            .iter()
            .map(|n| (n.caption.clone(), n.position))
            .collect()
    }

    fn find(&self, caption: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|n| n.caption == caption)
    }
}

/// Compute generations and positions for every node in `graph`.
///
/// Edge captions are ignored; repeated endpoint pairs count once.
///
/// # Errors
///
/// Returns `LayoutError::Cycle` when the graph is not a DAG (self-loops
/// included) and `LayoutError::InvalidScale` for a non-positive or
/// non-finite `scale`.
pub fn layout(graph: &CanonicalGraph, scale: f64) -> Result<Layout, LayoutError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(LayoutError::InvalidScale(scale));
    }

    let captions = graph.node_captions();
    let index: HashMap<&str, usize> = captions.iter().enumerate().map(|(i, c)| (*c, i)).collect();

    let mut successors = vec![Vec::new(); captions.len()];
    let mut in_degree = vec![0usize; captions.len()];
    let mut seen_pairs = HashSet::new();
    for edge in graph {
        let from = index[edge.from.as_str()];
        let to = index[edge.to.as_str()];
        if seen_pairs.insert((from, to)) {
            successors[from].push(to);
            in_degree[to] += 1;
        }
    }

    let generations = peel(&successors, in_degree).map_err(|remaining| LayoutError::Cycle {
        remaining: remaining.into_iter().map(|i| captions[i].to_owned()).collect(),
    })?;

    let layer_count = generations.len();
    let mut nodes = Vec::with_capacity(captions.len());
    for (generation, members) in generations.iter().enumerate() {
        let x = layer_offset(generation, layer_count, scale);
        for (slot, &node) in members.iter().enumerate() {
            let y = slot_offset(slot, members.len(), scale);
            nodes.push(PlacedNode { caption: captions[node].to_owned(), generation, position: Position::new(x, y) });
        }
        debug!(generation, nodes = members.len(), x, "placed generation");
    }

    Ok(Layout { nodes, layer_count })
}

/// Kahn-style generation peeling over node indices.
///
/// Each generation is sorted by index (first-seen order). On a stall,
/// returns the indices that could not be peeled.
fn peel(successors: &[Vec<usize>], mut in_degree: Vec<usize>) -> Result<Vec<Vec<usize>>, Vec<usize>> {
    let mut placed = 0;
    let mut generations = Vec::new();
    let mut frontier: Vec<usize> = (0..in_degree.len()).filter(|&n| in_degree[n] == 0).collect();

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for &node in &frontier {
            for &succ in &successors[node] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    next.push(succ);
                }
            }
        }
        next.sort_unstable();
        placed += frontier.len();
        generations.push(frontier);
        frontier = next;
    }

    if placed < in_degree.len() {
        return Err((0..in_degree.len()).filter(|&n| in_degree[n] > 0).collect());
    }
    Ok(generations)
}

/// Generation 0 sits at `-scale`, the last generation at exactly `+scale`.
/// A single generation is centered.
#[allow(clippy::cast_precision_loss)]
fn layer_offset(generation: usize, layer_count: usize, scale: f64) -> f64 {
    if layer_count <= 1 {
        return 0.0;
    }
    let fraction = generation as f64 / (layer_count - 1) as f64;
    (scale * (2.0 * fraction - 1.0)).clamp(-scale, scale)
}

/// Slots are `2 * scale / count` apart and centered on zero.
#[allow(clippy::cast_precision_loss)]
fn slot_offset(slot: usize, count: usize, scale: f64) -> f64 {
    let step = 2.0 * scale / count as f64;
    (slot as f64 - (count as f64 - 1.0) / 2.0) * step
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
