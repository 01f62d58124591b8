//! Stickygraph — directed graphs to and from sticky-note boards.
//!
//! DESIGN
//! ======
//! The pipeline runs in three stages, each callable on its own:
//!
//! - `extract` reads connectors off a board and produces a caption-keyed
//!   edge list (`CanonicalGraph`).
//! - `layout` peels the graph into topological generations and assigns
//!   every node a 2-D position.
//! - `synchronize` draws a graph onto a board, creating one sticky per
//!   distinct caption and one connector per edge.
//!
//! Board access goes through the traits in `board`, so the core never
//! touches the network. The `miro` module is the REST transport that
//! implements those traits against a live board.

pub mod board;
pub mod extract;
pub mod graph;
pub mod layout;
pub mod miro;
pub mod sanitize;
pub mod sync;

pub use board::{BoardError, BoardReader, BoardWriter, ItemResolver, ResolveError};
pub use extract::{CachedResolver, ExtractError, Extraction, extract, extract_edge, extract_lenient};
pub use graph::{CanonicalEdge, CanonicalGraph, Position, RawBoardItem, RawConnector};
pub use layout::{Layout, LayoutError, PlacedNode, layout};
pub use sanitize::sanitize;
pub use sync::{NodeRegistry, PLACEHOLDER_CAPTION, SyncError, SyncReport, synchronize, synchronize_with_registry};
