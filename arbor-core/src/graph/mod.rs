//! Dependency Graphs
//!
//! This module turns trees into the leaf-level graphs the edge-bundling and
//! force-graph views consume:
//!
//! - `linker` resolves each leaf's raw dependency identifiers into
//!   forward/backward adjacency on the hierarchy itself.
//!
//! - `extract` flattens a nested report tree into a leaf node list plus a
//!   filtered edge list, applying the configured blacklist.
//!
//! - `highlight` derives the hover state the interactive views swap in and
//!   out, with no process-wide mutable state.

mod extract;
mod highlight;
mod linker;

use serde::{Deserialize, Serialize};

pub use extract::{Extractor, GraphData, GraphNode};
pub use highlight::{Adjacency, HighlightState};
pub use linker::{LinkPolicy, LinkReport, Linker, UnresolvedDependency};

/// A dependency edge between two node ids.
///
/// Stored directionless but semantically `source` → `target`. Which end is
/// the depending node varies by producer: the linker emits
/// depender → dependee, the extractor the reverse. Consumers key on the
/// producer's convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Id of the edge's source node.
    pub source: String,
    /// Id of the edge's target node.
    pub target: String,
}

impl Edge {
    /// Build an edge from anything string-like.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}
