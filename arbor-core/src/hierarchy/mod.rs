//! Canonical Hierarchy
//!
//! Every diagram starts from the same structure: a strict tree with exactly
//! one root, unique full paths, and ordered children. This module builds
//! that tree from either report shape.
//!
//! # Design Decisions
//!
//! 1. Nodes live in an arena owned by the tree and refer to each other by
//!    id. Parent references are ids, not owning pointers, so the structure
//!    has no reference cycles to manage.
//!
//! 2. The full-path lookup table is owned by the build call and handed to
//!    the finished tree. Re-inserting an existing path returns the existing
//!    node instead of creating a duplicate.
//!
//! 3. Resolved adjacency is stored as id pairs on the leaves and expanded to
//!    string-keyed edges only when queried.

mod builder;
mod node;

pub use builder::HierarchyBuilder;
pub use node::{Hierarchy, LinkPair, Node, NodeId, NodeKind};
