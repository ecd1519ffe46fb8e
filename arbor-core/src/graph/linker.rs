//! Dependency Linker
//!
//! Resolves each leaf's raw dependency identifiers against the set of leaf
//! paths and records the result as adjacency on the hierarchy.
//!
//! # How Linking Works
//!
//! 1. Collect every childless node into a lookup table keyed by full path.
//!
//! 2. For each leaf, resolve each raw identifier against the table. A hit
//!    appends the `(leaf, target)` pair to the leaf's `outgoing` and to the
//!    target's `incoming`, keeping the two edge multisets in bijection.
//!
//! 3. A miss is handled per the configured policy: strict fails the whole
//!    operation with the offending leaf and identifier; lenient drops the
//!    edge and records it in the returned diagnostics. Lenient is the
//!    default, so partially complete reports still render.
//!
//! Linking an already-linked hierarchy first clears all adjacency, so the
//! operation can be repeated without duplicating edges.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ReferenceError, Result};
use crate::hierarchy::{Hierarchy, NodeId};

/// What to do with a dependency identifier that resolves to no leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkPolicy {
    /// Fail the whole link operation on the first unresolved identifier.
    Strict,

    /// Drop the unresolved edge and record it as a diagnostic.
    #[default]
    Lenient,
}

/// An edge dropped under the lenient policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedDependency {
    /// Full path of the leaf declaring the dependency.
    pub leaf: String,
    /// The identifier that failed to resolve.
    pub target: String,
}

/// Outcome of a link pass.
#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    /// Number of edges resolved and recorded.
    pub resolved: usize,
    /// Edges dropped because their target is not a known leaf.
    pub unresolved: Vec<UnresolvedDependency>,
}

/// Resolves leaf dependencies into bidirectional adjacency.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linker {
    policy: LinkPolicy,
}

impl Linker {
    /// Create a linker with the given unresolved-identifier policy.
    pub fn new(policy: LinkPolicy) -> Self {
        Self { policy }
    }

    /// Resolve every leaf's dependencies, annotating the hierarchy in place.
    ///
    /// Under the strict policy a failure leaves the hierarchy untouched;
    /// resolution happens before any adjacency is written.
    pub fn link(&self, hierarchy: &mut Hierarchy) -> Result<LinkReport> {
        let leaves = hierarchy.leaves();
        let mut by_path: IndexMap<String, NodeId> = IndexMap::with_capacity(leaves.len());
        for &id in &leaves {
            by_path.insert(hierarchy.node(id).path().to_string(), id);
        }

        let mut resolved: Vec<(NodeId, NodeId)> = Vec::new();
        let mut report = LinkReport::default();
        for &leaf in &leaves {
            for raw in hierarchy.node(leaf).dependencies() {
                match by_path.get(raw) {
                    Some(&target) => resolved.push((leaf, target)),
                    None => {
                        let leaf_path = hierarchy.node(leaf).path().to_string();
                        if self.policy == LinkPolicy::Strict {
                            return Err(ReferenceError {
                                leaf: leaf_path,
                                target: raw.clone(),
                            }
                            .into());
                        }
                        report.unresolved.push(UnresolvedDependency {
                            leaf: leaf_path,
                            target: raw.clone(),
                        });
                    }
                }
            }
        }

        // Repeat runs start from a clean slate.
        for id in hierarchy.descendants() {
            hierarchy.node_mut(id).clear_links();
        }
        report.resolved = resolved.len();
        for (leaf, target) in resolved {
            hierarchy.node_mut(leaf).push_outgoing((leaf, target));
            hierarchy.node_mut(target).push_incoming((leaf, target));
        }

        debug!(
            leaves = leaves.len(),
            resolved = report.resolved,
            unresolved = report.unresolved.len(),
            "linked dependencies"
        );

        Ok(report)
    }
}
