//! Leaf Extractor
//!
//! Flattens a nested report tree into the `{nodes, links}` payload the
//! force-graph view consumes.
//!
//! # Traversal Rules
//!
//! - A node with no `dependencies` attribute is purely structural: a
//!   directory is recursed into, anything else contributes nothing.
//!
//! - A node **with** a `dependencies` attribute is a leaf, even when it also
//!   has children. Its id is its display name when it marks an external
//!   target, otherwise its path identifier.
//!
//! - Each dependency identifier not on the blacklist becomes an edge
//!   `{source: identifier, target: leaf id}`. The orientation is
//!   deliberately reversed from the linker's: the force-graph consumer keys
//!   on "source points at the node that depends on it".
//!
//! Blacklisted identifiers produce no edge and no diagnostic; the blacklist
//! is an exclusion mechanism, not a failure mode.
//!
//! Node order is the pre-order, depth-first order of the input tree; link
//! order follows per-node, per-dependency enumeration order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::graph::Edge;
use crate::report::{ReportKind, ReportNode};

/// A leaf emitted into the force-graph payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique id: the path identifier, or the name for external targets.
    pub id: String,

    /// Display label.
    pub name: String,

    /// What the leaf represents.
    pub kind: ReportKind,

    /// Invocation count, used by the view to size nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times_called: Option<u64>,

    /// Free-form description shown on hover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// The flattened graph payload: leaves plus filtered edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    /// Leaves in pre-order traversal order.
    pub nodes: Vec<GraphNode>,
    /// Edges in per-node, per-dependency order.
    pub links: Vec<Edge>,
}

/// Flattens nested report trees, excluding blacklisted dependency targets.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    blacklist: HashSet<String>,
}

impl Extractor {
    /// Create an extractor excluding the given dependency identifiers.
    pub fn new<I, S>(blacklist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blacklist: blacklist.into_iter().map(Into::into).collect(),
        }
    }

    /// Flatten `tree` into the force-graph payload.
    pub fn extract(&self, tree: &ReportNode) -> Result<GraphData> {
        let mut data = GraphData::default();
        self.visit(tree, &mut data)?;

        debug!(
            nodes = data.nodes.len(),
            links = data.links.len(),
            excluded = self.blacklist.len(),
            "extracted leaf graph"
        );

        Ok(data)
    }

    fn visit(&self, node: &ReportNode, data: &mut GraphData) -> Result<()> {
        let dependencies = match &node.dependencies {
            None => {
                // Structural node: only directories contribute, via their
                // children.
                if node.kind == ReportKind::Directory {
                    for child in &node.children {
                        self.visit(child, data)?;
                    }
                }
                return Ok(());
            }
            Some(dependencies) => dependencies,
        };

        // Carrying a dependencies attribute makes this a leaf, children or
        // not.
        let id = self.leaf_id(node)?;

        for dependency in dependencies {
            if self.blacklist.contains(dependency) {
                continue;
            }
            data.links.push(Edge {
                source: dependency.clone(),
                target: id.clone(),
            });
        }

        data.nodes.push(GraphNode {
            id,
            name: node.name.clone(),
            kind: node.kind,
            times_called: node.times_called,
            explanation: node.explanation.clone(),
        });

        Ok(())
    }

    /// The id a leaf is keyed by. External targets use their name, so
    /// re-extraction of already-processed output leaves ids unchanged.
    fn leaf_id(&self, node: &ReportNode) -> Result<String> {
        if node.kind == ReportKind::External {
            return Ok(node.name.clone());
        }
        node.full_path
            .clone()
            .or_else(|| node.id.clone())
            .ok_or_else(|| {
                ValidationError::MissingPath {
                    name: node.name.clone(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample_tree() -> ReportNode {
        ReportNode::from_json(
            r#"{
                "name": "root",
                "type": "directory",
                "children": [
                    {"name": "x.py", "type": "file", "full_path": "root/x.py",
                     "dependencies": ["lib"], "times_called": 4},
                    {"name": "lib", "type": "External dependency",
                     "dependencies": []}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn extracts_leaves_and_swapped_edges() {
        let data = Extractor::default().extract(&sample_tree()).unwrap();

        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.nodes[0].id, "root/x.py");
        assert_eq!(data.nodes[1].id, "lib");
        // The dependency target is the edge's source.
        assert_eq!(data.links, vec![Edge::new("lib", "root/x.py")]);
    }

    #[test]
    fn blacklisted_targets_produce_no_edges() {
        let data = Extractor::new(["lib"]).extract(&sample_tree()).unwrap();

        assert_eq!(data.nodes.len(), 2);
        assert!(data.links.is_empty());
    }

    #[test]
    fn no_emitted_edge_touches_the_blacklist() {
        let tree = ReportNode::from_json(
            r#"{
                "name": "root", "type": "directory", "children": [
                    {"name": "a", "type": "file", "full_path": "root/a",
                     "dependencies": ["int/abc", "root/b"]},
                    {"name": "b", "type": "file", "full_path": "root/b",
                     "dependencies": ["int/abc"]}
                ]
            }"#,
        )
        .unwrap();

        let data = Extractor::new(["int/abc"]).extract(&tree).unwrap();
        for link in &data.links {
            assert_ne!(link.source, "int/abc");
            assert_ne!(link.target, "int/abc");
        }
        assert_eq!(data.links, vec![Edge::new("root/b", "root/a")]);
    }

    #[test]
    fn external_ids_are_idempotent() {
        let mut tree = sample_tree();
        // Simulate already-processed output: the external node carries the
        // id a previous extraction assigned.
        tree.children[1].id = Some("lib".to_string());

        let first = Extractor::default().extract(&tree).unwrap();
        let second = Extractor::default().extract(&tree).unwrap();
        assert_eq!(first.nodes[1].id, "lib");
        assert_eq!(first, second);
    }

    #[test]
    fn structural_non_directories_contribute_nothing() {
        let tree = ReportNode::from_json(
            r#"{
                "name": "root", "type": "directory", "children": [
                    {"name": "notes.txt", "type": "file"}
                ]
            }"#,
        )
        .unwrap();

        let data = Extractor::default().extract(&tree).unwrap();
        assert!(data.nodes.is_empty());
        assert!(data.links.is_empty());
    }

    #[test]
    fn dependency_bearing_node_with_children_is_a_leaf() {
        let tree = ReportNode::from_json(
            r#"{
                "name": "root", "type": "directory", "children": [
                    {"name": "pkg", "type": "directory", "full_path": "root/pkg",
                     "dependencies": ["ext"],
                     "children": [
                        {"name": "inner", "type": "file", "full_path": "root/pkg/inner",
                         "dependencies": []}
                     ]}
                ]
            }"#,
        )
        .unwrap();

        let data = Extractor::default().extract(&tree).unwrap();
        // The subtree below the dependency carrier is not descended into.
        assert_eq!(data.nodes.len(), 1);
        assert_eq!(data.nodes[0].id, "root/pkg");
        assert_eq!(data.links, vec![Edge::new("ext", "root/pkg")]);
    }

    #[test]
    fn file_leaf_without_path_identifier_is_rejected() {
        let tree = ReportNode::from_json(
            r#"{
                "name": "root", "type": "directory", "children": [
                    {"name": "orphan.py", "type": "file", "dependencies": []}
                ]
            }"#,
        )
        .unwrap();

        let err = Extractor::default().extract(&tree).unwrap_err();
        assert_eq!(
            err,
            Error::Validation(ValidationError::MissingPath {
                name: "orphan.py".to_string()
            })
        );
    }

    #[test]
    fn preserves_preorder_and_enumeration_order() {
        let tree = ReportNode::from_json(
            r#"{
                "name": "root", "type": "directory", "children": [
                    {"name": "sub", "type": "directory", "children": [
                        {"name": "a", "type": "file", "full_path": "root/sub/a",
                         "dependencies": ["z", "y"]}
                    ]},
                    {"name": "b", "type": "file", "full_path": "root/b",
                     "dependencies": ["x"]}
                ]
            }"#,
        )
        .unwrap();

        let data = Extractor::default().extract(&tree).unwrap();
        let ids: Vec<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["root/sub/a", "root/b"]);
        let sources: Vec<&str> = data.links.iter().map(|l| l.source.as_str()).collect();
        assert_eq!(sources, ["z", "y", "x"]);
    }
}
