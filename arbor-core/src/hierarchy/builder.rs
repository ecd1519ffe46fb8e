//! Path Hierarchy Builder
//!
//! Turns the flat report form (records named by delimiter-joined paths) into
//! a rooted [`Hierarchy`], and converts the nested report form into the same
//! canonical shape.
//!
//! # Algorithm
//!
//! Records are processed in input order. For each full name:
//!
//! 1. If the lookup table already has a node for that exact name, reuse it.
//!
//! 2. Otherwise create one, then split the name on the last delimiter
//!    occurrence and recursively ensure the parent path exists, synthesizing
//!    ancestors with empty payload as needed.
//!
//! 3. Once a parent is resolved, the node's display name is rewritten to
//!    just its final segment. The rewrite happens on the builder's own
//!    nodes; caller records are never mutated.
//!
//! 4. A name with no delimiter becomes the root. A second such name is a
//!    structural error.
//!
//! A record that is a prefix of another record's path ends up as an internal
//! node even without an explicit record of its own; a later record for that
//! name fills in its payload.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Result, StructuralError, ValidationError};
use crate::hierarchy::node::{Hierarchy, Node, NodeId, NodeKind};
use crate::report::{FlatRecord, ReportKind, ReportNode};

/// Builds a [`Hierarchy`] from flat, delimiter-named records.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyBuilder {
    delimiter: char,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new('.')
    }
}

/// Working state owned by a single `build` call. The table owns no nodes it
/// did not create; parent relations are assigned explicitly below.
struct BuildState {
    nodes: Vec<Node>,
    by_path: IndexMap<String, NodeId>,
    /// Paths that arrived as explicit records, as opposed to synthesized
    /// ancestors. Used to tell payload conflicts from prefix fill-in.
    recorded: IndexMap<String, ()>,
    root: Option<NodeId>,
}

impl HierarchyBuilder {
    /// Create a builder splitting names on the given delimiter.
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Build a rooted tree from the given records.
    pub fn build(&self, records: &[FlatRecord]) -> Result<Hierarchy> {
        let mut state = BuildState {
            nodes: Vec::with_capacity(records.len()),
            by_path: IndexMap::with_capacity(records.len()),
            recorded: IndexMap::new(),
            root: None,
        };

        for (index, record) in records.iter().enumerate() {
            if record.name.is_empty() {
                return Err(ValidationError::EmptyName { index }.into());
            }
            let id = self.ensure_path(&mut state, &record.name)?;
            Self::attach_payload(&mut state, id, record)?;
        }

        let root = state.root.ok_or_else(|| ValidationError::MalformedReport {
            message: "report contains no records".to_string(),
        })?;

        // A node that acquired children is a grouping node. Dependencies on
        // such a node have no leaf to hang off and are rejected.
        for index in 0..state.nodes.len() {
            if !state.nodes[index].children().is_empty() {
                if !state.nodes[index].dependencies().is_empty() {
                    return Err(StructuralError::DependenciesOnParent {
                        path: state.nodes[index].path().to_string(),
                    }
                    .into());
                }
                state.nodes[index].set_kind(NodeKind::Directory);
            }
        }

        debug!(
            records = records.len(),
            nodes = state.nodes.len(),
            "built hierarchy"
        );

        Ok(Hierarchy::from_parts(
            state.nodes,
            state.by_path,
            root,
            self.delimiter,
        ))
    }

    /// Ensure a node exists for `path`, creating it and its ancestors as
    /// needed. Re-insertion of an existing path returns the existing id.
    fn ensure_path(&self, state: &mut BuildState, path: &str) -> Result<NodeId> {
        if let Some(&id) = state.by_path.get(path) {
            return Ok(id);
        }

        let id = NodeId::from_index(state.nodes.len());
        state
            .nodes
            .push(Node::new(id, path.to_string(), path.to_string(), NodeKind::Leaf));
        state.by_path.insert(path.to_string(), id);

        match path.rfind(self.delimiter) {
            Some(split) => {
                let parent = self.ensure_path(state, &path[..split])?;
                state.nodes[parent.index()].push_child(id);
                state.nodes[id.index()].set_parent(parent);
                state.nodes[id.index()].set_name(path[split + self.delimiter.len_utf8()..].to_string());
            }
            None => {
                if let Some(existing) = state.root {
                    return Err(StructuralError::MultipleRoots {
                        first: state.nodes[existing.index()].path().to_string(),
                        second: path.to_string(),
                    }
                    .into());
                }
                state.root = Some(id);
            }
        }

        Ok(id)
    }

    /// Attach a record's payload to its node. A second record for the same
    /// full name is tolerated only when its payload is identical.
    fn attach_payload(state: &mut BuildState, id: NodeId, record: &FlatRecord) -> Result<()> {
        let seen_before = state.recorded.insert(record.name.clone(), ()).is_some();
        let node = &mut state.nodes[id.index()];

        if seen_before {
            let same = node.dependencies() == record.dependencies.as_slice()
                && node.explanation() == record.explanation.as_deref()
                && node.times_called() == record.times_called;
            if !same {
                return Err(StructuralError::AmbiguousPath {
                    path: record.name.clone(),
                }
                .into());
            }
            return Ok(());
        }

        node.set_dependencies(record.dependencies.clone());
        node.set_explanation(record.explanation.clone());
        node.set_times_called(record.times_called);
        Ok(())
    }
}

impl Hierarchy {
    /// Convert a nested report tree into the canonical form.
    ///
    /// Paths are joined with `/`, preferring the report's own `full_path`
    /// when present. An external target's path is its display name.
    pub fn from_report(tree: &ReportNode) -> Result<Self> {
        let mut nodes = Vec::new();
        let mut by_path = IndexMap::new();
        let root = convert_report(tree, None, "", &mut nodes, &mut by_path)?;

        debug!(nodes = nodes.len(), "converted nested report");

        Ok(Hierarchy::from_parts(nodes, by_path, root, '/'))
    }
}

fn convert_report(
    report: &ReportNode,
    parent: Option<NodeId>,
    prefix: &str,
    nodes: &mut Vec<Node>,
    by_path: &mut IndexMap<String, NodeId>,
) -> Result<NodeId> {
    let path = match report.kind {
        ReportKind::External => report.name.clone(),
        _ => report.full_path.clone().unwrap_or_else(|| {
            if prefix.is_empty() {
                report.name.clone()
            } else {
                format!("{}/{}", prefix, report.name)
            }
        }),
    };

    let kind = match report.kind {
        ReportKind::Directory => NodeKind::Directory,
        ReportKind::File => NodeKind::File,
        ReportKind::External => NodeKind::External,
    };

    if kind != NodeKind::Directory && !report.children.is_empty() {
        return Err(StructuralError::ChildrenOnLeaf { path }.into());
    }
    let dependencies = report.dependencies.clone().unwrap_or_default();
    if kind == NodeKind::Directory && !dependencies.is_empty() {
        return Err(StructuralError::DependenciesOnParent { path }.into());
    }
    if by_path.contains_key(&path) {
        return Err(StructuralError::AmbiguousPath { path }.into());
    }

    let id = NodeId::from_index(nodes.len());
    let mut node = Node::new(id, path.clone(), report.name.clone(), kind);
    node.set_dependencies(dependencies);
    node.set_explanation(report.explanation.clone());
    node.set_times_called(report.times_called);
    if let Some(parent) = parent {
        node.set_parent(parent);
    }
    nodes.push(node);
    by_path.insert(path.clone(), id);
    if let Some(parent) = parent {
        nodes[parent.index()].push_child(id);
    }

    for child in &report.children {
        convert_report(child, Some(id), &path, nodes, by_path)?;
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn record(name: &str) -> FlatRecord {
        FlatRecord {
            name: name.to_string(),
            dependencies: Vec::new(),
            explanation: None,
            times_called: None,
        }
    }

    fn record_with_deps(name: &str, deps: &[&str]) -> FlatRecord {
        FlatRecord {
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            ..record(name)
        }
    }

    #[test]
    fn builds_nested_tree_from_flat_records() {
        let records = vec![record("a.b.c"), record("a.b.d"), record("a.e")];
        let tree = HierarchyBuilder::default().build(&records).unwrap();

        let root = tree.root_node();
        assert_eq!(root.path(), "a");
        assert_eq!(root.name(), "a");
        assert_eq!(root.kind(), NodeKind::Directory);
        assert_eq!(root.children().len(), 2);

        let b = tree.get("a.b").unwrap();
        assert_eq!(b.name(), "b");
        assert_eq!(b.children().len(), 2);
        assert_eq!(tree.get("a.b.c").unwrap().name(), "c");
        assert_eq!(tree.get("a.b.d").unwrap().name(), "d");
        assert_eq!(tree.get("a.e").unwrap().name(), "e");
    }

    #[test]
    fn traversal_yields_every_record_name_exactly_once() {
        let records = vec![record("a.b.c"), record("a.b.d"), record("a.e"), record("a")];
        let tree = HierarchyBuilder::default().build(&records).unwrap();

        let paths: Vec<&str> = tree
            .descendants()
            .into_iter()
            .map(|id| tree.node(id).path())
            .collect();

        for record in &records {
            assert_eq!(
                paths.iter().filter(|p| **p == record.name).count(),
                1,
                "expected exactly one node for {}",
                record.name
            );
        }
    }

    #[test]
    fn prefix_records_are_synthesized_as_directories() {
        let records = vec![record("a.b.c")];
        let tree = HierarchyBuilder::default().build(&records).unwrap();

        // "a" and "a.b" have no explicit records but exist as internal nodes.
        assert_eq!(tree.len(), 3);
        let b = tree.get("a.b").unwrap();
        assert_eq!(b.kind(), NodeKind::Directory);
        assert!(b.dependencies().is_empty());
        assert!(b.explanation().is_none());
    }

    #[test]
    fn late_record_fills_in_synthesized_node() {
        let records = vec![
            record("a.b"),
            FlatRecord {
                explanation: Some("the root".to_string()),
                ..record("a")
            },
        ];
        let tree = HierarchyBuilder::default().build(&records).unwrap();
        let root = tree.root_node();
        assert_eq!(root.explanation(), Some("the root"));
        assert_eq!(root.kind(), NodeKind::Directory);
    }

    #[test]
    fn identical_duplicate_records_reuse_the_node() {
        let records = vec![record("a.b"), record("a.b")];
        let tree = HierarchyBuilder::default().build(&records).unwrap();
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn conflicting_duplicate_records_are_ambiguous() {
        let records = vec![record("a.b"), record_with_deps("a.b", &["a.c"])];
        let err = HierarchyBuilder::default().build(&records).unwrap_err();
        assert_eq!(
            err,
            Error::Structural(StructuralError::AmbiguousPath {
                path: "a.b".to_string()
            })
        );
    }

    #[test]
    fn second_root_is_rejected() {
        let records = vec![record("a.b"), record("x.y")];
        let err = HierarchyBuilder::default().build(&records).unwrap_err();
        assert!(matches!(
            err,
            Error::Structural(StructuralError::MultipleRoots { .. })
        ));
    }

    #[test]
    fn dependencies_on_a_parent_are_rejected() {
        let records = vec![record_with_deps("a.b", &["a.e"]), record("a.b.c")];
        let err = HierarchyBuilder::default().build(&records).unwrap_err();
        assert_eq!(
            err,
            Error::Structural(StructuralError::DependenciesOnParent {
                path: "a.b".to_string()
            })
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let records = vec![record("a.b"), record("")];
        let err = HierarchyBuilder::default().build(&records).unwrap_err();
        assert_eq!(
            err,
            Error::Validation(ValidationError::EmptyName { index: 1 })
        );
    }

    #[test]
    fn no_records_is_rejected() {
        let err = HierarchyBuilder::default().build(&[]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn custom_delimiter() {
        let records = vec![record("src/lib/util"), record("src/main")];
        let tree = HierarchyBuilder::new('/').build(&records).unwrap();
        assert_eq!(tree.root_node().path(), "src");
        assert_eq!(tree.get("src/lib/util").unwrap().name(), "util");
    }

    #[test]
    fn converts_nested_report() {
        let json = r#"{
            "name": "root",
            "type": "directory",
            "children": [
                {"name": "sub", "type": "directory", "children": [
                    {"name": "x.py", "type": "file", "full_path": "root/sub/x.py",
                     "dependencies": ["lib"], "times_called": 2}
                ]},
                {"name": "lib", "type": "External dependency", "dependencies": []}
            ]
        }"#;
        let report = ReportNode::from_json(json).unwrap();
        let tree = Hierarchy::from_report(&report).unwrap();

        assert_eq!(tree.root_node().kind(), NodeKind::Directory);
        let file = tree.get("root/sub/x.py").unwrap();
        assert_eq!(file.kind(), NodeKind::File);
        assert_eq!(file.name(), "x.py");
        assert_eq!(file.dependencies(), ["lib".to_string()]);
        assert_eq!(file.times_called(), Some(2));

        // External targets are keyed by their display name.
        let lib = tree.get("lib").unwrap();
        assert_eq!(lib.kind(), NodeKind::External);
        assert_eq!(lib.path(), lib.name());
    }

    #[test]
    fn nested_file_with_children_is_rejected() {
        let json = r#"{
            "name": "root", "type": "directory", "children": [
                {"name": "x", "type": "file", "full_path": "root/x",
                 "children": [{"name": "y", "type": "file", "full_path": "root/x/y"}]}
            ]
        }"#;
        let report = ReportNode::from_json(json).unwrap();
        let err = Hierarchy::from_report(&report).unwrap_err();
        assert_eq!(
            err,
            Error::Structural(StructuralError::ChildrenOnLeaf {
                path: "root/x".to_string()
            })
        );
    }
}
