//! Hover Highlighting
//!
//! The force-graph view brightens the hovered node, its neighbors, and its
//! incident edges. The state involved is an explicit value handed into and
//! out of the event handlers, not a process-wide singleton, so the host can
//! keep it wherever it keeps the rest of its view state.

use std::collections::{HashMap, HashSet};

use crate::graph::{Edge, GraphData};

/// Neighbor and incident-edge lookup, cross-linked once per graph payload.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    neighbors: HashMap<String, Vec<String>>,
    incident: HashMap<String, Vec<Edge>>,
}

impl Adjacency {
    /// Cross-link every edge's endpoints.
    pub fn build(graph: &GraphData) -> Self {
        let mut adjacency = Self::default();
        for link in &graph.links {
            adjacency
                .neighbors
                .entry(link.source.clone())
                .or_default()
                .push(link.target.clone());
            adjacency
                .neighbors
                .entry(link.target.clone())
                .or_default()
                .push(link.source.clone());
            adjacency
                .incident
                .entry(link.source.clone())
                .or_default()
                .push(link.clone());
            adjacency
                .incident
                .entry(link.target.clone())
                .or_default()
                .push(link.clone());
        }
        adjacency
    }

    /// Ids adjacent to `id`, in edge enumeration order.
    pub fn neighbors(&self, id: &str) -> &[String] {
        self.neighbors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges touching `id`, in enumeration order.
    pub fn incident(&self, id: &str) -> &[Edge] {
        self.incident.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The set of nodes and edges currently highlighted, plus the hover focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    hovered: Option<String>,
    nodes: HashSet<String>,
    links: HashSet<Edge>,
}

impl HighlightState {
    /// The id under the cursor, if any.
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Whether the given node should render highlighted.
    pub fn is_node_highlighted(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    /// Whether the given edge should render highlighted.
    pub fn is_link_highlighted(&self, link: &Edge) -> bool {
        self.links.contains(link)
    }

    /// Whether anything is highlighted at all.
    pub fn is_empty(&self) -> bool {
        self.hovered.is_none() && self.nodes.is_empty() && self.links.is_empty()
    }

    /// The state after the cursor moves over `node` (or off every node).
    ///
    /// Re-hovering the current focus, or leaving an already-empty state
    /// empty, returns the state unchanged.
    pub fn on_node_hover(&self, adjacency: &Adjacency, node: Option<&str>) -> Self {
        let unchanged = match node {
            None => self.nodes.is_empty(),
            Some(id) => self.hovered.as_deref() == Some(id),
        };
        if unchanged {
            return self.clone();
        }

        let mut next = Self::default();
        if let Some(id) = node {
            next.nodes.insert(id.to_string());
            for neighbor in adjacency.neighbors(id) {
                next.nodes.insert(neighbor.clone());
            }
            for link in adjacency.incident(id) {
                next.links.insert(link.clone());
            }
            next.hovered = Some(id.to_string());
        }
        next
    }

    /// The state after the cursor moves over `link` (or off every link).
    pub fn on_link_hover(&self, link: Option<&Edge>) -> Self {
        let mut next = Self::default();
        if let Some(link) = link {
            next.links.insert(link.clone());
            next.nodes.insert(link.source.clone());
            next.nodes.insert(link.target.clone());
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphNode;
    use crate::report::ReportKind;

    fn graph() -> GraphData {
        let node = |id: &str| GraphNode {
            id: id.to_string(),
            name: id.to_string(),
            kind: ReportKind::File,
            times_called: None,
            explanation: None,
        };
        GraphData {
            nodes: vec![node("a"), node("b"), node("c")],
            links: vec![Edge::new("a", "b"), Edge::new("b", "c")],
        }
    }

    #[test]
    fn hovering_a_node_highlights_its_neighborhood() {
        let adjacency = Adjacency::build(&graph());
        let state = HighlightState::default().on_node_hover(&adjacency, Some("b"));

        assert_eq!(state.hovered(), Some("b"));
        assert!(state.is_node_highlighted("a"));
        assert!(state.is_node_highlighted("b"));
        assert!(state.is_node_highlighted("c"));
        assert!(state.is_link_highlighted(&Edge::new("a", "b")));
        assert!(state.is_link_highlighted(&Edge::new("b", "c")));
    }

    #[test]
    fn hovering_an_edge_highlights_its_endpoints() {
        let state = HighlightState::default().on_link_hover(Some(&Edge::new("a", "b")));

        assert!(state.is_node_highlighted("a"));
        assert!(state.is_node_highlighted("b"));
        assert!(!state.is_node_highlighted("c"));
        assert!(state.is_link_highlighted(&Edge::new("a", "b")));
        assert!(!state.is_link_highlighted(&Edge::new("b", "c")));
    }

    #[test]
    fn rehover_of_current_focus_changes_nothing() {
        let adjacency = Adjacency::build(&graph());
        let state = HighlightState::default().on_node_hover(&adjacency, Some("a"));
        let again = state.on_node_hover(&adjacency, Some("a"));
        assert_eq!(state, again);
    }

    #[test]
    fn leaving_clears_everything() {
        let adjacency = Adjacency::build(&graph());
        let state = HighlightState::default().on_node_hover(&adjacency, Some("a"));
        let cleared = state.on_node_hover(&adjacency, None);
        assert!(cleared.is_empty());

        // Leaving an already-empty state stays empty.
        let still = cleared.on_node_hover(&adjacency, None);
        assert!(still.is_empty());
    }

    #[test]
    fn isolated_node_highlights_only_itself() {
        let adjacency = Adjacency::build(&graph());
        let state = HighlightState::default().on_node_hover(&adjacency, Some("zzz"));
        assert!(state.is_node_highlighted("zzz"));
        assert!(!state.is_node_highlighted("a"));
    }
}
