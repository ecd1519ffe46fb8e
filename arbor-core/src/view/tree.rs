//! Collapsible View Tree
//!
//! Wraps a [`Hierarchy`] snapshot in per-node view state: an expand/collapse
//! state machine and the position bookkeeping the reconciler needs to
//! animate transitions.
//!
//! # The Child State Machine
//!
//! Each node is in exactly one of three states:
//!
//! - `Leaf`: nothing to expand.
//! - `Expanded(children)`: children are visible.
//! - `Collapsed(children)`: children are hidden but retained.
//!
//! A toggle moves the child list between the two non-leaf states without
//! copying it, so toggling twice restores the original state exactly. The
//! tagged representation makes "both populated" and "neither populated"
//! unrepresentable.
//!
//! # Identity
//!
//! A [`ViewId`] is assigned once when the view tree is built and never
//! reused, so reconciliation can match nodes across updates by id alone.
//! View state lives for the life of the displayed diagram and is discarded
//! wholesale when a new report is loaded.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::hierarchy::{Hierarchy, NodeId, NodeKind};

/// Index of a node within a [`ViewTree`]. Stable for the tree's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u32);

impl ViewId {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the raw index value.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which nodes start expanded when a view tree is built.
///
/// The root is always expanded regardless of the rule.
#[derive(Clone, Default)]
pub enum ExpandRule {
    /// Every non-root node starts collapsed.
    #[default]
    CollapseAll,

    /// Every node starts expanded.
    ExpandAll,

    /// Nodes shallower than the given depth start expanded.
    ToDepth(usize),

    /// Custom predicate over the node's display name and depth.
    Custom(Arc<dyn Fn(&str, usize) -> bool + Send + Sync>),
}

impl ExpandRule {
    fn wants_expanded(&self, name: &str, depth: usize) -> bool {
        match self {
            ExpandRule::CollapseAll => false,
            ExpandRule::ExpandAll => true,
            ExpandRule::ToDepth(limit) => depth < *limit,
            ExpandRule::Custom(predicate) => predicate(name, depth),
        }
    }
}

impl fmt::Debug for ExpandRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandRule::CollapseAll => write!(f, "CollapseAll"),
            ExpandRule::ExpandAll => write!(f, "ExpandAll"),
            ExpandRule::ToDepth(limit) => write!(f, "ToDepth({limit})"),
            ExpandRule::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Configuration for building a [`ViewTree`].
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Initial expansion rule.
    pub expand: ExpandRule,

    /// Drop root-level external-dependency nodes from the view. The
    /// collapsible tree shows project structure; external targets belong to
    /// the graph views.
    pub skip_external: bool,

    /// Transition duration handed back in plans.
    pub duration: Duration,

    /// Duration for the deliberately slowed inspection transition.
    pub slow_duration: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            expand: ExpandRule::CollapseAll,
            skip_external: true,
            duration: Duration::from_millis(250),
            slow_duration: Duration::from_millis(2500),
        }
    }
}

/// Expand/collapse state of a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildState {
    /// Terminal node; nothing to expand.
    Leaf,

    /// Children are visible.
    Expanded(Vec<ViewId>),

    /// Children are hidden but retained for re-expansion.
    Collapsed(Vec<ViewId>),
}

/// A node of the view tree.
#[derive(Debug, Clone)]
pub struct ViewNode {
    id: ViewId,
    name: String,
    path: String,
    kind: NodeKind,
    depth: usize,
    parent: Option<ViewId>,
    explanation: Option<String>,
    state: ChildState,
    x: f64,
    y: f64,
    x0: f64,
    y0: f64,
}

impl ViewNode {
    /// Get the node's stable view id.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Get the node's display label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the full path of the wrapped hierarchy node.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the wrapped node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Depth below the root (the root is 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Parent view id, `None` for the root.
    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    /// Description shown when the node is hovered.
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Current expand/collapse state.
    pub fn state(&self) -> &ChildState {
        &self.state
    }

    /// Whether the node is currently expanded.
    pub fn is_expanded(&self) -> bool {
        matches!(self.state, ChildState::Expanded(_))
    }

    /// Children currently visible. Empty for leaves and collapsed nodes.
    pub fn visible_children(&self) -> &[ViewId] {
        match &self.state {
            ChildState::Expanded(children) => children,
            _ => &[],
        }
    }

    /// Children retained while collapsed. Empty otherwise.
    pub fn saved_children(&self) -> &[ViewId] {
        match &self.state {
            ChildState::Collapsed(children) => children,
            _ => &[],
        }
    }

    /// Current layout position.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Anchor position captured at the end of the previous transition.
    pub fn anchor(&self) -> (f64, f64) {
        (self.x0, self.y0)
    }

    pub(crate) fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub(crate) fn set_anchor(&mut self, x: f64, y: f64) {
        self.x0 = x;
        self.y0 = y;
    }

    pub(crate) fn commit_anchor(&mut self) {
        self.x0 = self.x;
        self.y0 = self.y;
    }
}

/// Per-diagram view state over a hierarchy snapshot.
#[derive(Debug, Clone)]
pub struct ViewTree {
    nodes: Vec<ViewNode>,
    root: ViewId,
    config: ViewConfig,
}

impl ViewTree {
    /// Snapshot a hierarchy into view nodes, applying the initial expansion
    /// rule. The root is always expanded.
    pub fn new(hierarchy: &Hierarchy, config: ViewConfig) -> Self {
        let mut nodes = Vec::with_capacity(hierarchy.len());
        let root = build_view(hierarchy, hierarchy.root(), None, 0, &config, &mut nodes);
        Self {
            nodes,
            root,
            config,
        }
    }

    /// Get the root id.
    pub fn root(&self) -> ViewId {
        self.root
    }

    /// Get a node by id.
    pub fn node(&self, id: ViewId) -> &ViewNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: ViewId) -> &mut ViewNode {
        &mut self.nodes[id.index()]
    }

    /// Total number of view nodes, hidden ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the view holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The configuration the view was built with.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Toggle a node between expanded and collapsed.
    ///
    /// The child list is moved, not copied, so a second toggle restores the
    /// exact original state. Toggling a leaf is a no-op; the return value
    /// reports whether anything changed.
    pub fn toggle(&mut self, id: ViewId) -> bool {
        let node = &mut self.nodes[id.index()];
        let state = std::mem::replace(&mut node.state, ChildState::Leaf);
        let (next, changed) = match state {
            ChildState::Leaf => (ChildState::Leaf, false),
            ChildState::Expanded(children) => (ChildState::Collapsed(children), true),
            ChildState::Collapsed(children) => (ChildState::Expanded(children), true),
        };
        node.state = next;
        changed
    }

    /// Set a node's anchor directly. Used by the host to seed the position
    /// the very first transition grows out of.
    pub fn set_anchor(&mut self, id: ViewId, x: f64, y: f64) {
        self.nodes[id.index()].set_anchor(x, y);
    }

    /// Ids of all currently visible nodes in pre-order, depth-first order.
    pub fn visible(&self) -> Vec<ViewId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let children = self.nodes[id.index()].visible_children();
            for &child in children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

fn build_view(
    hierarchy: &Hierarchy,
    node_id: NodeId,
    parent: Option<ViewId>,
    depth: usize,
    config: &ViewConfig,
    out: &mut Vec<ViewNode>,
) -> ViewId {
    let node = hierarchy.node(node_id);
    let id = ViewId::from_index(out.len());
    out.push(ViewNode {
        id,
        name: node.name().to_string(),
        path: node.path().to_string(),
        kind: node.kind(),
        depth,
        parent,
        explanation: node.explanation().map(str::to_string),
        state: ChildState::Leaf,
        x: 0.0,
        y: 0.0,
        x0: 0.0,
        y0: 0.0,
    });

    let mut children = Vec::new();
    for &child in node.children() {
        if depth == 0 && config.skip_external && hierarchy.node(child).kind() == NodeKind::External
        {
            continue;
        }
        children.push(build_view(hierarchy, child, Some(id), depth + 1, config, out));
    }

    if !children.is_empty() {
        let expanded = depth == 0 || config.expand.wants_expanded(node.name(), depth);
        out[id.index()].state = if expanded {
            ChildState::Expanded(children)
        } else {
            ChildState::Collapsed(children)
        };
    }

    id
}
