//! Tree Reconciliation
//!
//! Produces the keyed enter/update/exit diff that lets the collapsible tree
//! animate between states instead of popping.
//!
//! # Matching
//!
//! Each `update` flattens the currently visible nodes and matches them
//! against the previous flattened list by stable view id:
//!
//! - present only in the next list: **enter**, materialized at the toggled
//!   node's pre-transition anchor and animating out to its computed position.
//! - present in both: **update**, animating from its own anchor to its
//!   newly computed position.
//! - present only in the previous list: **exit**, animating from where it
//!   last stood toward the toggled node's new position, then removed.
//!
//! # Anchors
//!
//! After planning, every visible node's anchor is set to its just-computed
//! position, so the next transition originates from where this one ends.
//!
//! # Transitions
//!
//! The reconciler hands back instructions and a duration; interpolation is
//! the host's cancellable task. At most one transition is considered active:
//! planning a new one supersedes the previous plan (last-writer-wins), and
//! the superseded id is returned so the host can cancel its animation.
//! Positions come from the [`Layout`] seam; this core never computes pixel
//! coordinates itself.

use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

use crate::view::tree::{ViewId, ViewNode, ViewTree};

/// Identifier of a planned transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionId(u64);

/// How fast the transition should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pace {
    /// The ordinary interaction duration.
    #[default]
    Normal,

    /// The slowed-down duration used for close inspection.
    Slow,
}

/// Position provider for visible nodes.
///
/// Implemented by the rendering layer. `order` is the node's rank in the
/// flattened visible list; together with [`ViewNode::depth`] that is enough
/// for the usual tidy-tree placements.
pub trait Layout {
    /// Compute the position for one visible node.
    fn position(&mut self, node: &ViewNode, order: usize) -> (f64, f64);
}

impl<F> Layout for F
where
    F: FnMut(&ViewNode, usize) -> (f64, f64),
{
    fn position(&mut self, node: &ViewNode, order: usize) -> (f64, f64) {
        self(node, order)
    }
}

/// One node's part in a transition: where it starts and where it ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedNode {
    /// The node being animated.
    pub id: ViewId,
    /// Position the animation starts from.
    pub from: (f64, f64),
    /// Position the animation ends at.
    pub to: (f64, f64),
}

/// Instructions for one animated transition.
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    /// Identity of this transition.
    pub id: TransitionId,

    /// The in-flight transition this plan supersedes, if any. The host
    /// cancels its animation; the bookkeeping here is already consistent.
    pub superseded: Option<TransitionId>,

    /// How long the host should animate.
    pub duration: Duration,

    /// Nodes appearing in this transition.
    pub enter: Vec<PlannedNode>,

    /// Nodes surviving from the previous state.
    pub update: Vec<PlannedNode>,

    /// Nodes leaving in this transition.
    pub exit: Vec<PlannedNode>,

    /// Visible `(parent, child)` pairs, in child pre-order.
    pub links: Vec<(ViewId, ViewId)>,
}

/// Owns the diffing state across a view tree's transitions.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    previous: Vec<ViewId>,
    active: Option<TransitionId>,
    next_transition: u64,
}

impl Reconciler {
    /// Create a reconciler with no prior state; the first `update` enters
    /// every visible node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan the transition from the previously rendered state to the tree's
    /// current state, with `source` as the node the change grew out of.
    pub fn update(
        &mut self,
        tree: &mut ViewTree,
        source: ViewId,
        pace: Pace,
        layout: &mut dyn Layout,
    ) -> TransitionPlan {
        // Captured before the anchor sweep below: enter nodes grow out of
        // where the source was last seen.
        let source_anchor = tree.node(source).anchor();

        let visible = tree.visible();
        let mut positions = Vec::with_capacity(visible.len());
        for (order, &id) in visible.iter().enumerate() {
            positions.push(layout.position(tree.node(id), order));
        }
        for (&id, &(x, y)) in visible.iter().zip(&positions) {
            tree.node_mut(id).set_position(x, y);
        }
        let source_position = tree.node(source).position();

        let previous_set: HashSet<ViewId> = self.previous.iter().copied().collect();
        let visible_set: HashSet<ViewId> = visible.iter().copied().collect();

        let mut enter = Vec::new();
        let mut update = Vec::new();
        for &id in &visible {
            let node = tree.node(id);
            if previous_set.contains(&id) {
                update.push(PlannedNode {
                    id,
                    from: node.anchor(),
                    to: node.position(),
                });
            } else {
                enter.push(PlannedNode {
                    id,
                    from: source_anchor,
                    to: node.position(),
                });
            }
        }

        let mut exit = Vec::new();
        for &id in &self.previous {
            if !visible_set.contains(&id) {
                exit.push(PlannedNode {
                    id,
                    from: tree.node(id).position(),
                    to: source_position,
                });
            }
        }

        let links = visible
            .iter()
            .filter_map(|&id| tree.node(id).parent().map(|parent| (parent, id)))
            .collect();

        for &id in &visible {
            tree.node_mut(id).commit_anchor();
        }
        self.previous = visible;

        let id = TransitionId(self.next_transition);
        self.next_transition += 1;
        let superseded = self.active.replace(id);

        debug!(
            enter = enter.len(),
            update = update.len(),
            exit = exit.len(),
            superseded = superseded.is_some(),
            "planned transition"
        );

        TransitionPlan {
            id,
            superseded,
            duration: match pace {
                Pace::Normal => tree.config().duration,
                Pace::Slow => tree.config().slow_duration,
            },
            enter,
            update,
            exit,
            links,
        }
    }

    /// Mark a transition as finished. Settling a superseded transition is a
    /// no-op; the return value reports whether the active one was settled.
    pub fn settle(&mut self, id: TransitionId) -> bool {
        if self.active == Some(id) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// The transition currently considered active, if any.
    pub fn in_flight(&self) -> Option<TransitionId> {
        self.active
    }
}
