//! Expand/collapse visibility state.
//!
//! # Responsibility
//! - Derive the initial fully expanded state from a built tree.
//! - Apply user toggles as pure state transitions.
//!
//! # Invariants
//! - State is keyed by node name.
//! - `toggle` never mutates its input; it returns the next state.
//! - Collapsing removes the whole subtree from the expanded set and remembers
//!   which descendants were expanded at that moment.
//! - Expanding restores the toggled node plus exactly the descendants it
//!   remembered; descendants that were already collapsed stay collapsed.
//! - A later toggle of a descendant overrides what any ancestor remembered
//!   about it.
//! - Nodes not reachable from the root are never toggled.

use crate::tree::node::{FamilyTree, NodeId};
use std::collections::{BTreeMap, BTreeSet};

/// Set of expanded node names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityState {
    expanded: BTreeSet<String>,
    /// Collapsed node name -> descendant names that were expanded when it collapsed.
    remembered: BTreeMap<String, BTreeSet<String>>,
}

/// One row a renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub node: NodeId,
    /// Zero for the root.
    pub depth: usize,
}

impl VisibilityState {
    /// Returns the fully expanded state for `tree`.
    pub fn initialize(tree: &FamilyTree) -> Self {
        let expanded = tree
            .reachable()
            .into_iter()
            .filter_map(|id| tree.node(id))
            .map(|node| node.name.clone())
            .collect();
        Self {
            expanded,
            remembered: BTreeMap::new(),
        }
    }

    /// Returns the state after the user toggled `node`.
    pub fn toggle(&self, tree: &FamilyTree, node: NodeId) -> Self {
        if !tree.contains(node) {
            return self.clone();
        }
        let Some(target) = tree.node(node) else {
            return self.clone();
        };

        let mut next = self.clone();
        // The latest toggle owns this node's state; older memories drop it.
        for (owner, memory) in next.remembered.iter_mut() {
            if *owner != target.name {
                memory.remove(&target.name);
            }
        }

        if next.expanded.remove(&target.name) {
            let mut memory = BTreeSet::new();
            for id in tree.descendants(node).into_iter().skip(1) {
                if let Some(descendant) = tree.node(id) {
                    if next.expanded.remove(&descendant.name) {
                        memory.insert(descendant.name.clone());
                    }
                }
            }
            next.remembered.insert(target.name.clone(), memory);
        } else {
            next.expanded.insert(target.name.clone());
            if let Some(memory) = next.remembered.remove(&target.name) {
                next.expanded.extend(memory);
            }
        }
        next
    }

    /// Toggles the first reachable node named `name`.
    ///
    /// Unknown names leave the state unchanged.
    pub fn toggle_name(&self, tree: &FamilyTree, name: &str) -> Self {
        match tree.find_by_name(name) {
            Some(node) => self.toggle(tree, node),
            None => self.clone(),
        }
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Iterates expanded names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    /// Returns the rows to draw, in pre-order.
    ///
    /// The root is always visible; children of a node are visible only while
    /// that node is visible and expanded.
    pub fn visible_rows(&self, tree: &FamilyTree) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let mut stack = vec![VisibleRow {
            node: tree.root(),
            depth: 0,
        }];
        let mut visited = BTreeSet::new();

        while let Some(row) = stack.pop() {
            if !visited.insert(row.node) {
                continue;
            }
            let Some(node) = tree.node(row.node) else {
                continue;
            };
            rows.push(row);
            if !self.is_expanded(&node.name) {
                continue;
            }
            for child in node.children.iter().rev() {
                stack.push(VisibleRow {
                    node: *child,
                    depth: row.depth + 1,
                });
            }
        }
        rows
    }
}
