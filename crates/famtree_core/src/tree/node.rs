//! Built family tree read model.
//!
//! # Responsibility
//! - Hold the immutable node arena produced by the tree builder.
//! - Answer structural queries (children, spouse, descendants, reachability).
//!
//! # Invariants
//! - Nodes are never mutated after `build` returns.
//! - `children` edges form a tree below the root; spouse links are annotations
//!   and are never walked as edges.
//! - Every walk over `children` carries a visited guard, so records caught in a
//!   parent-link cycle can never make a walk loop.

use crate::model::member::MemberId;

/// Name used by the synthetic root when no generation-0 record exists.
pub const FALLBACK_ROOT_NAME: &str = "Family Tree";

/// Position of one node inside a [`FamilyTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Optional display attributes copied from the source record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberAttributes {
    pub birth_year: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// One node of the built family tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub attributes: MemberAttributes,
    /// Source record id. `None` only for the synthetic fallback root.
    pub member_id: Option<MemberId>,
    /// Ordered children, in input record order.
    pub children: Vec<NodeId>,
    /// Non-owning, symmetric spouse association.
    pub spouse: Option<NodeId>,
}

impl TreeNode {
    pub(crate) fn new(
        name: String,
        attributes: MemberAttributes,
        member_id: Option<MemberId>,
    ) -> Self {
        Self {
            name,
            attributes,
            member_id,
            children: Vec::new(),
            spouse: None,
        }
    }

    /// Returns whether this node has at least one child edge.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Link diagnostics collected while building a tree.
///
/// None of these are errors; hand-entered family data is expected to be
/// imperfect and the builder drops what it cannot honor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of input records.
    pub records: usize,
    /// `parent_id` values that did not resolve to a record.
    pub dangling_parents: usize,
    /// `spouse_id` values that did not resolve to a record.
    pub dangling_spouses: usize,
    /// Links pointing a record at itself.
    pub self_links: usize,
    /// Record nodes reachable neither as a child nor as a reachable node's spouse.
    pub detached: usize,
}

/// Immutable rooted family tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
    fallback_root: bool,
    reachable: Vec<bool>,
    stats: BuildStats,
}

impl FamilyTree {
    pub(crate) fn from_parts(
        nodes: Vec<TreeNode>,
        root: NodeId,
        fallback_root: bool,
        mut stats: BuildStats,
    ) -> Self {
        let mut tree = Self {
            reachable: vec![false; nodes.len()],
            nodes,
            root,
            fallback_root,
            stats,
        };
        for id in tree.descendants(root) {
            tree.reachable[id.0] = true;
        }

        let mut attached = tree.reachable.clone();
        for (index, is_reachable) in tree.reachable.iter().enumerate() {
            if let (true, Some(spouse)) = (*is_reachable, tree.nodes[index].spouse) {
                attached[spouse.0] = true;
            }
        }
        stats.detached = tree
            .nodes
            .iter()
            .zip(attached.iter())
            .filter(|(node, attached)| node.member_id.is_some() && !**attached)
            .count();
        tree.stats = stats;
        tree
    }

    /// Returns the root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the root node.
    pub fn root_node(&self) -> &TreeNode {
        &self.nodes[self.root.0]
    }

    /// Returns whether the root is the synthetic fallback placeholder.
    pub fn is_fallback_root(&self) -> bool {
        self.fallback_root
    }

    /// Returns one node by id.
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Returns whether `id` is reachable from the root via `children`.
    pub fn contains(&self, id: NodeId) -> bool {
        self.reachable.get(id.0).copied().unwrap_or(false)
    }

    /// Iterates direct children of `id` in insertion order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &TreeNode)> + '_ {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |child| (*child, &self.nodes[child.0]))
    }

    /// Returns the spouse of `id`, if linked.
    pub fn spouse(&self, id: NodeId) -> Option<(NodeId, &TreeNode)> {
        let spouse = self.node(id)?.spouse?;
        Some((spouse, &self.nodes[spouse.0]))
    }

    /// Returns `id` followed by all of its descendants in pre-order.
    ///
    /// Returns an empty list for ids outside the arena.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if id.0 >= self.nodes.len() {
            return order;
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if visited[current.0] {
                continue;
            }
            visited[current.0] = true;
            order.push(current);
            // Reverse so the first child is popped first.
            for child in self.nodes[current.0].children.iter().rev() {
                if !visited[child.0] {
                    stack.push(*child);
                }
            }
        }
        order
    }

    /// Returns every node reachable from the root, in pre-order.
    pub fn reachable(&self) -> Vec<NodeId> {
        self.descendants(self.root)
    }

    /// Returns the number of nodes reachable from the root.
    pub fn reachable_len(&self) -> usize {
        self.reachable.iter().filter(|value| **value).count()
    }

    /// Finds the first reachable node with `name`, in pre-order.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.reachable()
            .into_iter()
            .find(|id| self.nodes[id.0].name == name)
    }

    /// Finds the node built from record `member_id`.
    pub fn find_by_member(&self, member_id: MemberId) -> Option<NodeId> {
        self.nodes
            .iter()
            .rposition(|node| node.member_id == Some(member_id))
            .map(NodeId)
    }

    /// Returns link diagnostics collected during the build.
    pub fn stats(&self) -> BuildStats {
        self.stats
    }
}
