//! Two-pass tree builder.
//!
//! # Responsibility
//! - Turn a flat member record list into one rooted [`FamilyTree`].
//! - Cross-link spouses symmetrically without making them tree edges.
//!
//! # Invariants
//! - Pure transformation: no I/O, never fails.
//! - Root is the last record with no parent and generation 0; when none
//!   exists a synthetic `"Family Tree"` root with no children is used.
//! - Children keep input record order.
//! - Dangling or self-referencing links are dropped and counted.

use crate::model::member::{MemberId, MemberRecord};
use crate::tree::node::{
    BuildStats, FamilyTree, MemberAttributes, NodeId, TreeNode, FALLBACK_ROOT_NAME,
};
use log::{debug, warn};
use std::collections::HashMap;

/// Builds the family tree for `records`.
///
/// # Side effects
/// - Emits a `tree_build` debug event with link statistics, and a warning
///   when records end up detached from the root.
pub fn build(records: &[MemberRecord]) -> FamilyTree {
    let mut nodes = Vec::with_capacity(records.len() + 1);
    let mut by_id: HashMap<MemberId, NodeId> = HashMap::with_capacity(records.len());

    for record in records {
        let id = NodeId(nodes.len());
        nodes.push(TreeNode::new(
            record.name.clone(),
            attributes_of(record),
            Some(record.id),
        ));
        // Duplicate ids: the later record owns the id.
        by_id.insert(record.id, id);
    }

    let mut stats = BuildStats {
        records: records.len(),
        ..BuildStats::default()
    };
    let mut root = None;

    for (index, record) in records.iter().enumerate() {
        let current = NodeId(index);

        if record.is_root_candidate() {
            root = Some(current);
        }

        if let Some(spouse_id) = record.spouse_id {
            match by_id.get(&spouse_id) {
                Some(&target) if target == current || spouse_id == record.id => {
                    stats.self_links += 1;
                }
                Some(&target) => link_spouses(&mut nodes, current, target),
                None => stats.dangling_spouses += 1,
            }
        }

        if let Some(parent_id) = record.parent_id {
            match by_id.get(&parent_id) {
                Some(&parent) if parent == current || parent_id == record.id => {
                    stats.self_links += 1;
                }
                Some(&parent) => nodes[parent.0].children.push(current),
                None => stats.dangling_parents += 1,
            }
        }
    }

    let (root, fallback_root) = match root {
        Some(root) => (root, false),
        None => {
            let id = NodeId(nodes.len());
            nodes.push(TreeNode::new(
                FALLBACK_ROOT_NAME.to_string(),
                MemberAttributes::default(),
                None,
            ));
            (id, true)
        }
    };

    let tree = FamilyTree::from_parts(nodes, root, fallback_root, stats);
    let stats = tree.stats();
    debug!(
        "event=tree_build module=tree status=ok records={} reachable={} fallback_root={} dangling_parents={} dangling_spouses={} self_links={} detached={}",
        stats.records,
        tree.reachable_len(),
        fallback_root,
        stats.dangling_parents,
        stats.dangling_spouses,
        stats.self_links,
        stats.detached
    );
    if stats.detached > 0 && !fallback_root {
        warn!(
            "event=tree_build module=tree status=partial detached={}",
            stats.detached
        );
    }
    tree
}

fn attributes_of(record: &MemberRecord) -> MemberAttributes {
    MemberAttributes {
        birth_year: record.birth_year.clone(),
        phone_number: record.phone_number.clone(),
        address: record.address.clone(),
        notes: record.notes.clone(),
    }
}

/// Links `a` and `b` as spouses, unlinking any previous partner of either
/// side so the association stays symmetric.
fn link_spouses(nodes: &mut [TreeNode], a: NodeId, b: NodeId) {
    for side in [a, b] {
        if let Some(previous) = nodes[side.0].spouse.take() {
            if nodes[previous.0].spouse == Some(side) {
                nodes[previous.0].spouse = None;
            }
        }
    }
    nodes[a.0].spouse = Some(b);
    nodes[b.0].spouse = Some(a);
}
