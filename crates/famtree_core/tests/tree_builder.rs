use famtree_core::{build, FamilyTree, MemberId, MemberRecord, NodeId, FALLBACK_ROOT_NAME};
use std::collections::HashMap;

fn names_of_children(tree: &FamilyTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .map(|(_, node)| node.name.clone())
        .collect()
}

fn sample_family() -> Vec<MemberRecord> {
    vec![
        MemberRecord::new(1, "Eleanor", 0)
            .with_spouse(2)
            .with_birth_year("1921"),
        MemberRecord::new(2, "Walter", 1),
        MemberRecord::new(3, "Margaret", 1).with_parent(1),
        MemberRecord::new(4, "Thomas", 1)
            .with_parent(1)
            .with_spouse(5),
        MemberRecord::new(5, "Irene", 2),
        MemberRecord::new(6, "Lucy", 2).with_parent(4),
        MemberRecord::new(7, "Sam", 2).with_parent(4),
    ]
}

#[test]
fn every_record_is_reachable_as_child_or_spouse() {
    let records = sample_family();
    let tree = build(&records);

    let mut seen: HashMap<MemberId, usize> = HashMap::new();
    for id in tree.reachable() {
        let node = tree.node(id).unwrap();
        if let Some(member_id) = node.member_id {
            *seen.entry(member_id).or_default() += 1;
        }
        if let Some((spouse_id, spouse)) = tree.spouse(id) {
            if !tree.contains(spouse_id) {
                *seen.entry(spouse.member_id.unwrap()).or_default() += 1;
            }
        }
    }

    for record in &records {
        assert_eq!(seen.get(&record.id), Some(&1), "record {} not mapped once", record.id);
    }
    assert_eq!(tree.stats().detached, 0);
}

#[test]
fn root_is_generation_zero_record_without_parent() {
    let tree = build(&[
        MemberRecord::new(1, "Root", 0),
        MemberRecord::new(2, "Child", 1).with_parent(1),
    ]);

    assert_eq!(tree.root_node().name, "Root");
    assert_eq!(names_of_children(&tree, tree.root()), vec!["Child"]);
    assert!(!tree.is_fallback_root());
}

#[test]
fn missing_root_falls_back_to_placeholder() {
    let tree = build(&[
        MemberRecord::new(1, "Someone", 1),
        MemberRecord::new(2, "Child", 2).with_parent(1),
    ]);

    assert!(tree.is_fallback_root());
    assert_eq!(tree.root_node().name, FALLBACK_ROOT_NAME);
    assert!(!tree.root_node().has_children());
    assert_eq!(tree.reachable_len(), 1);
}

#[test]
fn spouse_link_is_made_symmetric() {
    let tree = build(&[
        MemberRecord::new(1, "Ada", 0).with_spouse(2),
        MemberRecord::new(2, "Bert", 0),
    ]);

    let ada = tree.find_by_member(1).unwrap();
    let bert = tree.find_by_member(2).unwrap();
    assert_eq!(tree.node(ada).unwrap().spouse, Some(bert));
    assert_eq!(tree.node(bert).unwrap().spouse, Some(ada));
}

#[test]
fn spouse_link_never_becomes_a_child_edge() {
    let tree = build(&sample_family());

    let children = names_of_children(&tree, tree.root());
    assert_eq!(children, vec!["Margaret", "Thomas"]);
    let (_, spouse) = tree.spouse(tree.root()).unwrap();
    assert_eq!(spouse.name, "Walter");
}

#[test]
fn dangling_references_are_ignored() {
    let tree = build(&[
        MemberRecord::new(1, "Root", 0).with_spouse(42),
        MemberRecord::new(2, "Lost", 1).with_parent(999),
    ]);

    let lost = tree.find_by_member(2).unwrap();
    assert!(!tree.contains(lost));
    assert_eq!(tree.root_node().spouse, None);
    assert!(!tree.root_node().has_children());

    let stats = tree.stats();
    assert_eq!(stats.dangling_parents, 1);
    assert_eq!(stats.dangling_spouses, 1);
    assert_eq!(stats.detached, 1);
}

#[test]
fn children_keep_input_order_regardless_of_parent_position() {
    let tree = build(&[
        MemberRecord::new(10, "Zoe", 1).with_parent(1),
        MemberRecord::new(11, "Adam", 1).with_parent(1),
        MemberRecord::new(1, "Root", 0),
        MemberRecord::new(12, "Mia", 1).with_parent(1),
    ]);

    assert_eq!(
        names_of_children(&tree, tree.root()),
        vec!["Zoe", "Adam", "Mia"]
    );
}

#[test]
fn attributes_are_copied_from_records() {
    let mut record = MemberRecord::new(1, "Root", 0).with_birth_year("1900");
    record.phone_number = Some("555-0100".to_string());
    record.address = Some("1 Elm St".to_string());
    record.notes = Some("founder".to_string());

    let tree = build(&[record]);
    let attributes = &tree.root_node().attributes;

    assert_eq!(attributes.birth_year.as_deref(), Some("1900"));
    assert_eq!(attributes.phone_number.as_deref(), Some("555-0100"));
    assert_eq!(attributes.address.as_deref(), Some("1 Elm St"));
    assert_eq!(attributes.notes.as_deref(), Some("founder"));
    assert_eq!(tree.root_node().member_id, Some(1));
}
