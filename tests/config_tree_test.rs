//! Inheritance behaviour of the configuration tree, driven the way a tree
//! walker drives it: root first, then each package after its parent.

use tsgen_config::config::{ConfigTree, EnvironmentType, ExclusionInheritance};
use tsgen_config::TsGenError;

#[test]
fn test_ignore_added_after_derivation_reaches_grandchild() {
    let mut tree = ConfigTree::new();
    let root = tree.init_root("/repo").unwrap();
    let a = tree.derive_for_package("a").unwrap();
    let ab = tree.derive_for_package("a/b").unwrap();

    tree.node_mut(a).add_ignored_dependency("left-pad");

    assert!(tree.is_dependency_ignored(ab, "left-pad"));
    assert!(!tree.is_dependency_ignored(root, "left-pad"));
}

#[test]
fn test_descendant_ignore_does_not_leak_upwards() {
    let mut tree = ConfigTree::new();
    let root = tree.init_root("/repo").unwrap();
    let a = tree.derive_for_package("a").unwrap();
    let sibling = tree.derive_for_package("c").unwrap();
    let ab = tree.derive_for_package("a/b").unwrap();

    tree.node_mut(ab).add_ignored_dependency("react");

    assert!(tree.is_dependency_ignored(ab, "react"));
    assert!(!tree.is_dependency_ignored(a, "react"));
    assert!(!tree.is_dependency_ignored(root, "react"));
    assert!(!tree.is_dependency_ignored(sibling, "react"));
}

#[test]
fn test_every_derived_child_points_at_its_parent() {
    let mut tree = ConfigTree::new();
    let mut current = tree.create("/repo");
    for _ in 0..5 {
        let child = tree.derive_child(current);
        assert_eq!(tree.node(child).parent(), Some(current));
        current = child;
    }
    assert_eq!(tree.ancestors(current).count(), 5);
}

#[test]
fn test_scalars_are_snapshots_exclusions_are_shared() {
    let mut tree = ConfigTree::new();
    let root = tree.init_root("/repo").unwrap();
    tree.node_mut(root).set_environment_type(EnvironmentType::Node);
    tree.node_mut(root).set_test_naming_template("$package_name$_spec");

    let a = tree.derive_for_package("a").unwrap();

    tree.node_mut(root).set_generation_enabled(false);
    tree.node_mut(root).set_environment_type(EnvironmentType::Browser);
    tree.add_excluded_pattern(root, "**/*.stories.tsx");
    tree.add_excluded_pattern(a, "fixtures");

    let child = tree.node(a);
    assert!(child.generation_enabled());
    assert_eq!(child.environment_type(), EnvironmentType::Node);
    assert_eq!(child.render_test_name("a"), "a_spec");
    assert_eq!(
        tree.excluded_patterns(a),
        ["**/*.stories.tsx", "fixtures"]
    );
    assert_eq!(tree.excluded_patterns(root), tree.excluded_patterns(a));
}

#[test]
fn test_copied_exclusions_on_request() {
    let mut tree = ConfigTree::new();
    let root = tree.init_root("/repo").unwrap();
    let isolated = tree.derive_child_with(root, ExclusionInheritance::Copied);
    tree.insert("isolated", isolated).unwrap();

    tree.add_excluded_pattern(isolated, "tmp");
    assert!(tree.excluded_patterns(root).is_empty());
    assert_eq!(tree.parent_for_package("isolated/x"), Some(isolated));
}

#[test]
fn test_out_of_order_visit_is_reported() {
    let mut tree = ConfigTree::new();
    tree.init_root("/repo").unwrap();

    assert_eq!(tree.parent_for_package("a/b"), None);
    assert!(matches!(
        tree.derive_for_package("a/b"),
        Err(TsGenError::TreeOrderingViolation { .. })
    ));
}
