//! Hierarchy building and pruning over aggregated leaf tuples.

use std::collections::BTreeMap;

use sunburst_core::models::{HierarchyNode, LeafKey};

/// Build the tree for a radial partition layout from aggregated groups.
///
/// Creates a root named `"root"` and, for each group, walks/creates the
/// child path category → genre → language, accumulating the group's sum into
/// the terminal node. Children are reused by name, never duplicated, and the
/// accumulation is additive should duplicate paths ever reach this layer.
/// The resulting tree is already pruned of non-positive branches.
pub fn build_hierarchy(aggregated: &BTreeMap<LeafKey, f64>) -> HierarchyNode {
    let mut root = HierarchyNode::root();
    for (key, sum) in aggregated {
        insert_path(&mut root, &key.path(), *sum);
    }
    prune_empty_branches(&mut root);
    root
}

/// Walk/create the chain of children named by `path` under `node` and add
/// `size` into the terminal node's value.
///
/// Generic over path length: this schema always supplies three components,
/// but the walk itself assumes nothing about depth.
pub fn insert_path(node: &mut HierarchyNode, path: &[&str], size: f64) {
    match path.split_first() {
        None => node.add_value(size),
        Some((name, rest)) => insert_path(node.child_entry(name), rest, size),
    }
}

/// Remove, post-order, every subtree holding no positive value.
///
/// A child survives iff it has at least one surviving child or a positive
/// value of its own. The root itself is never removed; a childless root is
/// the valid "no data" result. Idempotent.
pub fn prune_empty_branches(node: &mut HierarchyNode) {
    node.children.retain_mut(|child| {
        prune_empty_branches(child);
        !child.children.is_empty() || child.value.map_or(false, |v| v > 0.0)
    });
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_groups(entries: &[(&str, &str, &str, f64)]) -> BTreeMap<LeafKey, f64> {
        entries
            .iter()
            .map(|(c, g, l, v)| (LeafKey::new(*c, *g, *l), *v))
            .collect()
    }

    // ── build_hierarchy ───────────────────────────────────────────────────────

    #[test]
    fn test_build_creates_three_levels_below_root() {
        let groups = make_groups(&[("Movie", "Action", "English", 100.0)]);
        let root = build_hierarchy(&groups);

        let movie = root.find_child("Movie").expect("category level");
        let action = movie.find_child("Action").expect("genre level");
        let english = action.find_child("English").expect("language level");
        assert_eq!(english.value, Some(100.0));
        assert!(english.is_leaf());
    }

    #[test]
    fn test_build_reuses_shared_prefixes() {
        let groups = make_groups(&[
            ("Movie", "Action", "English", 10.0),
            ("Movie", "Action", "Korean", 20.0),
            ("Movie", "Comedy", "English", 30.0),
        ]);
        let root = build_hierarchy(&groups);

        assert_eq!(root.children.len(), 1, "one category node");
        let movie = root.find_child("Movie").unwrap();
        assert_eq!(movie.children.len(), 2, "two genre nodes");
        assert_eq!(movie.find_child("Action").unwrap().children.len(), 2);
    }

    #[test]
    fn test_build_root_effective_value_is_grand_total() {
        let groups = make_groups(&[
            ("Movie", "Action", "English", 100.0),
            ("TV", "Drama", "Korean", 50.0),
        ]);
        let root = build_hierarchy(&groups);
        assert_eq!(root.effective_value(), 150.0);
        assert_eq!(root.name, "root");
        assert!(root.value.is_none());
    }

    #[test]
    fn test_build_value_conservation_at_every_level() {
        let groups = make_groups(&[
            ("Movie", "Action", "English", 10.0),
            ("Movie", "Action", "Korean", 20.0),
            ("Movie", "Comedy", "English", 5.0),
            ("TV", "Drama", "Korean", 7.5),
        ]);
        let root = build_hierarchy(&groups);

        // Each internal node's effective value equals the sum of its
        // children's effective values.
        fn check(node: &sunburst_core::models::HierarchyNode) {
            if !node.is_leaf() {
                let child_sum: f64 = node.children.iter().map(|c| c.effective_value()).sum();
                assert!((node.effective_value() - child_sum).abs() < 1e-9);
                node.children.iter().for_each(check);
            }
        }
        check(&root);
        assert_eq!(root.effective_value(), 42.5);
    }

    #[test]
    fn test_build_empty_input_yields_bare_root() {
        let root = build_hierarchy(&BTreeMap::new());
        assert!(root.children.is_empty());
        assert_eq!(root.effective_value(), 0.0);
    }

    // ── insert_path ───────────────────────────────────────────────────────────

    #[test]
    fn test_insert_path_additive_on_duplicate_paths() {
        let mut root = HierarchyNode::root();
        insert_path(&mut root, &["Movie", "Action", "English"], 10.0);
        insert_path(&mut root, &["Movie", "Action", "English"], 5.0);
        let leaf = root
            .find_child("Movie")
            .and_then(|n| n.find_child("Action"))
            .and_then(|n| n.find_child("English"))
            .unwrap();
        assert_eq!(leaf.value, Some(15.0));
    }

    #[test]
    fn test_insert_path_handles_arbitrary_depth() {
        let mut root = HierarchyNode::root();
        insert_path(&mut root, &["a", "b", "c", "d", "e"], 1.0);
        insert_path(&mut root, &["a"], 2.0);
        assert_eq!(root.effective_value(), 1.0 + 2.0);
        assert_eq!(root.find_child("a").unwrap().value, Some(2.0));
    }

    // ── prune_empty_branches ──────────────────────────────────────────────────

    #[test]
    fn test_prune_removes_zero_value_leaves() {
        let mut root = HierarchyNode::root();
        insert_path(&mut root, &["Movie", "Action", "English"], 0.0);
        insert_path(&mut root, &["Movie", "Comedy", "English"], 10.0);
        prune_empty_branches(&mut root);

        let movie = root.find_child("Movie").unwrap();
        assert!(movie.find_child("Action").is_none(), "empty branch removed");
        assert!(movie.find_child("Comedy").is_some());
    }

    #[test]
    fn test_prune_removes_whole_empty_subtrees() {
        let mut root = HierarchyNode::root();
        insert_path(&mut root, &["TV", "Drama", "Korean"], 0.0);
        prune_empty_branches(&mut root);
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_prune_keeps_root_when_everything_empty() {
        let mut root = HierarchyNode::root();
        prune_empty_branches(&mut root);
        assert_eq!(root.name, "root");
        assert_eq!(root.effective_value(), 0.0);
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut root = HierarchyNode::root();
        insert_path(&mut root, &["Movie", "Action", "English"], 10.0);
        insert_path(&mut root, &["Movie", "Action", "Korean"], 0.0);
        insert_path(&mut root, &["TV", "Drama", "Korean"], 0.0);

        prune_empty_branches(&mut root);
        let once = root.clone();
        prune_empty_branches(&mut root);
        assert_eq!(root, once);
    }
}
