// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Containment tests for dismissal.
//!
//! A pointer target is *inside* the drop-down's interactive region when it is
//! in the open button's subtree, in the subtree of any hit-area addition, or in
//! the drop-down's own subtree. Only targets outside that region dismiss.
//!
//! Subtree membership is answered by walking [`DisplayTree::parent_of`] from the
//! target up to a root. A node that is not a container
//! ([`DisplayTree::is_container`] returns `false`) only contains itself.
//!
//! ```
//! use understory_dropdown::hit::{ParentMap, subtree_contains};
//!
//! let mut tree = ParentMap::new();
//! tree.insert(2_u32, 1);
//! tree.insert(3, 2);
//!
//! assert!(subtree_contains(&tree, &1, &3));
//! assert!(subtree_contains(&tree, &3, &3));
//! assert!(!subtree_contains(&tree, &3, &1));
//! ```

use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

use crate::host::DisplayTree;

/// Whether `target` is `node` or one of its descendants.
///
/// The parent chain of `target` must be acyclic; this walk does not detect
/// loops.
pub fn subtree_contains<K: PartialEq>(tree: &impl DisplayTree<K>, node: &K, target: &K) -> bool {
    if node == target {
        return true;
    }
    if !tree.is_container(node) {
        return false;
    }
    let mut cur = tree.parent_of(target);
    while let Some(p) = cur {
        if p == *node {
            return true;
        }
        cur = tree.parent_of(&p);
    }
    false
}

/// Whether `target` lies in the interactive region made of the open button,
/// the hit-area additions, and the drop-down.
///
/// A missing target is always outside.
pub fn is_target_inside<K: PartialEq>(
    tree: &impl DisplayTree<K>,
    target: Option<&K>,
    open_button: Option<&K>,
    hit_area_additions: &[K],
    drop_down: Option<&K>,
) -> bool {
    let Some(target) = target else {
        return false;
    };
    if open_button.is_some_and(|button| subtree_contains(tree, button, target)) {
        return true;
    }
    if hit_area_additions
        .iter()
        .any(|area| subtree_contains(tree, area, target))
    {
        return true;
    }
    drop_down.is_some_and(|dd| subtree_contains(tree, dd, target))
}

/// A [`DisplayTree`] backed by a child → parent map.
///
/// Useful for hosts that do not keep parent links in their own scene
/// representation, and for tests. Nodes are containers unless marked as leaves.
#[derive(Clone, Debug)]
pub struct ParentMap<K> {
    parents: HashMap<K, K>,
    leaves: HashSet<K>,
}

impl<K> Default for ParentMap<K> {
    fn default() -> Self {
        Self {
            parents: HashMap::new(),
            leaves: HashSet::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> ParentMap<K> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `parent` as the parent of `child`, returning the previous parent.
    ///
    /// The caller keeps the links acyclic.
    pub fn insert(&mut self, child: K, parent: K) -> Option<K> {
        self.parents.insert(child, parent)
    }

    /// Detach `child` from its parent, returning it.
    pub fn remove(&mut self, child: &K) -> Option<K> {
        self.parents.remove(child)
    }

    /// Mark `node` as a leaf (or a container again).
    pub fn set_leaf(&mut self, node: K, leaf: bool) {
        if leaf {
            self.leaves.insert(node);
        } else {
            self.leaves.remove(&node);
        }
    }

    /// Number of parent links.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether no parent links are recorded.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl<K: Copy + Eq + Hash> DisplayTree<K> for ParentMap<K> {
    fn parent_of(&self, node: &K) -> Option<K> {
        self.parents.get(node).copied()
    }

    fn is_container(&self, node: &K) -> bool {
        !self.leaves.contains(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FlatTree;

    // 1 ── 2 ── 3
    // │
    // └─ 4
    // 10 ── 11 (hit area)
    // 20 ── 21 (drop-down)
    fn tree() -> ParentMap<u32> {
        let mut t = ParentMap::new();
        t.insert(2, 1);
        t.insert(3, 2);
        t.insert(4, 1);
        t.insert(11, 10);
        t.insert(21, 20);
        t
    }

    #[test]
    fn descendants_are_contained() {
        let t = tree();
        assert!(subtree_contains(&t, &1, &3));
        assert!(subtree_contains(&t, &1, &4));
        assert!(!subtree_contains(&t, &2, &4));
        assert!(!subtree_contains(&t, &3, &2));
    }

    #[test]
    fn leaf_contains_only_itself() {
        let mut t = tree();
        t.set_leaf(2, true);
        assert!(subtree_contains(&t, &2, &2));
        assert!(!subtree_contains(&t, &2, &3));
        t.set_leaf(2, false);
        assert!(subtree_contains(&t, &2, &3));
    }

    #[test]
    fn hit_area_addition_counts_as_inside() {
        let t = tree();
        let areas = [10_u32];
        // Equal to the addition.
        assert!(is_target_inside(&t, Some(&10), Some(&1), &areas, Some(&20)));
        // Descendant of the addition, unrelated to button and drop-down.
        assert!(is_target_inside(&t, Some(&11), Some(&1), &areas, Some(&20)));
        assert!(!is_target_inside(&t, Some(&11), Some(&1), &[], Some(&20)));
    }

    #[test]
    fn button_and_drop_down_subtrees_are_inside() {
        let t = tree();
        assert!(is_target_inside(&t, Some(&3), Some(&1), &[], None));
        assert!(is_target_inside(&t, Some(&21), None, &[], Some(&20)));
        assert!(!is_target_inside(&t, Some(&99), Some(&1), &[10], Some(&20)));
    }

    #[test]
    fn removing_a_link_detaches_the_subtree() {
        let mut t = tree();
        assert_eq!(t.len(), 5);
        assert_eq!(t.remove(&2), Some(1));
        assert_eq!(t.remove(&2), None);
        assert_eq!(t.len(), 4);
        // 3 still hangs off 2, but 2 is now a root.
        assert!(subtree_contains(&t, &2, &3));
        assert!(!subtree_contains(&t, &1, &3));

        let mut empty = ParentMap::<u32>::new();
        assert!(empty.is_empty());
        empty.insert(5, 4);
        assert!(!empty.is_empty());
    }

    #[test]
    fn missing_target_is_outside() {
        assert!(!is_target_inside(&FlatTree, None, Some(&1_u32), &[1], Some(&1)));
    }

    #[test]
    fn flat_tree_uses_equality() {
        assert!(is_target_inside(&FlatTree, Some(&7_u32), None, &[], Some(&7)));
        assert!(!is_target_inside(&FlatTree, Some(&8_u32), Some(&1), &[], Some(&7)));
    }
}
