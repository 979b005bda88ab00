use core::cmp::Ordering;

use smallvec::{SmallVec, smallvec};

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use super::size::Size;
use crate::compare::Compare;
use crate::error::ReserveError;

/// Stack for whole-tree walks. An AVL tree of n nodes is shorter than
/// 1.45 * log2(n + 2), so the inline capacity covers every tree an arena can address.
type WorkStack<T> = SmallVec<[T; 64]>;

/// The core AVL tree backing `OSAvlTree`.
pub(crate) struct RawOSAvlTree<K, C> {
    /// Arena owning every node. A node is reachable only through `root` and child links.
    nodes: Arena<Node<K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// The total order keys are sorted by.
    cmp: C,
}

/// Where a new key would be linked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Slot {
    Root,
    Child(Handle, Side),
}

impl<K, C> RawOSAvlTree<K, C> {
    /// Creates a new, empty tree.
    pub(crate) const fn new(cmp: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            cmp,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize, cmp: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            cmp,
        }
    }

    /// Returns the number of keys in the tree (the size of the root subtree).
    pub(crate) fn len(&self) -> usize {
        self.size_of(self.root)
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns the number of levels in the tree, 0 when empty.
    pub(crate) fn height(&self) -> usize {
        usize::from(self.height_of(self.root))
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    #[inline]
    fn size_of(&self, handle: Option<Handle>) -> usize {
        Size::of(handle.map(|h| self.nodes.get(h).size()))
    }

    #[inline]
    fn height_of(&self, handle: Option<Handle>) -> u8 {
        handle.map_or(0, |h| self.nodes.get(h).height())
    }

    /// `height(right) - height(left)`.
    fn balance_factor(&self, handle: Handle) -> i16 {
        let node = self.nodes.get(handle);
        i16::from(self.height_of(node.right())) - i16::from(self.height_of(node.left()))
    }

    /// Recomputes the height and size of `handle` from its children.
    fn refresh(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let left = (self.height_of(node.left()), self.size_of(node.left()));
        let right = (self.height_of(node.right()), self.size_of(node.right()));
        self.nodes.get_mut(handle).refresh(left, right);
    }

    /// Points whatever owned `old` (its parent's child slot, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            Some(parent) => {
                let parent = self.nodes.get_mut(parent);
                let side = parent.side_of(old);
                parent.set_child(side, new);
            }
            None => self.root = new,
        }
    }

    /// Moves `node` down towards `side`, promoting its child on the opposite side.
    /// Returns the promoted child, the new root of the subtree.
    ///
    /// Rotating towards `Side::Left` is a left rotation.
    fn rotate(&mut self, node: Handle, side: Side) -> Handle {
        let up = side.opposite();
        let pivot = self.nodes.get(node).child(up).expect("`RawOSAvlTree::rotate()` - no child to promote");
        let inner = self.nodes.get(pivot).child(side);
        let grandparent = self.nodes.get(node).parent();

        // The pivot's inner subtree crosses over to `node`.
        self.nodes.get_mut(node).set_child(up, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(node));
        }

        self.nodes.get_mut(pivot).set_child(side, Some(node));
        self.nodes.get_mut(node).set_parent(Some(pivot));

        self.nodes.get_mut(pivot).set_parent(grandparent);
        self.replace_child(grandparent, node, Some(pivot));

        // `node` is now below `pivot`, so it is refreshed first.
        self.refresh(node);
        self.refresh(pivot);

        log::trace!("rotated node {} {side:?}, promoting {}", node.to_index(), pivot.to_index());
        pivot
    }

    /// Refreshes `handle` and restores its balance with at most one single or double rotation.
    /// Returns the root of the (possibly new) subtree.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        self.refresh(handle);

        match self.balance_factor(handle) {
            2 => {
                let right = self.nodes.get(handle).right().expect("right-heavy node has a right child");
                if self.balance_factor(right) < 0 {
                    self.rotate(right, Side::Right);
                }
                self.rotate(handle, Side::Left)
            }
            -2 => {
                let left = self.nodes.get(handle).left().expect("left-heavy node has a left child");
                if self.balance_factor(left) > 0 {
                    self.rotate(left, Side::Left);
                }
                self.rotate(handle, Side::Right)
            }
            _ => handle,
        }
    }

    /// Refreshes and rebalances every node from `from` up to the root.
    fn rebalance_to_root(&mut self, from: Handle) {
        let mut current = Some(from);
        while let Some(handle) = current {
            let subtree = self.rebalance(handle);
            current = self.nodes.get(subtree).parent();
        }
    }

    /// Links a new leaf at `slot` and rebalances. Storage must already be reserved.
    fn attach(&mut self, key: K, slot: Slot) {
        match slot {
            Slot::Root => {
                let handle = self.nodes.alloc(Node::leaf(key, None));
                self.root = Some(handle);
            }
            Slot::Child(parent, side) => {
                let handle = self.nodes.alloc(Node::leaf(key, Some(parent)));
                self.nodes.get_mut(parent).set_child(side, Some(handle));
                self.rebalance_to_root(parent);
            }
        }
    }

    /// Returns the number of keys strictly less than the key of `handle`.
    ///
    /// Starts from the node's left subtree and adds, for every ancestor reached
    /// from its right child, that ancestor and its left subtree.
    pub(crate) fn rank(&self, handle: Handle) -> usize {
        let node = self.nodes.get(handle);
        let mut rank = self.size_of(node.left());
        let mut child = handle;
        let mut parent = node.parent();

        while let Some(p) = parent {
            let ancestor = self.nodes.get(p);
            if ancestor.right() == Some(child) {
                rank += 1 + self.size_of(ancestor.left());
            }
            child = p;
            parent = ancestor.parent();
        }

        rank
    }

    /// Returns the key at position `rank` in sorted order.
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<&K> {
        if rank >= self.len() {
            return None;
        }

        let mut current = self.root;
        let mut remaining = rank;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left = self.size_of(node.left());
            match remaining.cmp(&left) {
                Ordering::Less => current = node.left(),
                Ordering::Equal => return Some(node.key()),
                Ordering::Greater => {
                    remaining -= left + 1;
                    current = node.right();
                }
            }
        }

        // Unreachable while the size invariant holds.
        None
    }

    /// Returns the smallest key.
    pub(crate) fn first(&self) -> Option<&K> {
        self.extreme(Side::Left)
    }

    /// Returns the largest key.
    pub(crate) fn last(&self) -> Option<&K> {
        self.extreme(Side::Right)
    }

    fn extreme(&self, side: Side) -> Option<&K> {
        let mut current = self.root?;
        while let Some(next) = self.nodes.get(current).child(side) {
            current = next;
        }
        Some(self.nodes.get(current).key())
    }

    /// Calls `f` with every key in ascending order.
    pub(crate) fn for_each_in_order(&self, mut f: impl FnMut(&K)) {
        let mut stack: WorkStack<Handle> = SmallVec::new();
        let mut current = self.root;

        loop {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.nodes.get(handle).left();
            }
            let Some(handle) = stack.pop() else {
                break;
            };
            let node = self.nodes.get(handle);
            f(node.key());
            current = node.right();
        }
    }

    /// Releases every node exactly once, leaving an empty tree that keeps its storage.
    pub(crate) fn clear(&mut self) {
        let mut stack: WorkStack<Handle> = SmallVec::new();
        stack.extend(self.root.take());
        let mut released = 0usize;

        while let Some(handle) = stack.pop() {
            let node = self.nodes.take(handle);
            stack.extend(node.left());
            stack.extend(node.right());
            drop(node);
            released += 1;
        }

        debug_assert!(self.nodes.is_empty(), "clear: unreachable nodes left in the arena");
        self.nodes.clear();
        log::debug!("cleared tree, released {released} nodes");
    }
}

impl<K, C: Compare<K>> RawOSAvlTree<K, C> {
    /// Finds the slot a new `key` would be linked into, or `None` if an equal key exists.
    ///
    /// Only reads the tree, so a panicking comparator leaves it untouched.
    fn find_slot(&self, key: &K) -> Option<Slot> {
        let mut slot = Slot::Root;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let side = if self.cmp.less(key, node.key()) {
                Side::Left
            } else if self.cmp.less(node.key(), key) {
                Side::Right
            } else {
                return None;
            };
            slot = Slot::Child(handle, side);
            current = node.child(side);
        }

        Some(slot)
    }

    /// Inserts `key` unless an equal key is present. Returns whether the key was inserted.
    ///
    /// Every fallible step happens before the new node is linked, so on error the
    /// tree is unchanged.
    pub(crate) fn try_insert(&mut self, key: K) -> Result<bool, ReserveError> {
        let Some(slot) = self.find_slot(&key) else {
            log::trace!("insert: equal key present, ignoring");
            return Ok(false);
        };

        self.nodes.try_reserve(1)?;
        self.attach(key, slot);
        Ok(true)
    }

    /// Inserts `key` unless an equal key is present. Returns whether the key was inserted.
    ///
    /// # Panics
    ///
    /// Panics if the tree is at maximum capacity or the allocation fails.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        match self.try_insert(key) {
            Ok(inserted) => inserted,
            Err(err) => panic!("`RawOSAvlTree::insert()` - {err}"),
        }
    }

    /// Returns the handle holding a key equal to `key`.
    pub(crate) fn search(&self, key: &K) -> Option<Handle> {
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if self.cmp.less(key, node.key()) {
                current = node.left();
            } else if self.cmp.less(node.key(), key) {
                current = node.right();
            } else {
                return Some(handle);
            }
        }

        None
    }

    /// Returns the rank of a stored key equal to `key`.
    pub(crate) fn rank_of(&self, key: &K) -> Option<usize> {
        let mut current = self.root;
        let mut rank = 0;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if self.cmp.less(key, node.key()) {
                current = node.left();
            } else if self.cmp.less(node.key(), key) {
                rank += 1 + self.size_of(node.left());
                current = node.right();
            } else {
                return Some(rank + self.size_of(node.left()));
            }
        }

        None
    }

    /// Finds the leftmost node whose key is not less than `value`.
    pub(crate) fn lower_bound(&self, value: &K) -> Option<Handle> {
        let mut current = self.root;
        let mut best = None;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if self.cmp.less(node.key(), value) {
                current = node.right();
            } else {
                best = Some(handle);
                current = node.left();
            }
        }

        best
    }

    /// Finds the leftmost node whose key is greater than `value`.
    pub(crate) fn upper_bound(&self, value: &K) -> Option<Handle> {
        let mut current = self.root;
        let mut best = None;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if self.cmp.less(value, node.key()) {
                best = Some(handle);
                current = node.left();
            } else {
                current = node.right();
            }
        }

        best
    }

    /// Counts the keys `k` with `lo <= k <= hi`. An inverted range counts 0.
    pub(crate) fn range_count(&self, lo: &K, hi: &K) -> usize {
        if self.cmp.less(hi, lo) {
            return 0;
        }

        let Some(lower) = self.lower_bound(lo) else {
            return 0;
        };

        match self.upper_bound(hi) {
            None => self.len() - self.rank(lower),
            Some(upper) => self.rank(upper).saturating_sub(self.rank(lower)),
        }
    }
}

impl<K: Clone, C: Clone> RawOSAvlTree<K, C> {
    /// Copies the tree node by node, keeping shape, heights and sizes.
    ///
    /// Storage for every node is reserved before the first key is cloned. The copy
    /// is assembled in a local tree, so if `K::clone` panics the partial copy is
    /// dropped during unwinding and `self` is never touched.
    pub(crate) fn try_clone(&self) -> Result<Self, ReserveError> {
        let mut copy = Self::new(self.cmp.clone());
        copy.nodes.try_reserve(self.len())?;

        let Some(source_root) = self.root else {
            return Ok(copy);
        };

        let root = copy.nodes.alloc(Node::unlinked_copy(self.nodes.get(source_root), None));
        copy.root = Some(root);

        let mut stack: WorkStack<(Handle, Handle)> = smallvec![(source_root, root)];
        while let Some((from, to)) = stack.pop() {
            let source = self.nodes.get(from);
            for side in [Side::Left, Side::Right] {
                if let Some(child) = source.child(side) {
                    let copied = copy.nodes.alloc(Node::unlinked_copy(self.nodes.get(child), Some(to)));
                    copy.nodes.get_mut(to).set_child(side, Some(copied));
                    stack.push((child, copied));
                }
            }
        }

        log::debug!("cloned tree of {} nodes", copy.len());
        Ok(copy)
    }
}

impl<K: Clone, C: Clone> Clone for RawOSAvlTree<K, C> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("`RawOSAvlTree::clone()` - {err}"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use crate::compare::Natural;
    use alloc::collections::BTreeSet;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    type Tree = RawOSAvlTree<i32, Natural>;

    impl<K, C: Compare<K>> RawOSAvlTree<K, C> {
        /// Validates all AVL, size and link invariants. Panics with a descriptive message if any are violated.
        pub(crate) fn validate_invariants(&self) {
            let Some(root) = self.root else {
                assert!(self.nodes.is_empty(), "Empty tree should own no nodes");
                return;
            };

            let mut errors: Vec<String> = Vec::new();

            if self.nodes.get(root).parent().is_some() {
                errors.push(String::from("root has a parent"));
            }

            // 1. Structural invariants, checked on every node.
            let mut visited = 0usize;
            let mut stack: WorkStack<Handle> = smallvec![root];
            while let Some(handle) = stack.pop() {
                visited += 1;
                let node = self.nodes.get(handle);
                let index = handle.to_index();

                for side in [Side::Left, Side::Right] {
                    if let Some(child) = node.child(side) {
                        if self.nodes.get(child).parent() != Some(handle) {
                            errors.push(alloc::format!("node {index}: {side:?} child has wrong parent"));
                        }
                        stack.push(child);
                    }
                }

                let (lh, rh) = (self.height_of(node.left()), self.height_of(node.right()));
                if node.height() != 1 + lh.max(rh) {
                    errors.push(alloc::format!("node {index}: height {} but children {lh}/{rh}", node.height()));
                }
                if (i16::from(rh) - i16::from(lh)).abs() > 1 {
                    errors.push(alloc::format!("node {index}: unbalanced ({lh}/{rh})"));
                }

                let expected = 1 + self.size_of(node.left()) + self.size_of(node.right());
                if node.size().to_usize() != expected {
                    errors.push(alloc::format!("node {index}: size {} expected {expected}", node.size().to_usize()));
                }
            }

            // 2. In-order keys strictly increase.
            let mut keys: Vec<&K> = Vec::new();
            let mut current = self.root;
            let mut path: WorkStack<Handle> = SmallVec::new();
            loop {
                while let Some(h) = current {
                    path.push(h);
                    current = self.nodes.get(h).left();
                }
                let Some(h) = path.pop() else { break };
                keys.push(self.nodes.get(h).key());
                current = self.nodes.get(h).right();
            }
            if keys.windows(2).any(|w| !self.cmp.less(w[0], w[1])) {
                errors.push(String::from("in-order keys are not strictly increasing"));
            }

            // 3. Every live node is reachable and counted.
            if visited != self.nodes.len() || visited != self.len() {
                errors.push(alloc::format!(
                    "reachable={visited}, arena={}, root size={}",
                    self.nodes.len(),
                    self.len()
                ));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Pre-order `(key, height, size, parent key)` listing, for comparing shapes.
        fn shape(&self) -> Vec<(&K, u8, usize, Option<&K>)> {
            let mut shape = Vec::new();
            let mut stack: WorkStack<Handle> = SmallVec::new();
            stack.extend(self.root);
            while let Some(handle) = stack.pop() {
                let node = self.nodes.get(handle);
                let parent = node.parent().map(|p| self.nodes.get(p).key());
                shape.push((node.key(), node.height(), node.size().to_usize(), parent));
                stack.extend(node.right());
                stack.extend(node.left());
            }
            shape
        }
    }

    fn tree_of(keys: &[i32]) -> Tree {
        let mut tree = Tree::new(Natural);
        for &key in keys {
            tree.insert(key);
        }
        tree
    }

    fn root_key(tree: &Tree) -> i32 {
        *tree.node(tree.root.expect("non-empty tree")).key()
    }

    #[test]
    fn single_and_double_rotations() {
        for keys in [[1, 2, 3], [3, 2, 1], [1, 3, 2], [3, 1, 2]] {
            let tree = tree_of(&keys);
            tree.validate_invariants();
            assert_eq!(root_key(&tree), 2, "insertion order {:?}", keys);
            assert_eq!(tree.height(), 2);
        }
    }

    #[test]
    fn ascending_inserts_stay_logarithmic() {
        let tree = tree_of(&(0..1024).collect::<Vec<_>>());
        tree.validate_invariants();
        assert_eq!(tree.len(), 1024);
        // A perfectly balanced tree of 1024 nodes has 11 levels.
        assert_eq!(tree.height(), 11);
    }

    #[test]
    fn duplicate_insert_is_noop() {
        let mut tree = tree_of(&[5, 3, 8]);
        let before: Vec<_> = tree.shape().into_iter().map(|(k, h, s, p)| (*k, h, s, p.copied())).collect();
        assert!(!tree.insert(3));
        let after: Vec<_> = tree.shape().into_iter().map(|(k, h, s, p)| (*k, h, s, p.copied())).collect();
        assert_eq!(before, after);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn rank_walks_up_through_right_children() {
        let tree = tree_of(&[9, -3, 79, -5, 0, -1, 10, 2, 8]);
        let sorted = [-5, -3, -1, 0, 2, 8, 9, 10, 79];
        for (expected, key) in sorted.iter().enumerate() {
            let handle = tree.search(key).expect("key present");
            assert_eq!(tree.rank(handle), expected, "rank of {}", key);
        }
    }

    #[test]
    fn bounds_on_empty_tree() {
        let tree = Tree::new(Natural);
        assert!(tree.lower_bound(&0).is_none());
        assert!(tree.upper_bound(&0).is_none());
        assert_eq!(tree.range_count(&-10, &10), 0);
        assert_eq!(tree.get_by_rank(0), None);
        assert_eq!(tree.first(), None);
        tree.validate_invariants();
    }

    #[test]
    fn bounds_pick_leftmost_candidate() {
        let tree = tree_of(&[10, 20, 30, 40]);
        let key = |h: Option<Handle>| h.map(|h| *tree.node(h).key());
        assert_eq!(key(tree.lower_bound(&20)), Some(20));
        assert_eq!(key(tree.lower_bound(&21)), Some(30));
        assert_eq!(key(tree.lower_bound(&41)), None);
        assert_eq!(key(tree.upper_bound(&20)), Some(30));
        assert_eq!(key(tree.upper_bound(&5)), Some(10));
        assert_eq!(key(tree.upper_bound(&40)), None);
    }

    #[test]
    fn range_count_scenarios() {
        assert_eq!(tree_of(&[8, 10, 1]).range_count(&0, &9), 2);
        assert_eq!(tree_of(&[-1, 10, 2]).range_count(&-2, &10), 3);
        assert_eq!(tree_of(&[-5, 0, -1, 10, 2, 8]).range_count(&-2, &10), 5);
        assert_eq!(tree_of(&[9, -3, 79, -5, 0, -1, 10, 2, 8]).range_count(&2, &10), 4);
    }

    #[test]
    fn clear_releases_every_node() {
        let mut tree = tree_of(&(0..200).collect::<Vec<_>>());
        tree.clear();
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);

        // The tree is reusable after clearing.
        assert!(tree.insert(7));
        tree.validate_invariants();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn clear_reuses_node_storage() {
        let keys: Vec<i32> = (0..2000).collect();
        let mut tree = tree_of(&keys);
        let capacity = tree.capacity();

        tree.clear();
        assert_eq!(tree.nodes.len(), 0);
        assert_eq!(tree.capacity(), capacity);

        // Refilling starts from the first slot again without growing the arena.
        for &key in &keys {
            assert!(tree.insert(key));
        }
        assert_eq!(tree.capacity(), capacity);
        assert_eq!(tree.first(), Some(&0));
        tree.validate_invariants();
    }

    #[test]
    fn clone_keeps_shape() {
        let tree = tree_of(&[9, -3, 79, -5, 0, -1, 10, 2, 8]);
        let copy = tree.clone();
        copy.validate_invariants();
        assert_eq!(tree.shape(), copy.shape());
    }

    #[test]
    fn clone_of_empty_tree() {
        let tree = Tree::new(Natural);
        let copy = tree.try_clone().expect("empty clone cannot fail");
        copy.validate_invariants();
        assert!(copy.is_empty());
    }

    #[test]
    fn insert_at_capacity_leaves_tree_unchanged() {
        let mut tree = Tree::with_capacity(Handle::MAX, Natural);
        for key in 0..Handle::MAX as i32 {
            assert_eq!(tree.try_insert(key), Ok(true));
        }
        assert_eq!(tree.len(), Handle::MAX);

        let shape_before = tree.shape().len();
        assert_eq!(tree.try_insert(-1), Err(ReserveError::CapacityExceeded { max: Handle::MAX }));
        // Duplicates are resolved before any storage is reserved.
        assert_eq!(tree.try_insert(0), Ok(false));

        assert_eq!(tree.len(), Handle::MAX);
        assert_eq!(tree.shape().len(), shape_before);
        assert_eq!(tree.lower_bound(&-1).map(|h| *tree.node(h).key()), Some(0));
        tree.validate_invariants();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_insert(keys in prop::collection::vec(-500i32..500, 0..400)) {
            let mut tree = Tree::new(Natural);
            let mut model = BTreeSet::new();

            for key in keys {
                prop_assert_eq!(tree.insert(key), model.insert(key));
                tree.validate_invariants();
            }
            prop_assert_eq!(tree.len(), model.len());
        }

        #[test]
        fn rank_matches_sorted_position(keys in prop::collection::vec(-500i32..500, 1..300)) {
            let tree = tree_of(&keys);
            let sorted: Vec<i32> = keys.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

            for (position, key) in sorted.iter().enumerate() {
                let handle = tree.search(key).expect("inserted key is present");
                prop_assert_eq!(tree.rank(handle), position);
                prop_assert_eq!(tree.rank_of(key), Some(position));
                prop_assert_eq!(tree.get_by_rank(position), Some(key));
            }
            prop_assert_eq!(tree.get_by_rank(sorted.len()), None);
        }

        #[test]
        fn range_count_matches_btreeset(
            keys in prop::collection::vec(-200i32..200, 0..300),
            ranges in prop::collection::vec((-250i32..250, -250i32..250), 1..50),
        ) {
            let tree = tree_of(&keys);
            let model: BTreeSet<i32> = keys.iter().copied().collect();

            for (lo, hi) in ranges {
                let expected = if lo > hi { 0 } else { model.range(lo..=hi).count() };
                prop_assert_eq!(tree.range_count(&lo, &hi), expected, "range [{}, {}]", lo, hi);
            }
        }

        #[test]
        fn clone_is_independent(keys in prop::collection::vec(-500i32..500, 0..300), extra in -500i32..500) {
            let tree = tree_of(&keys);
            let mut copy = tree.clone();
            copy.validate_invariants();
            prop_assert_eq!(tree.shape(), copy.shape());

            let len = tree.len();
            copy.insert(extra);
            copy.validate_invariants();
            prop_assert_eq!(tree.len(), len);
            tree.validate_invariants();
        }
    }
}
