use super::OSAvlTree;
use crate::compare::Natural;
use crate::raw::RawOSAvlTree;

impl<K> OSAvlTree<K> {
    /// Creates an empty tree with room for at least `capacity` keys before the
    /// node storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree: OSAvlTree<i32> = OSAvlTree::with_capacity(16);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OSAvlTree::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, C> OSAvlTree<K, C> {
    /// Creates an empty tree ordered by `cmp` with room for at least `capacity` keys.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        OSAvlTree {
            raw: RawOSAvlTree::with_capacity(capacity, cmp),
        }
    }

    /// Returns the number of keys the tree can hold without growing its node storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::with_capacity(32);
    /// tree.insert(1);
    /// assert!(tree.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
