use core::ops::Index;

use super::OSAvlTree;
use crate::Rank;
use crate::compare::Compare;

impl<K, C> OSAvlTree<K, C> {
    /// Returns the key at position `rank` in sorted order.
    ///
    /// The rank is zero-based. Returns `None` if `rank` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([10, 20, 30]);
    /// assert_eq!(tree.get_by_rank(1), Some(&20));
    /// assert!(tree.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&K> {
        self.raw.get_by_rank(rank)
    }
}

impl<K, C: Compare<K>> OSAvlTree<K, C> {
    /// Returns the zero-based rank of `key` in sorted order, or `None` if no
    /// equal key is present.
    ///
    /// For a key that may be absent, the rank of its insertion point is
    /// `tree.lower_bound(key).map_or(tree.len(), |n| n.rank())`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([10, 20]);
    ///
    /// assert_eq!(tree.rank_of(&20), Some(1));
    /// assert_eq!(tree.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of(&self, key: &K) -> Option<usize> {
        self.raw.rank_of(key)
    }
}

/// Indexes into the tree by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use osavl_tree::{OSAvlTree, Rank};
///
/// let tree = OSAvlTree::from([10, 20, 30]);
/// assert_eq!(tree[Rank(1)], 20);
/// ```
impl<K, C> Index<Rank> for OSAvlTree<K, C> {
    type Output = K;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).expect("index out of bounds")
    }
}
