use core::fmt;

use crate::compare::{Compare, Natural};
use crate::error::ReserveError;
use crate::raw::{Handle, RawOSAvlTree};

mod capacity;
mod order_statistic;

/// An ordered set of unique keys based on an AVL tree augmented with subtree sizes.
///
/// Besides insertion and membership, the tree answers order-statistic queries in
/// O(log n): the [rank](NodeRef::rank) of a key, the key at a given rank, and the
/// number of keys in an inclusive range ([`range_count`](OSAvlTree::range_count)).
///
/// Keys are ordered by a comparator `C` implementing [`Compare<K>`]. The default,
/// [`Natural`], uses the key's [`Ord`] implementation. It is a logic error for a
/// key to change its ordering relative to other keys while it is in the tree; the
/// resulting behavior is unspecified but will not be undefined behavior.
///
/// Keys cannot be removed individually; [`clear`](OSAvlTree::clear) releases all
/// of them.
///
/// # Examples
///
/// ```
/// use osavl_tree::OSAvlTree;
///
/// let mut tree = OSAvlTree::new();
/// for key in [9, -3, 79, -5, 0, -1, 10, 2, 8] {
///     tree.insert(key);
/// }
///
/// // Keys 2, 8, 9 and 10.
/// assert_eq!(tree.range_count(&2, &10), 4);
///
/// let node = tree.lower_bound(&1).unwrap();
/// assert_eq!(*node.key(), 2);
/// assert_eq!(node.rank(), 4);
/// ```
pub struct OSAvlTree<K, C = Natural> {
    raw: RawOSAvlTree<K, C>,
}

/// A reference to a key stored in an [`OSAvlTree`], as returned by the bound queries.
///
/// The reference knows its position in the tree and can compute its
/// [`rank`](NodeRef::rank) without searching again.
pub struct NodeRef<'a, K, C = Natural> {
    tree: &'a RawOSAvlTree<K, C>,
    handle: Handle,
}

impl<'a, K, C> NodeRef<'a, K, C> {
    /// Returns the key stored in this node.
    #[must_use]
    pub fn key(&self) -> &'a K {
        self.tree.node(self.handle).key()
    }

    /// Returns the number of keys in the tree strictly less than this node's key.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([10, 20, 30]);
    /// assert_eq!(tree.upper_bound(&10).unwrap().rank(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn rank(&self) -> usize {
        self.tree.rank(self.handle)
    }
}

impl<K, C> Clone for NodeRef<'_, K, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, C> Copy for NodeRef<'_, K, C> {}

impl<K, C> PartialEq for NodeRef<'_, K, C> {
    /// Two references are equal when they point at the same node of the same tree.
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.handle == other.handle
    }
}

impl<K, C> Eq for NodeRef<'_, K, C> {}

impl<K: fmt::Debug, C> fmt::Debug for NodeRef<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef").field("key", self.key()).field("rank", &self.rank()).finish()
    }
}

impl<K> OSAvlTree<K> {
    /// Makes a new, empty `OSAvlTree` ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::new();
    /// tree.insert(1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> OSAvlTree<K> {
        OSAvlTree::with_comparator(Natural)
    }
}

impl<K, C> OSAvlTree<K, C> {
    /// Makes a new, empty `OSAvlTree` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::with_comparator(|a: &u32, b: &u32| a > b);
    /// tree.extend([1, 2, 3]);
    /// assert_eq!(tree.first(), Some(&3));
    /// ```
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        OSAvlTree {
            raw: RawOSAvlTree::new(cmp),
        }
    }

    /// Returns the comparator the tree is ordered by.
    #[must_use]
    pub fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns the number of keys in the tree.
    ///
    /// This is the size of the root subtree, 0 for an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::new();
    /// assert_eq!(tree.len(), 0);
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of levels in the tree, 0 when empty.
    ///
    /// An AVL tree of n keys is never taller than about 1.44 * log2(n).
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree: OSAvlTree<_> = (0..7).collect();
    /// assert_eq!(tree.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the smallest key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.raw.first()
    }

    /// Returns the largest key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.raw.last()
    }

    /// Removes every key, releasing each node exactly once.
    ///
    /// The tree keeps its allocated storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::from([1, 2, 3]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K, C: Compare<K>> OSAvlTree<K, C> {
    /// Adds a key to the tree.
    ///
    /// Returns whether the key was newly inserted. If an equal key is already
    /// present the tree is left unchanged and `false` is returned.
    ///
    /// # Panics
    ///
    /// Panics if the tree already holds the maximum number of nodes or the node
    /// storage cannot grow. Use [`try_insert`](OSAvlTree::try_insert) to handle
    /// these cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::new();
    /// assert_eq!(tree.insert(2), true);
    /// assert_eq!(tree.insert(2), false);
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key)
    }

    /// Adds a key to the tree, reporting storage failures instead of panicking.
    ///
    /// On `Err` the tree is exactly as it was before the call. If the comparator
    /// panics the tree is likewise unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ReserveError`] if the tree is at maximum capacity or the node
    /// storage cannot grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::new();
    /// assert_eq!(tree.try_insert(5), Ok(true));
    /// assert_eq!(tree.try_insert(5), Ok(false));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn try_insert(&mut self, key: K) -> Result<bool, ReserveError> {
        self.raw.try_insert(key)
    }

    /// Returns `true` if the tree contains a key equal to `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.raw.search(key).is_some()
    }

    /// Returns the leftmost node whose key is not less than `value`, or `None`
    /// if every key is less than `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([10, 20, 30]);
    /// assert_eq!(tree.lower_bound(&20).map(|n| *n.key()), Some(20));
    /// assert_eq!(tree.lower_bound(&21).map(|n| *n.key()), Some(30));
    /// assert!(tree.lower_bound(&31).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn lower_bound(&self, value: &K) -> Option<NodeRef<'_, K, C>> {
        self.raw.lower_bound(value).map(|handle| self.node_ref(handle))
    }

    /// Returns the leftmost node whose key is greater than `value`, or `None`
    /// if no key is greater than `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([10, 20, 30]);
    /// assert_eq!(tree.upper_bound(&20).map(|n| *n.key()), Some(30));
    /// assert!(tree.upper_bound(&30).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn upper_bound(&self, value: &K) -> Option<NodeRef<'_, K, C>> {
        self.raw.upper_bound(value).map(|handle| self.node_ref(handle))
    }

    /// Counts the keys `k` with `lo <= k <= hi`.
    ///
    /// An inverted range (`hi < lo`) is empty and counts 0 regardless of the
    /// contents of the tree.
    ///
    /// The count is `rank(upper_bound(hi)) - rank(lower_bound(lo))`, with the
    /// tree size standing in for a missing upper bound, so no key in the range
    /// is visited.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([8, 10, 1]);
    /// assert_eq!(tree.range_count(&0, &9), 2);
    /// assert_eq!(tree.range_count(&9, &0), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn range_count(&self, lo: &K, hi: &K) -> usize {
        self.raw.range_count(lo, hi)
    }

    fn node_ref(&self, handle: Handle) -> NodeRef<'_, K, C> {
        NodeRef {
            tree: &self.raw,
            handle,
        }
    }
}

impl<K: Clone, C: Clone> OSAvlTree<K, C> {
    /// Returns an independent copy of the tree, reporting storage failures
    /// instead of panicking.
    ///
    /// The copy has the same keys, shape, heights and sizes. Storage for all
    /// nodes is reserved before any key is cloned; if a key's `clone` panics,
    /// every key cloned so far is dropped and `self` is unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`ReserveError`] if storage for the copy cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([1, 2, 3]);
    /// let copy = tree.try_clone().unwrap();
    /// assert_eq!(copy.range_count(&1, &3), 3);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn try_clone(&self) -> Result<Self, ReserveError> {
        Ok(OSAvlTree {
            raw: self.raw.try_clone()?,
        })
    }
}

/// Counts the keys of `tree` in the inclusive range `[lo, hi]`.
///
/// Equivalent to [`OSAvlTree::range_count`].
///
/// # Examples
///
/// ```
/// use osavl_tree::{OSAvlTree, range_query};
///
/// let tree = OSAvlTree::from([-5, 0, -1, 10, 2, 8]);
/// assert_eq!(range_query(&tree, &-2, &10), 5);
/// ```
#[must_use]
pub fn range_query<K, C: Compare<K>>(tree: &OSAvlTree<K, C>, lo: &K, hi: &K) -> usize {
    tree.range_count(lo, hi)
}

/// Returns the number of keys in `tree`, 0 if it is empty.
///
/// Equivalent to [`OSAvlTree::len`].
#[must_use]
pub fn total_size<K, C>(tree: &OSAvlTree<K, C>) -> usize {
    tree.len()
}

impl<K: Clone, C: Clone> Clone for OSAvlTree<K, C> {
    fn clone(&self) -> Self {
        OSAvlTree { raw: self.raw.clone() }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for OSAvlTree<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        self.raw.for_each_in_order(|key| {
            set.entry(key);
        });
        set.finish()
    }
}

impl<K, C: Default> Default for OSAvlTree<K, C> {
    /// Creates an empty tree. Taking a tree with [`core::mem::take`] leaves this
    /// empty tree behind.
    fn default() -> Self {
        OSAvlTree::with_comparator(C::default())
    }
}

impl<K, C: Compare<K> + Default> FromIterator<K> for OSAvlTree<K, C> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = OSAvlTree::default();
        tree.extend(iter);
        tree
    }
}

impl<K, C: Compare<K>> Extend<K> for OSAvlTree<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: 'a + Copy, C: Compare<K>> Extend<&'a K> for OSAvlTree<K, C> {
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        for &key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for OSAvlTree<K> {
    fn from(arr: [K; N]) -> Self {
        arr.into_iter().collect()
    }
}
