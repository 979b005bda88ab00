//! The total order a tree sorts its keys by.

/// A strict weak "less than" predicate over keys.
///
/// A tree only ever asks whether one key is less than another; two keys are
/// considered equal when neither is less than the other. The predicate must
/// describe a total order over the keys stored in a tree, otherwise the
/// results of queries are unspecified (but memory safe).
///
/// Any `Fn(&K, &K) -> bool` closure is a comparator:
///
/// ```
/// use osavl_tree::OSAvlTree;
///
/// // Descending order.
/// let mut tree = OSAvlTree::with_comparator(|a: &i32, b: &i32| a > b);
/// tree.extend([1, 5, 3]);
/// assert_eq!(tree.first(), Some(&5));
/// ```
pub trait Compare<K: ?Sized> {
    /// Returns `true` if `a` sorts strictly before `b`.
    fn less(&self, a: &K, b: &K) -> bool;
}

/// Orders keys by their [`Ord`] implementation.
///
/// This is the default comparator of [`OSAvlTree`](crate::OSAvlTree).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}
