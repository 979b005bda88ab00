/// A zero-based position in the sorted order of a tree.
///
/// Used to index a tree by rank, the inverse of [`NodeRef::rank`](crate::NodeRef::rank).
///
/// # Examples
///
/// ```
/// use osavl_tree::{OSAvlTree, Rank};
///
/// let tree = OSAvlTree::from([30, 10, 20]);
/// assert_eq!(tree[Rank(0)], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
