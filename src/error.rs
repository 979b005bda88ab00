//! Errors reported by the fallible tree operations.

use alloc::collections::TryReserveError;
use core::fmt;

/// The tree could not make room for more nodes.
///
/// Returned by [`OSAvlTree::try_insert`](crate::OSAvlTree::try_insert) and
/// [`OSAvlTree::try_clone`](crate::OSAvlTree::try_clone). When either returns
/// this error no node has been linked into any tree: the tree being inserted
/// into, or the tree being copied, is exactly as it was before the call.
///
/// # Examples
///
/// ```
/// use osavl_tree::{OSAvlTree, ReserveError};
///
/// let mut tree = OSAvlTree::new();
/// let inserted: Result<bool, ReserveError> = tree.try_insert(7);
/// assert_eq!(inserted, Ok(true));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReserveError {
    /// The tree already holds the maximum number of nodes it can address.
    CapacityExceeded {
        /// The maximum number of nodes a tree can hold.
        max: usize,
    },
    /// The allocator could not grow the node storage.
    OutOfMemory(TryReserveError),
}

impl fmt::Display for ReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReserveError::CapacityExceeded { max } => write!(f, "tree is at maximum capacity ({max} nodes)"),
            ReserveError::OutOfMemory(err) => write!(f, "failed to allocate tree node: {err}"),
        }
    }
}

impl core::error::Error for ReserveError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ReserveError::CapacityExceeded { .. } => None,
            ReserveError::OutOfMemory(err) => Some(err),
        }
    }
}
