use super::handle::Handle;
use super::size::Size;

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// AVL node augmented with its subtree size.
pub(crate) struct Node<K> {
    key: K,
    // Back-reference for upward walks. Never used to release a node.
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
    // 1 + max(height(left), height(right)); an absent subtree has height 0.
    height: u8,
    // 1 + size(left) + size(right).
    size: Size,
}

impl<K> Node<K> {
    /// Creates a detached leaf.
    pub(crate) fn leaf(key: K, parent: Option<Handle>) -> Self {
        Self {
            key,
            parent,
            left: None,
            right: None,
            height: 1,
            size: Size::ONE,
        }
    }

    /// Creates a copy of `source` with the same key, height and size but no links.
    pub(crate) fn unlinked_copy(source: &Self, parent: Option<Handle>) -> Self
    where
        K: Clone,
    {
        Self {
            key: source.key.clone(),
            parent,
            left: None,
            right: None,
            height: source.height,
            size: source.size,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns which side `child` hangs from. `child` must be a child of this node.
    pub(crate) fn side_of(&self, child: Handle) -> Side {
        if self.left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(self.right, Some(child), "`Node::side_of()` - not a child");
            Side::Right
        }
    }

    #[inline]
    pub(crate) fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub(crate) fn size(&self) -> Size {
        self.size
    }

    /// Recomputes height and size from the children's values.
    pub(crate) fn refresh(&mut self, left: (u8, usize), right: (u8, usize)) {
        self.height = 1 + left.0.max(right.0);
        self.size = Size::from_usize(1 + left.1 + right.1);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn leaf_has_unit_augmentation() {
        let node = Node::leaf(5, None);
        assert_eq!(*node.key(), 5);
        assert_eq!(node.height(), 1);
        assert_eq!(node.size().to_usize(), 1);
        assert!(node.left().is_none() && node.right().is_none());
    }

    #[test]
    fn refresh_combines_children() {
        let mut node = Node::leaf(5, None);
        node.refresh((2, 3), (1, 1));
        assert_eq!(node.height(), 3);
        assert_eq!(node.size().to_usize(), 5);
    }

    #[test]
    fn side_of_child() {
        let mut node = Node::leaf(0, None);
        let a = Handle::from_index(1);
        let b = Handle::from_index(2);
        node.set_child(Side::Left, Some(a));
        node.set_child(Side::Right, Some(b));
        assert_eq!(node.side_of(a), Side::Left);
        assert_eq!(node.side_of(b), Side::Right);
        assert_eq!(node.child(Side::Right), Some(b));
    }

    #[test]
    fn unlinked_copy_keeps_augmentation() {
        let mut source = Node::leaf(9, Some(Handle::from_index(0)));
        source.refresh((1, 1), (2, 2));
        let copy = Node::unlinked_copy(&source, None);
        assert_eq!(*copy.key(), 9);
        assert_eq!(copy.height(), 3);
        assert_eq!(copy.size(), source.size());
        assert!(copy.parent().is_none() && copy.left().is_none());
    }
}
