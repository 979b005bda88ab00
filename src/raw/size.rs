use core::num::NonZero;

use super::handle::{Handle, RawHandle};

/// Number of nodes in the subtree rooted at a live node.
///
/// A live subtree always contains at least its root, so the count is stored as
/// a `NonZero`; an absent subtree has size 0 and is represented by `None`
/// (see [`Size::of`]).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Size(NonZero<RawHandle>);

impl Size {
    /// A tree never holds more nodes than it has handles.
    pub(crate) const MAX: usize = Handle::MAX;
    pub(crate) const ONE: Self = Self::from_usize(1);

    #[inline]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size != 0, "`Size::from_usize()` - `size` == 0!");
        assert!(size <= Self::MAX, "`Size::from_usize()` - `size` > `Size::MAX`!");
        // Checked above: non-zero and within `RawHandle`.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new(size as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0.get() as usize
    }

    /// Size of an optional subtree, 0 when absent.
    #[inline]
    pub(crate) fn of(size: Option<Self>) -> usize {
        size.map_or(0, Self::to_usize)
    }
}
