use alloc::vec::Vec;

use super::handle::Handle;
use crate::error::ReserveError;

/// Slot storage that owns every node of a tree.
///
/// Handles are stable for the lifetime of the element. A slot released with
/// [`take`](Arena::take) stays vacant until [`clear`](Arena::clear); the arena
/// keeps no record of it beyond the live count.
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    live: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(Handle::MAX)),
            live: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.live
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Makes room for `additional` more elements so that the next `additional`
    /// calls to [`alloc`](Arena::alloc) cannot fail.
    ///
    /// On error the arena is unchanged.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), ReserveError> {
        match self.slots.len().checked_add(additional) {
            Some(total) if total <= Handle::MAX => {}
            _ => return Err(ReserveError::CapacityExceeded { max: Handle::MAX }),
        }
        self.slots.try_reserve(additional).map_err(ReserveError::OutOfMemory)
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        // At most `Handle::MAX` slots, so every subtree size fits in a `Size`.
        assert!(
            self.slots.len() < Handle::MAX,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX
        );
        self.slots.push(Some(element));
        self.live += 1;
        Handle::from_index(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Moves the element out, leaving its slot vacant.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.live -= 1;
        element
    }

    /// Drops every remaining element and forgets all handles, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.live = 0;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn arena_capacity() {
        let arena: Arena<u32> = Arena::with_capacity(10);
        assert!(arena.capacity() >= 10);
        assert!(arena.is_empty());
    }

    #[test]
    fn reserve_beyond_max_is_rejected() {
        let mut arena: Arena<u32> = Arena::new();
        arena.alloc(1);
        assert_eq!(
            arena.try_reserve(Handle::MAX),
            Err(ReserveError::CapacityExceeded { max: Handle::MAX })
        );
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.try_reserve(Handle::MAX - 1), Ok(()));
    }

    #[test]
    fn taken_slots_stay_vacant_until_clear() {
        let mut arena: Arena<u32> = Arena::new();
        let handles: Vec<Handle> = (0..3).map(|v| arena.alloc(v)).collect();
        assert_eq!(arena.take(handles[1]), 1);
        assert_eq!(arena.len(), 2);

        // No slot is recycled before `clear`.
        assert_eq!(arena.alloc(3).to_index(), 3);
        assert_eq!(arena.len(), 3);

        let capacity = arena.capacity();
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.capacity(), capacity);
        assert_eq!(arena.alloc(4).to_index(), 0);
    }

    #[test]
    fn failed_allocation_leaves_arena_unchanged() {
        // Each element is 64 GiB, so no address space can hold the reservation.
        let mut arena: Arena<[u8; 1 << 36]> = Arena::new();
        assert!(matches!(arena.try_reserve(Handle::MAX), Err(ReserveError::OutOfMemory(_))));
        assert!(arena.is_empty());
        assert_eq!(arena.capacity(), 0);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn get_after_take_panics() {
        let mut arena: Arena<u32> = Arena::new();
        let h = arena.alloc(7);
        assert_eq!(arena.take(h), 7);
        let _ = arena.get(h);
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.alloc(value);
                        model.push((handle, value));
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        *arena.get_mut(model[index].0) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let value = arena.take(model[index].0);
                        let (_, expected) = model.swap_remove(index);
                        prop_assert_eq!(value, expected);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());
                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        GetMut(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            5 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
