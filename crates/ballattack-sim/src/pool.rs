//! Fixed-capacity entity pools.
//!
//! Combat entities churn at high frequency, so slots are preallocated and
//! toggled active/inactive instead of allocated and freed. Acquire is a
//! linear scan for the first inactive slot — fine at the pool sizes used
//! here (≤ 500).

/// A pooled entity slot. Implementors expose their active flag; the pool
/// never mutates it.
pub trait Slot {
    fn is_active(&self) -> bool;
}

/// Fixed-capacity arena of reusable slots, indexed by slot id.
pub struct Pool<T> {
    slots: Vec<T>,
}

impl<T: Slot> Pool<T> {
    /// Build a pool of `capacity` slots from the given constructor.
    pub fn from_fn(capacity: usize, mut f: impl FnMut(usize) -> T) -> Self {
        Self {
            slots: (0..capacity).map(&mut f).collect(),
        }
    }

    /// First inactive slot, or `None` when the pool is exhausted.
    /// The caller activates the slot; the pool only finds it.
    pub fn acquire_mut(&mut self) -> Option<(usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| !slot.is_active())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }

    /// Iterate (slot id, slot) pairs.
    pub fn enumerate(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_active()).count()
    }

    pub fn inactive_count(&self) -> usize {
        self.capacity() - self.active_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct TestSlot {
        active: bool,
        value: u32,
    }

    impl Slot for TestSlot {
        fn is_active(&self) -> bool {
            self.active
        }
    }

    fn pool(capacity: usize) -> Pool<TestSlot> {
        Pool::from_fn(capacity, |_| TestSlot::default())
    }

    #[test]
    fn acquire_activates_distinct_slots() {
        let mut pool = pool(4);
        let mut seen = Vec::new();
        for i in 0..4 {
            let (idx, slot) = pool.acquire_mut().expect("slot available");
            slot.active = true;
            slot.value = i;
            assert!(!seen.contains(&idx), "slot {idx} handed out twice");
            seen.push(idx);
        }
        assert_eq!(pool.active_count(), 4);
        assert!(pool.acquire_mut().is_none(), "exhausted pool yields None");
    }

    #[test]
    fn conservation_invariant() {
        let mut pool = pool(8);
        for _ in 0..5 {
            let (_, slot) = pool.acquire_mut().unwrap();
            slot.active = true;
            assert_eq!(pool.active_count() + pool.inactive_count(), pool.capacity());
        }
        // Release two and re-check.
        pool.get_mut(1).unwrap().active = false;
        pool.get_mut(3).unwrap().active = false;
        assert_eq!(pool.active_count(), 3);
        assert_eq!(pool.active_count() + pool.inactive_count(), pool.capacity());
    }

    #[test]
    fn released_slots_are_reused() {
        let mut pool = pool(2);
        for _ in 0..2 {
            pool.acquire_mut().unwrap().1.active = true;
        }
        pool.get_mut(0).unwrap().active = false;
        let (idx, _) = pool.acquire_mut().unwrap();
        assert_eq!(idx, 0);
    }
}
