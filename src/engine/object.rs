//! GameObject identity with generational indices
//!
//! Objects are referred to by `ObjectId` rather than by pointer. Each slot
//! carries a generation counter that is bumped when the object is despawned,
//! so an id held by a handler after its object is gone resolves to nothing
//! instead of to whatever object reused the slot.

use std::fmt;

/// A handle to a GameObject in a [`Scene`](super::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    /// Index into the object storage
    index: u32,
    /// Generation counter - increments when slot is reused
    generation: u32,
}

impl ObjectId {
    /// Should only be called by ObjectAllocator (and tests).
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Allocates and tracks object lifetimes.
#[derive(Debug, Default)]
pub struct ObjectAllocator {
    /// Generation counter for each slot
    generations: Vec<u32>,
    /// Free slots available for reuse (LIFO)
    free_indices: Vec<u32>,
    /// Number of currently alive objects
    alive_count: u32,
}

impl ObjectAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new object id.
    pub fn allocate(&mut self) -> ObjectId {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            // Generation was already incremented on free
            ObjectId::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            ObjectId::new(index, 0)
        }
    }

    /// Free an id, making its slot available for reuse.
    /// Returns true if the id was alive and is now freed.
    pub fn free(&mut self, id: ObjectId) -> bool {
        if !self.is_alive(id) {
            return false;
        }

        self.generations[id.index as usize] += 1;
        self.free_indices.push(id.index);
        self.alive_count -= 1;
        true
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        let idx = id.index as usize;
        idx < self.generations.len() && self.generations[idx] == id.generation
            && !self.free_indices.contains(&id.index)
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_free() {
        let mut alloc = ObjectAllocator::new();

        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_eq!(alloc.alive_count(), 2);
        assert!(alloc.is_alive(a));
        assert!(alloc.is_alive(b));

        assert!(alloc.free(a));
        assert_eq!(alloc.alive_count(), 1);
        assert!(!alloc.is_alive(a));
        assert!(alloc.is_alive(b));

        // Double free is rejected
        assert!(!alloc.free(a));
        assert_eq!(alloc.alive_count(), 1);
    }

    #[test]
    fn test_generation_prevents_reuse_collision() {
        let mut alloc = ObjectAllocator::new();

        let first = alloc.allocate();
        alloc.free(first);

        let second = alloc.allocate();
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());

        assert!(!alloc.is_alive(first));
        assert!(alloc.is_alive(second));
    }

    #[test]
    fn test_unknown_id_is_dead() {
        let alloc = ObjectAllocator::new();
        assert!(!alloc.is_alive(ObjectId::new(7, 0)));
    }
}
