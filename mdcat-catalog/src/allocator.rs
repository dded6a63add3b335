//! Per-kind identifier allocation.
//!
//! Each kind has one counter holding the next id to hand out. Allocation is
//! return-then-increment starting at [`FIRST_OBJECT_ID`]; the counter value
//! [`EXHAUSTED_COUNTER`] means every id has been issued. Counters never wrap and
//! never move backwards, so an id is issued at most once per allocator.

use mdcat_result::{Error, Result};
use mdcat_types::{EXHAUSTED_COUNTER, FIRST_OBJECT_ID, MAX_OBJECT_ID, ObjectId, ObjectKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: [ObjectId; ObjectKind::COUNT],
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: [FIRST_OBJECT_ID; ObjectKind::COUNT],
        }
    }

    /// Rebuild from persisted counters. Callers validate the values first.
    pub(crate) fn from_counters(next: [ObjectId; ObjectKind::COUNT]) -> Self {
        Self { next }
    }

    /// Issue the next id for `kind`.
    ///
    /// # Errors
    ///
    /// [`Error::AllocationExhausted`] once [`MAX_OBJECT_ID`] has been issued.
    /// The counter is left unchanged.
    pub fn next_id(&mut self, kind: ObjectKind) -> Result<ObjectId> {
        let slot = &mut self.next[kind.index()];
        if *slot >= EXHAUSTED_COUNTER {
            return Err(Error::AllocationExhausted(kind));
        }
        let id = *slot;
        *slot += 1;
        Ok(id)
    }

    /// The id the next call to [`IdAllocator::next_id`] would return, or the
    /// exhausted sentinel.
    #[inline]
    pub fn peek(&self, kind: ObjectKind) -> ObjectId {
        self.next[kind.index()]
    }

    #[inline]
    pub fn is_exhausted(&self, kind: ObjectKind) -> bool {
        self.peek(kind) >= EXHAUSTED_COUNTER
    }

    /// Advance past an id registered explicitly so it is never issued later.
    ///
    /// Ids below the counter leave it untouched.
    pub fn observe(&mut self, kind: ObjectKind, id: ObjectId) {
        debug_assert!(id <= MAX_OBJECT_ID, "observed id {id} beyond MAX_OBJECT_ID");
        let slot = &mut self.next[kind.index()];
        if id >= *slot {
            *slot = id + 1;
        }
    }

    /// Counters in wire order (user, schema, table, index).
    pub fn counters(&self) -> [ObjectId; ObjectKind::COUNT] {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn ids_are_distinct_and_increasing() {
        let mut alloc = IdAllocator::new();
        let mut seen = FxHashSet::default();
        let mut last = 0;
        for _ in 0..1_000 {
            let id = alloc.next_id(ObjectKind::Table).unwrap();
            assert!(id > last);
            assert!(seen.insert(id));
            last = id;
        }
    }

    #[test]
    fn kinds_have_independent_counters() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.next_id(ObjectKind::User).unwrap(), FIRST_OBJECT_ID);
        assert_eq!(alloc.next_id(ObjectKind::User).unwrap(), FIRST_OBJECT_ID + 1);
        assert_eq!(alloc.next_id(ObjectKind::Index).unwrap(), FIRST_OBJECT_ID);
        assert_eq!(alloc.peek(ObjectKind::Schema), FIRST_OBJECT_ID);
        assert_eq!(alloc.peek(ObjectKind::Table), FIRST_OBJECT_ID);
    }

    #[test]
    fn exhaustion_fails_instead_of_wrapping() {
        let mut alloc = IdAllocator::new();
        alloc.observe(ObjectKind::Schema, MAX_OBJECT_ID - 1);
        assert_eq!(alloc.next_id(ObjectKind::Schema).unwrap(), MAX_OBJECT_ID);
        assert!(alloc.is_exhausted(ObjectKind::Schema));

        for _ in 0..3 {
            assert!(matches!(
                alloc.next_id(ObjectKind::Schema),
                Err(Error::AllocationExhausted(ObjectKind::Schema))
            ));
        }
        assert_eq!(alloc.peek(ObjectKind::Schema), EXHAUSTED_COUNTER);
        // Other kinds keep allocating.
        assert_eq!(alloc.next_id(ObjectKind::User).unwrap(), FIRST_OBJECT_ID);
    }

    #[test]
    fn observe_never_moves_backwards() {
        let mut alloc = IdAllocator::new();
        alloc.observe(ObjectKind::Table, 40);
        assert_eq!(alloc.peek(ObjectKind::Table), 41);
        alloc.observe(ObjectKind::Table, 7);
        assert_eq!(alloc.peek(ObjectKind::Table), 41);
    }

    #[test]
    fn full_id_space_is_issued_once() {
        let mut alloc = IdAllocator::new();
        let mut count = 0usize;
        while alloc.next_id(ObjectKind::Index).is_ok() {
            count += 1;
        }
        assert_eq!(count, (MAX_OBJECT_ID - FIRST_OBJECT_ID + 1) as usize);
    }
}
