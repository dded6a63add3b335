//! Plain structural view of a catalog's persistable state.
//!
//! [`CatalogState`] holds exactly what a snapshot carries: identity, the four
//! counters, and the `(id, name)` pairs of every kind sorted by id. Object
//! references are never part of it.

use mdcat_result::{Error, Result};
use mdcat_types::{CatalogId, ObjectId, ObjectKind, is_assignable_object_id, is_valid_counter};
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogState {
    pub catalog_id: CatalogId,
    pub name: String,
    /// Per-kind state, indexed by [`ObjectKind::index`].
    pub kinds: [KindState; ObjectKind::COUNT],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindState {
    /// Allocator position for this kind.
    pub next_id: ObjectId,
    /// `(id, name)` pairs, strictly ascending by id.
    pub entries: Vec<(ObjectId, String)>,
}

impl Default for KindState {
    fn default() -> Self {
        Self {
            next_id: mdcat_types::FIRST_OBJECT_ID,
            entries: Vec::new(),
        }
    }
}

impl CatalogState {
    pub fn kind(&self, kind: ObjectKind) -> &KindState {
        &self.kinds[kind.index()]
    }

    pub fn counters(&self) -> [ObjectId; ObjectKind::COUNT] {
        ObjectKind::ALL.map(|kind| self.kind(kind).next_id)
    }

    /// Check the structural rules a restorable state must satisfy.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedInput`] naming the first violation found:
    /// - counter outside `FIRST_OBJECT_ID..=i16::MAX`
    /// - id outside the assignable range or not below its kind's counter
    /// - ids not strictly ascending (this includes duplicates)
    /// - duplicate names within a kind
    pub fn validate(&self) -> Result<()> {
        for kind in ObjectKind::ALL {
            let ks = self.kind(kind);
            if !is_valid_counter(ks.next_id) {
                return Err(Error::malformed(format!(
                    "{kind} counter {} out of range",
                    ks.next_id
                )));
            }

            let mut names: FxHashSet<&str> = FxHashSet::default();
            let mut prev: Option<ObjectId> = None;
            for (id, name) in &ks.entries {
                if !is_assignable_object_id(*id) {
                    return Err(Error::malformed(format!("{kind} id {id} out of range")));
                }
                if *id >= ks.next_id {
                    return Err(Error::malformed(format!(
                        "{kind} id {id} not below counter {}",
                        ks.next_id
                    )));
                }
                if prev.is_some_and(|p| p >= *id) {
                    return Err(Error::malformed(format!(
                        "{kind} ids not strictly ascending at {id}"
                    )));
                }
                if !names.insert(name.as_str()) {
                    return Err(Error::malformed(format!(
                        "duplicate {kind} name '{name}'"
                    )));
                }
                prev = Some(*id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdcat_types::EXHAUSTED_COUNTER;

    fn state_with(kind: ObjectKind, next_id: ObjectId, entries: &[(ObjectId, &str)]) -> CatalogState {
        let mut kinds: [KindState; ObjectKind::COUNT] = Default::default();
        kinds[kind.index()] = KindState {
            next_id,
            entries: entries.iter().map(|(id, n)| (*id, n.to_string())).collect(),
        };
        CatalogState {
            catalog_id: 1,
            name: "sales".into(),
            kinds,
        }
    }

    #[test]
    fn valid_state_passes() {
        let state = state_with(ObjectKind::Table, 5, &[(1, "a"), (3, "b"), (4, "c")]);
        state.validate().unwrap();
        assert_eq!(state.counters(), [1, 1, 5, 1]);
    }

    #[test]
    fn exhausted_counter_is_valid() {
        let state = state_with(ObjectKind::User, EXHAUSTED_COUNTER, &[(1, "root")]);
        state.validate().unwrap();
    }

    #[test]
    fn rejects_structural_violations() {
        let cases = [
            state_with(ObjectKind::User, 0, &[]),
            state_with(ObjectKind::User, 5, &[(0, "zero")]),
            state_with(ObjectKind::User, 5, &[(5, "at_counter")]),
            state_with(ObjectKind::User, 5, &[(2, "a"), (2, "b")]),
            state_with(ObjectKind::User, 5, &[(3, "a"), (2, "b")]),
            state_with(ObjectKind::User, 5, &[(1, "a"), (2, "a")]),
        ];
        for state in cases {
            assert!(
                matches!(state.validate(), Err(Error::MalformedInput(_))),
                "expected rejection for {state:?}"
            );
        }
    }
}
