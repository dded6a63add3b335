//! Name and object registry for one object kind.
//!
//! A [`Registry`] keeps three hash maps in step:
//! - name → id (names unique per kind, compared exactly)
//! - id → name (reverse index for removal and display)
//! - id → object reference (non-owning; the managing subsystem owns objects)
//!
//! Mutations validate everything before touching any map, so a failed call
//! leaves the registry exactly as it was.
//!
//! A registry built from a snapshot has names and ids but no references. The
//! receiving context binds them with [`Registry::bind`] or
//! [`Registry::resolve_with`]; until then the reference keys are a subset of
//! the named ids.

use mdcat_result::{Error, Result};
use mdcat_types::{ObjectId, ObjectKind, is_assignable_object_id};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct Registry<R> {
    kind: ObjectKind,
    name_to_id: FxHashMap<String, ObjectId>,
    id_to_name: FxHashMap<ObjectId, String>,
    id_to_object: FxHashMap<ObjectId, R>,
}

impl<R> Registry<R> {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            name_to_id: FxHashMap::default(),
            id_to_name: FxHashMap::default(),
            id_to_object: FxHashMap::default(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Register `name` at `id` with its object reference.
    ///
    /// # Errors
    ///
    /// - [`Error::ReservedObjectId`] if `id` is outside the assignable range
    /// - [`Error::DuplicateName`] if `name` is already registered
    /// - [`Error::DuplicateId`] if `id` is already registered
    pub fn register(&mut self, name: impl Into<String>, id: ObjectId, object: R) -> Result<()> {
        let name = name.into();
        self.check_insert(&name, id)?;

        tracing::trace!(kind = %self.kind, id, name = %name, "register object");
        self.name_to_id.insert(name.clone(), id);
        self.id_to_name.insert(id, name);
        self.id_to_object.insert(id, object);
        Ok(())
    }

    /// Register a name/id pair without a reference (snapshot restore).
    pub(crate) fn insert_unbound(&mut self, name: String, id: ObjectId) -> Result<()> {
        self.check_insert(&name, id)?;
        self.name_to_id.insert(name.clone(), id);
        self.id_to_name.insert(id, name);
        Ok(())
    }

    fn check_insert(&self, name: &str, id: ObjectId) -> Result<()> {
        if !is_assignable_object_id(id) {
            return Err(Error::ReservedObjectId {
                kind: self.kind,
                id,
            });
        }
        if self.name_to_id.contains_key(name) {
            return Err(Error::DuplicateName {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        if self.id_to_name.contains_key(&id) {
            return Err(Error::DuplicateId {
                kind: self.kind,
                id,
            });
        }
        Ok(())
    }

    /// Attach (or replace) the reference for an id that is already named.
    ///
    /// Returns the reference it replaced, if any.
    pub fn bind(&mut self, id: ObjectId, object: R) -> Result<Option<R>> {
        if !self.id_to_name.contains_key(&id) {
            return Err(Error::id_not_found(self.kind, id));
        }
        Ok(self.id_to_object.insert(id, object))
    }

    /// Remove the entry for `id`, returning its name and reference.
    pub fn remove(&mut self, id: ObjectId) -> Result<(String, Option<R>)> {
        let name = self
            .id_to_name
            .remove(&id)
            .ok_or_else(|| Error::id_not_found(self.kind, id))?;
        self.name_to_id.remove(&name);
        let object = self.id_to_object.remove(&id);
        tracing::trace!(kind = %self.kind, id, name = %name, "remove object");
        Ok((name, object))
    }

    pub fn lookup_by_name(&self, name: &str) -> Result<ObjectId> {
        self.name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| Error::name_not_found(self.kind, name))
    }

    /// Reference bound to `id`. Named but unbound ids are `NotFound` too.
    pub fn lookup_by_id(&self, id: ObjectId) -> Result<&R> {
        self.id_to_object
            .get(&id)
            .ok_or_else(|| Error::id_not_found(self.kind, id))
    }

    pub fn name_of(&self, id: ObjectId) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    pub fn contains_id(&self, id: ObjectId) -> bool {
        self.id_to_name.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }

    /// `(id, name)` pairs sorted ascending by id.
    ///
    /// Hash map iteration order is arbitrary; anything persisted or compared
    /// must go through this ordering.
    pub fn entries(&self) -> Vec<(ObjectId, &str)> {
        let mut entries: Vec<(ObjectId, &str)> = self
            .id_to_name
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }

    /// Registered names, ordered by id.
    pub fn names(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Ids of bound references, ascending.
    pub fn bound_ids(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.id_to_object.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Named ids that have no reference yet, ascending.
    pub fn unbound_ids(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self
            .id_to_name
            .keys()
            .filter(|id| !self.id_to_object.contains_key(id))
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_fully_bound(&self) -> bool {
        self.id_to_object.len() == self.id_to_name.len()
    }

    /// Drop every reference, keeping names and ids.
    pub fn clear_objects(&mut self) {
        self.id_to_object.clear();
    }

    /// Re-resolve every named id through `resolve`.
    ///
    /// Existing references are discarded first. Ids for which `resolve`
    /// returns `None` stay unbound. Returns how many ids were bound.
    pub fn resolve_with<F>(&mut self, mut resolve: F) -> usize
    where
        F: FnMut(ObjectId, &str) -> Option<R>,
    {
        self.id_to_object.clear();
        for (id, name) in &self.id_to_name {
            if let Some(object) = resolve(*id, name) {
                self.id_to_object.insert(*id, object);
            }
        }
        self.id_to_object.len()
    }

    /// Copy names and ids into a registry with a different reference type and
    /// no references.
    pub fn detached<R2>(&self) -> Registry<R2> {
        Registry {
            kind: self.kind,
            name_to_id: self.name_to_id.clone(),
            id_to_name: self.id_to_name.clone(),
            id_to_object: FxHashMap::default(),
        }
    }

    /// Sum of name lengths, used for size prediction.
    pub(crate) fn name_bytes(&self) -> usize {
        self.name_to_id.keys().map(String::len).sum()
    }
}
