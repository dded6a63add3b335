//! The catalog: identity, allocator, registries and storage environment.
//!
//! # Architecture
//!
//! - **IdAllocator**: mints per-kind ids, never reissues one
//! - **Registry** (one per kind): name ↔ id and id → object reference
//! - **codec**: deterministic snapshots of identity, counters and names
//! - **EnvironmentManager**: lifetime of the on-disk environment
//!
//! The managing subsystem owns the user/schema/table/index objects and hands
//! the catalog non-owning references `R` to them (by default an
//! [`ObjectHandle`] into its arena).
//!
//! # Replication
//!
//! A catalog is moved between execution contexts as a [`CatalogSnapshot`]:
//! encode, transmit, decode, then bind references in the receiving context
//! with [`Catalog::bind_object`] or [`Catalog::resolve_objects`]. A `clone()`
//! keeps references, which are only meaningful in the context that produced
//! them; use [`Catalog::detached`] for a copy without any.
//!
//! # Concurrency
//!
//! Single owner. Every mutation takes `&mut self`; there is no internal
//! locking.

use std::path::Path;

use mdcat_result::Result;
use mdcat_storage::{
    DefaultEngine, DeleteReport, EnvironmentManager, EnvironmentOptions, StorageEngine,
};
use mdcat_types::{CatalogId, ObjectHandle, ObjectId, ObjectKind};

use crate::allocator::IdAllocator;
use crate::codec::{self, EncodeView};
use crate::registry::Registry;
use crate::snapshot::CatalogSnapshot;
use crate::state::{CatalogState, KindState};

/// Catalog over object references `R`, persisted through engine `E`.
///
/// `E` defaults to [`DefaultEngine`], which follows the
/// `simd-r-drive-support` feature.
#[derive(Debug)]
pub struct Catalog<R = ObjectHandle, E: StorageEngine = DefaultEngine> {
    id: CatalogId,
    name: String,
    allocator: IdAllocator,
    registries: [Registry<R>; ObjectKind::COUNT],
    environment: EnvironmentManager<E>,
}

impl<R, E: StorageEngine + Default> Default for Catalog<R, E> {
    /// Empty catalog with id `0` and no name; the target of a decode.
    fn default() -> Self {
        Self::new(0, String::new())
    }
}

impl<R, E: StorageEngine + Default> Catalog<R, E> {
    /// Create a catalog with an identity the managing subsystem has already
    /// verified to be unique.
    pub fn new(id: CatalogId, name: impl Into<String>) -> Self {
        Self::with_environment(id, name, EnvironmentManager::default())
    }

    /// Restore from a validated [`CatalogState`]. References start unbound.
    pub fn from_state(state: CatalogState) -> Result<Self> {
        Self::from_state_with_environment(state, EnvironmentManager::default())
    }

    /// Decode a snapshot produced by [`Catalog::encode_into`].
    ///
    /// # Errors
    ///
    /// [`mdcat_result::Error::MalformedInput`] for truncated, over-long or
    /// inconsistent input. Nothing is returned on failure.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let catalog = Self::from_state(codec::parse_state(bytes)?)?;
        tracing::debug!(
            catalog_id = catalog.id,
            name = %catalog.name,
            bytes = bytes.len(),
            "catalog decoded"
        );
        Ok(catalog)
    }
}

impl<R, E: StorageEngine> Catalog<R, E> {
    pub fn with_environment(
        id: CatalogId,
        name: impl Into<String>,
        environment: EnvironmentManager<E>,
    ) -> Self {
        let name = name.into();
        tracing::debug!(catalog_id = id, name = %name, "catalog created");
        Self {
            id,
            name,
            allocator: IdAllocator::new(),
            registries: ObjectKind::ALL.map(Registry::new),
            environment,
        }
    }

    pub fn from_state_with_environment(
        state: CatalogState,
        environment: EnvironmentManager<E>,
    ) -> Result<Self> {
        state.validate()?;
        let CatalogState {
            catalog_id,
            name,
            kinds,
        } = state;

        let allocator = IdAllocator::from_counters(kinds.each_ref().map(|ks| ks.next_id));
        let mut registries = ObjectKind::ALL.map(Registry::new);
        for (kind, ks) in ObjectKind::ALL.into_iter().zip(kinds) {
            let reg = &mut registries[kind.index()];
            for (id, name) in ks.entries {
                reg.insert_unbound(name, id)?;
            }
        }

        Ok(Self {
            id: catalog_id,
            name,
            allocator,
            registries,
            environment,
        })
    }

    pub fn id(&self) -> CatalogId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ------------------------------------------------------------------
    // Identifier allocation
    // ------------------------------------------------------------------

    pub fn next_id(&mut self, kind: ObjectKind) -> Result<ObjectId> {
        self.allocator.next_id(kind)
    }

    pub fn next_user_id(&mut self) -> Result<ObjectId> {
        self.next_id(ObjectKind::User)
    }

    pub fn next_schema_id(&mut self) -> Result<ObjectId> {
        self.next_id(ObjectKind::Schema)
    }

    pub fn next_table_id(&mut self) -> Result<ObjectId> {
        self.next_id(ObjectKind::Table)
    }

    pub fn next_index_id(&mut self) -> Result<ObjectId> {
        self.next_id(ObjectKind::Index)
    }

    pub fn peek_next_id(&self, kind: ObjectKind) -> ObjectId {
        self.allocator.peek(kind)
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    // ------------------------------------------------------------------
    // Registries
    // ------------------------------------------------------------------

    pub fn registry(&self, kind: ObjectKind) -> &Registry<R> {
        &self.registries[kind.index()]
    }

    pub fn len(&self, kind: ObjectKind) -> usize {
        self.registry(kind).len()
    }

    /// True when no kind has any registered name.
    pub fn is_empty(&self) -> bool {
        self.registries.iter().all(Registry::is_empty)
    }

    pub fn contains_name(&self, kind: ObjectKind, name: &str) -> bool {
        self.registry(kind).contains_name(name)
    }

    pub fn contains_id(&self, kind: ObjectKind, id: ObjectId) -> bool {
        self.registry(kind).contains_id(id)
    }

    /// Names of `kind`, ordered by id.
    pub fn names(&self, kind: ObjectKind) -> Vec<String> {
        self.registry(kind).names()
    }

    /// `(id, name)` pairs of `kind`, ascending by id.
    pub fn entries(&self, kind: ObjectKind) -> Vec<(ObjectId, &str)> {
        self.registry(kind).entries()
    }

    /// Register `name` at `id` for `kind`, with the object's reference.
    ///
    /// An id at or above the allocator position moves the allocator past it,
    /// so explicitly registered ids are never issued later.
    ///
    /// # Errors
    ///
    /// `DuplicateName`, `DuplicateId` or `ReservedObjectId`; on error neither
    /// the registry nor the allocator changes.
    pub fn register_object(
        &mut self,
        kind: ObjectKind,
        name: impl Into<String>,
        id: ObjectId,
        object: R,
    ) -> Result<()> {
        self.registries[kind.index()].register(name, id, object)?;
        self.allocator.observe(kind, id);
        Ok(())
    }

    pub fn lookup_by_name(&self, kind: ObjectKind, name: &str) -> Result<ObjectId> {
        self.registry(kind).lookup_by_name(name)
    }

    pub fn lookup_by_id(&self, kind: ObjectKind, id: ObjectId) -> Result<&R> {
        self.registry(kind).lookup_by_id(id)
    }

    pub fn name_of(&self, kind: ObjectKind, id: ObjectId) -> Option<&str> {
        self.registry(kind).name_of(id)
    }

    /// Remove `id` from both maps. The allocator is not rewound.
    pub fn remove(&mut self, kind: ObjectKind, id: ObjectId) -> Result<(String, Option<R>)> {
        self.registries[kind.index()].remove(id)
    }

    /// Attach a reference to an id restored from a snapshot.
    pub fn bind_object(&mut self, kind: ObjectKind, id: ObjectId, object: R) -> Result<Option<R>> {
        self.registries[kind.index()].bind(id, object)
    }

    pub fn unbound_ids(&self, kind: ObjectKind) -> Vec<ObjectId> {
        self.registry(kind).unbound_ids()
    }

    /// True once every named id of every kind has a reference.
    pub fn is_fully_bound(&self) -> bool {
        self.registries.iter().all(Registry::is_fully_bound)
    }

    /// Discard every object reference, keeping names, ids and counters.
    pub fn clear_objects(&mut self) {
        for reg in &mut self.registries {
            reg.clear_objects();
        }
    }

    /// Re-resolve every reference through `resolve(kind, id, name)`.
    ///
    /// This is the post-processing pass a receiving context runs after taking
    /// over a copied catalog. Returns the number of references bound.
    pub fn resolve_objects<F>(&mut self, mut resolve: F) -> usize
    where
        F: FnMut(ObjectKind, ObjectId, &str) -> Option<R>,
    {
        let mut bound = 0;
        for reg in &mut self.registries {
            let kind = reg.kind();
            bound += reg.resolve_with(|id, name| resolve(kind, id, name));
        }
        bound
    }

    // ------------------------------------------------------------------
    // Persistence and replication
    // ------------------------------------------------------------------

    /// Plain view of identity, counters and sorted names.
    pub fn export_state(&self) -> CatalogState {
        let kinds = ObjectKind::ALL.map(|kind| KindState {
            next_id: self.allocator.peek(kind),
            entries: self
                .registry(kind)
                .entries()
                .into_iter()
                .map(|(id, name)| (id, name.to_string()))
                .collect(),
        });
        CatalogState {
            catalog_id: self.id,
            name: self.name.clone(),
            kinds,
        }
    }

    fn encode_view(&self) -> EncodeView<'_, R> {
        EncodeView {
            catalog_id: self.id,
            name: &self.name,
            counters: self.allocator.counters(),
            registries: &self.registries,
        }
    }

    /// Exact size of the snapshot [`Catalog::encode_into`] would write.
    pub fn encoded_len(&self) -> usize {
        codec::encoded_len(&self.encode_view())
    }

    /// Append the snapshot bytes to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        codec::encode_into(&self.encode_view(), out)
    }

    /// Encode into a buffer allocated once at the exact size.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out)?;
        debug_assert_eq!(out.len(), out.capacity());
        Ok(out)
    }

    pub fn snapshot(&self) -> Result<CatalogSnapshot> {
        Ok(CatalogSnapshot::from_encoded(self.encode_to_vec()?))
    }

    /// Copy identity, counters and names with no object references.
    ///
    /// The copy gets a closed environment manager of its own.
    pub fn detached<R2>(&self) -> Catalog<R2, E>
    where
        E: Clone,
    {
        Catalog {
            id: self.id,
            name: self.name.clone(),
            allocator: self.allocator.clone(),
            registries: self.registries.each_ref().map(|reg| reg.detached()),
            environment: self.environment.closed_copy(),
        }
    }

    /// Assign identity, counters, names and references from `orig`.
    ///
    /// This catalog keeps its own environment. References copied from `orig`
    /// are valid only in `orig`'s execution context.
    pub fn cp(&mut self, orig: &Catalog<R, E>)
    where
        R: Clone,
    {
        self.id = orig.id;
        self.name.clone_from(&orig.name);
        self.allocator = orig.allocator.clone();
        self.registries = orig.registries.clone();
    }

    // ------------------------------------------------------------------
    // Storage environment
    // ------------------------------------------------------------------

    pub fn environment(&self) -> &EnvironmentManager<E> {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut EnvironmentManager<E> {
        &mut self.environment
    }

    pub fn environment_options(&self) -> &EnvironmentOptions {
        self.environment.options()
    }

    pub fn open_environment(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.environment.open(path)
    }

    /// See [`EnvironmentManager::close`]; panics if derived handles are alive.
    pub fn close_environment(&mut self) -> Result<()> {
        self.environment.close()
    }

    pub fn delete_environment(&mut self, path: impl AsRef<Path>) -> Result<DeleteReport> {
        self.environment.delete(path)
    }
}

impl<R: Clone, E: StorageEngine + Clone> Clone for Catalog<R, E> {
    /// Copy everything except the environment, which starts closed.
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            allocator: self.allocator.clone(),
            registries: self.registries.clone(),
            environment: self.environment.closed_copy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdcat_result::Error;
    use mdcat_types::FIRST_OBJECT_ID;

    type TestCatalog = Catalog<ObjectHandle>;

    #[test]
    fn register_advances_allocator_past_explicit_ids() {
        let mut cat = TestCatalog::new(1, "sales");
        cat.register_object(ObjectKind::Table, "orders", 10, ObjectHandle::new(1))
            .unwrap();
        assert_eq!(cat.next_table_id().unwrap(), 11);

        // Lower explicit ids do not rewind the counter.
        cat.register_object(ObjectKind::Table, "lines", 3, ObjectHandle::new(2))
            .unwrap();
        assert_eq!(cat.next_table_id().unwrap(), 12);
    }

    #[test]
    fn failed_register_leaves_allocator() {
        let mut cat = TestCatalog::new(1, "sales");
        cat.register_object(ObjectKind::User, "alice", 1, ObjectHandle::new(1))
            .unwrap();
        let before = cat.peek_next_id(ObjectKind::User);
        let err = cat
            .register_object(ObjectKind::User, "alice", 50, ObjectHandle::new(2))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateName { .. }));
        assert_eq!(cat.peek_next_id(ObjectKind::User), before);
    }

    #[test]
    fn removed_ids_are_not_reissued() {
        let mut cat = TestCatalog::new(1, "sales");
        let id = cat.next_index_id().unwrap();
        cat.register_object(ObjectKind::Index, "pk", id, ObjectHandle::new(9))
            .unwrap();
        cat.remove(ObjectKind::Index, id).unwrap();
        assert_ne!(cat.next_index_id().unwrap(), id);
    }

    #[test]
    fn clone_keeps_references_detached_drops_them() {
        let mut cat = TestCatalog::new(3, "hr");
        let id = cat.next_user_id().unwrap();
        cat.register_object(ObjectKind::User, "root", id, ObjectHandle::new(77))
            .unwrap();

        let copy = cat.clone();
        assert_eq!(*copy.lookup_by_id(ObjectKind::User, id).unwrap(), ObjectHandle::new(77));
        assert_eq!(copy.export_state(), cat.export_state());

        let detached: Catalog<u64> = cat.detached();
        assert!(detached.lookup_by_id(ObjectKind::User, id).is_err());
        assert_eq!(detached.unbound_ids(ObjectKind::User), vec![id]);
        assert_eq!(detached.export_state(), cat.export_state());
    }

    #[test]
    fn cp_assigns_state() {
        let mut src = TestCatalog::new(4, "ops");
        let id = src.next_schema_id().unwrap();
        src.register_object(ObjectKind::Schema, "public", id, ObjectHandle::new(1))
            .unwrap();

        let mut dst = TestCatalog::default();
        assert_eq!(dst.peek_next_id(ObjectKind::Schema), FIRST_OBJECT_ID);
        dst.cp(&src);
        assert_eq!(dst.id(), 4);
        assert_eq!(dst.name(), "ops");
        assert_eq!(dst.export_state(), src.export_state());
        assert_eq!(dst.next_schema_id().unwrap(), id + 1);
    }

    #[test]
    fn encode_to_vec_is_exact() {
        let mut cat = TestCatalog::new(-2, "négoce");
        for name in ["a", "bb", "ccc"] {
            let id = cat.next_table_id().unwrap();
            cat.register_object(ObjectKind::Table, name, id, ObjectHandle::new(0))
                .unwrap();
        }
        let bytes = cat.encode_to_vec().unwrap();
        assert_eq!(bytes.len(), cat.encoded_len());

        let back = TestCatalog::decode(&bytes).unwrap();
        assert_eq!(back.export_state(), cat.export_state());
        assert!(!back.is_fully_bound());
    }
}
