//! Identifiers shared across mdcat crates.
//!
//! These types live in `mdcat-types` so they can be reused without depending on
//! the catalog or storage crates.

use std::fmt;

/// Unique identifier for a catalog.
///
/// Catalog ids are minted by the managing subsystem, which guarantees they are
/// globally unique before a catalog is constructed. The catalog never checks.
pub type CatalogId = i16;

/// Identifier of a user, schema, table or index within one catalog.
///
/// Object ids are 16-bit signed integers. Each [`ObjectKind`] has its own id
/// space, so a user id and a table id may coincide numerically.
///
/// # Special Values
///
/// - `0` ([`RESERVED_OBJECT_ID`]) is never issued or registered
/// - Allocated ids start at [`FIRST_OBJECT_ID`]
/// - `i16::MAX` ([`EXHAUSTED_COUNTER`]) is the exhausted-counter sentinel
pub type ObjectId = i16;

/// Object id reserved for system use; never handed out by an allocator.
pub const RESERVED_OBJECT_ID: ObjectId = 0;

/// First id handed out by a fresh allocator.
pub const FIRST_OBJECT_ID: ObjectId = 1;

/// Largest id an allocator can issue or a registry can hold.
pub const MAX_OBJECT_ID: ObjectId = ObjectId::MAX - 1;

/// Counter value meaning every id for that kind has been issued.
pub const EXHAUSTED_COUNTER: ObjectId = ObjectId::MAX;

/// Check whether `id` may be held by a registry.
#[inline]
pub fn is_assignable_object_id(id: ObjectId) -> bool {
    (FIRST_OBJECT_ID..=MAX_OBJECT_ID).contains(&id)
}

/// Check whether `counter` is a legal allocator position.
#[inline]
pub fn is_valid_counter(counter: ObjectId) -> bool {
    (FIRST_OBJECT_ID..=EXHAUSTED_COUNTER).contains(&counter)
}

/// The four kinds of schema objects a catalog tracks.
///
/// The declaration order is the wire order used by snapshots: user, schema,
/// table, index. Do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    User,
    Schema,
    Table,
    Index,
}

impl ObjectKind {
    /// Number of object kinds.
    pub const COUNT: usize = 4;

    /// Every kind, in wire order.
    pub const ALL: [ObjectKind; Self::COUNT] = [
        ObjectKind::User,
        ObjectKind::Schema,
        ObjectKind::Table,
        ObjectKind::Index,
    ];

    /// Dense index of this kind, matching its position in [`ObjectKind::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            ObjectKind::User => 0,
            ObjectKind::Schema => 1,
            ObjectKind::Table => 2,
            ObjectKind::Index => 3,
        }
    }

    /// Lowercase label used in log lines and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            ObjectKind::User => "user",
            ObjectKind::Schema => "schema",
            ObjectKind::Table => "table",
            ObjectKind::Index => "index",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle to an object owned by the managing subsystem.
///
/// A handle is a slot in the owner's arena, never an address. It is only
/// meaningful inside the execution context whose arena produced it; a catalog
/// moved to another context must have its handles re-resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(u64);

impl ObjectHandle {
    #[inline]
    pub const fn new(slot: u64) -> Self {
        Self(slot)
    }

    #[inline]
    pub const fn slot(self) -> u64 {
        self.0
    }
}

impl From<u64> for ObjectHandle {
    fn from(slot: u64) -> Self {
        Self(slot)
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
