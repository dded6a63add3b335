//! Metadata catalog for a database engine.
//!
//! A [`Catalog`] is the authoritative directory of the users, schemas, tables
//! and indexes of one database. It mints unique identifiers per kind, keeps a
//! bidirectional name ↔ id map plus an id → object reference map per kind,
//! serializes itself into a deterministic [`CatalogSnapshot`], and manages the
//! lifetime of the storage environment behind it.
//!
//! ```
//! use mdcat_catalog::Catalog;
//! use mdcat_types::{ObjectHandle, ObjectKind};
//!
//! let mut catalog: Catalog = Catalog::new(1, "sales");
//! let id = catalog.next_table_id().unwrap();
//! catalog
//!     .register_object(ObjectKind::Table, "orders", id, ObjectHandle::new(0))
//!     .unwrap();
//!
//! let bytes = catalog.encode_to_vec().unwrap();
//! let restored: Catalog = Catalog::decode(&bytes).unwrap();
//! assert_eq!(restored.lookup_by_name(ObjectKind::Table, "orders").unwrap(), id);
//! ```

#![forbid(unsafe_code)]

pub mod allocator;
pub mod catalog;
pub mod codec;
pub mod registry;
pub mod snapshot;
pub mod state;

pub use allocator::IdAllocator;
pub use catalog::Catalog;
pub use codec::decode_state;
pub use registry::Registry;
pub use snapshot::CatalogSnapshot;
pub use state::{CatalogState, KindState};
