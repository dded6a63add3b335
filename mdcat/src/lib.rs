//! mdcat: metadata catalog for a database engine.
//!
//! This crate is the primary entrypoint for the mdcat toolkit. It re-exports
//! the catalog, its error type and the storage environment abstractions from
//! the underlying `mdcat-*` crates.
//!
//! # Quick Start
//!
//! ```rust
//! use mdcat::{Catalog, ObjectHandle, ObjectKind};
//!
//! let mut catalog: Catalog = Catalog::new(1, "sales");
//! let id = catalog.next_user_id().unwrap();
//! catalog
//!     .register_object(ObjectKind::User, "alice", id, ObjectHandle::new(0))
//!     .unwrap();
//! assert_eq!(catalog.lookup_by_name(ObjectKind::User, "alice").unwrap(), id);
//! ```
//!
//! # Architecture
//!
//! - **Types** (`mdcat-types`): catalog and object ids, object kinds, handles.
//! - **Errors** (`mdcat-result`): the shared `Error` enum and `Result` alias.
//! - **Catalog** (`mdcat-catalog`): id allocation, registries, snapshots.
//! - **Storage** (`mdcat-storage`): the environment lifecycle and engine seam.

pub use mdcat_catalog::{
    Catalog, CatalogSnapshot, CatalogState, IdAllocator, KindState, Registry, decode_state,
};
pub use mdcat_result::{EngineError, Error, Result};
pub use mdcat_types::{
    CatalogId, FIRST_OBJECT_ID, MAX_OBJECT_ID, ObjectHandle, ObjectId, ObjectKind,
    RESERVED_OBJECT_ID,
};

// Re-export storage environment abstractions
pub mod storage {
    //! Storage environment lifecycle and engine implementations.

    pub use mdcat_storage::{
        DefaultEngine, DeleteReport, EnvironmentManager, EnvironmentOptions, EnvironmentState,
        FileEngine, FileRemoval, StorageEngine,
    };

    // SimdRDriveEngine is only available when mdcat-storage is built with simd-r-drive-support
    #[cfg(feature = "simd-r-drive-support")]
    pub use mdcat_storage::SimdRDriveEngine;
}
