//! Core identifier types shared by every mdcat crate.

pub mod ids;

pub use ids::{
    CatalogId, EXHAUSTED_COUNTER, FIRST_OBJECT_ID, MAX_OBJECT_ID, ObjectHandle, ObjectId,
    ObjectKind, RESERVED_OBJECT_ID, is_assignable_object_id, is_valid_counter,
};
