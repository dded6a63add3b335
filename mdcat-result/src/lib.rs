//! Error types and result definitions for the mdcat catalog.
//!
//! This crate provides the unified error type ([`Error`]) and result alias
//! ([`Result<T>`]) used by every mdcat crate, so errors cross crate boundaries
//! with `?` and callers match on one enum.
//!
//! # Error Categories
//!
//! - **Registry conflicts** ([`Error::DuplicateName`], [`Error::DuplicateId`],
//!   [`Error::ReservedObjectId`]): rejected registrations, state unchanged
//! - **Lookup failures** ([`Error::NotFound`]): missing names or ids
//! - **Allocation** ([`Error::AllocationExhausted`]): a kind's id space is used up
//! - **Snapshot decoding** ([`Error::MalformedInput`]): truncated or corrupt bytes
//! - **Storage** ([`Error::StorageEngine`], [`Error::Filesystem`],
//!   [`Error::InvalidEnvironmentState`]): environment lifecycle failures

pub mod error;
pub mod result;

pub use error::{EngineError, Error};
pub use result::Result;
