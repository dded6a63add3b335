//! Persistent storage environments for mdcat catalogs.
//!
//! The embedded key-value engine sits behind the [`engine::StorageEngine`]
//! trait. [`environment::EnvironmentManager`] drives one environment through
//! its open/close/delete lifecycle and owns the on-disk layout (a directory
//! with a data file and a lock file, named by [`options::EnvironmentOptions`]).

pub mod constants;
pub mod engine;
pub mod environment;
pub mod options;

pub use engine::{DefaultEngine, FileEngine, StorageEngine};
#[cfg(feature = "simd-r-drive-support")]
pub use engine::SimdRDriveEngine;
pub use environment::{DeleteReport, EnvironmentManager, EnvironmentState, FileRemoval};
pub use options::EnvironmentOptions;
