//! Storage engine seam.
//!
//! The catalog treats the embedded key-value engine as a black box. An engine
//! only has to open the environment whose data file lives at a given path;
//! closing is dropping the returned handle.
//!
//! [`DefaultEngine`] is [`SimdRDriveEngine`] when `simd-r-drive-support` is
//! enabled (the default) and [`FileEngine`] otherwise.

use std::path::Path;

use mdcat_result::EngineError;

pub mod file_engine;
pub use file_engine::FileEngine;

#[cfg(feature = "simd-r-drive-support")]
pub mod simd_r_drive_engine;
#[cfg(feature = "simd-r-drive-support")]
pub use simd_r_drive_engine::*;

#[cfg(feature = "simd-r-drive-support")]
pub type DefaultEngine = SimdRDriveEngine;
#[cfg(not(feature = "simd-r-drive-support"))]
pub type DefaultEngine = FileEngine;

pub trait StorageEngine: Send + Sync + 'static {
    /// Open environment handle. Dropping the last reference closes it.
    type Env: Send + Sync + 'static;

    /// Open (or create) the environment backed by `data_path`.
    ///
    /// Errors are returned exactly as the engine reports them.
    fn open_env(&self, data_path: &Path) -> Result<Self::Env, EngineError>;
}
