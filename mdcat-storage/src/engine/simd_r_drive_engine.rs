//! Engine backed by `simd_r_drive::DataStore`.
//!
//! - One append-only data file per environment.
//! - Opening creates the file when it does not exist.
//! - Dropping the `DataStore` flushes and closes it.

use std::path::Path;

use mdcat_result::EngineError;
use simd_r_drive::DataStore;

use super::StorageEngine;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimdRDriveEngine;

impl SimdRDriveEngine {
    pub fn new() -> Self {
        Self
    }
}

impl StorageEngine for SimdRDriveEngine {
    type Env = DataStore;

    /// Open the `DataStore` at `data_path`.
    ///
    /// A data file that is not a valid store (for example random bytes) can
    /// make `DataStore::open` panic while it scans entries, instead of
    /// returning an error. Only files written by this engine are supported.
    fn open_env(&self, data_path: &Path) -> Result<Self::Env, EngineError> {
        DataStore::open(data_path).map_err(EngineError::from)
    }
}
