//! Engine that holds the data file open with plain filesystem I/O.
//!
//! Always available. It owns the on-disk layout but stores nothing itself;
//! callers that need a key-value store enable `simd-r-drive-support`.

use std::fs::{File, OpenOptions};
use std::path::Path;

use mdcat_result::EngineError;

use super::StorageEngine;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileEngine;

impl FileEngine {
    pub fn new() -> Self {
        Self
    }
}

impl StorageEngine for FileEngine {
    type Env = File;

    fn open_env(&self, data_path: &Path) -> Result<Self::Env, EngineError> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(data_path)
            .map_err(EngineError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn open_keeps_existing_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.mdb");
        std::fs::write(&path, b"keep").unwrap();

        let mut file = FileEngine::new().open_env(&path).unwrap();
        file.write_all(b"!").unwrap();
        drop(file);
        assert_eq!(std::fs::read(&path).unwrap(), b"!eep");
    }

    #[test]
    fn missing_parent_reports_os_code() {
        let tmp = TempDir::new().unwrap();
        let err = FileEngine::new()
            .open_env(&tmp.path().join("absent").join("data.mdb"))
            .unwrap_err();
        assert_ne!(err.code(), EngineError::UNKNOWN_CODE);
    }
}
