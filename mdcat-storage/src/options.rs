//! Configuration for storage environments.

use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_DATA_FILE_NAME, DEFAULT_LOCK_FILE_NAME};

/// Configuration for opening and deleting an environment directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentOptions {
    /// File name of the data file inside the environment directory.
    pub data_file_name: String,
    /// File name of the lock file inside the environment directory.
    pub lock_file_name: String,
    /// Create the directory when it does not exist. When false, opening a
    /// missing directory fails with the OS error from the lookup.
    pub create_if_missing: bool,
}

impl Default for EnvironmentOptions {
    fn default() -> Self {
        Self {
            data_file_name: DEFAULT_DATA_FILE_NAME.to_string(),
            lock_file_name: DEFAULT_LOCK_FILE_NAME.to_string(),
            create_if_missing: true,
        }
    }
}

impl EnvironmentOptions {
    pub fn with_data_file_name<S: Into<String>>(mut self, name: S) -> Self {
        self.data_file_name = name.into();
        self
    }

    pub fn with_lock_file_name<S: Into<String>>(mut self, name: S) -> Self {
        self.lock_file_name = name.into();
        self
    }

    pub fn with_create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Path of the data file for the environment rooted at `dir`.
    pub fn data_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.data_file_name)
    }

    /// Path of the lock file for the environment rooted at `dir`.
    pub fn lock_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.lock_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_uses_two_files() {
        let opts = EnvironmentOptions::default();
        let dir = Path::new("/var/lib/mdcat/env");
        assert_eq!(opts.data_path(dir), dir.join(DEFAULT_DATA_FILE_NAME));
        assert_eq!(opts.lock_path(dir), dir.join(DEFAULT_LOCK_FILE_NAME));
        assert!(opts.create_if_missing);
    }

    #[test]
    fn builders_override_defaults() {
        let opts = EnvironmentOptions::default()
            .with_data_file_name("catalog.dat")
            .with_lock_file_name("catalog.lck")
            .with_create_if_missing(false);
        assert_eq!(opts.data_file_name, "catalog.dat");
        assert_eq!(opts.lock_file_name, "catalog.lck");
        assert!(!opts.create_if_missing);
    }
}
