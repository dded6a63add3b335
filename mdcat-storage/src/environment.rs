//! Lifecycle of the persistent environment backing a catalog.
//!
//! An environment is a directory holding one data file and one lock file.
//! [`EnvironmentManager`] owns at most one open handle to it and enforces the
//! ordering `open` → `close` → `delete`:
//!
//! ```text
//!   Closed ──open──▶ Open ──close──▶ Closed ──delete──▶ Deleted
//!     ▲                                                   │
//!     └──────────────────────── open ─────────────────────┘
//! ```
//!
//! Handles given out by [`EnvironmentManager::env`] stand in for the
//! transactions, cursors and sub-databases derived from the environment. Every
//! one of them must be dropped before `close`; closing with any still alive is
//! a fatal precondition violation and panics.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mdcat_result::{EngineError, Error, Result};

use crate::engine::StorageEngine;
use crate::options::EnvironmentOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentState {
    Closed,
    Open,
    Deleted,
}

impl EnvironmentState {
    pub const fn as_str(self) -> &'static str {
        match self {
            EnvironmentState::Closed => "closed",
            EnvironmentState::Open => "open",
            EnvironmentState::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EnvironmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of removing one environment file.
#[derive(Debug)]
pub struct FileRemoval {
    pub path: PathBuf,
    pub outcome: io::Result<()>,
}

impl FileRemoval {
    fn attempt(path: PathBuf) -> Self {
        let outcome = fs::remove_file(&path);
        Self { path, outcome }
    }

    pub fn is_removed(&self) -> bool {
        self.outcome.is_ok()
    }

    /// True when the removal failed because the file was already gone.
    pub fn was_missing(&self) -> bool {
        matches!(&self.outcome, Err(e) if e.kind() == io::ErrorKind::NotFound)
    }

    fn into_result(self) -> Result<()> {
        self.outcome.map_err(|source| Error::Filesystem {
            path: self.path,
            source,
        })
    }
}

/// Per-file status of [`EnvironmentManager::delete`].
///
/// Both removals are always attempted; a failure on one file does not stop the
/// other.
#[derive(Debug)]
pub struct DeleteReport {
    pub data: FileRemoval,
    pub lock: FileRemoval,
}

impl DeleteReport {
    pub fn is_success(&self) -> bool {
        self.data.is_removed() && self.lock.is_removed()
    }

    /// Collapse into the first failure, data file first.
    pub fn into_result(self) -> Result<()> {
        let DeleteReport { data, lock } = self;
        data.into_result()?;
        lock.into_result()
    }
}

/// Finite-state wrapper around one storage environment handle.
///
/// Single-owner: all transitions take `&mut self`.
pub struct EnvironmentManager<E: StorageEngine> {
    engine: E,
    options: EnvironmentOptions,
    state: EnvironmentState,
    env: Option<Arc<E::Env>>,
    path: Option<PathBuf>,
}

impl<E: StorageEngine> fmt::Debug for EnvironmentManager<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Engine handles are not required to implement Debug.
        f.debug_struct("EnvironmentManager")
            .field("state", &self.state)
            .field("path", &self.path)
            .field("outstanding_handles", &self.outstanding_handles())
            .finish()
    }
}

impl<E: StorageEngine + Default> Default for EnvironmentManager<E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}

impl<E: StorageEngine> EnvironmentManager<E> {
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, EnvironmentOptions::default())
    }

    pub fn with_options(engine: E, options: EnvironmentOptions) -> Self {
        Self {
            engine,
            options,
            state: EnvironmentState::Closed,
            env: None,
            path: None,
        }
    }

    /// A closed manager with the same engine and options.
    pub fn closed_copy(&self) -> Self
    where
        E: Clone,
    {
        Self::with_options(self.engine.clone(), self.options.clone())
    }

    pub fn state(&self) -> EnvironmentState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == EnvironmentState::Open
    }

    pub fn options(&self) -> &EnvironmentOptions {
        &self.options
    }

    /// Directory of the environment most recently opened or deleted.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create (if needed) and open the environment at `path`.
    ///
    /// Failures creating the directory or lock file, and failures reported by
    /// the engine, are returned as [`Error::StorageEngine`] with the engine's
    /// code. The manager stays in its previous state on failure.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if self.state == EnvironmentState::Open {
            return Err(self.invalid_state("open"));
        }

        let dir = path.as_ref();
        if self.options.create_if_missing {
            fs::create_dir_all(dir).map_err(EngineError::from)?;
        } else {
            fs::metadata(dir).map_err(EngineError::from)?;
        }

        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.options.lock_path(dir))
            .map_err(EngineError::from)?;

        let env = self.engine.open_env(&self.options.data_path(dir))?;

        self.env = Some(Arc::new(env));
        self.path = Some(dir.to_path_buf());
        self.state = EnvironmentState::Open;
        tracing::debug!(path = %dir.display(), "environment opened");
        Ok(())
    }

    /// Close the open environment.
    ///
    /// # Panics
    ///
    /// Panics if any handle obtained from [`EnvironmentManager::env`] is still
    /// alive. Closing underneath live transactions or cursors is caller misuse,
    /// not a recoverable condition.
    pub fn close(&mut self) -> Result<()> {
        if self.state != EnvironmentState::Open {
            return Err(self.invalid_state("close"));
        }

        if let Some(env) = self.env.take() {
            match Arc::try_unwrap(env) {
                Ok(env) => drop(env),
                Err(env) => {
                    let outstanding = Arc::strong_count(&env) - 1;
                    panic!(
                        "environment closed while {outstanding} derived handle(s) remain open"
                    );
                }
            }
        }

        self.state = EnvironmentState::Closed;
        tracing::debug!(
            path = %self.path.as_deref().unwrap_or(Path::new("")).display(),
            "environment closed"
        );
        Ok(())
    }

    /// Remove the data file and lock file of the environment at `path`.
    ///
    /// Not allowed while open. Each file is removed independently and its
    /// outcome recorded in the returned report.
    pub fn delete(&mut self, path: impl AsRef<Path>) -> Result<DeleteReport> {
        if self.state == EnvironmentState::Open {
            return Err(self.invalid_state("delete"));
        }

        let dir = path.as_ref();
        let report = DeleteReport {
            data: FileRemoval::attempt(self.options.data_path(dir)),
            lock: FileRemoval::attempt(self.options.lock_path(dir)),
        };

        for removal in [&report.data, &report.lock] {
            if let Err(e) = &removal.outcome {
                tracing::warn!(path = %removal.path.display(), error = %e, "environment file not removed");
            }
        }

        self.path = Some(dir.to_path_buf());
        self.state = EnvironmentState::Deleted;
        tracing::debug!(path = %dir.display(), "environment deleted");
        Ok(report)
    }

    /// Hand out a derived handle to the open environment.
    pub fn env(&self) -> Result<Arc<E::Env>> {
        self.env
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| self.invalid_state("borrow"))
    }

    /// Number of derived handles currently alive.
    pub fn outstanding_handles(&self) -> usize {
        self.env
            .as_ref()
            .map_or(0, |env| Arc::strong_count(env) - 1)
    }

    fn invalid_state(&self, operation: &'static str) -> Error {
        Error::InvalidEnvironmentState {
            operation,
            state: self.state.as_str(),
        }
    }
}

impl<E: StorageEngine> Drop for EnvironmentManager<E> {
    fn drop(&mut self) {
        if self.state == EnvironmentState::Open {
            tracing::error!(
                path = %self.path.as_deref().unwrap_or(Path::new("")).display(),
                outstanding = self.outstanding_handles(),
                "environment manager dropped while open; close() must run first"
            );
        }
    }
}
