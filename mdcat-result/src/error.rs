use std::path::PathBuf;
use std::{fmt, io};

use mdcat_types::{ObjectId, ObjectKind};
use thiserror::Error;

/// Unified error type for all mdcat operations.
///
/// This enum covers every failure mode of the catalog stack, from registry
/// conflicts to storage-engine failures. Each variant carries enough context to
/// diagnose the failure without consulting logs.
///
/// # Error Handling Strategy
///
/// Errors propagate upward with `?`. Registry and allocator errors are raised
/// before any state is touched, so a caller that receives one can retry with
/// different input. Storage-engine and filesystem errors are passed through
/// unmodified so callers can apply engine-specific recovery.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while streaming a snapshot to or from a reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A name is already registered for this kind.
    ///
    /// Names are unique per kind; the same name may be used by a user and a
    /// table at the same time.
    #[error("{kind} name '{name}' already exists in catalog")]
    DuplicateName { kind: ObjectKind, name: String },

    /// An id is already registered for this kind.
    #[error("{kind} id {id} already exists in catalog")]
    DuplicateId { kind: ObjectKind, id: ObjectId },

    /// No entry matches the requested name or id.
    ///
    /// `key` is a human-readable rendering of what was looked up, e.g.
    /// `name 'alice'` or `id 7`.
    #[error("{kind} {key} not found in catalog")]
    NotFound { kind: ObjectKind, key: String },

    /// The id lies outside the assignable range.
    ///
    /// Id `0` is reserved, negative ids are never issued and `i16::MAX` marks
    /// an exhausted counter.
    #[error("{kind} id {id} is reserved or out of range")]
    ReservedObjectId { kind: ObjectKind, id: ObjectId },

    /// Every id for this kind has already been issued.
    ///
    /// Counters never wrap, because wrapping would re-issue ids. Callers that
    /// need more objects must shard them across catalogs.
    #[error("{0} id space exhausted")]
    AllocationExhausted(ObjectKind),

    /// A snapshot could not be decoded.
    ///
    /// Raised for truncated buffers, trailing bytes, length prefixes that run
    /// past the end of the input, invalid UTF-8 and structurally inconsistent
    /// entries. No partially decoded catalog is ever returned.
    #[error("malformed catalog snapshot: {0}")]
    MalformedInput(String),

    /// Opaque failure reported by the storage engine while opening an
    /// environment. The engine's code is preserved verbatim.
    #[error("storage engine error: {0}")]
    StorageEngine(#[from] EngineError),

    /// Failure removing one of an environment's files.
    #[error("filesystem error on {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An environment operation was invoked from a state that does not allow it.
    ///
    /// Nothing was changed. Fatal misuse (closing while derived handles remain
    /// open) panics instead.
    #[error("cannot {operation} environment while it is {state}")]
    InvalidEnvironmentState {
        operation: &'static str,
        state: &'static str,
    },

    /// Internal error indicating a bug or a value the wire format cannot hold.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a malformed-input error from any displayable message.
    ///
    /// # Examples
    ///
    /// ```
    /// use mdcat_result::Error;
    ///
    /// let err = Error::malformed("name length 9 exceeds 4 remaining bytes");
    /// assert!(matches!(err, Error::MalformedInput(msg) if msg.contains("exceeds")));
    /// ```
    #[inline]
    pub fn malformed<M: fmt::Display>(msg: M) -> Self {
        Error::MalformedInput(msg.to_string())
    }

    #[inline]
    pub fn name_not_found(kind: ObjectKind, name: &str) -> Self {
        Error::NotFound {
            kind,
            key: format!("name '{name}'"),
        }
    }

    #[inline]
    pub fn id_not_found(kind: ObjectKind, id: ObjectId) -> Self {
        Error::NotFound {
            kind,
            key: format!("id {id}"),
        }
    }

    /// Engine code carried by a [`Error::StorageEngine`] error, if any.
    pub fn engine_code(&self) -> Option<i32> {
        match self {
            Error::StorageEngine(e) => Some(e.code()),
            _ => None,
        }
    }
}

/// Error reported by a storage engine, kept as the engine produced it.
///
/// `code` is the engine-defined status (for file-backed engines, the OS error
/// number). Callers use it to tell an unusable path apart from a corrupt
/// environment.
#[derive(Error, Debug)]
#[error("{message} (code {code})")]
pub struct EngineError {
    code: i32,
    message: String,
    #[source]
    source: Option<io::Error>,
}

impl EngineError {
    /// Code used when the engine did not report one.
    pub const UNKNOWN_CODE: i32 = -1;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Underlying I/O error when the engine failed at the OS level.
    pub fn io_error(&self) -> Option<&io::Error> {
        self.source.as_ref()
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        Self {
            code: err.raw_os_error().unwrap_or(Self::UNKNOWN_CODE),
            message: err.to_string(),
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_keeps_os_code() {
        let io_err = io::Error::from_raw_os_error(13);
        let err = Error::from(EngineError::from(io_err));
        assert_eq!(err.engine_code(), Some(13));
    }

    #[test]
    fn engine_error_without_os_code_uses_unknown() {
        let err = EngineError::from(io::Error::other("corrupt header"));
        assert_eq!(err.code(), EngineError::UNKNOWN_CODE);
        assert!(err.message().contains("corrupt header"));
        assert!(err.io_error().is_some());
    }

    #[test]
    fn not_found_messages_name_the_key() {
        let err = Error::name_not_found(ObjectKind::Table, "orders");
        assert_eq!(err.to_string(), "table name 'orders' not found in catalog");

        let err = Error::id_not_found(ObjectKind::User, 7);
        assert_eq!(err.to_string(), "user id 7 not found in catalog");
    }
}
