use crate::error::Error;

/// Result type alias used throughout mdcat.
///
/// Shorthand for `std::result::Result<T, Error>`. Every fallible mdcat
/// operation returns this type.
pub type Result<T> = std::result::Result<T, Error>;
