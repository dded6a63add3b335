/// Default name of an environment's data file.
pub const DEFAULT_DATA_FILE_NAME: &str = "data.mdb";

/// Default name of an environment's lock file.
pub const DEFAULT_LOCK_FILE_NAME: &str = "lock.mdb";
