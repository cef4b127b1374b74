use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding of a list column or the preference file failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// The file was written by a newer build; downgrades are refused.
    #[error("Database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: u32, supported: u32 },

    /// An update was requested for a record that was never inserted.
    #[error("Record has no id")]
    MissingId,

    /// A thread panicked while holding the database lock.
    #[error("Database lock poisoned")]
    LockPoisoned,

    /// The database handle was dropped while a subscriber was waiting.
    #[error("Database closed")]
    Closed,

    /// A blocking store task failed to complete.
    #[error("Background task failed: {0}")]
    Task(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
